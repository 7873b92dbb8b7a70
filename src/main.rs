use anyhow::Context;
use caption_core::{AppConfig, ErrorExt};
use caption_recommender::Catalog;
use gui::App;
use iced::{Application, Settings};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "captionista=debug,gui=debug,caption_recommender=info,llm_interface=info";

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Captionista");

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!(e.log_error().user_friendly_message()))
        .context("Failed to load configuration")?;
    let catalog = Catalog::load(&config)
        .map_err(|e| anyhow::anyhow!(e.log_error().user_friendly_message()))
        .context("Failed to load caption catalog")?;
    tracing::info!(
        "Loaded {} captions across {} moods",
        catalog.len(),
        catalog.moods().len()
    );

    let settings = Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1000.0, 760.0),
            min_size: Some(iced::Size::new(640.0, 480.0)),
            ..Default::default()
        },
        ..Settings::with_flags(Flags { config, catalog })
    };

    CaptionistaApp::run(settings).map_err(|e| {
        tracing::error!("Application error: {}", e);
        anyhow::anyhow!("GUI error: {e}")
    })
}

struct Flags {
    config: AppConfig,
    catalog: Catalog,
}

struct CaptionistaApp {
    app: App,
}

impl Application for CaptionistaApp {
    type Message = gui::Message;
    type Theme = iced::Theme;
    type Executor = iced::executor::Default;
    type Flags = Flags;

    fn new(flags: Self::Flags) -> (Self, iced::Command<Self::Message>) {
        tracing::info!("Initializing application");
        let app = App::new(flags.config, flags.catalog);
        (Self { app }, iced::Command::none())
    }

    fn title(&self) -> String {
        "📸 Instagram Caption Generator".to_string()
    }

    fn update(&mut self, message: Self::Message) -> iced::Command<Self::Message> {
        self.app.update(message)
    }

    fn view(&self) -> iced::Element<Self::Message> {
        self.app.view()
    }
}
