use caption_core::{AppConfig, CoreError, ErrorExt, ErrorReporter, Query};
use caption_recommender::Catalog;
use iced::widget::{button, column, container, pick_list, row, slider, text, text_input, Column};
use iced::{Command, Element, Length, Theme};
use llm_interface::{build_prompt, CaptionGenerator, GenerationMood, HuggingFaceProvider, PhotoContext};
use std::path::Path;
use tracing::{debug, info, warn};

pub const SELECT_MOOD_WARNING: &str = "Please select a valid mood.";
pub const MISSING_CONTEXT_WARNING: &str = "Please upload a photo and/or provide a description.";
pub const MISSING_CAPTION_WARNING: &str = "Please enter a caption to get recommendations.";
pub const GENERATING_STATUS: &str = "Crafting your perfect caption...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Generate,
    Recommend,
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    PhotoPathChanged(String),
    DescriptionChanged(String),
    GenerationMoodSelected(GenerationMood),
    GeneratePressed,
    GenerationFinished(Result<String, String>),
    RecommendMoodSelected(String),
    CaptionChanged(String),
    TopNChanged(u8),
    RecommendPressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    Working,
    Done(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendStatus {
    Idle,
    Results(Vec<String>),
    Warning(String),
    Failed(String),
}

pub struct App {
    tab: Tab,
    config: AppConfig,
    catalog: Catalog,
    moods: Vec<String>,
    reporter: ErrorReporter,

    photo_path: String,
    description: String,
    generation_mood: Option<GenerationMood>,
    generation: GenerationStatus,
    generation_warning: Option<String>,

    recommend_mood: Option<String>,
    caption: String,
    top_n: u8,
    recommendation: RecommendStatus,
}

impl App {
    pub fn new(config: AppConfig, catalog: Catalog) -> Self {
        let moods = catalog.moods();
        let top_n = u8::try_from(config.clamp_top_n(config.default_top_n)).unwrap_or(1);
        Self {
            tab: Tab::Generate,
            config,
            catalog,
            moods,
            reporter: ErrorReporter::new(),
            photo_path: String::new(),
            description: String::new(),
            generation_mood: None,
            generation: GenerationStatus::Idle,
            generation_warning: None,
            recommend_mood: None,
            caption: String::new(),
            top_n,
            recommendation: RecommendStatus::Idle,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn generation(&self) -> &GenerationStatus {
        &self.generation
    }

    pub fn generation_warning(&self) -> Option<&str> {
        self.generation_warning.as_deref()
    }

    pub fn recommendation(&self) -> &RecommendStatus {
        &self.recommendation
    }

    pub fn top_n(&self) -> u8 {
        self.top_n
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Command::none()
            }
            Message::PhotoPathChanged(path) => {
                self.photo_path = path;
                Command::none()
            }
            Message::DescriptionChanged(description) => {
                self.description = description;
                Command::none()
            }
            Message::GenerationMoodSelected(mood) => {
                self.generation_mood = Some(mood);
                Command::none()
            }
            Message::GeneratePressed => self.start_generation(),
            Message::GenerationFinished(result) => {
                self.generation = match result {
                    Ok(captions) => GenerationStatus::Done(captions),
                    Err(message) => GenerationStatus::Failed(message),
                };
                Command::none()
            }
            Message::RecommendMoodSelected(mood) => {
                self.recommend_mood = Some(mood);
                Command::none()
            }
            Message::CaptionChanged(caption) => {
                self.caption = caption;
                Command::none()
            }
            Message::TopNChanged(top_n) => {
                self.top_n = u8::try_from(self.config.clamp_top_n(top_n as usize)).unwrap_or(1);
                Command::none()
            }
            Message::RecommendPressed => {
                self.recommend();
                Command::none()
            }
        }
    }

    fn start_generation(&mut self) -> Command<Message> {
        if self.generation == GenerationStatus::Working {
            return Command::none();
        }
        self.generation_warning = None;

        let Some(mood) = self.generation_mood else {
            self.generation_warning = Some(SELECT_MOOD_WARNING.to_string());
            return Command::none();
        };

        let photo = self.photo_path.trim();
        let has_photo = !photo.is_empty();
        if has_photo && !Path::new(photo).is_file() {
            self.generation_warning = Some(format!("Photo not found: {}", photo));
            return Command::none();
        }

        let context = PhotoContext::new(Some(self.description.clone()), has_photo);
        let prompt = match build_prompt(&context, mood) {
            Ok(prompt) => prompt,
            Err(e) => {
                self.generation_warning = Some(e.user_friendly_message());
                return Command::none();
            }
        };

        let provider = match HuggingFaceProvider::from_settings(&self.config.llm) {
            Ok(provider) => provider,
            Err(e) => {
                self.reporter.report_error(&e);
                self.generation = GenerationStatus::Failed(e.user_friendly_message());
                return Command::none();
            }
        };

        info!("Generating {} captions", mood);
        self.generation = GenerationStatus::Working;
        Command::perform(generate(provider, prompt), Message::GenerationFinished)
    }

    fn recommend(&mut self) {
        let Some(mood) = self.recommend_mood.clone() else {
            self.recommendation = RecommendStatus::Warning(SELECT_MOOD_WARNING.to_string());
            return;
        };
        if self.caption.is_empty() {
            self.recommendation = RecommendStatus::Warning(MISSING_CAPTION_WARNING.to_string());
            return;
        }

        let query = Query::new(self.caption.clone(), mood, self.top_n as usize);
        debug!("Recommending for {:?}", query);
        self.recommendation = match self.catalog.recommend_query(&query) {
            Ok(captions) => RecommendStatus::Results(captions),
            Err(e) => {
                let error = CoreError::from(e);
                self.reporter.report_warning(&error);
                RecommendStatus::Failed(error.user_friendly_message())
            }
        };
    }

    pub fn view(&self) -> Element<'_, Message, Theme> {
        let title: Element<Message, Theme> =
            text("📸 Mood-Based Instagram Caption Assistant").size(24).into();

        let tabs = row![
            tab_button("🧠 LLM-Based Captions", Tab::Generate, self.tab),
            tab_button("📊 ML-Based Recommendations", Tab::Recommend, self.tab),
        ]
        .spacing(10);

        let content = match self.tab {
            Tab::Generate => self.generate_view(),
            Tab::Recommend => self.recommend_view(),
        };

        let main_content: Element<Message, Theme> =
            column![title, tabs, container(content).padding(20)]
                .spacing(20)
                .into();

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn generate_view(&self) -> Element<'_, Message, Theme> {
        let mut content = Column::new()
            .spacing(12)
            .push(text("✨ Hugging Face Caption Generator").size(20))
            .push(
                text_input("Path to a photo (optional)", &self.photo_path)
                    .on_input(Message::PhotoPathChanged),
            )
            .push(
                text_input("Describe the photo in words", &self.description)
                    .on_input(Message::DescriptionChanged),
            )
            .push(
                pick_list(
                    &GenerationMood::ALL[..],
                    self.generation_mood,
                    Message::GenerationMoodSelected,
                )
                .placeholder("Select a mood..."),
            );

        let generate = button("Generate captions");
        content = content.push(if self.generation == GenerationStatus::Working {
            generate
        } else {
            generate.on_press(Message::GeneratePressed)
        });

        if let Some(warning) = &self.generation_warning {
            content = content.push(text(warning).size(14));
        }

        content = match &self.generation {
            GenerationStatus::Idle => content,
            GenerationStatus::Working => content.push(text(GENERATING_STATUS).size(14)),
            GenerationStatus::Done(captions) => content
                .push(text("📌 Generated Captions").size(18))
                .push(text(captions).size(14)),
            GenerationStatus::Failed(message) => content.push(text(message).size(14)),
        };

        content.into()
    }

    fn recommend_view(&self) -> Element<'_, Message, Theme> {
        let max_top_n = u8::try_from(self.config.max_top_n).unwrap_or(u8::MAX);

        let mut content = Column::new()
            .spacing(12)
            .push(text("🔍 ML-Based Caption Recommender").size(20))
            .push(
                pick_list(
                    self.moods.as_slice(),
                    self.recommend_mood.clone(),
                    Message::RecommendMoodSelected,
                )
                .placeholder("Select a mood..."),
            )
            .push(
                text_input("Enter your caption to match", &self.caption)
                    .on_input(Message::CaptionChanged),
            )
            .push(text(format!("How many similar captions to suggest? {}", self.top_n)).size(14))
            .push(slider(1..=max_top_n, self.top_n, Message::TopNChanged))
            .push(button("Get similar captions").on_press(Message::RecommendPressed));

        content = match &self.recommendation {
            RecommendStatus::Idle => content,
            RecommendStatus::Results(captions) => {
                let mut list = Column::new()
                    .spacing(6)
                    .push(text("📖 Recommended Captions").size(18));
                for (i, caption) in captions.iter().enumerate() {
                    list = list.push(text(format!("{}. {}", i + 1, caption)).size(14));
                }
                content.push(list)
            }
            RecommendStatus::Warning(message) | RecommendStatus::Failed(message) => {
                content.push(text(message).size(14))
            }
        };

        content.into()
    }
}

fn tab_button(label: &str, tab: Tab, active: Tab) -> Element<'static, Message, Theme> {
    let tab_button = button(text(label.to_string()));
    if tab == active {
        tab_button.into()
    } else {
        tab_button.on_press(Message::TabSelected(tab)).into()
    }
}

async fn generate(provider: HuggingFaceProvider, prompt: String) -> Result<String, String> {
    provider.generate(&prompt).await.map_err(|e| {
        ErrorReporter::new().report_error(&e);
        warn!("Caption generation failed: {}", e.error_code());
        e.user_friendly_message()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::CaptionEntry;

    fn test_app() -> App {
        let catalog = Catalog::new(vec![
            CaptionEntry::new("Good vibes only 🌈", "happy"),
            CaptionEntry::new("Beach days are the best days 🏖️", "happy"),
            CaptionEntry::new("Weekend mode: ON 🛌📺", "lazy"),
        ])
        .unwrap();
        let mut config = AppConfig::default();
        config.llm.token_env = "CAPTIONISTA_GUI_TEST_TOKEN_NEVER_SET".to_string();
        App::new(config, catalog)
    }

    #[test]
    fn test_initial_state() {
        let app = test_app();
        assert_eq!(app.tab(), Tab::Generate);
        assert_eq!(app.top_n(), 3);
        assert_eq!(app.generation(), &GenerationStatus::Idle);
        assert_eq!(app.recommendation(), &RecommendStatus::Idle);
    }

    #[test]
    fn test_tab_switch() {
        let mut app = test_app();
        let _ = app.update(Message::TabSelected(Tab::Recommend));
        assert_eq!(app.tab(), Tab::Recommend);
    }

    #[test]
    fn test_generate_requires_mood() {
        let mut app = test_app();
        let _ = app.update(Message::DescriptionChanged("a cat".to_string()));
        let _ = app.update(Message::GeneratePressed);
        assert_eq!(app.generation_warning(), Some(SELECT_MOOD_WARNING));
        assert_eq!(app.generation(), &GenerationStatus::Idle);
    }

    #[test]
    fn test_generate_requires_photo_or_description() {
        let mut app = test_app();
        let _ = app.update(Message::GenerationMoodSelected(GenerationMood::Chill));
        let _ = app.update(Message::GeneratePressed);
        assert_eq!(app.generation_warning(), Some(MISSING_CONTEXT_WARNING));
    }

    #[test]
    fn test_generate_rejects_missing_photo_file() {
        let mut app = test_app();
        let _ = app.update(Message::GenerationMoodSelected(GenerationMood::Bold));
        let _ = app.update(Message::PhotoPathChanged("/no/such/photo.jpg".to_string()));
        let _ = app.update(Message::GeneratePressed);
        assert_eq!(
            app.generation_warning(),
            Some("Photo not found: /no/such/photo.jpg")
        );
    }

    #[test]
    fn test_generate_without_token_reports_error() {
        let mut app = test_app();
        let _ = app.update(Message::GenerationMoodSelected(GenerationMood::Dreamy));
        let _ = app.update(Message::DescriptionChanged("stars over a lake".to_string()));
        let _ = app.update(Message::GeneratePressed);
        match app.generation() {
            GenerationStatus::Failed(message) => {
                assert!(message.contains("CAPTIONISTA_GUI_TEST_TOKEN_NEVER_SET"))
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_generation_finished() {
        let mut app = test_app();
        let _ = app.update(Message::GenerationFinished(Ok("1. Hi".to_string())));
        assert_eq!(app.generation(), &GenerationStatus::Done("1. Hi".to_string()));
        let _ = app.update(Message::GenerationFinished(Err("Unexpected response from API.".to_string())));
        assert_eq!(
            app.generation(),
            &GenerationStatus::Failed("Unexpected response from API.".to_string())
        );
    }

    #[test]
    fn test_recommend_warnings() {
        let mut app = test_app();
        let _ = app.update(Message::RecommendPressed);
        assert_eq!(
            app.recommendation(),
            &RecommendStatus::Warning(SELECT_MOOD_WARNING.to_string())
        );

        let _ = app.update(Message::RecommendMoodSelected("happy".to_string()));
        let _ = app.update(Message::RecommendPressed);
        assert_eq!(
            app.recommendation(),
            &RecommendStatus::Warning(MISSING_CAPTION_WARNING.to_string())
        );
    }

    #[test]
    fn test_recommend_results() {
        let mut app = test_app();
        let _ = app.update(Message::RecommendMoodSelected("happy".to_string()));
        let _ = app.update(Message::CaptionChanged("Good vibes only".to_string()));
        let _ = app.update(Message::TopNChanged(1));
        let _ = app.update(Message::RecommendPressed);
        assert_eq!(
            app.recommendation(),
            &RecommendStatus::Results(vec!["Good vibes only 🌈".to_string()])
        );
    }

    #[test]
    fn test_whitespace_caption_surfaces_recommender_error() {
        let mut app = test_app();
        let _ = app.update(Message::RecommendMoodSelected("lazy".to_string()));
        let _ = app.update(Message::CaptionChanged("   ".to_string()));
        let _ = app.update(Message::RecommendPressed);
        assert_eq!(
            app.recommendation(),
            &RecommendStatus::Failed(MISSING_CAPTION_WARNING.to_string())
        );
    }

    #[test]
    fn test_views_build_for_each_state() {
        let mut app = test_app();
        let _ = app.view();
        let _ = app.update(Message::GenerationFinished(Ok("1. Hi".to_string())));
        let _ = app.view();

        let _ = app.update(Message::TabSelected(Tab::Recommend));
        let _ = app.update(Message::RecommendMoodSelected("happy".to_string()));
        let _ = app.update(Message::CaptionChanged("vibes".to_string()));
        let _ = app.update(Message::RecommendPressed);
        assert!(matches!(app.recommendation(), RecommendStatus::Results(_)));
        let _ = app.view();
    }

    #[test]
    fn test_top_n_clamped() {
        let mut app = test_app();
        let _ = app.update(Message::TopNChanged(9));
        assert_eq!(app.top_n(), 5);
        let _ = app.update(Message::TopNChanged(0));
        assert_eq!(app.top_n(), 1);
    }
}
