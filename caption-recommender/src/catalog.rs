use crate::similarity::cosine_similarity;
use crate::tfidf::TfidfVectorizer;
use caption_core::{AppConfig, CaptionEntry, ConfigError, CoreError, Query, RecommendError};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

const BUNDLED_CATALOG: &str = include_str!("../data/captions.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    captions: Vec<CaptionEntry>,
}

/// The fixed, ordered list of captions recommendations are drawn from.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CaptionEntry>,
}

// A catalog is never empty, so there is no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl Catalog {
    pub fn new(entries: Vec<CaptionEntry>) -> Result<Self, CoreError> {
        if entries.is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "caption catalog is empty".to_string(),
            }
            .into());
        }
        Ok(Self { entries })
    }

    /// Parse a catalog of `[[captions]]` tables.
    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let file: CatalogFile = toml::from_str(raw).map_err(ConfigError::from)?;
        Self::new(file.captions)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&raw)?;
        info!("Loaded {} captions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The hand-curated catalog shipped with the binary.
    pub fn bundled() -> Result<Self, CoreError> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    /// The configured catalog file, or the bundled one.
    pub fn load(config: &AppConfig) -> Result<Self, CoreError> {
        match &config.catalog_path {
            Some(path) => Self::from_file(path),
            None => {
                let catalog = Self::bundled()?;
                info!("Using bundled catalog with {} captions", catalog.len());
                Ok(catalog)
            }
        }
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Distinct mood tags, sorted.
    pub fn moods(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.mood.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Texts tagged exactly `mood`, in catalog order.
    pub fn filter_by_mood(&self, mood: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.mood == mood)
            .map(|entry| entry.text.as_str())
            .collect()
    }

    /// Up to `top_n` captions of `mood`, most similar to `input_caption` first.
    pub fn recommend(
        &self,
        input_caption: &str,
        mood: &str,
        top_n: usize,
    ) -> Result<Vec<String>, RecommendError> {
        Ok(self
            .recommend_scored(input_caption, mood, top_n)?
            .into_iter()
            .map(|(text, _)| text)
            .collect())
    }

    /// Like [`Catalog::recommend`], keeping each caption's similarity score.
    /// Equal scores keep catalog order.
    pub fn recommend_scored(
        &self,
        input_caption: &str,
        mood: &str,
        top_n: usize,
    ) -> Result<Vec<(String, f64)>, RecommendError> {
        if input_caption.trim().is_empty() {
            return Err(RecommendError::InvalidInput);
        }

        let candidates = self.filter_by_mood(mood);
        if candidates.is_empty() {
            return Err(RecommendError::NoCandidates {
                mood: mood.to_string(),
            });
        }
        debug!("Ranking {} '{}' captions", candidates.len(), mood);

        let mut corpus = candidates.clone();
        corpus.push(input_caption);
        let (_, rows) = TfidfVectorizer::fit_transform(&corpus);
        let Some((input_row, candidate_rows)) = rows.split_last() else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<(String, f64)> = candidates
            .iter()
            .zip(candidate_rows)
            .map(|(text, row)| (text.to_string(), cosine_similarity(input_row, row)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        for (text, score) in &scored {
            debug!("{:.4} {}", score, text);
        }
        Ok(scored)
    }

    pub fn recommend_query(&self, query: &Query) -> Result<Vec<String>, RecommendError> {
        self.recommend(&query.caption, &query.mood, query.top_n)
    }
}
