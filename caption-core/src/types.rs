use serde::{Deserialize, Serialize};

/// A single hand-curated caption and the mood tag it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub text: String,
    pub mood: String,
}

impl CaptionEntry {
    pub fn new(text: impl Into<String>, mood: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mood: mood.into(),
        }
    }
}

/// What the user asks the recommender for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub caption: String,
    pub mood: String,
    pub top_n: usize,
}

impl Query {
    pub fn new(caption: impl Into<String>, mood: impl Into<String>, top_n: usize) -> Self {
        Self {
            caption: caption.into(),
            mood: mood.into(),
            top_n,
        }
    }
}
