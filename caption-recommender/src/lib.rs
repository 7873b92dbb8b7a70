//! Mood-bucketed caption recommendations.
//!
//! A [`Catalog`] holds hand-curated captions tagged with a mood. Given a
//! caption typed by the user, [`Catalog::recommend`] ranks the captions of the
//! chosen mood by TF-IDF cosine similarity, refitting the vocabulary on every
//! call.

pub mod catalog;
pub mod similarity;
pub mod stopwords;
pub mod tfidf;

pub use catalog::Catalog;
pub use similarity::cosine_similarity;
pub use tfidf::{tokenize, TfidfVectorizer};
