//! Caption generation through a hosted language model.

pub mod prompt;
pub mod provider;

pub use prompt::{build_prompt, GenerationMood, PhotoContext};
pub use provider::{parse_response, CaptionGenerator, HuggingFaceProvider, PROVIDER_NAME};
