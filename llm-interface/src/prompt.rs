use caption_core::LlmError;
use std::fmt;

/// What the user told us about the photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoContext {
    pub description: Option<String>,
    pub has_photo: bool,
}

impl PhotoContext {
    /// Blank descriptions count as missing.
    pub fn new(description: Option<String>, has_photo: bool) -> Self {
        let description = description.filter(|d| !d.trim().is_empty());
        Self {
            description,
            has_photo,
        }
    }

    fn describe(&self) -> Result<String, LlmError> {
        match (self.has_photo, self.description.as_deref()) {
            (true, Some(desc)) => Ok(format!(
                "The user uploaded a photo and described it as follows:\n'{}'.",
                desc
            )),
            (true, None) => Ok(
                "The user uploaded a photo. You can infer a possible description from it."
                    .to_string(),
            ),
            (false, Some(desc)) => Ok(format!(
                "The user provided the following description of the photo:\n'{}'.",
                desc
            )),
            (false, None) => Err(LlmError::InvalidPrompt {
                reason: "Please upload a photo and/or provide a description.".to_string(),
            }),
        }
    }
}

/// Moods offered for generated captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationMood {
    Humorous,
    Romantic,
    Introspective,
    Adventurous,
    Chill,
    Empowering,
    Motivational,
    Dreamy,
    Sassy,
    Bold,
    Confident,
    Relatable,
    Lazy,
    Urban,
}

impl GenerationMood {
    pub const ALL: [GenerationMood; 14] = [
        GenerationMood::Humorous,
        GenerationMood::Romantic,
        GenerationMood::Introspective,
        GenerationMood::Adventurous,
        GenerationMood::Chill,
        GenerationMood::Empowering,
        GenerationMood::Motivational,
        GenerationMood::Dreamy,
        GenerationMood::Sassy,
        GenerationMood::Bold,
        GenerationMood::Confident,
        GenerationMood::Relatable,
        GenerationMood::Lazy,
        GenerationMood::Urban,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GenerationMood::Humorous => "Humorous",
            GenerationMood::Romantic => "Romantic",
            GenerationMood::Introspective => "Introspective",
            GenerationMood::Adventurous => "Adventurous",
            GenerationMood::Chill => "Chill",
            GenerationMood::Empowering => "Empowering",
            GenerationMood::Motivational => "Motivational",
            GenerationMood::Dreamy => "Dreamy",
            GenerationMood::Sassy => "Sassy",
            GenerationMood::Bold => "Bold",
            GenerationMood::Confident => "Confident",
            GenerationMood::Relatable => "Relatable",
            GenerationMood::Lazy => "Lazy",
            GenerationMood::Urban => "Urban",
        }
    }
}

impl fmt::Display for GenerationMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn build_prompt(context: &PhotoContext, mood: GenerationMood) -> Result<String, LlmError> {
    let photo_desc = context.describe()?;
    Ok(format!(
        "You are an AI Instagram caption generator. Below is the image context:\n\n\
         {}\n\n\
         The desired mood for the caption is **{}**.\n\
         Generate 3 creative and mood-matching Instagram captions.",
        photo_desc,
        mood.label().to_lowercase()
    ))
}
