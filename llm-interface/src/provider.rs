use caption_core::{CoreError, LlmError, LlmSettings};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const PROVIDER_NAME: &str = "Hugging Face";

/// Something that turns a prompt into generated caption text.
pub trait CaptionGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, CoreError>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
}

/// Client for the hosted text-generation inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    http_client: Client,
    api_url: String,
    token: String,
    parameters: GenerationParameters,
}

impl HuggingFaceProvider {
    pub fn new(settings: &LlmSettings, token: String) -> Result<Self, CoreError> {
        if token.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                provider: PROVIDER_NAME.to_string(),
            }
            .into());
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            api_url: settings.api_url.clone(),
            token,
            parameters: GenerationParameters {
                max_new_tokens: settings.max_new_tokens,
                temperature: settings.temperature,
                top_p: settings.top_p,
                do_sample: settings.do_sample,
            },
        })
    }

    /// Build a provider from settings, reading the token from the environment.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, CoreError> {
        let token = settings.api_token()?;
        Self::new(settings, token)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn transport_error(&self, error: reqwest::Error) -> CoreError {
        if error.is_timeout() {
            warn!("Request to {} timed out", self.api_url);
            LlmError::RequestTimeout {
                provider: PROVIDER_NAME.to_string(),
            }
            .into()
        } else {
            warn!("Request to {} failed: {}", self.api_url, error);
            CoreError::Network(error)
        }
    }

    fn status_error(&self, status: StatusCode, payload: Option<&Value>) -> CoreError {
        warn!("Generation request failed with status {}", status);
        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed {
                provider: PROVIDER_NAME.to_string(),
            }
            .into(),
            503 => LlmError::ServiceUnavailable {
                provider: PROVIDER_NAME.to_string(),
            }
            .into(),
            code => match payload.and_then(error_message) {
                Some(message) => LlmError::ServiceError {
                    provider: PROVIDER_NAME.to_string(),
                    message,
                }
                .into(),
                None if code == 404 => LlmError::ModelNotAvailable {
                    model: self.api_url.clone(),
                }
                .into(),
                None => CoreError::RequestFailed {
                    message: format!("{} returned {}", PROVIDER_NAME, status),
                    status_code: Some(code),
                },
            },
        }
    }
}

impl CaptionGenerator for HuggingFaceProvider {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: self.parameters,
        };
        debug!("Requesting captions from {}", self.api_url);

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| self.transport_error(e))?;
        let payload: Option<Value> = serde_json::from_str(&raw).ok();

        if !status.is_success() {
            return Err(self.status_error(status, payload.as_ref()));
        }

        let payload = payload.ok_or_else(|| LlmError::InvalidResponseFormat {
            provider: PROVIDER_NAME.to_string(),
        })?;
        let text = parse_response(&payload, prompt)?;
        info!("Received {} characters of generated text", text.len());
        Ok(text)
    }
}

fn error_message(payload: &Value) -> Option<String> {
    payload.get("error").map(|error| match error.as_str() {
        Some(message) => message.to_string(),
        None => error.to_string(),
    })
}

/// Extract the generated text from a successful response body, with the
/// echoed prompt removed.
pub fn parse_response(payload: &Value, prompt: &str) -> Result<String, LlmError> {
    let generated = payload
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str);

    if let Some(text) = generated {
        let text = if prompt.is_empty() {
            text.to_string()
        } else {
            text.replace(prompt, "")
        };
        return Ok(text.trim().to_string());
    }

    match error_message(payload) {
        Some(message) => Err(LlmError::ServiceError {
            provider: PROVIDER_NAME.to_string(),
            message,
        }),
        None => Err(LlmError::InvalidResponseFormat {
            provider: PROVIDER_NAME.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_strips_echoed_prompt() {
        let prompt = "Write captions.";
        let payload = json!([{ "generated_text": "Write captions.\n1. Sun's out 🌞\n2. Salty hair" }]);
        assert_eq!(
            parse_response(&payload, prompt).unwrap(),
            "1. Sun's out 🌞\n2. Salty hair"
        );
    }

    #[test]
    fn test_parse_error_object() {
        let payload = json!({ "error": "Model is currently loading" });
        let err = parse_response(&payload, "p").unwrap_err();
        assert!(matches!(
            err,
            LlmError::ServiceError { ref message, .. } if message == "Model is currently loading"
        ));
    }

    #[test]
    fn test_parse_unexpected_shapes() {
        for payload in [json!([]), json!([{ "text": "x" }]), json!("plain"), json!({ "ok": true })] {
            assert!(matches!(
                parse_response(&payload, "p"),
                Err(LlmError::InvalidResponseFormat { .. })
            ));
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerationRequest {
            inputs: "hello",
            parameters: GenerationParameters {
                max_new_tokens: 150,
                temperature: 0.75,
                top_p: 0.9,
                do_sample: true,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["inputs"], "hello");
        assert_eq!(value["parameters"]["max_new_tokens"], 150);
        assert_eq!(value["parameters"]["temperature"], 0.75);
        assert_eq!(value["parameters"]["do_sample"], true);
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = HuggingFaceProvider::new(&LlmSettings::default(), " ".to_string()).unwrap_err();
        assert!(matches!(err, CoreError::Llm(LlmError::InvalidApiKey { .. })));
    }
}
