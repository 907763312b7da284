//! AI proxy layer
//!
//! Thin client over the hosted Gemini `generateContent` endpoint. Every
//! operation is text-in/text-out (audio goes in as inline base64): the
//! service derives text from note content and hands it back, and the caller
//! decides whether to merge it into the note being edited. Nothing here ever
//! mutates note state, so a failed model call can only ever cost the user a
//! suggestion.

use base64::Engine as _;
use keyring::Entry;
use reqwest::{Client, Request, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::normalize_tags;

const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const KEYRING_SERVICE_NAME: &str = "smartnote";
const KEYRING_GEMINI_API_KEY_USERNAME: &str = "gemini_api_key";

#[derive(Clone, Debug, PartialEq, Eq)]
enum AiMode {
    Disabled,
    Gemini {
        base_url: String,
        api_key: String,
        model: String,
    },
}

/// Basic configuration status for the AI proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiConfigStatus {
    pub enabled: bool,
    pub provider: &'static str,
    pub model: Option<String>,
}

/// Errors from AI proxy setup and requests.
///
/// All of these are recoverable: callers surface a message and leave the
/// note being edited untouched.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI features are not configured. Add a Gemini API key with `smartnote ai set-key`.")]
    NotConfigured,
    #[error("Invalid AI configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI API error: {0}")]
    Api(String),
    #[error("The model returned no usable output")]
    EmptyResponse,
}

type AiResult<T> = Result<T, AiError>;

/// Client for the six note-authoring operations plus the advisor flow.
#[derive(Clone)]
pub struct AiService {
    client: Client,
    mode: AiMode,
}

#[derive(Debug, Clone)]
struct GeminiApiKeyStore {
    service_name: String,
    username: String,
}

impl Default for GeminiApiKeyStore {
    fn default() -> Self {
        Self {
            service_name: KEYRING_SERVICE_NAME.to_string(),
            username: KEYRING_GEMINI_API_KEY_USERNAME.to_string(),
        }
    }
}

impl GeminiApiKeyStore {
    fn entry(&self) -> AiResult<Entry> {
        Entry::new(&self.service_name, &self.username)
            .map_err(|error| AiError::SecureStorage(error.to_string()))
    }

    fn load(&self) -> AiResult<Option<String>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(value) => {
                let normalized = value.trim();
                if normalized.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(normalized.to_string()))
                }
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AiError::SecureStorage(error.to_string())),
        }
    }

    fn save(&self, api_key: &str) -> AiResult<()> {
        self.entry()?
            .set_password(api_key)
            .map_err(|error| AiError::SecureStorage(error.to_string()))
    }

    fn clear(&self) -> AiResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AiError::SecureStorage(error.to_string())),
        }
    }
}

impl AiService {
    /// Build the AI service from secure storage, with `GEMINI_API_KEY` as an
    /// environment fallback. Without a key the service is disabled and every
    /// operation fails with [`AiError::NotConfigured`].
    pub fn new() -> AiResult<Self> {
        let key_store = GeminiApiKeyStore::default();
        let api_key = match key_store.load()? {
            Some(key) => Some(key),
            None => std::env::var(ENV_GEMINI_API_KEY)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        };

        let mode = if let Some(api_key) = api_key {
            let base_url = std::env::var(ENV_GEMINI_BASE_URL)
                .ok()
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

            if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
                return Err(AiError::InvalidConfiguration(
                    "GEMINI_BASE_URL must start with http:// or https://",
                ));
            }

            let model = std::env::var(ENV_GEMINI_MODEL)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string());

            AiMode::Gemini {
                base_url,
                api_key,
                model,
            }
        } else {
            AiMode::Disabled
        };

        Ok(Self {
            client: Client::builder().build()?,
            mode,
        })
    }

    /// Persist the Gemini API key into secure storage.
    pub fn store_api_key(raw_api_key: &str) -> AiResult<()> {
        let api_key = raw_api_key.trim();
        if api_key.is_empty() {
            return Err(AiError::InvalidConfiguration(
                "Gemini API key must not be empty",
            ));
        }
        GeminiApiKeyStore::default().save(api_key)
    }

    /// Remove the Gemini API key from secure storage.
    pub fn clear_api_key() -> AiResult<()> {
        GeminiApiKeyStore::default().clear()
    }

    /// Returns whether a Gemini API key is currently stored securely.
    pub fn has_stored_api_key() -> AiResult<bool> {
        Ok(GeminiApiKeyStore::default().load()?.is_some())
    }

    #[must_use]
    pub fn config_status(&self) -> AiConfigStatus {
        match &self.mode {
            AiMode::Disabled => AiConfigStatus {
                enabled: false,
                provider: "none",
                model: None,
            },
            AiMode::Gemini { model, .. } => AiConfigStatus {
                enabled: true,
                provider: "gemini",
                model: Some(model.clone()),
            },
        }
    }

    /// Suggest a concise title for the given note content.
    pub async fn suggest_title(&self, content: &str) -> AiResult<String> {
        let content = require_text(content, "note content must not be empty")?;
        let prompt = format!(
            "Suggest a concise and relevant title for the following note content:\n\n\
             {content}\n\nRespond with the title only.",
        );

        let raw = self.generate(vec![Part::text(prompt)]).await?;
        let title = raw
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('"')
            .to_string();
        if title.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(title)
    }

    /// Suggest categorization tags for the given note content.
    pub async fn suggest_tags(&self, content: &str) -> AiResult<Vec<String>> {
        let content = require_text(content, "note content must not be empty")?;
        let prompt = format!(
            "You are an AI assistant that categorizes notes by suggesting relevant tags.\n\
             Analyze the content of the note provided and suggest a list of tags that would \
             be appropriate for categorizing the note.\n\n\
             Note Content: {content}\n\n\
             Respond with a comma-separated list of tags only.",
        );

        let raw = self.generate(vec![Part::text(prompt)]).await?;
        let tags = parse_tag_list(&raw);
        if tags.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(tags)
    }

    /// Summarize the given note content in a short paragraph.
    pub async fn summarize(&self, content: &str) -> AiResult<String> {
        let content = require_text(content, "note content must not be empty")?;
        let prompt = format!(
            "Summarize the following note content in one short paragraph. \
             Keep the summary faithful to the note; do not add new facts.\n\n\
             Note Content: {content}\n\nSummary:",
        );

        self.generate(vec![Part::text(prompt)]).await
    }

    /// Translate the given note content into the target language.
    pub async fn translate(&self, content: &str, target_language: &str) -> AiResult<String> {
        let content = require_text(content, "note content must not be empty")?;
        let target_language = require_text(target_language, "target language must not be empty")?;
        let prompt = format!(
            "You are a translation expert. Translate the given note content into the \
             target language.\n\n\
             Note Content: {content}\n\
             Target Language: {target_language}\n\nTranslation:",
        );

        self.generate(vec![Part::text(prompt)]).await
    }

    /// Transcribe an audio recording into text.
    pub async fn transcribe(&self, mime_type: &str, audio_bytes: &[u8]) -> AiResult<String> {
        let mime_type = require_text(mime_type, "mime_type must not be empty")?;
        if !mime_type.to_ascii_lowercase().starts_with("audio/") {
            return Err(AiError::InvalidInput("mime_type must start with audio/"));
        }
        if audio_bytes.is_empty() {
            return Err(AiError::InvalidInput("audio payload must not be empty"));
        }

        let parts = vec![
            Part::text("Transcribe the following audio recording to text:".to_string()),
            Part::inline_data(mime_type, audio_bytes),
        ];
        self.generate(parts).await
    }

    /// One conversational turn with the advisor.
    pub async fn chat(&self, message: &str) -> AiResult<String> {
        let message = require_text(message, "message must not be empty")?;
        let prompt = format!(
            "SYSTEM: You are a helpful and friendly AI Advisor. Do not use markdown \
             formatting in your responses. Be conversational.\n\n\
             USER: {message}\nASSISTANT:",
        );

        self.generate(vec![Part::text(prompt)]).await
    }

    /// Actionable advice or next steps for the given note content.
    pub async fn advise(&self, content: &str) -> AiResult<String> {
        let content = require_text(content, "note content must not be empty")?;
        let prompt = format!(
            "You are an AI Advisor. Analyze the following note content and provide 2-3 \
             actionable pieces of advice, insights, or next steps related to the topic. \
             Keep your response concise. If appropriate, format your advice using bullet \
             points (e.g., using '-' or '*').\n\n\
             Note Content:\n{content}\n\nAdvice:",
        );

        self.generate(vec![Part::text(prompt)]).await
    }

    async fn generate(&self, parts: Vec<Part>) -> AiResult<String> {
        let request = self.build_generate_request(parts)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AiError::Api(
                "Unauthorized request (check the configured Gemini API key)".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api(format!(
                "Generation request failed with {status}: {}",
                compact_text(&body)
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload.first_text().trim().to_string();
        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }

    fn build_generate_request(&self, parts: Vec<Part>) -> AiResult<Request> {
        let (base_url, api_key, model) = match &self.mode {
            AiMode::Disabled => return Err(AiError::NotConfigured),
            AiMode::Gemini {
                base_url,
                api_key,
                model,
            } => (base_url, api_key, model),
        };

        let endpoint = format!("{base_url}/v1beta/models/{model}:generateContent");
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        self.client
            .post(endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .build()
            .map_err(AiError::Http)
    }
}

fn require_text<'a>(value: &'a str, message: &'static str) -> AiResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AiError::InvalidInput(message))
    } else {
        Ok(trimmed)
    }
}

fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Parse a model-produced tag list.
///
/// Models answer with comma-separated words, bullet lists, or both; split on
/// commas and newlines, strip list markers and `#` prefixes, and dedupe.
fn parse_tag_list(raw: &str) -> Vec<String> {
    let tags = raw
        .split(|c| c == ',' || c == '\n')
        .map(|part| {
            part.trim()
                .trim_start_matches(['-', '*', '#'])
                .trim()
                .to_string()
        })
        .filter(|part| !part.is_empty())
        .collect();
    normalize_tags(tags)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn configured_service() -> AiService {
        AiService {
            client: Client::builder().build().unwrap(),
            mode: AiMode::Gemini {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: "test-key".to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
        }
    }

    fn disabled_service() -> AiService {
        AiService {
            client: Client::builder().build().unwrap(),
            mode: AiMode::Disabled,
        }
    }

    #[test]
    fn disabled_status_when_not_configured() {
        let status = disabled_service().config_status();
        assert!(!status.enabled);
        assert_eq!(status.provider, "none");
        assert_eq!(status.model, None);
    }

    #[test]
    fn gemini_request_shape_is_correct() {
        let service = configured_service();
        let request = service
            .build_generate_request(vec![Part::text("hello".to_string())])
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            request.headers().get("x-goog-api-key").unwrap(),
            "test-key"
        );
    }

    #[test]
    fn request_fails_when_disabled() {
        let error = disabled_service()
            .build_generate_request(vec![Part::text("hello".to_string())])
            .unwrap_err();
        assert!(matches!(error, AiError::NotConfigured));
    }

    #[test]
    fn request_body_serializes_text_and_inline_data() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text("Transcribe this".to_string()),
                    Part::inline_data("audio/wav", &[1, 2, 3]),
                ],
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Transcribe this");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "audio/wav");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert!(parts[0].get("inlineData").is_none());
    }

    #[test]
    fn parse_response_first_text_joins_parts() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.first_text(), "Hello world");
    }

    #[test]
    fn parse_response_tolerates_missing_candidates() {
        let payload: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.first_text(), "");
    }

    #[test]
    fn parse_tag_list_handles_commas_and_bullets() {
        assert_eq!(
            parse_tag_list("work, ideas, brainstorming"),
            vec!["work", "ideas", "brainstorming"]
        );
        assert_eq!(
            parse_tag_list("- #shopping\n- urgent\n* groceries"),
            vec!["shopping", "urgent", "groceries"]
        );
    }

    #[test]
    fn parse_tag_list_dedupes_and_drops_empties() {
        assert_eq!(parse_tag_list("Work,\nwork, , WORK"), vec!["Work"]);
        assert!(parse_tag_list("  \n , ").is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn operations_reject_empty_input_before_any_request() {
        let service = configured_service();

        assert!(matches!(
            service.suggest_title("  ").await.unwrap_err(),
            AiError::InvalidInput(_)
        ));
        assert!(matches!(
            service.translate("hello", " ").await.unwrap_err(),
            AiError::InvalidInput(_)
        ));
        assert!(matches!(
            service.transcribe("video/mp4", &[1]).await.unwrap_err(),
            AiError::InvalidInput(_)
        ));
        assert!(matches!(
            service.transcribe("audio/wav", &[]).await.unwrap_err(),
            AiError::InvalidInput(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn operations_fail_fast_when_disabled() {
        let service = disabled_service();
        assert!(matches!(
            service.chat("hello").await.unwrap_err(),
            AiError::NotConfigured
        ));
    }
}
