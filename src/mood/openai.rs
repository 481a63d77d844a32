//! OpenAI chat-completions mood analyzer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{MoodAnalyzer, validate_descriptor};
use crate::{config, error::MoodError, types::MoodDescriptor};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

/// Asks an OpenAI chat model for a JSON mood descriptor.
pub struct OpenAiMoodAnalyzer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiMoodAnalyzer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Builds an analyzer from `OPENAI_API_URL`, `OPENAI_API_KEY` and `OPENAI_MODEL`.
    ///
    /// A missing key does not fail here; every `analyze` call then errors and
    /// the caller falls back to the default descriptor.
    pub fn from_env() -> Self {
        Self::new(
            config::openai_api_url(),
            config::openai_api_key().unwrap_or_default(),
            config::openai_model(),
        )
    }

    fn system_prompt(known_genres: &[String]) -> String {
        format!(
            "You are an expert music curator who understands the emotional nuances of different life moments.
  Analyze the user's situation and return a JSON object with:
  - primaryMood: one of [happy, sad, energetic, calm, angry, nostalgic, confident, anxious]
  - energy: number from 1-10 (1=very calm, 10=very energetic)
  - genres: array of 3-5 music genres that would fit this moment (can include user's preferred genres: {genres})
  - searchTerms: array of 5-10 Spotify search terms that would find appropriate songs (e.g., \"uplifting indie\", \"workout motivation\", \"calm instrumental\")
  - artistStyles: array of 3-5 artist names whose style matches the mood (mix of popular and lesser-known)",
            genres = known_genres.join(", ")
        )
    }
}

#[async_trait]
impl MoodAnalyzer for OpenAiMoodAnalyzer {
    async fn analyze(
        &self,
        prompt: &str,
        known_genres: &[String],
    ) -> Result<MoodDescriptor, MoodError> {
        if self.api_key.is_empty() {
            return Err(MoodError::NotConfigured("OPENAI_API_KEY must be set".to_string()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Self::system_prompt(known_genres),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MoodError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MoodError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            MoodError::InvalidResponse(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| MoodError::InvalidResponse("No response from OpenAI".to_string()))?;

        parse_descriptor(&content)
    }
}

/// Parses the model's JSON message into a validated descriptor.
pub(crate) fn parse_descriptor(content: &str) -> Result<MoodDescriptor, MoodError> {
    let descriptor: MoodDescriptor = serde_json::from_str(content)
        .map_err(|e| MoodError::InvalidResponse(format!("Malformed mood JSON: {}", e)))?;
    validate_descriptor(descriptor)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimaryMood;

    #[test]
    fn test_parse_descriptor() {
        let descriptor = parse_descriptor(
            r#"{"primaryMood":"energetic","energy":9,"genres":["edm","pop"],"searchTerms":["workout motivation","pump up"],"artistStyles":["Calvin Harris"]}"#,
        )
        .unwrap();
        assert_eq!(descriptor.primary_mood, PrimaryMood::Energetic);
        assert_eq!(descriptor.energy, 9);
        assert_eq!(descriptor.search_terms.len(), 2);
    }

    #[test]
    fn test_parse_descriptor_rejects_garbage() {
        assert!(matches!(
            parse_descriptor("not json"),
            Err(MoodError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_descriptor(r#"{"primaryMood":"calm","energy":42}"#),
            Err(MoodError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_descriptor_accepts_loose_energy() {
        for (energy, expected) in [("7.0", 7), ("\"7\"", 7), ("6.6", 7), ("\" 3 \"", 3)] {
            let content = format!(r#"{{"primaryMood":"happy","energy":{}}}"#, energy);
            let descriptor = parse_descriptor(&content).unwrap();
            assert_eq!(descriptor.energy, expected, "energy {}", energy);
        }

        for energy in ["0.2", "-4", "300", "\"loud\""] {
            let content = format!(r#"{{"primaryMood":"happy","energy":{}}}"#, energy);
            assert!(
                matches!(parse_descriptor(&content), Err(MoodError::InvalidResponse(_))),
                "energy {}",
                energy
            );
        }
    }

    #[test]
    fn test_system_prompt_lists_known_genres() {
        let prompt =
            OpenAiMoodAnalyzer::system_prompt(&["pop".to_string(), "indie rock".to_string()]);
        assert!(prompt.contains("user's preferred genres: pop, indie rock"));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let analyzer = OpenAiMoodAnalyzer::new("http://127.0.0.1:9", "", "gpt");
        let result = analyzer.analyze("hello", &[]).await;
        assert!(matches!(result, Err(MoodError::NotConfigured(_))));
    }
}
