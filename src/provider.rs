//! External classification provider abstraction
//!
//! What this module provides (spec)
//! - An interface for the external model decoupled from retry/fallback logic
//!
//! Exports
//! - Models
//!   - `TitleRequest { description, location, salary, requirements }`
//! - Traits
//!   - `TitleProvider: complete(&TitleRequest) -> Result<String, BoxError>`
//! - Implementations
//!   - `OpenAiProvider` over async-openai chat completions
//!   - `ScriptedProvider` replaying a fixed pass/fail script, for tests
//!
//! Composition
//! - The generator only sees the trait; swapping in `ScriptedProvider` tests
//!   the whole degradation path without a network

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tower::BoxError;

use crate::config::GeneratorConfig;

const SYSTEM_PROMPT: &str = "Ты помощник биржи труда. По описанию вакансии назови профессию \
одним-двумя словами, без пояснений. Например: Повар, Водитель, Продавец.";

/// Payload for one classification call, assembled from the description and
/// optional context fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleRequest {
    pub description: String,
    pub location: Option<String>,
    pub salary: Option<u64>,
    /// Best-effort requirement snippet extracted from the description;
    /// empty when none was found
    pub requirements: String,
}

impl TitleRequest {
    /// Render the user-visible prompt body.
    pub fn prompt(&self) -> String {
        let mut prompt = format!("Описание вакансии: {}", self.description);
        if let Some(location) = &self.location {
            prompt.push_str(&format!("\nМесто: {location}"));
        }
        if let Some(salary) = self.salary {
            prompt.push_str(&format!("\nОплата: {salary}"));
        }
        if !self.requirements.is_empty() {
            prompt.push_str(&format!("\nТребования: {}", self.requirements));
        }
        prompt
    }
}

/// Seam to the external classification model.
///
/// Failures cross this boundary as `BoxError`s whose `Display` output is the
/// human-readable message the error classifier keys on.
#[async_trait]
pub trait TitleProvider: Send + Sync {
    async fn complete(&self, request: &TitleRequest) -> Result<String, BoxError>;
}

/// Provider backed by the OpenAI chat completions API.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(client: Client<OpenAIConfig>, config: &GeneratorConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl TitleProvider for OpenAiProvider {
    async fn complete(&self, request: &TitleRequest) -> Result<String, BoxError> {
        let sys = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()?;
        let usr = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt())
            .build()?;
        let req = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![sys.into(), usr.into()])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(req).await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(content)
    }
}

/// A provider that replays a fixed script of results, one per call; the
/// last entry repeats once the script runs out.
pub struct ScriptedProvider {
    script: Vec<Result<String, String>>,
    cursor: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            script,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Shorthand for a provider that always fails with `message`.
    pub fn always_failing(message: &str) -> Arc<Self> {
        Self::new(vec![Err(message.to_string())])
    }

    /// How many calls the provider has served.
    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TitleProvider for ScriptedProvider {
    async fn complete(&self, _request: &TitleRequest) -> Result<String, BoxError> {
        let n = self.cursor.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.script.len().saturating_sub(1));
        match self.script.get(idx) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(message.clone().into()),
            None => Err("scripted provider has an empty script".into()),
        }
    }
}
