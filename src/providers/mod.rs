//! Completion provider implementations.
//!
//! Every supported backend speaks the same chat-completions envelope,
//! so one [`ProviderClient`] serves them all; the per-backend
//! differences live in [`BackendProfile`].

pub mod wire;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, trace, warn};

use crate::config::{ProviderDescriptor, Resolution, Settings};
use crate::error::{ProviderError, ProviderErrorKind};
use crate::prompt::{Locale, PromptBuilder};
use crate::request::{
  ContentRequest, GenerationResult, MarketingCopyParams
, ProductDescParams, SocialContentParams, Usage
};
use crate::safety::ContentSafetyFilter;
use crate::truncate::truncate;
use crate::ProviderId;
use wire::{ChatMessage, ChatRequest, ChatResponse};

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_RESPONSE_TOKENS: u32 = 2048;

/// Uniform generation contract the orchestrator drives
#[async_trait]
pub trait ContentProvider: Send + Sync
{   fn id(&self) -> ProviderId;

    fn provider_name(&self) -> &str;

    /// One attempt against the backend; failures come back as values
    async fn generate(&self, request: &ContentRequest)
      -> Result<GenerationResult, ProviderError>;
}

/// What differs between backends that share the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendProfile
{   pub locale: Locale
  , pub chat_path: &'static str
}

impl BackendProfile
{   pub fn for_provider(id: ProviderId) -> Self
    {   match id
        {   ProviderId::SiliconFlow | ProviderId::Moonshot => BackendProfile
            {   locale: Locale::Zh
              , chat_path: "/chat/completions"
            }
          , ProviderId::OpenAI => BackendProfile
            {   locale: Locale::En
              , chat_path: "/chat/completions"
            }
        }
    }
}

/// Per-client limits taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions
{   pub timeout: Duration
  , pub max_content_length: usize
}

impl ClientOptions
{   pub fn from_settings(settings: &Settings) -> Self
    {   ClientOptions
        {   timeout: settings.request_timeout()
          , max_content_length: settings.max_content_length()
        }
    }
}

impl Default for ClientOptions
{   fn default() -> Self
    {   ClientOptions
        {   timeout: Duration::from_millis(
              crate::config::DEFAULT_TIMEOUT_MS
            )
          , max_content_length: crate::config::DEFAULT_MAX_CONTENT_LENGTH
        }
    }
}

/// Chat-completions client for one backend.
/// Holds no per-request state; safe to share across tasks.
pub struct ProviderClient
{   descriptor: ProviderDescriptor
  , profile: BackendProfile
  , prompts: PromptBuilder
  , safety: Arc<ContentSafetyFilter>
  , max_content_length: usize
  , http_client: reqwest::Client
}

impl ProviderClient
{   pub fn new(
      descriptor: ProviderDescriptor
    , options: ClientOptions
    , safety: Arc<ContentSafetyFilter>
    ) -> Result<Self, crate::error::Error>
    {   debug!(
          "Creating client for {} ({}, timeout {:?})"
        , descriptor.display_name, descriptor.model, options.timeout
        );
        let profile = BackendProfile::for_provider(descriptor.id);
        let http_client = reqwest::Client::builder()
          .timeout(options.timeout)
          .build()?;
        Ok(ProviderClient
        {   prompts: PromptBuilder::new(profile.locale)
          , profile
          , descriptor
          , safety
          , max_content_length: options.max_content_length
          , http_client
        })
    }

    pub fn endpoint(&self) -> String
    {   format!(
          "{}/{}"
        , self.descriptor.base_url.trim_end_matches('/')
        , self.profile.chat_path.trim_start_matches('/')
        )
    }

    pub async fn generate_marketing_copy(&self, params: MarketingCopyParams)
      -> Result<GenerationResult, ProviderError>
    {   self.generate(&ContentRequest::MarketingCopy(params)).await
    }

    pub async fn generate_product_desc(&self, params: ProductDescParams)
      -> Result<GenerationResult, ProviderError>
    {   self.generate(&ContentRequest::ProductDesc(params)).await
    }

    pub async fn generate_social_content(&self, params: SocialContentParams)
      -> Result<GenerationResult, ProviderError>
    {   self.generate(&ContentRequest::SocialContent(params)).await
    }

    /// Length bound for one reply, scaled by the number of items asked for
    fn content_limit(&self, request: &ContentRequest) -> usize
    {   self.max_content_length.saturating_mul(request.item_count())
    }

    fn api_key(&self) -> Result<&str, ProviderError>
    {   if !self.descriptor.is_usable()
        {   warn!("{} API key not configured", self.descriptor.display_name);
            return Err(ProviderError::not_configured(self.descriptor.id));
        }
        self.descriptor
          .credential
          .as_deref()
          .map(str::trim)
          .ok_or_else(|| ProviderError::not_configured(self.descriptor.id))
    }

    /// Send one chat completion and return the first choice's text
    async fn complete(&self, prompt: String)
      -> Result<(String, Option<Usage>), ProviderError>
    {   let id = self.descriptor.id;
        let api_key = self.api_key()?;

        let request = ChatRequest
        {   model: self.descriptor.model.clone()
          , messages: vec![
              ChatMessage::system(self.prompts.system_prompt())
            , ChatMessage::user(prompt)
            ]
          , temperature: TEMPERATURE
          , max_tokens: MAX_RESPONSE_TOKENS
        };

        trace!("{} request: {:?}", id, request);

        let response = self.http_client
          .post(self.endpoint())
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .json(&request)
          .send()
          .await
          .map_err(|e| {
            error!("{} HTTP error: {}", id, e);
            ProviderError::network(id, e)
          })?;

        let status = response.status();
        trace!("{} response status: {}", id, status);

        if !status.is_success()
        {   let error_text = response.text().await.unwrap_or_default();
            error!("{} API error {}: {}", id, status, error_text);
            return Err(ProviderError::from_status(
              id
            , status.as_u16()
            , &error_text
            ));
        }

        let body = response.text().await.map_err(|e| {
          error!("{} failed reading body: {}", id, e);
          ProviderError::network(id, e)
        })?;

        let chat_response: ChatResponse = serde_json::from_str(&body)
          .map_err(|e| {
            error!("{} parse error: {}", id, e);
            ProviderError::new(
              ProviderErrorKind::Unknown
            , id
            , format!("invalid response body: {}", e)
            )
          })?;

        let content = chat_response
          .first_content()
          .map(|c| c.to_string())
          .ok_or_else(|| {
            error!("{} returned no content", id);
            ProviderError::empty_response(id)
          })?;

        Ok((content, chat_response.usage.map(Usage::from)))
    }
}

#[async_trait]
impl ContentProvider for ProviderClient
{   fn id(&self) -> ProviderId
    {   self.descriptor.id
    }

    fn provider_name(&self) -> &str
    {   &self.descriptor.display_name
    }

    async fn generate(&self, request: &ContentRequest)
      -> Result<GenerationResult, ProviderError>
    {   debug!(
          "{} generating {}"
        , self.descriptor.display_name, request.content_type()
        );
        let prompt = self.prompts.render(request);
        let (raw, usage) = self.complete(prompt).await?;

        let report = self.safety.check_content(&raw);
        if !report.is_safe
        {   warn!(
              "{} {} contains sensitive content: {}"
            , self.descriptor.display_name
            , request.content_type()
            , report.issues.join(", ")
            );
        }

        let content = truncate(
          &report.filtered_content
        , self.content_limit(request)
        );

        Ok(GenerationResult::success(
          content
        , self.descriptor.display_name.clone()
        , usage
        ))
    }
}

/// Provider id → client, built once at startup for every descriptor
pub fn build_dispatch_table(
  resolution: &Resolution
, options: ClientOptions
, safety: Arc<ContentSafetyFilter>
) -> Result<HashMap<ProviderId, Arc<dyn ContentProvider>>, crate::error::Error>
{   let mut table: HashMap<ProviderId, Arc<dyn ContentProvider>>
      = HashMap::new();
    for descriptor in &resolution.descriptors
    {   let client = ProviderClient::new(
          descriptor.clone()
        , options
        , safety.clone()
        )?;
        table.insert(descriptor.id, Arc::new(client));
    }
    Ok(table)
}
