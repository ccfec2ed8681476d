use std::sync::Arc;
use log::{debug, warn};

use crate::config::{ConfigResolver, Settings};
use crate::error::Error;
use crate::failover::FallbackOrchestrator;
use crate::providers::{build_dispatch_table, ClientOptions};
use crate::request::{
  ContentRequest, GenerationResult, Length, MarketingCopyParams
, ProductDescParams, SocialContentParams
};
use crate::safety::ContentSafetyFilter;
use crate::ProviderId;

/// Public entry point for content generation.
///
/// Provider failures never reach the caller: every call yields a
/// [`GenerationResult`], falling back to mock content when no backend
/// answers. `Err` is reserved for broken internal state.
pub struct GenerationFacade
{   orchestrator: FallbackOrchestrator
}

impl GenerationFacade
{   /// Build from `.env` and the process environment
    pub fn from_env() -> Result<Self, Error>
    {   GenerationFacade::from_settings(Settings::from_env())
    }

    pub fn from_settings(settings: Settings) -> Result<Self, Error>
    {   debug!("Initializing GenerationFacade");
        let safety = Arc::new(ContentSafetyFilter::from_settings(&settings)?);
        let options = ClientOptions::from_settings(&settings);
        let resolution = ConfigResolver::new(settings).resolve();
        let clients = build_dispatch_table(&resolution, options, safety)?;
        Ok(GenerationFacade
        {   orchestrator: FallbackOrchestrator::new(resolution, clients)
        })
    }

    /// Wrap an orchestrator assembled elsewhere
    pub fn with_orchestrator(orchestrator: FallbackOrchestrator) -> Self
    {   GenerationFacade { orchestrator }
    }

    pub fn orchestrator(&self) -> &FallbackOrchestrator
    {   &self.orchestrator
    }

    pub async fn generate_marketing_copy(
      &self
    , product: &str
    , target_audience: Option<&str>
    , tone: Option<&str>
    , length: Option<Length>
    ) -> Result<GenerationResult, Error>
    {   self.generate(ContentRequest::MarketingCopy(MarketingCopyParams
        {   product: product.to_string()
          , target_audience: target_audience.map(str::to_string)
          , tone: tone.map(str::to_string)
          , length: length.unwrap_or_default()
        })).await
    }

    pub async fn generate_product_desc(
      &self
    , product_name: &str
    , features: Option<Vec<String>>
    , style: Option<&str>
    ) -> Result<GenerationResult, Error>
    {   self.generate(ContentRequest::ProductDesc(ProductDescParams
        {   product_name: product_name.to_string()
          , features
          , style: style.map(str::to_string)
        })).await
    }

    /// Content is divider-joined posts; see [`crate::parse_social_posts`]
    pub async fn generate_social_content(
      &self
    , platform: &str
    , topic: &str
    , style: Option<&str>
    , count: Option<u32>
    ) -> Result<GenerationResult, Error>
    {   self.generate(ContentRequest::SocialContent(SocialContentParams
        {   platform: platform.to_string()
          , topic: topic.to_string()
          , style: style.map(str::to_string)
          , count
        })).await
    }

    /// Invalid requests come back as `success: false`
    pub async fn generate(&self, request: ContentRequest)
      -> Result<GenerationResult, Error>
    {   if let Err(e) = request.validate()
        {   warn!("Rejected {} request: {}", request.content_type(), e);
            return Ok(GenerationResult::failure(e.to_string()));
        }
        self.orchestrator.generate(&request).await
    }

    /// Display name of the provider new requests start with
    pub fn provider_name(&self) -> String
    {   self.orchestrator.provider_name()
    }

    pub fn is_configured(&self) -> bool
    {   self.orchestrator.is_configured()
    }

    pub fn switch_provider(&self, id: ProviderId) -> Result<(), Error>
    {   self.orchestrator.switch_provider(id)
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::mock::MOCK_PROVIDER_NAME;

    #[tokio::test]
    async fn unconfigured_facade_answers_from_mock()
    {   let facade = GenerationFacade::from_settings(Settings::default())
          .unwrap();
        assert!(!facade.is_configured());
        let result = facade
          .generate_marketing_copy("竹制砧板", None, None, Some(Length::Short))
          .await
          .unwrap();
        assert!(result.is_success());
        assert_eq!(result.provider(), Some(MOCK_PROVIDER_NAME));
        assert!(result.content().unwrap().starts_with("竹制砧板"));
    }

    #[tokio::test]
    async fn blank_fields_yield_failure_result()
    {   let facade = GenerationFacade::from_settings(Settings::default())
          .unwrap();
        let result = facade
          .generate_social_content("weibo", "  ", None, None)
          .await
          .unwrap();
        assert!(!result.is_success());
        assert!(result.content().is_none());
        assert!(result.error().unwrap().contains("topic"));
    }

    #[test]
    fn bad_banned_pattern_fails_construction()
    {   let settings = Settings::from_pairs([("AI_BANNED_PATTERNS", "([")]);
        assert!(matches!(
          GenerationFacade::from_settings(settings)
        , Err(Error::InvalidPattern { .. })
        ));
    }
}
