//! Per-request provider selection and fallback

use std::collections::HashMap;
use std::sync::Arc;
use arc_swap::ArcSwap;
use log::{debug, error, info, warn};

use crate::config::Resolution;
use crate::error::{Error, ProviderError};
use crate::mock::{MockGenerator, MOCK_PROVIDER_NAME};
use crate::providers::ContentProvider;
use crate::request::{ContentRequest, GenerationResult};
use crate::ProviderId;

/// Ordered providers one request may try, each at most once
#[derive(Debug, Clone)]
pub struct FailoverSequence
{   pub providers: Vec<ProviderId>
  , pub current_index: usize
}

impl FailoverSequence
{   pub fn new(providers: Vec<ProviderId>) -> Self
    {   debug!(
          "Creating failover sequence with {} providers"
        , providers.len()
        );
        FailoverSequence
        {   providers
          , current_index: 0
        }
    }

    /// `primary` first, then the other usable providers in priority order
    pub fn for_primary(primary: ProviderId, usable: &[ProviderId]) -> Self
    {   let mut providers = vec![primary];
        providers.extend(usable.iter().copied().filter(|id| *id != primary));
        FailoverSequence::new(providers)
    }

    /// Get the current provider
    pub fn current(&self) -> Option<ProviderId>
    {   self.providers.get(self.current_index).copied()
    }

    /// Move to the next provider
    pub fn advance(&mut self) -> Option<ProviderId>
    {   self.current_index += 1;
        self.current()
    }

    /// Check if we have more providers to try
    pub fn has_next(&self) -> bool
    {   self.current_index + 1 < self.providers.len()
    }

    pub fn len(&self) -> usize
    {   self.providers.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.providers.is_empty()
    }
}

/// Runs the fallback chain for each request:
/// active provider, then every other usable provider once, then mock.
pub struct FallbackOrchestrator
{   resolution: Resolution
  , clients: HashMap<ProviderId, Arc<dyn ContentProvider>>
  , active: ArcSwap<Option<ProviderId>>
  , mock: MockGenerator
}

impl FallbackOrchestrator
{   pub fn new(
      resolution: Resolution
    , clients: HashMap<ProviderId, Arc<dyn ContentProvider>>
    ) -> Self
    {   let active = resolution.active;
        info!(
          "Fallback orchestrator ready, active provider: {}"
        , active.map(|id| id.display_name()).unwrap_or(MOCK_PROVIDER_NAME)
        );
        FallbackOrchestrator
        {   resolution
          , clients
          , active: ArcSwap::from_pointee(active)
          , mock: MockGenerator::new()
        }
    }

    pub fn resolution(&self) -> &Resolution
    {   &self.resolution
    }

    pub fn active_provider(&self) -> Option<ProviderId>
    {   **self.active.load()
    }

    pub fn is_configured(&self) -> bool
    {   self.active_provider().is_some()
    }

    pub fn provider_name(&self) -> String
    {   match self.active_provider()
        {   Some(id) => self.clients
              .get(&id)
              .map(|c| c.provider_name().to_string())
              .unwrap_or_else(|| id.display_name().to_string())
          , None => format!("{} (no API key configured)", MOCK_PROVIDER_NAME)
        }
    }

    /// Make `id` the provider new requests start with.
    /// Requests already running keep the provider they started with.
    pub fn switch_provider(&self, id: ProviderId) -> Result<(), Error>
    {   if !self.resolution.is_usable(id)
        {   warn!("Refusing to switch to unusable provider {}", id);
            return Err(Error::ProviderNotUsable(id));
        }
        self.active.store(Arc::new(Some(id)));
        info!("Switched AI provider to {}", id.display_name());
        Ok(())
    }

    /// Always ends in a result; `Err` only for broken internal state
    pub async fn generate(&self, request: &ContentRequest)
      -> Result<GenerationResult, Error>
    {   // read the active pointer exactly once
        let Some(primary) = self.active_provider() else
        {   debug!("No usable provider, using mock generator");
            return Ok(self.mock.generate(request));
        };

        let usable = self.resolution.usable();
        let mut sequence = FailoverSequence::for_primary(primary, &usable);
        let mut failures: Vec<ProviderError> = Vec::new();

        while let Some(id) = sequence.current()
        {   let client = self.clients.get(&id).ok_or_else(|| {
              error!(
                "No client registered for provider {} (request {}, {} failures so far)"
              , id, request.content_type(), failures.len()
              );
              Error::Internal(format!("no client registered for {}", id))
            })?;

            debug!(
              "Attempt {}/{}: {} for {}"
            , sequence.current_index + 1, sequence.len()
            , id, request.content_type()
            );

            match client.generate(request).await
            {   Ok(result) => {
                  if !failures.is_empty()
                  {   info!(
                        "{} succeeded after {} failed attempt(s)"
                      , id, failures.len()
                      );
                  }
                  return Ok(result);
                }
              , Err(e) => {
                  error!("Generating {} failed: {}", request.content_type(), e);
                  if sequence.has_next()
                  {   warn!("AI provider call failed, trying fallback provider");
                  }
                  failures.push(e);
                }
            }
            sequence.advance();
        }

        warn!(
          "All AI providers failed ({}), using mock generator"
        , failures
            .iter()
            .map(|e| format!("{}: {}", e.provider, e.kind))
            .collect::<Vec<_>>()
            .join(", ")
        );
        Ok(self.mock.generate(request))
    }
}
