//! Configuration for content providers and the active provider choice

use std::collections::HashMap;
use std::fmt;
use std::sync::Once;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use log::{debug, info, warn};
use crate::ProviderId;

pub const DEFAULT_PROVIDER: ProviderId = ProviderId::SiliconFlow;
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 2000;

static ENV_LOADER: Once = Once::new();

fn ensure_env_loaded()
{   ENV_LOADER.call_once(|| {
      match dotenvy::dotenv()
      {   Ok(path) => debug!("Loaded environment from {}", path.display())
        , Err(e) => debug!("No .env file loaded: {}", e)
      }
    });
}

/// Immutable key/value snapshot of the configuration surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings
{   values: HashMap<String, String>
}

impl Settings
{   /// Build settings from literal key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
      I: IntoIterator<Item = (K, V)>
    , K: Into<String>
    , V: Into<String>
    {   Settings
        {   values: pairs
              .into_iter()
              .map(|(k, v)| (k.into(), v.into()))
              .collect()
        }
    }

    /// Read `.env` (once per process) then the process environment
    pub fn from_env() -> Self
    {   ensure_env_loaded();
        let values: HashMap<String, String> = std::env::vars()
          .filter(|(k, _)| is_relevant_key(k))
          .collect();
        debug!("Read {} configuration keys from environment", values.len());
        Settings { values }
    }

    /// Trimmed, non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str>
    {   self.values
          .get(key)
          .map(|v| v.trim())
          .filter(|v| !v.is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String
    {   self.get(key).unwrap_or(default).to_string()
    }

    /// Numeric value, falling back to `default` when absent or unparsable
    pub fn get_number(&self, key: &str, default: u64) -> u64
    {   match self.get(key)
        {   Some(raw) => raw.parse().unwrap_or_else(|_| {
              warn!("{} is not a number ({:?}), using {}", key, raw, default);
              default
            })
          , None => default
        }
    }

    pub fn request_timeout(&self) -> Duration
    {   Duration::from_millis(
          self.get_number("AI_REQUEST_TIMEOUT", DEFAULT_TIMEOUT_MS)
        )
    }

    pub fn max_content_length(&self) -> usize
    {   self.get_number(
          "AI_MAX_CONTENT_LENGTH"
        , DEFAULT_MAX_CONTENT_LENGTH as u64
        ) as usize
    }

    /// Comma separated literal terms
    pub fn banned_terms(&self) -> Vec<String>
    {   split_list(self.get("AI_BANNED_TERMS"), ',')
    }

    /// Semicolon separated regular expressions
    pub fn banned_patterns(&self) -> Vec<String>
    {   split_list(self.get("AI_BANNED_PATTERNS"), ';')
    }

    /// Descriptor for one provider from its `<PREFIX>_*` keys
    pub fn provider_descriptor(&self, id: ProviderId) -> ProviderDescriptor
    {   let prefix = id.env_prefix();
        ProviderDescriptor
        {   id
          , display_name: id.display_name().to_string()
          , base_url: self.get_or(
              &format!("{}_BASE_URL", prefix)
            , id.default_base_url()
            )
          , model: self.get_or(
              &format!("{}_MODEL", prefix)
            , id.default_model()
            )
          , credential: self
              .get(&format!("{}_API_KEY", prefix))
              .map(|k| k.to_string())
        }
    }
}

fn is_relevant_key(key: &str) -> bool
{   key.starts_with("AI_")
      || ProviderId::ALL
        .iter()
        .any(|id| key.starts_with(&format!("{}_", id.env_prefix())))
}

fn split_list(raw: Option<&str>, separator: char) -> Vec<String>
{   raw
      .map(|r| {
        r.split(separator)
          .map(|s| s.trim())
          .filter(|s| !s.is_empty())
          .map(|s| s.to_string())
          .collect()
      })
      .unwrap_or_default()
}

/// Static description of one completion backend
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor
{   pub id: ProviderId
  , pub display_name: String
  , pub base_url: String
  , pub model: String
  , #[serde(skip_serializing)]
    pub credential: Option<String>
}

impl ProviderDescriptor
{   /// Credential present and not the sample placeholder.
    /// Always derived from the credential, never stored.
    pub fn is_usable(&self) -> bool
    {   match self.credential.as_deref().map(str::trim)
        {   Some(key) => {
              !key.is_empty() && key != self.id.placeholder_credential()
            }
          , None => false
        }
    }
}

impl fmt::Debug for ProviderDescriptor
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("ProviderDescriptor")
          .field("id", &self.id)
          .field("display_name", &self.display_name)
          .field("base_url", &self.base_url)
          .field("model", &self.model)
          .field(
            "credential"
          , &self.credential.as_ref().map(|_| "<redacted>")
          )
          .field("usable", &self.is_usable())
          .finish()
    }
}

/// Outcome of resolving configuration
#[derive(Debug, Clone)]
pub struct Resolution
{   /// Provider named by `AI_PROVIDER`
    pub requested: ProviderId
  , /// Provider requests start with; `None` means mock mode
    pub active: Option<ProviderId>
  , /// One descriptor per provider, in priority order
    pub descriptors: Vec<ProviderDescriptor>
}

impl Resolution
{   pub fn descriptor(&self, id: ProviderId) -> Option<&ProviderDescriptor>
    {   self.descriptors.iter().find(|d| d.id == id)
    }

    /// Usable providers in priority order
    pub fn usable(&self) -> Vec<ProviderId>
    {   self.descriptors
          .iter()
          .filter(|d| d.is_usable())
          .map(|d| d.id)
          .collect()
    }

    pub fn is_usable(&self, id: ProviderId) -> bool
    {   self.descriptor(id).map(|d| d.is_usable()).unwrap_or(false)
    }
}

/// Computes which providers are usable and which one is active
pub struct ConfigResolver
{   settings: Settings
}

impl ConfigResolver
{   pub fn new(settings: Settings) -> Self
    {   ConfigResolver { settings }
    }

    pub fn settings(&self) -> &Settings
    {   &self.settings
    }

    /// Never fails: an unusable active provider degrades to the first
    /// usable one, and no usable provider at all means mock mode.
    pub fn resolve(&self) -> Resolution
    {   let requested = match self.settings.get("AI_PROVIDER")
        {   Some(raw) => raw.parse().unwrap_or_else(|_| {
              warn!(
                "Unknown AI_PROVIDER {:?}, using {}"
              , raw, DEFAULT_PROVIDER
              );
              DEFAULT_PROVIDER
            })
          , None => DEFAULT_PROVIDER
        };

        let descriptors: Vec<ProviderDescriptor> = ProviderId::ALL
          .iter()
          .map(|id| self.settings.provider_descriptor(*id))
          .collect();

        let mut resolution = Resolution
        {   requested
          , active: None
          , descriptors
        };

        resolution.active = if resolution.is_usable(requested)
        {   info!("Using {} as AI provider", requested.display_name());
            Some(requested)
        } else
        {   let next = resolution.usable().first().copied();
            match next
            {   Some(id) => warn!(
                  "{} API key not configured, falling back to {}"
                , requested.display_name(), id.display_name()
                )
              , None => warn!(
                  "No AI provider configured, using mock generator"
                )
            }
            next
        };

        resolution
    }
}
