pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod failover;
pub mod client;
pub mod prompt;
pub mod safety;
pub mod truncate;
pub mod social;
pub mod mock;
use serde::{Deserialize, Serialize};

/*

contentgen: marketing copy, product descriptions and social posts
from whichever completion backend is configured, with an automatic
fail-over to the other backends and finally to a local mock generator
so a caller always gets a structured result back.

contentgen/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Provider ids and re-exports
│   ├── error.rs        # Provider failures and fatal errors
│   ├── config.rs       # Settings, descriptors, active provider resolution
│   ├── request.rs      # Content requests and generation results
│   ├── prompt.rs       # Prompt rendering per content type and locale
│   ├── safety.rs       # Banned term / pattern masking
│   ├── truncate.rs     # Length bounding at a sensible boundary
│   ├── social.rs       # Divider splitting and hashtag extraction
│   ├── mock.rs         # Deterministic template generator
│   ├── providers/      # Generic chat-completions client
│   ├── failover.rs     # Per-request provider selection and fallback
│   ├── client.rs       # GenerationFacade, the public entry point
│   └── bin/            # contentgen CLI
└── tests/

*/

pub use client::GenerationFacade;
pub use config::{ConfigResolver, ProviderDescriptor, Resolution, Settings};
pub use error::{Error, ProviderError, ProviderErrorKind};
pub use failover::FallbackOrchestrator;
pub use mock::MockGenerator;
pub use prompt::{PromptBuilder, POST_DIVIDER};
pub use providers::{ContentProvider, ProviderClient};
pub use request::{
  ContentRequest, GenerationResult, Length, MarketingCopyParams
, ProductDescParams, SocialContentParams, Usage
};
pub use safety::{ContentSafetyFilter, SafetyReport};
pub use social::{extract_hashtags, parse_social_posts, split_posts, SocialPost};
pub use truncate::truncate;

/// Completion backends the crate knows how to talk to.
/// Declaration order is the fallback priority order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord
, Hash, Deserialize, Serialize
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId
{
  /// SiliconFlow (Qwen and other hosted open models)
  SiliconFlow
  ,
  /// OpenAI (GPT-4o family)
  OpenAI
  ,
  /// Moonshot AI (Kimi, moonshot-v1 models)
  Moonshot
}

impl ProviderId
{   /// Every provider, in fallback priority order.
    pub const ALL: [ProviderId; 3] = [
      ProviderId::SiliconFlow
    , ProviderId::OpenAI
    , ProviderId::Moonshot
    ];

    /// Identifier used by `AI_PROVIDER`.
    pub fn as_str(&self) -> &'static str
    {   match self
        {   ProviderId::SiliconFlow => "siliconflow"
          , ProviderId::OpenAI => "openai"
          , ProviderId::Moonshot => "moonshot"
        }
    }

    /// Prefix of this provider's configuration keys.
    pub fn env_prefix(&self) -> &'static str
    {   match self
        {   ProviderId::SiliconFlow => "SILICONFLOW"
          , ProviderId::OpenAI => "OPENAI"
          , ProviderId::Moonshot => "MOONSHOT"
        }
    }

    pub fn display_name(&self) -> &'static str
    {   match self
        {   ProviderId::SiliconFlow => "SiliconFlow"
          , ProviderId::OpenAI => "OpenAI"
          , ProviderId::Moonshot => "Moonshot"
        }
    }

    pub fn default_base_url(&self) -> &'static str
    {   match self
        {   ProviderId::SiliconFlow => "https://api.siliconflow.cn/v1"
          , ProviderId::OpenAI => "https://api.openai.com/v1"
          , ProviderId::Moonshot => "https://api.moonshot.cn/v1"
        }
    }

    pub fn default_model(&self) -> &'static str
    {   match self
        {   ProviderId::SiliconFlow => "Qwen/Qwen2.5-7B-Instruct"
          , ProviderId::OpenAI => "gpt-4o-mini"
          , ProviderId::Moonshot => "moonshot-v1-8k"
        }
    }

    /// Credential value shipped in sample configuration files.
    /// A key equal to this is treated as absent.
    pub fn placeholder_credential(&self) -> &'static str
    {   match self
        {   ProviderId::SiliconFlow => "your-siliconflow-api-key"
          , ProviderId::OpenAI => "your-openai-api-key"
          , ProviderId::Moonshot => "your-moonshot-api-key"
        }
    }
}

impl std::fmt::Display for ProviderId
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_lowercase().as_str()
        {   "siliconflow" => Ok(ProviderId::SiliconFlow)
          , "openai" => Ok(ProviderId::OpenAI)
          , "moonshot" => Ok(ProviderId::Moonshot)
          , other => Err(crate::error::Error::InvalidConfiguration(
              format!("unknown provider: {}", other)
            ))
        }
    }
}
