use std::fmt;
use thiserror::Error;
use crate::ProviderId;

/// Category of a provider-scoped failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind
{   /// Credential missing or still the placeholder value
    NotConfigured
  , /// Upstream rejected the credential (401)
    Unauthorized
  , /// Upstream rejected the request parameters (400)
    BadRequest
  , /// Upstream rate limit hit (429)
    RateLimited
  , /// Upstream internal error (500)
    ServerError
  , /// Response carried no completion text
    EmptyResponse
  , /// Transport failure, including timeouts
    Network
  , /// Anything else
    Unknown
}

impl fmt::Display for ProviderErrorKind
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   let name = match self
        {   ProviderErrorKind::NotConfigured => "not configured"
          , ProviderErrorKind::Unauthorized => "unauthorized"
          , ProviderErrorKind::BadRequest => "bad request"
          , ProviderErrorKind::RateLimited => "rate limited"
          , ProviderErrorKind::ServerError => "server error"
          , ProviderErrorKind::EmptyResponse => "empty response"
          , ProviderErrorKind::Network => "network error"
          , ProviderErrorKind::Unknown => "unknown error"
        };
        f.write_str(name)
    }
}

/// Failure of a single provider attempt.
/// Returned as a value to the orchestrator, never thrown past it.
#[derive(Debug, Error)]
#[error("{provider} {kind}: {message}")]
pub struct ProviderError
{   pub kind: ProviderErrorKind
  , pub provider: ProviderId
  , pub status: Option<u16>
  , pub message: String
  , #[source]
    pub source: Option<reqwest::Error>
}

impl ProviderError
{   pub fn new(
      kind: ProviderErrorKind
    , provider: ProviderId
    , message: impl Into<String>
    ) -> Self
    {   ProviderError
        {   kind
          , provider
          , status: None
          , message: message.into()
          , source: None
        }
    }

    pub fn not_configured(provider: ProviderId) -> Self
    {   ProviderError::new(
          ProviderErrorKind::NotConfigured
        , provider
        , format!("{} API key not configured", provider.display_name())
        )
    }

    pub fn empty_response(provider: ProviderId) -> Self
    {   ProviderError::new(
          ProviderErrorKind::EmptyResponse
        , provider
        , "API returned empty content"
        )
    }

    /// Map a non-success upstream status to a failure.
    /// `body` is the raw response text, used for 400 details.
    pub fn from_status(
      provider: ProviderId
    , status: u16
    , body: &str
    ) -> Self
    {   let (kind, message) = match status
        {   401 => (
              ProviderErrorKind::Unauthorized
            , format!("{} API key is invalid", provider.display_name())
            )
          , 400 => (
              ProviderErrorKind::BadRequest
            , format!(
                "API request parameter error: {}"
              , upstream_detail(body)
                  .unwrap_or_else(|| "Unknown error".to_string())
              )
            )
          , 429 => (
              ProviderErrorKind::RateLimited
            , "API rate limit exceeded, please try again later".to_string()
            )
          , 500 => (
              ProviderErrorKind::ServerError
            , format!(
                "{} server error, please try again later"
              , provider.display_name()
              )
            )
          , other => (
              ProviderErrorKind::Unknown
            , format!("unexpected upstream status {}", other)
            )
        };
        ProviderError
        {   kind
          , provider
          , status: Some(status)
          , message
          , source: None
        }
    }

    /// Transport level failure (connect, timeout, body read)
    pub fn network(provider: ProviderId, source: reqwest::Error) -> Self
    {   let message = if source.is_timeout()
        {   "request timed out".to_string()
        } else
        {   source.to_string()
        };
        ProviderError
        {   kind: ProviderErrorKind::Network
          , provider
          , status: source.status().map(|s| s.as_u16())
          , message
          , source: Some(source)
        }
    }
}

/// Pull `error.message` out of an OpenAI-style error body
fn upstream_detail(body: &str) -> Option<String>
{   let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
      .pointer("/error/message")
      .and_then(|m| m.as_str())
      .map(|m| m.to_string())
}

/// Fatal errors: bad configuration at startup or broken internal state.
/// Provider failures never show up here.
#[derive(Debug, Error)]
pub enum Error
{   #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String)
  , #[error("Invalid banned pattern {pattern:?}: {source}")]
    InvalidPattern
    {   pattern: String
      , #[source]
        source: regex::Error
    }
  , #[error("Invalid request: {0}")]
    InvalidRequest(String)
  , #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error)
  , #[error("Provider is not usable: {0}")]
    ProviderNotUsable(ProviderId)
  , #[error("Internal error: {0}")]
    Internal(String)
}
