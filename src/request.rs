//! Content requests and generation results

use serde::{Deserialize, Serialize};

/// Default number of social posts per request
pub const DEFAULT_POST_COUNT: u32 = 3;

/// Target length of a marketing copy
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum Length
{   Short
  , #[default]
    Medium
  , Long
}

impl Length
{   /// Target character range the prompt asks for
    pub fn char_range(&self) -> (u32, u32)
    {   match self
        {   Length::Short => (30, 50)
          , Length::Medium => (100, 200)
          , Length::Long => (300, 500)
        }
    }

    pub fn as_str(&self) -> &'static str
    {   match self
        {   Length::Short => "short"
          , Length::Medium => "medium"
          , Length::Long => "long"
        }
    }
}

impl std::str::FromStr for Length
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_lowercase().as_str()
        {   "short" => Ok(Length::Short)
          , "medium" => Ok(Length::Medium)
          , "long" => Ok(Length::Long)
          , other => Err(crate::error::Error::InvalidRequest(
              format!("unknown length: {}", other)
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingCopyParams
{   pub product: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>
  , #[serde(default)]
    pub length: Length
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescParams
{   pub product_name: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialContentParams
{   pub platform: String
  , pub topic: String
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>
}

impl SocialContentParams
{   pub fn count(&self) -> u32
    {   self.count.unwrap_or(DEFAULT_POST_COUNT)
    }
}

/// One generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentRequest
{   MarketingCopy(MarketingCopyParams)
  , ProductDesc(ProductDescParams)
  , SocialContent(SocialContentParams)
}

impl ContentRequest
{   /// Record type used by the storage layer
    pub fn content_type(&self) -> &'static str
    {   match self
        {   ContentRequest::MarketingCopy(_) => "marketing-copy"
          , ContentRequest::ProductDesc(_) => "product-desc"
          , ContentRequest::SocialContent(_) => "social-content"
        }
    }

    /// Parameters as JSON, the form generation records store them in
    pub fn serialized_params(&self) -> String
    {   let encoded = match self
        {   ContentRequest::MarketingCopy(p) => serde_json::to_string(p)
          , ContentRequest::ProductDesc(p) => serde_json::to_string(p)
          , ContentRequest::SocialContent(p) => serde_json::to_string(p)
        };
        encoded.unwrap_or_else(|_| "{}".to_string())
    }

    /// Number of items requested; scales the output length limit
    pub fn item_count(&self) -> usize
    {   match self
        {   ContentRequest::SocialContent(p) => p.count().max(1) as usize
          , _ => 1
        }
    }

    /// Reject requests no provider could answer
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let missing = |field: &str| {
          Err(crate::error::Error::InvalidRequest(
            format!("{} must not be empty", field)
          ))
        };
        match self
        {   ContentRequest::MarketingCopy(p) => {
              if p.product.trim().is_empty()
              {   return missing("product");
              }
            }
          , ContentRequest::ProductDesc(p) => {
              if p.product_name.trim().is_empty()
              {   return missing("productName");
              }
            }
          , ContentRequest::SocialContent(p) => {
              if p.platform.trim().is_empty()
              {   return missing("platform");
              }
              if p.topic.trim().is_empty()
              {   return missing("topic");
              }
              if p.count == Some(0)
              {   return Err(crate::error::Error::InvalidRequest(
                    "count must be a positive integer".to_string()
                  ));
              }
            }
        }
        Ok(())
    }
}

/// Token accounting reported by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage
{   pub prompt_tokens: u32
  , pub completion_tokens: u32
  , pub total_tokens: u32
}

/// Outcome handed back to the caller.
/// `success` implies `content`; failure implies `error` and no content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult
{   success: bool
  , content: Option<String>
  , error: Option<String>
  , #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<Usage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>
}

impl GenerationResult
{   pub fn success(
      content: String
    , provider: impl Into<String>
    , usage: Option<Usage>
    ) -> Self
    {   GenerationResult
        {   success: true
          , content: Some(content)
          , error: None
          , usage
          , provider: Some(provider.into())
        }
    }

    pub fn failure(error: impl Into<String>) -> Self
    {   GenerationResult
        {   success: false
          , content: None
          , error: Some(error.into())
          , usage: None
          , provider: None
        }
    }

    pub fn is_success(&self) -> bool
    {   self.success
    }

    pub fn content(&self) -> Option<&str>
    {   self.content.as_deref()
    }

    pub fn error(&self) -> Option<&str>
    {   self.error.as_deref()
    }

    pub fn usage(&self) -> Option<Usage>
    {   self.usage
    }

    /// Backend that produced the content
    pub fn provider(&self) -> Option<&str>
    {   self.provider.as_deref()
    }
}
