//! Chat-completions envelope shared by every supported backend

use serde::{Deserialize, Serialize};

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "system".to_string()
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: "user".to_string()
          , content: content.into()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
  , pub max_tokens: u32
}

// ===== Response Types =====
// Every field is optional so a missing completion surfaces as an
// empty response instead of a decode failure.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default)]
    pub usage: Option<WireUsage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireUsage
{   #[serde(default)]
    pub prompt_tokens: u32
  , #[serde(default)]
    pub completion_tokens: u32
  , #[serde(default)]
    pub total_tokens: u32
}

impl From<WireUsage> for crate::request::Usage
{   fn from(u: WireUsage) -> Self
    {   crate::request::Usage
        {   prompt_tokens: u.prompt_tokens
          , completion_tokens: u.completion_tokens
          , total_tokens: u.total_tokens
        }
    }
}

impl ChatResponse
{   /// Text of the first completion, if it is non-blank
    pub fn first_content(&self) -> Option<&str>
    {   self.choices
          .first()
          .and_then(|c| c.message.as_ref())
          .and_then(|m| m.content.as_deref())
          .filter(|c| !c.trim().is_empty())
    }
}
