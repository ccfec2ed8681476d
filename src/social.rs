//! Splitting multi-post social content and pulling out hashtags

use std::sync::OnceLock;
use log::debug;
use regex::Regex;
use serde::Serialize;
use crate::prompt::POST_DIVIDER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialPost
{   pub text: String
  , pub hashtags: Vec<String>
}

fn hashtag_regex() -> &'static Regex
{   static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
      Regex::new(
        r"#([\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}A-Za-z0-9_]+)"
      ).expect("hashtag pattern is valid")
    })
}

fn numbered_item_regex() -> &'static Regex
{   static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
      Regex::new(r"(?m)^\s*(?:\d+|[一二三四五六七八九十]+)\s*[.、)）:：]\s*")
        .expect("numbered item pattern is valid")
    })
}

/// Tags in order of first appearance, without the `#`.
/// Duplicates are kept.
pub fn extract_hashtags(text: &str) -> Vec<String>
{   hashtag_regex()
      .captures_iter(text)
      .map(|c| c[1].to_string())
      .collect()
}

/// Split on [`POST_DIVIDER`]; blank segments are dropped
pub fn split_posts(content: &str) -> Vec<String>
{   content
      .split(POST_DIVIDER)
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| s.to_string())
      .collect()
}

/// Split social content into posts.
///
/// When the divider is missing but `expected` posts were asked for, a
/// numbered list ("1. ..", "2、..") is tried and kept only if it yields
/// exactly `expected` entries; any lead-in before the first item stays
/// with the first post. Otherwise the whole text is one post.
pub fn parse_social_posts(content: &str, expected: usize) -> Vec<SocialPost>
{   let mut posts = split_posts(content);

    if posts.len() == 1 && expected > 1
    {   let numbered = split_numbered(&posts[0]);
        if numbered.len() == expected
        {   debug!("Divider missing, split {} numbered posts", expected);
            posts = numbered;
        } else
        {   debug!(
              "Divider missing, keeping one block (numbered split gave {})"
            , numbered.len()
            );
        }
    }

    posts
      .into_iter()
      .map(|text| SocialPost
      {   hashtags: extract_hashtags(&text)
        , text
      })
      .collect()
}

fn split_numbered(block: &str) -> Vec<String>
{   let starts: Vec<(usize, usize)> = numbered_item_regex()
      .find_iter(block)
      .map(|m| (m.start(), m.end()))
      .collect();
    if starts.is_empty()
    {   return vec![];
    }

    let mut items: Vec<String> = starts
      .iter()
      .enumerate()
      .map(|(i, (_, body_start))| {
        let end = starts
          .get(i + 1)
          .map(|(next_start, _)| *next_start)
          .unwrap_or(block.len());
        block[*body_start..end].trim().to_string()
      })
      .filter(|s| !s.is_empty())
      .collect();

    let preamble = block[..starts[0].0].trim();
    if !preamble.is_empty()
    {   if let Some(first) = items.first_mut()
        {   *first = format!("{}\n{}", preamble, first);
        }
    }
    items
}
