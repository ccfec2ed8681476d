//! Best-effort masking of banned terms and patterns.
//! Not a moderation guarantee: it only hides what it is told to look for.

use std::collections::HashSet;
use log::warn;
use regex::Regex;
use serde::Serialize;

/// Replacement for every masked match
pub const MASK: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport
{   pub is_safe: bool
  , pub filtered_content: String
  , pub issues: Vec<String>
}

/// Immutable banned term / pattern set, built once at startup.
/// Swap in a whole new filter to change the lists.
#[derive(Debug, Clone, Default)]
pub struct ContentSafetyFilter
{   terms: Vec<String>
  , patterns: Vec<Regex>
}

impl ContentSafetyFilter
{   pub fn new<T, P>(terms: T, patterns: P)
      -> Result<Self, crate::error::Error>
    where
      T: IntoIterator
    , T::Item: Into<String>
    , P: IntoIterator
    , P::Item: AsRef<str>
    {   let mut seen = HashSet::new();
        let terms: Vec<String> = terms
          .into_iter()
          .map(Into::into)
          .filter(|t: &String| !t.is_empty())
          .filter(|t| seen.insert(t.clone()))
          .collect();

        // a term sharing characters with the mask could be rebuilt by it
        if let Some(term) = terms
          .iter()
          .find(|t| t.chars().any(|c| MASK.contains(c)))
        {   return Err(crate::error::Error::InvalidConfiguration(format!(
              "banned term {:?} overlaps the mask {:?}"
            , term, MASK
            )));
        }

        let patterns = patterns
          .into_iter()
          .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| {
              crate::error::Error::InvalidPattern
              {   pattern: p.as_ref().to_string()
                , source
              }
            })
          })
          .collect::<Result<Vec<_>, _>>()?;

        Ok(ContentSafetyFilter { terms, patterns })
    }

    pub fn from_settings(settings: &crate::config::Settings)
      -> Result<Self, crate::error::Error>
    {   ContentSafetyFilter::new(
          settings.banned_terms()
        , settings.banned_patterns()
        )
    }

    pub fn check_content(&self, text: &str) -> SafetyReport
    {   if text.is_empty()
        {   return SafetyReport
            {   is_safe: true
              , filtered_content: String::new()
              , issues: vec![]
            };
        }

        let mut issues = Vec::new();
        let mut filtered = text.to_string();

        for term in &self.terms
        {   if text.contains(term.as_str())
            {   issues.push(format!("banned term: {}", term));
                filtered = filtered.replace(term.as_str(), MASK);
            }
        }

        for pattern in &self.patterns
        {   if pattern.is_match(text)
            {   issues.push(format!("banned pattern: {}", pattern.as_str()));
                filtered = pattern
                  .replace_all(&filtered, MASK)
                  .into_owned();
            }
        }

        if !issues.is_empty()
        {   warn!("Content safety check found: {}", issues.join(", "));
        }

        SafetyReport
        {   is_safe: issues.is_empty()
          , filtered_content: filtered
          , issues
        }
    }
}
