//! Output length bounding

/// Appended when no good boundary exists
pub const ELLIPSIS: &str = "...";

/// A cut after a boundary must keep at least this share of the limit
const MIN_BOUNDARY_RATIO: f64 = 0.7;

fn is_boundary(c: char) -> bool
{   matches!(
      c
    , '.' | '。' | '!' | '！' | '?' | '？' | ',' | '，' | '\n'
    )
}

/// Bound `text` to `max_len` characters.
///
/// Cuts right after the last sentence/clause punctuation or newline
/// in the allowed prefix when it sits at or beyond 70% of the limit,
/// otherwise hard-cuts and appends [`ELLIPSIS`]. Counts chars, so a
/// multi-byte code point is never split.
pub fn truncate(text: &str, max_len: usize) -> String
{   let total = text.chars().count();
    if total <= max_len
    {   return text.to_string();
    }

    let prefix: String = text.chars().take(max_len).collect();
    let last_boundary = prefix
      .chars()
      .enumerate()
      .filter(|(_, c)| is_boundary(*c))
      .map(|(i, _)| i)
      .last();

    if let Some(index) = last_boundary
    {   if index as f64 >= max_len as f64 * MIN_BOUNDARY_RATIO
        {   return prefix.chars().take(index + 1).collect();
        }
    }

    prefix + ELLIPSIS
}
