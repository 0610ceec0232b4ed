// Language model response parsing
// Pulls the JSON feedback object out of free text that may wrap it in Markdown fences

use crate::coaching::types::CoachingFeedback;
use crate::coaching::CoachingError;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Parse coaching feedback from a model response
///
/// Looks for a ```json fenced block first, then any fenced block, then the
/// whole text, and parses the outermost `{...}` span found there.
pub fn parse_feedback_response(content: &str) -> Result<CoachingFeedback, CoachingError> {
    let candidate = fenced_block(content, JSON_FENCE)
        .or_else(|| fenced_block(content, FENCE))
        .unwrap_or(content);

    let json = object_span(candidate).ok_or(CoachingError::NoJsonFound)?;
    Ok(serde_json::from_str(json)?)
}

/// Text between `opening` and the next closing fence (or the end of input)
fn fenced_block<'a>(content: &'a str, opening: &str) -> Option<&'a str> {
    let start = content.find(opening)? + opening.len();
    let rest = &content[start..];
    let end = rest.find(FENCE).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Outermost `{ ... }` span
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
