// Decoding of model replies to grammar prompts

use serde::Deserialize;

use super::{CheckResult, Verdict};

pub const FALLBACK_CORRECTION: &str = "Could not parse the AI response. Please try again.";

pub fn grammar_prompt(text: &str) -> String {
    format!(
        "Check grammar for: \"{text}\". Return valid JSON format only: \
         {{ \"status\": \"Correct\" or \"Incorrect\", \"correction\": \"explanation or corrected text\" }}"
    )
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReplyBody {
    status: Verdict,
    correction: String,
}

/// Remove markdown code fences the model likes to wrap JSON in.
fn strip_fences(raw: &str) -> String {
    if raw.contains("```json") {
        raw.replace("```json", "").replace("```", "")
    } else if raw.contains("```") {
        raw.replace("```", "")
    } else {
        raw.to_string()
    }
}

/// Decode a model reply into a [`CheckResult`] for `text`.
///
/// Anything that is not exactly `{"status": "Correct"|"Incorrect", "correction": "..."}`
/// (after fence stripping) yields an `Incorrect` result carrying [`FALLBACK_CORRECTION`].
pub fn parse_check_response(text: &str, raw: &str) -> CheckResult {
    let cleaned = strip_fences(raw);
    match serde_json::from_str::<ReplyBody>(cleaned.trim()) {
        Ok(body) => CheckResult {
            status: body.status,
            correction: body.correction,
            original_text: text.to_string(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "unparseable grammar reply");
            CheckResult {
                status: Verdict::Incorrect,
                correction: FALLBACK_CORRECTION.to_string(),
                original_text: text.to_string(),
            }
        }
    }
}
