//! Response parser: raw model output text to an ordered action list.
//!
//! Top-level structure is all-or-nothing: unbalanced delimiters or an
//! undecodable list produce an error and no actions. Individual records are
//! best-effort: a record with a bad payload or an unknown type is logged and
//! skipped while the rest of the list survives.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::types::{Action, CommandPayload, ScriptPayload};

/// One record of the wire format: `{"type": ..., "data": {...}}`.
#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Parses raw LLM output into typed actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw reply text into an ordered action list.
    pub fn parse(&self, raw: &str) -> Result<Vec<Action>, ParseError> {
        let cleaned = strip_markers(raw);

        // Opening and closing list delimiters must match before we try to
        // decode anything.
        if cleaned.matches('[').count() != cleaned.matches(']').count() {
            return Err(ParseError::Malformed("unmatched brackets".to_string()));
        }

        let items: Vec<RawItem> = serde_json::from_str(&cleaned)
            .map_err(|e| ParseError::Decode(e.to_string()))?;

        let mut actions = Vec::with_capacity(items.len());
        for item in items {
            match item.kind.as_str() {
                "script" => match serde_json::from_value::<ScriptPayload>(item.data) {
                    Ok(payload) => actions.push(Action::Script {
                        message: payload.message,
                        role: payload.role,
                    }),
                    Err(e) => warn!(error = %e, "Skipping undecodable script item"),
                },
                "command" => match serde_json::from_value::<CommandPayload>(item.data) {
                    Ok(payload) => actions.push(Action::Command {
                        command: payload.command,
                    }),
                    Err(e) => warn!(error = %e, "Skipping undecodable command item"),
                },
                other => debug!(kind = %other, "Ignoring unknown response item type"),
            }
        }
        Ok(actions)
    }
}

/// Remove code-fence markers and surrounding whitespace.
fn strip_markers(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Vec<Action>, ParseError> {
        ResponseParser::new().parse(raw)
    }

    const TWO_ITEMS: &str = r#"[
        {"type":"script","data":{"message":"Listing files.","role":"narration"}},
        {"type":"command","data":{"command":"ls -la"}}
    ]"#;

    #[test]
    fn test_parse_preserves_order() {
        let actions = parse(TWO_ITEMS).unwrap();
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::Script { .. }));
        assert_eq!(
            actions[1],
            Action::Command {
                command: "ls -la".to_string()
            }
        );
    }

    #[test]
    fn test_fence_stripping_is_idempotent() {
        let bare = parse(TWO_ITEMS).unwrap();
        let fenced = parse(&format!("```json\n{}\n```", TWO_ITEMS)).unwrap();
        let double_wrapped = parse(&format!("```json\n```json\n{}\n```\n```", TWO_ITEMS)).unwrap();
        assert_eq!(bare, fenced);
        assert_eq!(bare, double_wrapped);
    }

    #[test]
    fn test_plain_fence_without_language_tag() {
        let fenced = format!("```\n{}\n```", TWO_ITEMS);
        assert_eq!(parse(&fenced).unwrap(), parse(TWO_ITEMS).unwrap());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let padded = format!("\n\n   {}   \n", TWO_ITEMS);
        assert_eq!(parse(&padded).unwrap().len(), 2);
    }

    #[test]
    fn test_unbalanced_brackets_is_malformed() {
        let err = parse(r#"[{"type":"command""#).unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_balanced_but_invalid_json_is_decode_error() {
        let err = parse(r#"[{"type": nope}]"#).unwrap_err();
        assert!(matches!(err, ParseError::Decode(_)));
    }

    #[test]
    fn test_top_level_failure_yields_no_partial_result() {
        // First element is fine, but the trailing garbage fails the whole list.
        let err = parse(r#"[{"type":"command","data":{"command":"ls"}}, oops]"#).unwrap_err();
        assert!(matches!(err, ParseError::Decode(_)));
    }

    #[test]
    fn test_bad_script_payload_is_skipped() {
        let actions = parse(
            r#"[
                {"type":"script","data":{"message":"no role here"}},
                {"type":"command","data":{"command":"uptime"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::Command { .. }));
    }

    #[test]
    fn test_bad_command_payload_is_skipped() {
        let actions = parse(
            r#"[
                {"type":"command","data":{"cmd":"wrong key"}},
                {"type":"script","data":{"message":"hi","role":"narration"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::Script { .. }));
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let actions = parse(
            r#"[
                {"type":"thought","data":{"message":"internal"}},
                {"type":"command","data":{"command":"date"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_missing_data_field_is_skipped_not_fatal() {
        let actions = parse(r#"[{"type":"command"}]"#).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_empty_list() {
        assert!(parse("[]").unwrap().is_empty());
        assert!(parse("```json\n[]\n```").unwrap().is_empty());
    }

    #[test]
    fn test_conclusion_role_survives_decoding() {
        let actions = parse(
            r#"[{"type":"script","data":{"message":"All done.","role":"conclusion"}}]"#,
        )
        .unwrap();
        assert_eq!(
            actions[0],
            Action::Script {
                message: "All done.".to_string(),
                role: "conclusion".to_string()
            }
        );
    }

    #[test]
    fn test_brackets_inside_strings_count_toward_balance() {
        // Known limitation of the balance heuristic: the counts still match
        // here because the string contains a balanced pair.
        let actions = parse(r#"[{"type":"command","data":{"command":"echo [ok]"}}]"#).unwrap();
        assert_eq!(actions.len(), 1);
    }
}
