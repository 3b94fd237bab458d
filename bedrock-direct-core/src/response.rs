//! Response decomposition
//!
//! Claude responses are a sequence of typed content blocks. The decomposer
//! keeps the thinking trace and the final text, then opportunistically looks
//! for a JSON object embedded in the text.
//!
//! The embedded-JSON scan takes everything from the first `{` to the last `}`.
//! Prose containing stray braces before or after the object produces a span
//! that fails to parse, in which case no fields are extracted.

use crate::error::InvokeError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key reserved for the thinking trace; never taken from embedded JSON
pub const THINKING_KEY: &str = "thinking";

/// Key under which the response text appears in [`InvocationResult::to_map`]
pub const RESPONSE_KEY: &str = "response";

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
    thinking: Option<String>,
}

/// Result of a successful invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationResult {
    /// Text of the last text block, if any
    pub response_text: Option<String>,
    /// Extended thinking trace, if the model produced one
    pub reasoning_text: Option<String>,
    /// Fields recovered from a JSON object embedded in the response text
    pub extra_fields: Map<String, Value>,
}

impl InvocationResult {
    /// Decompose a raw `InvokeModel` response body
    pub fn from_response_body(body: &[u8]) -> Result<Self, InvokeError> {
        let parsed: ResponseBody = serde_json::from_slice(body)
            .map_err(|e| InvokeError::MalformedResponse(e.to_string()))?;

        let mut result = Self::default();
        for block in parsed.content {
            match block.kind.as_deref() {
                Some("thinking") => {
                    result.reasoning_text = block.thinking;
                    log::info!("Extended thinking content received");
                }
                Some("text") => result.response_text = block.text,
                _ => {}
            }
        }

        if let Some(text) = result.response_text.as_deref().filter(|t| !t.is_empty()) {
            match extract_embedded_json(text) {
                Some(fields) => {
                    result.extra_fields = fields
                        .into_iter()
                        .filter(|(key, _)| key != THINKING_KEY)
                        .collect();
                }
                None => log::debug!("No valid JSON found in response text"),
            }
        }

        Ok(result)
    }

    /// Look up a field in the merged view
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }

    /// Flatten into a single map
    ///
    /// Contains `"thinking"` and `"response"` when present, then every
    /// extracted field. Extracted fields replace same-named entries, so an
    /// embedded `"response"` key wins over the raw text.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(thinking) = &self.reasoning_text {
            map.insert(THINKING_KEY.to_string(), Value::String(thinking.clone()));
        }
        if let Some(text) = &self.response_text {
            map.insert(RESPONSE_KEY.to_string(), Value::String(text.clone()));
        }
        for (key, value) in &self.extra_fields {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

impl Serialize for InvocationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// Parse the span from the first `{` to the last `}` as a JSON object
pub fn extract_embedded_json(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decompose(body: Value) -> InvocationResult {
        InvocationResult::from_response_body(body.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_text_only_response() {
        let result = decompose(json!({
            "content": [{"type": "text", "text": "Paris."}]
        }));
        assert_eq!(result.response_text.as_deref(), Some("Paris."));
        assert!(result.reasoning_text.is_none());
        assert!(result.extra_fields.is_empty());
    }

    #[test]
    fn test_thinking_and_text_blocks() {
        let result = decompose(json!({
            "content": [
                {"type": "thinking", "thinking": "The user wants a capital.", "signature": "abc"},
                {"type": "text", "text": "Paris."}
            ]
        }));
        assert_eq!(
            result.reasoning_text.as_deref(),
            Some("The user wants a capital.")
        );
        assert_eq!(result.response_text.as_deref(), Some("Paris."));
    }

    #[test]
    fn test_last_text_block_wins() {
        let result = decompose(json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"},
                {"type": "text", "text": "third"}
            ]
        }));
        assert_eq!(result.response_text.as_deref(), Some("third"));
    }

    #[test]
    fn test_unknown_blocks_and_missing_content_are_ignored() {
        let result = decompose(json!({
            "content": [
                {"type": "redacted_thinking", "data": "xyz"},
                {"text": "untyped"}
            ]
        }));
        assert_eq!(result, InvocationResult::default());

        let result = decompose(json!({"id": "msg_1", "stop_reason": "end_turn"}));
        assert_eq!(result, InvocationResult::default());
    }

    #[test]
    fn test_invalid_body_is_malformed() {
        let err = InvocationResult::from_response_body(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, InvokeError::MalformedResponse(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_embedded_json_extracted_without_touching_thinking() {
        let result = decompose(json!({
            "content": [
                {"type": "thinking", "thinking": "real trace"},
                {"type": "text", "text": "prefix {\"foo\": 1, \"thinking\": \"ignored\"} suffix"}
            ]
        }));
        assert_eq!(result.extra_fields.get("foo"), Some(&json!(1)));
        assert!(result.extra_fields.get("thinking").is_none());
        assert_eq!(result.reasoning_text.as_deref(), Some("real trace"));
        assert_eq!(result.get("thinking"), Some(json!("real trace")));
    }

    #[test]
    fn test_malformed_embedded_json_is_ignored() {
        let result = decompose(json!({
            "content": [{"type": "text", "text": "{not json"}]
        }));
        assert_eq!(result.response_text.as_deref(), Some("{not json"));
        assert!(result.extra_fields.is_empty());
    }

    #[test]
    fn test_embedded_response_key_overrides_merged_view() {
        let text = "Here you go: {\"response\": \"short answer\", \"score\": 0.9}";
        let result = decompose(json!({
            "content": [{"type": "text", "text": text}]
        }));

        assert_eq!(result.response_text.as_deref(), Some(text));
        let map = result.to_map();
        assert_eq!(map["response"], json!("short answer"));
        assert_eq!(map["score"], json!(0.9));
    }

    #[test]
    fn test_serialize_matches_merged_view() {
        let result = decompose(json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "{\"answer\": [1, 2]}"}
            ]
        }));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "thinking": "hmm",
                "response": "{\"answer\": [1, 2]}",
                "answer": [1, 2]
            })
        );
    }

    #[test]
    fn test_extract_embedded_json_boundaries() {
        assert_eq!(
            extract_embedded_json("a {\"x\": {\"y\": 2}} b").unwrap()["x"],
            json!({"y": 2})
        );
        assert!(extract_embedded_json("no braces").is_none());
        assert!(extract_embedded_json("} backwards {").is_none());
        assert!(extract_embedded_json("{\"a\": 1} and {\"b\": 2}").is_none());
        assert!(extract_embedded_json("[1, 2] {}").unwrap().is_empty());
    }

    #[test]
    fn test_empty_text_skips_extraction() {
        let result = decompose(json!({
            "content": [{"type": "text", "text": ""}]
        }));
        assert_eq!(result.response_text.as_deref(), Some(""));
        assert!(result.extra_fields.is_empty());
    }
}
