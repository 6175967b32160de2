// Anthropic API Types
// The subset of the Messages wire format this simulator emits, including the
// named SSE events used while streaming.
// Reference: https://docs.anthropic.com/en/api/messages

use crate::errors::{ApiError, Surface};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The simulator never tokenizes prompts; it reports this fixed count
pub const STUB_INPUT_TOKENS: u32 = 10;

/// Inbound messages request, parsed leniently from raw JSON
#[derive(Debug, Clone)]
pub struct MessagesRequest {
    pub model: Option<String>,
    pub stream: bool,
}

impl MessagesRequest {
    /// Validate the request body: `messages` must be present and an array.
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        if !body.get("messages").is_some_and(Value::is_array) {
            return Err(ApiError::validation(
                Surface::Anthropic,
                "Invalid request: messages field is required and must be an array",
            ));
        }

        Ok(Self {
            model: body
                .get("model")
                .and_then(Value::as_str)
                .map(str::to_string),
            stream: body.get("stream").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl MessagesUsage {
    /// Usage for a reply of the given character count
    pub fn for_reply(output_tokens: u32) -> Self {
        Self {
            input_tokens: STUB_INPUT_TOKENS,
            output_tokens,
        }
    }
}

/// A text content block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Messages response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub response_type: String,
    pub role: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub stop_sequence: Option<String>,
    pub usage: MessagesUsage,
}

impl MessagesResponse {
    pub fn new(id: String, model: String, content: String, usage: MessagesUsage) -> Self {
        Self {
            id,
            response_type: "message".to_string(),
            role: "assistant".to_string(),
            content: vec![ContentBlock::text(content)],
            model,
            stop_reason: Some("end_turn".to_string()),
            stop_sequence: None,
            usage,
        }
    }
}

/// Generate a response id in the messages convention
pub fn message_id() -> String {
    format!("msg_{}", uuid::Uuid::new_v4())
}

/// Payload of the `message_start` stream event: the message shell with
/// empty content, sent before any character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStartEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub message: MessagesResponse,
}

impl MessageStartEvent {
    pub fn new(id: String, model: String) -> Self {
        let message = MessagesResponse {
            id,
            response_type: "message".to_string(),
            role: "assistant".to_string(),
            content: vec![],
            model,
            stop_reason: None,
            stop_sequence: None,
            usage: MessagesUsage::for_reply(0),
        };
        Self {
            event_type: "message_start".to_string(),
            message,
        }
    }
}

/// Payload of the `content_block_start` stream event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockStartEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub index: u32,
    pub content_block: ContentBlock,
}

impl ContentBlockStartEvent {
    pub fn new() -> Self {
        Self {
            event_type: "content_block_start".to_string(),
            index: 0,
            content_block: ContentBlock::text(""),
        }
    }
}

impl Default for ContentBlockStartEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-character text delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDelta {
    #[serde(rename = "type")]
    pub delta_type: String,
    pub text: String,
}

/// Payload of the `content_block_delta` stream event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockDeltaEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub index: u32,
    pub delta: TextDelta,
}

impl ContentBlockDeltaEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            event_type: "content_block_delta".to_string(),
            index: 0,
            delta: TextDelta {
                delta_type: "text_delta".to_string(),
                text: text.into(),
            },
        }
    }
}

/// Payload of the `content_block_stop` stream event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockStopEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub index: u32,
}

impl ContentBlockStopEvent {
    pub fn new() -> Self {
        Self {
            event_type: "content_block_stop".to_string(),
            index: 0,
        }
    }
}

impl Default for ContentBlockStopEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload of the `message_stop` stream event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStopEvent {
    #[serde(rename = "type")]
    pub event_type: String,
}

impl MessageStopEvent {
    pub fn new() -> Self {
        Self {
            event_type: "message_stop".to_string(),
        }
    }
}

impl Default for MessageStopEvent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_requires_messages_array() {
        let err = MessagesRequest::from_value(&json!({"model": "claude-3"})).unwrap_err();
        assert!(matches!(err, ApiError::Validation { surface: Surface::Anthropic, .. }));

        assert!(MessagesRequest::from_value(&json!({"messages": []})).is_ok());
    }

    #[test]
    fn test_response_serialization() {
        let response = MessagesResponse::new(
            message_id(),
            "claude-3-sonnet-20240229".to_string(),
            "Hi there".to_string(),
            MessagesUsage::for_reply(8),
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "Hi there");
        assert_eq!(json["stop_reason"], "end_turn");
        assert_eq!(json["stop_sequence"], serde_json::Value::Null);
        assert_eq!(json["usage"]["input_tokens"], STUB_INPUT_TOKENS);
        assert_eq!(json["usage"]["output_tokens"], 8);
        assert!(response.id.starts_with("msg_"));
    }

    #[test]
    fn test_message_start_event_has_empty_content() {
        let event = MessageStartEvent::new("msg_test".to_string(), "claude-3".to_string());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "message_start");
        assert_eq!(json["message"]["content"], json!([]));
        assert_eq!(json["message"]["stop_reason"], serde_json::Value::Null);
        assert_eq!(json["message"]["usage"]["output_tokens"], 0);
    }

    #[test]
    fn test_delta_event_carries_single_character() {
        let event = ContentBlockDeltaEvent::new("H");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "content_block_delta");
        assert_eq!(json["index"], 0);
        assert_eq!(json["delta"]["type"], "text_delta");
        assert_eq!(json["delta"]["text"], "H");
    }

    #[test]
    fn test_terminal_events() {
        let stop = serde_json::to_value(ContentBlockStopEvent::new()).unwrap();
        assert_eq!(stop["type"], "content_block_stop");

        let done = serde_json::to_value(MessageStopEvent::new()).unwrap();
        assert_eq!(done["type"], "message_stop");
    }
}
