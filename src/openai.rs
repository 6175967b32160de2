// OpenAI API Types
// The subset of the Chat Completions wire format this simulator emits.
// Reference: https://platform.openai.com/docs/api-reference/chat

use crate::errors::{ApiError, Surface};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The simulator never tokenizes prompts; it reports this fixed count
pub const STUB_PROMPT_TOKENS: u32 = 10;

/// Role of a message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Inbound chat completion request. Parsed leniently from raw JSON so the
/// simulator controls the 400 body shape instead of the extractor.
#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: Option<String>,
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Validate the request body: `messages` must be present and an array.
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        if !body.get("messages").is_some_and(Value::is_array) {
            return Err(ApiError::validation(
                Surface::OpenAi,
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
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Usage for a reply of the given character count
    pub fn for_reply(completion_tokens: u32) -> Self {
        Self {
            prompt_tokens: STUB_PROMPT_TOKENS,
            completion_tokens,
            total_tokens: STUB_PROMPT_TOKENS + completion_tokens,
        }
    }
}

/// A choice in the completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    pub finish_reason: Option<String>,
}

/// Chat completion response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    pub fn new(id: String, model: String, content: String, usage: Usage) -> Self {
        Self {
            id,
            object: "chat.completion".to_string(),
            created: chrono::Utc::now().timestamp(),
            model,
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(content),
                finish_reason: Some("stop".to_string()),
            }],
            usage,
        }
    }
}

/// Generate a response id in the chat-completions convention
pub fn completion_id() -> String {
    format!("chatcmpl-{}", uuid::Uuid::new_v4())
}

/// Delta content in a streaming chunk; the finish chunk carries `{}`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChunkDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A choice in a streaming chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<String>,
}

/// Streaming chat completion chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    pub fn new(id: String, model: String, created: i64) -> Self {
        Self {
            id,
            object: "chat.completion.chunk".to_string(),
            created,
            model,
            choices: vec![],
        }
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.choices = vec![ChunkChoice {
            index: 0,
            delta: ChunkDelta {
                content: Some(content),
            },
            finish_reason: None,
        }];
        self
    }

    pub fn with_finish(mut self, reason: String) -> Self {
        self.choices = vec![ChunkChoice {
            index: 0,
            delta: ChunkDelta::default(),
            finish_reason: Some(reason),
        }];
        self
    }
}
