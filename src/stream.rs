// Streaming Emitter Module
// Drives the timed character-by-character emission loop for both wire
// protocols. Each response is an independent task whose only suspend points
// are the per-character pauses; dropping the stream (peer disconnect)
// cancels any pending pause and stops all further writes.

use crate::anthropic::{
    ContentBlockDeltaEvent, ContentBlockStartEvent, ContentBlockStopEvent, MessageStartEvent,
    MessageStopEvent,
};
use crate::openai::ChatCompletionChunk;
use async_stream::stream;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

/// Fixed pause after each emitted character, simulating typing.
/// Not derived from content.
pub const TYPING_CADENCE: Duration = Duration::from_millis(50);

/// End-of-stream sentinel line for the chunked-lines protocol
pub const DONE_SENTINEL: &str = "data: [DONE]\n\n";

/// A streaming reply that yields one character per tick
pub struct CharStream {
    /// The response ID (shared across all chunks)
    id: String,
    /// The model name
    model: String,
    /// Unix timestamp of creation
    created: i64,
    /// The full reply text to stream
    text: String,
    /// Pause after each character
    cadence: Duration,
}

impl CharStream {
    pub fn new(id: String, model: String, text: String) -> Self {
        Self {
            id,
            model,
            created: chrono::Utc::now().timestamp(),
            text,
            cadence: TYPING_CADENCE,
        }
    }

    /// Chunked-lines encoding: one chat.completion.chunk JSON object per
    /// character, newline-delimited, terminated by a finish chunk and the
    /// [DONE] sentinel.
    pub fn into_completions_stream(self) -> Pin<Box<dyn Stream<Item = String> + Send>> {
        let Self {
            id,
            model,
            created,
            text,
            cadence,
        } = self;

        Box::pin(stream! {
            for ch in text.chars() {
                let chunk = ChatCompletionChunk::new(id.clone(), model.clone(), created)
                    .with_content(ch.to_string());
                yield format_data_line(&chunk);

                if !cadence.is_zero() {
                    sleep(cadence).await;
                }
            }

            let finish = ChatCompletionChunk::new(id.clone(), model.clone(), created)
                .with_finish("stop".to_string());
            yield format_data_line(&finish);

            yield DONE_SENTINEL.to_string();
        })
    }

    /// SSE encoding: message_start and content_block_start before any
    /// character, one content_block_delta per character, then
    /// content_block_stop and message_stop.
    pub fn into_messages_stream(self) -> Pin<Box<dyn Stream<Item = String> + Send>> {
        let Self {
            id,
            model,
            text,
            cadence,
            ..
        } = self;

        Box::pin(stream! {
            yield format_event("message_start", &MessageStartEvent::new(id.clone(), model.clone()));
            yield format_event("content_block_start", &ContentBlockStartEvent::new());

            for ch in text.chars() {
                yield format_event("content_block_delta", &ContentBlockDeltaEvent::new(ch.to_string()));

                if !cadence.is_zero() {
                    sleep(cadence).await;
                }
            }

            yield format_event("content_block_stop", &ContentBlockStopEvent::new());
            yield format_event("message_stop", &MessageStopEvent::new());
        })
    }
}

/// Format a payload as a `data:` line for the chunked-lines protocol
pub fn format_data_line<T: Serialize>(payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    format!("data: {}\n\n", json)
}

/// Format a payload as a named Server-Sent Event
pub fn format_event<T: Serialize>(name: &str, payload: &T) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    format!("event: {}\ndata: {}\n\n", name, json)
}

/// Builder for creating character streams
pub struct CharStreamBuilder {
    id: Option<String>,
    model: String,
    text: String,
    cadence: Duration,
}

impl CharStreamBuilder {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            model: model.into(),
            text: text.into(),
            cadence: TYPING_CADENCE,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Override the per-character pause; tests drive streams with zero
    pub fn cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn build(self) -> CharStream {
        let id = self.id.unwrap_or_else(crate::openai::completion_id);

        let mut stream = CharStream::new(id, self.model, self.text);
        stream.cadence = self.cadence;
        stream
    }
}
