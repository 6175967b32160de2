//! # FakeGPT - Fake LLM API Server
//!
//! A configurable fake of the OpenAI chat-completions and Anthropic
//! messages APIs for testing clients without hitting a real provider.
//!
//! ## Features
//!
//! - Configurable canned replies per model (preset text or request echo)
//! - Character-by-character streaming at a fixed typing cadence, in both
//!   wire formats (chunked `data:` lines with a `[DONE]` sentinel, and
//!   named SSE events)
//! - Optional per-model response delay simulating provider thinking time
//! - Bearer / x-api-key credential checks with provider-shaped error bodies
//! - Session-gated admin API: config CRUD, request logs, login/logout
//! - Request log capped at 100 entries, persisted best-effort to JSON
//! - Static admin panel serving with SPA fallback, WebSocket keep-alive
//!
//! ## Usage
//!
//! ### As a CLI
//!
//! ```bash
//! # Start the server
//! fakegpt serve --port 3000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use fakegpt::{
//!     store::{ConfigStore, FakeConfig},
//!     stream::CharStreamBuilder,
//! };
//!
//! let store = ConfigStore::new(FakeConfig::default());
//! let reply = store.resolve_model(Some("gpt-4"));
//! let stream = CharStreamBuilder::new(&reply.name, &reply.reply_content).build();
//! ```

// Core library modules
pub mod anthropic;
pub mod auth;
pub mod errors;
pub mod generator;
pub mod logs;
pub mod openai;
pub mod session;
pub mod store;
pub mod stream;

// CLI module (for `fakegpt serve` command)
pub mod cli;

// Re-export commonly used types
pub use errors::{ApiError, Surface};
pub use generator::{generator_for, EchoGenerator, PresetGenerator, ResponseGenerator};
pub use logs::{LogEntry, RequestLog, MAX_LOG_ENTRIES};
pub use session::{SessionCheck, SessionStore, SESSION_MAX_AGE};
pub use store::{ConfigStore, ConfigUpdate, FakeConfig, ModelReply, ReplyMode};
pub use stream::{CharStream, CharStreamBuilder, DONE_SENTINEL, TYPING_CADENCE};
