// Reply Generator Module
// Produces the effective reply text for a request, according to the
// resolved model's reply mode.

use crate::store::{ModelReply, ReplyMode};
use serde_json::Value;

/// Trait for producing the reply text for a request
pub trait ResponseGenerator: Send + Sync {
    /// Generate the reply text for the given request body
    fn generate(&self, request_body: &Value) -> String;

    /// Get a name for this generator (for logging/debugging)
    fn name(&self) -> &str;
}

/// Returns the configured reply verbatim, independent of the request
pub struct PresetGenerator {
    reply: String,
}

impl PresetGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl ResponseGenerator for PresetGenerator {
    fn generate(&self, _request_body: &Value) -> String {
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "preset"
    }
}

/// Echoes the inbound request body back as pretty-printed JSON
pub struct EchoGenerator;

impl EchoGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseGenerator for EchoGenerator {
    fn generate(&self, request_body: &Value) -> String {
        serde_json::to_string_pretty(request_body).unwrap_or_else(|_| "{}".to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Select the generator for a resolved model reply
pub fn generator_for(reply: &ModelReply) -> Box<dyn ResponseGenerator> {
    match reply.reply_mode {
        ReplyMode::Preset => Box::new(PresetGenerator::new(&reply.reply_content)),
        ReplyMode::Echo => Box::new(EchoGenerator::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preset_generator_ignores_request() {
        let generator = PresetGenerator::new("canned reply");
        assert_eq!(generator.generate(&json!({"messages": []})), "canned reply");
        assert_eq!(generator.generate(&json!({"anything": "else"})), "canned reply");
    }

    #[test]
    fn test_echo_generator_pretty_prints_body() {
        let generator = EchoGenerator::new();
        let body = json!({"messages": [{"role": "user", "content": "hi"}]});
        let reply = generator.generate(&body);

        assert!(reply.contains("\"role\": \"user\""));
        // Pretty printing spans multiple lines
        assert!(reply.contains('\n'));
        // Round-trips back to the same value
        assert_eq!(serde_json::from_str::<Value>(&reply).unwrap(), body);
    }

    #[test]
    fn test_generator_for_mode() {
        let mut reply = ModelReply::new("gpt-4", "hello");
        assert_eq!(generator_for(&reply).name(), "preset");

        reply.reply_mode = ReplyMode::Echo;
        assert_eq!(generator_for(&reply).name(), "echo");
    }
}
