// Fake Configuration Store Module
// Holds the runtime-mutable fake reply settings: API key, per-model replies,
// and the default model. Updated wholesale through the admin API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

/// How the reply text for a model is produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// A fixed configured string, independent of the request
    #[default]
    Preset,
    /// The inbound request body, serialized back to the caller
    Echo,
}

/// Per-model reply settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelReply {
    pub name: String,
    pub reply_content: String,
    /// Milliseconds to wait before any byte of the response is produced
    pub response_delay: u64,
    #[serde(default)]
    pub reply_mode: ReplyMode,
}

impl ModelReply {
    pub fn new(name: impl Into<String>, reply_content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply_content: reply_content.into(),
            response_delay: 0,
            reply_mode: ReplyMode::Preset,
        }
    }

    /// Fallback reply used when no fakes are configured at all.
    /// Produces a valid, empty reply rather than failing the request.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.response_delay)
    }
}

/// The full fake configuration, replaced field-by-field on update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FakeConfig {
    pub api_key: String,
    pub default_model: String,
    pub models: BTreeMap<String, ModelReply>,
}

impl FakeConfig {
    /// Resolve the reply settings for a requested model name.
    ///
    /// Exact match first, then the default model's entry, then the first
    /// configured entry, and finally an empty fallback reply. Never fails.
    pub fn resolve_model(&self, requested: Option<&str>) -> ModelReply {
        if let Some(reply) = requested.and_then(|name| self.models.get(name)) {
            return reply.clone();
        }

        self.models
            .get(&self.default_model)
            .cloned()
            .or_else(|| self.models.values().next().cloned())
            .unwrap_or_else(|| ModelReply::empty(requested.unwrap_or(&self.default_model)))
    }
}

impl Default for FakeConfig {
    fn default() -> Self {
        let default_model = "gpt-3.5-turbo".to_string();
        let mut models = BTreeMap::new();
        models.insert(
            default_model.clone(),
            ModelReply::new(
                default_model.clone(),
                "Hello! I am a fake GPT model. This is a simulated response.",
            ),
        );
        Self {
            api_key: "sk-fake-gpt-key-123456789".to_string(),
            default_model,
            models,
        }
    }
}

/// Partial configuration update; absent fields are left unchanged.
/// Model entries arrive as loose JSON and are validated one by one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub default_model: Option<String>,
    pub models: Option<BTreeMap<String, Value>>,
}

/// Thread-safe store for the fake configuration.
/// Updates replace the models map atomically; readers never observe a
/// partially-applied update.
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<FakeConfig>,
}

impl ConfigStore {
    pub fn new(initial: FakeConfig) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    /// Snapshot read of the current configuration
    pub fn snapshot(&self) -> FakeConfig {
        self.inner
            .read()
            .map(|cfg| cfg.clone())
            .unwrap_or_default()
    }

    /// Apply a partial update and return the resulting configuration
    pub fn update(&self, update: ConfigUpdate) -> FakeConfig {
        let mut cfg = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(api_key) = update.api_key {
            cfg.api_key = api_key;
        }
        if let Some(default_model) = update.default_model {
            cfg.default_model = default_model;
        }
        if let Some(models) = update.models {
            cfg.models = models
                .iter()
                .filter_map(|(key, raw)| {
                    let entry = parse_model_entry(raw);
                    if entry.is_none() {
                        tracing::debug!(model = %key, "Dropping invalid model entry");
                    }
                    entry.map(|m| (key.clone(), m))
                })
                .collect();
        }

        cfg.clone()
    }

    /// Resolve the reply settings for a requested model name against the
    /// current configuration. See [`FakeConfig::resolve_model`].
    pub fn resolve_model(&self, requested: Option<&str>) -> ModelReply {
        self.snapshot().resolve_model(requested)
    }
}

/// Validate a loose JSON model entry. Entries missing any of
/// name/replyContent/responseDelay are dropped; the delay is coerced to a
/// non-negative integer, with anything unparseable becoming zero.
fn parse_model_entry(value: &Value) -> Option<ModelReply> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?.to_string();
    let reply_content = obj.get("replyContent")?.as_str()?.to_string();
    let response_delay = clamp_delay(obj.get("responseDelay")?);
    let reply_mode = match obj.get("replyMode").and_then(Value::as_str) {
        Some("echo") => ReplyMode::Echo,
        _ => ReplyMode::Preset,
    };

    Some(ModelReply {
        name,
        reply_content,
        response_delay,
        reply_mode,
    })
}

fn clamp_delay(value: &Value) -> u64 {
    value
        .as_i64()
        .map(|ms| ms.max(0) as u64)
        .or_else(|| value.as_f64().map(|ms| ms.max(0.0) as u64))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with_models(entries: &[(&str, &str)]) -> ConfigStore {
        let mut models = BTreeMap::new();
        for (name, reply) in entries {
            models.insert(name.to_string(), ModelReply::new(*name, *reply));
        }
        ConfigStore::new(FakeConfig {
            api_key: "test-key".to_string(),
            default_model: entries.first().map(|(n, _)| n.to_string()).unwrap_or_default(),
            models,
        })
    }

    #[test]
    fn test_default_config_has_a_model() {
        let cfg = FakeConfig::default();
        assert!(!cfg.api_key.is_empty());
        assert!(cfg.models.contains_key(&cfg.default_model));
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let store = ConfigStore::new(FakeConfig::default());
        let before = store.snapshot();

        let after = store.update(ConfigUpdate {
            api_key: Some("sk-new".to_string()),
            ..Default::default()
        });

        assert_eq!(after.api_key, "sk-new");
        assert_eq!(after.default_model, before.default_model);
        assert_eq!(after.models, before.models);
        // Re-reading reflects the change immediately
        assert_eq!(store.snapshot().api_key, "sk-new");
    }

    #[test]
    fn test_update_replaces_models_map() {
        let store = store_with_models(&[("gpt-4", "old reply")]);

        let mut models = BTreeMap::new();
        models.insert(
            "claude-3".to_string(),
            json!({"name": "claude-3", "replyContent": "new reply", "responseDelay": 100}),
        );
        let after = store.update(ConfigUpdate {
            models: Some(models),
            ..Default::default()
        });

        assert_eq!(after.models.len(), 1);
        assert!(!after.models.contains_key("gpt-4"));
        assert_eq!(after.models["claude-3"].reply_content, "new reply");
        assert_eq!(after.models["claude-3"].response_delay, 100);
    }

    #[test]
    fn test_negative_delay_clamped_to_zero() {
        let store = ConfigStore::new(FakeConfig::default());

        let mut models = BTreeMap::new();
        models.insert(
            "m".to_string(),
            json!({"name": "m", "replyContent": "x", "responseDelay": -5}),
        );
        let after = store.update(ConfigUpdate {
            models: Some(models),
            ..Default::default()
        });

        assert_eq!(after.models["m"].response_delay, 0);
    }

    #[test]
    fn test_unparseable_delay_becomes_zero() {
        let entry = json!({"name": "m", "replyContent": "x", "responseDelay": "soon"});
        let parsed = parse_model_entry(&entry).unwrap();
        assert_eq!(parsed.response_delay, 0);

        let fractional = json!({"name": "m", "replyContent": "x", "responseDelay": 12.7});
        assert_eq!(parse_model_entry(&fractional).unwrap().response_delay, 12);
    }

    #[test]
    fn test_invalid_entries_dropped_silently() {
        let store = ConfigStore::new(FakeConfig::default());

        let mut models = BTreeMap::new();
        models.insert("ok".to_string(), json!({"name": "ok", "replyContent": "fine", "responseDelay": 0}));
        models.insert("no-content".to_string(), json!({"name": "no-content", "responseDelay": 0}));
        models.insert("no-delay".to_string(), json!({"name": "no-delay", "replyContent": "x"}));
        models.insert("not-an-object".to_string(), json!("oops"));

        let after = store.update(ConfigUpdate {
            models: Some(models),
            ..Default::default()
        });

        assert_eq!(after.models.len(), 1);
        assert!(after.models.contains_key("ok"));
    }

    #[test]
    fn test_reply_mode_defaults_to_preset() {
        let entry = json!({"name": "m", "replyContent": "x", "responseDelay": 0});
        assert_eq!(parse_model_entry(&entry).unwrap().reply_mode, ReplyMode::Preset);

        let echo = json!({"name": "m", "replyContent": "x", "responseDelay": 0, "replyMode": "echo"});
        assert_eq!(parse_model_entry(&echo).unwrap().reply_mode, ReplyMode::Echo);
    }

    #[test]
    fn test_resolve_exact_match() {
        let store = store_with_models(&[("gpt-4", "four"), ("gpt-5", "five")]);
        assert_eq!(store.resolve_model(Some("gpt-5")).reply_content, "five");
    }

    #[test]
    fn test_resolve_falls_back_to_default_model() {
        let store = store_with_models(&[("gpt-4", "four"), ("gpt-5", "five")]);
        let resolved = store.resolve_model(Some("unknown-model"));
        assert_eq!(resolved.reply_content, "four");
    }

    #[test]
    fn test_resolve_falls_back_to_first_available() {
        let mut models = BTreeMap::new();
        models.insert("zeta".to_string(), ModelReply::new("zeta", "z"));
        models.insert("alpha".to_string(), ModelReply::new("alpha", "a"));
        let store = ConfigStore::new(FakeConfig {
            api_key: "k".to_string(),
            default_model: "missing".to_string(),
            models,
        });

        // First entry in key order
        assert_eq!(store.resolve_model(Some("unknown")).reply_content, "a");
    }

    #[test]
    fn test_resolve_empty_store_never_panics() {
        let store = ConfigStore::new(FakeConfig {
            api_key: "k".to_string(),
            default_model: "gpt-4".to_string(),
            models: BTreeMap::new(),
        });

        let resolved = store.resolve_model(Some("anything"));
        assert_eq!(resolved.name, "anything");
        assert_eq!(resolved.reply_content, "");
        assert_eq!(resolved.response_delay, 0);

        let unnamed = store.resolve_model(None);
        assert_eq!(unnamed.name, "gpt-4");
    }

    #[test]
    fn test_config_wire_format_is_camel_case() {
        let json = serde_json::to_string(&FakeConfig::default()).unwrap();
        assert!(json.contains("\"apiKey\""));
        assert!(json.contains("\"defaultModel\""));
        assert!(json.contains("\"replyContent\""));
        assert!(json.contains("\"responseDelay\""));
    }
}
