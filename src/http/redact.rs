use reqwest::header::HeaderValue;
use serde_json::Value;

const REDACTION: &str = "***REDACTED***";
const SENSITIVE_KEYS: [&str; 7] = [
    "authorization",
    "api_key",
    "apikey",
    "token",
    "access_token",
    "x-api-key",
    "openrouter_api_key",
];

/// Controls the upstream traffic dump emitted at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugConfig {
    pub enabled: bool,
    pub redact_secrets: bool,
    pub max_body_chars: usize,
}

impl HttpDebugConfig {
    pub fn from_verbose(verbose: bool) -> Self {
        Self {
            enabled: verbose,
            redact_secrets: true,
            max_body_chars: 4_000,
        }
    }

    pub fn disabled() -> Self {
        Self::from_verbose(false)
    }

    pub fn header_value(&self, name: &str, value: &HeaderValue) -> String {
        if self.redact_secrets && is_sensitive_key(name) {
            return REDACTION.to_string();
        }

        value
            .to_str()
            .map(ToString::to_string)
            .unwrap_or_else(|_| "<non-utf8>".to_string())
    }

    /// Redacts secret-looking JSON keys, then truncates for the log line.
    pub fn body(&self, raw: &str) -> String {
        let shown = if self.redact_secrets {
            redact_json_text(raw)
        } else {
            raw.to_string()
        };
        truncate_for_log(&shown, self.max_body_chars)
    }
}

pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let count = input.chars().count();
    if count <= max_chars {
        return input.to_string();
    }

    let truncated = input.chars().take(max_chars).collect::<String>();
    format!("{truncated}... <truncated {} chars>", count - max_chars)
}

fn redact_json_text(raw: &str) -> String {
    let Ok(mut json) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };
    redact_json_value(&mut json);
    serde_json::to_string(&json).unwrap_or_else(|_| raw.to_string())
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                if is_sensitive_key(key) {
                    *item = Value::String(REDACTION.to_string());
                } else {
                    redact_json_value(item);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(key))
}
