use std::env;
use std::fs;
use std::path::Path;

use parlor_core::config::{resolve_config_path, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

struct ConfigField {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = config_file_path.as_deref().and_then(load_config_file_doc);

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in effective_fields(&config) {
        let source = field_source(&field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }
    lines.join("\n")
}

fn effective_fields(config: &AppConfig) -> Vec<ConfigField> {
    let field = |key_path, env_keys, value: String| ConfigField { key_path, env_keys, value };

    vec![
        field("database.url", &["PARLOR_DATABASE_URL"], config.database.url.clone()),
        field(
            "database.max_connections",
            &["PARLOR_DATABASE_MAX_CONNECTIONS"],
            config.database.max_connections.to_string(),
        ),
        field(
            "database.timeout_secs",
            &["PARLOR_DATABASE_TIMEOUT_SECS"],
            config.database.timeout_secs.to_string(),
        ),
        field(
            "auth.bearer_token",
            &["PARLOR_AUTH_BEARER_TOKEN", "PARLOR_BEARER_TOKEN"],
            redact_secret(Some(config.auth.bearer_token.expose_secret())),
        ),
        field("llm.provider", &["PARLOR_LLM_PROVIDER"], format!("{:?}", config.llm.provider)),
        field("llm.model", &["PARLOR_LLM_MODEL"], config.llm.model.clone()),
        field("llm.base_url", &["PARLOR_LLM_BASE_URL"], config.llm.effective_base_url().to_string()),
        field(
            "llm.api_key",
            &["PARLOR_LLM_API_KEY"],
            redact_secret(config.llm.api_key.as_ref().map(|key| key.expose_secret())),
        ),
        field("llm.timeout_secs", &["PARLOR_LLM_TIMEOUT_SECS"], config.llm.timeout_secs.to_string()),
        field("llm.max_tokens", &["PARLOR_LLM_MAX_TOKENS"], config.llm.max_tokens.to_string()),
        field("gateway.base_url", &["PARLOR_GATEWAY_BASE_URL"], config.gateway.base_url.clone()),
        field(
            "gateway.timeout_secs",
            &["PARLOR_GATEWAY_TIMEOUT_SECS"],
            config.gateway.timeout_secs.to_string(),
        ),
        field(
            "server.bind_address",
            &["PARLOR_SERVER_BIND_ADDRESS"],
            config.server.bind_address.clone(),
        ),
        field("server.port", &["PARLOR_SERVER_PORT"], config.server.port.to_string()),
        field(
            "logging.level",
            &["PARLOR_LOGGING_LEVEL", "PARLOR_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        field(
            "logging.format",
            &["PARLOR_LOGGING_FORMAT", "PARLOR_LOG_FORMAT"],
            format!("{:?}", config.logging.format),
        ),
    ]
}

fn load_config_file_doc(path: &Path) -> Option<Value> {
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &ConfigField,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if config_file_doc.is_some_and(|doc| contains_path(doc, field.key_path)) {
        let file_path = config_file_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn redact_secret(secret: Option<&str>) -> String {
    match secret.map(str::trim) {
        None => "<unset>".to_string(),
        Some("") => "<empty>".to_string(),
        Some(_) => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, redact_secret};

    #[test]
    fn secrets_never_render_their_value() {
        assert_eq!(redact_secret(Some("scoop-secret")), "<redacted>");
        assert_eq!(redact_secret(Some("   ")), "<empty>");
        assert_eq!(redact_secret(None), "<unset>");
    }

    #[test]
    fn nested_keys_are_found_in_the_config_file() {
        let doc = "[llm]\nmodel = \"llama3.1\"\n".parse::<Value>().expect("toml");

        assert!(contains_path(&doc, "llm.model"));
        assert!(!contains_path(&doc, "llm.api_key"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
