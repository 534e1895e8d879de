use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_BIND: &str = "127.0.0.1:5010";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

const CONFIG_DIR_NAME: &str = "json2toon";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub openrouter_api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub bind: SocketAddr,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    openrouter_api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    bind: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Resolves every setting as environment > `.env` > config file > default.
    pub fn load_with_path(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Failed to load config {}: file not found", path.display());
                }
                path.to_path_buf()
            }
            None => discover_config_path()?,
        };
        let file = load_file_config(&config_path)?.unwrap_or_default();

        dotenvy::dotenv().ok();

        let openrouter_api_key = env_non_empty("OPENROUTER_API_KEY").or(file
            .openrouter_api_key
            .as_deref()
            .and_then(non_empty)
            .map(ToOwned::to_owned));
        let model = env_non_empty("JSON2TOON_MODEL")
            .or(file.model.as_deref().and_then(non_empty).map(ToOwned::to_owned))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = env_non_empty("JSON2TOON_BASE_URL")
            .or(file.base_url.as_deref().and_then(non_empty).map(ToOwned::to_owned))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let bind_text = env_non_empty("JSON2TOON_BIND")
            .or(file.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = parse_bind(&bind_text)
            .map_err(|reason| config_error(&config_path, "bind", &reason))?;

        let max_tokens = env_parsed::<u32>(&config_path, "JSON2TOON_MAX_TOKENS")?
            .or(file.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(config_error(&config_path, "max_tokens", "must be greater than 0"));
        }

        let temperature = env_parsed::<f32>(&config_path, "JSON2TOON_TEMPERATURE")?
            .or(file.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(config_error(
                &config_path,
                "temperature",
                "must be between 0 and 2",
            ));
        }

        let timeout_secs = env_parsed::<u64>(&config_path, "JSON2TOON_REQUEST_TIMEOUT_SECS")?
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(config_error(
                &config_path,
                "request_timeout_secs",
                "must be greater than 0",
            ));
        }

        Ok(Self {
            config_path,
            openrouter_api_key,
            model,
            base_url,
            bind,
            max_tokens,
            temperature,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn parse_bind(value: &str) -> std::result::Result<SocketAddr, String> {
    SocketAddr::from_str(value.trim())
        .map_err(|_| format!("invalid socket address '{value}', expected HOST:PORT"))
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn env_parsed<T: FromStr>(config_path: &Path, key: &str) -> Result<Option<T>> {
    let Some(value) = env_non_empty(key) else {
        return Ok(None);
    };

    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| config_error(config_path, key, &format!("invalid value '{value}'")))
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| non_empty(&value).map(ToOwned::to_owned))
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
    use serial_test::serial;
    use std::env;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    const VARS: [&str; 8] = [
        "OPENROUTER_API_KEY",
        "JSON2TOON_MODEL",
        "JSON2TOON_BASE_URL",
        "JSON2TOON_BIND",
        "JSON2TOON_MAX_TOKENS",
        "JSON2TOON_TEMPERATURE",
        "JSON2TOON_REQUEST_TIMEOUT_SECS",
        "XDG_CONFIG_HOME",
    ];

    fn reset_vars() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    fn with_cwd<T>(path: &Path, f: impl FnOnce() -> T) -> T {
        let cwd = env::current_dir().expect("current dir");
        env::set_current_dir(path).expect("set current dir");
        let result = f();
        env::set_current_dir(cwd).expect("restore current dir");
        result
    }

    fn write_config(root: &Path, body: &str) {
        let config_dir = root.join("json2toon");
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(config_dir.join("config.toml"), body).expect("write config");
    }

    #[test]
    #[serial]
    fn load_uses_defaults_when_unset() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect("load config"));
        assert_eq!(cfg.openrouter_api_key, None);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.bind.to_string(), "127.0.0.1:5010");
        assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(cfg.request_timeout, Duration::from_secs(60));
    }

    #[test]
    #[serial]
    fn load_env_overrides_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(
            tmp.path(),
            r#"
openrouter_api_key = "file_key"
model = "file/model"
base_url = "https://example.com/v1"
max_tokens = 800
"#,
        );

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("OPENROUTER_API_KEY", "os_key");
            env::set_var("JSON2TOON_MODEL", "os/model");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect("load config"));
        assert_eq!(cfg.openrouter_api_key.as_deref(), Some("os_key"));
        assert_eq!(cfg.model, "os/model");
        assert_eq!(cfg.base_url, "https://example.com/v1");
        assert_eq!(cfg.max_tokens, 800);
    }

    #[test]
    #[serial]
    fn load_reads_key_from_dotenv_without_overriding_os_env() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::write(
            tmp.path().join(".env"),
            "OPENROUTER_API_KEY=dotenv_key\nJSON2TOON_MODEL=dotenv/model\n",
        )
        .expect("write env file");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("JSON2TOON_MODEL", "os/model");
        }

        let cfg = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect("load config"));
        assert_eq!(cfg.openrouter_api_key.as_deref(), Some("dotenv_key"));
        assert_eq!(cfg.model, "os/model");
        reset_vars();
    }

    #[test]
    #[serial]
    fn load_with_explicit_path_reads_that_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "bind = \"0.0.0.0:8080\"\ntemperature = 0.0\n").expect("write config");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let cfg = with_cwd(tmp.path(), || {
            AppConfig::load_with_path(Some(path.as_path())).expect("load config")
        });
        assert_eq!(cfg.config_path, path);
        assert_eq!(cfg.bind.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.temperature, 0.0);
    }

    #[test]
    #[serial]
    fn load_with_missing_explicit_path_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();

        let err = AppConfig::load_with_path(Some(tmp.path().join("absent.toml").as_path()))
            .expect_err("load should fail");
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    #[serial]
    fn load_fails_when_xdg_config_home_is_empty() {
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "   ");
        }

        let err = AppConfig::load_with_path(None).expect_err("load should fail");
        assert!(
            err.to_string()
                .contains("Failed to resolve config path: XDG_CONFIG_HOME is set but empty")
        );
        reset_vars();
    }

    #[test]
    #[serial]
    fn load_fails_on_unknown_root_key() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(tmp.path(), "unknown_key = 1");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let err = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect_err("load should fail"));
        assert!(err.to_string().contains("Failed to load config"));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    #[serial]
    fn load_rejects_out_of_range_temperature() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_config(tmp.path(), "temperature = 3.5");

        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
        }

        let err = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect_err("load should fail"));
        assert!(err.to_string().contains("temperature: must be between 0 and 2"));
    }

    #[test]
    #[serial]
    fn load_rejects_unparsable_env_number() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("JSON2TOON_REQUEST_TIMEOUT_SECS", "soon");
        }

        let err = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect_err("load should fail"));
        assert!(
            err.to_string()
                .contains("JSON2TOON_REQUEST_TIMEOUT_SECS: invalid value 'soon'")
        );
        reset_vars();
    }

    #[test]
    #[serial]
    fn load_rejects_bad_bind_address() {
        let tmp = tempfile::tempdir().expect("tempdir");
        reset_vars();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", tmp.path());
            env::set_var("JSON2TOON_BIND", "localhost");
        }

        let err = with_cwd(tmp.path(), || AppConfig::load_with_path(None).expect_err("load should fail"));
        assert!(err.to_string().contains("bind: invalid socket address"));
        reset_vars();
    }
}
