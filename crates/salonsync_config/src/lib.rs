use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod models;
pub use models::*;

/// Marker value that is swapped for an environment variable at load time.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the layered application configuration.
///
/// Sources, lowest priority first:
/// 1. `{CONFIG_DIR}/default.*`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.*`
/// 3. `SALONSYNC__SECTION__KEY` environment variables (prefix configurable via `PREFIX`)
///
/// `CONFIG_DIR` defaults to `config`, `RUN_ENV` to `debug`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "SALONSYNC".to_string());

    load_config_from(Path::new(&config_dir), &run_env, &prefix)
}

/// Same as [`load_config`] with explicit sources; used by tests.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    prefix: &str,
) -> Result<AppConfig, ConfigError> {
    let default_path: PathBuf = config_dir.join("default");
    let env_path: PathBuf = config_dir.join(run_env);

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
///
/// The variable name is the upper-cased key path joined by `_`,
/// so `gemini.api_key` reads `GEMINI_API_KEY`.
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for secret_from_env", env_key);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("config not serializable: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("config not deserializable: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` wins, then a first CLI argument starting with `.env`,
/// then `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_layers_default_and_env_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
use_gemini = false
[server]
host = "0.0.0.0"
port = 9000
[salon]
owner_uid = "owner-1"
time_zone = "Europe/Budapest"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 9100
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path(), "staging", "SALONSYNC_TEST_LAYERS").unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.salon.owner_uid, "owner-1");
        assert_eq!(config.salon.time_zone.as_deref(), Some("Europe/Budapest"));
        assert!(!config.use_firestore);
        assert!(config.firestore.is_none());
    }

    #[test]
    fn test_secret_marker_is_replaced_from_env() {
        env::set_var("GEMINI_API_KEY", "key-from-env");
        let config = AppConfig {
            gemini: Some(GeminiConfig {
                api_key: SECRET_FROM_ENV.to_string(),
                base_url: None,
                text_model: None,
                live_url: None,
                live_model: None,
            }),
            ..AppConfig::default()
        };

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(config.gemini.unwrap().api_key, "key-from-env");
    }

    #[test]
    fn test_missing_secret_keeps_marker() {
        let config = AppConfig {
            firestore: Some(FirestoreConfig {
                web_api_key: Some(SECRET_FROM_ENV.to_string()),
                ..FirestoreConfig::default()
            }),
            ..AppConfig::default()
        };
        env::remove_var("FIRESTORE_WEB_API_KEY");

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(
            config.firestore.unwrap().web_api_key.as_deref(),
            Some(SECRET_FROM_ENV)
        );
    }
}
