//! No-mock configuration resolution tests.
//!
//! Covers:
//! - Resolution order (CLI > env path > env dir > defaults)
//! - Loading and validating real TOML files
//! - DB settings read from the process environment

use pd_config::db::{ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_USERNAME};
use pd_config::resolve::{resolve_config, ConfigSource, ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use pd_config::{load_settings, DbSettings, ValidationError, SETTINGS_FILENAME};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    f()
}

fn write_settings(path: &Path, tag: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create settings parent");
    }
    fs::write(path, format!("[logging]\ntag = \"{}\"\n", tag)).expect("write settings");
}

#[test]
fn test_cli_path_wins_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let tmp = TempDir::new().unwrap();
        let cli = tmp.path().join("cli.toml");
        let from_env = tmp.path().join("env.toml");
        write_settings(&cli, "CLI");
        write_settings(&from_env, "ENV");
        env::set_var(ENV_CONFIG_PATH, &from_env);

        let loaded = load_settings(Some(&cli)).unwrap();
        assert_eq!(loaded.source, ConfigSource::CliArgument);
        assert_eq!(loaded.settings.logging.tag, "CLI");
    });
}

#[test]
fn test_env_path_wins_over_env_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let tmp = TempDir::new().unwrap();
        let direct = tmp.path().join("direct.toml");
        let dir = tmp.path().join("conf");
        write_settings(&direct, "DIRECT");
        write_settings(&dir.join(SETTINGS_FILENAME), "DIR");
        env::set_var(ENV_CONFIG_PATH, &direct);
        env::set_var(ENV_CONFIG_DIR, &dir);

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(direct.as_path()));
    });
}

#[test]
fn test_env_dir_used_when_no_direct_path() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let tmp = TempDir::new().unwrap();
        write_settings(&tmp.path().join(SETTINGS_FILENAME), "DIR");
        env::set_var(ENV_CONFIG_DIR, tmp.path());

        let loaded = load_settings(None).unwrap();
        assert_eq!(loaded.source, ConfigSource::Environment);
        assert_eq!(loaded.settings.logging.tag, "DIR");
    });
}

#[test]
fn test_invalid_file_fails_validation() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[redaction]\nfields = [\"\"]\n").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert_eq!(err.code(), 65);
    });
}

#[test]
fn test_malformed_file_is_parse_error() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        fs::write(&path, "[logging\ntag = ").unwrap();

        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    });
}

#[test]
fn test_db_settings_from_process_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_DB_USERNAME, ENV_DB_PASSWORD, ENV_DB_HOST, ENV_DB_NAME]);
        env::set_var(ENV_DB_USERNAME, "holberton");
        env::set_var(ENV_DB_NAME, "my_db");

        let db = DbSettings::from_env();
        assert_eq!(db.user, "holberton");
        assert_eq!(db.host, "localhost");
        assert_eq!(db.connection_url(), "mysql://holberton@localhost/my_db");
    });
}
