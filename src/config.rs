//! Configuration: `.env`/environment, optional `lendlog.toml`, and defaults.
//!
//! Precedence is CLI flag > environment > config file > built-in default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "lendlog.db";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Contents of `lendlog.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LendlogConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("lendlog.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<LendlogConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: LendlogConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Load `.env` into the process environment. A missing file is not fatal.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::warn!("Error loading .env file: {}", e),
    }
}

/// Database connection parameters from `DB_*` environment variables.
///
/// The store is an embedded SQLite file, so only `name` selects anything:
/// it names the database file. The remaining fields are carried for
/// deployments that share one `.env` with other tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: i64,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `DB_PORT` is kept as any integer, even one
    /// no socket could use; unparseable or missing is 0.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            host: get("DB_HOST"),
            port: get("DB_PORT").trim().parse().unwrap_or(0),
            user: get("DB_USER"),
            password: get("DB_PASSWORD"),
            name: get("DB_NAME"),
        }
    }

    /// Database file named by `DB_NAME`, with a `.db` extension added when it
    /// has none. `None` when the variable is unset or empty.
    pub fn database_path(&self) -> Option<PathBuf> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }

        let path = PathBuf::from(name);
        if path.extension().is_some() {
            Some(path)
        } else {
            Some(path.with_extension("db"))
        }
    }

    /// Connection summary for logs; never includes the password.
    pub fn describe(&self) -> String {
        let password = if self.password.is_empty() { "" } else { "***" };
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, password, self.name
        )
    }
}

pub fn resolve_database_path(
    cli: Option<PathBuf>,
    env: &DbConfig,
    file: Option<&LendlogConfig>,
) -> PathBuf {
    cli.or_else(|| env.database_path())
        .or_else(|| file.and_then(|c| c.database.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
}

pub fn resolve_port(cli: Option<u16>, file: Option<&LendlogConfig>) -> u16 {
    cli.or_else(|| file.and_then(|c| c.port)).unwrap_or(DEFAULT_PORT)
}

pub fn resolve_static_dir(cli: Option<PathBuf>, file: Option<&LendlogConfig>) -> PathBuf {
    cli.or_else(|| file.and_then(|c| c.static_dir.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_db_config_from_lookup() {
        let cfg = DbConfig::from_lookup(lookup(&[
            ("DB_HOST", "localhost"),
            ("DB_PORT", "5432"),
            ("DB_USER", "lender"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "stuff"),
        ]));
        assert_eq!(cfg.port, 5432);
        assert_eq!(cfg.database_path(), Some(PathBuf::from("stuff.db")));
        assert!(!cfg.describe().contains("hunter2"));
    }

    #[test]
    fn test_bad_port_defaults_to_zero() {
        let cfg = DbConfig::from_lookup(lookup(&[("DB_PORT", "not-a-port")]));
        assert_eq!(cfg.port, 0);

        let cfg = DbConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.port, 0);
        assert_eq!(cfg.database_path(), None);
    }

    #[test]
    fn test_out_of_range_port_is_kept() {
        let cfg = DbConfig::from_lookup(lookup(&[("DB_PORT", "70000")]));
        assert_eq!(cfg.port, 70000);
        assert!(cfg.describe().contains("port=70000"));

        let cfg = DbConfig::from_lookup(lookup(&[("DB_PORT", "-5")]));
        assert_eq!(cfg.port, -5);
        assert_eq!(cfg.database_path(), None);
    }

    #[test]
    fn test_database_path_keeps_extension() {
        let cfg = DbConfig::from_lookup(lookup(&[("DB_NAME", "data/lend.sqlite")]));
        assert_eq!(cfg.database_path(), Some(PathBuf::from("data/lend.sqlite")));
    }

    #[test]
    fn test_resolution_precedence() {
        let env = DbConfig::from_lookup(lookup(&[("DB_NAME", "fromenv")]));
        let file = LendlogConfig {
            database: Some("fromfile.db".to_string()),
            port: Some(9000),
            static_dir: None,
        };

        assert_eq!(
            resolve_database_path(Some(PathBuf::from("cli.db")), &env, Some(&file)),
            PathBuf::from("cli.db")
        );
        assert_eq!(resolve_database_path(None, &env, Some(&file)), PathBuf::from("fromenv.db"));
        assert_eq!(
            resolve_database_path(None, &DbConfig::default(), Some(&file)),
            PathBuf::from("fromfile.db")
        );
        assert_eq!(
            resolve_database_path(None, &DbConfig::default(), None),
            PathBuf::from(DEFAULT_DATABASE)
        );

        assert_eq!(resolve_port(None, Some(&file)), 9000);
        assert_eq!(resolve_port(Some(1234), Some(&file)), 1234);
        assert_eq!(resolve_port(None, None), DEFAULT_PORT);
        assert_eq!(resolve_static_dir(None, None), PathBuf::from(DEFAULT_STATIC_DIR));
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lendlog.toml");
        assert!(load_config(Some(&path)).unwrap().is_none());

        std::fs::write(&path, "database = \"x.db\"\nport = 8090\n").unwrap();
        let cfg = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(cfg.database.as_deref(), Some("x.db"));
        assert_eq!(cfg.port, Some(8090));
        assert!(cfg.static_dir.is_none());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("lendlog.db");
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
