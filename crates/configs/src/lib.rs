use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 5000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Which record store backs the student service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on restart.
    Memory,
    /// Process-local, snapshotted to a JSON file after every write.
    File,
    /// Postgres (or any sea-orm URL) with a unique index on email.
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            "postgres" | "postgresql" | "db" => Ok(Self::Postgres),
            other => Err(anyhow!("unknown storage backend `{other}` (expected memory, file or postgres)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Unset means: postgres when a database URL is configured, otherwise file.
    #[serde(default)]
    pub backend: Option<StorageBackend>,
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String { "data/students.json".into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: None, path: default_store_path() }
    }
}

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Like `load_from_file`, but a missing file yields defaults. Unreadable or malformed files are errors.
pub fn load_file_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Err(e) if is_missing_file(&e) => Ok(AppConfig::default()),
        other => other,
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, otherwise defaults; env overrides applied in both cases.
    pub fn load_or_env() -> Result<Self> {
        let path = config_path();
        let mut cfg = load_file_or_default(&path).map_err(|e| anyhow!("config file {path}: {e}"))?;
        cfg.apply_env_overrides()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        // PORT is what most hosting platforms inject
        let port = std::env::var("SERVER_PORT").or_else(|_| std::env::var("PORT"));
        if let Ok(p) = port {
            self.server.port = p.trim().parse::<u16>().map_err(|e| anyhow!("invalid port `{p}`: {e}"))?;
        }
        if let Ok(backend) = std::env::var("STUDENT_STORE") {
            self.storage.backend = Some(backend.parse()?);
        }
        if let Ok(path) = std::env::var("STUDENT_STORE_PATH") {
            self.storage.path = path;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // server
        self.server.normalize()?;
        // database url may come from DATABASE_URL
        self.database.normalize_from_env();
        if self.storage.backend.is_none() {
            self.storage.backend = Some(if self.database.url.trim().is_empty() {
                StorageBackend::File
            } else {
                StorageBackend::Postgres
            });
        }
        if self.storage_backend() == StorageBackend::Postgres {
            self.database.validate()?;
        }
        if self.storage_backend() == StorageBackend::File && self.storage.path.trim().is_empty() {
            return Err(anyhow!("storage.path must not be empty for the file backend"));
        }
        Ok(())
    }

    /// Resolved backend; call after `normalize_and_validate`.
    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend.unwrap_or(StorageBackend::File)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // env only fills an unset url
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.storage.path, "data/students.json");
        assert!(cfg.storage.backend.is_none());
    }

    #[test]
    fn parses_storage_section() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, Some(StorageBackend::Memory));
    }

    #[test]
    fn backend_from_str_accepts_aliases() {
        assert_eq!("JSON".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!(" postgresql ".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("mongo".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn postgres_backend_requires_valid_url() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = Some(StorageBackend::Postgres);
        cfg.database.url = "mysql://localhost/db".into();
        assert!(cfg.normalize_and_validate().is_err());

        cfg.database.url = "postgres://u:p@localhost/students".into();
        assert!(cfg.normalize_and_validate().is_ok());
    }

    #[test]
    fn zero_workers_fall_back_to_four() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = Some(StorageBackend::Memory);
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    fn scratch_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("configs_{}_{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("configs_{}_absent.toml", std::process::id()));
        let cfg = load_file_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert!(cfg.storage.backend.is_none());
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() {
        let path = scratch_file(
            "malformed",
            r#"
            [server]
            host = "0.0.0.0"
            port = "eighty"

            [storage]
            backend = "memory"
            "#,
        );
        let res = load_file_or_default(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);
        assert!(res.is_err());
    }

    #[test]
    fn present_file_is_loaded() {
        let path = scratch_file("present", "[storage]\nbackend = \"memory\"\n");
        let cfg = load_file_or_default(path.to_str().unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(cfg.storage.backend, Some(StorageBackend::Memory));
    }

    #[test]
    fn default_storage_path_is_set() {
        assert_eq!(StorageConfig::default().path, "data/students.json");
    }

    #[test]
    fn memory_backend_ignores_database() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = Some(StorageBackend::Memory);
        cfg.database.url = "not a url".into();
        assert!(cfg.normalize_and_validate().is_ok());
        assert_eq!(cfg.storage_backend(), StorageBackend::Memory);
    }
}
