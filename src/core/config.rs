use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::shared::constants::{DEFAULT_INDENT_WIDTH, DEFAULT_MAX_TREE_DEPTH};

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub tree: TreeConfig,
}

/// Backend REST API connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Where the logged-in session is persisted between invocations
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub path: PathBuf,
}

/// Category tree rendering settings
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Columns of indentation per depth level
    pub indent_width: usize,
    /// Deepest level rendered before the tree is treated as corrupt
    pub max_depth: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            api: ApiConfig::from_env()?,
            session: SessionConfig::from_env()?,
            tree: TreeConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("CATALOG_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!(
                "CATALOG_API_URL must start with http:// or https:// (got '{}')",
                base_url
            ));
        }

        let timeout_secs = env::var("CATALOG_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CATALOG_API_TIMEOUT_SECS must be a valid number".to_string())?;

        let user_agent = format!("catalog-admin/{}", env!("CARGO_PKG_VERSION"));

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, String> {
        let path = match env::var("CATALOG_SESSION_FILE") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => Self::default_path(),
        };

        Ok(Self { path })
    }

    /// `$HOME/.catalog-admin/session.json`, or the working directory when HOME is unset
    fn default_path() -> PathBuf {
        env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".catalog-admin")
            .join("session.json")
    }
}

impl TreeConfig {
    pub fn from_env() -> Result<Self, String> {
        let indent_width = env::var("CATALOG_TREE_INDENT")
            .unwrap_or_else(|_| DEFAULT_INDENT_WIDTH.to_string())
            .parse::<usize>()
            .map_err(|_| "CATALOG_TREE_INDENT must be a valid number".to_string())?;

        let max_depth = env::var("CATALOG_TREE_MAX_DEPTH")
            .unwrap_or_else(|_| DEFAULT_MAX_TREE_DEPTH.to_string())
            .parse::<usize>()
            .map_err(|_| "CATALOG_TREE_MAX_DEPTH must be a valid number".to_string())?;

        if max_depth == 0 {
            return Err("CATALOG_TREE_MAX_DEPTH must be at least 1".to_string());
        }

        Ok(Self {
            indent_width,
            max_depth,
        })
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            max_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}
