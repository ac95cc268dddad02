use std::env;
use std::path::PathBuf;

/// Runtime configuration for the portal
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Storage directory for uploaded files (default: "public/uploads")
    pub upload_dir: PathBuf,

    /// Directory holding the static js/css assets (default: "public")
    pub public_dir: PathBuf,

    /// Port for the HTTP server (default: 8090)
    pub port: u16,

    /// Bind address (default: "0.0.0.0")
    pub bind_address: String,

    /// Maximum upload size in bytes (default: 64 MB)
    pub max_file_size: usize,

    /// Base language for the renderer (default: "en")
    pub default_language: String,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public/uploads"),
            public_dir: PathBuf::from("public"),
            port: 8090,
            bind_address: "0.0.0.0".to_string(),
            max_file_size: 64 * 1024 * 1024, // 64 MB
            default_language: "en".to_string(),
            allowed_origins: vec![
                "http://localhost:8090".to_string(),
                "http://127.0.0.1:8090".to_string(),
            ],
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.public_dir),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            bind_address: env::var("BIND_ADDRESS").unwrap_or(default.bind_address),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            default_language: env::var("DEFAULT_LANGUAGE")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(default.default_language),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development and tests, rooted at the given directory
    pub fn development(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            upload_dir: root.join("uploads"),
            public_dir: root.join("public"),
            max_file_size: 1024 * 1024,
            ..Self::default()
        }
    }
}
