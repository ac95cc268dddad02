use crate::config::PortalConfig;
use crate::services::storage::LocalStorageService;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn setup_storage(config: &PortalConfig) -> Arc<LocalStorageService> {
    let storage = LocalStorageService::new(&config.upload_dir);

    // The directory is created lazily by the first upload.
    match tokio::fs::try_exists(storage.root()).await {
        Ok(true) => info!("📂 Storage directory: {}", storage.root().display()),
        Ok(false) => info!(
            "📂 Storage directory {} does not exist yet, it will be created on first upload",
            storage.root().display()
        ),
        Err(e) => warn!(
            "⚠️  Cannot inspect storage directory {}: {}",
            storage.root().display(),
            e
        ),
    }

    Arc::new(storage)
}
