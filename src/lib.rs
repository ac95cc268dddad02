pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod portal;
pub mod services;
pub mod utils;

use crate::config::PortalConfig;
use crate::services::storage::StorageService;
use crate::services::upload_service::UploadService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::files::list_files,
        api::handlers::upload::upload_file,
        api::handlers::pages::list_languages,
        api::handlers::pages::translations,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            models::FileDescriptor,
            models::UploadResponse,
            portal::i18n::Language,
            api::handlers::pages::TranslationTable,
            api::handlers::pages::LanguageInfo,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "Listing and uploading shared files"),
        (name = "i18n", description = "Portal UI strings"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub upload_service: Arc<UploadService>,
    pub config: PortalConfig,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageService>, config: PortalConfig) -> Self {
        Self {
            upload_service: Arc::new(UploadService::new(storage.clone())),
            storage,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let public_dir = state.config.public_dir.clone();
    let upload_dir = state.config.upload_dir.clone();
    let body_limit = state.config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::pages::index))
        .route("/health", get(api::handlers::health::health_check))
        .route("/api/files", get(api::handlers::files::list_files))
        .route(
            "/api/upload",
            post(api::handlers::upload::upload_file)
                .fallback(api::handlers::upload::invalid_method)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/i18n", get(api::handlers::pages::list_languages))
        .route("/api/i18n/:lang", get(api::handlers::pages::translations))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .nest_service("/js", ServeDir::new(public_dir.join("js")))
        .nest_service("/css", ServeDir::new(public_dir.join("css")))
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors)
        .with_state(state)
}
