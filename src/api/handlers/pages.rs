use crate::AppState;
use crate::api::error::AppError;
use crate::portal::i18n::Language;
use crate::portal::render::render_page;
use crate::portal::state::{PortalEvent, PortalState};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, header},
    response::Html,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub lang: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TranslationTable {
    pub language: Language,
    #[schema(value_type = Object)]
    pub strings: BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize, ToSchema)]
pub struct LanguageInfo {
    #[schema(value_type = String)]
    pub code: &'static str,
    #[schema(value_type = String)]
    pub name: &'static str,
}

/// `?lang=` wins over `Accept-Language`, which wins over the configured default.
fn choose_language(state: &AppState, query: &IndexQuery, headers: &HeaderMap) -> Language {
    query
        .lang
        .as_deref()
        .and_then(Language::from_code)
        .or_else(|| {
            headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .and_then(Language::negotiate)
        })
        .or_else(|| Language::from_code(&state.config.default_language))
        .unwrap_or_default()
}

/// Portal page with the first card grid already rendered.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let language = choose_language(&state, &query, &headers);

    let listing = match state.storage.list().await {
        Ok(files) => PortalEvent::ListingLoaded(files),
        Err(e) => {
            tracing::error!("Index page could not list files: {}", e);
            PortalEvent::ListingFailed
        }
    };

    let portal = PortalState::new(language)
        .apply(listing)
        .apply(PortalEvent::QueryChanged(query.q.unwrap_or_default()));

    Ok(Html(render_page(&portal)?))
}

#[utoipa::path(
    get,
    path = "/api/i18n",
    responses(
        (status = 200, description = "Supported languages", body = [LanguageInfo])
    ),
    tag = "i18n"
)]
pub async fn list_languages() -> Json<Vec<LanguageInfo>> {
    Json(
        Language::ALL
            .into_iter()
            .map(|lang| LanguageInfo {
                code: lang.code(),
                name: lang.native_name(),
            })
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/api/i18n/{lang}",
    params(
        ("lang" = String, Path, description = "Two-letter language code; unknown codes get the base language")
    ),
    responses(
        (status = 200, description = "UI strings for the language", body = TranslationTable)
    ),
    tag = "i18n"
)]
pub async fn translations(Path(lang): Path<String>) -> Json<TranslationTable> {
    let language = Language::from_code(&lang).unwrap_or_default();
    Json(TranslationTable {
        language,
        strings: language.strings(),
    })
}
