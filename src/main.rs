//! Doc Extractor - structured field extraction from uploaded documents via a local LLM.

mod config;
mod document;
mod error;
mod normalize;
mod ollama;
mod parser;
mod pipeline;
mod prompt;
mod schema;
mod text_extractor;
mod upload_store;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use config::Settings;
use document::Document;
use error::ExtractError;
use pipeline::Pipeline;
use schema::Extraction;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "doc_extractor=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    info!(
        "Inference server: {} (model: {}, timeout: {:?}, max chars: {})",
        settings.ollama_url, settings.model, settings.inference_timeout, settings.max_chars
    );

    let state = AppState {
        pipeline: Arc::new(Pipeline::new(&settings)?),
    };

    let app = router(state, settings.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Server listening on http://{}", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract", post(extract_document))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Upload a document and extract its structured fields.
async fn extract_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Extraction>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = base_filename(field.file_name().unwrap_or_default());
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read file: {}", e)))?
                .to_vec();
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| bad_request("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(bad_request("No selected file".to_string()));
    }

    info!("Received file: {} ({} bytes)", filename, data.len());

    let document = Document::new(filename, data);
    state
        .pipeline
        .run(&document)
        .await
        .map(Json)
        .map_err(|e| {
            warn!("Extraction failed for {}: {}", document.filename, e);
            (
                status_for(&e),
                Json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() })),
            )
        })
}

// ============================================================================
// Helper functions
// ============================================================================

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": message })))
}

fn status_for(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::UnsupportedFormat { .. } => StatusCode::BAD_REQUEST,
        ExtractError::ExtractionFailure { .. } | ExtractError::EmptyDocument => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ExtractError::Inference(_) | ExtractError::Parse(_) => StatusCode::BAD_GATEWAY,
        ExtractError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Strip any client-side directory components from an uploaded filename.
fn base_filename(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or_default().trim().to_string()
}
