use crate::analysis::ContractAnalysis;
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::extractor;
use crate::gemini_client::GeminiClient;
use crate::presenter::{self, AnalysisView};
use crate::prompt;
use crate::response_parser;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Gemini generateContent API.
    pub gemini: GeminiClient,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-contract-api",
            "version": "0.1.0"
        })),
    )
}

/// Pull the `doc` file field out of the multipart body.
///
/// Returns the raw bytes and the declared content type. A body without a
/// `doc` field is a 400.
async fn read_doc_field(multipart: &mut Multipart) -> Result<(Vec<u8>, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("doc") {
            continue;
        }
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read uploaded file: {}", e)))?;
        return Ok((bytes.to_vec(), mime_type));
    }

    Err(AppError::BadRequest(
        "Contract doc is required!".to_string(),
    ))
}

/// The full document-analysis pipeline for one upload.
///
/// bytes -> extracted text -> prompt -> model -> parsed analysis. Every
/// failure is terminal for the request; no tier retries.
async fn run_analysis(
    state: &AppState,
    bytes: Vec<u8>,
    mime_type: String,
) -> Result<ContractAnalysis, AppError> {
    // Text extraction is CPU-bound, keep it off the async workers
    let extracted_text =
        tokio::task::spawn_blocking(move || extractor::extract_text(&bytes, &mime_type))
            .await
            .map_err(|e| AppError::InternalError(format!("Extraction task failed: {}", e)))?
            .context("Extracting text from uploaded contract")?;

    let analysis_prompt = prompt::build_analysis_prompt(&extracted_text);
    let raw_response = state.gemini.generate(&analysis_prompt).await?;

    response_parser::parse_analysis_response(&raw_response)
}

/// POST /api/ai-contract-analyzer
///
/// Multipart form with field `doc` = PDF or DOCX file. Returns the
/// structured `ContractAnalysis` on success.
pub async fn analyze_contract(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    tracing::info!("POST /api/ai-contract-analyzer");

    let (bytes, mime_type) = read_doc_field(&mut multipart).await?;
    let analysis = run_analysis(&state, bytes, mime_type).await?;

    tracing::info!(
        "Contract analyzed successfully: model='{}', type='{}', {} parties, {} risks",
        state.config.gemini_model,
        analysis.contract_type,
        analysis.parties.len(),
        analysis.risks.len()
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Contract analyzed successfully",
            "data": analysis,
        })),
    ))
}

/// POST /api/ai-contract-analyzer/view
///
/// Same input as the analyzer endpoint, but responds with the grouped
/// dashboard sections instead of the raw analysis record.
pub async fn analyze_contract_view(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    tracing::info!("POST /api/ai-contract-analyzer/view");

    let (bytes, mime_type) = read_doc_field(&mut multipart).await?;
    let analysis = run_analysis(&state, bytes, mime_type).await?;
    let view: AnalysisView = presenter::build_view(&analysis);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Contract analyzed successfully",
            "data": view,
        })),
    ))
}
