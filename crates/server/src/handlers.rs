//! # Route Handlers
//!
//! Every POST endpoint takes a JSON body `{"sentence": "<Thai text>"}`. The body is
//! extracted as a raw `Value` so that a missing or mistyped field yields the Thai
//! 400 message rather than axum's default rejection.

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use bystander::{
    keywords::{extract_keywords, DEFAULT_MAX_KEYWORDS},
    PlainGuidance, SectionedGuidance,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub const MISSING_SENTENCE_MESSAGE: &str = "ไม่พบข้อมูล 'sentence' ในคำขอ";
pub const INVALID_SENTENCE_MESSAGE: &str = "'sentence' ต้องเป็นสตริงที่ไม่ว่างเปล่า";

// --- API Payloads ---

#[derive(Serialize, Deserialize, Debug)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

/// Pulls a non-blank `sentence` string out of a request body.
fn require_sentence(payload: Result<Json<Value>, JsonRejection>) -> Result<String, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!("Unreadable request body: {rejection}");
        AppError::BadRequest(MISSING_SENTENCE_MESSAGE.to_string())
    })?;

    match body.get("sentence") {
        None => Err(AppError::BadRequest(MISSING_SENTENCE_MESSAGE.to_string())),
        Some(Value::String(sentence)) if !sentence.trim().is_empty() => Ok(sentence.clone()),
        Some(_) => Err(AppError::BadRequest(INVALID_SENTENCE_MESSAGE.to_string())),
    }
}

// --- Handlers ---

/// The handler for the root (`/`) endpoint.
pub async fn root() -> Html<&'static str> {
    Html("<h1>API ระบบแนะนำการปฐมพยาบาลเบื้องต้น ByStander</h1><p>API พร้อมใช้งานแล้ว โปรดดูเอกสารประกอบสำหรับวิธีการเรียกใช้งาน endpoint ต่างๆ</p>")
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Plain Thai first-aid guidance for one sentence.
///
/// Provider failures still return 200, with a Thai fallback message as guidance.
pub async fn generate_guidance_sentence_only_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PlainGuidance>, AppError> {
    let sentence = require_sentence(payload)?;
    info!("Received sentence-only guidance request");

    let guidance = app_state.guidance.generate_sentence_only(&sentence).await?;
    Ok(Json(guidance))
}

/// Sectioned guidance: emergency assessment, Thai steps and Thai reasoning.
pub async fn generate_guidance_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SectionedGuidance>, AppError> {
    let sentence = require_sentence(payload)?;
    info!("Received sectioned guidance request");

    let result = app_state.guidance.generate_guidance(&sentence).await?;
    info!(
        is_emergency = result.is_emergency,
        assessment = ?result.assessment,
        "Sectioned guidance ready"
    );
    Ok(Json(result))
}

/// Keywords of a Thai sentence, capped at `DEFAULT_MAX_KEYWORDS`.
pub async fn extract_keywords_handler(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let sentence = require_sentence(payload)?;
    let keywords = extract_keywords(&sentence, DEFAULT_MAX_KEYWORDS);
    info!(count = keywords.len(), "Extracted keywords");
    Ok(Json(KeywordsResponse { keywords }))
}
