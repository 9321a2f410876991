//! HTTP front end over the core encode/decode/analyze operations, for
//! callers that would rather speak HTTP than shell out to the CLI.
//! `/encode` returns the WAV file itself; `/decode` and `/analyze` take
//! it back base64-encoded inside JSON, mirroring the original system's
//! endpoint shapes.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wfsk_core::{analyze, decode_message, encode_message, mode_by_name, read_wav};

use crate::config::CliConfig;

#[derive(Clone)]
struct AppState {
    config: Arc<CliConfig>,
}

pub fn build_router(config: CliConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/healthz", get(handle_healthz))
        .route("/encode", post(handle_encode))
        .route("/decode", post(handle_decode))
        .route("/analyze", post(handle_analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: CliConfig, port: u16) -> std::io::Result<()> {
    let app = build_router(config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, app).await
}

async fn handle_healthz() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
struct EncodeRequest {
    text: String,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl ToString) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Mirrors the original system's `/generate_signal` endpoint: the
/// response body *is* the WAV file, not a JSON envelope around it.
async fn handle_encode(
    State(state): State<AppState>,
    Json(req): Json<EncodeRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let mode_name = req.mode.unwrap_or_else(|| state.config.default_mode.clone());
    let config = mode_by_name(&mode_name).map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;
    let wav = encode_message(&req.text, &config)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=generated_signal.wav".to_string(),
            ),
        ],
        Bytes::from(wav),
    )
        .into_response())
}

#[derive(Deserialize)]
struct DecodeRequest {
    wav_base64: String,
    #[serde(default)]
    mode_hint: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct DecodeResponse {
    decoded_text: String,
    detected_mode: String,
}

/// Mirrors the original system's `/decode_signal` endpoint, trading its
/// multipart file upload for a base64-encoded JSON body (this core only
/// ever accepts WAV, so there is no format-sniffing step to preserve).
async fn handle_decode(
    State(state): State<AppState>,
    Json(req): Json<DecodeRequest>,
) -> Result<Json<DecodeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let wav_bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.wav_base64)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("invalid base64: {e}")))?;
    let (pcm, sample_rate, _channels) =
        read_wav(&wav_bytes).map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;
    let hint = req.mode_hint.unwrap_or_else(|| state.config.default_mode.clone());

    let outcome = decode_message(&pcm, sample_rate, &hint)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(DecodeResponse {
        decoded_text: outcome.text,
        detected_mode: outcome.detected_mode,
    }))
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    wav_base64: String,
}

#[derive(Serialize)]
struct PacketAnalysisResponse {
    packet_index: usize,
    found_at_s: f64,
    rs_decode_success: bool,
    rs_errors_corrected: i32,
    crc_valid: bool,
    packet_num: Option<u16>,
    total_packets: Option<u16>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    mode: Option<String>,
    packets: Vec<PacketAnalysisResponse>,
}

async fn handle_analyze(
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let wav_bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.wav_base64)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("invalid base64: {e}")))?;
    let (pcm, sample_rate, _channels) =
        read_wav(&wav_bytes).map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    let outcome =
        analyze(&pcm, sample_rate).map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(AnalyzeResponse {
        mode: outcome.mode,
        packets: outcome
            .analyses
            .into_iter()
            .map(|a| PacketAnalysisResponse {
                packet_index: a.packet_index,
                found_at_s: a.found_at_s,
                rs_decode_success: a.rs_decode_success,
                rs_errors_corrected: a.rs_errors_corrected,
                crc_valid: a.crc_valid,
                packet_num: a.packet_num,
                total_packets: a.total_packets,
            })
            .collect(),
    }))
}
