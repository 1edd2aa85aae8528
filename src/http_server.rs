use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::{ApiKeyStatus, Config};
use crate::error::PipelineError;
use crate::in_flight::InFlightGate;
use crate::models::{GenerationRequest, ImageBlob, RestaurantInfo};
use crate::pipeline::FoodImagePipeline;

/// Upper bound on one multipart upload.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const SESSION_HEADER: &str = "x-session-id";
const ANONYMOUS_SESSION: &str = "anonymous";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: FoodImagePipeline,
    pub key_status: ApiKeyStatus,
    pub in_flight: InFlightGate,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// Builds the router. Fails when the API key is missing or malformed.
pub fn create_server(config: &Config) -> Result<Router> {
    info!("🔑 Validating OpenAI API key");
    let pipeline = FoodImagePipeline::from_config(config).map_err(|e| {
        error!("❌ {}", e);
        anyhow!("{}", e)
    })?;
    info!("✅ API key configured correctly");

    Ok(router(AppState {
        pipeline,
        key_status: config.api_key_status(),
        in_flight: InFlightGate::new(),
    }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/api/key-status", get(key_status))
        .route("/api/generate", post(generate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "RestoGenie food image service is running",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn key_status(State(state): State<AppState>) -> Json<ApiKeyStatus> {
    Json(state.key_status)
}

async fn generate(State(state): State<AppState>, headers: HeaderMap, multipart: Multipart) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_SESSION)
        .to_string();

    info!("[{}] 📥 Generation request | session: {}", request_id, session_id);

    let Some(_guard) = state.in_flight.try_acquire(&session_id) else {
        warn!("[{}] ⏳ Session {} already has a generation in flight", request_id, session_id);
        return error_response(
            StatusCode::CONFLICT,
            "A generation is already in progress for this session",
        );
    };

    let request = match read_generation_request(multipart).await {
        Ok(request) => request,
        Err(response) => {
            warn!("[{}] 🚫 Rejected malformed generation request", request_id);
            return response;
        }
    };

    if request.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Provide a prompt or at least one raw image",
        );
    }

    match state.pipeline.generate(&request).await {
        Ok(result) => {
            info!("[{}] ✅ Generation complete", request_id);
            Json(result).into_response()
        }
        Err(PipelineError::Generation(e)) => {
            error!("[{}] ❌ Generation failed: {}", request_id, e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            error!("[{}] ❌ Pipeline error: {}", request_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn read_generation_request(mut multipart: Multipart) -> Result<GenerationRequest, Response> {
    let mut request = GenerationRequest::default();
    let mut name = String::new();
    let mut cuisine_type = String::new();
    let mut brand_personality = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Multipart read error: {}", e);
                return Err(error_response(e.status(), format!("Failed to read upload: {}", e.body_text())));
            }
        };

        let field_name = field.name().unwrap_or_default().to_string();
        debug!("Reading multipart field '{}'", field_name);

        match field_name.as_str() {
            "prompt" => request.prompt_text = read_text(field).await?,
            "restaurant_name" => name = read_text(field).await?,
            "cuisine_type" => cuisine_type = read_text(field).await?,
            "brand_personality" => brand_personality = read_text(field).await?,
            "raw_images" => request.raw_images.push(read_image(field).await?),
            "reference_image" => request.reference_image = Some(read_image(field).await?),
            other => debug!("Ignoring unknown multipart field '{}'", other),
        }
    }

    let (name, cuisine_type, brand_personality) =
        (name.trim(), cuisine_type.trim(), brand_personality.trim());
    if !name.is_empty() && !cuisine_type.is_empty() && !brand_personality.is_empty() {
        request.restaurant_info = Some(RestaurantInfo::new(name, cuisine_type, brand_personality));
    }

    Ok(request)
}

async fn read_text(field: Field<'_>) -> Result<String, Response> {
    field.text().await.map_err(|e| {
        warn!("Field read error: {}", e);
        error_response(e.status(), format!("Failed to read field: {}", e.body_text()))
    })
}

async fn read_image(field: Field<'_>) -> Result<ImageBlob, Response> {
    let content_type = field.content_type().map(str::to_string);
    if !content_type.as_deref().is_some_and(|ct| ct.starts_with("image/")) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "Uploaded file '{}' is not an image",
                field.file_name().unwrap_or("<unnamed>")
            ),
        ));
    }

    let data = field.bytes().await.map_err(|e| {
        warn!("Field read error: {}", e);
        error_response(e.status(), format!("Failed to read file data: {}", e.body_text()))
    })?;

    Ok(ImageBlob::from_bytes(data.to_vec(), content_type))
}

pub async fn start_http_server(config: Config) -> Result<()> {
    let app = create_server(&config)?;
    let port = config.port;

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow!("Failed to bind to port {}: {}", port, e))?;

    info!("HTTP server starting on port {}", port);
    info!("Generation endpoint: http://0.0.0.0:{}/api/generate", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
