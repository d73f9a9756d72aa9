use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::session_controller::SessionController;
use crate::dto::api_response::ApiResponse;
use crate::dto::session_dto::{CaptureResponse, GpsFixRequest, MapClickRequest, SessionResponse};
use crate::dto::stop_dto::{StopFormRequest, StopResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_session_router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_session))
        .route("/:id", get(get_session).delete(close_session))
        .route("/:id/gps", post(gps_fix))
        .route("/:id/mapa", post(map_click))
        .route("/:id/cadastro", post(submit_form))
}

async fn open_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let controller = SessionController::new(&state);
    Json(controller.open().await)
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let controller = SessionController::new(&state);
    Ok(Json(controller.get(id).await?))
}

async fn gps_fix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GpsFixRequest>,
) -> Result<Json<CaptureResponse>, AppError> {
    let controller = SessionController::new(&state);
    Ok(Json(controller.gps(id, request).await?))
}

async fn map_click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MapClickRequest>,
) -> Result<Json<CaptureResponse>, AppError> {
    let controller = SessionController::new(&state);
    Ok(Json(controller.map_click(id, request).await?))
}

async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StopFormRequest>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = SessionController::new(&state);
    Ok(Json(controller.submit(id, request).await?))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = SessionController::new(&state);
    controller.close(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Sessão encerrada"
    })))
}
