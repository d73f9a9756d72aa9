use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::stop_controller::StopController;
use crate::dto::api_response::ApiResponse;
use crate::dto::stop_dto::{
    DeleteStopQuery, FormOptionsResponse, StopFilterQuery, StopFormRequest, StopResponse,
};
use crate::models::report::{MapView, StopSelectionItem};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_stop_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stops).post(create_stop))
        .route("/options", get(form_options))
        .route("/bairros", get(list_neighborhoods))
        .route("/selecao", get(selection_list))
        .route("/mapa", get(map_view))
        .route("/:id", get(get_stop).put(update_stop).delete(delete_stop))
}

async fn create_stop(
    State(state): State<AppState>,
    Json(request): Json<StopFormRequest>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = StopController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_stops(
    State(state): State<AppState>,
    Query(query): Query<StopFilterQuery>,
) -> Result<Json<Vec<StopResponse>>, AppError> {
    let controller = StopController::new(&state);
    let response = controller.list(query.into()).await?;
    Ok(Json(response))
}

async fn form_options() -> Json<FormOptionsResponse> {
    Json(FormOptionsResponse::canonical())
}

async fn list_neighborhoods(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let controller = StopController::new(&state);
    Ok(Json(controller.neighborhoods().await?))
}

async fn selection_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<StopSelectionItem>>, AppError> {
    let controller = StopController::new(&state);
    Ok(Json(controller.selection().await?))
}

async fn map_view(
    State(state): State<AppState>,
    Query(query): Query<StopFilterQuery>,
) -> Result<Json<MapView>, AppError> {
    let controller = StopController::new(&state);
    Ok(Json(controller.map(query.into()).await?))
}

async fn get_stop(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StopResponse>, AppError> {
    let controller = StopController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_stop(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<StopFormRequest>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = StopController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_stop(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<DeleteStopQuery>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = StopController::new(&state);
    let response = controller
        .delete(id, query.confirmar.unwrap_or(false))
        .await?;
    Ok(Json(response))
}
