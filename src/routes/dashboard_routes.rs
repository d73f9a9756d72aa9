use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::stop_dto::StopFilterQuery;
use crate::models::report::DashboardReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(dashboard_summary))
}

async fn dashboard_summary(
    State(state): State<AppState>,
    Query(query): Query<StopFilterQuery>,
) -> Result<Json<DashboardReport>, AppError> {
    let controller = DashboardController::new(&state);
    let report = controller.summary(query.into()).await?;
    Ok(Json(report))
}
