use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use persistence::Stats;

pub async fn stats(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    let stats = state.run_store(|store| store.stats()).await?;
    Ok(Json(stats))
}
