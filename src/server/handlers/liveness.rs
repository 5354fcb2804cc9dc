use crate::server::state::AppState;
use axum::extract::State;

/// Catch-all route: report that the relay is up
pub async fn liveness(State(state): State<AppState>) -> String {
    state.config.liveness_message.clone()
}
