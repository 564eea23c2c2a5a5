use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::predictions::*;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

// Every prediction route requires a session token
pub fn prediction_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(submit_predictions))
        .route("/board", get(get_board))
        .route("/mine", get(get_my_predictions))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
