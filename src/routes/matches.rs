use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{commentary, matches};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(matches::list_matches))
        .route("/", post(matches::create_match))
        .route("/:id/commentary", get(commentary::list_commentary))
        .route("/:id/commentary", post(commentary::create_commentary))
}
