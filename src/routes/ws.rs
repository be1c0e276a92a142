use axum::{routing::get, Router};

use crate::handlers::ws;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws::ws_handler))
}
