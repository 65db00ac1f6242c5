use super::{controllers, middleware, models};
use axum::{
    middleware::from_fn,
    routing::{delete, get, Router},
};

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/", get(controllers::root))
        .route("/ping", get(controllers::pong))
        .route("/notes", get(controllers::list_notes).post(controllers::save_note))
        .route("/notes/new", get(controllers::new_note_form))
        .route("/notes/:id", delete(controllers::delete_note))
        .route("/notes/:id/edit", get(controllers::edit_note_form))
        .route("/notes/:id/delete", get(controllers::confirm_delete_form))
        .route("/modal/close", get(controllers::close_modal))
}

pub fn app(state: models::AppState) -> Router {
    get_routes()
        .layer(from_fn(middleware::html_headers))
        .with_state(state)
}
