use crate::api::auth::require_admin;
use crate::api::handlers::{chapter, import, manga, reader};
use crate::api::types::AppState;
use crate::library::Library;
use crate::reader::Reader;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router(library: Library, reader: Reader, admin_token: Option<String>) -> Router {
    let state = AppState {
        library,
        reader,
        admin_token,
    };

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/mangas",
            get(manga::list_mangas).post(manga::create_manga),
        )
        .route(
            "/mangas/:id",
            get(manga::get_manga)
                .put(manga::update_manga)
                .delete(manga::delete_manga),
        )
        .route(
            "/mangas/:id/chapters",
            get(chapter::list_chapters).post(chapter::add_chapter),
        )
        .route("/mangas/:id/chapter/:number", get(reader::read_chapter))
        .route("/mangas/:id/import", post(import::bulk_import))
        .route(
            "/chapters/:id",
            get(chapter::get_chapter)
                .put(chapter::update_chapter)
                .delete(chapter::delete_chapter),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
