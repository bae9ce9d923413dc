use crate::handlers::{gifts, health, likes, matches, stats, users, ws};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/search", get(users::search_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/{id}/photos",
            get(users::list_photos).post(users::add_photo),
        )
        .route("/users/{id}/matches", get(matches::list_matches))
        .route("/users/{id}/gifts", get(users::list_user_gifts))
        .route("/likes", post(likes::record_like))
        .route("/likes/mutual", get(likes::check_mutual))
        .route(
            "/matches/{id}/messages",
            get(matches::list_messages).post(matches::send_message),
        )
        .route("/gifts", get(gifts::list_gifts))
        .route("/gifts/send", post(gifts::send_gift))
        .route("/stats", get(stats::stats))
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
