use axum::{
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::db::GameStoreContext;
use crate::handlers::{create_game, delete_game, get_game, list_games, list_genres, update_game};
use crate::middleware::request_id_middleware;

pub fn create_routes(ctx: GameStoreContext) -> Router {
    Router::new()
        .merge(games_routes())
        .merge(genre_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(ctx)
}

fn games_routes() -> Router<GameStoreContext> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game).put(update_game).delete(delete_game))
}

fn genre_routes() -> Router<GameStoreContext> {
    Router::new().route("/genres", get(list_genres))
}
