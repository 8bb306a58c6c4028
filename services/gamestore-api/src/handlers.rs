use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
};
use common::{
    validate_create_game, validate_update_game, CreateGameDto, GameDetailsDto, GameSummaryDto,
    GenreDto, UpdateGameDto,
};

use crate::db::GameStoreContext;
use crate::error::GameServiceError;
use crate::mapping::{game_from_create, game_from_update};
use crate::models::{DbGame, DbGenre};

pub async fn list_games(
    State(ctx): State<GameStoreContext>,
) -> Result<ResponseJson<Vec<GameSummaryDto>>, GameServiceError> {
    let mut uow = ctx.begin().await?;
    let games = uow.games().list_with_genre().await?;

    Ok(ResponseJson(games.iter().map(DbGame::to_summary_dto).collect()))
}

pub async fn get_game(
    State(ctx): State<GameStoreContext>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<GameDetailsDto>, GameServiceError> {
    let mut uow = ctx.begin().await?;

    match uow.games().find(id).await? {
        Some(game) => Ok(ResponseJson(game.to_details_dto())),
        None => Err(GameServiceError::GameNotFound(id)),
    }
}

pub async fn create_game(
    State(ctx): State<GameStoreContext>,
    payload: Result<Json<CreateGameDto>, JsonRejection>,
) -> Result<impl IntoResponse, GameServiceError> {
    let Json(request) = payload?;
    validate_create_game(&request)?;

    let mut game = game_from_create(request);

    let mut uow = ctx.begin().await?;
    game.id = uow.games().add(&game).await?;
    uow.commit().await?;

    log::info!("created game {} ({})", game.id, game.name);

    let location = format!("/games/{}", game.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        ResponseJson(game.to_details_dto()),
    ))
}

pub async fn update_game(
    State(ctx): State<GameStoreContext>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateGameDto>, JsonRejection>,
) -> Result<StatusCode, GameServiceError> {
    let Json(request) = payload?;
    validate_update_game(&request)?;

    // No read before the write: existence is decided by the rows it touched.
    let mut uow = ctx.begin().await?;
    let updated = uow.games().update(&game_from_update(id, request)).await?;
    if updated == 0 {
        return Err(GameServiceError::GameNotFound(id));
    }
    uow.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_game(
    State(ctx): State<GameStoreContext>,
    Path(id): Path<i32>,
) -> Result<StatusCode, GameServiceError> {
    let mut uow = ctx.begin().await?;
    let removed = uow.games().delete_by_id(id).await?;
    uow.commit().await?;

    log::debug!("delete game {}: {} row(s) removed", id, removed);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_genres(
    State(ctx): State<GameStoreContext>,
) -> Result<ResponseJson<Vec<GenreDto>>, GameServiceError> {
    let mut uow = ctx.begin().await?;
    let genres = uow.genres().list().await?;

    Ok(ResponseJson(genres.iter().map(DbGenre::to_dto).collect()))
}
