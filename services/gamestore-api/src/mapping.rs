use common::{CreateGameDto, GameDetailsDto, GameSummaryDto, GenreDto, UpdateGameDto};

use crate::models::{DbGame, DbGenre};

impl DbGame {
    /// The genre must already be joined; an unloaded relation maps to an
    /// empty genre name.
    pub fn to_summary_dto(&self) -> GameSummaryDto {
        GameSummaryDto {
            id: self.id,
            name: self.name.clone(),
            genre_name: self.genre.as_ref().map(|g| g.name.clone()).unwrap_or_default(),
            price: self.price,
            release_date: self.release_date,
        }
    }

    pub fn to_details_dto(&self) -> GameDetailsDto {
        GameDetailsDto {
            id: self.id,
            name: self.name.clone(),
            genre_id: self.genre_id,
            price: self.price,
            release_date: self.release_date,
        }
    }
}

impl DbGenre {
    pub fn to_dto(&self) -> GenreDto {
        GenreDto {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

pub fn game_from_create(request: CreateGameDto) -> DbGame {
    DbGame {
        id: 0,
        name: request.name,
        genre_id: request.genre_id,
        genre: None,
        price: request.price,
        release_date: request.release_date,
    }
}

pub fn game_from_update(id: i32, request: UpdateGameDto) -> DbGame {
    DbGame {
        id,
        name: request.name,
        genre_id: request.genre_id,
        genre: None,
        price: request.price,
        release_date: request.release_date,
    }
}
