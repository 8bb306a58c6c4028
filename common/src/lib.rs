use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod models {
    use super::*;

    /// Listing projection of a game, carrying the joined genre name.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GameSummaryDto {
        pub id: i32,
        pub name: String,
        pub genre_name: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub price: Decimal,
        pub release_date: NaiveDate,
    }

    /// Single-game projection. Only the raw genre id is exposed.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GameDetailsDto {
        pub id: i32,
        pub name: String,
        pub genre_id: i32,
        #[serde(with = "rust_decimal::serde::float")]
        pub price: Decimal,
        pub release_date: NaiveDate,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateGameDto {
        pub name: String,
        pub genre_id: i32,
        #[serde(with = "rust_decimal::serde::float")]
        pub price: Decimal,
        pub release_date: NaiveDate,
    }

    /// Full replacement of a game. The id travels in the route path.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UpdateGameDto {
        pub name: String,
        pub genre_id: i32,
        #[serde(with = "rust_decimal::serde::float")]
        pub price: Decimal,
        pub release_date: NaiveDate,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GenreDto {
        pub id: i32,
        pub name: String,
    }
}

pub mod validation {
    use super::*;

    pub const MAX_NAME_LENGTH: usize = 50;

    fn validate_name(name: &str, errors: &mut ValidationErrors) {
        if name.trim().is_empty() {
            errors.add("name", "The Name field is required.");
        } else if name.chars().count() > MAX_NAME_LENGTH {
            errors.add(
                "name",
                format!("The field Name must be a string with a maximum length of {}.", MAX_NAME_LENGTH),
            );
        }
    }

    fn validate_price(price: Decimal, errors: &mut ValidationErrors) {
        if price < Decimal::ZERO {
            errors.add("price", "The field Price must be greater than or equal to 0.");
        }
    }

    pub fn validate_create_game(req: &CreateGameDto) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&req.name, &mut errors);
        validate_price(req.price, &mut errors);
        errors.into_result()
    }

    pub fn validate_update_game(req: &UpdateGameDto) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&req.name, &mut errors);
        validate_price(req.price, &mut errors);
        errors.into_result()
    }
}

pub mod errors {
    use std::collections::BTreeMap;
    use std::fmt;

    use super::*;

    /// Field name to the list of messages describing what is wrong with it.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
    #[serde(transparent)]
    pub struct ValidationErrors {
        fields: BTreeMap<String, Vec<String>>,
    }

    impl ValidationErrors {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
            let mut errors = Self::new();
            errors.add(field, message);
            errors
        }

        pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
            self.fields.entry(field.into()).or_default().push(message.into());
        }

        pub fn is_empty(&self) -> bool {
            self.fields.is_empty()
        }

        pub fn get(&self, field: &str) -> Option<&[String]> {
            self.fields.get(field).map(Vec::as_slice)
        }

        pub fn into_result(self) -> Result<(), Self> {
            if self.is_empty() { Ok(()) } else { Err(self) }
        }
    }

    impl fmt::Display for ValidationErrors {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut first = true;
            for (field, messages) in &self.fields {
                for message in messages {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", field, message)?;
                    first = false;
                }
            }
            Ok(())
        }
    }

    impl std::error::Error for ValidationErrors {}
}

pub use models::*;
pub use validation::*;
pub use errors::*;
