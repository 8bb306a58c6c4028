use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbGenre {
     pub id: i32,
     pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbGame {
     pub id: i32,
     pub name: String,
     pub genre_id: i32,
     /// Only populated when the query joined `genres`.
     pub genre: Option<DbGenre>,
     pub price: Decimal,
     pub release_date: NaiveDate,
}

impl<'r> FromRow<'r, SqliteRow> for DbGame {
     fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
          let genre_id: i32 = row.try_get("genre_id")?;

          let genre = match row.try_get::<Option<String>, _>("genre_name") {
               Ok(Some(name)) => Some(DbGenre { id: genre_id, name }),
               Ok(None) | Err(sqlx::Error::ColumnNotFound(_)) => None,
               Err(e) => return Err(e),
          };

          let price: String = row.try_get("price")?;
          let price = Decimal::from_str(&price).map_err(|e| sqlx::Error::ColumnDecode {
               index: "price".to_string(),
               source: Box::new(e),
          })?;

          Ok(DbGame {
               id: row.try_get("id")?,
               name: row.try_get("name")?,
               genre_id,
               genre,
               price,
               release_date: row.try_get("release_date")?,
          })
     }
}
