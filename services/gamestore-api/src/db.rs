//! Persistence context over SQLite.
//!
//! Every request opens its own [`UnitOfWork`], a store transaction that stages
//! writes until [`UnitOfWork::commit`] is called. Dropping a unit of work
//! without committing rolls it back.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::models::{DbGame, DbGenre};

#[derive(Clone)]
pub struct GameStoreContext {
     pool: SqlitePool,
}

impl GameStoreContext {
     /// Open (or create) the database behind `database_url`. Writers wait on
     /// each other through the busy timeout instead of failing.
     pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
          let options = SqliteConnectOptions::from_str(database_url)?
               .create_if_missing(true)
               .journal_mode(SqliteJournalMode::Wal)
               .busy_timeout(Duration::from_secs(5))
               .foreign_keys(true);

          let pool = SqlitePoolOptions::new()
               .max_connections(5)
               .connect_with(options)
               .await?;

          Ok(Self { pool })
     }

     /// Private in-memory database. The pool is pinned to one connection that
     /// is never recycled, otherwise the data would vanish with it.
     pub async fn in_memory() -> Result<Self, sqlx::Error> {
          let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

          let pool = SqlitePoolOptions::new()
               .max_connections(1)
               .idle_timeout(None)
               .max_lifetime(None)
               .connect_with(options)
               .await?;

          Ok(Self { pool })
     }

     /// Apply the embedded schema from `migrations/`.
     pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
          sqlx::migrate!("./migrations").run(&self.pool).await
     }

     pub async fn begin(&self) -> Result<UnitOfWork, sqlx::Error> {
          let tx = self.pool.begin().await?;
          Ok(UnitOfWork { tx })
     }
}

pub struct UnitOfWork {
     tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
     pub fn games(&mut self) -> GameSet<'_> {
          GameSet { conn: &mut *self.tx }
     }

     pub fn genres(&mut self) -> GenreSet<'_> {
          GenreSet { conn: &mut *self.tx }
     }

     pub async fn commit(self) -> Result<(), sqlx::Error> {
          self.tx.commit().await
     }
}

pub struct GameSet<'a> {
     conn: &'a mut SqliteConnection,
}

impl GameSet<'_> {
     /// Primary-key lookup. The genre relation is not loaded.
     pub async fn find(&mut self, id: i32) -> Result<Option<DbGame>, sqlx::Error> {
          sqlx::query_as::<_, DbGame>(
               r#"
               SELECT id, name, genre_id, price, release_date
               FROM games
               WHERE id = ?
               "#,
          )
          .bind(id)
          .fetch_optional(&mut *self.conn)
          .await
     }

     pub async fn list_with_genre(&mut self) -> Result<Vec<DbGame>, sqlx::Error> {
          sqlx::query_as::<_, DbGame>(
               r#"
               SELECT g.id, g.name, g.genre_id, g.price, g.release_date, ge.name AS genre_name
               FROM games g
               INNER JOIN genres ge ON ge.id = g.genre_id
               "#,
          )
          .fetch_all(&mut *self.conn)
          .await
     }

     /// Insert `game` ignoring its `id`, returning the id the store assigned.
     pub async fn add(&mut self, game: &DbGame) -> Result<i32, sqlx::Error> {
          sqlx::query_scalar::<_, i32>(
               r#"
               INSERT INTO games (name, genre_id, price, release_date)
               VALUES (?, ?, ?, ?)
               RETURNING id
               "#,
          )
          .bind(&game.name)
          .bind(game.genre_id)
          .bind(game.price.to_string())
          .bind(game.release_date)
          .fetch_one(&mut *self.conn)
          .await
     }

     /// Overwrite every column of the row identified by `game.id`.
     pub async fn update(&mut self, game: &DbGame) -> Result<u64, sqlx::Error> {
          let result = sqlx::query(
               r#"
               UPDATE games
               SET name = ?, genre_id = ?, price = ?, release_date = ?
               WHERE id = ?
               "#,
          )
          .bind(&game.name)
          .bind(game.genre_id)
          .bind(game.price.to_string())
          .bind(game.release_date)
          .bind(game.id)
          .execute(&mut *self.conn)
          .await?;

          Ok(result.rows_affected())
     }

     pub async fn delete_by_id(&mut self, id: i32) -> Result<u64, sqlx::Error> {
          let result = sqlx::query("DELETE FROM games WHERE id = ?")
               .bind(id)
               .execute(&mut *self.conn)
               .await?;

          Ok(result.rows_affected())
     }
}

pub struct GenreSet<'a> {
     conn: &'a mut SqliteConnection,
}

impl GenreSet<'_> {
     pub async fn list(&mut self) -> Result<Vec<DbGenre>, sqlx::Error> {
          sqlx::query_as::<_, DbGenre>("SELECT id, name FROM genres")
               .fetch_all(&mut *self.conn)
               .await
     }
}

#[cfg(test)]
mod tests {
     use super::*;
     use chrono::NaiveDate;
     use rust_decimal::Decimal;

     async fn context() -> GameStoreContext {
          let ctx = GameStoreContext::in_memory().await.unwrap();
          ctx.migrate().await.unwrap();
          ctx
     }

     fn game(name: &str, genre_id: i32, price: &str) -> DbGame {
          DbGame {
               id: 0,
               name: name.to_string(),
               genre_id,
               genre: None,
               price: Decimal::from_str(price).unwrap(),
               release_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
          }
     }

     #[tokio::test]
     async fn schema_seeds_genres() {
          let ctx = context().await;
          let mut uow = ctx.begin().await.unwrap();
          let mut genres = uow.genres().list().await.unwrap();
          genres.sort_by_key(|g| g.id);

          let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
          assert_eq!(names, ["Fighting", "Roleplaying", "Sports", "Racing", "Kids and Family"]);
     }

     #[tokio::test]
     async fn add_then_find_after_commit() {
          let ctx = context().await;

          let mut uow = ctx.begin().await.unwrap();
          let id = uow.games().add(&game("Street Fighter II", 1, "19.99")).await.unwrap();
          uow.commit().await.unwrap();

          let mut uow = ctx.begin().await.unwrap();
          let found = uow.games().find(id).await.unwrap().unwrap();
          assert_eq!(found.id, id);
          assert_eq!(found.name, "Street Fighter II");
          assert_eq!(found.price, Decimal::from_str("19.99").unwrap());
          assert!(found.genre.is_none());
     }

     #[tokio::test]
     async fn dropped_unit_of_work_rolls_back() {
          let ctx = context().await;

          let mut uow = ctx.begin().await.unwrap();
          let id = uow.games().add(&game("Never Saved", 2, "5")).await.unwrap();
          drop(uow);

          let mut uow = ctx.begin().await.unwrap();
          assert!(uow.games().find(id).await.unwrap().is_none());
     }

     #[tokio::test]
     async fn list_loads_genre_relation() {
          let ctx = context().await;

          let mut uow = ctx.begin().await.unwrap();
          uow.games().add(&game("FIFA 23", 3, "69.99")).await.unwrap();
          uow.games().add(&game("Final Fantasy XIV", 2, "59.99")).await.unwrap();
          uow.commit().await.unwrap();

          let mut uow = ctx.begin().await.unwrap();
          let mut games = uow.games().list_with_genre().await.unwrap();
          games.sort_by_key(|g| g.id);

          assert_eq!(games.len(), 2);
          assert_eq!(games[0].genre.as_ref().unwrap().name, "Sports");
          assert_eq!(games[1].genre.as_ref().unwrap().name, "Roleplaying");
     }

     #[tokio::test]
     async fn update_and_delete_report_affected_rows() {
          let ctx = context().await;

          let mut uow = ctx.begin().await.unwrap();
          let id = uow.games().add(&game("Quest", 2, "19.99")).await.unwrap();
          uow.commit().await.unwrap();

          let mut uow = ctx.begin().await.unwrap();
          let mut replacement = game("Quest II", 2, "24.99");
          replacement.id = id;
          assert_eq!(uow.games().update(&replacement).await.unwrap(), 1);
          assert_eq!(uow.games().delete_by_id(id + 100).await.unwrap(), 0);
          uow.commit().await.unwrap();

          let mut uow = ctx.begin().await.unwrap();
          assert_eq!(uow.games().find(id).await.unwrap().unwrap().name, "Quest II");
          assert_eq!(uow.games().delete_by_id(id).await.unwrap(), 1);
          uow.commit().await.unwrap();
     }

     #[tokio::test]
     async fn unknown_genre_violates_foreign_key() {
          let ctx = context().await;
          let mut uow = ctx.begin().await.unwrap();
          assert!(uow.games().add(&game("Orphan", 99, "1")).await.is_err());
     }

     #[tokio::test]
     async fn overlapping_updates_last_commit_wins() {
          let dir = tempfile::tempdir().unwrap();
          let url = format!("sqlite://{}", dir.path().join("store.db").display());
          let ctx = GameStoreContext::connect(&url).await.unwrap();
          ctx.migrate().await.unwrap();

          let mut uow = ctx.begin().await.unwrap();
          let id = uow.games().add(&game("Quest", 2, "19.99")).await.unwrap();
          uow.commit().await.unwrap();

          let mut first = game("Quest II", 2, "24.99");
          first.id = id;
          let mut second = game("Quest III", 4, "29.99");
          second.id = id;

          let mut a = ctx.begin().await.unwrap();
          let mut b = ctx.begin().await.unwrap();
          assert_eq!(a.games().update(&first).await.unwrap(), 1);

          // b blocks on a's write lock until a commits
          let b_done = tokio::spawn(async move {
               let updated = b.games().update(&second).await?;
               b.commit().await?;
               Ok::<u64, sqlx::Error>(updated)
          });
          a.commit().await.unwrap();
          assert_eq!(b_done.await.unwrap().unwrap(), 1);

          let mut uow = ctx.begin().await.unwrap();
          let stored = uow.games().find(id).await.unwrap().unwrap();
          assert_eq!(stored.name, "Quest III");
          assert_eq!(stored.genre_id, 4);
          assert_eq!(stored.price, Decimal::from_str("29.99").unwrap());
     }
}
