pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod middleware;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::db::GameStoreContext;
pub use crate::routes::create_routes;
