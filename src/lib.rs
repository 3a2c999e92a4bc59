pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod utils;
