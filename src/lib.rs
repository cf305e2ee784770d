pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod validation;

pub use db::{create_pool, run_migrations};
