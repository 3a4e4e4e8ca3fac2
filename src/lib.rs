pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod graphql;
pub mod sessions;
pub mod state;
pub mod store;
pub mod users;
