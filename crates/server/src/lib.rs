//! Data service for the parlor: inventory, orders, feedback and reports over
//! SQLite, served as JSON behind a shared bearer secret.

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod health;

pub use api::{app, AppState};
pub use bootstrap::{bootstrap, bootstrap_with_config, Application, BootstrapError};
