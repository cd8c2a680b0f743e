//! Chore tracker: REST backend for children, tasks and the chores that link them.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;
pub mod views;

pub use config::{Settings, StoreBackend};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, resource_routes};
pub use service::{ChildService, ChoreService, TaskService};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
