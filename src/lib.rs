pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use response::PaginatedResponse;
pub use services::IdeaService;
