mod cli;
mod infra;
mod pages;
mod routes;
mod server;

pub use infra::{InMemorySessionStore, SESSION_COOKIE};
pub use routes::app_router;

use lifestyle_checker::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
