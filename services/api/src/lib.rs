mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use scheme_recommender::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
