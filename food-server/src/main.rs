use food_server::{Config, Server, ServerState, init_logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_logger(Some(config.log_level.as_str()), config.log_json);

    tracing::info!("Starting food-server (env: {})", config.environment);

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}
