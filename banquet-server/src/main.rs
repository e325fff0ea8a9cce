use banquet_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    let log_dir = std::path::Path::new(&config.work_dir).join("logs");
    let _ = std::fs::create_dir_all(&log_dir);
    init_logger_with_file(None, log_dir.to_str());

    tracing::info!("Banquet server starting...");

    let state = ServerState::initialize(config.clone()).await?;
    let server = Server::new(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
