use anyhow::Context;
use comanda_pos::{AppState, Config, setup_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env first, then the process environment
    dotenvy::dotenv().ok();

    // 2. Configuration; missing credentials are fatal
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("comanda: configuration error: {}", e);
            eprintln!("Set the variable in the environment or in .env (STORE_BACKEND=memory runs offline).");
            std::process::exit(2);
        }
    };

    // 3. Logging goes to a file so the UI stays clean
    setup_logging(&config);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Comanda starting");

    // 4. Services
    let state = AppState::initialize(&config)
        .await
        .context("failed to initialize application state")?;

    // 5. Terminal UI until the user quits
    comanda_pos::ui::run(state).await.context("terminal UI failed")?;

    tracing::info!("Comanda stopped");
    Ok(())
}
