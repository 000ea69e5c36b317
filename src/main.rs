use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use adboard::accounts::session;
use adboard::config::{Cli, Command, Config};
use adboard::db;
use adboard::state::DbPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(config.db_path())?;
    db::run_migrations(&pool)?;

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::CreateAccount { username, admin } => {
            let account_id = session::create_account(&pool, &username, admin)?;
            let token = session::create_session(&pool, account_id, config.auth.session_hours)?;
            tracing::info!(%account_id, admin, "Account created");
            println!("{}", token);
            Ok(())
        }
        Command::RevokeToken { token } => {
            session::delete_session(&pool, &token)?;
            tracing::info!("Token revoked");
            Ok(())
        }
        Command::Serve => serve(config, pool).await,
    }
}

async fn serve(config: Config, pool: DbPool) -> anyhow::Result<()> {
    let app = adboard::app(adboard::build_state(&pool));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
