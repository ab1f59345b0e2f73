use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use focuslock_core::config::FocusConfig;
use focuslock_store::{PlannerStore, SqliteStore, SupabaseStore};
use tracing::info;

mod app;
mod check;
mod http;

#[derive(Parser)]
#[command(name = "focuslock-gateway", version, about = "FocusLock study-planning API")]
struct Cli {
    /// Config file (default: $FOCUSLOCK_CONFIG, then ~/.focuslock/focuslock.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Print the latest assignment and its milestone goals.
    CheckSchedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG and SUPABASE_* from it take effect below
    focuslock_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "focuslock_gateway=info,focuslock_planner=info,tower_http=debug".into()
                }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > FOCUSLOCK_CONFIG env > ~/.focuslock/focuslock.toml
    let config_path = cli.config.or_else(|| std::env::var("FOCUSLOCK_CONFIG").ok());
    let config = FocusConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        FocusConfig::default()
    });

    let store = build_store(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::CheckSchedule => {
            let report = check::latest_schedule_report(store.as_ref()).await?;
            print!("{report}");
            Ok(())
        }
        Command::Serve => serve(config, store).await,
    }
}

/// Supabase when credentials are configured, otherwise the local SQLite file.
fn build_store(config: &FocusConfig) -> anyhow::Result<Arc<dyn PlannerStore>> {
    if let Some(ref supabase) = config.supabase {
        info!(url = %supabase.url, "store: Supabase");
        return Ok(Arc::new(SupabaseStore::from_config(supabase)));
    }
    tracing::warn!(
        path = %config.database.path,
        "SUPABASE_URL/SUPABASE_KEY not set, using local SQLite store"
    );
    Ok(Arc::new(SqliteStore::open(&config.database.path)?))
}

async fn serve(config: FocusConfig, store: Arc<dyn PlannerStore>) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;

    let state = Arc::new(app::AppState::new(config, store));
    let router = app::build_router(state);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("FOCUSLOCK_GIT_SHA"),
        "FocusLock gateway listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
