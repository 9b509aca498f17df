use std::path::PathBuf;
use std::time::Duration as StdDuration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use survey_flow::api;
use survey_flow::catalog::Catalog;
use survey_flow::completion::DEFAULT_TTL_SECS;
use survey_flow::config::{ttl_from_secs, ServerConfig, DEFAULT_SESSION_TTL_SECS, MAX_TTL_SECS};

#[derive(Parser)]
#[command(name = "survey")]
#[command(about = "Take surveys one question at a time")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the survey server
    Serve(ServeArgs),
    /// Validate a catalog file and list its surveys
    Check {
        /// Path to a JSON catalog
        #[arg(short, long, env = "SURVEY_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "SURVEY_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port for HTTP
    #[arg(short, long, env = "SURVEY_PORT", default_value = "3000")]
    port: u16,

    /// JSON catalog to serve instead of the built-in surveys
    #[arg(short, long, env = "SURVEY_CATALOG")]
    catalog: Option<PathBuf>,

    /// Seconds a completed survey stays blocked from retaking
    #[arg(
        long,
        env = "SURVEY_COMPLETION_TTL",
        default_value_t = DEFAULT_TTL_SECS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TTL_SECS)
    )]
    completion_ttl: i64,

    /// Seconds an idle session is kept
    #[arg(
        long,
        env = "SURVEY_SESSION_TTL",
        default_value_t = DEFAULT_SESSION_TTL_SECS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TTL_SECS)
    )]
    session_ttl: i64,
}

impl TryFrom<ServeArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: ServeArgs) -> anyhow::Result<Self> {
        Ok(Self {
            host: args.host,
            port: args.port,
            catalog: args.catalog,
            completion_ttl: ttl_from_secs(args.completion_ttl)?,
            session_ttl: ttl_from_secs(args.session_ttl)?,
        })
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "survey_flow=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let catalog = config.load_catalog()?;
    tracing::info!("Loaded {} surveys", catalog.len());

    let state = api::AppState::new(catalog, &config);

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(StdDuration::from_secs(60));
        loop {
            interval.tick().await;
            let purged = sessions.cleanup();
            if purged > 0 {
                tracing::debug!("Purged {} expired sessions", purged);
            }
        }
    });

    let app = api::create_router(state);
    let addr = config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Survey server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args.try_into()?).await?,
        Some(Commands::Check { catalog }) => {
            let catalog = match catalog {
                Some(path) => Catalog::open(&path)?,
                None => Catalog::builtin()?,
            };
            for survey in catalog.iter() {
                println!("{}\t{}\t{} questions", survey.id, survey.title, survey.len());
            }
        }
        None => serve(cli.serve.try_into()?).await?,
    }

    Ok(())
}
