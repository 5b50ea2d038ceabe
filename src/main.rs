use anyhow::{Context, Result};
use clap::Parser;
use loqa_notebook::session::LoggingHost;
use loqa_notebook::{
    create_router, AppState, Config, GeminiSummarizer, HttpNotebookStore, NatsTranscriber,
    PersistedNotebook, SessionController, SessionRecord, SessionServices,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "loqa-notebook", about = "Notebook session controller")]
struct Args {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/loqa-notebook")]
    config: String,

    /// Signed-in user the notebook belongs to
    #[arg(long)]
    user_id: Option<String>,

    /// Previously saved notebook (JSON) to open instead of a new one
    #[arg(long)]
    note: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Loqa Notebook v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    let record = match &args.note {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read notebook {}", path.display()))?;
            let persisted: PersistedNotebook =
                serde_json::from_str(&raw).context("Failed to parse notebook JSON")?;
            info!("Opening notebook {:?}", persisted.id);
            SessionRecord::hydrate(args.user_id.clone(), &persisted)
        }
        None => SessionRecord::new(args.user_id.clone()),
    };

    let session_config = cfg.session.to_session_config();
    let transcriber = Arc::new(
        NatsTranscriber::connect(&cfg.transcription.nats_url, session_config.session_id.clone())
            .await?,
    );
    let events = transcriber.subscribe_events().await?;

    let services = SessionServices {
        transcriber,
        summarizer: Arc::new(GeminiSummarizer::new(&cfg.summarizer)?),
        store: Arc::new(HttpNotebookStore::new(&cfg.store)?),
        host: Arc::new(LoggingHost),
    };
    let controller = SessionController::new(session_config, record, services);

    tokio::spawn(NatsTranscriber::pump_events(events, controller.clone()));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(AppState::new(controller.clone())))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("HTTP server failed")?;

    controller.settle().await;
    info!("Shutting down");

    Ok(())
}
