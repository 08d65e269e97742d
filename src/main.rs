use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wordvec_api::{RestApi, RestConfig, TracingObserver};
use wordvec_core::{MemoryModel, Model};

/// Serve a word-embedding model over HTTP
#[derive(Parser, Debug)]
#[command(name = "wordvec")]
#[command(about = "Similarity and nearest-neighbor queries over a word-embedding model", long_about = None)]
struct Args {
    /// Path to a model in word2vec text format
    #[arg(short, long)]
    model: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 6380)]
    http_port: u16,

    /// HTTP worker threads (defaults to one per core)
    #[arg(long)]
    workers: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting wordvec v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading model from {:?}", args.model);

    let model_path = args.model.clone();
    let model = tokio::task::spawn_blocking(move || MemoryModel::load(&model_path)).await??;
    info!("Model loaded: {} terms, dimension {}", model.len(), model.dim());

    let model: Arc<dyn Model> = Arc::new(model);
    let config = RestConfig {
        host: args.host.clone(),
        port: args.http_port,
        workers: args.workers,
        ..RestConfig::default()
    };

    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", config.host, config.port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(model, Arc::new(TracingObserver), config).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://{}:{}/", args.host, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
