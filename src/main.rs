use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use edurec_api::{AppContext, RestApi};
use edurec_store::{ArtifactStore, UserStore};

/// Learning-portal recommendation service
#[derive(Parser, Debug)]
#[command(name = "edurec")]
#[command(about = "Career classification and course recommendations over pre-trained artifacts", long_about = None)]
struct Args {
    /// Path to the directory of pre-trained artifact files
    #[arg(short, long, default_value = "./artifacts")]
    artifact_dir: PathBuf,

    /// Path to the data directory (user store)
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

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

    info!("Starting edurec v{}", env!("CARGO_PKG_VERSION"));
    info!("Artifact directory: {:?}", args.artifact_dir);
    info!("Data directory: {:?}", args.data_dir);

    let artifacts = ArtifactStore::load(&args.artifact_dir);
    let users = UserStore::open(&args.data_dir)?;
    info!("User store initialized ({} records)", users.count());

    let ctx = Arc::new(AppContext::new(artifacts, users));

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(ctx, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("edurec started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

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
