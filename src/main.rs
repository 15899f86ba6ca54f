//! SignAvatar - Headless Sign-Language Avatar Service
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use signavatar::{
    avatar::{load_skeleton, AvatarAsset},
    config::{Config, TranslatorMode},
    gesture::GestureLibrary,
    translate::build_translator,
    web::WebServer,
    AppState,
};

/// SignAvatar - signs text with a 3D humanoid avatar
#[derive(Parser, Debug)]
#[command(name = "signavatar", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Avatar rig (overrides config)
    #[arg(short, long)]
    avatar: Option<AvatarAsset>,

    /// Per-tick bone increment (overrides config)
    #[arg(long)]
    speed: Option<f32>,

    /// Rest between gestures in milliseconds (overrides config)
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Use the offline vocabulary translator instead of the service
    #[arg(long)]
    offline: bool,

    /// Sign this text once on startup
    #[arg(long)]
    sign: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable HTTP server
    #[arg(long)]
    no_http: bool,

    /// HTTP server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", signavatar::NAME, signavatar::VERSION);

    let state = setup(&args)?;
    state.return_to_rest().await;

    if let Some(ref text) = args.sign {
        if state.sign(text).await.is_none() {
            info!("Nothing to sign in {:?}", text);
        }
    }

    let http_enabled = state.config.read().await.http.enabled;
    if http_enabled {
        let http_state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = run_http_server(http_state).await {
                error!("HTTP server error: {}", e);
            }
        });
    } else {
        info!("HTTP server disabled");
    }

    shutdown_signal().await;
    info!("Shutdown signal received");
    state.shutdown();

    // Give tasks a moment to clean up
    tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;

    info!("SignAvatar stopped");
    Ok(())
}

/// Load config, gestures and rig, and build the shared state
fn setup(args: &Args) -> anyhow::Result<Arc<AppState>> {
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(avatar) = args.avatar {
        config.avatar.asset = avatar;
    }
    if let Some(speed) = args.speed {
        config.animation.speed = speed;
    }
    if let Some(pause_ms) = args.pause_ms {
        config.animation.pause_ms = pause_ms;
    }
    if args.offline {
        config.translator.mode = TranslatorMode::Vocabulary;
    }
    if args.no_http {
        config.http.enabled = false;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    config.validate()?;

    info!("Avatar: {}", config.avatar.asset);
    info!(
        "Animation: speed {}, pause {} ms, {} Hz",
        config.animation.speed, config.animation.pause_ms, config.animation.tick_rate_hz
    );
    info!("Speech language: {}", config.speech.language);

    let mut library = GestureLibrary::builtin();
    if let Some(ref path) = config.avatar.gestures_path {
        library.load_file(path)?;
    }
    info!(
        "Gestures: {} words, {} letters",
        library.words().len(),
        library.alphabet().len()
    );

    let rig = load_skeleton(&config.avatar)?;
    let translator = build_translator(&config.translator, &library);

    Ok(AppState::new(config, Arc::new(library), rig, translator))
}

async fn run_http_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let http_config = state.config.read().await.http.clone();
    WebServer::new(state, &http_config).run().await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
