use clap::Parser;
use governor_cli::commands::{cli, inspect, remote};
use governor_cli::http::server::handle_serve;
use governor_core::api::{AppConfig, AppContext, CliError, LoggingConfig, Registry};
use governor_plugins::services::PluginServicesFactory;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg = governor_core::api::load(args.config.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;

    let command = args
        .command
        .unwrap_or_else(|| cli::Commands::Serve(cli::ServeArgs::default()));
    if let cli::Commands::Serve(serve) = &command {
        apply_serve_overrides(&mut cfg, serve);
    }

    init_tracing(&cfg.logging).map_err(CliError::Config)?;

    match command {
        cli::Commands::Serve(serve) => {
            let ctx = build_context(cfg)?;
            handle_serve(&serve, &ctx).await?;
            Ok(0)
        }
        cli::Commands::Route(route) => remote::handle_route(route, &cfg).await,
        cli::Commands::Status(status) => remote::handle_status(status, &cfg).await,
        cli::Commands::Inspect(args) => inspect::handle_inspect(args, &cfg).await,
        cli::Commands::Commander => inspect::handle_commander(&cfg).await,
    }
}

fn apply_serve_overrides(cfg: &mut AppConfig, serve: &cli::ServeArgs) {
    if let Some(path) = &serve.registry {
        cfg.registry.path = path.display().to_string();
    }
    if serve.mock {
        cfg.use_mock_services();
    }
}

/// Loads the registry once; the server refuses to start without it.
fn build_context(cfg: AppConfig) -> Result<AppContext, CliError> {
    let registry = Registry::load(Path::new(&cfg.registry.path))
        .map_err(|e| CliError::Registry(e.to_string()))?;
    tracing::info!(
        target: "governor.registry",
        slots = registry.len(),
        path = %cfg.registry.path,
        "Registry loaded with {} slots",
        registry.len()
    );
    if cfg.is_mock() {
        tracing::warn!("Running in MOCK services mode (in-memory store, mock workflow service)");
    }
    Ok(AppContext::new(
        cfg,
        registry,
        Some(Arc::new(PluginServicesFactory)),
    ))
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("governor"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("governor.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
