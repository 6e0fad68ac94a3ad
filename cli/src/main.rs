use clap::Parser;

mod commands;
mod tui;

use commands::cli::{Args, Commands};
use evaldash_core::config::LoggingConfig;
use evaldash_core::ApiClient;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    };
    std::process::exit(exit);
}

async fn real_main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut cfg = evaldash_core::config::load_default()?;
    if let Some(server) = &args.server {
        cfg.server.base_url = server.clone();
    }
    init_tracing(&cfg.logging)?;

    let api = ApiClient::new(&cfg.server.base_url, cfg.server.timeout_ms)?;
    tracing::debug!(target: "evaldash", server = %api.base_url(), "client ready");

    match args.command.unwrap_or(Commands::Dash) {
        Commands::Dash => tui::run_dashboard(&cfg, api).await,
        Commands::List => commands::tasks::list(&api).await,
        Commands::Create(create) => commands::tasks::create(&api, &create).await,
        Commands::Start(confirmed) => commands::tasks::start(&api, &confirmed).await,
        Commands::Delete(confirmed) => commands::tasks::delete(&api, &confirmed).await,
        Commands::Result(task) => commands::tasks::result(&api, task.id).await,
        Commands::Stats => commands::stats::stats(&api).await,
        Commands::Health => commands::stats::health(&api).await,
    }
}

fn init_tracing(cfg: &LoggingConfig) -> anyhow::Result<()> {
    if !cfg.enabled {
        return Ok(());
    }
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if cfg.file {
        let dir = cfg
            .directory
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().to_string_lossy().to_string());
        std::fs::create_dir_all(&dir)?;
        let appender = tracing_appender::rolling::daily(&dir, "evaldash.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        if cfg.console {
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .init();
        }
    } else if cfg.console {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}
