use anyhow::Result;
use hostmeter::*;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        interval_ms = app_config.sampling.interval_ms,
        "hostmeter starting"
    );

    let store = store::MetricsStore::new();
    let diagnostics = Arc::new(diagnostics::Diagnostics::default());
    let scheduler = scheduler::Scheduler::new(
        scheduler::SchedulerDeps {
            source: Arc::new(sysinfo_repo::SysinfoRepo::new()),
            clock: Arc::new(clock::TokioClock),
            store: store.clone(),
            diagnostics: diagnostics.clone(),
        },
        app_config.scheduler_config(),
    );
    let handle = scheduler.start();
    let consumer = tokio::spawn(consume(store.subscribe(), app_config.output.json));

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    handle.shutdown().await;
    consumer.abort();
    diagnostics.log();

    Ok(())
}

/// Stand-in for the UI collaborator: reports each published snapshot.
async fn consume(mut rx: watch::Receiver<models::Snapshot>, json: bool) {
    while rx.changed().await.is_ok() {
        let snapshot = *rx.borrow_and_update();
        if json {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "snapshot serialization failed"),
            }
        } else {
            tracing::info!(
                cpu_percent = snapshot.cpu_usage_percent,
                memory_percent = snapshot.memory_usage_percent,
                used_memory_bytes = snapshot.used_memory_bytes,
                total_memory_bytes = snapshot.total_memory_bytes,
                net_in_kbs = snapshot.network_in_rate_kbs,
                net_out_kbs = snapshot.network_out_rate_kbs,
                "snapshot"
            );
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
