use std::sync::Arc;

use admob_stats_core::{Button, DataCoordinator, EntryRuntime, IntegrationRegistry};
use anyhow::bail;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::CliContext;

use super::stats::{print_sensors, print_snapshot};

/// Load entries, poll until Ctrl-C, and reprint whenever a coordinator publishes.
///
/// Typing `r` followed by Enter presses every entry's refresh button.
pub async fn cmd_run(
    ctx: &CliContext,
    entry_id: Option<&str>,
    show_sensors: bool,
) -> anyhow::Result<()> {
    let entries = ctx.select_entries(entry_id).await?;
    let registry = IntegrationRegistry::new(ctx.source_factory(), ctx.coordinator_config());

    let mut runtimes = Vec::new();
    for entry in entries {
        let title = entry.title.clone();
        match registry.setup_entry(entry).await {
            Ok(runtime) => runtimes.push(runtime),
            Err(e) => {
                e.log();
                eprintln!("{} {}: {}", "✗".red().bold(), title, e);
            }
        }
    }

    if runtimes.is_empty() {
        bail!("No entry could be set up");
    }

    let (tx, mut rx) = mpsc::channel::<Arc<EntryRuntime>>(16);
    for runtime in &runtimes {
        spawn_watcher(runtime.clone(), tx.clone());
        render(runtime, show_sensors);
    }
    drop(tx);

    println!(
        "{}",
        format!(
            "Polling every {}s. Type 'r' and Enter to refresh, Ctrl-C to stop.",
            runtimes[0].coordinator.update_interval().as_secs()
        )
        .dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            Some(runtime) = rx.recv() => {
                render(&runtime, show_sensors);
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(input)) if matches!(input.trim(), "r" | "refresh") => {
                        for runtime in &runtimes {
                            runtime.button.press().await;
                        }
                    }
                    Ok(Some(_)) => {}
                    Ok(None) | Err(_) => {
                        debug!("stdin closed, manual refresh disabled");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    registry.unload_all().await;
    println!("{}", "Stopped.".dimmed());
    Ok(())
}

fn spawn_watcher(runtime: Arc<EntryRuntime>, tx: mpsc::Sender<Arc<EntryRuntime>>) {
    let mut state_rx = runtime.coordinator.subscribe();

    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            if tx.send(runtime.clone()).await.is_err() {
                break;
            }
        }
    });
}

fn render(runtime: &EntryRuntime, show_sensors: bool) {
    let state = runtime.coordinator.state();
    println!();
    println!(
        "{}",
        format!("[{}] update #{}", chrono::Local::now().format("%H:%M:%S"), state.refresh_count)
            .dimmed()
    );

    if show_sensors {
        print_sensors(runtime);
    } else if let Some(snapshot) = state.data.as_ref() {
        print_snapshot(&runtime.entry, snapshot, None);
    }

    if let Some(err) = state.last_error {
        println!("{} {}", "!".yellow().bold(), err.yellow());
    }
}
