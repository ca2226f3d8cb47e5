
use admob_stats_core::{
    ConfigEntry, Entity, EntityState, EntryRuntime, Metric, MetricSnapshot, ReportPeriod,
    UpdateCoordinator,
};
use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, CellAlignment, Color, Table,
};
use serde::Serialize;
use tracing::warn;

use crate::config::CliContext;

#[derive(Serialize)]
struct EntryStats<'a> {
    entry_id: &'a str,
    title: &'a str,
    snapshot: &'a MetricSnapshot,
}

#[derive(Serialize)]
struct EntrySensors<'a> {
    entry_id: &'a str,
    title: &'a str,
    available: bool,
    sensors: Vec<EntityState>,
}

/// Fetch every period once and print the totals.
pub async fn cmd_stats(
    ctx: &CliContext,
    entry_id: Option<&str>,
    period: Option<ReportPeriod>,
    format: &str,
) -> anyhow::Result<()> {
    let entries = ctx.select_entries(entry_id).await?;
    let factory = ctx.source_factory();
    let mut json_output = Vec::new();

    for entry in &entries {
        let source = factory(&entry.data)?;
        let snapshot = source.fetch_stats().await?;

        if format == "json" {
            json_output.push(serde_json::to_value(EntryStats {
                entry_id: &entry.entry_id,
                title: &entry.title,
                snapshot: &snapshot,
            })?);
            continue;
        }

        print_snapshot(entry, &snapshot, period);
        println!();
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    }

    Ok(())
}

/// Run one refresh per entry and print the resulting sensor states.
pub async fn cmd_sensors(
    ctx: &CliContext,
    entry_id: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    let entries = ctx.select_entries(entry_id).await?;
    let factory = ctx.source_factory();
    let mut json_output = Vec::new();

    for entry in entries {
        let source = factory(&entry.data)?;
        let coordinator = UpdateCoordinator::new(
            entry.title.clone(),
            source.clone(),
            ctx.coordinator_config(),
        );

        if let Err(e) = coordinator.first_refresh().await {
            warn!("Sensors for {} have no data: {}", entry.title, e);
        }

        let runtime = EntryRuntime::new(entry, source, coordinator);

        if format == "json" {
            json_output.push(serde_json::to_value(EntrySensors {
                entry_id: runtime.entry_id(),
                title: &runtime.entry.title,
                available: runtime.is_available(),
                sensors: runtime.sensor_states(),
            })?);
            continue;
        }

        print_sensors(&runtime);
        println!();
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&json_output)?);
    }

    Ok(())
}

pub(crate) fn print_snapshot(
    entry: &ConfigEntry,
    snapshot: &MetricSnapshot,
    only: Option<ReportPeriod>,
) {
    println!("{}", entry.title.cyan().bold());
    println!(
        "{}",
        format!(
            "Fetched: {}",
            snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .dimmed()
    );

    let mut header = vec![Cell::new("Period").fg(Color::Cyan)];
    header.extend(
        Metric::ALL
            .iter()
            .map(|m| Cell::new(m.label()).fg(Color::Cyan)),
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);

    for period in ReportPeriod::ALL {
        if only.is_some_and(|p| p != period) {
            continue;
        }

        let mut row = vec![Cell::new(period.label())];
        match snapshot.get(period) {
            Some(record) => {
                row.push(
                    Cell::new(format!("${:.2}", record.earnings))
                        .fg(Color::Green)
                        .set_alignment(CellAlignment::Right),
                );
                for metric in [Metric::Impressions, Metric::AdRequests, Metric::Clicks] {
                    row.push(
                        Cell::new(record.value(metric)).set_alignment(CellAlignment::Right),
                    );
                }
            }
            None => {
                row.extend((0..Metric::ALL.len()).map(|_| Cell::new("-").fg(Color::DarkGrey)));
            }
        }
        table.add_row(row);
    }

    println!("{table}");
}

pub(crate) fn print_sensors(runtime: &EntryRuntime) {
    println!("{}", runtime.entry.title.cyan().bold());
    if !runtime.is_available() {
        println!("{}", "Last refresh failed, values may be stale.".yellow());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Entity").fg(Color::Cyan),
            Cell::new("State").fg(Color::Cyan),
            Cell::new("Unit").fg(Color::Cyan),
            Cell::new("Icon").fg(Color::Cyan),
            Cell::new("Unique ID").fg(Color::Cyan),
        ]);

    for state in runtime.sensor_states() {
        let value = state.display_state();
        let value_cell = if state.state.is_some() {
            Cell::new(value).fg(Color::Green)
        } else {
            Cell::new(value).fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(&state.name),
            value_cell.set_alignment(CellAlignment::Right),
            Cell::new(state.unit_of_measurement.as_deref().unwrap_or("")),
            Cell::new(&state.icon).fg(Color::DarkGrey),
            Cell::new(&state.unique_id).fg(Color::DarkGrey),
        ]);
    }

    let button = &runtime.button;
    table.add_row(vec![
        Cell::new(button.name()),
        Cell::new("press").set_alignment(CellAlignment::Right),
        Cell::new(""),
        Cell::new(&button.description().icon).fg(Color::DarkGrey),
        Cell::new(button.unique_id()).fg(Color::DarkGrey),
    ]);

    println!("{table}");
}
