use admob_stats_core::ConfigEntry;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;

use crate::config::CliContext;

#[derive(Subcommand)]
pub enum EntriesCommand {
    #[command(about = "List configured AdMob accounts")]
    List {
        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Show one configured account")]
    Show {
        #[arg(help = "Entry ID")]
        entry_id: String,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Remove a configured account")]
    Remove {
        #[arg(help = "Entry ID")]
        entry_id: String,
    },
}

/// Entry view without secrets.
#[derive(Serialize)]
struct EntrySummary<'a> {
    entry_id: &'a str,
    title: &'a str,
    domain: &'a str,
    publisher_id: &'a str,
    client_id: &'a str,
    version: u32,
    created_at: String,
}

impl<'a> From<&'a ConfigEntry> for EntrySummary<'a> {
    fn from(entry: &'a ConfigEntry) -> Self {
        Self {
            entry_id: &entry.entry_id,
            title: &entry.title,
            domain: &entry.domain,
            publisher_id: &entry.data.publisher_id,
            client_id: &entry.data.client_id,
            version: entry.version,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

pub async fn handle_entries_command(
    ctx: &CliContext,
    cmd: Option<EntriesCommand>,
) -> anyhow::Result<()> {
    match cmd.unwrap_or(EntriesCommand::List {
        format: "text".to_string(),
    }) {
        EntriesCommand::List { format } => cmd_entries_list(ctx, &format).await,
        EntriesCommand::Show { entry_id, format } => {
            cmd_entries_show(ctx, &entry_id, &format).await
        }
        EntriesCommand::Remove { entry_id } => cmd_entries_remove(ctx, &entry_id).await,
    }
}

async fn cmd_entries_list(ctx: &CliContext, format: &str) -> anyhow::Result<()> {
    let entries = ctx.store.list().await?;

    if format == "json" {
        let summaries: Vec<EntrySummary> = entries.iter().map(EntrySummary::from).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "Configured AdMob Accounts".cyan().bold());
    println!();

    if entries.is_empty() {
        println!("{}", "No entries configured.".yellow());
        println!(
            "{}",
            "Run 'admob-stats setup' to add an AdMob account.".dimmed()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Entry ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Publisher").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for entry in &entries {
        table.add_row(vec![
            Cell::new(&entry.entry_id),
            Cell::new(&entry.title).fg(Color::Green),
            Cell::new(entry.publisher_id()),
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "{}",
        format!("{} account(s) in {}", entries.len(), ctx.entries_path().display()).dimmed()
    );

    Ok(())
}

async fn cmd_entries_show(ctx: &CliContext, entry_id: &str, format: &str) -> anyhow::Result<()> {
    let entry = ctx.store.get(entry_id).await?;
    let summary = EntrySummary::from(&entry);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", entry.title.cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  {:<14} {}", "Entry ID:".bold(), summary.entry_id);
    println!("  {:<14} {}", "Domain:".bold(), summary.domain);
    println!("  {:<14} {}", "Publisher:".bold(), summary.publisher_id);
    println!("  {:<14} {}", "Client ID:".bold(), summary.client_id);
    println!("  {:<14} {}", "Version:".bold(), summary.version);
    println!("  {:<14} {}", "Created:".bold(), summary.created_at);

    Ok(())
}

async fn cmd_entries_remove(ctx: &CliContext, entry_id: &str) -> anyhow::Result<()> {
    let removed = ctx.store.remove(entry_id).await?;

    println!(
        "{} {}",
        "✓".green().bold(),
        format!("Removed entry '{}'", removed.title).green()
    );

    Ok(())
}
