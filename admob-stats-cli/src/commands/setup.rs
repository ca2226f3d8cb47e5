use admob_stats_core::{ConfigFlow, Credentials, FlowResult, SETUP_URL};
use anyhow::bail;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;

use crate::config::CliContext;

#[derive(Args)]
pub struct SetupArgs {
    #[arg(long, env = "ADMOB_CLIENT_ID", help = "OAuth client ID")]
    pub client_id: Option<String>,

    #[arg(
        long,
        env = "ADMOB_CLIENT_SECRET",
        hide_env_values = true,
        help = "OAuth client secret"
    )]
    pub client_secret: Option<String>,

    #[arg(
        long,
        env = "ADMOB_REFRESH_TOKEN",
        hide_env_values = true,
        help = "OAuth refresh token with the admob.report scope"
    )]
    pub refresh_token: Option<String>,

    #[arg(long, env = "ADMOB_PUBLISHER_ID", help = "Publisher ID, e.g. pub-1234567890")]
    pub publisher_id: Option<String>,

    #[arg(
        short,
        long,
        default_value = "text",
        help = "Output format (text, json)"
    )]
    pub format: String,
}

impl SetupArgs {
    fn credentials(&self) -> Credentials {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        Credentials::new(
            field(&self.client_id),
            field(&self.client_secret),
            field(&self.refresh_token),
            field(&self.publisher_id),
        )
    }
}

fn describe_error(key: &str) -> &'static str {
    match key {
        "cannot_connect" => "Failed to connect, check your credentials",
        "required" => "This field is required",
        _ => "Unexpected error",
    }
}

pub async fn cmd_setup(ctx: &CliContext, args: SetupArgs) -> anyhow::Result<()> {
    let flow = ConfigFlow::new(ctx.store.clone(), ctx.source_factory());

    if args.format != "json" {
        println!("{}", "Setting up AdMob account...".cyan().bold());
        println!();
        println!("  {} Testing connection...", "→".blue());
    }

    let result = flow.step_user(Some(args.credentials())).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return match result {
            FlowResult::CreateEntry(_) => Ok(()),
            _ => bail!("Setup did not create an entry"),
        };
    }

    match result {
        FlowResult::CreateEntry(entry) => {
            println!();
            println!(
                "{} {}",
                "✓".green().bold(),
                format!("Created entry '{}'", entry.title).green()
            );
            println!("  {:<12} {}", "Entry ID:".bold(), entry.entry_id);
            println!("  {:<12} {}", "Stored in:".bold(), ctx.entries_path().display());
            Ok(())
        }
        FlowResult::ShowForm { errors, .. } => {
            print_form_errors(&errors);
            bail!("Setup failed")
        }
        FlowResult::Abort { reason } => {
            println!();
            println!(
                "{} This publisher is already configured ({})",
                "!".yellow().bold(),
                reason
            );
            bail!("Setup aborted")
        }
    }
}

fn print_form_errors(errors: &BTreeMap<String, String>) {
    println!();
    for (field, key) in errors {
        let label = if field == "base" { "connection" } else { field };
        println!(
            "  {} {}: {}",
            "✗".red().bold(),
            label.bold(),
            describe_error(key)
        );
    }
    println!();
    println!(
        "  {}",
        format!("See {} for how to obtain credentials.", SETUP_URL).dimmed()
    );
}
