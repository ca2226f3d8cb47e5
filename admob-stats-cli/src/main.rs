use admob_stats_core::{init_logging, AdmobError, CliErrorDisplay, LoggingConfig, ReportPeriod};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

use commands::{
    cmd_run, cmd_sensors, cmd_setup, cmd_stats, handle_entries_command, EntriesCommand, SetupArgs,
};
use config::CliContext;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "admob-stats")]
#[command(version = VERSION)]
#[command(about = "AdMob Stats - earnings, impressions, ad requests and clicks from the AdMob API")]
#[command(long_about = r#"
AdMob Stats polls the AdMob Network Report API and exposes totals for today,
yesterday, this month and last month as sensors.

Use 'admob-stats setup' to validate and store OAuth credentials, then
'admob-stats stats' for a one-off report or 'admob-stats run' to keep polling.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        env = "ADMOB_STATS_CONFIG",
        help = "Path to a TOML configuration file"
    )]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Validate credentials against the AdMob API and store them")]
    Setup(SetupArgs),

    #[command(about = "Manage configured AdMob accounts")]
    Entries {
        #[command(subcommand)]
        action: Option<EntriesCommand>,
    },

    #[command(about = "Fetch all report periods once and print the totals")]
    Stats {
        #[arg(short, long, help = "Entry ID (default: all entries)")]
        entry: Option<String>,

        #[arg(
            short,
            long,
            help = "Only show one period (today, yesterday, this_month, last_month)"
        )]
        period: Option<ReportPeriod>,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Refresh once and print every sensor with its state")]
    Sensors {
        #[arg(short, long, help = "Entry ID (default: all entries)")]
        entry: Option<String>,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Keep polling and print updates until interrupted")]
    Run {
        #[arg(short, long, help = "Entry ID (default: all entries)")]
        entry: Option<String>,

        #[arg(short, long, help = "Print sensor states instead of the summary table")]
        sensors: bool,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AdmobError>() {
                Some(admob_err) => {
                    eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(admob_err))
                }
                None => eprintln!("{}: {:#}", "Error".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Version { detailed } = cli.command {
        return cmd_version(detailed);
    }

    let ctx = match CliContext::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            init_logging(&LoggingConfig::default(), cli.verbose);
            return Err(e);
        }
    };
    init_logging(&ctx.config.logging, cli.verbose);

    match cli.command {
        Commands::Setup(args) => cmd_setup(&ctx, args).await,
        Commands::Entries { action } => handle_entries_command(&ctx, action).await,
        Commands::Stats {
            entry,
            period,
            format,
        } => cmd_stats(&ctx, entry.as_deref(), period, &format).await,
        Commands::Sensors { entry, format } => cmd_sensors(&ctx, entry.as_deref(), &format).await,
        Commands::Run { entry, sensors } => cmd_run(&ctx, entry.as_deref(), sensors).await,
        Commands::Version { detailed } => cmd_version(detailed),
    }
}

fn cmd_version(detailed: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "AdMob Stats Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!("  {:<15} {}", "Domain:".bold(), admob_stats_core::DOMAIN);
        println!();
        println!("  {}", "Report Periods:".bold());
        for period in ReportPeriod::ALL {
            println!("    {:<12} {}", period.key(), period.label());
        }
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("admob-stats {}", VERSION);
    }

    Ok(())
}
