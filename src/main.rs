//! spr - stacked pull requests for git

use anyhow::{Result, anyhow};
use clap::builder::styling::{AnsiColor, Color, Style};
use clap::{ArgAction, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::Level;

mod cli;

use cli::merge::{MergeOptions, run_merge};
use cli::update::{UpdateOptions, run_update};

const ABOUT: &str = "spr keeps one GitHub pull request per commit of your local branch.";

#[derive(Parser, Debug)]
#[command(name = "spr", about = ABOUT, version, styles = cli_styles())]
struct Cli {
    /// Verbosity level (0-4)
    #[arg(short, action = ArgAction::Count, global = true)]
    v: u8,

    /// Path inside the git working tree
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    /// Git remote to use instead of the configured one
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create and update pull requests for every commit on the branch
    Update {
        /// Show what would be done without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Preview the plan and ask before executing
        #[arg(long)]
        confirm: bool,

        /// Request a review from this user on new pull requests
        #[arg(long = "reviewer", short = 'r', value_name = "LOGIN")]
        reviewers: Vec<String>,
    },
    /// Merge every mergeable pull request from the bottom of the stack
    Merge {
        /// Show what would be merged without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Preview the plan and ask before executing
        #[arg(long)]
        confirm: bool,

        /// Merge at most this many pull requests
        #[arg(long)]
        count: Option<NonZeroUsize>,
    },
}

impl Cli {
    /// Install the stderr tracing subscriber at the level given by `-v`
    fn init_tracing_subscriber(&self) -> Result<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(match self.v {
                0 => Level::ERROR,
                1 => Level::WARN,
                2 => Level::INFO,
                3 => Level::DEBUG,
                _ => Level::TRACE,
            })
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
    }
}

/// Styles for the CLI help output
const fn cli_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .header(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_tracing_subscriber()?;

    let remote = cli.remote.as_deref();
    match cli.command {
        Commands::Update {
            dry_run,
            confirm,
            reviewers,
        } => {
            run_update(
                &cli.path,
                remote,
                UpdateOptions {
                    dry_run,
                    confirm,
                    reviewers,
                },
            )
            .await?;
        }
        Commands::Merge {
            dry_run,
            confirm,
            count,
        } => {
            run_merge(
                &cli.path,
                remote,
                MergeOptions {
                    dry_run,
                    confirm,
                    count: count.map(NonZeroUsize::get),
                },
            )
            .await?;
        }
    }

    Ok(())
}
