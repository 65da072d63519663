mod endpoints;
mod sources;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;

use booru_source::config::LoaderConfig;
use booru_source::{PluginDir, SharedRuntime, Source};

#[derive(Parser, Debug)]
#[command(name = "booru")]
#[command(about = "Inspect and maintain image board source plugins")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory containing installed source plugins
    #[arg(long, global = true, value_name = "DIR")]
    sources_dir: Option<PathBuf>,

    /// Directory receiving user edits of plugin files
    #[arg(long, global = true, value_name = "DIR")]
    user_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect source plugins
    Sources {
        #[command(subcommand)]
        command: sources::SourcesCommands,
    },

    /// Edit the endpoints served by a source
    Endpoints {
        #[command(subcommand)]
        command: endpoints::EndpointsCommands,
    },

    /// Show the directories sources are loaded from
    Config,
}

/// Shared state handed to every command
pub struct Context {
    pub config: LoaderConfig,
    pub runtime: SharedRuntime,
}

impl Context {
    /// Load a single source by disk name, or report that it does not exist
    pub fn load_source(&self, disk_name: &str) -> Option<Source> {
        let dir: PluginDir = self.config.plugin_dir(disk_name);
        if !dir.read_root().is_dir() {
            eprintln!(
                "{} No source named '{}' in {}",
                style("Error:").red().bold(),
                disk_name,
                self.config.sources_dir.display()
            );
            return None;
        }
        Some(Source::load(dir, &self.runtime))
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn print_config(config: &LoaderConfig) -> i32 {
    println!(
        "{} {} ({})",
        style("sources-dir").cyan(),
        config.sources_dir.display(),
        config.sources_dir_source.as_str()
    );
    println!(
        "{} {} ({})",
        style("user-dir").cyan(),
        config.user_dir.display(),
        config.user_dir_source.as_str()
    );
    0
}

async fn run(args: Args) -> Result<i32> {
    let mut config = LoaderConfig::build(true);
    if let Some(dir) = args.sources_dir {
        config.set_sources_dir(dir);
    }
    if let Some(dir) = args.user_dir {
        config.set_user_dir(dir);
    }

    let ctx = Context {
        config,
        runtime: SharedRuntime::default(),
    };

    match args.command {
        Commands::Sources { command } => sources::execute(command, &ctx).await,
        Commands::Endpoints { command } => endpoints::execute(command, &ctx),
        Commands::Config => Ok(print_config(&ctx.config)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
