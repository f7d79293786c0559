mod config_cmd;
mod dashboard;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use dashboard::DashboardCommand;

use crate::config::Config;
use crate::logging::LOG_FILE_NAME;

#[derive(Parser)]
#[command(name = "hubdash")]
#[command(about = "Terminal dashboard for your GitHub account and repositories", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "HUBDASH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive dashboard (default)
    Dashboard(DashboardCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Log file beside the resolved config file; `None` when the command
    /// only prints to stdout and needs no log.
    pub fn log_file(&self) -> Result<Option<PathBuf>> {
        if matches!(self.command, Some(Commands::Completions { .. })) {
            return Ok(None);
        }

        let config_file = Config::resolve_path(self.config.as_deref())?;
        let dir = config_file.parent().map(PathBuf::from).unwrap_or_default();
        Ok(Some(dir.join(LOG_FILE_NAME)))
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            None => DashboardCommand::default().execute(config_path).await,
            Some(Commands::Dashboard(cmd)) => cmd.execute(config_path).await,
            Some(Commands::Config(subcmd)) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force).await,
            },
            Some(Commands::Completions { shell }) => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
