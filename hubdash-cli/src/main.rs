use anyhow::Result;
use clap::Parser;

use hubdash_cli::commands::Cli;
use hubdash_cli::logging;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; stdout belongs to the dashboard
    if let Some(log_file) = cli.log_file()? {
        logging::init(cli.verbose, &log_file)?;
    }

    // One thread: input, fetches and rendering are serialized
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}
