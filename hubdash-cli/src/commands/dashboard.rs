use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::api::GitHubClient;
use crate::auth::Credentials;
use crate::config::Config;
use crate::ui::{CrosstermEvents, Exit, Session, TerminalSurface};

#[derive(Args, Default)]
pub struct DashboardCommand {}

impl DashboardCommand {
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = Config::load_from(&Config::resolve_path(config_path)?)?;

        // Credentials are prompted for before the terminal goes full-screen
        let credentials =
            Credentials::resolve(&config.auth.token_env).context("Failed to obtain credentials")?;
        let client = GitHubClient::new(&config, credentials)?;

        let mut session = Session::new(client, config.fetch_timeout());
        let mut surface = TerminalSurface::init()?;
        let mut events = CrosstermEvents;

        let outcome = session.run(&mut surface, &mut events).await;
        let exit = finish(outcome, surface.close())?;

        match exit {
            Exit::Quit => tracing::info!("Dashboard closed"),
            Exit::EventsClosed => tracing::warn!("Terminal input closed, leaving dashboard"),
        }

        Ok(())
    }
}

/// Combine the session result with terminal restoration; a session failure
/// takes precedence and carries the restore failure as context.
fn finish(outcome: Result<Exit>, closed: Result<()>) -> Result<Exit> {
    match (outcome, closed) {
        (Ok(exit), Ok(())) => Ok(exit),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            Err(err.context(format!("terminal was not restored: {:#}", close_err)))
        }
    }
}
