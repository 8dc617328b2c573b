//! Shared command context: server resolution, passphrase, session lifecycle.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use diary_core::{Session, SyncClient};
use secrecy::ExposeSecret;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, DiaryConfig};
use crate::errors::CliError;
use crate::helpers::prompt_passphrase;
use crate::ui::progress::Spinner;
use crate::ui::UiContext;

pub struct AppContext {
    server: Option<String>,
    config_path: Option<PathBuf>,
    quiet: bool,
    no_color: bool,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Self {
        Self {
            server: cli.server.clone(),
            config_path: cli.config.clone(),
            quiet: cli.quiet,
            no_color: cli.no_color,
        }
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.no_color)
    }

    fn config(&self) -> anyhow::Result<DiaryConfig> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        read_config(&path)
    }

    /// HTTP transport for the configured server. `--server` / `DIARY_SERVER_URL`
    /// take precedence over the config file.
    pub fn client(&self) -> anyhow::Result<SyncClient> {
        let config = self.config()?;
        let url = self
            .server
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or(config.server.url)
            .ok_or_else(|| {
                CliError::not_found(
                    "No journal server configured",
                    "Pass --server, set DIARY_SERVER_URL, or add [server] url to the config file.",
                )
            })?;
        let timeout = Duration::from_secs(config.server.timeout_seconds);
        debug!(%url, timeout_secs = timeout.as_secs(), "using journal server");
        Ok(SyncClient::with_timeout(url, timeout)?)
    }

    /// Open a session; the passphrase never leaves this process.
    pub async fn open_session(&self, ui: &UiContext) -> anyhow::Result<Session<SyncClient>> {
        let client = self.client()?;
        let interactive = std::io::stdin().is_terminal();
        let passphrase = prompt_passphrase(interactive)?;

        let spinner = Spinner::new(ui, "Unlocking");
        let session = Session::open(passphrase.expose_secret(), client).await?;
        spinner.finish();
        Ok(session)
    }

    /// Open a session and load the journal.
    pub async fn load_session(&self, ui: &UiContext) -> anyhow::Result<Session<SyncClient>> {
        let mut session = self.open_session(ui).await?;
        let spinner = Spinner::new(ui, "Loading journal");
        session.load().await?;
        spinner.finish();
        Ok(session)
    }

    /// Conditionally save the session's journal.
    pub async fn save_session(
        &self,
        session: &mut Session<SyncClient>,
        ui: &UiContext,
    ) -> anyhow::Result<()> {
        let spinner = Spinner::new(ui, "Saving journal");
        session.save().await?;
        spinner.finish();
        Ok(())
    }
}
