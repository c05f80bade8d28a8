mod config;
mod menu;
mod serve;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use stockdash_ai::{CannedCommentary, CommentaryError, CommentaryProvider, OpenAiCommentary};
use stockdash_core::{build_source, DashboardConfig, Envelope, ProviderId};
use stockdash_dashboard::{Dashboard, MenuEntry, Page, ViewContext};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata;

/// Payload of a finished command, serialized as the envelope `data`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandData {
    Menu(Vec<MenuEntry>),
    Page(Box<Page>),
    Config {
        loaded_from: Option<PathBuf>,
        config: Box<DashboardConfig>,
    },
    Paths {
        loaded_from: Option<PathBuf>,
        search_paths: Vec<PathBuf>,
    },
}

pub struct CommandResult {
    pub data: CommandData,
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: CommandData, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            source_chain,
            latency_ms: 0,
            warnings: Vec::new(),
        }
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub enum Outcome {
    Render(Envelope<CommandData>),
    Served,
}

/// Everything a command needs: the resolved config and where it came from.
pub struct Session {
    pub config: DashboardConfig,
    pub loaded_from: Option<PathBuf>,
    pub offline: bool,
}

impl Session {
    pub fn open(cli: &Cli) -> Result<Self, CliError> {
        let (mut config, loaded_from) = DashboardConfig::discover(cli.config.as_deref())?;
        match &loaded_from {
            Some(path) => tracing::info!(path = %path.display(), "loaded config"),
            None => tracing::info!("no config file found, using defaults"),
        }
        if cli.offline {
            config.provider.source = ProviderId::Fixture;
        }
        Ok(Self {
            config,
            loaded_from,
            offline: cli.offline,
        })
    }

    pub fn dashboard(&self) -> Dashboard {
        let source = build_source(&self.config.provider);
        let mut ctx = ViewContext::new(source, Arc::new(self.config.clone()));
        match self.commentary_provider() {
            Ok(Some(provider)) => ctx = ctx.with_commentary(provider),
            Ok(None) => {}
            Err(error) => {
                tracing::debug!(%error, "commentary provider not available");
                ctx = ctx.without_commentary(error);
            }
        }
        Dashboard::new(ctx)
    }

    /// `Ok(None)` when commentary is switched off in config.
    fn commentary_provider(&self) -> Result<Option<Arc<dyn CommentaryProvider>>, CommentaryError> {
        if self.offline {
            return Ok(Some(Arc::new(CannedCommentary)));
        }
        if !self.config.ai.enabled {
            return Ok(None);
        }
        let provider = OpenAiCommentary::from_config(&self.config.ai)?;
        Ok(Some(Arc::new(provider)))
    }

    fn warnings(&self) -> Vec<String> {
        if self.offline {
            vec![String::from("offline mode: fixture prices and canned commentary")]
        } else {
            Vec::new()
        }
    }
}

pub async fn run(cli: &Cli) -> Result<Outcome, CliError> {
    let session = Session::open(cli)?;

    let result = match &cli.command {
        Command::Menu => menu::run(&session),
        Command::View(command) => view::run(command, &session).await?,
        Command::Serve(args) => {
            serve::run(args, &session).await?;
            return Ok(Outcome::Served);
        }
        Command::Config(args) => config::run(args, &session),
    };

    let CommandResult {
        data,
        source_chain,
        latency_ms,
        mut warnings,
    } = result;
    let mut all_warnings = session.warnings();
    all_warnings.append(&mut warnings);

    let meta = metadata::envelope_meta(source_chain, latency_ms, all_warnings)?;
    Ok(Outcome::Render(Envelope::success(meta, data)))
}
