use stockdash_core::DashboardConfig;

use super::{CommandData, CommandResult, Session};
use crate::cli::{ConfigArgs, ConfigCommand};

pub fn run(args: &ConfigArgs, session: &Session) -> CommandResult {
    let data = match args.command {
        ConfigCommand::Show => CommandData::Config {
            loaded_from: session.loaded_from.clone(),
            config: Box::new(session.config.clone()),
        },
        ConfigCommand::Paths => CommandData::Paths {
            loaded_from: session.loaded_from.clone(),
            search_paths: DashboardConfig::search_paths(),
        },
    };
    CommandResult::ok(data, vec![session.config.provider.source])
}
