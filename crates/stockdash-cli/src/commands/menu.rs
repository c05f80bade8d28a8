use stockdash_dashboard::menu_entries;

use super::{CommandData, CommandResult, Session};

pub fn run(session: &Session) -> CommandResult {
    CommandResult::ok(
        CommandData::Menu(menu_entries()),
        vec![session.config.provider.source],
    )
}
