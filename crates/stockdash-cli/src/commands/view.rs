use std::time::Instant;

use stockdash_dashboard::{MenuItem, ViewArgs};

use super::{CommandData, CommandResult, Session};
use crate::cli::ViewCommand;
use crate::error::CliError;

pub async fn run(command: &ViewCommand, session: &Session) -> Result<CommandResult, CliError> {
    let item: MenuItem = command.item.parse()?;
    let args = ViewArgs::from(&command.args);
    let dashboard = session.dashboard();

    let started = Instant::now();
    let page = dashboard.render_args(item, &args).await?;
    let latency_ms = started.elapsed().as_millis() as u64;

    let source = dashboard.context().source.id();
    Ok(CommandResult::ok(CommandData::Page(Box::new(page)), vec![source]).with_latency(latency_ms))
}
