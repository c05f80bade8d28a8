use super::Session;
use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(args: &ServeArgs, session: &Session) -> Result<(), CliError> {
    let bind = args
        .bind
        .clone()
        .unwrap_or_else(|| session.config.server.bind.clone());
    eprintln!("stockdash dashboard on http://{bind}");
    stockdash_web::serve(&bind, session.dashboard()).await?;
    Ok(())
}
