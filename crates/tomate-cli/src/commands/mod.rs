mod control;
mod daemon;
mod init;
mod lang;
mod note;
mod settings;
mod stats;
mod status;
mod task;

pub use control::{pause, reset, start, switch};
pub use daemon::execute as daemon;
pub use init::execute as init;
pub use lang::execute as lang;
pub use note::{execute as note, NoteCommand};
pub use settings::{execute as settings, SettingsCommand};
pub use stats::{execute as stats, Period};
pub use status::execute as status;
pub use task::{execute as task, TaskCommand};

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tomate_core::{Config, Translator};
use tomate_protocol::{Request, Response};

use crate::client::{ClientError, DaemonClient};

fn translator() -> Translator {
    Config::load()
        .map(|config| Translator::new(config.general.language))
        .unwrap_or_default()
}

/// Sends a request to a daemon that must already be running. Daemon-side
/// errors become `Err`.
async fn send(request: Request, translator: &Translator) -> Result<Response> {
    match DaemonClient::new().send(request).await {
        Ok(Response::Error { message }) => bail!("{}", message),
        Ok(response) => Ok(response),
        Err(ClientError::DaemonNotRunning) => {
            eprintln!("{}", translator.get("error.daemon_not_running"));
            eprintln!("{}", translator.get("error.daemon_not_running_hint"));
            std::process::exit(1);
        }
        Err(ClientError::Timeout) => bail!("{}", translator.get("error.connection_timeout")),
        Err(error) => bail!("{}", error),
    }
}

fn expect_ok(response: Response, translator: &Translator) -> Result<()> {
    match response {
        Response::Ok => Ok(()),
        _ => bail!("{}", translator.get("error.unexpected_response")),
    }
}

/// Path of the local database, creating its directory on first use.
fn database_path() -> Result<PathBuf> {
    std::fs::create_dir_all(Config::data_dir()).context("cannot create the data directory")?;
    Ok(Config::database_path())
}
