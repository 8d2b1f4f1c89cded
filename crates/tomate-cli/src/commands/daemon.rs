use anyhow::Result;

use super::translator;
use crate::client::DaemonClient;
use crate::daemon_launcher::launch_daemon;

pub async fn execute() -> Result<()> {
    let translator = translator();

    if DaemonClient::new().is_running().await {
        println!("{}", translator.get("command.daemon_running"));
        return Ok(());
    }

    launch_daemon(&translator).await
}
