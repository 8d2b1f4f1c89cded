use anyhow::Result;
use tomate_protocol::{Request, TimerMode};

use super::{expect_ok, send, translator};
use crate::client::DaemonClient;
use crate::daemon_launcher::launch_daemon;

pub async fn start() -> Result<()> {
    let translator = translator();

    if !DaemonClient::new().is_running().await {
        launch_daemon(&translator).await?;
    }

    expect_ok(send(Request::Start, &translator).await?, &translator)?;
    println!("{}", translator.get("command.start_success"));

    Ok(())
}

pub async fn pause() -> Result<()> {
    let translator = translator();

    expect_ok(send(Request::Pause, &translator).await?, &translator)?;
    println!("{}", translator.get("command.pause_success"));

    Ok(())
}

pub async fn reset() -> Result<()> {
    let translator = translator();

    expect_ok(send(Request::Reset, &translator).await?, &translator)?;
    println!("{}", translator.get("command.reset_success"));

    Ok(())
}

pub async fn switch(mode: TimerMode) -> Result<()> {
    let translator = translator();

    expect_ok(send(Request::SwitchMode { mode }, &translator).await?, &translator)?;
    println!(
        "{}",
        translator.format("command.switch_success", &[("mode", &translator.mode(mode))])
    );

    Ok(())
}
