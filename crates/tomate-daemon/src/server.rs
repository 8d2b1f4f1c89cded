use crate::actors::TimerHandle;
use anyhow::{bail, Context, Result};
use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath, ListenerOptions,
};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::broadcast;
use tomate_core::{Config, SettingsProvider, SharedSettings, TimerSettings};
use tomate_protocol::{Request, Response, MAX_FRAME_SIZE};
use tracing::{debug, error, info, instrument, warn};

/// Everything a connection needs to answer a request.
#[derive(Clone)]
pub struct RequestContext {
    pub timer_handle: TimerHandle,
    pub settings: SharedSettings,
    pub config_path: PathBuf,
}

pub struct Server {
    socket_path: PathBuf,
    context: RequestContext,
}

impl Server {
    pub fn new(context: RequestContext) -> Self {
        Self {
            socket_path: socket_path(),
            context,
        }
    }

    fn cleanup_stale_socket(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).context("failed to remove stale socket")?;
            debug!("removed stale socket file");
        }
        Ok(())
    }

    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        self.cleanup_stale_socket()?;

        let listener = ListenerOptions::new()
            .name(self.socket_path.as_os_str().to_fs_name::<GenericFilePath>()?)
            .create_tokio()?;

        info!(path = %self.socket_path.display(), "server listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok(stream) => {
                            let context = self.context.clone();
                            tokio::spawn(async move {
                                if let Err(error) = handle_connection(stream, context).await {
                                    error!(%error, "connection handler failed");
                                }
                            });
                        }
                        Err(error) => {
                            error!(%error, "failed to accept connection");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        self.cleanup_socket();
        Ok(())
    }

    fn cleanup_socket(&self) {
        if let Err(error) = std::fs::remove_file(&self.socket_path) {
            debug!(%error, "socket file already removed");
        } else {
            debug!("socket file cleaned up");
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.cleanup_socket();
    }
}

#[cfg(unix)]
fn socket_path() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/run/user/{}/tomate.sock", uid))
}

#[cfg(not(unix))]
fn socket_path() -> PathBuf {
    std::env::temp_dir().join("tomate.sock")
}

async fn handle_connection(mut stream: Stream, context: RequestContext) -> Result<()> {
    debug!("new connection accepted");

    let mut length_buffer = [0u8; 4];
    stream.read_exact(&mut length_buffer).await?;
    let length = u32::from_le_bytes(length_buffer) as usize;

    if length > MAX_FRAME_SIZE {
        bail!("request frame of {} bytes exceeds limit", length);
    }

    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).await?;

    let request: Request =
        bincode::deserialize(&payload).context("failed to deserialize request")?;

    debug!(?request, "received request");

    let response = handle_request(request, &context).await;

    debug!(?response, "sending response");

    let response_bytes = bincode::serialize(&response)?;
    let response_length = (response_bytes.len() as u32).to_le_bytes();

    stream.write_all(&response_length).await?;
    stream.write_all(&response_bytes).await?;
    stream.flush().await?;

    Ok(())
}

async fn handle_request(request: Request, context: &RequestContext) -> Response {
    let timer_handle = &context.timer_handle;

    match request {
        Request::Ping => Response::Pong,

        Request::GetStatus => match timer_handle.get_status().await {
            Some(snapshot) => Response::Status(snapshot),
            None => timer_unavailable(),
        },

        Request::Start => acknowledge(timer_handle.start().await.is_ok()),

        Request::Pause => acknowledge(timer_handle.pause().await.is_ok()),

        Request::Reset => acknowledge(timer_handle.reset().await.is_ok()),

        Request::SwitchMode { mode } => acknowledge(timer_handle.switch_mode(mode).await.is_ok()),

        Request::SelectTask { task_id } => {
            acknowledge(timer_handle.select_task(task_id).await.is_ok())
        }

        Request::GetSettings => Response::Settings(context.settings.current()),

        Request::UpdateSettings { settings } => {
            context.settings.replace(settings);
            info!(?settings, "settings updated");

            match persist_settings(&context.config_path, settings) {
                Ok(()) => Response::Ok,
                Err(error) => {
                    warn!(%error, "settings applied but not saved");
                    Response::Error {
                        message: format!("settings applied but not saved: {}", error),
                    }
                }
            }
        }
    }
}

fn acknowledge(delivered: bool) -> Response {
    if delivered {
        Response::Ok
    } else {
        timer_unavailable()
    }
}

fn timer_unavailable() -> Response {
    Response::Error {
        message: "timer is not running".to_string(),
    }
}

/// Rewrites only the `[timer]` section; other sections may have been edited
/// by the CLI since the daemon started.
fn persist_settings(config_path: &std::path::Path, settings: TimerSettings) -> Result<()> {
    let mut config = Config::load_from(config_path)?;
    config.timer = settings;
    config.save_to(config_path)?;
    Ok(())
}
