mod actors;
mod server;

use std::sync::Arc;

use actors::{NotifierActor, RecorderActor, TimerActor};
use anyhow::Result;
use server::{RequestContext, Server};
use tokio::sync::broadcast;
use tomate_adapters::{SqliteSessionRepository, SqliteTaskRepository};
use tomate_core::{
    Config, SessionRepository, SharedSettings, SystemClock, TaskRepository, TimerEngine,
    Translator,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tomate_daemon=debug".parse()?),
        )
        .init();

    info!("tomate daemon starting");

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, "failed to load config, using defaults");
        Config::default()
    });
    let translator = Translator::new(config.general.language);

    let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("SIGINT received, initiating shutdown");
        shutdown_sender.send(()).ok();
    });

    let notifier_handle = if config.notifications.enabled {
        let (notifier_actor, notifier_handle) = NotifierActor::new(
            translator.clone(),
            config.notifications.urgency,
            config.notifications.sound_enabled,
        );
        tokio::spawn(notifier_actor.run());
        Some(notifier_handle)
    } else {
        info!("desktop notifications disabled");
        None
    };

    let (session_repository, task_repository) = create_repositories();
    let (recorder_actor, recorder_handle) = RecorderActor::new(
        session_repository,
        task_repository,
        notifier_handle.clone(),
        translator,
    );
    tokio::spawn(recorder_actor.run());

    let settings = SharedSettings::new(config.timer);
    let engine = TimerEngine::new(
        Arc::new(settings.clone()),
        Arc::new(recorder_handle),
        Arc::new(SystemClock),
    );
    let (timer_actor, timer_handle) = TimerActor::new(engine, notifier_handle);
    tokio::spawn(timer_actor.run());

    let server = Server::new(RequestContext {
        timer_handle,
        settings,
        config_path: Config::config_path(),
    });
    server.run(shutdown_receiver).await?;

    info!("tomate daemon stopped");
    Ok(())
}

type Repositories = (
    Option<Arc<dyn SessionRepository>>,
    Option<Arc<dyn TaskRepository>>,
);

fn create_repositories() -> Repositories {
    if let Err(error) = std::fs::create_dir_all(Config::data_dir()) {
        warn!(%error, "failed to create data directory, sessions will not be persisted");
        return (None, None);
    }

    let database_path = Config::database_path();

    let sessions: Option<Arc<dyn SessionRepository>> =
        match SqliteSessionRepository::new(&database_path) {
            Ok(repository) => {
                info!(?database_path, "session persistence enabled");
                Some(Arc::new(repository))
            }
            Err(error) => {
                warn!(%error, "failed to initialize session repository, sessions will not be persisted");
                None
            }
        };

    let tasks: Option<Arc<dyn TaskRepository>> = match SqliteTaskRepository::new(&database_path) {
        Ok(repository) => Some(Arc::new(repository)),
        Err(error) => {
            warn!(%error, "failed to initialize task repository, task counts will not be updated");
            None
        }
    };

    (sessions, tasks)
}
