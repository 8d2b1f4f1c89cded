use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info};

use tomate_core::{
    SessionRecord, SessionRecorder, SessionRecorderError, SessionRepository, TaskRepository,
    Translator,
};

use super::NotifierHandle;

const QUEUE_CAPACITY: usize = 64;

/// Queue side of the recorder, handed to the timer engine.
#[derive(Clone)]
pub struct RecorderHandle {
    sender: mpsc::Sender<SessionRecord>,
}

impl SessionRecorder for RecorderHandle {
    fn record(&self, record: SessionRecord) -> Result<(), SessionRecorderError> {
        self.sender.try_send(record).map_err(|error| match error {
            TrySendError::Full(_) => SessionRecorderError::QueueFull,
            TrySendError::Closed(_) => SessionRecorderError::Closed,
        })
    }
}

pub struct RecorderActor {
    receiver: mpsc::Receiver<SessionRecord>,
    sessions: Option<Arc<dyn SessionRepository>>,
    tasks: Option<Arc<dyn TaskRepository>>,
    notifier: Option<NotifierHandle>,
    translator: Translator,
}

impl RecorderActor {
    pub fn new(
        sessions: Option<Arc<dyn SessionRepository>>,
        tasks: Option<Arc<dyn TaskRepository>>,
        notifier: Option<NotifierHandle>,
        translator: Translator,
    ) -> (Self, RecorderHandle) {
        Self::with_capacity(sessions, tasks, notifier, translator, QUEUE_CAPACITY)
    }

    fn with_capacity(
        sessions: Option<Arc<dyn SessionRepository>>,
        tasks: Option<Arc<dyn TaskRepository>>,
        notifier: Option<NotifierHandle>,
        translator: Translator,
        capacity: usize,
    ) -> (Self, RecorderHandle) {
        let (sender, receiver) = mpsc::channel(capacity);

        let actor = Self {
            receiver,
            sessions,
            tasks,
            notifier,
            translator,
        };

        (actor, RecorderHandle { sender })
    }

    pub async fn run(mut self) {
        info!("recorder actor started");

        while let Some(record) = self.receiver.recv().await {
            self.persist(record);
        }

        debug!("recorder actor stopped");
    }

    fn persist(&self, mut record: SessionRecord) {
        let Some(ref sessions) = self.sessions else {
            debug!(mode = %record.mode, "persistence disabled, session dropped");
            return;
        };

        match sessions.save(&mut record) {
            Ok(id) => debug!(id, mode = %record.mode, "session persisted"),
            Err(error) => {
                error!(%error, "failed to persist session");
                self.notify_persistence_error();
                return;
            }
        }

        if !record.is_completed_focus() {
            return;
        }

        if let (Some(task_id), Some(ref tasks)) = (record.task_id, &self.tasks) {
            if let Err(error) = tasks.increment_pomodoro_count(task_id) {
                error!(%error, task_id, "failed to credit pomodoro to task");
            }
        }
    }

    fn notify_persistence_error(&self) {
        if let Some(ref notifier) = self.notifier {
            notifier.send_alert(
                self.translator.get("notification.record_error_title"),
                self.translator.get("notification.record_error_body"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;
    use tomate_adapters::{SqliteSessionRepository, SqliteTaskRepository};
    use tomate_core::{Task, TaskPriority, TimerMode};

    fn repositories() -> (Arc<SqliteSessionRepository>, Arc<SqliteTaskRepository>) {
        (
            Arc::new(SqliteSessionRepository::in_memory().unwrap()),
            Arc::new(SqliteTaskRepository::in_memory().unwrap()),
        )
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn records_are_persisted_off_the_caller() {
        let (sessions, tasks) = repositories();
        let (actor, handle) = RecorderActor::new(
            Some(sessions.clone()),
            Some(tasks),
            None,
            Translator::default(),
        );
        tokio::spawn(actor.run());

        handle
            .record(SessionRecord::completed(TimerMode::Focus, 25, Utc::now(), None))
            .unwrap();
        settle().await;

        assert_eq!(sessions.count_completed_focus().unwrap(), 1);
    }

    #[tokio::test]
    async fn focus_session_credits_linked_task() {
        let (sessions, tasks) = repositories();
        let mut task = Task::new("write docs".to_string(), TaskPriority::Medium, 4);
        let task_id = tasks.save(&mut task).unwrap();
        let (actor, handle) = RecorderActor::new(
            Some(sessions),
            Some(tasks.clone()),
            None,
            Translator::default(),
        );
        tokio::spawn(actor.run());

        handle
            .record(SessionRecord::completed(TimerMode::Focus, 25, Utc::now(), Some(task_id)))
            .unwrap();
        handle
            .record(SessionRecord::completed(
                TimerMode::ShortBreak,
                5,
                Utc::now(),
                Some(task_id),
            ))
            .unwrap();
        settle().await;

        assert_eq!(tasks.find_by_id(task_id).unwrap().pomodoro_count, 1);
    }

    #[tokio::test]
    async fn full_queue_is_reported_without_blocking() {
        let (_actor, handle) =
            RecorderActor::with_capacity(None, None, None, Translator::default(), 1);

        let record = SessionRecord::completed(TimerMode::Focus, 25, Utc::now(), None);
        handle.record(record.clone()).unwrap();

        assert_eq!(handle.record(record), Err(SessionRecorderError::QueueFull));
    }

    #[tokio::test]
    async fn stopped_actor_is_reported_as_closed() {
        let (actor, handle) = RecorderActor::new(None, None, None, Translator::default());
        drop(actor);

        let result = handle.record(SessionRecord::completed(
            TimerMode::LongBreak,
            15,
            Utc::now(),
            None,
        ));

        assert_eq!(result, Err(SessionRecorderError::Closed));
    }
}
