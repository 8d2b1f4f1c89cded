use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use tomate_core::{TaskId, TickOutcome, TimerEngine, TimerMode, TimerSnapshot};

use super::NotifierHandle;

pub enum TimerMessage {
    Start,
    Pause,
    Reset,
    SwitchMode { mode: TimerMode },
    SelectTask { task_id: Option<TaskId> },
    GetStatus { reply: oneshot::Sender<TimerSnapshot> },
}

/// Sole owner of the engine. Commands and ticks are handled one at a time.
pub struct TimerActor {
    receiver: mpsc::Receiver<TimerMessage>,
    engine: TimerEngine,
    notifier: Option<NotifierHandle>,
}

#[derive(Clone)]
pub struct TimerHandle {
    sender: mpsc::Sender<TimerMessage>,
}

impl TimerHandle {
    pub async fn start(&self) -> Result<(), mpsc::error::SendError<TimerMessage>> {
        self.sender.send(TimerMessage::Start).await
    }

    pub async fn pause(&self) -> Result<(), mpsc::error::SendError<TimerMessage>> {
        self.sender.send(TimerMessage::Pause).await
    }

    pub async fn reset(&self) -> Result<(), mpsc::error::SendError<TimerMessage>> {
        self.sender.send(TimerMessage::Reset).await
    }

    pub async fn switch_mode(
        &self,
        mode: TimerMode,
    ) -> Result<(), mpsc::error::SendError<TimerMessage>> {
        self.sender.send(TimerMessage::SwitchMode { mode }).await
    }

    pub async fn select_task(
        &self,
        task_id: Option<TaskId>,
    ) -> Result<(), mpsc::error::SendError<TimerMessage>> {
        self.sender.send(TimerMessage::SelectTask { task_id }).await
    }

    pub async fn get_status(&self) -> Option<TimerSnapshot> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(TimerMessage::GetStatus {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }
}

impl TimerActor {
    pub fn new(engine: TimerEngine, notifier: Option<NotifierHandle>) -> (Self, TimerHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let actor = Self {
            receiver,
            engine,
            notifier,
        };

        let handle = TimerHandle { sender };

        (actor, handle)
    }

    pub async fn run(mut self) {
        let mut tick_interval = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                Some(message) = self.receiver.recv() => {
                    match message {
                        TimerMessage::Start => {
                            if !self.engine.state().is_ticking() {
                                // first decrement one full second after start
                                tick_interval.reset();
                            }
                            self.engine.start();
                            info!(mode = %self.engine.state().mode, "timer started");
                        }
                        TimerMessage::Pause => {
                            self.engine.pause();
                            info!("timer paused");
                        }
                        TimerMessage::Reset => {
                            self.engine.reset();
                            info!(mode = %self.engine.state().mode, "timer reset");
                        }
                        TimerMessage::SwitchMode { mode } => {
                            self.engine.switch_mode(mode);
                            info!(%mode, "mode switched");
                        }
                        TimerMessage::SelectTask { task_id } => {
                            self.engine.select_task(task_id);
                            info!(?task_id, "current task changed");
                        }
                        TimerMessage::GetStatus { reply } => {
                            let _ = reply.send(self.engine.snapshot());
                        }
                    }
                }
                _ = tick_interval.tick() => {
                    if let TickOutcome::Completed(completion) = self.engine.tick() {
                        info!(
                            finished = %completion.finished_mode,
                            next = %completion.next_mode,
                            auto_started = completion.auto_started,
                            "session completed"
                        );

                        if let Some(ref notifier) = self.notifier {
                            notifier.send_session_complete(&completion);
                        }
                    }
                }
                else => break,
            }
        }

        debug!("timer actor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;
    use std::sync::Arc;
    use tomate_adapters::{FailingSessionRecorder, ManualClock, RecordingSessionRecorder};
    use tomate_core::{SharedSettings, TimerSettings};

    fn one_minute_settings() -> TimerSettings {
        let one = NonZeroU32::new(1).unwrap();
        TimerSettings {
            focus_duration_minutes: one,
            short_break_duration_minutes: one,
            long_break_duration_minutes: NonZeroU32::new(2).unwrap(),
            long_break_interval: NonZeroU32::new(2).unwrap(),
            ..TimerSettings::default()
        }
    }

    fn spawn_actor(settings: TimerSettings) -> (TimerHandle, Arc<RecordingSessionRecorder>) {
        let recorder = Arc::new(RecordingSessionRecorder::new());
        let engine = TimerEngine::new(
            Arc::new(SharedSettings::new(settings)),
            recorder.clone(),
            Arc::new(ManualClock::default()),
        );
        let (actor, handle) = TimerActor::new(engine, None);
        tokio::spawn(actor.run());
        (handle, recorder)
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_does_not_count_down() {
        let (handle, _) = spawn_actor(TimerSettings::default());

        tokio::time::sleep(Duration::from_secs(10)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.remaining_seconds, 1500);
        assert!(!status.state.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn running_timer_counts_one_per_second() {
        let (handle, _) = spawn_actor(TimerSettings::default());

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.remaining_seconds, 1490);
        assert!(status.state.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_remaining_time() {
        let (handle, _) = spawn_actor(TimerSettings::default());

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        handle.pause().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.remaining_seconds, 1497);
        assert!(status.state.is_paused);
    }

    #[tokio::test(start_paused = true)]
    async fn completed_focus_is_recorded_and_moves_to_break() {
        let (handle, recorder) = spawn_actor(one_minute_settings());

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60_500)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.mode, TimerMode::ShortBreak);
        assert_eq!(status.state.sessions_completed_in_cycle, 1);
        assert!(!status.state.is_running);
        assert_eq!(recorder.count(), 1);
        assert_eq!(recorder.records()[0].mode, TimerMode::Focus);
    }

    #[tokio::test(start_paused = true)]
    async fn switch_mode_and_select_task_are_visible_in_status() {
        let (handle, _) = spawn_actor(one_minute_settings());

        handle.switch_mode(TimerMode::LongBreak).await.unwrap();
        handle.select_task(Some(9)).await.unwrap();

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.mode, TimerMode::LongBreak);
        assert_eq!(status.state.remaining_seconds, 120);
        assert_eq!(status.total_seconds, 120);
        assert_eq!(status.state.current_task_id, Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_refills_current_mode() {
        let (handle, _) = spawn_actor(TimerSettings::default());

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        handle.reset().await.unwrap();

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.remaining_seconds, 1500);
        assert!(!status.state.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn full_recorder_queue_does_not_stop_the_cycle() {
        let recorder = Arc::new(FailingSessionRecorder::queue_full());
        let engine = TimerEngine::new(
            Arc::new(SharedSettings::new(one_minute_settings())),
            recorder.clone(),
            Arc::new(ManualClock::default()),
        );
        let (actor, handle) = TimerActor::new(engine, None);
        tokio::spawn(actor.run());

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60_500)).await;

        let status = handle.get_status().await.unwrap();
        assert_eq!(status.state.mode, TimerMode::ShortBreak);
        assert_eq!(status.state.sessions_completed_in_cycle, 1);
        assert_eq!(status.state.remaining_seconds, 60);
        assert_eq!(recorder.attempts(), 1);
    }
}
