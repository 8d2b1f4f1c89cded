use notify_rust::{Notification, Urgency};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tomate_core::{NotificationUrgency, SessionCompletion, TimerMode, Translator};

pub enum NotifierMessage {
    SessionComplete {
        finished_mode: TimerMode,
        duration_minutes: u32,
        next_mode: TimerMode,
        auto_started: bool,
    },
    Alert {
        title: String,
        body: String,
    },
}

#[derive(Clone)]
pub struct NotifierHandle {
    sender: mpsc::Sender<NotifierMessage>,
}

impl NotifierHandle {
    pub fn send_session_complete(&self, completion: &SessionCompletion) {
        self.dispatch(NotifierMessage::SessionComplete {
            finished_mode: completion.finished_mode,
            duration_minutes: completion.duration_minutes,
            next_mode: completion.next_mode,
            auto_started: completion.auto_started,
        });
    }

    pub fn send_alert(&self, title: String, body: String) {
        self.dispatch(NotifierMessage::Alert { title, body });
    }

    /// Never blocks the caller: the timer and recorder actors call this from
    /// their own loops.
    fn dispatch(&self, message: NotifierMessage) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if let Err(error) = sender.send(message).await {
                error!(%error, "failed to send notification message");
            }
        });
    }
}

pub struct NotifierActor {
    receiver: mpsc::Receiver<NotifierMessage>,
    translator: Translator,
    urgency: Urgency,
    sound_enabled: bool,
}

impl NotifierActor {
    pub fn new(
        translator: Translator,
        urgency: NotificationUrgency,
        sound_enabled: bool,
    ) -> (Self, NotifierHandle) {
        let (sender, receiver) = mpsc::channel(32);

        let urgency = match urgency {
            NotificationUrgency::Low => Urgency::Low,
            NotificationUrgency::Normal => Urgency::Normal,
            NotificationUrgency::Critical => Urgency::Critical,
        };

        let actor = Self {
            receiver,
            translator,
            urgency,
            sound_enabled,
        };

        let handle = NotifierHandle { sender };

        (actor, handle)
    }

    pub async fn run(mut self) {
        info!("notifier actor started");

        while let Some(message) = self.receiver.recv().await {
            let (title, body) = self.render(&message);
            self.show(&title, &body);
        }

        debug!("notifier actor stopped");
    }

    fn render(&self, message: &NotifierMessage) -> (String, String) {
        match message {
            NotifierMessage::SessionComplete {
                finished_mode,
                duration_minutes,
                next_mode,
                auto_started,
            } => {
                let next = self.translator.mode(*next_mode).to_lowercase();
                let (title, mut body) = if finished_mode.is_break() {
                    (
                        self.translator.get("notification.break_complete_title"),
                        self.translator
                            .format("notification.break_complete_body", &[("next", &next)]),
                    )
                } else {
                    (
                        self.translator.get("notification.focus_complete_title"),
                        self.translator.format(
                            "notification.focus_complete_body",
                            &[
                                ("minutes", &duration_minutes.to_string()),
                                ("next", &next),
                            ],
                        ),
                    )
                };

                if *auto_started {
                    body.push('\n');
                    body.push_str(&self.translator.format(
                        "notification.auto_started",
                        &[("mode", &self.translator.mode(*next_mode))],
                    ));
                }

                (title, body)
            }
            NotifierMessage::Alert { title, body } => (title.clone(), body.clone()),
        }
    }

    fn show(&self, title: &str, body: &str) {
        match self.build_notification(title, body).show() {
            Ok(_) => {
                debug!(title, "notification sent");
            }
            Err(error) => {
                warn!(%error, title, "failed to show notification");
            }
        }
    }

    fn build_notification(&self, summary: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(summary)
            .body(body)
            .urgency(self.urgency)
            .appname("Tomate");

        if self.sound_enabled {
            notification.sound_name("complete");
        }

        notification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomate_core::Language;

    fn english_actor() -> NotifierActor {
        NotifierActor::new(Translator::new(Language::En), NotificationUrgency::Normal, false).0
    }

    #[test]
    fn focus_completion_mentions_minutes_and_next_break() {
        let actor = english_actor();

        let (title, body) = actor.render(&NotifierMessage::SessionComplete {
            finished_mode: TimerMode::Focus,
            duration_minutes: 25,
            next_mode: TimerMode::LongBreak,
            auto_started: false,
        });

        assert_eq!(title, "Tomate - Pomodoro done");
        assert_eq!(body, "25 min of focus done. Time for a long break.");
    }

    #[test]
    fn auto_started_break_is_announced() {
        let actor = english_actor();

        let (_, body) = actor.render(&NotifierMessage::SessionComplete {
            finished_mode: TimerMode::ShortBreak,
            duration_minutes: 5,
            next_mode: TimerMode::Focus,
            auto_started: true,
        });

        assert_eq!(body, "Back to work! Next: focus.\nFocus started automatically.");
    }

    #[test]
    fn alerts_pass_through_untranslated() {
        let actor = english_actor();

        let (title, body) = actor.render(&NotifierMessage::Alert {
            title: "T".to_string(),
            body: "B".to_string(),
        });

        assert_eq!((title.as_str(), body.as_str()), ("T", "B"));
    }

    #[tokio::test]
    async fn handle_delivers_messages_to_actor() {
        let (mut actor, handle) =
            NotifierActor::new(Translator::default(), NotificationUrgency::Normal, false);

        handle.send_alert("Test".to_string(), "Body".to_string());

        let message = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            actor.receiver.recv(),
        )
        .await
        .unwrap();

        assert!(matches!(message, Some(NotifierMessage::Alert { .. })));
    }
}
