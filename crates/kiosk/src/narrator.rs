use std::process::Stdio;

use navigation::narration::{NarrationError, NarrationEvent, Narrator, UtteranceId};
use tokio::{
    process::Command,
    sync::{mpsc::UnboundedSender, oneshot},
};

/// Reads text aloud by running an external speech program (`espeak` and
/// friends) with the text as its only argument, one process per utterance.
///
/// The end of every utterance that was not cancelled is sent to `events`.
/// Must be used from within a tokio runtime.
pub struct CommandNarrator {
    program: String,
    events: UnboundedSender<NarrationEvent>,
    last_id: u64,
    current: Option<Speaking>,
}

struct Speaking {
    utterance: UtteranceId,
    stop: oneshot::Sender<()>,
}

impl CommandNarrator {
    pub fn new<S: Into<String>>(program: S, events: UnboundedSender<NarrationEvent>) -> Self {
        Self {
            program: program.into(),
            events,
            last_id: 0,
            current: None,
        }
    }

    /// Whether `program` can be started on this machine at all.
    pub async fn is_available(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .is_ok()
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, text: &str) -> Result<UtteranceId, NarrationError> {
        self.cancel();

        let mut child = Command::new(&self.program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|why| NarrationError::Engine(format!("{}: {}", self.program, why)))?;

        self.last_id += 1;
        let utterance = UtteranceId::new(self.last_id);
        let (stop, stopped) = oneshot::channel::<()>();
        let events = self.events.clone();

        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    let event = match status {
                        Ok(status) if status.success() => NarrationEvent::Finished(utterance),
                        Ok(status) => NarrationEvent::Failed {
                            utterance,
                            reason: format!("speech command {}", status),
                        },
                        Err(why) => NarrationEvent::Failed {
                            utterance,
                            reason: why.to_string(),
                        },
                    };
                    if events.send(event).is_err() {
                        log::debug!("Nobody listens for the end of {}", utterance);
                    }
                }
                _ = stopped => {
                    if let Err(why) = child.kill().await {
                        log::warn!("Could not stop {}: {}", utterance, why);
                    }
                }
            }
        });

        self.current = Some(Speaking { utterance, stop });
        Ok(utterance)
    }

    fn cancel(&mut self) {
        if let Some(speaking) = self.current.take() {
            log::trace!("Cancelling {}", speaking.utterance);
            // Fails only if the utterance already ended.
            let _ = speaking.stop.send(());
        }
    }

    fn is_speaking(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|speaking| !speaking.stop.is_closed())
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use tokio::{sync::mpsc, time::timeout};

    use super::*;

    #[tokio::test]
    async fn finished_utterances_are_reported() {
        let (events, mut received) = mpsc::unbounded_channel();
        let mut narrator = CommandNarrator::new("true", events);

        let utterance = narrator.speak("Turn left.").unwrap();
        let event = timeout(Duration::from_secs(5), received.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event, NarrationEvent::Finished(utterance));
    }

    #[tokio::test]
    async fn failing_programs_report_a_failure() {
        let (events, mut received) = mpsc::unbounded_channel();
        let mut narrator = CommandNarrator::new("false", events);

        let utterance = narrator.speak("Turn left.").unwrap();
        let event = timeout(Duration::from_secs(5), received.recv())
            .await
            .unwrap()
            .unwrap();
        assert_matches!(event, NarrationEvent::Failed { utterance: failed, .. } if failed == utterance);
    }

    #[tokio::test]
    async fn cancelled_utterances_stay_silent() {
        let (events, mut received) = mpsc::unbounded_channel();
        let mut narrator = CommandNarrator::new("sleep", events);

        let first = narrator.speak("30").unwrap();
        assert!(narrator.is_speaking());
        let second = narrator.speak("30").unwrap();
        assert_ne!(first, second);

        narrator.cancel();
        assert!(!narrator.is_speaking());
        assert!(timeout(Duration::from_millis(300), received.recv()).await.is_err());
    }

    #[tokio::test]
    async fn missing_programs_fail_to_speak() {
        let (events, _received) = mpsc::unbounded_channel();
        let mut narrator = CommandNarrator::new("no-such-speech-program", events);
        assert_matches!(narrator.speak("Hello"), Err(NarrationError::Engine(_)));
        assert!(!narrator.is_speaking());
        assert!(!CommandNarrator::is_available("no-such-speech-program").await);
    }

    #[tokio::test]
    async fn installed_programs_are_available() {
        assert!(CommandNarrator::is_available("true").await);
    }
}
