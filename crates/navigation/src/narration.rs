use std::fmt;

/// Identifies one call to [`Narrator::speak`], so that events of an
/// utterance that was since cancelled can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(u64);

impl UtteranceId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance #{}", self.0)
    }
}

/// Delivered by the narration engine when an utterance stops on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationEvent {
    Finished(UtteranceId),
    Failed {
        utterance: UtteranceId,
        reason: String,
    },
}

impl NarrationEvent {
    pub fn utterance(&self) -> UtteranceId {
        match self {
            Self::Finished(utterance) => *utterance,
            Self::Failed { utterance, .. } => *utterance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    #[error("no speech engine is available")]
    Unavailable,
    #[error("the speech engine failed: {0}")]
    Engine(String),
}

/// A text-to-speech engine.
///
/// `speak` returns as soon as the utterance started. Its end is reported
/// later through a [`NarrationEvent`] carrying the returned id, through
/// whatever channel the engine uses. `cancel` stops the current utterance
/// without producing an event.
pub trait Narrator {
    fn speak(&mut self, text: &str) -> Result<UtteranceId, NarrationError>;
    fn cancel(&mut self);
    fn is_speaking(&self) -> bool;
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn speak(&mut self, text: &str) -> Result<UtteranceId, NarrationError> {
        (**self).speak(text)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn is_speaking(&self) -> bool {
        (**self).is_speaking()
    }
}
