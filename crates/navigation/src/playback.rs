use model::{
    route::{Route, RouteStep},
    WithId,
};

use crate::{
    narration::{NarrationEvent, Narrator, UtteranceId},
    CapabilityUnavailable,
};

/// "Step 2 of 5" for the step at `index`.
pub fn step_label(index: usize, count: usize) -> String {
    if count == 0 {
        return "This route has no steps.".to_owned();
    }
    format!("Step {} of {}", index + 1, count)
}

/// Walks through the steps of one resolved route, optionally reading the
/// current step aloud.
///
/// At most one utterance is active at a time: changing the step or starting
/// a new narration always cancels the previous one first. Dropping the
/// controller cancels whatever is still being spoken.
pub struct PlaybackController<N: Narrator> {
    route: WithId<Route>,
    current_index: usize,
    narrator: Option<N>,
    active_utterance: Option<UtteranceId>,
}

impl<N: Narrator> PlaybackController<N> {
    /// Starts at the first step with narration off. Pass `None` as narrator
    /// on devices without speech output.
    pub fn new(route: WithId<Route>, narrator: Option<N>) -> Self {
        if route.content.steps.is_empty() {
            log::warn!("Route {} has no steps to play", route.id);
        }
        Self {
            route,
            current_index: 0,
            narrator,
            active_utterance: None,
        }
    }

    pub fn route(&self) -> &WithId<Route> {
        &self.route
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_step(&self) -> Option<&RouteStep> {
        self.route.content.steps.get(self.current_index)
    }

    pub fn step_count(&self) -> usize {
        self.route.content.steps.len()
    }

    pub fn step_label(&self) -> String {
        step_label(self.current_index, self.step_count())
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.step_count()
    }

    pub fn is_narrating(&self) -> bool {
        self.active_utterance.is_some()
    }

    pub fn narration_supported(&self) -> bool {
        self.narrator.is_some()
    }

    /// Moves to `index`, cancelling narration first. Returns `false` and
    /// leaves the state untouched if `index` is out of range.
    pub fn go_to_step(&mut self, index: usize) -> bool {
        if index >= self.step_count() {
            return false;
        }
        self.stop_narration();
        self.current_index = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to_step(self.current_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index.checked_sub(1) {
            Some(index) => self.go_to_step(index),
            None => false,
        }
    }

    /// Switches narration of the current step on or off and returns whether
    /// it is on afterwards.
    ///
    /// Fails when there is no narrator. A narrator that fails to start an
    /// utterance is dropped, so the caller reports the missing capability
    /// once and hides the control.
    pub fn toggle_narration(&mut self) -> Result<bool, CapabilityUnavailable> {
        if self.active_utterance.is_some() {
            self.stop_narration();
            return Ok(false);
        }

        let narrator = self
            .narrator
            .as_mut()
            .ok_or(CapabilityUnavailable::Narration)?;
        let Some(text) = self
            .route
            .content
            .steps
            .get(self.current_index)
            .map(|step| step.text.clone())
        else {
            return Ok(false);
        };

        narrator.cancel();
        match narrator.speak(&text) {
            Ok(utterance) => {
                log::debug!("Narrating step {} as {}", self.current_index + 1, utterance);
                self.active_utterance = Some(utterance);
                Ok(true)
            }
            Err(error) => {
                log::warn!("Disabling narration: {}", error);
                self.narrator = None;
                Err(CapabilityUnavailable::Narration)
            }
        }
    }

    /// Observes the end of an utterance. Events for utterances other than
    /// the active one are stale and ignored.
    pub fn on_narration_event(&mut self, event: &NarrationEvent) {
        if self.active_utterance != Some(event.utterance()) {
            log::trace!("Ignoring event for {}", event.utterance());
            return;
        }
        if let NarrationEvent::Failed { reason, .. } = event {
            log::warn!("Narration of step {} failed: {}", self.current_index + 1, reason);
        }
        self.active_utterance = None;
    }

    fn stop_narration(&mut self) {
        if let Some(narrator) = self.narrator.as_mut() {
            if self.active_utterance.is_some() || narrator.is_speaking() {
                narrator.cancel();
            }
        }
        self.active_utterance = None;
    }
}

impl<N: Narrator> Drop for PlaybackController<N> {
    fn drop(&mut self) {
        self.stop_narration();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use utility::id::Id;

    use super::*;
    use crate::narration::NarrationError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Speak(String),
        Cancel,
    }

    #[derive(Default)]
    struct RecordingNarrator {
        calls: Rc<RefCell<Vec<Call>>>,
        speaking: Option<UtteranceId>,
        next: u64,
        broken: bool,
    }

    impl Narrator for RecordingNarrator {
        fn speak(&mut self, text: &str) -> Result<UtteranceId, NarrationError> {
            if self.broken {
                return Err(NarrationError::Engine("no voices".to_owned()));
            }
            self.calls.borrow_mut().push(Call::Speak(text.to_owned()));
            self.next += 1;
            let utterance = UtteranceId::new(self.next);
            self.speaking = Some(utterance);
            Ok(utterance)
        }

        fn cancel(&mut self) {
            self.calls.borrow_mut().push(Call::Cancel);
            self.speaking = None;
        }

        fn is_speaking(&self) -> bool {
            self.speaking.is_some()
        }
    }

    fn route(steps: &[&str]) -> WithId<Route> {
        WithId::new(
            Id::new(1),
            Route {
                start_location: "A".to_owned(),
                end_location: "B".to_owned(),
                steps: steps.iter().map(|text| RouteStep::text(*text)).collect(),
            },
        )
    }

    fn controller(
        steps: &[&str],
    ) -> (
        PlaybackController<RecordingNarrator>,
        Rc<RefCell<Vec<Call>>>,
    ) {
        let narrator = RecordingNarrator::default();
        let calls = narrator.calls.clone();
        (PlaybackController::new(route(steps), Some(narrator)), calls)
    }

    #[test]
    fn starts_at_first_step_without_narration() {
        let (playback, _) = controller(&["a", "b"]);
        assert_eq!(playback.current_index(), 0);
        assert!(!playback.is_narrating());
        assert_eq!(playback.step_label(), "Step 1 of 2");
        assert!(!playback.can_go_previous());
        assert!(playback.can_go_next());
    }

    #[test]
    fn routes_without_steps_have_nothing_to_narrate() {
        let (mut playback, calls) = controller(&[]);
        assert_eq!(playback.step_label(), "This route has no steps.");
        assert!(playback.current_step().is_none());
        assert!(!playback.can_go_next());
        assert_eq!(playback.toggle_narration(), Ok(false));
        assert!(!playback.is_narrating());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn out_of_range_steps_are_rejected() {
        let (mut playback, _) = controller(&["a", "b", "c"]);
        assert!(!playback.go_to_step(3));
        assert!(!playback.previous());
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn next_stops_at_the_last_step() {
        let (mut playback, _) = controller(&["a", "b", "c"]);
        assert!(playback.next());
        assert!(playback.next());
        assert_eq!(playback.current_index(), 2);
        assert!(!playback.can_go_next());
        assert!(!playback.next());
        assert_eq!(playback.current_index(), 2);
        assert_eq!(playback.current_step().unwrap().text, "c");
    }

    #[test]
    fn toggling_twice_turns_narration_off() {
        let (mut playback, calls) = controller(&["turn left"]);
        assert_eq!(playback.toggle_narration(), Ok(true));
        assert!(playback.is_narrating());
        assert_eq!(playback.toggle_narration(), Ok(false));
        assert!(!playback.is_narrating());
        assert_eq!(
            *calls.borrow(),
            vec![Call::Cancel, Call::Speak("turn left".to_owned()), Call::Cancel]
        );
    }

    #[test]
    fn changing_step_cancels_narration() {
        let (mut playback, calls) = controller(&["a", "b"]);
        playback.toggle_narration().unwrap();
        assert!(playback.next());
        assert!(!playback.is_narrating());
        assert_eq!(calls.borrow().last(), Some(&Call::Cancel));
    }

    #[test]
    fn completion_ends_narration_and_stale_events_are_ignored() {
        let (mut playback, _) = controller(&["a", "b"]);
        playback.toggle_narration().unwrap();
        playback.toggle_narration().unwrap();
        playback.toggle_narration().unwrap();
        assert!(playback.is_narrating());

        playback.on_narration_event(&NarrationEvent::Finished(UtteranceId::new(1)));
        assert!(playback.is_narrating());

        playback.on_narration_event(&NarrationEvent::Failed {
            utterance: UtteranceId::new(2),
            reason: "interrupted".to_owned(),
        });
        assert!(!playback.is_narrating());
    }

    #[test]
    fn missing_narrator_is_reported() {
        let mut playback: PlaybackController<RecordingNarrator> =
            PlaybackController::new(route(&["a"]), None);
        assert!(!playback.narration_supported());
        assert_eq!(
            playback.toggle_narration(),
            Err(CapabilityUnavailable::Narration)
        );
        assert!(!playback.next());
    }

    #[test]
    fn failing_narrator_is_disabled() {
        let narrator = RecordingNarrator {
            broken: true,
            ..Default::default()
        };
        let mut playback = PlaybackController::new(route(&["a"]), Some(narrator));
        assert_eq!(
            playback.toggle_narration(),
            Err(CapabilityUnavailable::Narration)
        );
        assert!(!playback.narration_supported());
        assert!(!playback.is_narrating());
    }

    #[test]
    fn dropping_cancels_active_narration() {
        let (mut playback, calls) = controller(&["a"]);
        playback.toggle_narration().unwrap();
        drop(playback);
        assert_eq!(calls.borrow().last(), Some(&Call::Cancel));
    }
}
