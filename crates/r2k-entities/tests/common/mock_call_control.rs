use r2k_core::CallRef;
use r2k_entities::CallControlUp;
use r2k_frames::enums::release_cause::ReleaseCause;

/// Up-call recorded by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpCall {
    Setup { subscriber: String, dialed: String },
    Alerting(CallRef),
    Answer(CallRef),
    Release(CallRef, ReleaseCause),
}

/// Call control sink for testing purposes.
/// Records every up-call for later inspection and hands out increasing call references.
pub struct MockCallControl {
    next_callref: CallRef,
    /// Returned by `setup` instead of a call reference when set
    pub refuse_setup: Option<ReleaseCause>,
    calls: Vec<UpCall>,
    pub audio_samples: usize,
}

impl MockCallControl {
    pub fn new() -> Self {
        Self { next_callref: 100, refuse_setup: None, calls: vec![], audio_samples: 0 }
    }

    pub fn take_calls(&mut self) -> Vec<UpCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn releases(&self) -> Vec<(CallRef, ReleaseCause)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                UpCall::Release(callref, cause) => Some((*callref, *cause)),
                _ => None,
            })
            .collect()
    }
}

impl CallControlUp for MockCallControl {
    fn setup(&mut self, subscriber: &str, dialed: &str) -> Result<CallRef, ReleaseCause> {
        tracing::debug!("setup: {} -> {}", subscriber, dialed);
        self.calls.push(UpCall::Setup { subscriber: subscriber.to_string(), dialed: dialed.to_string() });
        if let Some(cause) = self.refuse_setup {
            return Err(cause);
        }
        self.next_callref += 1;
        Ok(self.next_callref)
    }

    fn alerting(&mut self, callref: CallRef) {
        tracing::debug!("alerting: {}", callref);
        self.calls.push(UpCall::Alerting(callref));
    }

    fn answer(&mut self, callref: CallRef) {
        tracing::debug!("answer: {}", callref);
        self.calls.push(UpCall::Answer(callref));
    }

    fn release(&mut self, callref: CallRef, cause: ReleaseCause) {
        tracing::debug!("release: {} {}", callref, cause);
        self.calls.push(UpCall::Release(callref, cause));
    }

    fn audio(&mut self, _callref: CallRef, samples: &[i16]) {
        self.audio_samples += samples.len();
    }
}
