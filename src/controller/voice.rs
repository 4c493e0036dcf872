//! Voice mode state machine.
//!
//! The controller only decides; the UI carries out the returned effects
//! (showing notices, starting or stopping capture, submitting text) and feeds
//! recognizer lifecycle events back in.

pub const UNSUPPORTED: &str = "❌ Voice input not supported on this system.";
pub const RECOGNITION_MISSING: &str = "❌ Voice recognition not supported.";
pub const ENABLE_FIRST: &str = "❌ Please enable voice mode first (click the Voice button).";
pub const ENABLED: &str = "🎤 Voice input enabled. Click the microphone button to speak!";
pub const DISABLED: &str = "🎤 Voice input disabled.";
pub const NOT_RECOGNIZED: &str = "❌ Could not recognize voice. Try again or use text.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceMode {
    Disabled,
    Idle,
    Listening,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// The voice on/off button.
    Toggle,
    /// The microphone button.
    Listen,
    /// The recognizer produced an utterance.
    Transcript(String),
    /// The recognizer failed; the message is only logged.
    Failed(String),
    /// The recognizer finished, with or without a result.
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEffect {
    /// Assistant-style message for the transcript.
    Notice(&'static str),
    ClearInput,
    StartCapture,
    StopCapture,
    /// Text to send through the normal chat path.
    Submit(String),
}

#[derive(Debug)]
pub struct VoiceController {
    mode: VoiceMode,
    recognition_available: bool,
}

impl VoiceController {
    pub fn new(recognition_available: bool) -> Self {
        Self { mode: VoiceMode::Disabled, recognition_available }
    }

    #[cfg(test)]
    pub fn mode(&self) -> VoiceMode {
        self.mode
    }

    pub fn enabled(&self) -> bool {
        self.mode != VoiceMode::Disabled
    }

    pub fn listening(&self) -> bool {
        self.mode == VoiceMode::Listening
    }

    /// Assistant messages are read aloud whenever voice mode is on.
    pub fn speaks_replies(&self) -> bool {
        self.enabled()
    }

    pub fn handle(&mut self, event: VoiceEvent) -> Vec<VoiceEffect> {
        use VoiceEffect::*;
        use VoiceMode::*;

        match (self.mode, event) {
            (_, VoiceEvent::Toggle) if !self.recognition_available => vec![Notice(UNSUPPORTED)],
            (Disabled, VoiceEvent::Toggle) => {
                self.mode = Idle;
                vec![Notice(ENABLED)]
            }
            (Idle, VoiceEvent::Toggle) => {
                self.mode = Disabled;
                vec![Notice(DISABLED)]
            }
            (Listening, VoiceEvent::Toggle) => {
                self.mode = Disabled;
                vec![StopCapture, Notice(DISABLED)]
            }

            (Disabled, VoiceEvent::Listen) => vec![Notice(ENABLE_FIRST)],
            (_, VoiceEvent::Listen) if !self.recognition_available => {
                vec![Notice(RECOGNITION_MISSING)]
            }
            (Idle, VoiceEvent::Listen) => {
                self.mode = Listening;
                vec![ClearInput, StartCapture]
            }
            // A second press while capturing is a stop request.
            (Listening, VoiceEvent::Listen) => vec![StopCapture],

            (Listening, VoiceEvent::Transcript(text)) => {
                let text = text.trim().to_lowercase();
                if text.is_empty() { Vec::new() } else { vec![Submit(text)] }
            }
            (Listening, VoiceEvent::Failed(reason)) => {
                log::warn!("speech recognition error: {reason}");
                self.mode = Idle;
                vec![Notice(NOT_RECOGNIZED)]
            }
            (Listening, VoiceEvent::Ended) => {
                self.mode = Idle;
                Vec::new()
            }

            // Late recognizer events after a toggle-off or a stop have nothing to act on.
            (_, VoiceEvent::Transcript(_) | VoiceEvent::Failed(_) | VoiceEvent::Ended) => Vec::new(),
        }
    }
}

/// Holds the running capture, tagged with a generation so that events from a
/// capture that was already replaced cannot touch the current one.
#[derive(Debug)]
pub struct CaptureSlot<C> {
    next: u64,
    current: Option<(u64, C)>,
}

impl<C> Default for CaptureSlot<C> {
    fn default() -> Self {
        Self { next: 0, current: None }
    }
}

impl<C> CaptureSlot<C> {
    /// Replaces any previous capture and returns the new generation.
    pub fn install(&mut self, capture: C) -> u64 {
        self.next += 1;
        self.current = Some((self.next, capture));
        self.next
    }

    pub fn current_mut(&mut self) -> Option<&mut C> {
        self.current.as_mut().map(|(_, capture)| capture)
    }

    pub fn owns(&self, generation: u64) -> bool {
        matches!(self.current, Some((id, _)) if id == generation)
    }

    /// Drops the capture only if it is still the given generation.
    pub fn release(&mut self, generation: u64) -> bool {
        if self.owns(generation) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
