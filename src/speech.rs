//! Speech input and output through external programs.
//!
//! The recognizer is run once per capture and must print a single US-English
//! utterance on stdout (no interim output). The synthesizer gets the text as
//! its last argument and is killed when a newer utterance arrives.

use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};

use tokio::sync::oneshot;

use crate::controller::voice::VoiceEvent;
use crate::utils::RUNTIME;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves `program` the way a shell would, without running it.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|p| p.is_file())
}

fn resolve(argv: Option<&[String]>) -> Option<Vec<String>> {
    let argv = argv?;
    let program = argv.first()?;
    match find_program(program) {
        Some(_) => Some(argv.to_vec()),
        None => {
            log::info!("speech program {program} not found on PATH");
            None
        }
    }
}

pub struct Synthesizer {
    argv: Vec<String>,
    current: Option<Child>,
}

impl Synthesizer {
    /// `None` when no synthesizer is configured or it cannot be found.
    pub fn from_config(argv: Option<&[String]>) -> Option<Self> {
        resolve(argv).map(|argv| Self { argv, current: None })
    }

    pub fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.cancel();
        let child = std::process::Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn { program: self.argv[0].clone(), source })?;
        self.current = Some(child);
        Ok(())
    }

    pub fn cancel(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }

    #[cfg(test)]
    fn speaking(&mut self) -> bool {
        matches!(self.current.as_mut().map(|c| c.try_wait()), Some(Ok(None)))
    }
}

impl Drop for Synthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct Recognizer {
    argv: Vec<String>,
}

/// A running capture. Dropping it without `stop` lets the capture finish;
/// its events still arrive and the owner decides whether to act on them.
pub struct Capture {
    stop: Option<oneshot::Sender<()>>,
}

impl Capture {
    /// Kills the recognizer; `VoiceEvent::Ended` still follows.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }
}

impl Recognizer {
    /// `None` when no recognizer is configured or it cannot be found.
    pub fn from_config(argv: Option<&[String]>) -> Option<Self> {
        resolve(argv).map(|argv| Self { argv })
    }

    /// Starts one capture. `on_event` gets at most one of `Transcript` or
    /// `Failed`, then always `Ended`.
    pub fn start<F>(&self, on_event: F) -> Result<Capture, SpeechError>
    where
        F: Fn(VoiceEvent) + Send + 'static,
    {
        let _guard = RUNTIME.enter();
        let child = tokio::process::Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn { program: self.argv[0].clone(), source })?;

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        RUNTIME.spawn(async move {
            tokio::select! {
                output = child.wait_with_output() => match output {
                    Ok(out) if out.status.success() => {
                        let text = String::from_utf8_lossy(&out.stdout).trim().to_string();
                        if !text.is_empty() {
                            on_event(VoiceEvent::Transcript(text));
                        }
                    }
                    Ok(out) => {
                        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                        let reason = if stderr.is_empty() { out.status.to_string() } else { stderr };
                        on_event(VoiceEvent::Failed(reason));
                    }
                    Err(e) => on_event(VoiceEvent::Failed(e.to_string())),
                },
                // Dropping the wait future drops the child, which kills it.
                Ok(()) = stop_rx => log::debug!("speech capture stopped"),
            }
            on_event(VoiceEvent::Ended);
        });

        Ok(Capture { stop: Some(stop_tx) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn events_of(recognizer: &Recognizer, stop: bool) -> Vec<VoiceEvent> {
        let (tx, rx) = mpsc::channel();
        let mut capture = recognizer
            .start(move |e| {
                let _ = tx.send(e);
            })
            .unwrap();
        if stop {
            capture.stop();
        }
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(10)) {
            let done = event == VoiceEvent::Ended;
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn missing_program_is_unavailable() {
        let missing = argv(&["surely-not-installed-speech-tool"]);
        assert!(Recognizer::from_config(Some(missing.as_slice())).is_none());
        assert!(Synthesizer::from_config(Some(missing.as_slice())).is_none());
        assert!(Recognizer::from_config(None).is_none());
        assert!(Synthesizer::from_config(Some(&[][..])).is_none());
    }

    #[test]
    fn recognizer_reports_stdout_then_ends() {
        let recognizer = Recognizer::from_config(Some(argv(&["echo", "Open Notepad"]).as_slice())).unwrap();
        assert_eq!(
            events_of(&recognizer, false),
            vec![VoiceEvent::Transcript("Open Notepad".into()), VoiceEvent::Ended]
        );
    }

    #[test]
    fn recognizer_failure_is_reported() {
        let recognizer = Recognizer::from_config(Some(argv(&["false"]).as_slice())).unwrap();
        let events = events_of(&recognizer, false);
        assert!(matches!(events.first(), Some(VoiceEvent::Failed(_))), "{events:?}");
        assert_eq!(events.last(), Some(&VoiceEvent::Ended));
    }

    #[test]
    fn stopping_ends_without_transcript() {
        let recognizer = Recognizer::from_config(Some(argv(&["sleep", "30"]).as_slice())).unwrap();
        assert_eq!(events_of(&recognizer, true), vec![VoiceEvent::Ended]);
    }

    #[test]
    fn new_utterance_cancels_the_previous_one() {
        let mut synth = Synthesizer::from_config(Some(argv(&["sleep"]).as_slice())).unwrap();
        synth.speak("30").unwrap();
        assert!(synth.speaking());
        let first = synth.current.as_ref().map(|c| c.id());
        synth.speak("30").unwrap();
        assert_ne!(synth.current.as_ref().map(|c| c.id()), first);
        synth.cancel();
        assert!(!synth.speaking());
    }
}
