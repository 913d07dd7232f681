//! Audio bindings for the terminal front end.
//!
//! The core only issues [`NoteRequest`]s. Here they become either terminal
//! bells or, with the `audio` feature, real tones on the default output
//! device. Notes with a start offset are deferred on the tokio runtime (or
//! by rodio itself) and never touch countdown state.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use countdown_core::alert::NullOutput;
use countdown_core::storage::AudioBackend;
use countdown_core::{AudioError, AudioOutput, NoteRequest, Visibility};
use tracing::warn;

/// Pick the output for the configured backend.
pub fn output_for(backend: AudioBackend) -> Box<dyn AudioOutput> {
    match backend {
        AudioBackend::Bell => Box::new(TerminalBell),
        AudioBackend::None => Box::new(NullOutput),
        AudioBackend::Rodio => rodio_output(),
    }
}

#[cfg(feature = "audio")]
fn rodio_output() -> Box<dyn AudioOutput> {
    Box::new(tones::RodioOutput::default())
}

#[cfg(not(feature = "audio"))]
fn rodio_output() -> Box<dyn AudioOutput> {
    warn!("built without the `audio` feature, falling back to the terminal bell");
    Box::new(TerminalBell)
}

/// The terminal counts as foregrounded while stderr, where the bell rings,
/// is attached to it.
pub struct TerminalVisibility;

impl Visibility for TerminalVisibility {
    fn is_foreground(&self) -> bool {
        std::io::stderr().is_terminal()
    }
}

/// One BEL character per note, written to stderr.
pub struct TerminalBell;

impl TerminalBell {
    fn ring() -> Result<(), AudioError> {
        ring_to(&mut std::io::stderr())
    }
}

fn ring_to(out: &mut impl Write) -> Result<(), AudioError> {
    out.write_all(b"\x07")
        .and_then(|()| out.flush())
        .map_err(|e| AudioError::Playback(e.to_string()))
}

impl AudioOutput for TerminalBell {
    fn acquire(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, note: &NoteRequest) -> Result<(), AudioError> {
        if note.start_offset_secs <= 0.0 {
            return Self::ring();
        }
        let delay = Duration::from_secs_f32(note.start_offset_secs);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Err(e) = TerminalBell::ring() {
                        warn!(error = %e, "deferred bell failed");
                    }
                });
                Ok(())
            }
            Err(_) => Self::ring(),
        }
    }
}

#[cfg(feature = "audio")]
mod tones {
    use std::time::Duration;

    use countdown_core::{AudioError, AudioOutput, NoteRequest};
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    /// Lazily opens the default output device on first use and keeps it for
    /// the rest of the session.
    #[derive(Default)]
    pub struct RodioOutput {
        stream: Option<(OutputStream, OutputStreamHandle)>,
    }

    impl AudioOutput for RodioOutput {
        fn acquire(&mut self) -> Result<(), AudioError> {
            if self.stream.is_none() {
                let opened = OutputStream::try_default()
                    .map_err(|e| AudioError::Unavailable(e.to_string()))?;
                self.stream = Some(opened);
            }
            Ok(())
        }

        fn play(&mut self, note: &NoteRequest) -> Result<(), AudioError> {
            let (_, handle) = self
                .stream
                .as_ref()
                .ok_or_else(|| AudioError::Unavailable("output not acquired".into()))?;
            let sink = Sink::try_new(handle).map_err(|e| AudioError::Playback(e.to_string()))?;

            // Square notes are rendered as sines; the click only needs to be short.
            let source = SineWave::new(note.frequency_hz)
                .take_duration(Duration::from_secs_f32(note.duration_secs))
                .amplify(note.gain)
                .delay(Duration::from_secs_f32(note.start_offset_secs.max(0.0)));
            sink.append(source);
            sink.detach();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_writes_a_single_bel() {
        let mut out = Vec::new();
        ring_to(&mut out).unwrap();
        assert_eq!(out, b"\x07");
    }

    #[test]
    fn none_backend_plays_silently() {
        let mut output = output_for(AudioBackend::None);
        output.acquire().unwrap();
        let note = countdown_core::alert::TICK_NOTE;
        output.play(&note).unwrap();
    }
}
