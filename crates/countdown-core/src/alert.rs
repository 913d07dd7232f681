//! Alert dispatching.
//!
//! Turns countdown events into note requests for an [`AudioOutput`],
//! applying the mute and visibility policy. Muted or backgrounded dispatches
//! are silent no-ops, and an output that cannot be opened degrades to
//! silence: nothing here can stop the countdown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AudioError;
use crate::settings::{Settings, SoundTone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
}

/// One note for the audio collaborator to play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteRequest {
    pub frequency_hz: f32,
    /// Delay from the moment of the request.
    pub start_offset_secs: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
    /// Peak gain, decaying to silence over the note.
    pub gain: f32,
}

const ALERT_GAIN: f32 = 0.5;

/// Short low click played once per second when ticking is enabled.
pub const TICK_NOTE: NoteRequest = NoteRequest {
    frequency_hz: 100.0,
    start_offset_secs: 0.0,
    duration_secs: 0.05,
    waveform: Waveform::Square,
    gain: 0.05,
};

const fn alert_note(frequency_hz: f32, start_offset_secs: f32, duration_secs: f32) -> NoteRequest {
    NoteRequest {
        frequency_hz,
        start_offset_secs,
        duration_secs,
        waveform: Waveform::Sine,
        gain: ALERT_GAIN,
    }
}

const BEEP: [NoteRequest; 1] = [alert_note(440.0, 0.0, 0.5)];
const BELL: [NoteRequest; 1] = [alert_note(987.77, 0.0, 0.4)];
const CHIME: [NoteRequest; 2] = [alert_note(523.25, 0.0, 0.2), alert_note(783.99, 0.25, 0.3)];

/// The notes making up an expiry alert.
pub fn tone_notes(tone: SoundTone) -> &'static [NoteRequest] {
    match tone {
        SoundTone::Beep => &BEEP,
        SoundTone::Bell => &BELL,
        SoundTone::Chime => &CHIME,
    }
}

/// Where notes go.
pub trait AudioOutput {
    /// Open the output on first use, or resume it if it was suspended.
    fn acquire(&mut self) -> Result<(), AudioError>;

    /// Queue one note. Offsets are honoured by the output, not the caller.
    fn play(&mut self, note: &NoteRequest) -> Result<(), AudioError>;
}

/// Whether the viewing surface is in the foreground.
pub trait Visibility {
    fn is_foreground(&self) -> bool;
}

/// Visibility that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedVisibility(pub bool);

impl Visibility for FixedVisibility {
    fn is_foreground(&self) -> bool {
        self.0
    }
}

/// Visibility flag shared between the host and the dispatcher.
#[derive(Debug, Clone)]
pub struct SharedVisibility(Rc<Cell<bool>>);

impl SharedVisibility {
    pub fn new(foreground: bool) -> Self {
        Self(Rc::new(Cell::new(foreground)))
    }

    pub fn set(&self, foreground: bool) {
        self.0.set(foreground);
    }
}

impl Visibility for SharedVisibility {
    fn is_foreground(&self) -> bool {
        self.0.get()
    }
}

/// Output that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn acquire(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn play(&mut self, _note: &NoteRequest) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Output that records every request. Clones share the recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    notes: Rc<RefCell<Vec<NoteRequest>>>,
    acquisitions: Rc<Cell<usize>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> Vec<NoteRequest> {
        self.notes.borrow().clone()
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.get()
    }
}

impl AudioOutput for RecordingOutput {
    fn acquire(&mut self) -> Result<(), AudioError> {
        self.acquisitions.set(self.acquisitions.get() + 1);
        Ok(())
    }

    fn play(&mut self, note: &NoteRequest) -> Result<(), AudioError> {
        self.notes.borrow_mut().push(*note);
        Ok(())
    }
}

pub struct AlertDispatcher {
    output: Box<dyn AudioOutput>,
    visibility: Box<dyn Visibility>,
    expiry_fired: bool,
}

impl AlertDispatcher {
    pub fn new(output: Box<dyn AudioOutput>, visibility: Box<dyn Visibility>) -> Self {
        Self {
            output,
            visibility,
            expiry_fired: false,
        }
    }

    /// A dispatcher that never makes a sound.
    pub fn silent() -> Self {
        Self::new(Box::new(NullOutput), Box::new(FixedVisibility(false)))
    }

    /// Play the tick click if sound and ticking are both on and the surface
    /// is visible. Returns the number of notes issued.
    pub fn on_tick(&mut self, settings: &Settings) -> usize {
        if !settings.sound_enabled || !settings.ticking_sound_enabled {
            return 0;
        }
        self.dispatch(std::slice::from_ref(&TICK_NOTE))
    }

    /// Play the selected alert tone. Only the first call per dispatcher does
    /// anything; muted or hidden, that first call still counts.
    pub fn on_expiry(&mut self, settings: &Settings) -> usize {
        if self.expiry_fired {
            return 0;
        }
        self.expiry_fired = true;
        if !settings.sound_enabled {
            debug!("expiry alert muted");
            return 0;
        }
        self.dispatch(tone_notes(settings.sound_tone))
    }

    pub fn expiry_fired(&self) -> bool {
        self.expiry_fired
    }

    fn dispatch(&mut self, notes: &[NoteRequest]) -> usize {
        if !self.visibility.is_foreground() {
            return 0;
        }
        if let Err(e) = self.output.acquire() {
            warn!(error = %e, "audio output unavailable");
            return 0;
        }
        let mut issued = 0;
        for note in notes {
            match self.output.play(note) {
                Ok(()) => issued += 1,
                Err(e) => warn!(error = %e, frequency_hz = note.frequency_hz, "failed to play note"),
            }
        }
        issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(foreground: bool) -> (AlertDispatcher, RecordingOutput) {
        let output = RecordingOutput::new();
        let dispatcher = AlertDispatcher::new(
            Box::new(output.clone()),
            Box::new(FixedVisibility(foreground)),
        );
        (dispatcher, output)
    }

    fn settings(sound: bool, ticking: bool, tone: SoundTone) -> Settings {
        Settings {
            sound_enabled: sound,
            ticking_sound_enabled: ticking,
            sound_tone: tone,
            ..Settings::default()
        }
    }

    #[test]
    fn chime_is_two_staggered_notes() {
        let notes = tone_notes(SoundTone::Chime);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].frequency_hz, 523.25);
        assert_eq!(notes[1].frequency_hz, 783.99);
        assert_eq!(notes[1].start_offset_secs, 0.25);
    }

    #[test]
    fn expiry_plays_selected_tone_once() {
        let (mut d, output) = dispatcher(true);
        let s = settings(true, false, SoundTone::Bell);
        assert_eq!(d.on_expiry(&s), 1);
        assert_eq!(d.on_expiry(&s), 0);
        assert_eq!(output.notes(), tone_notes(SoundTone::Bell));
    }

    #[test]
    fn sound_disabled_is_silent() {
        for tone in SoundTone::ALL {
            for foreground in [true, false] {
                let (mut d, output) = dispatcher(foreground);
                let s = settings(false, true, tone);
                assert_eq!(d.on_tick(&s), 0);
                assert_eq!(d.on_expiry(&s), 0);
                assert!(output.notes().is_empty());
                assert_eq!(output.acquisitions(), 0);
            }
        }
    }

    #[test]
    fn tick_needs_ticking_toggle_and_foreground() {
        let (mut d, output) = dispatcher(true);
        assert_eq!(d.on_tick(&settings(true, false, SoundTone::Beep)), 0);
        assert_eq!(d.on_tick(&settings(true, true, SoundTone::Beep)), 1);
        assert_eq!(output.notes(), vec![TICK_NOTE]);

        let (mut d, output) = dispatcher(false);
        assert_eq!(d.on_tick(&settings(true, true, SoundTone::Beep)), 0);
        assert!(output.notes().is_empty());
    }

    #[test]
    fn backgrounded_expiry_is_consumed() {
        let visibility = SharedVisibility::new(false);
        let output = RecordingOutput::new();
        let mut d = AlertDispatcher::new(Box::new(output.clone()), Box::new(visibility.clone()));
        let s = settings(true, false, SoundTone::Beep);
        assert_eq!(d.on_expiry(&s), 0);
        visibility.set(true);
        assert_eq!(d.on_expiry(&s), 0);
        assert!(d.expiry_fired());
        assert!(output.notes().is_empty());
    }

    struct Unavailable;

    impl AudioOutput for Unavailable {
        fn acquire(&mut self) -> Result<(), AudioError> {
            Err(AudioError::Unavailable("no device".into()))
        }

        fn play(&mut self, _note: &NoteRequest) -> Result<(), AudioError> {
            unreachable!("play without acquire")
        }
    }

    #[test]
    fn unavailable_output_degrades_to_silence() {
        let mut d = AlertDispatcher::new(Box::new(Unavailable), Box::new(FixedVisibility(true)));
        assert_eq!(d.on_expiry(&settings(true, true, SoundTone::Chime)), 0);
        assert_eq!(d.on_tick(&settings(true, true, SoundTone::Chime)), 0);
    }
}
