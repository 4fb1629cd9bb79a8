use nih_plug::nih_trace;

use crate::midi_event::MidiEvent;

/**
 * The values the translator reads before each decision.
 * The channel is 1-based, as displayed to the user.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub channel: u8,
    pub control_number: u8,
    pub note_min: u8,
    pub note_max: u8,
    pub velocity: u8,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            channel: 1,
            control_number: 64,
            note_min: 60,
            note_max: 72,
            velocity: 127,
        }
    }
}

impl TranslatorConfig {
    /// The range is still usable when inverted, every trigger falls back to `note_min`.
    pub fn is_range_inverted(&self) -> bool {
        self.note_min > self.note_max
    }

    fn watches(&self, event: &MidiEvent) -> bool {
        event.channel as u16 + 1 == self.channel as u16
            && event.is_control_change()
            && event.data1 == self.control_number
    }
}

/// A state change of the toggle, reported to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The controller left zero and a note started.
    Triggered { channel: u8, note: u8, timing: u32 },
    /// The controller went back to zero, `note` stopped and `next_note` will be used next.
    Released {
        channel: u8,
        note: u8,
        next_note: u8,
        timing: u32,
    },
}

pub type TransitionObserver = Box<dyn FnMut(&Transition) + Send>;

/**
 * Something that turns one incoming event into zero or one outgoing event.
 */
pub trait MidiTranslator {
    fn process(&mut self, event: MidiEvent, config: &TranslatorConfig) -> Option<MidiEvent>;
}

/**
 * Monophonic toggle: a watched controller leaving zero starts a note,
 * going back to zero stops it and moves to the next note of the range.
 */
pub struct CcToNote {
    /// The note used by the next note on.
    current_note: u8,
    note_is_off: bool,
    observer: Option<TransitionObserver>,
}

impl Default for CcToNote {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl CcToNote {
    pub fn starting_at(note: u8) -> Self {
        Self {
            current_note: note,
            note_is_off: true,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl FnMut(&Transition) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn current_note(&self) -> u8 {
        self.current_note
    }

    pub fn is_sounding(&self) -> bool {
        !self.note_is_off
    }

    fn notify(&mut self, transition: Transition) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&transition);
        }
    }
}

impl MidiTranslator for CcToNote {
    fn process(&mut self, event: MidiEvent, config: &TranslatorConfig) -> Option<MidiEvent> {
        if !config.watches(&event) {
            return Some(event);
        }

        match (self.note_is_off, event.data2) {
            (true, value) if value > 0 => {
                if self.current_note < config.note_min || self.current_note > config.note_max {
                    self.current_note = config.note_min;
                }
                self.note_is_off = false;
                self.notify(Transition::Triggered {
                    channel: event.channel,
                    note: self.current_note,
                    timing: event.timing,
                });

                Some(MidiEvent::note_on(
                    event.channel,
                    self.current_note,
                    config.velocity,
                    event.timing,
                ))
            }
            (false, 0) => {
                let note = self.current_note;
                // No bound check here, the next trigger wraps the note back into the range.
                self.current_note = note.saturating_add(1);
                self.note_is_off = true;
                self.notify(Transition::Released {
                    channel: event.channel,
                    note,
                    next_note: self.current_note,
                    timing: event.timing,
                });

                Some(MidiEvent::note_off(event.channel, note, 0, event.timing))
            }
            _ => {
                nih_trace!(
                    "Debounced CC {} value {} (sounding: {})",
                    event.data1,
                    event.data2,
                    !self.note_is_off
                );
                None
            }
        }
    }
}
