use nih_plug::prelude::{NoteEvent, SysExMessage};

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const POLY_PRESSURE: u8 = 0xa0;
pub const CONTROL_CHANGE: u8 = 0xb0;
pub const PROGRAM_CHANGE: u8 = 0xc0;
pub const CHANNEL_PRESSURE: u8 = 0xd0;
pub const PITCH_BEND: u8 = 0xe0;

const PITCH_BEND_MAX: f32 = ((1 << 14) - 1) as f32;

/**
 * A channel voice message as the translator sees it.
 * The status only holds the message kind, the channel is kept apart and is 0-based.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub status: u8,
    pub channel: u8,
    pub data1: u8,
    pub data2: u8,
    pub timing: u32,
}

impl MidiEvent {
    pub fn new(status: u8, channel: u8, data1: u8, data2: u8, timing: u32) -> Self {
        Self {
            status,
            channel,
            data1,
            data2,
            timing,
        }
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8, timing: u32) -> Self {
        Self::new(NOTE_ON, channel, note, velocity, timing)
    }

    pub fn note_off(channel: u8, note: u8, velocity: u8, timing: u32) -> Self {
        Self::new(NOTE_OFF, channel, note, velocity, timing)
    }

    pub fn control_change(channel: u8, cc: u8, value: u8, timing: u32) -> Self {
        Self::new(CONTROL_CHANGE, channel, cc, value, timing)
    }

    pub fn is_control_change(&self) -> bool {
        self.status == CONTROL_CHANGE
    }

    /**
     * Build the byte representation of a host event.
     * Events that can't be expressed as a three bytes channel voice message
     * (note expressions, modulation, sysex) give `None`.
     */
    pub fn from_note_event<S: SysExMessage>(event: &NoteEvent<S>) -> Option<Self> {
        let event = match *event {
            NoteEvent::NoteOn {
                timing,
                channel,
                note,
                velocity,
                ..
            } => Self::note_on(channel, note, to_u7(velocity), timing),
            NoteEvent::NoteOff {
                timing,
                channel,
                note,
                velocity,
                ..
            } => Self::note_off(channel, note, to_u7(velocity), timing),
            NoteEvent::PolyPressure {
                timing,
                channel,
                note,
                pressure,
                ..
            } => Self::new(POLY_PRESSURE, channel, note, to_u7(pressure), timing),
            NoteEvent::MidiCC {
                timing,
                channel,
                cc,
                value,
            } => Self::control_change(channel, cc, to_u7(value), timing),
            NoteEvent::MidiProgramChange {
                timing,
                channel,
                program,
            } => Self::new(PROGRAM_CHANGE, channel, program, 0, timing),
            NoteEvent::MidiChannelPressure {
                timing,
                channel,
                pressure,
            } => Self::new(CHANNEL_PRESSURE, channel, to_u7(pressure), 0, timing),
            NoteEvent::MidiPitchBend {
                timing,
                channel,
                value,
            } => {
                let bend = (value.clamp(0.0, 1.0) * PITCH_BEND_MAX).round() as u16;
                Self::new(
                    PITCH_BEND,
                    channel,
                    (bend & 0x7f) as u8,
                    (bend >> 7) as u8,
                    timing,
                )
            }
            _ => return None,
        };

        Some(event)
    }

    /**
     * Convert back to a host event, `None` if the status isn't a channel voice message.
     */
    pub fn to_note_event<S: SysExMessage>(&self) -> Option<NoteEvent<S>> {
        let Self {
            status,
            channel,
            data1,
            data2,
            timing,
        } = *self;

        let event = match status {
            NOTE_ON => NoteEvent::NoteOn {
                timing,
                voice_id: None,
                channel,
                note: data1,
                velocity: from_u7(data2),
            },
            NOTE_OFF => NoteEvent::NoteOff {
                timing,
                voice_id: None,
                channel,
                note: data1,
                velocity: from_u7(data2),
            },
            POLY_PRESSURE => NoteEvent::PolyPressure {
                timing,
                voice_id: None,
                channel,
                note: data1,
                pressure: from_u7(data2),
            },
            CONTROL_CHANGE => NoteEvent::MidiCC {
                timing,
                channel,
                cc: data1,
                value: from_u7(data2),
            },
            PROGRAM_CHANGE => NoteEvent::MidiProgramChange {
                timing,
                channel,
                program: data1,
            },
            CHANNEL_PRESSURE => NoteEvent::MidiChannelPressure {
                timing,
                channel,
                pressure: from_u7(data1),
            },
            PITCH_BEND => NoteEvent::MidiPitchBend {
                timing,
                channel,
                value: (((data2 as u16) << 7) | data1 as u16) as f32 / PITCH_BEND_MAX,
            },
            _ => return None,
        };

        Some(event)
    }
}

/// Normalized host value to a 7 bits MIDI value.
fn to_u7(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 127.0).round() as u8
}

fn from_u7(value: u8) -> f32 {
    value.min(127) as f32 / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cc_from_host_event() {
        let event: NoteEvent<()> = NoteEvent::MidiCC {
            timing: 12,
            channel: 3,
            cc: 64,
            value: 100.0 / 127.0,
        };
        assert_eq!(
            MidiEvent::from_note_event(&event),
            Some(MidiEvent::control_change(3, 64, 100, 12))
        );
    }

    #[test]
    fn synthesized_note_on_uses_normalized_velocity() {
        let event: Option<NoteEvent<()>> = MidiEvent::note_on(0, 60, 127, 5).to_note_event();
        assert_eq!(
            event,
            Some(NoteEvent::NoteOn {
                timing: 5,
                voice_id: None,
                channel: 0,
                note: 60,
                velocity: 1.0,
            })
        );

        let event: Option<NoteEvent<()>> = MidiEvent::note_off(0, 60, 0, 5).to_note_event();
        assert_eq!(
            event,
            Some(NoteEvent::NoteOff {
                timing: 5,
                voice_id: None,
                channel: 0,
                note: 60,
                velocity: 0.0,
            })
        );
    }

    #[test]
    fn pitch_bend_splits_into_lsb_and_msb() {
        let event: NoteEvent<()> = NoteEvent::MidiPitchBend {
            timing: 0,
            channel: 1,
            value: 1.0,
        };
        let midi = MidiEvent::from_note_event(&event).unwrap();
        assert_eq!((midi.status, midi.data1, midi.data2), (PITCH_BEND, 0x7f, 0x7f));

        let event: NoteEvent<()> = NoteEvent::MidiPitchBend {
            timing: 0,
            channel: 1,
            value: 0.0,
        };
        let midi = MidiEvent::from_note_event(&event).unwrap();
        assert_eq!((midi.data1, midi.data2), (0, 0));
    }

    #[test]
    fn non_midi_host_events_have_no_bytes() {
        let event: NoteEvent<()> = NoteEvent::PolyTuning {
            timing: 0,
            voice_id: None,
            channel: 0,
            note: 60,
            tuning: 0.5,
        };
        assert_eq!(MidiEvent::from_note_event(&event), None);
    }

    #[test]
    fn unknown_status_has_no_host_event() {
        let event: Option<NoteEvent<()>> = MidiEvent::new(0xf0, 0, 0, 0, 0).to_note_event();
        assert!(event.is_none());
    }
}
