use nih_plug::prelude::*;

use crate::translator::TranslatorConfig;

#[derive(Params)]
pub struct Cc2NoteParams {
    /// The channel to watch, from 1 to 16.
    #[id = "channel"]
    pub channel: IntParam,
    #[id = "cc"]
    pub control_number: IntParam,
    #[id = "note_min"]
    pub note_min: IntParam,
    #[id = "note_max"]
    pub note_max: IntParam,
    #[id = "velocity"]
    pub velocity: IntParam,
}

impl Default for Cc2NoteParams {
    fn default() -> Self {
        let defaults = TranslatorConfig::default();
        Self {
            channel: IntParam::new(
                "Ch",
                defaults.channel as i32,
                IntRange::Linear { min: 1, max: 16 },
            ),
            control_number: IntParam::new(
                "CC",
                defaults.control_number as i32,
                IntRange::Linear { min: 1, max: 127 },
            ),
            note_min: note_param("Note Min", defaults.note_min),
            note_max: note_param("Note Max", defaults.note_max),
            velocity: IntParam::new(
                "Velocity",
                defaults.velocity as i32,
                IntRange::Linear { min: 1, max: 127 },
            ),
        }
    }
}

fn note_param(name: &str, default: u8) -> IntParam {
    IntParam::new(name, default as i32, IntRange::Linear { min: 1, max: 127 })
        .with_value_to_string(formatters::v2s_i32_note_formatter())
        .with_string_to_value(formatters::s2v_i32_note_formatter())
}

impl Cc2NoteParams {
    /**
     * Read the current values. Each one is set independently by the host,
     * so this is called again before every event.
     */
    pub fn config(&self) -> TranslatorConfig {
        TranslatorConfig {
            channel: self.channel.value() as u8,
            control_number: self.control_number.value() as u8,
            note_min: self.note_min.value() as u8,
            note_max: self.note_max.value() as u8,
            velocity: self.velocity.value() as u8,
        }
    }
}
