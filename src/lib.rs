use nih_plug::prelude::*;
use nih_plug::{nih_log, nih_trace};
use std::sync::Arc;

mod event_queue;
mod midi_event;
mod params;
mod translator;

pub use crate::event_queue::EventQueue;
pub use crate::midi_event::MidiEvent;
pub use crate::params::Cc2NoteParams;
pub use crate::translator::{CcToNote, MidiTranslator, Transition, TranslatorConfig};

// Enough room for a dense block of events without growing on the audio thread.
const QUEUE_CAPACITY: usize = 1024;

struct Cc2Note {
    params: Arc<Cc2NoteParams>,

    translator: CcToNote,

    /// The events to send at the end of the current block.
    output: EventQueue<NoteEvent<()>>,
}

impl Default for Cc2Note {
    fn default() -> Self {
        let translator = CcToNote::default().with_observer(|transition| match transition {
            Transition::Triggered {
                channel,
                note,
                timing,
            } => nih_trace!("Note on {note} (channel {channel}) at {timing}"),
            Transition::Released {
                channel,
                note,
                next_note,
                timing,
            } => nih_trace!("Note off {note} (channel {channel}) at {timing}, next {next_note}"),
        });

        Self {
            params: Arc::new(Cc2NoteParams::default()),
            translator,
            output: EventQueue::with_capacity(QUEUE_CAPACITY),
        }
    }
}

impl Cc2Note {
    /**
     * Translate one host event and queue what has to be sent for it.
     * Untouched events are queued as they came, to keep voice ids and full precision values.
     */
    fn handle_event(&mut self, event: NoteEvent<()>) {
        let Some(midi) = MidiEvent::from_note_event(&event) else {
            self.output.push(event);
            return;
        };

        let config = self.params.config();
        match self.translator.process(midi, &config) {
            Some(out) if out == midi => self.output.push(event),
            Some(out) => {
                if let Some(note_event) = out.to_note_event() {
                    self.output.push(note_event);
                }
            }
            None => (),
        }
    }
}

impl Plugin for Cc2Note {
    const NAME: &'static str = "CC2Note";
    const VENDOR: &'static str = "Stfufane";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "albanese.stephane@gmail.com";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // This plugin doesn't have any audio IO
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[];

    // Control changes are only delivered with the full MIDI config.
    const MIDI_INPUT: MidiConfig = MidiConfig::MidiCCs;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::MidiCCs;

    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        _buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let config = self.params.config();
        nih_log!("CC2Note initialized with {config:?}");
        if config.is_range_inverted() {
            nih_log!(
                "Note Min ({}) is above Note Max ({}), every note will be {}",
                config.note_min,
                config.note_max,
                config.note_min
            );
        }

        true
    }

    // The toggle state lives as long as the plugin, only the pending output is dropped.
    fn reset(&mut self) {
        self.output.clear();
    }

    fn process(
        &mut self,
        _buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        while let Some(event) = context.next_event() {
            self.handle_event(event);
        }
        self.output.flush(|event| context.send_event(event));

        ProcessStatus::Normal
    }
}

impl ClapPlugin for Cc2Note {
    const CLAP_ID: &'static str = "com.stfufane.cc2note";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Turns a MIDI control change into alternating notes");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[ClapFeature::NoteEffect, ClapFeature::Utility];
}

impl Vst3Plugin for Cc2Note {
    const VST3_CLASS_ID: [u8; 16] = *b"CC2NoteStfufane!";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Tools, Vst3SubCategory::Fx];
}

nih_export_clap!(Cc2Note);
nih_export_vst3!(Cc2Note);

#[cfg(test)]
mod tests {
    use super::*;

    fn cc(channel: u8, cc: u8, value: u8, timing: u32) -> NoteEvent<()> {
        NoteEvent::MidiCC {
            timing,
            channel,
            cc,
            value: value as f32 / 127.0,
        }
    }

    fn sent(plugin: &mut Cc2Note) -> Vec<NoteEvent<()>> {
        let mut events = Vec::new();
        plugin.output.flush(|event| events.push(event));
        events
    }

    #[test]
    fn watched_cc_becomes_notes() {
        let mut plugin = Cc2Note::default();
        plugin.handle_event(cc(0, 64, 100, 10));
        plugin.handle_event(cc(0, 64, 0, 20));

        assert_eq!(
            sent(&mut plugin),
            vec![
                NoteEvent::NoteOn {
                    timing: 10,
                    voice_id: None,
                    channel: 0,
                    note: 60,
                    velocity: 1.0,
                },
                NoteEvent::NoteOff {
                    timing: 20,
                    voice_id: None,
                    channel: 0,
                    note: 60,
                    velocity: 0.0,
                },
            ]
        );
    }

    #[test]
    fn other_events_are_forwarded_as_is() {
        let mut plugin = Cc2Note::default();
        let note = NoteEvent::NoteOn {
            timing: 4,
            voice_id: Some(7),
            channel: 0,
            note: 40,
            velocity: 0.71,
        };
        let expression = NoteEvent::PolyBrightness {
            timing: 5,
            voice_id: None,
            channel: 0,
            note: 40,
            brightness: 0.3,
        };
        plugin.handle_event(note);
        plugin.handle_event(cc(2, 64, 100, 6));
        plugin.handle_event(expression);

        assert_eq!(sent(&mut plugin), vec![note, cc(2, 64, 100, 6), expression]);
    }

    #[test]
    fn debounced_events_are_dropped() {
        let mut plugin = Cc2Note::default();
        plugin.handle_event(cc(0, 64, 0, 0));
        plugin.handle_event(cc(0, 64, 100, 1));
        plugin.handle_event(cc(0, 64, 120, 2));

        let events = sent(&mut plugin);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], NoteEvent::NoteOn { note: 60, .. }));
    }
}
