use std::io::{self, Write};

use serde::{Deserialize, Serialize};

pub const TONE_FREQUENCY_HZ: f32 = 800.0;
pub const TONE_DURATION_MS: u64 = 200;

/// A short cue marking countdown steps and word changes.
///
/// Implementations must return immediately and never fail: a missing
/// audio device just means no sound.
pub trait ToneSignal {
    fn emit(&self);
}

impl<T: ToneSignal + ?Sized> ToneSignal for Box<T> {
    fn emit(&self) {
        (**self).emit()
    }
}

/// Which tone implementation to use
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToneBackend {
    /// speaker when built with the `speaker` feature, bell otherwise
    #[default]
    Auto,
    /// 800 Hz sine through the default audio output
    Speaker,
    /// terminal bell
    Bell,
    /// no sound
    Off,
}

impl ToneBackend {
    pub fn build(self) -> Box<dyn ToneSignal> {
        match self {
            ToneBackend::Auto | ToneBackend::Speaker => speaker_or_bell(),
            ToneBackend::Bell => Box::new(BellTone),
            ToneBackend::Off => Box::new(SilentTone),
        }
    }
}

#[cfg(feature = "speaker")]
fn speaker_or_bell() -> Box<dyn ToneSignal> {
    Box::new(SpeakerTone)
}

#[cfg(not(feature = "speaker"))]
fn speaker_or_bell() -> Box<dyn ToneSignal> {
    tracing::debug!("built without speaker support, using terminal bell");
    Box::new(BellTone)
}

/// Rings the terminal bell.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellTone;

impl ToneSignal for BellTone {
    fn emit(&self) {
        let mut out = io::stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            tracing::debug!(%err, "terminal bell unavailable");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentTone;

impl ToneSignal for SilentTone {
    fn emit(&self) {}
}

/// Plays a decaying sine beep on a detached thread.
#[cfg(feature = "speaker")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakerTone;

#[cfg(feature = "speaker")]
impl ToneSignal for SpeakerTone {
    fn emit(&self) {
        use rodio::{source::SineWave, OutputStream, Sink, Source};
        use std::time::Duration;

        std::thread::spawn(|| {
            let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
                tracing::debug!("no audio output device");
                return;
            };
            let Ok(sink) = Sink::try_new(&stream_handle) else {
                tracing::debug!("failed to open audio sink");
                return;
            };

            let mut beep = SineWave::new(TONE_FREQUENCY_HZ)
                .take_duration(Duration::from_millis(TONE_DURATION_MS));
            beep.set_filter_fadeout();

            sink.append(beep.amplify(0.3));
            sink.sleep_until_end();
        });
    }
}
