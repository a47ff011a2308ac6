//! Lock-free parameter store shared by the host, audio and UI contexts.
//!
//! Each parameter is an independent `AtomicU32` holding `f32` bits, so a
//! snapshot never takes a lock. A snapshot taken while a writer is mid-update
//! may mix old and new fields; the writer raises the change flags after its
//! stores, so the next block/tick always observes the final values.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use super::layout::ParameterId;
use super::settings::{ChainSettings, Slope};
use crate::constants::DEFAULT_SAMPLE_RATE;

/// Edge-triggered "something changed" marker.
///
/// Raised by any number of writers, consumed by exactly one reader with
/// [`ChangeFlag::take`], so several changes inside one refresh period collapse
/// into a single refresh.
#[derive(Debug)]
pub struct ChangeFlag(AtomicBool);

impl ChangeFlag {
    pub fn new(raised: bool) -> Self {
        Self(AtomicBool::new(raised))
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Test-and-clear. Returns `true` exactly once per batch of raises.
    pub fn take(&self) -> bool {
        self.0
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Current value of every host parameter plus one change flag per consumer.
///
/// Also carries the sample rate the audio side is running at, so the UI maps
/// bins and designs its overlay chain for the same rate.
#[derive(Debug)]
pub struct SharedParameters {
    values: [AtomicU32; ParameterId::COUNT],
    sample_rate: AtomicU64,
    audio_changed: ChangeFlag,
    ui_changed: ChangeFlag,
}

impl Default for SharedParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedParameters {
    /// Create a store holding the layout defaults.
    ///
    /// Both change flags start raised so the first block and the first UI tick
    /// build their filters.
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|index| {
                AtomicU32::new(ParameterId::ALL[index].default_value().to_bits())
            }),
            sample_rate: AtomicU64::new(DEFAULT_SAMPLE_RATE.to_bits()),
            audio_changed: ChangeFlag::new(true),
            ui_changed: ChangeFlag::new(true),
        }
    }

    /// Plain value of a single parameter.
    pub fn get(&self, id: ParameterId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Acquire))
    }

    /// Host notification entry point: store one parameter and flag the change.
    ///
    /// The value is snapped and clamped to the parameter's range; non-finite
    /// values are ignored. Safe to call from any thread.
    pub fn set_parameter(&self, id: ParameterId, value: f32) {
        if self.store(id, value) {
            self.notify_changed();
        }
    }

    /// Same as [`SharedParameters::set_parameter`] with a normalised `0..=1` value.
    pub fn set_normalised(&self, id: ParameterId, proportion: f32) {
        self.set_parameter(id, id.range().convert_from_0_to_1(proportion));
    }

    /// Push a whole settings snapshot into the store.
    pub fn set_snapshot(&self, settings: &ChainSettings) {
        self.store(ParameterId::LowCutFreq, settings.low_cut_freq);
        self.store(ParameterId::HighCutFreq, settings.high_cut_freq);
        self.store(ParameterId::PeakFreq, settings.peak_freq);
        self.store(ParameterId::PeakGain, settings.peak_gain_db);
        self.store(ParameterId::PeakQuality, settings.peak_quality);
        self.store(ParameterId::LowCutSlope, settings.low_cut_slope.index() as f32);
        self.store(ParameterId::HighCutSlope, settings.high_cut_slope.index() as f32);
        self.store(ParameterId::LowCutBypassed, flag_value(settings.low_cut_bypassed));
        self.store(ParameterId::PeakBypassed, flag_value(settings.peak_bypassed));
        self.store(ParameterId::HighCutBypassed, flag_value(settings.high_cut_bypassed));
        self.notify_changed();
    }

    /// Read every EQ parameter into an immutable snapshot.
    pub fn snapshot(&self) -> ChainSettings {
        ChainSettings {
            low_cut_freq: self.get(ParameterId::LowCutFreq),
            high_cut_freq: self.get(ParameterId::HighCutFreq),
            peak_freq: self.get(ParameterId::PeakFreq),
            peak_gain_db: self.get(ParameterId::PeakGain),
            peak_quality: self.get(ParameterId::PeakQuality),
            low_cut_slope: Slope::from_choice_value(self.get(ParameterId::LowCutSlope)),
            high_cut_slope: Slope::from_choice_value(self.get(ParameterId::HighCutSlope)),
            low_cut_bypassed: self.get(ParameterId::LowCutBypassed) > 0.5,
            peak_bypassed: self.get(ParameterId::PeakBypassed) > 0.5,
            high_cut_bypassed: self.get(ParameterId::HighCutBypassed) > 0.5,
        }
    }

    pub fn analyzer_enabled(&self) -> bool {
        self.get(ParameterId::AnalyzerEnabled) > 0.5
    }

    pub fn set_analyzer_enabled(&self, enabled: bool) {
        self.store(ParameterId::AnalyzerEnabled, flag_value(enabled));
    }

    /// Rate the audio side last processed at.
    pub fn sample_rate(&self) -> f64 {
        f64::from_bits(self.sample_rate.load(Ordering::Acquire))
    }

    /// Publish the audio-side sample rate. Raises the UI flag when it changed.
    ///
    /// Called from the audio thread; non-finite or non-positive rates are
    /// ignored.
    pub fn publish_sample_rate(&self, sample_rate: f64) {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return;
        }
        let previous = self.sample_rate.swap(sample_rate.to_bits(), Ordering::AcqRel);
        if f64::from_bits(previous) != sample_rate {
            self.ui_changed.raise();
        }
    }

    /// Consume the audio-side change flag.
    pub fn take_audio_change(&self) -> bool {
        self.audio_changed.take()
    }

    /// Consume the UI-side change flag.
    pub fn take_ui_change(&self) -> bool {
        self.ui_changed.take()
    }

    /// Raise both change flags without touching any value.
    pub fn notify_changed(&self) {
        self.audio_changed.raise();
        self.ui_changed.raise();
    }

    pub(crate) fn store(&self, id: ParameterId, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let value = id.range().snap_to_legal_value(value);
        self.values[id.index()].store(value.to_bits(), Ordering::Release);
        true
    }
}

fn flag_value(flag: bool) -> f32 {
    if flag {
        1.0
    } else {
        0.0
    }
}
