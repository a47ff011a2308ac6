//! Cascaded low-cut → peak → high-cut filter chain for one channel.

use super::biquad::{Biquad, BiquadCoefficients};
use super::design::{make_high_cut_filter, make_low_cut_filter, make_peak_filter, CutCoefficients};
use crate::constants::MAX_CUT_SECTIONS;
use crate::params::ChainSettings;

/// Stage of the chain, in processing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainPosition {
    LowCut,
    Peak,
    HighCut,
}

impl ChainPosition {
    pub const ALL: [ChainPosition; 3] = [
        ChainPosition::LowCut,
        ChainPosition::Peak,
        ChainPosition::HighCut,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Number of section slots the stage owns.
    pub fn section_slots(self) -> usize {
        match self {
            ChainPosition::Peak => 1,
            _ => MAX_CUT_SECTIONS,
        }
    }
}

/// Up to four cascaded sections with individual bypass.
#[derive(Clone, Debug)]
pub struct CutFilter {
    sections: [Biquad; MAX_CUT_SECTIONS],
    bypassed: [bool; MAX_CUT_SECTIONS],
}

impl Default for CutFilter {
    fn default() -> Self {
        Self {
            sections: std::array::from_fn(|_| Biquad::default()),
            bypassed: [false; MAX_CUT_SECTIONS],
        }
    }
}

impl CutFilter {
    /// Load a designed cascade: the first `cut.len()` sections take the new taps
    /// and run, the remaining slots are bypassed.
    pub fn update(&mut self, cut: &CutCoefficients) {
        self.bypassed = [true; MAX_CUT_SECTIONS];
        for (index, coeffs) in cut.iter().enumerate() {
            self.sections[index].set_coefficients(*coeffs);
            self.bypassed[index] = false;
        }
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for (section, bypassed) in self.sections.iter_mut().zip(self.bypassed.iter()) {
            if !*bypassed {
                section.process(samples);
            }
        }
    }

    /// Combined magnitude of the active sections; bypassed ones count as 1.0.
    pub fn magnitude_at(&self, freq: f64, sample_rate: f64) -> f64 {
        self.sections
            .iter()
            .zip(self.bypassed.iter())
            .filter(|(_, bypassed)| !**bypassed)
            .map(|(section, _)| section.coefficients().magnitude_at(freq, sample_rate))
            .product()
    }

    pub fn active_sections(&self) -> usize {
        self.bypassed.iter().filter(|bypassed| !**bypassed).count()
    }

    fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}

/// Full EQ chain for one channel.
///
/// Coefficients change only between blocks (`&mut self` on the owning thread),
/// filter history only inside [`FilterChain::process`].
#[derive(Clone, Debug, Default)]
pub struct FilterChain {
    low_cut: CutFilter,
    peak: Biquad,
    high_cut: CutFilter,
    bypassed: [bool; 3],
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain configured from a settings snapshot.
    pub fn from_settings(settings: &ChainSettings, sample_rate: f64) -> Self {
        let mut chain = Self::default();
        chain.update_from_settings(settings, sample_rate);
        chain
    }

    /// Redesign every stage and apply the snapshot's bypass flags.
    ///
    /// Allocation-free; the snapshot must already be sanitized for `sample_rate`.
    pub fn update_from_settings(&mut self, settings: &ChainSettings, sample_rate: f64) {
        self.set_bypassed(ChainPosition::LowCut, settings.low_cut_bypassed);
        self.set_bypassed(ChainPosition::Peak, settings.peak_bypassed);
        self.set_bypassed(ChainPosition::HighCut, settings.high_cut_bypassed);

        self.peak
            .set_coefficients(make_peak_filter(settings, sample_rate));
        self.low_cut
            .update(&make_low_cut_filter(settings, sample_rate));
        self.high_cut
            .update(&make_high_cut_filter(settings, sample_rate));
    }

    /// Run every non-bypassed stage over `block` in place.
    pub fn process(&mut self, block: &mut [f32]) {
        if !self.is_bypassed(ChainPosition::LowCut) {
            self.low_cut.process(block);
        }
        if !self.is_bypassed(ChainPosition::Peak) {
            self.peak.process(block);
        }
        if !self.is_bypassed(ChainPosition::HighCut) {
            self.high_cut.process(block);
        }
    }

    pub fn set_bypassed(&mut self, position: ChainPosition, bypassed: bool) {
        self.bypassed[position.index()] = bypassed;
    }

    pub fn is_bypassed(&self, position: ChainPosition) -> bool {
        self.bypassed[position.index()]
    }

    /// Swap the whole coefficient set of one section.
    ///
    /// Returns `false` when `section` does not exist for `position`.
    pub fn replace_coefficients(
        &mut self,
        position: ChainPosition,
        section: usize,
        coeffs: BiquadCoefficients,
    ) -> bool {
        match self.section_mut(position, section) {
            Some(biquad) => {
                biquad.set_coefficients(coeffs);
                true
            }
            None => false,
        }
    }

    /// Bypass a single section inside a cut stage. The peak stage has no
    /// per-section bypass; use [`FilterChain::set_bypassed`] for it.
    pub fn set_section_bypassed(&mut self, position: ChainPosition, section: usize, bypassed: bool) {
        if let Some(cut) = self.cut_mut(position) {
            if let Some(flag) = cut.bypassed.get_mut(section) {
                *flag = bypassed;
            }
        }
    }

    pub fn is_section_bypassed(&self, position: ChainPosition, section: usize) -> bool {
        match self.cut(position) {
            Some(cut) => cut.bypassed.get(section).copied().unwrap_or(true),
            None => section != 0,
        }
    }

    /// |H| of one section at `freq`, ignoring bypass flags.
    ///
    /// A section that does not exist reads as unity.
    pub fn magnitude_at(
        &self,
        position: ChainPosition,
        section: usize,
        freq: f64,
        sample_rate: f64,
    ) -> f64 {
        self.section(position, section)
            .map(|biquad| biquad.coefficients().magnitude_at(freq, sample_rate))
            .unwrap_or(1.0)
    }

    pub fn coefficients(&self, position: ChainPosition, section: usize) -> Option<&BiquadCoefficients> {
        self.section(position, section).map(Biquad::coefficients)
    }

    pub fn cut_filter(&self, position: ChainPosition) -> Option<&CutFilter> {
        self.cut(position)
    }

    /// Clear the IIR history of every section.
    pub fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }

    fn cut(&self, position: ChainPosition) -> Option<&CutFilter> {
        match position {
            ChainPosition::LowCut => Some(&self.low_cut),
            ChainPosition::HighCut => Some(&self.high_cut),
            ChainPosition::Peak => None,
        }
    }

    fn cut_mut(&mut self, position: ChainPosition) -> Option<&mut CutFilter> {
        match position {
            ChainPosition::LowCut => Some(&mut self.low_cut),
            ChainPosition::HighCut => Some(&mut self.high_cut),
            ChainPosition::Peak => None,
        }
    }

    fn section(&self, position: ChainPosition, section: usize) -> Option<&Biquad> {
        match position {
            ChainPosition::Peak => (section == 0).then_some(&self.peak),
            _ => self.cut(position).and_then(|cut| cut.sections.get(section)),
        }
    }

    fn section_mut(&mut self, position: ChainPosition, section: usize) -> Option<&mut Biquad> {
        match position {
            ChainPosition::Peak => (section == 0).then_some(&mut self.peak),
            _ => self
                .cut_mut(position)
                .and_then(|cut| cut.sections.get_mut(section)),
        }
    }
}
