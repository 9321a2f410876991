//! Physical-layer mode registry.
//!
//! A mode is an immutable bundle of modulation parameters. The registry is
//! a fixed, ordered list built fresh on every lookup — there is no
//! lazily-initialized global singleton, since the list is cheap to build
//! and the core promises no persistent state.

use crate::error::{ModemError, Result};
use crate::SAMPLE_RATE;

/// A named physical-layer profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ModemConfig {
    pub name: &'static str,
    /// Number of tones per symbol (a power of two).
    pub num_tones: usize,
    pub symbol_duration_ms: f64,
    pub tone_spacing_hz: f64,
    /// `round(SAMPLE_RATE * symbol_duration_ms / 1000)`.
    pub samples_per_symbol: usize,
    /// `log2(num_tones)`.
    pub bits_per_symbol: u32,
}

impl ModemConfig {
    fn new(
        name: &'static str,
        num_tones: usize,
        symbol_duration_ms: f64,
        tone_spacing_hz: f64,
    ) -> Result<Self> {
        if !num_tones.is_power_of_two() {
            return Err(ModemError::InvalidConfig(format!(
                "num_tones must be a power of two, got {num_tones}"
            )));
        }
        let samples_per_symbol =
            (SAMPLE_RATE as f64 * symbol_duration_ms / 1000.0).round() as usize;
        if samples_per_symbol % num_tones != 0 {
            return Err(ModemError::InvalidConfig(format!(
                "samples_per_symbol ({samples_per_symbol}) must be a multiple of num_tones ({num_tones})"
            )));
        }
        Ok(Self {
            name,
            num_tones,
            symbol_duration_ms,
            tone_spacing_hz,
            samples_per_symbol,
            bits_per_symbol: num_tones.trailing_zeros(),
        })
    }

    pub fn samples_per_chip(&self) -> usize {
        self.samples_per_symbol / self.num_tones
    }
}

/// Returns the registered modes in a fixed, stable order: `DEFAULT` first
/// (the usual hint target), then the rest in declaration order. Mode
/// auto-detection in the receive pipeline relies on this order when no
/// hint is supplied.
pub fn registered_modes() -> Vec<ModemConfig> {
    vec![
        ModemConfig::new("DEFAULT", 32, 40.0, 35.0).expect("DEFAULT mode is well-formed"),
        ModemConfig::new("ROBUST", 16, 60.0, 25.0).expect("ROBUST mode is well-formed"),
        ModemConfig::new("FAST", 32, 20.0, 50.0).expect("FAST mode is well-formed"),
    ]
}

/// Looks up a registered mode by name.
pub fn mode_by_name(name: &str) -> Result<ModemConfig> {
    registered_modes()
        .into_iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ModemError::UnknownMode(name.to_string()))
}

/// Mode trial order for the receive pipeline: the hinted mode first (if it
/// resolves to a known name), then every other registered mode in
/// registry order, skipping the hint's duplicate.
pub fn trial_order(hinted: &str) -> Vec<ModemConfig> {
    let modes = registered_modes();
    let mut ordered = Vec::with_capacity(modes.len());
    if let Some(hint) = modes.iter().find(|m| m.name.eq_ignore_ascii_case(hinted)) {
        ordered.push(hint.clone());
    }
    for m in modes {
        if !m.name.eq_ignore_ascii_case(hinted) {
            ordered.push(m);
        }
    }
    ordered
}
