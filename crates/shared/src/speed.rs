use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const SLIDER_MAX: u32 = 4600;
const SLIDER_UNIT: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub compare: Duration,
    pub animation: Duration,
    pub settle_gap: Duration,
    pub sweep_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            compare: Duration::from_millis(400),
            animation: Duration::from_millis(1600),
            settle_gap: Duration::from_millis(200),
            sweep_interval: Duration::from_millis(80),
        }
    }
}

impl Timing {
    pub fn instant() -> Self {
        Self {
            compare: Duration::ZERO,
            animation: Duration::ZERO,
            settle_gap: Duration::ZERO,
            sweep_interval: Duration::ZERO,
        }
    }

    pub fn from_slider(slider: u32) -> Self {
        let slider = slider.min(SLIDER_MAX);
        // 1200 ms minus 180 ms per slider unit of 800, i.e. 225 µs per step.
        let compare_us = 1_200_000 - 225 * u64::from(slider);
        Self {
            compare: Duration::from_micros(compare_us),
            animation: Duration::from_millis(u64::from(SLIDER_MAX - slider)),
            ..Self::default()
        }
    }
}

pub fn speed_label(slider: u32) -> String {
    let slider = slider.min(SLIDER_MAX);
    let multiplier = f64::from(slider) / SLIDER_UNIT;
    format!("{multiplier}x ({} ms)", SLIDER_MAX - slider)
}

#[cfg(test)]
#[path = "tests/speed_tests.rs"]
mod tests;
