// ─── Progress Aggregation ───
// Turns raw engine telemetry into the numbers and strings the panel shows.

use serde::{Deserialize, Serialize};

use crate::core::error::{PanelError, PanelResult};

/// Bytes per "megabit" as the launch engine reports it.
pub const SPEED_DIVISOR: f64 = 1_067_008.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    Verifying,
    Downloading,
}

/// One `(current, total)` telemetry pair. `current` never exceeds `total`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressSample {
    pub phase: ProgressPhase,
    pub current: u64,
    pub total: u64,
}

impl ProgressSample {
    /// The engine sometimes reports `current > total` for a moment; clamp instead of failing.
    pub fn new(phase: ProgressPhase, current: u64, total: u64) -> Self {
        Self {
            phase,
            current: current.min(total),
            total,
        }
    }

    pub fn percentage(&self) -> u8 {
        percentage(self.current, self.total)
    }
}

/// Rounded completion percentage, 0 when `total` is 0.
pub fn percentage(current: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }

    let ratio = current.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Formats a remaining-time estimate as `"{h}h {m}m {s}s"`.
pub fn format_duration(seconds: f64) -> PanelResult<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(PanelError::InvalidInput(format!(
            "duration must be a non-negative number of seconds, got {seconds}"
        )));
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total - hours * 3600) / 60;
    let secs = total - hours * 3600 - minutes * 60;

    Ok(format!("{}h {}m {}s", hours, minutes, secs))
}

pub fn format_speed(bytes_per_second: f64) -> String {
    format!("{:.2} Mb/s", bytes_per_second / SPEED_DIVISOR)
}
