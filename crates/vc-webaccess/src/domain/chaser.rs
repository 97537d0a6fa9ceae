//! Step sequences driving cue list widgets.

use serde::{Deserialize, Serialize};

/// Speed value meaning "no time limit".
pub const INFINITE_SPEED: u32 = u32::MAX - 1;

const MS_PER_SECOND: u32 = 1000;
const MS_PER_MINUTE: u32 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u32 = 60 * MS_PER_MINUTE;

/// Host function identifier referenced by a chaser step.
pub type FunctionId = u32;

/// How a chaser resolves one timing column for its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedMode {
    /// Every step uses the chaser's own value
    Common,
    /// Every step carries its own value
    PerStep,
    /// The function's defaults apply; nothing to show
    #[default]
    Default,
}

/// One step of a chaser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChaserStep {
    pub function: FunctionId,
    pub fade_in: u32,
    pub fade_out: u32,
    pub duration: u32,
    pub note: String,
}

impl ChaserStep {
    pub fn new(function: FunctionId) -> Self {
        Self {
            function,
            ..Default::default()
        }
    }

    pub fn with_timings(mut self, fade_in: u32, fade_out: u32, duration: u32) -> Self {
        self.fade_in = fade_in;
        self.fade_out = fade_out;
        self.duration = duration;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Chaser snapshot attached to a cue list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chaser {
    pub steps: Vec<ChaserStep>,
    pub fade_in_mode: SpeedMode,
    pub fade_out_mode: SpeedMode,
    pub duration_mode: SpeedMode,
    pub fade_in: u32,
    pub fade_out: u32,
    pub duration: u32,
}

/// Timing column of the cue table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedColumn {
    FadeIn,
    FadeOut,
    Duration,
}

impl Chaser {
    pub fn new(steps: Vec<ChaserStep>) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    pub fn mode(&self, column: SpeedColumn) -> SpeedMode {
        match column {
            SpeedColumn::FadeIn => self.fade_in_mode,
            SpeedColumn::FadeOut => self.fade_out_mode,
            SpeedColumn::Duration => self.duration_mode,
        }
    }

    /// Value to display for `step` in `column`, `None` when the mode is `Default`.
    pub fn speed_for(&self, step: &ChaserStep, column: SpeedColumn) -> Option<u32> {
        match (self.mode(column), column) {
            (SpeedMode::Default, _) => None,
            (SpeedMode::Common, SpeedColumn::FadeIn) => Some(self.fade_in),
            (SpeedMode::Common, SpeedColumn::FadeOut) => Some(self.fade_out),
            (SpeedMode::Common, SpeedColumn::Duration) => Some(self.duration),
            (SpeedMode::PerStep, SpeedColumn::FadeIn) => Some(step.fade_in),
            (SpeedMode::PerStep, SpeedColumn::FadeOut) => Some(step.fade_out),
            (SpeedMode::PerStep, SpeedColumn::Duration) => Some(step.duration),
        }
    }
}

/// Human readable duration: `1h02m03s.45`, `500ms`, `0ms`.
///
/// Callers render [`INFINITE_SPEED`] themselves; here it formats as a plain number.
pub fn speed_to_string(ms: u32) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    let mut out = String::new();
    if hours != 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes != 0 {
        if out.is_empty() {
            out.push_str(&format!("{}m", minutes));
        } else {
            out.push_str(&format!("{:02}m", minutes));
        }
    }
    if seconds != 0 {
        if out.is_empty() {
            out.push_str(&format!("{}s", seconds));
        } else {
            out.push_str(&format!("{:02}s", seconds));
        }
    }
    if millis != 0 || out.is_empty() {
        if out.is_empty() {
            out.push_str(&format!("{}ms", millis));
        } else {
            out.push_str(&format!(".{:02}", millis / 10));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_to_string() {
        assert_eq!(speed_to_string(0), "0ms");
        assert_eq!(speed_to_string(500), "500ms");
        assert_eq!(speed_to_string(2000), "2s");
        assert_eq!(speed_to_string(2450), "2s.45");
        assert_eq!(speed_to_string(61_000), "1m01s");
        assert_eq!(speed_to_string(MS_PER_HOUR + 2 * MS_PER_MINUTE), "1h02m");
    }

    #[test]
    fn test_speed_for_modes() {
        let step = ChaserStep::new(1).with_timings(10, 20, 30);
        let mut chaser = Chaser::new(vec![step.clone()]);
        chaser.fade_in = 100;
        chaser.fade_out = 200;
        chaser.duration = 300;

        assert_eq!(chaser.speed_for(&step, SpeedColumn::FadeIn), None);

        chaser.fade_in_mode = SpeedMode::Common;
        chaser.fade_out_mode = SpeedMode::PerStep;
        chaser.duration_mode = SpeedMode::PerStep;
        assert_eq!(chaser.speed_for(&step, SpeedColumn::FadeIn), Some(100));
        assert_eq!(chaser.speed_for(&step, SpeedColumn::FadeOut), Some(20));
        assert_eq!(chaser.speed_for(&step, SpeedColumn::Duration), Some(30));
    }
}
