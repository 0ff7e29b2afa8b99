use serde::Serialize;
use tracing::warn;

use crate::core::progress::{format_duration, format_speed, ProgressPhase, ProgressSample};

use super::event::EngineEvent;

pub const VERIFYING_LABEL: &str = "Verifying";
pub const DOWNLOADING_LABEL: &str = "Downloading";
pub const PATCHING_LABEL: &str = "Patch in progress...";
pub const STARTING_LABEL: &str = "Starting...";

/// What the launch region of the panel should currently display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LaunchView {
    pub launch_control_visible: bool,
    pub progress_visible: bool,
    pub progress: Option<ProgressSample>,
    pub percent: u8,
    pub info_visible: bool,
    pub info_text: String,
    pub estimated: Option<String>,
    pub speed: Option<String>,
}

impl LaunchView {
    /// Nothing running: only the launch control is shown.
    pub fn idle() -> Self {
        Self {
            launch_control_visible: true,
            progress_visible: false,
            progress: None,
            percent: 0,
            info_visible: false,
            info_text: VERIFYING_LABEL.to_string(),
            estimated: None,
            speed: None,
        }
    }

    /// Launch requested, engine not heard from yet.
    pub fn launching() -> Self {
        Self {
            launch_control_visible: false,
            info_visible: true,
            ..Self::idle()
        }
    }

    pub fn apply(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::Check { current, total } => {
                self.show_sample(ProgressSample::new(ProgressPhase::Verifying, *current, *total));
            }
            EngineEvent::Progress { current, total } => {
                self.show_sample(ProgressSample::new(
                    ProgressPhase::Downloading,
                    *current,
                    *total,
                ));
            }
            EngineEvent::Patch(_) => {
                self.progress_visible = false;
                self.info_visible = true;
                self.info_text = PATCHING_LABEL.to_string();
            }
            EngineEvent::Data(_) => {
                self.progress_visible = false;
                self.info_visible = true;
                self.info_text = STARTING_LABEL.to_string();
            }
            EngineEvent::Close(_) => *self = Self::idle(),
            EngineEvent::Estimated(seconds) => match format_duration(*seconds) {
                Ok(text) => self.estimated = Some(text),
                Err(e) => warn!("Ignoring time estimate: {}", e),
            },
            EngineEvent::Speed(bytes_per_second) => {
                self.speed = Some(format_speed(*bytes_per_second));
            }
            EngineEvent::Extract(_) | EngineEvent::Error(_) => {}
        }
    }

    fn show_sample(&mut self, sample: ProgressSample) {
        let label = match sample.phase {
            ProgressPhase::Verifying => VERIFYING_LABEL,
            ProgressPhase::Downloading => DOWNLOADING_LABEL,
        };

        self.percent = sample.percentage();
        self.progress = Some(sample);
        self.progress_visible = true;
        self.info_visible = true;
        self.info_text = format!("{} {}%", label, self.percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_events_show_percentage_in_info_text() {
        let mut view = LaunchView::launching();
        view.apply(&EngineEvent::Check {
            current: 10,
            total: 100,
        });
        assert!(view.progress_visible);
        assert_eq!(view.info_text, "Verifying 10%");

        view.apply(&EngineEvent::Progress {
            current: 50,
            total: 200,
        });
        assert_eq!(view.percent, 25);
        assert_eq!(view.info_text, "Downloading 25%");
        assert_eq!(
            view.progress,
            Some(ProgressSample::new(ProgressPhase::Downloading, 50, 200))
        );
    }

    #[test]
    fn zero_total_shows_zero_percent() {
        let mut view = LaunchView::launching();
        view.apply(&EngineEvent::Progress {
            current: 5,
            total: 0,
        });
        assert_eq!(view.percent, 0);
        assert_eq!(view.info_text, "Downloading 0%");
    }

    #[test]
    fn patch_and_data_replace_progress_with_labels() {
        let mut view = LaunchView::launching();
        view.apply(&EngineEvent::Progress {
            current: 1,
            total: 2,
        });
        view.apply(&EngineEvent::Patch("forge".into()));
        assert!(!view.progress_visible);
        assert_eq!(view.info_text, PATCHING_LABEL);

        view.apply(&EngineEvent::Data("hello".into()));
        assert!(!view.progress_visible);
        assert!(view.info_visible);
        assert_eq!(view.info_text, STARTING_LABEL);
    }

    #[test]
    fn error_leaves_view_untouched() {
        let mut view = LaunchView::launching();
        view.apply(&EngineEvent::Progress {
            current: 3,
            total: 4,
        });
        let before = view.clone();
        view.apply(&EngineEvent::Error("disk full".into()));
        view.apply(&EngineEvent::Extract("lwjgl.jar".into()));
        assert_eq!(view, before);
    }

    #[test]
    fn close_resets_to_idle() {
        let mut view = LaunchView::launching();
        view.apply(&EngineEvent::Speed(1_067_008.0));
        view.apply(&EngineEvent::Data("x".into()));
        view.apply(&EngineEvent::Close(0));
        assert_eq!(view, LaunchView::idle());
        assert!(view.launch_control_visible);
        assert_eq!(view.info_text, VERIFYING_LABEL);
    }

    #[test]
    fn telemetry_is_formatted_for_display() {
        let mut view = LaunchView::launching();
        view.apply(&EngineEvent::Estimated(3661.0));
        view.apply(&EngineEvent::Speed(2_134_016.0));
        assert_eq!(view.estimated.as_deref(), Some("1h 1m 1s"));
        assert_eq!(view.speed.as_deref(), Some("2.00 Mb/s"));

        view.apply(&EngineEvent::Estimated(-5.0));
        assert_eq!(view.estimated.as_deref(), Some("1h 1m 1s"));
    }
}
