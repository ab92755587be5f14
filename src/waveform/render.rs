use serde::Serialize;

use super::downsample::downsample;
use super::interpolate::{interpolate, Extrapolation};
use crate::config::WaveformConfig;
use crate::playback::{format_time, PlaybackTracker};

/// Mapping from bucket level to bar height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformStyle {
    pub db_floor: f32,
    pub db_ceiling: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for WaveformStyle {
    fn default() -> Self {
        Self::from(&WaveformConfig::default())
    }
}

impl From<&WaveformConfig> for WaveformStyle {
    fn from(config: &WaveformConfig) -> Self {
        Self {
            db_floor: config.db_floor,
            db_ceiling: config.db_ceiling,
            min_height: config.min_height,
            max_height: config.max_height,
        }
    }
}

impl WaveformStyle {
    /// Height of a bar for a bucket level. Levels are clamped to the style's
    /// dB range; NaN (empty bucket) draws at minimum height.
    pub fn bar_height(&self, level_db: f32) -> f32 {
        if level_db.is_nan() {
            return self.min_height;
        }
        interpolate(
            level_db,
            &[self.db_floor, self.db_ceiling],
            &[self.min_height, self.max_height],
            Extrapolation::Clamp,
        )
    }
}

/// Whether bucket `index` of `total` lies behind the playhead.
/// The bucket starting exactly at the playhead is not played.
pub fn is_played(index: usize, total: usize, progress: f64) -> bool {
    total > 0 && progress > index as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformBar {
    /// Bucket mean, `None` for an empty bucket
    pub level_db: Option<f32>,
    pub height: f32,
    pub played: bool,
}

/// Everything a renderer needs to draw one memo's waveform row
#[derive(Debug, Clone, Serialize)]
pub struct WaveformView {
    pub bars: Vec<WaveformBar>,
    pub is_playing: bool,
    pub progress: f64,
    pub position_label: String,
    pub duration_label: String,
}

impl WaveformView {
    pub fn build(
        metering: &[f32],
        bucket_count: usize,
        style: &WaveformStyle,
        tracker: &PlaybackTracker,
    ) -> Self {
        let progress = tracker.progress();
        let buckets = downsample(metering, bucket_count);
        let total = buckets.len();

        let bars = buckets
            .into_iter()
            .enumerate()
            .map(|(index, level)| WaveformBar {
                level_db: (!level.is_nan()).then_some(level),
                height: style.bar_height(level),
                played: is_played(index, total, progress),
            })
            .collect();

        Self {
            bars,
            is_playing: tracker.is_playing(),
            progress,
            position_label: format_time(tracker.position_millis()),
            duration_label: format_time(tracker.duration_millis()),
        }
    }

    /// "M:SS / M:SS" label shown under the waveform
    pub fn time_label(&self) -> String {
        format!("{} / {}", self.position_label, self.duration_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_height_range() {
        let style = WaveformStyle::default();
        assert_eq!(style.bar_height(-60.0), 5.0);
        assert_eq!(style.bar_height(0.0), 50.0);
        assert_eq!(style.bar_height(-100.0), 5.0);
        assert_eq!(style.bar_height(3.0), 50.0);
        assert_eq!(style.bar_height(f32::NAN), 5.0);
    }

    #[test]
    fn test_is_played_is_strict() {
        assert!(is_played(0, 4, 0.5));
        assert!(is_played(1, 4, 0.5));
        assert!(!is_played(2, 4, 0.5));
        assert!(!is_played(3, 4, 0.5));
    }

    #[test]
    fn test_nothing_played_at_start() {
        assert!(!is_played(0, 50, 0.0));
        assert!(!is_played(0, 0, 1.0));
    }
}
