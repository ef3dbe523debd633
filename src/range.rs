use crate::core::Progress;

/// Scrollable extent of a horizontal track beyond the visible viewport.
/// Recomputed on mount and on every resize; scales Progress into a pixel
/// translation for scroll-jacked panels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct TrackRange {
    range: f64,
}

impl TrackRange {
    /// An unmounted track translates nothing.
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// `max(0, scrollable − visible)`. Non-finite measurements collapse to 0.
    pub fn measure(track_extent: f64, visible_extent: f64) -> Self {
        if !track_extent.is_finite() || !visible_extent.is_finite() {
            return Self::default();
        }
        Self {
            range: (track_extent - visible_extent).max(0.0),
        }
    }

    pub fn range(self) -> f64 {
        self.range
    }

    /// Horizontal translation at `progress`: `-p * range`.
    pub fn translate_x(self, progress: Progress) -> f64 {
        -progress.value() * self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_extent_minus_viewport() {
        let r = TrackRange::measure(2624.0, 1280.0);
        assert_eq!(r.range(), 1344.0);
    }

    #[test]
    fn track_narrower_than_viewport_yields_zero() {
        assert_eq!(TrackRange::measure(800.0, 1280.0).range(), 0.0);
        assert_eq!(TrackRange::measure(1280.0, 1280.0).range(), 0.0);
    }

    #[test]
    fn unmounted_track_translates_nothing() {
        let r = TrackRange::unmounted();
        assert_eq!(r.translate_x(Progress::ONE), 0.0);
    }

    #[test]
    fn translation_endpoints() {
        let r = TrackRange::measure(2624.0, 1280.0);
        assert_eq!(r.translate_x(Progress::ZERO), 0.0);
        assert_eq!(r.translate_x(Progress::ONE), -1344.0);
        assert_eq!(r.translate_x(Progress::new(0.5)), -672.0);
    }

    #[test]
    fn non_finite_measurement_collapses_to_zero() {
        assert_eq!(TrackRange::measure(f64::NAN, 1280.0).range(), 0.0);
        assert_eq!(TrackRange::measure(2000.0, f64::INFINITY).range(), 0.0);
    }
}
