//! Bounding region and channel tracking.

use serde::Serialize;

use super::{INITIAL_MARGIN, MARGIN_DIVISOR};

/// Axis-aligned region framing everything placed so far.
///
/// Starts inverted so the first expansion sets every edge. Each edge only
/// ever moves outward, by the current margin; the margins are re-derived
/// from the region size after every expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingRegion {
    pub x_low: f64,
    pub x_high: f64,
    pub y_low: f64,
    pub y_high: f64,
    /// Horizontal margin applied on the next expansion
    pub dx: f64,
    /// Vertical margin applied on the next expansion
    pub dy: f64,
}

impl Default for BoundingRegion {
    fn default() -> Self {
        Self {
            x_low: f64::INFINITY,
            x_high: f64::NEG_INFINITY,
            y_low: f64::INFINITY,
            y_high: f64::NEG_INFINITY,
            dx: INITIAL_MARGIN,
            dy: INITIAL_MARGIN,
        }
    }
}

impl BoundingRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until the first expansion.
    pub fn is_empty(&self) -> bool {
        self.x_low > self.x_high || self.y_low > self.y_high
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.x_high - self.x_low
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.y_high - self.y_low
        }
    }

    /// Grow to contain the box `[x_low, x_high] x [y_low, y_high]` plus margin.
    pub fn expand(&mut self, x_low: f64, x_high: f64, y_low: f64, y_high: f64) {
        if x_low - self.dx < self.x_low {
            self.x_low = x_low - self.dx;
        }
        if y_low - self.dy < self.y_low {
            self.y_low = y_low - self.dy;
        }
        if x_high + self.dx > self.x_high {
            self.x_high = x_high + self.dx;
        }
        if y_high + self.dy > self.y_high {
            self.y_high = y_high + self.dy;
        }

        self.dx = (self.x_high - self.x_low) / MARGIN_DIVISOR;
        self.dy = (self.y_high - self.y_low) / MARGIN_DIVISOR;
    }

    /// Grow to contain a single point plus margin.
    pub fn include_point(&mut self, x: f64, y: f64) {
        self.expand(x, x, y, y);
    }
}

/// The set of channels used so far, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChannelSet(Vec<f64>);

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel. Returns `false` if it was already present.
    pub fn insert(&mut self, channel: f64) -> bool {
        match self.0.binary_search_by(|c| c.total_cmp(&channel)) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, channel);
                true
            }
        }
    }

    pub fn contains(&self, channel: f64) -> bool {
        self.0
            .binary_search_by(|c| c.total_cmp(&channel))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Lowest and highest channel.
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((*self.0.first()?, *self.0.last()?))
    }
}

impl Extend<f64> for ChannelSet {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for channel in iter {
            self.insert(channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::cmp::Ordering;

    // `Less` when `a` lies inside `b`.
    fn containment(a: &BoundingRegion, b: &BoundingRegion) -> Option<Ordering> {
        let inside = a.x_low >= b.x_low && a.x_high <= b.x_high && a.y_low >= b.y_low && a.y_high <= b.y_high;
        let outside = a.x_low <= b.x_low && a.x_high >= b.x_high && a.y_low <= b.y_low && a.y_high >= b.y_high;
        match (inside, outside) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }

    #[test]
    fn test_first_expansion_uses_initial_margin() {
        let mut region = BoundingRegion::new();
        assert!(region.is_empty());
        region.expand(0.0, 2.0, 1.0, 2.0);
        assert_abs_diff_eq!(region.x_low, -0.1);
        assert_abs_diff_eq!(region.x_high, 2.1);
        assert_abs_diff_eq!(region.y_low, 0.9);
        assert_abs_diff_eq!(region.y_high, 2.1);
        assert_abs_diff_eq!(region.dx, 2.2 / 50.0);
        assert_abs_diff_eq!(region.dy, 1.2 / 50.0);
    }

    #[test]
    fn test_edges_only_move_outward() {
        let mut region = BoundingRegion::new();
        region.expand(0.0, 10.0, 0.0, 2.0);
        let before = region;
        region.expand(4.0, 5.0, 0.5, 1.0);
        assert_eq!(containment(&before, &region), Some(Ordering::Equal));

        region.include_point(12.0, -1.0);
        assert_eq!(containment(&before, &region), Some(Ordering::Less));
        assert_abs_diff_eq!(region.x_low, before.x_low);
        assert!(region.x_high > 12.0);
        assert!(region.y_low < -1.0);
    }

    #[test]
    fn test_channel_set_is_sorted_and_unique() {
        let mut channels = ChannelSet::new();
        channels.extend([2.0, 0.0, 1.5, 2.0, -1.0]);
        assert_eq!(channels.as_slice(), &[-1.0, 0.0, 1.5, 2.0]);
        assert!(!channels.insert(1.5));
        assert!(channels.contains(0.0));
        assert_eq!(channels.span(), Some((-1.0, 2.0)));
    }
}
