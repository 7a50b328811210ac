use crate::config::{SOURCE_DECAY, SOURCE_FREQUENCY};

/// A transient point disturbance on the wave grid.
///
/// Sources live in a bounded FIFO owned by [`WaveField`](crate::simulation::WaveField)
/// and are retired once their lifetime or decayed amplitude runs out.
#[derive(Clone, Copy, Debug)]
pub struct WaveSource {
    /// Grid column, already clamped to [0, size-1]
    pub x: usize,
    /// Grid row, already clamped to [0, size-1]
    pub y: usize,
    /// Initial amplitude
    pub amplitude: f32,
    /// Radial frequency of the ripple packet
    pub frequency: f32,
    /// Simulation-clock reading at creation
    pub start_time: f32,
    /// Per-time-unit decay base in (0, 1)
    pub decay: f32,
}

impl WaveSource {
    /// Create a source from normalized device coordinates in [-1, 1].
    ///
    /// Coordinates map to the nearest grid cell via `floor((c+1)*0.5*(size-1))`
    /// and are clamped into bounds; out-of-range input is never rejected.
    pub fn from_normalized(
        x_norm: f32,
        y_norm: f32,
        amplitude: f32,
        start_time: f32,
        size: usize,
    ) -> Self {
        Self {
            x: to_grid(x_norm, size),
            y: to_grid(y_norm, size),
            amplitude,
            frequency: SOURCE_FREQUENCY,
            start_time,
            decay: SOURCE_DECAY,
        }
    }

    /// Decayed amplitude after `elapsed` time units.
    pub fn amplitude_at(&self, elapsed: f32) -> f32 {
        self.amplitude * self.decay.powf(elapsed)
    }
}

/// Map a normalized [-1, 1] coordinate onto the grid, clamped into bounds.
fn to_grid(coord: f32, size: usize) -> usize {
    let max = (size - 1) as f32;
    // clamp before the cast so the index is valid by construction;
    // f32::max also maps NaN input to cell 0
    ((coord + 1.0) * 0.5 * max).floor().max(0.0).min(max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_center_cell() {
        // (0, 0) lands on floor(31.5) = 31 for a 64-cell grid
        let source = WaveSource::from_normalized(0.0, 0.0, 1.0, 0.0, 64);
        assert_eq!((source.x, source.y), (31, 31));
    }

    #[test]
    fn test_corners_map_to_grid_extremes() {
        let lo = WaveSource::from_normalized(-1.0, -1.0, 1.0, 0.0, 64);
        assert_eq!((lo.x, lo.y), (0, 0));
        let hi = WaveSource::from_normalized(1.0, 1.0, 1.0, 0.0, 64);
        assert_eq!((hi.x, hi.y), (63, 63));
    }

    #[test]
    fn test_out_of_range_coordinates_are_clamped() {
        let far = WaveSource::from_normalized(5.0, -7.5, 1.0, 0.0, 64);
        assert_eq!((far.x, far.y), (63, 0));
        let huge = WaveSource::from_normalized(1.0e9, -1.0e9, 1.0, 0.0, 64);
        assert_eq!((huge.x, huge.y), (63, 0));
    }

    #[test]
    fn test_amplitude_decays_geometrically() {
        let source = WaveSource::from_normalized(0.0, 0.0, 2.0, 0.0, 64);
        assert_eq!(source.amplitude_at(0.0), 2.0);
        let one = source.amplitude_at(1.0);
        assert!((one - 2.0 * 0.95).abs() < 1e-6, "expected 2*0.95, got {}", one);
        assert!(source.amplitude_at(5.0) < one);
    }
}
