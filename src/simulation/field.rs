use std::collections::VecDeque;

use crate::config::{
    AMBIENT_AMPLITUDE, DAMPING, DISTANCE_FALLOFF, DT, GRID_SIZE, MAX_SOURCES,
    MIN_SOURCE_AMPLITUDE, PACKET_FALLOFF, PACKET_HALF_WIDTH, RADIAL_SPEED_FACTOR,
    SOURCE_GAIN, SOURCE_LIFETIME, TIME_FALLOFF, WAVE_SPEED,
};
use crate::simulation::WaveSource;

/// CPU-side wave-field simulator.
///
/// Owns three size x size row-major grids (height, previous height,
/// velocity) and a bounded FIFO of live [`WaveSource`]s. One call to
/// [`step`](Self::step) advances the field by one display frame:
/// ambient swell plus expanding source packets, then a leapfrog pass of
/// the discretized 2D wave equation over the interior cells. The outer
/// ring is left open: it only ever carries the ambient and source terms.
///
/// Single-threaded by design; the render loop owns the simulator and
/// calls `step` once per frame.
pub struct WaveField {
    size: usize,
    height: Vec<f32>,
    previous: Vec<f32>,
    velocity: Vec<f32>,
    sources: VecDeque<WaveSource>,
    /// Last time passed to `step`, used as the start time of new sources
    clock: f32,
}

impl WaveField {
    /// Create a field of `size` x `size` cells, at rest at clock zero.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        Self {
            size,
            height: vec![0.0; cells],
            previous: vec![0.0; cells],
            velocity: vec![0.0; cells],
            sources: VecDeque::with_capacity(MAX_SOURCES + 1),
            clock: 0.0,
        }
    }

    /// Create a field with the default grid resolution.
    pub fn new_default() -> Self {
        Self::new(GRID_SIZE)
    }

    /// Grid resolution along one axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read-only view of the current height field, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.height
    }

    /// Number of currently live sources.
    pub fn active_sources(&self) -> usize {
        self.sources.len()
    }

    /// Drop a new disturbance at normalized device coordinates in [-1, 1].
    ///
    /// Out-of-range coordinates are clamped onto the grid, never rejected.
    /// The source list is a bounded FIFO: pushing past [`MAX_SOURCES`]
    /// silently evicts the oldest entry.
    pub fn add_source(&mut self, x_norm: f32, y_norm: f32, amplitude: f32) {
        self.sources.push_back(WaveSource::from_normalized(
            x_norm, y_norm, amplitude, self.clock, self.size,
        ));
        if self.sources.len() > MAX_SOURCES {
            self.sources.pop_front();
        }
    }

    /// Return the surface to rest: clear all sources and zero the grids.
    pub fn reset(&mut self) {
        self.height.fill(0.0);
        self.previous.fill(0.0);
        self.velocity.fill(0.0);
        self.sources.clear();
    }

    /// Advance the simulation to `time` (seconds) and return the updated
    /// height field.
    ///
    /// `time` is assumed to be non-decreasing across calls; a rollback
    /// produces unspecified (but bounded and panic-free) heights, since
    /// the intended recovery policy for a clock reset is an open question.
    pub fn step(&mut self, time: f32) -> &[f32] {
        self.clock = time;
        let n = self.size;

        // Snapshot before clearing, so the curvature pass below never
        // reads heights written earlier in this same tick.
        self.previous.copy_from_slice(&self.height);
        self.height.fill(0.0);

        // Gentle ambient swell across the whole surface
        for y in 0..n {
            let ny = y as f32 / n as f32;
            for x in 0..n {
                let nx = x as f32 / n as f32;
                self.height[y * n + x] += (nx * 4.0 + time * 0.5).sin()
                    * (ny * 3.0 + time * 0.3).cos()
                    * AMBIENT_AMPLITUDE;
            }
        }

        // Expanding circular ripples, oldest source first. Retired
        // sources (past the lifetime horizon or decayed under the
        // epsilon) drop out of the FIFO here.
        let height = &mut self.height;
        self.sources.retain(|source| {
            let elapsed = time - source.start_time;
            if elapsed > SOURCE_LIFETIME {
                return false;
            }
            let amplitude = source.amplitude_at(elapsed);
            if amplitude < MIN_SOURCE_AMPLITUDE {
                return false;
            }

            let front = elapsed * WAVE_SPEED * RADIAL_SPEED_FACTOR;
            for y in 0..n {
                let dy = y as f32 - source.y as f32;
                for x in 0..n {
                    let dx = x as f32 - source.x as f32;
                    let distance = (dx * dx + dy * dy).sqrt();
                    let wave_position = distance - front;
                    if wave_position.abs() < PACKET_HALF_WIDTH {
                        let wave = amplitude
                            * (wave_position * source.frequency).sin()
                            * (-distance * DISTANCE_FALLOFF).exp()
                            * (-wave_position.abs() * PACKET_FALLOFF).exp()
                            * (-elapsed * TIME_FALLOFF).exp();
                        height[y * n + x] += wave * SOURCE_GAIN;
                    }
                }
            }
            true
        });

        // Wave equation over the interior cells. The curvature comes
        // from the snapshot, so update order within the tick cannot
        // alias. The outer ring gets no wave-equation term (open
        // boundary).
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                let i = y * n + x;
                let laplacian = self.previous[i - n]
                    + self.previous[i + n]
                    + self.previous[i - 1]
                    + self.previous[i + 1]
                    - 4.0 * self.previous[i];
                let acceleration = WAVE_SPEED * WAVE_SPEED * laplacian;
                self.velocity[i] = (self.velocity[i] + acceleration * DT) * DAMPING;
                self.height[i] += self.velocity[i] * DT;
            }
        }

        &self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The ambient term of the tick, written exactly as in `step`
    fn ambient(x: usize, y: usize, n: usize, time: f32) -> f32 {
        let nx = x as f32 / n as f32;
        let ny = y as f32 / n as f32;
        (nx * 4.0 + time * 0.5).sin() * (ny * 3.0 + time * 0.3).cos() * AMBIENT_AMPLITUDE
    }

    #[test]
    fn test_source_count_is_bounded() {
        let mut field = WaveField::new_default();
        for _ in 0..25 {
            field.add_source(0.0, 0.0, 1.0);
            assert!(field.active_sources() <= MAX_SOURCES);
        }
        assert_eq!(field.active_sources(), MAX_SOURCES);
    }

    #[test]
    fn test_overflow_evicts_exactly_the_oldest() {
        let mut field = WaveField::new(64);
        // distinct x coordinates so each source is identifiable
        for i in 0..=MAX_SOURCES {
            let x_norm = -1.0 + i as f32 * 0.1;
            field.add_source(x_norm, 0.0, 1.0);
        }
        assert_eq!(field.active_sources(), MAX_SOURCES);
        let first = WaveSource::from_normalized(-1.0, 0.0, 1.0, 0.0, 64);
        let second = WaveSource::from_normalized(-0.9, 0.0, 1.0, 0.0, 64);
        assert!(
            field.sources.iter().all(|s| s.x != first.x),
            "oldest source should have been evicted"
        );
        assert_eq!(
            field.sources.front().map(|s| s.x),
            Some(second.x),
            "second-oldest source should now be at the front"
        );
    }

    #[test]
    fn test_lifetime_horizon_is_a_hard_cutoff() {
        let mut field = WaveField::new(16);
        field.add_source(0.0, 0.0, 1.0);
        // 1.0 * 0.95^8 is ~0.66, so only the horizon can retire it
        field.step(8.0);
        assert_eq!(field.active_sources(), 1, "elapsed == 8.0 is still live");
        field.step(8.01);
        assert_eq!(field.active_sources(), 0, "elapsed > 8.0 must retire");
    }

    #[test]
    fn test_faded_source_retires_at_the_epsilon() {
        let mut field = WaveField::new(16);
        // 0.0012 * 0.95^e crosses 0.001 between e=3 and e=4
        field.add_source(0.0, 0.0, 0.0012);
        field.step(3.0);
        assert_eq!(field.active_sources(), 1);
        field.step(4.0);
        assert_eq!(field.active_sources(), 0);
    }

    #[test]
    fn test_step_is_reproducible_from_identical_state() {
        let run = || {
            let mut field = WaveField::new_default();
            field.add_source(0.2, -0.4, 1.0);
            field.step(0.5);
            field.step(0.5);
            field.heights().to_vec()
        };
        assert_eq!(run(), run(), "same state and time must give the same field");
    }

    #[test]
    fn test_reset_restores_the_initial_state() {
        let mut field = WaveField::new_default();
        field.add_source(0.0, 0.0, 1.0);
        field.step(0.3);
        field.reset();
        assert_eq!(field.active_sources(), 0);
        assert!(field.heights().iter().all(|&h| h == 0.0));

        let mut fresh = WaveField::new_default();
        fresh.step(1.0);
        field.step(1.0);
        assert_eq!(field.heights(), fresh.heights());
    }

    #[test]
    fn test_boundary_ring_only_carries_ambient() {
        let mut field = WaveField::new_default();
        let n = field.size();
        field.step(0.0);
        field.step(0.1);

        for i in 0..n {
            for (x, y) in [(i, 0), (i, n - 1), (0, i), (n - 1, i)] {
                let got = field.heights()[y * n + x];
                let want = ambient(x, y, n, 0.1);
                assert!(
                    (got - want).abs() < 1e-6,
                    "boundary cell ({}, {}) should be ambient-only: {} vs {}",
                    x, y, got, want
                );
            }
        }
        // the interior has picked up wave-equation motion by now
        assert!(field.velocity.iter().any(|&v| v != 0.0));
        // while the ring's velocity never moves off zero
        for i in 0..n {
            assert_eq!(field.velocity[i], 0.0);
            assert_eq!(field.velocity[(n - 1) * n + i], 0.0);
            assert_eq!(field.velocity[i * n], 0.0);
            assert_eq!(field.velocity[i * n + n - 1], 0.0);
        }
    }

    #[test]
    fn test_first_tick_without_sources_is_the_ambient_pattern() {
        let mut field = WaveField::new(64);
        field.step(0.0);
        let n = field.size();
        for y in 0..n {
            for x in 0..n {
                let got = field.heights()[y * n + x];
                let want = ambient(x, y, n, 0.0);
                assert!(
                    (got - want).abs() < 1e-6,
                    "cell ({}, {}): {} vs ambient {}",
                    x, y, got, want
                );
            }
        }
    }

    #[test]
    fn test_ripple_stays_inside_its_packet_window() {
        let mut field = WaveField::new(64);
        let n = field.size();
        field.add_source(0.0, 0.0, 1.0); // center cell (31, 31)
        field.step(0.1);

        // inside the packet window the ripple dominates the ambient term
        let center = field.heights()[31 * n + 31];
        assert!(
            (center - ambient(31, 31, n, 0.1)).abs() > 0.1,
            "center cell should carry a strong ripple contribution"
        );
        let near = field.heights()[31 * n + 33];
        assert!(
            (near - ambient(33, 31, n, 0.1)).abs() > 1e-4,
            "neighbor inside the packet window should be disturbed"
        );

        // the front has only travelled 0.3 cells, so a distant corner
        // is untouched by the source
        let corner = field.heights()[0];
        assert!(
            (corner - ambient(0, 0, n, 0.1)).abs() < 1e-6,
            "cells beyond the packet window must stay ambient-only"
        );
    }
}
