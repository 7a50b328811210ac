/// Wave grid resolution (GRID_SIZE x GRID_SIZE height samples)
pub const GRID_SIZE: usize = 64;

// ============================================
// Wave Equation Parameters
// ============================================

/// Wave propagation speed in grid cells per time unit
pub const WAVE_SPEED: f32 = 0.3;

/// Velocity damping per tick (prevents runaway oscillation)
pub const DAMPING: f32 = 0.995;

/// Integration time step (one display frame at 60 Hz)
pub const DT: f32 = 1.0 / 60.0;

/// Ambient background swell amplitude
pub const AMBIENT_AMPLITUDE: f32 = 0.02;

// ============================================
// Wave Source Parameters
// ============================================

/// Maximum number of concurrently live sources; adding one past the
/// limit evicts the oldest.
pub const MAX_SOURCES: usize = 10;

/// Radial frequency of the ripple packet
pub const SOURCE_FREQUENCY: f32 = 2.0;

/// Per-time-unit amplitude decay base
pub const SOURCE_DECAY: f32 = 0.95;

/// Hard lifetime cutoff in simulation-time units
pub const SOURCE_LIFETIME: f32 = 8.0;

/// Sources whose decayed amplitude falls below this are retired
pub const MIN_SOURCE_AMPLITUDE: f32 = 0.001;

/// Half-width of the expanding wave packet, in cells
pub const PACKET_HALF_WIDTH: f32 = 3.0;

/// The ring front expands at WAVE_SPEED * RADIAL_SPEED_FACTOR cells
/// per time unit.
pub const RADIAL_SPEED_FACTOR: f32 = 10.0;

/// Exponential falloff of packet amplitude with distance from the source
pub const DISTANCE_FALLOFF: f32 = 0.08;

/// Exponential falloff across the packet's radial profile
pub const PACKET_FALLOFF: f32 = 0.3;

/// Exponential falloff of packet amplitude over elapsed time
pub const TIME_FALLOFF: f32 = 0.5;

/// Overall gain applied to every source contribution
pub const SOURCE_GAIN: f32 = 0.5;

// ============================================
// Interaction & Rendering
// ============================================

/// Ripple amplitude for a mouse press
pub const PRESS_AMPLITUDE: f32 = 1.0;

/// Ripple amplitude while dragging
pub const DRAG_AMPLITUDE: f32 = 0.6;

/// Minimum pointer travel (pixels) between drag-spawned sources
pub const DRAG_SPACING_PX: f64 = 12.0;

/// Vertical exaggeration applied by the fragment shader when shading
pub const HEIGHT_SCALE: f32 = 18.0;
