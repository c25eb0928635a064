/// Ring spacing in canvas units; wave phase wraps modulo this value.
pub const RING_SPACING: f32 = 100.0;

/// Number of concentric wavefront rings drawn around the source.
pub const RING_COUNT: usize = 10;

/// Grab radius for dragging the source/receiver glyphs.
pub const GLYPH_RADIUS: f32 = 10.0;

pub const MIN_FREQUENCY_HZ: f32 = 20.0;
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Canvas bounds and the starting layout derived from them. The width doubles
/// as the maximum distance for the volume falloff and as the wrap bound for
/// source motion.
#[derive(Clone, Copy, Debug)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,
}

impl SceneConfig {
    pub fn source_start(&self) -> Point {
        Point::new(50.0, self.height / 2.0)
    }

    pub fn receiver_start(&self) -> Point {
        Point::new(self.width - 50.0, self.height / 2.0)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Parameters the audio callback reads each buffer. Derived from simulation
/// state by the coupler; the UI never writes these directly.
#[derive(Clone, Copy, Debug)]
pub struct ToneParams {
    pub frequency_hz: f32,
    pub gain: f32,
    pub running: bool,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            gain: 0.5,
            running: false,
        }
    }
}

/// Read-only snapshot handed to the canvas painter once per frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderState {
    pub source: Point,
    pub receiver: Point,
    pub wave_phase: f32,
}
