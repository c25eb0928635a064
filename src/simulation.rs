use crate::types::{
    Point, RenderState, SceneConfig, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ, RING_SPACING,
};

/// Authoritative state of the demo: wavefront phase, source/receiver layout,
/// tone settings, and the play/motion/sound flags. Mutated only on the UI
/// thread, once per frame by `advance` and on user input by the setters.
pub struct SimulationState {
    config: SceneConfig,
    wave_phase: f32,
    source: Point,
    receiver: Point,
    frequency_hz: f32,
    amplitude_percent: f32,
    is_playing: bool,
    is_sound_enabled: bool,
    is_source_moving: bool,
    source_speed: f32,
}

impl SimulationState {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            wave_phase: 0.0,
            source: config.source_start(),
            receiver: config.receiver_start(),
            frequency_hz: 440.0,
            amplitude_percent: 50.0,
            is_playing: true,
            is_sound_enabled: false,
            is_source_moving: false,
            source_speed: 1.0,
        }
    }

    /// One tick of the simulation. While paused this is a complete no-op;
    /// the caller still repaints so the static scene stays visible.
    pub fn advance(&mut self) {
        if !self.is_playing {
            return;
        }

        self.wave_phase = (self.wave_phase + 1.0) % RING_SPACING;

        if self.is_source_moving {
            self.source.x += self.source_speed;
            if self.source.x >= self.config.width {
                self.source.x = 0.0;
            }
        }
    }

    pub fn set_frequency(&mut self, hz: f32) {
        if hz.is_finite() {
            self.frequency_hz = hz.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ);
        }
    }

    pub fn set_amplitude(&mut self, percent: f32) {
        if percent.is_finite() {
            self.amplitude_percent = percent.clamp(0.0, 100.0);
        }
    }

    pub fn set_source_position(&mut self, x: f32, y: f32) {
        if let Some(point) = self.clamp_to_canvas(x, y) {
            self.source = point;
        }
    }

    pub fn set_receiver_position(&mut self, x: f32, y: f32) {
        if let Some(point) = self.clamp_to_canvas(x, y) {
            self.receiver = point;
        }
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.is_source_moving = moving;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.is_sound_enabled = enabled;
    }

    /// Puts the source back at its starting x and rewinds the wavefronts.
    /// Receiver, frequency, and amplitude are left alone.
    pub fn reset_positions(&mut self) {
        self.source.x = self.config.source_start().x;
        self.wave_phase = 0.0;
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            source: self.source,
            receiver: self.receiver,
            wave_phase: self.wave_phase,
        }
    }

    pub fn config(&self) -> SceneConfig {
        self.config
    }

    pub fn source(&self) -> Point {
        self.source
    }

    pub fn receiver(&self) -> Point {
        self.receiver
    }

    pub fn source_receiver_distance(&self) -> f32 {
        self.source.distance_to(self.receiver)
    }

    pub fn frequency_hz(&self) -> f32 {
        self.frequency_hz
    }

    pub fn amplitude_percent(&self) -> f32 {
        self.amplitude_percent
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.is_sound_enabled
    }

    pub fn is_source_moving(&self) -> bool {
        self.is_source_moving
    }

    fn clamp_to_canvas(&self, x: f32, y: f32) -> Option<Point> {
        let point = Point::new(x, y);
        if !point.is_finite() {
            return None;
        }
        Some(Point::new(
            point.x.clamp(0.0, self.config.width),
            point.y.clamp(0.0, self.config.height),
        ))
    }
}
