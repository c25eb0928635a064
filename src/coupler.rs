use crate::audio_engine::AudioEngine;
use crate::simulation::SimulationState;
use crate::types::{ToneParams, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/// Distance scale of the secondary attenuation stage, in canvas units.
const ATTENUATION_SCALE: f32 = 100.0;

/// Maps simulation state to the tone generator's parameters. The generator
/// itself lives for the whole session; audibility is gated through the
/// `running` flag rather than by stopping the stream, so there are no
/// start/stop clicks. Works as pure local state when no engine is available.
pub struct AudioCoupler {
    output: ToneParams,
    engine: Option<AudioEngine>,
}

impl AudioCoupler {
    pub fn new(engine: Option<AudioEngine>) -> Self {
        let mut coupler = Self {
            output: ToneParams::default(),
            engine,
        };
        coupler.push();
        coupler
    }

    pub fn engine(&self) -> Option<&AudioEngine> {
        self.engine.as_ref()
    }

    pub fn output(&self) -> ToneParams {
        self.output
    }

    /// Retunes the generator immediately. No ramp: an abrupt frequency step
    /// is accepted here, matching the reference behavior.
    pub fn on_frequency_changed(&mut self, hz: f32) {
        if hz.is_finite() {
            self.output.frequency_hz = hz.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ);
            self.push();
        }
    }

    /// Sets the slider-derived baseline gain. The next playing tick
    /// overwrites it with the distance-derived gain; that ordering is part of
    /// the observable behavior and is kept as-is.
    pub fn on_amplitude_changed(&mut self, percent: f32) {
        if percent.is_finite() {
            self.output.gain = percent.clamp(0.0, 100.0) / 100.0;
            self.push();
        }
    }

    /// Recomputes gain from the source/receiver distance: a linear falloff
    /// reaching zero at the canvas width, compounded with a 1/(1 + d/100)
    /// stage. The two-stage falloff is intentional, not accidental.
    pub fn update_gain_from_distance(&mut self, state: &SimulationState) {
        let distance = state.source_receiver_distance();
        let max_distance = state.config().width;

        let volume = 1.0 - (distance / max_distance).min(1.0);
        let attenuation = 1.0 / (1.0 + distance / ATTENUATION_SCALE);

        self.output.gain = volume * attenuation;
        self.push();
    }

    /// The generator runs iff both flags are set. Idempotent: re-suspending
    /// or re-resuming is a no-op.
    pub fn set_enabled(&mut self, playing: bool, sound_enabled: bool) {
        let running = playing && sound_enabled;
        if running != self.output.running {
            self.output.running = running;
            self.push();
        }
    }

    /// Per-frame coupling: refresh the running gate, then (only while
    /// playing) let the distance-derived gain win over any slider baseline.
    pub fn tick(&mut self, state: &SimulationState) {
        self.set_enabled(state.is_playing(), state.is_sound_enabled());
        if state.is_playing() {
            self.update_gain_from_distance(state);
        }
    }

    fn push(&self) {
        if let Some(engine) = &self.engine {
            engine.set_params(self.output);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SceneConfig;

    fn coupler() -> AudioCoupler {
        AudioCoupler::new(None)
    }

    fn sim_with_distance(d: f32) -> SimulationState {
        let mut sim = SimulationState::new(SceneConfig::default());
        sim.set_source_position(0.0, 200.0);
        sim.set_receiver_position(d, 200.0);
        sim
    }

    #[test]
    fn gain_is_one_at_zero_distance() {
        let mut coupler = coupler();
        coupler.update_gain_from_distance(&sim_with_distance(0.0));
        assert_eq!(coupler.output().gain, 1.0);
    }

    #[test]
    fn gain_composes_both_stages_at_100() {
        let mut coupler = coupler();
        coupler.update_gain_from_distance(&sim_with_distance(100.0));

        // volume = 1 - 100/800 = 0.875, attenuation = 1/(1 + 1) = 0.5
        let expected = 0.875 * 0.5;
        assert!((coupler.output().gain - expected).abs() < 1.0e-6);
    }

    #[test]
    fn gain_is_zero_at_max_distance() {
        let mut coupler = coupler();
        coupler.update_gain_from_distance(&sim_with_distance(800.0));
        assert_eq!(coupler.output().gain, 0.0);
    }

    #[test]
    fn gain_is_bounded_and_non_increasing() {
        let mut coupler = coupler();
        let mut previous = f32::INFINITY;

        for step in 0..=40 {
            let d = step as f32 * 20.0;
            coupler.update_gain_from_distance(&sim_with_distance(d));
            let gain = coupler.output().gain;

            assert!((0.0..=1.0).contains(&gain), "gain {gain} out of range at d={d}");
            assert!(gain <= previous, "gain increased at d={d}");
            previous = gain;
        }
    }

    #[test]
    fn attenuation_stage_alone_is_strictly_decreasing() {
        let attenuation = |d: f32| 1.0 / (1.0 + d / ATTENUATION_SCALE);

        assert_eq!(attenuation(0.0), 1.0);
        let mut previous = attenuation(0.0);
        for step in 1..=50 {
            let value = attenuation(step as f32 * 17.0);
            assert!(value > 0.0 && value < previous);
            previous = value;
        }
    }

    #[test]
    fn running_requires_both_flags() {
        let mut coupler = coupler();

        for (playing, enabled, expected) in [
            (false, false, false),
            (true, false, false),
            (false, true, false),
            (true, true, true),
        ] {
            coupler.set_enabled(playing, enabled);
            assert_eq!(coupler.output().running, expected);
        }
    }

    #[test]
    fn repeated_enable_transitions_are_idempotent() {
        let mut coupler = coupler();

        coupler.set_enabled(true, true);
        coupler.set_enabled(true, true);
        assert!(coupler.output().running);

        coupler.set_enabled(false, true);
        coupler.set_enabled(false, true);
        assert!(!coupler.output().running);
    }

    #[test]
    fn amplitude_baseline_is_overwritten_by_tick() {
        let mut coupler = coupler();
        let sim = sim_with_distance(800.0);

        coupler.on_amplitude_changed(80.0);
        assert_eq!(coupler.output().gain, 0.8);

        coupler.tick(&sim);
        assert_eq!(coupler.output().gain, 0.0);
    }

    #[test]
    fn tick_while_paused_keeps_baseline_gain() {
        let mut coupler = coupler();
        let mut sim = sim_with_distance(800.0);
        sim.set_playing(false);

        coupler.on_amplitude_changed(60.0);
        coupler.tick(&sim);

        assert_eq!(coupler.output().gain, 0.6);
    }

    #[test]
    fn frequency_updates_are_clamped() {
        let mut coupler = coupler();

        coupler.on_frequency_changed(880.0);
        assert_eq!(coupler.output().frequency_hz, 880.0);

        coupler.on_frequency_changed(-3.0);
        assert_eq!(coupler.output().frequency_hz, MIN_FREQUENCY_HZ);

        coupler.on_frequency_changed(f32::NAN);
        assert_eq!(coupler.output().frequency_hz, MIN_FREQUENCY_HZ);
    }
}
