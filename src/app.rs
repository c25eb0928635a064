use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};

use crate::audio_engine::AudioEngine;
use crate::coupler::AudioCoupler;
use crate::simulation::SimulationState;
use crate::types::{Point, SceneConfig, GLYPH_RADIUS, RING_COUNT, RING_SPACING};

#[derive(Clone, Copy, PartialEq)]
enum DragTarget {
    Source,
    Receiver,
}

pub struct DemoApp {
    sim: SimulationState,
    coupler: AudioCoupler,
    audio_error: Option<String>,
    drag_target: Option<DragTarget>,
}

impl DemoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let sim = SimulationState::new(SceneConfig::default());

        let (engine, audio_error) = match AudioEngine::new() {
            Ok(engine) => (Some(engine), None),
            Err(err) => (None, Some(err)),
        };

        let mut coupler = AudioCoupler::new(engine);
        coupler.on_frequency_changed(sim.frequency_hz());
        coupler.on_amplitude_changed(sim.amplitude_percent());
        coupler.set_enabled(sim.is_playing(), sim.is_sound_enabled());

        Self {
            sim,
            coupler,
            audio_error,
            drag_target: None,
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Wave Source");

        let mut frequency = self.sim.frequency_hz();
        if ui
            .add(
                egui::Slider::new(&mut frequency, 20.0..=2000.0)
                    .logarithmic(true)
                    .text("frequency (Hz)"),
            )
            .changed()
        {
            self.sim.set_frequency(frequency);
            self.coupler.on_frequency_changed(frequency);
        }

        let mut amplitude = self.sim.amplitude_percent();
        if ui
            .add(egui::Slider::new(&mut amplitude, 0.0..=100.0).text("amplitude (%)"))
            .changed()
        {
            self.sim.set_amplitude(amplitude);
            self.coupler.on_amplitude_changed(amplitude);
        }

        ui.horizontal(|ui| {
            if ui
                .button(if self.sim.is_playing() { "Pause" } else { "Play" })
                .clicked()
            {
                let playing = !self.sim.is_playing();
                self.sim.set_playing(playing);
                self.coupler
                    .set_enabled(playing, self.sim.is_sound_enabled());
            }

            if ui
                .button(if self.sim.is_source_moving() {
                    "Stop source"
                } else {
                    "Move source"
                })
                .clicked()
            {
                self.sim.set_moving(!self.sim.is_source_moving());
            }

            if ui.button("Reset").clicked() {
                self.sim.reset_positions();
            }
        });

        let mut sound_enabled = self.sim.is_sound_enabled();
        if ui.checkbox(&mut sound_enabled, "Enable sound").changed() {
            self.sim.set_sound_enabled(sound_enabled);
            self.coupler
                .set_enabled(self.sim.is_playing(), sound_enabled);
        }

        ui.separator();
        ui.label("Drag the speaker or the listener to change the distance.");

        ui.separator();
        if let Some(engine) = self.coupler.engine() {
            ui.label(format!("Audio device: {}", engine.device_name));
            ui.label(format!("Sample rate: {} Hz", engine.sample_rate));
        } else if let Some(err) = &self.audio_error {
            ui.colored_label(
                Color32::from_rgb(230, 100, 100),
                format!("Audio offline: {err}"),
            );
        }
    }

    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let config = self.sim.config();

        ui.horizontal(|ui| {
            ui.label(format!(
                "distance: {:.0} px",
                self.sim.source_receiver_distance()
            ));
            ui.separator();
            ui.label(format!("gain: {:.3}", self.coupler.output().gain));
            ui.separator();
            ui.label(if self.coupler.output().running {
                "tone: on"
            } else {
                "tone: off"
            });
        });

        ui.separator();

        let (response, painter) = ui.allocate_painter(
            Vec2::new(config.width, config.height),
            Sense::click_and_drag(),
        );
        let rect = response.rect;

        self.handle_drag(&response, rect.min);

        painter.rect_filled(rect, 4.0, Color32::from_gray(250));
        let painter = painter.with_clip_rect(rect);

        let render = self.sim.render_state();
        let to_screen = |p: Point| rect.min + Vec2::new(p.x, p.y);
        let source_center = to_screen(render.source);
        let receiver_center = to_screen(render.receiver);

        for ring in 0..RING_COUNT {
            let radius = ring as f32 * RING_SPACING + render.wave_phase;
            let alpha = 0.5 - ring as f32 * 0.05;
            painter.circle_stroke(
                source_center,
                radius,
                Stroke::new(2.0, Color32::from_black_alpha((alpha * 255.0) as u8)),
            );
        }

        painter.circle_filled(source_center, GLYPH_RADIUS, Color32::from_rgb(204, 51, 51));
        painter.text(
            source_center,
            Align2::CENTER_CENTER,
            "S",
            FontId::proportional(12.0),
            Color32::WHITE,
        );

        painter.circle_filled(
            receiver_center,
            GLYPH_RADIUS,
            Color32::from_rgb(51, 102, 204),
        );
        painter.text(
            receiver_center,
            Align2::CENTER_CENTER,
            "R",
            FontId::proportional(12.0),
            Color32::WHITE,
        );

        // Distance legend: 160 px per meter, same scale as the original demo.
        for meter in 0..=5 {
            painter.text(
                Pos2::new(rect.min.x + meter as f32 * 160.0 + 4.0, rect.max.y - 4.0),
                Align2::LEFT_BOTTOM,
                format!("{meter}m"),
                FontId::proportional(12.0),
                Color32::DARK_GRAY,
            );
        }
    }

    fn handle_drag(&mut self, response: &egui::Response, origin: Pos2) {
        let local = response
            .interact_pointer_pos()
            .map(|pointer| Point::new(pointer.x - origin.x, pointer.y - origin.y));

        if response.drag_started() {
            if let Some(local) = local {
                let render = self.sim.render_state();
                self.drag_target = if local.distance_to(render.source) < GLYPH_RADIUS {
                    Some(DragTarget::Source)
                } else if local.distance_to(render.receiver) < GLYPH_RADIUS {
                    Some(DragTarget::Receiver)
                } else {
                    None
                };
            }
        }

        if response.dragged() {
            if let (Some(target), Some(local)) = (self.drag_target, local) {
                match target {
                    DragTarget::Source => self.sim.set_source_position(local.x, local.y),
                    DragTarget::Receiver => self.sim.set_receiver_position(local.x, local.y),
                }
            }
        }

        if response.drag_stopped() {
            self.drag_target = None;
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sim.advance();
        self.coupler.tick(&self.sim);

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.draw_controls(ui);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        ctx.request_repaint();
    }
}
