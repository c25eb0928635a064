mod app;
mod audio_engine;
mod coupler;
mod simulation;
mod types;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1120.0, 520.0])
            .with_min_inner_size([900.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sound Propagation Demo",
        options,
        Box::new(|cc| Ok(Box::new(app::DemoApp::new(cc)))),
    )
}
