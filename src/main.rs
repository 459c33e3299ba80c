mod app;
mod config;
mod error;
mod upload;
mod utils;

use app::ShortsUploader;
use config::ClientConfig;
use eframe::egui;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter_layer).init();

    let config = ClientConfig::from_args();
    let uploader = ShortsUploader::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "DShorts",
        options,
        Box::new(move |_cc: &eframe::CreationContext| Box::new(uploader)),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated with an error: {}", e))
}
