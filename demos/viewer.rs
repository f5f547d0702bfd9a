use anyhow::Context;
use log::{error, info};
use macroquad::prelude::*;
use macroquad_tiled_compositor::config::ViewerConfig;
use macroquad_tiled_compositor::driver::macroquad_events::MacroquadEvents;
use macroquad_tiled_compositor::render::macroquad_backend::MacroquadBackend;
use macroquad_tiled_compositor::{load_map, DriverState, FrameDriver, Map, Ticker};

fn window_conf() -> Conf {
    // The window has to be configured before main runs, so a bad config
    // falls back to defaults here and is reported again from main.
    let config = ViewerConfig::from_env().unwrap_or_default();
    Conf {
        window_title: config.window.title,
        window_width: config.window.width,
        window_height: config.window.height,
        ..Default::default()
    }
}

fn load(config: &ViewerConfig, backend: &mut MacroquadBackend) -> anyhow::Result<Map> {
    let path = std::env::args()
        .nth(1)
        .context("usage: viewer <map.json>")?;
    let map = load_map(&path, backend).with_context(|| format!("Cannot load map {}", path))?;
    info!(
        "loaded {}: {}x{} tiles, {} layers, {} objects (tick {} ms)",
        path,
        map.width,
        map.height,
        map.layer_count(),
        map.objects().count(),
        config.frame.tick_interval_ms
    );
    Ok(map)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = match ViewerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let mut backend = MacroquadBackend::new(config.render.line_thickness);
    let map = match load(&config, &mut backend) {
        Ok(map) => map,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let mut events = MacroquadEvents::new(Ticker::from_millis(config.frame.tick_interval_ms));
    let mut driver = FrameDriver::new(config.frame.cancel_key);

    loop {
        events.pump();
        let state = driver.step(&mut events, &mut backend, &map);
        backend.flush();
        if state == DriverState::Stopped {
            break;
        }
        next_frame().await;
    }
    info!("exiting after {} frames", driver.frames_presented());
}
