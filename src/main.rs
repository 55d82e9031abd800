//! Flatshade: flat-shaded software 3D rasterizer
//!
//! No GPU pipeline, no depth buffer:
//! - Backface culling by winding order
//! - Point-light flat shading
//! - Painter's algorithm depth ordering
//! - Scanline triangle fill with wireframe overlay

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod world;
mod app;

use macroquad::prelude::*;
use rasterizer::{HEIGHT, WIDTH};
use world::{load_scene_or_demo, load_settings};
use app::AppState;

const SCENE_PATH: &str = "assets/scenes/demo.ron";
const SETTINGS_PATH: &str = "assets/render.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Flatshade v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    tracing::info!(version = VERSION, width = WIDTH, height = HEIGHT, "starting flatshade");

    let settings = load_settings(SETTINGS_PATH);
    let scene = load_scene_or_demo(SCENE_PATH);
    let mut app = AppState::new(scene, settings, WIDTH, HEIGHT);

    loop {
        if !app.handle_input() {
            break;
        }

        app.frame();

        next_frame().await;
    }
}
