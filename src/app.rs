//! Window host and application state
//!
//! The window surface wraps a software framebuffer and uploads it to the
//! screen on `present`. Key handling lives here too.

use macroquad::prelude::{
    draw_text, draw_texture_ex, get_fps, get_frame_time, is_key_pressed, screen_height,
    screen_width, vec2, DrawTextureParams, FilterMode, KeyCode, Texture2D,
};
use tracing::{info, warn};

use crate::rasterizer::{Color, FrameStats, Framebuffer, RenderSettings, Renderer, Surface};
use crate::world::Scene;

const HUD_COLOR: macroquad::color::Color = macroquad::color::Color::new(0.9, 0.9, 0.2, 1.0);
const SCREENSHOT_PATH: &str = "screenshot.png";

/// Framebuffer shown in the macroquad window
pub struct WindowSurface {
    pub fb: Framebuffer,
}

impl WindowSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self { fb: Framebuffer::new(width, height) }
    }
}

impl Surface for WindowSurface {
    fn clear(&mut self, color: Color) {
        self.fb.clear(color);
    }

    fn draw_span(&mut self, y: i32, x_start: i32, x_end: i32, color: Color) {
        self.fb.draw_span(y, x_start, x_end, color);
    }

    /// Upload the framebuffer and stretch it over the window
    fn present(&mut self) {
        let texture = Texture2D::from_rgba8(self.fb.width as u16, self.fb.height as u16, &self.fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            macroquad::color::WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );
    }
}

/// Main application state
pub struct AppState {
    pub scene: Scene,
    pub renderer: Renderer,
    pub surface: WindowSurface,
    /// Spin the scene
    pub animated: bool,
    /// Seconds of animation accumulated while `animated` is on
    pub time: f32,
    pub last_stats: FrameStats,
}

impl AppState {
    pub fn new(scene: Scene, settings: RenderSettings, width: usize, height: usize) -> Self {
        Self {
            scene,
            renderer: Renderer::new(width, height, settings),
            surface: WindowSurface::new(width, height),
            animated: true,
            time: 0.0,
            last_stats: FrameStats::default(),
        }
    }

    /// Apply key presses. Returns false when the user asked to quit.
    pub fn handle_input(&mut self) -> bool {
        if is_key_pressed(KeyCode::Escape) {
            info!("quit requested");
            return false;
        }
        if is_key_pressed(KeyCode::Space) {
            self.animated = !self.animated;
            info!(animated = self.animated, "toggled animation");
        }
        if is_key_pressed(KeyCode::W) {
            self.renderer.settings.wireframe = !self.renderer.settings.wireframe;
            info!(wireframe = self.renderer.settings.wireframe, "toggled wireframe");
        }
        if is_key_pressed(KeyCode::C) {
            self.renderer.settings.backface_cull = !self.renderer.settings.backface_cull;
            info!(backface_cull = self.renderer.settings.backface_cull, "toggled culling");
        }
        if is_key_pressed(KeyCode::F12) {
            self.save_screenshot();
        }
        true
    }

    /// Advance the clock, render, present, draw the HUD
    pub fn frame(&mut self) {
        if self.animated {
            self.time += get_frame_time();
        }

        self.last_stats = self.renderer.render(&mut self.surface, &self.scene, self.time, self.animated);
        self.draw_hud();
    }

    fn draw_hud(&self) {
        let s = &self.last_stats;
        let text = format!(
            "{} fps | tris {} drawn {} culled {} | [space] spin [w] wire [c] cull [f12] shot",
            get_fps(),
            s.submitted,
            s.drawn,
            s.culled,
        );
        draw_text(&text, 8.0, 18.0, 18.0, HUD_COLOR);
    }

    fn save_screenshot(&self) {
        match self.surface.fb.save_png(SCREENSHOT_PATH) {
            Ok(()) => info!(path = SCREENSHOT_PATH, "saved screenshot"),
            Err(e) => warn!(error = %e, "screenshot failed"),
        }
    }
}
