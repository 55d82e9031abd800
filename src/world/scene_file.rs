//! Scene and settings loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable files.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::Scene;
use crate::rasterizer::{RenderSettings, MIN_NEAR};

/// Error type for scene and settings files
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    load_scene_from_str(&contents)
}

/// Load a scene from a RON string
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    Ok(ron::from_str(s)?)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load renderer settings from a RON string. Missing fields take defaults.
pub fn load_settings_from_str(s: &str) -> Result<RenderSettings, SceneError> {
    Ok(ron::from_str(s)?)
}

/// Load renderer settings, falling back to defaults if the file is
/// missing or malformed
pub fn load_settings<P: AsRef<Path>>(path: P) -> RenderSettings {
    let path = path.as_ref();
    let loaded = fs::read_to_string(path)
        .map_err(SceneError::from)
        .and_then(|s| load_settings_from_str(&s));

    match loaded {
        Ok(settings) => {
            info!(path = %path.display(), "loaded render settings");
            if settings.near < MIN_NEAR || settings.near.is_nan() {
                warn!(near = settings.near, min = MIN_NEAR, "near distance too small, clamping");
            }
            RenderSettings {
                near: settings.near.max(MIN_NEAR),
                ..settings
            }
        }
        Err(SceneError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no settings file, using defaults");
            RenderSettings::default()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "bad settings file, using defaults");
            RenderSettings::default()
        }
    }
}

/// Load a scene, falling back to the built-in demo scene
pub fn load_scene_or_demo<P: AsRef<Path>>(path: P) -> Scene {
    let path = path.as_ref();
    match load_scene(path) {
        Ok(scene) => {
            info!(
                path = %path.display(),
                meshes = scene.meshes.len(),
                triangles = scene.triangle_count(),
                "loaded scene"
            );
            scene
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "using demo scene");
            Scene::demo()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{Color, Vec3};
    use crate::world::Mesh;

    const SCENE: &str = r#"(
        camera_position: (x: 0.0, y: 0.0, z: -1.0),
        meshes: [
            (
                name: "floor",
                origin: (x: 0.0, y: 1.0, z: 4.0),
                quads: [
                    (
                        a: (x: -1.0, y: 0.0, z: -1.0),
                        b: (x: -1.0, y: 0.0, z: 1.0),
                        c: (x: 1.0, y: 0.0, z: 1.0),
                        d: (x: 1.0, y: 0.0, z: -1.0),
                    ),
                ],
            ),
            (
                name: "marker",
                triangles: [
                    (
                        a: (x: 0.0, y: 0.0, z: 2.0),
                        b: (x: 0.0, y: 1.0, z: 2.0),
                        c: (x: 1.0, y: 0.0, z: 2.0),
                        color: (r: 255, g: 0, b: 0, a: 255),
                    ),
                ],
            ),
        ],
    )"#;

    #[test]
    fn test_parse_scene() {
        let scene = load_scene_from_str(SCENE).unwrap();
        assert_eq!(scene.camera_position, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(scene.meshes.len(), 2);
        assert_eq!(scene.meshes[0].quads[0].color, Color::WHITE);
        assert_eq!(scene.meshes[1].origin, Vec3::ZERO);
        assert_eq!(scene.meshes[1].triangles[0].color, Color::new(255, 0, 0));
        assert_eq!(scene.meshes[1].triangles[0].intensity, 1.0);
        assert_eq!(scene.triangle_count(), 3);
    }

    #[test]
    fn test_shipped_assets_parse() {
        let scene = load_scene_from_str(include_str!("../../assets/scenes/demo.ron")).unwrap();
        assert_eq!(scene.meshes.len(), 2);
        assert_eq!(scene.meshes[0], Mesh::cube("cube", Vec3::new(0.0, 0.0, 3.0), 1.0, Color::WHITE));

        let settings = load_settings_from_str(include_str!("../../assets/render.ron")).unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_scene_string_round_trip() {
        let scene = Scene::demo();
        let text = ron::ser::to_string_pretty(&scene, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(load_scene_from_str(&text).unwrap(), scene);
    }

    #[test]
    fn test_bad_scene_is_parse_error() {
        assert!(matches!(load_scene_from_str("(meshes: 3)"), Err(SceneError::ParseError(_))));
    }

    #[test]
    fn test_missing_files_fall_back() {
        let dir = std::env::temp_dir().join("flatshade-missing-dir");
        assert_eq!(load_settings(dir.join("render.ron")), RenderSettings::default());
        assert_eq!(load_scene_or_demo(dir.join("scene.ron")), Scene::demo());
    }

    #[test]
    fn test_settings_file_clamps_near() {
        let path = std::env::temp_dir().join(format!("flatshade-render-{}.ron", std::process::id()));
        fs::write(&path, "(near: -0.5)").unwrap();
        let settings = load_settings(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(settings.near, MIN_NEAR);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("flatshade-scene-{}.ron", std::process::id()));
        let scene = Scene::demo();
        save_scene(&scene, &path).unwrap();
        let loaded = load_scene(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, scene);
    }
}
