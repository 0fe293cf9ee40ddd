use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Pinch Tower".into(),
            auto_close: 0.0,
        }
    }
}

/// Pinch detection and anchor mapping.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Thumb-to-index distance in normalized landmark space; pinching is `< threshold`.
    pub pinch_threshold: f32,
    /// Horizontal flip of the anchor (selfie camera view).
    pub mirror: bool,
}
impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.08,
            mirror: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub pixels_per_meter: f32,
    /// Gravity in px/s² (world space, y-up, so downward is negative).
    pub gravity_y: f32,
    pub rapier_debug: bool,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 100.0,
            gravity_y: -1500.0,
            rapier_debug: false,
        }
    }
}

/// Material shared by every block plus the colour palette they draw from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BlockConfig {
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
    pub palette: Vec<String>,
}
impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            friction: 0.8,
            restitution: 0.05,
            density: 0.01,
            palette: vec![
                "#0ea5e9".into(),
                "#22d3ee".into(),
                "#818cf8".into(),
                "#fbbf24".into(),
                "#f87171".into(),
                "#c084fc".into(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlatformConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the bottom viewport edge to the platform centre.
    pub bottom_offset: f32,
}
impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 60.0,
            bottom_offset: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub interval_secs: f32,
    /// Pixels per scored floor.
    pub floor_height: f32,
    /// A body this far below the platform centre has fallen.
    pub fallen_margin: f32,
    /// A body this far below the bottom viewport edge has fallen.
    pub overflow_margin: f32,
}
impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0.3,
            floor_height: 15.0,
            fallen_margin: 400.0,
            overflow_margin: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerSource {
    /// JSON hand frames, one per line, on standard input.
    Stdin,
    /// Cursor-driven hand simulator.
    Mouse,
    /// JSON hand frames replayed from a file.
    File(PathBuf),
}

impl TrackerSource {
    /// `"stdin"`, `"mouse"`, anything else is a file path.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "stdin" | "-" => Self::Stdin,
            "mouse" | "" => Self::Mouse,
            other => Self::File(PathBuf::from(other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Same syntax as the `--tracker` flag: `stdin`, `mouse` or a file path.
    pub source: String,
}
impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            source: "mouse".into(),
        }
    }
}
impl TrackerConfig {
    pub fn source(&self) -> TrackerSource {
        TrackerSource::parse(&self.source)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub high_score_path: PathBuf,
    pub key: String,
}
impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            high_score_path: PathBuf::from("pinch_tower_highscore.ron"),
            key: "building_highscore".into(),
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub gesture: GestureConfig,
    pub physics: PhysicsConfig,
    pub blocks: BlockConfig,
    pub platform: PlatformConfig,
    pub scoring: ScoringConfig,
    pub tracker: TrackerConfig,
    pub storage: StorageConfig,
}

/// Command-line settings that win over every file layer, hot reloads included.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub mirror: Option<bool>,
    pub tracker: Option<String>,
    pub high_score_path: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut GameConfig) {
        if let Some(m) = self.mirror {
            cfg.gesture.mirror = m;
        }
        if let Some(t) = &self.tracker {
            cfg.tracker.source = t.clone();
        }
        if let Some(p) = &self.high_score_path {
            cfg.storage.high_score_path = p.clone();
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Merge several RON files in order; later maps override keys of earlier ones.
    /// Returns the config, the paths that were applied and any per-file errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        let t = self.gesture.pinch_threshold;
        if !(t > 0.0 && t < 1.0) {
            w.push(format!(
                "gesture.pinch_threshold {t} outside (0, 1); pinch will never or always fire"
            ));
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push("physics.pixels_per_meter must be > 0".into());
        }
        if self.physics.gravity_y > 0.0 {
            w.push(format!(
                "physics.gravity_y is positive ({}); blocks will fall upward",
                self.physics.gravity_y
            ));
        }
        if !(0.0..=2.0).contains(&self.blocks.friction) {
            w.push(format!(
                "blocks.friction {} outside recommended 0..2",
                self.blocks.friction
            ));
        }
        if !(0.0..=1.0).contains(&self.blocks.restitution) {
            w.push(format!(
                "blocks.restitution {} outside 0..1",
                self.blocks.restitution
            ));
        }
        if self.blocks.density <= 0.0 {
            w.push("blocks.density must be > 0".into());
        }
        if self.blocks.palette.is_empty() {
            w.push("blocks.palette is empty; blocks fall back to white".into());
        }
        for c in &self.blocks.palette {
            if Srgba::hex(c).is_err() {
                w.push(format!("blocks.palette entry '{c}' is not a hex colour"));
            }
        }
        if self.platform.width <= 0.0 || self.platform.height <= 0.0 {
            w.push("platform dimensions must be > 0".into());
        }
        if self.scoring.floor_height <= 0.0 {
            w.push("scoring.floor_height must be > 0".into());
        }
        if self.scoring.interval_secs <= 0.0 {
            w.push("scoring.interval_secs must be > 0".into());
        } else if self.scoring.interval_secs > 2.0 {
            w.push(format!(
                "scoring.interval_secs {} is slow; collapse will be reported late",
                self.scoring.interval_secs
            ));
        }
        if self.storage.key.is_empty() {
            w.push("storage.key is empty".into());
        }
        w
    }
}
