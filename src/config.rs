/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing, incomplete,
/// or describes an impossible world (spawn off the map, no levels...).

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::entity::{Direction, PlayerState};
use crate::error::{GameError, Result};
use crate::sim::store::LevelId;
use crate::ui::backdrop::Theme;

/// Largest map side the renderer lays out.
const MAX_MAP_SIDE: usize = 64;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub map: MapConfig,
    pub spawn: PlayerState,
    pub frame_ms: u64,
    /// Fixed RNG seed for point layout; `None` = random per run.
    pub seed: Option<u64>,
    pub levels: Vec<LevelConfig>,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    /// One tile in `point_odds` holds a point.
    pub point_odds: u32,
}

#[derive(Clone, Debug)]
pub struct LevelConfig {
    pub name: String,
    pub theme: Theme,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub turn_left: Vec<String>,
    pub turn_right: Vec<String>,
    pub forward: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    map: TomlMap,
    #[serde(default)]
    spawn: TomlSpawn,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default = "default_levels")]
    levels: Vec<TomlLevel>,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlMap {
    #[serde(default = "default_map_side")]
    width: usize,
    #[serde(default = "default_map_side")]
    height: usize,
    #[serde(default = "default_point_odds")]
    point_odds: u32,
}

#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default = "default_spawn_xy")]
    x: i32,
    #[serde(default = "default_spawn_xy")]
    y: i32,
    #[serde(default = "default_facing")]
    facing: Direction,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
struct TomlLevel {
    name: String,
    theme: Theme,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_turn_left")]
    turn_left: Vec<String>,
    #[serde(default = "default_turn_right")]
    turn_right: Vec<String>,
    #[serde(default = "default_forward")]
    forward: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_map_side() -> usize { 10 }
fn default_point_odds() -> u32 { 8 }
fn default_spawn_xy() -> i32 { 5 }
fn default_facing() -> Direction { Direction::North }
fn default_frame_ms() -> u64 { 16 }  // ~60 fps

fn default_levels() -> Vec<TomlLevel> {
    vec![
        TomlLevel { name: "Residence".into(), theme: Theme::Residence },
        TomlLevel { name: "Copse".into(), theme: Theme::Copse },
        TomlLevel { name: "Hospital".into(), theme: Theme::Hospital },
        TomlLevel { name: "Dungeon".into(), theme: Theme::Dungeon },
    ]
}

fn default_turn_left() -> Vec<String> { vec!["L1".into(), "X".into()] }
fn default_turn_right() -> Vec<String> { vec!["R1".into(), "B".into()] }
fn default_forward() -> Vec<String> { vec!["Y".into()] }
fn default_confirm() -> Vec<String> { vec!["A".into()] }
fn default_cancel() -> Vec<String> { vec!["Start".into(), "Select".into()] }

impl Default for TomlMap {
    fn default() -> Self {
        TomlMap {
            width: default_map_side(),
            height: default_map_side(),
            point_odds: default_point_odds(),
        }
    }
}

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn {
            x: default_spawn_xy(),
            y: default_spawn_xy(),
            facing: default_facing(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            frame_ms: default_frame_ms(),
            seed: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            turn_left: default_turn_left(),
            turn_right: default_turn_right(),
            forward: default_forward(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        // `#[derive(Default)]` on TomlConfig would leave `levels` empty.
        let toml_cfg = TomlConfig { levels: default_levels(), ..TomlConfig::default() };
        GameConfig::from_toml(toml_cfg)
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/gridcrawl, (4) /usr/share/gridcrawl.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => match GameConfig::parse(&text) {
                    Ok(cfg) => {
                        log::info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("{}: {e}; using default settings", path.display());
                        return GameConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
        log::info!("no config.toml found, using defaults");
        GameConfig::default()
    }

    /// Parse and validate a config document.
    pub fn parse(text: &str) -> Result<Self> {
        let toml_cfg: TomlConfig = toml::from_str(text)?;
        let cfg = GameConfig::from_toml(toml_cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        GameConfig {
            map: MapConfig {
                width: toml_cfg.map.width,
                height: toml_cfg.map.height,
                point_odds: toml_cfg.map.point_odds,
            },
            spawn: PlayerState::new(toml_cfg.spawn.x, toml_cfg.spawn.y, toml_cfg.spawn.facing),
            frame_ms: toml_cfg.general.frame_ms,
            seed: toml_cfg.general.seed,
            levels: toml_cfg.levels.into_iter()
                .map(|l| LevelConfig { name: l.name, theme: l.theme })
                .collect(),
            gamepad: GamepadConfig {
                turn_left: toml_cfg.gamepad.turn_left,
                turn_right: toml_cfg.gamepad.turn_right,
                forward: toml_cfg.gamepad.forward,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (w, h) = (self.map.width, self.map.height);
        if w == 0 || h == 0 || w > MAX_MAP_SIDE || h > MAX_MAP_SIDE {
            return Err(GameError::InvalidMapSize { width: w, height: h });
        }
        if self.map.point_odds == 0 {
            return Err(GameError::InvalidPointOdds);
        }
        let (x, y) = (self.spawn.x, self.spawn.y);
        if x < 0 || y < 0 || x as usize >= w || y as usize >= h {
            return Err(GameError::SpawnOutOfBounds { x, y, width: w, height: h });
        }
        if self.levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        Ok(())
    }

    /// Level entry for a validated id. Panics on an id from another config.
    pub fn level(&self, level: LevelId) -> &LevelConfig {
        &self.levels[level.get() - 1]
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Some(xdg) = xdg_data_dir() {
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/gridcrawl");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn xdg_data_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| PathBuf::from(home).join(".local/share/gridcrawl"))
}

/// Where the log file goes: `$GRIDCRAWL_LOG`, else the XDG data dir,
/// else the current directory.
pub fn log_path() -> PathBuf {
    if let Ok(p) = std::env::var("GRIDCRAWL_LOG") {
        return PathBuf::from(p);
    }
    if let Some(xdg) = xdg_data_dir() {
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg.join("gridcrawl.log");
        }
    }
    PathBuf::from("gridcrawl.log")
}
