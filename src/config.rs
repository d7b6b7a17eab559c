/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// The defaults reproduce the stock session: a 1280x780 moonscape, the
/// runner at (400, 390), the drone at (920, 440).

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub world: WorldConfig,
    pub protagonist: AgentConfig,
    pub foe: AgentConfig,
    pub combat: CombatConfig,
    pub jump: JumpConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

/// The play-field rectangle plus the movement clamp limits applied to
/// every agent. The clamp limits may exceed the visible field, as in
/// the stock session (max_x 1300 on a 1280-wide field).
#[derive(Clone, Debug)]
pub struct WorldConfig {
    pub width: i32,
    pub height: i32,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
    pub health: u32,
    pub facing_left: bool,
}

#[derive(Clone, Debug)]
pub struct CombatConfig {
    pub contact_damage: u32,
    /// Ticks of invulnerability after a surviving hit.
    pub hit_cooldown_ticks: u64,
}

#[derive(Clone, Debug)]
pub struct JumpConfig {
    pub height: i32,
    pub gravity: i32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    world: TomlWorld,
    #[serde(default)]
    protagonist: TomlProtagonist,
    #[serde(default)]
    foe: TomlFoe,
    #[serde(default)]
    combat: TomlCombat,
    #[serde(default)]
    jump: TomlJump,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlWorld {
    #[serde(default = "default_world_width")]
    width: i32,
    #[serde(default = "default_world_height")]
    height: i32,
    #[serde(default = "default_min_x")]
    min_x: i32,
    #[serde(default = "default_max_x")]
    max_x: i32,
    #[serde(default = "default_min_y")]
    min_y: i32,
    #[serde(default = "default_max_y")]
    max_y: i32,
}

#[derive(Deserialize, Debug)]
struct TomlProtagonist {
    #[serde(default = "default_protagonist_x")]
    x: i32,
    #[serde(default = "default_protagonist_y")]
    y: i32,
    #[serde(default = "default_agent_width")]
    width: i32,
    #[serde(default = "default_agent_height")]
    height: i32,
    #[serde(default = "default_protagonist_speed")]
    speed: i32,
    #[serde(default = "default_protagonist_health")]
    health: u32,
    #[serde(default)]
    facing_left: bool,
}

#[derive(Deserialize, Debug)]
struct TomlFoe {
    #[serde(default = "default_foe_x")]
    x: i32,
    #[serde(default = "default_foe_y")]
    y: i32,
    #[serde(default = "default_agent_width")]
    width: i32,
    #[serde(default = "default_agent_height")]
    height: i32,
    #[serde(default = "default_foe_speed")]
    speed: i32,
    #[serde(default = "default_foe_health")]
    health: u32,
    #[serde(default = "default_true")]
    facing_left: bool,
}

#[derive(Deserialize, Debug)]
struct TomlCombat {
    #[serde(default = "default_contact_damage")]
    contact_damage: u32,
    #[serde(default = "default_hit_cooldown")]
    hit_cooldown_ticks: u64,
}

#[derive(Deserialize, Debug)]
struct TomlJump {
    #[serde(default = "default_jump_height")]
    height: i32,
    #[serde(default = "default_gravity")]
    gravity: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }

fn default_world_width() -> i32 { 1280 }
fn default_world_height() -> i32 { 780 }
fn default_min_x() -> i32 { 0 }
fn default_max_x() -> i32 { 1300 }
fn default_min_y() -> i32 { 375 }
fn default_max_y() -> i32 { 1000 }

fn default_agent_width() -> i32 { 80 }
fn default_agent_height() -> i32 { 60 }
fn default_protagonist_x() -> i32 { 400 }
fn default_protagonist_y() -> i32 { 390 }
fn default_protagonist_speed() -> i32 { 3 }
fn default_protagonist_health() -> u32 { 100 }
fn default_foe_x() -> i32 { 920 }
fn default_foe_y() -> i32 { 440 }
fn default_foe_speed() -> i32 { 1 }
fn default_foe_health() -> u32 { 5 }
fn default_true() -> bool { true }

fn default_contact_damage() -> u32 { 10 }
fn default_hit_cooldown() -> u64 { 30 }  // ~500ms at the 16ms tick

fn default_jump_height() -> i32 { 140 }
fn default_gravity() -> i32 { 7 }

fn default_pad_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Start".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlWorld {
    fn default() -> Self {
        TomlWorld {
            width: default_world_width(),
            height: default_world_height(),
            min_x: default_min_x(),
            max_x: default_max_x(),
            min_y: default_min_y(),
            max_y: default_max_y(),
        }
    }
}

impl Default for TomlProtagonist {
    fn default() -> Self {
        TomlProtagonist {
            x: default_protagonist_x(),
            y: default_protagonist_y(),
            width: default_agent_width(),
            height: default_agent_height(),
            speed: default_protagonist_speed(),
            health: default_protagonist_health(),
            facing_left: false,
        }
    }
}

impl Default for TomlFoe {
    fn default() -> Self {
        TomlFoe {
            x: default_foe_x(),
            y: default_foe_y(),
            width: default_agent_width(),
            height: default_agent_height(),
            speed: default_foe_speed(),
            health: default_foe_health(),
            facing_left: true,
        }
    }
}

impl Default for TomlCombat {
    fn default() -> Self {
        TomlCombat {
            contact_damage: default_contact_damage(),
            hit_cooldown_ticks: default_hit_cooldown(),
        }
    }
}

impl Default for TomlJump {
    fn default() -> Self {
        TomlJump {
            height: default_jump_height(),
            gravity: default_gravity(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            pause: default_pad_pause(),
            quit: default_pad_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            speed: SpeedConfig { tick_rate_ms: toml_cfg.speed.tick_rate_ms },
            world: WorldConfig {
                width: toml_cfg.world.width,
                height: toml_cfg.world.height,
                min_x: toml_cfg.world.min_x,
                max_x: toml_cfg.world.max_x,
                min_y: toml_cfg.world.min_y,
                max_y: toml_cfg.world.max_y,
            },
            protagonist: AgentConfig {
                x: toml_cfg.protagonist.x,
                y: toml_cfg.protagonist.y,
                width: toml_cfg.protagonist.width,
                height: toml_cfg.protagonist.height,
                speed: toml_cfg.protagonist.speed,
                health: toml_cfg.protagonist.health,
                facing_left: toml_cfg.protagonist.facing_left,
            },
            foe: AgentConfig {
                x: toml_cfg.foe.x,
                y: toml_cfg.foe.y,
                width: toml_cfg.foe.width,
                height: toml_cfg.foe.height,
                speed: toml_cfg.foe.speed,
                health: toml_cfg.foe.health,
                facing_left: toml_cfg.foe.facing_left,
            },
            combat: CombatConfig {
                contact_damage: toml_cfg.combat.contact_damage,
                hit_cooldown_ticks: toml_cfg.combat.hit_cooldown_ticks,
            },
            jump: JumpConfig {
                height: toml_cfg.jump.height,
                gravity: toml_cfg.jump.gravity,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                pause: toml_cfg.gamepad.pause,
                quit: toml_cfg.gamepad.quit,
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
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

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
