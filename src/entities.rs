/// All game entity types: pure data plus a few geometry helpers.

use crate::config::GameConfig;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in canvas pixels, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Strict overlap: rectangles that only share an edge do not touch.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Fill colour for anything drawn on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Green,
    White,
    Red,
    Orange,
    Cyan,
    Yellow,
}

// ── Game rules ────────────────────────────────────────────────────────────────

/// The three incremental versions of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Fires every frame the trigger is held; one wave; no power-ups.
    Classic,
    /// Rate-limited fire and speed-boost drops; one wave.
    PowerUps,
    /// Rate-limited fire, both power-ups, and a tougher second wave.
    Waves,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::PowerUps, Variant::Waves];

    pub fn has_fire_cooldown(&self) -> bool {
        !matches!(self, Variant::Classic)
    }

    /// Kinds a destroyed invader may drop; empty means no drops at all.
    pub fn power_up_kinds(&self) -> &'static [PowerUpKind] {
        match self {
            Variant::Classic => &[],
            Variant::PowerUps => &[PowerUpKind::SpeedBoost],
            Variant::Waves => &[PowerUpKind::SpeedBoost, PowerUpKind::RapidFire],
        }
    }

    /// Clearing this wave wins the game.
    pub fn final_wave(&self) -> u32 {
        match self {
            Variant::Classic | Variant::PowerUps => 1,
            Variant::Waves => 2,
        }
    }

    /// Invaders get tougher and faster with each wave.
    pub fn scales_with_wave(&self) -> bool {
        matches!(self, Variant::Waves)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::PowerUps => "Power-ups",
            Variant::Waves => "Waves",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// An invader reached the player's line.
    Lost,
    /// The final wave was cleared.
    Won,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// The three held-key flags the host feeds into every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Player & projectiles ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame; raised by speed-boost pickups.
    pub speed: f32,
    /// Minimum milliseconds between shots; lowered by rapid-fire pickups.
    pub fire_cooldown_ms: u64,
    /// Timestamp of the last shot, `None` until the first one.
    pub last_shot_ms: Option<u64>,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A player bullet.  Size and speed are fixed by `GameConfig`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

impl Bullet {
    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::new(self.x, self.y, config.bullet_width, config.bullet_height)
    }
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Invader {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Signed horizontal velocity; the sign flips on every edge bounce.
    pub dx: f32,
    pub health: u32,
    pub initial_health: u32,
    pub tint: Tint,
}

impl Invader {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Points awarded for destroying this invader.
    pub fn score_value(&self) -> u32 {
        10 * self.initial_health
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Player moves `speed_boost` pixels per frame faster.
    SpeedBoost,
    /// Fire cooldown shrinks by `rapid_fire_step_ms`, down to the floor.
    RapidFire,
}

impl PowerUpKind {
    pub fn tint(&self) -> Tint {
        match self {
            PowerUpKind::SpeedBoost => Tint::Cyan,
            PowerUpKind::RapidFire => Tint::Yellow,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::new(self.x, self.y, config.power_up_size, config.power_up_size)
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state, owned by the host and mutated once per frame.
#[derive(Clone, Debug)]
pub struct GameState {
    pub variant: Variant,
    pub config: GameConfig,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub invaders: Vec<Invader>,
    pub power_ups: Vec<PowerUp>,
    pub score: u32,
    pub wave: u32,
    pub status: GameStatus,
    pub frame: u64,
}

/// What happened during one `tick`; the host logs it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub fired: bool,
    /// Hits that damaged an invader without destroying it.
    pub hits: u32,
    pub kills: u32,
    pub points: u32,
    pub power_ups_dropped: u32,
    pub power_ups_collected: Vec<PowerUpKind>,
    pub formation_bounced: bool,
    pub wave_advanced: bool,
}
