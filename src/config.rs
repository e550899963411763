/// Every tunable number in the game, in canvas pixels, pixels-per-frame and
/// milliseconds.  `GameConfig::default()` is the classic 800×600 layout.

use crate::error::GameError;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_width: f32,
    pub player_height: f32,
    /// Distance from the player's top edge to the bottom of the canvas.
    pub player_bottom_offset: f32,
    pub player_speed: f32,
    pub fire_cooldown_ms: u64,
    /// Rapid fire never pushes the cooldown below this.
    pub min_fire_cooldown_ms: u64,

    // ── Bullets ──────────────────────────────────────────────────────────────
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,

    // ── Formation ────────────────────────────────────────────────────────────
    pub invader_width: f32,
    pub invader_height: f32,
    pub invader_speed: f32,
    pub invader_rows: usize,
    pub invader_cols: usize,
    pub invader_spacing: f32,
    pub formation_offset: f32,

    // ── Power-ups ────────────────────────────────────────────────────────────
    pub power_up_size: f32,
    pub power_up_speed: f32,
    /// Probability in `[0, 1]` that a destroyed invader drops a power-up.
    pub power_up_drop_chance: f64,
    pub speed_boost: f32,
    pub rapid_fire_step_ms: u64,

    /// Frames per second the host schedules `tick` at.
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            canvas_width: 800.0,
            canvas_height: 600.0,
            player_width: 50.0,
            player_height: 50.0,
            player_bottom_offset: 60.0,
            player_speed: 5.0,
            fire_cooldown_ms: 500,
            min_fire_cooldown_ms: 100,
            bullet_width: 5.0,
            bullet_height: 10.0,
            bullet_speed: 7.0,
            invader_width: 40.0,
            invader_height: 30.0,
            invader_speed: 2.0,
            invader_rows: 5,
            invader_cols: 10,
            invader_spacing: 10.0,
            formation_offset: 30.0,
            power_up_size: 15.0,
            power_up_speed: 3.0,
            power_up_drop_chance: 0.2,
            speed_boost: 2.0,
            rapid_fire_step_ms: 100,
            fps: 60,
        }
    }
}

impl GameConfig {
    /// Horizontal extent of a freshly built formation, offset included.
    pub fn formation_width(&self) -> f32 {
        let cols = self.invader_cols as f32;
        self.formation_offset + cols * self.invader_width + (cols - 1.0) * self.invader_spacing
    }

    /// Vertical extent of a freshly built formation, offset included.
    pub fn formation_height(&self) -> f32 {
        let rows = self.invader_rows as f32;
        self.formation_offset + rows * self.invader_height + (rows - 1.0) * self.invader_spacing
    }

    pub fn player_start_y(&self) -> f32 {
        self.canvas_height - self.player_bottom_offset
    }

    /// Reject settings that would make the game unplayable.
    pub fn validate(&self) -> Result<(), GameError> {
        let sizes = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("invader_width", self.invader_width),
            ("invader_height", self.invader_height),
            ("invader_speed", self.invader_speed),
            ("power_up_size", self.power_up_size),
            ("power_up_speed", self.power_up_speed),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| !v.is_finite() || *v <= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "{name} must be positive, got {value}"
            )));
        }
        if self.invader_rows == 0 || self.invader_cols == 0 {
            return Err(GameError::InvalidConfig(
                "formation needs at least one row and one column".to_string(),
            ));
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig("fps must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.power_up_drop_chance) {
            return Err(GameError::InvalidConfig(format!(
                "power_up_drop_chance must be within [0, 1], got {}",
                self.power_up_drop_chance
            )));
        }
        if self.min_fire_cooldown_ms > self.fire_cooldown_ms {
            return Err(GameError::InvalidConfig(format!(
                "min_fire_cooldown_ms ({}) exceeds fire_cooldown_ms ({})",
                self.min_fire_cooldown_ms, self.fire_cooldown_ms
            )));
        }
        if self.player_width > self.canvas_width {
            return Err(GameError::InvalidConfig(format!(
                "player ({}) is wider than the canvas ({})",
                self.player_width, self.canvas_width
            )));
        }
        if self.player_start_y() < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "player offset {} is taller than the canvas ({})",
                self.player_bottom_offset, self.canvas_height
            )));
        }
        if self.formation_width() > self.canvas_width {
            return Err(GameError::InvalidConfig(format!(
                "formation ({} px) does not fit the canvas width ({} px)",
                self.formation_width(),
                self.canvas_width
            )));
        }
        if self.formation_height() >= self.player_start_y() {
            return Err(GameError::InvalidConfig(format!(
                "formation ({} px tall) already reaches the player line at {}",
                self.formation_height(),
                self.player_start_y()
            )));
        }
        Ok(())
    }
}
