/// Game-logic functions.
///
/// Every step takes the `GameState` by mutable reference and advances one
/// concern of the frame; `tick` runs them in order.  Time and randomness are
/// injected (`now_ms`, `rng`) so tests can drive frames deterministically.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Bullet, Controls, FrameReport, GameState, GameStatus, Invader, Player, PowerUp, PowerUpKind,
    Tint, Variant,
};
use crate::error::GameError;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a variant.  Settings `validate()`
/// rejects never reach the simulation.
pub fn init_state(variant: Variant, config: GameConfig) -> Result<GameState, GameError> {
    config.validate()?;
    let player = Player {
        x: config.canvas_width / 2.0 - config.player_width / 2.0,
        y: config.player_start_y(),
        width: config.player_width,
        height: config.player_height,
        speed: config.player_speed,
        fire_cooldown_ms: config.fire_cooldown_ms,
        last_shot_ms: None,
    };
    let invaders = create_invaders(&config, variant, 1);
    Ok(GameState {
        variant,
        config,
        player,
        bullets: Vec::new(),
        invaders,
        power_ups: Vec::new(),
        score: 0,
        wave: 1,
        status: GameStatus::Playing,
        frame: 0,
    })
}

/// Lay out a full formation for `wave`, column by column.
pub fn create_invaders(config: &GameConfig, variant: Variant, wave: u32) -> Vec<Invader> {
    let (health, speed, tint) = if variant.scales_with_wave() {
        let tint = if wave == 1 { Tint::Red } else { Tint::Orange };
        (wave, config.invader_speed * wave as f32, tint)
    } else {
        (1, config.invader_speed, Tint::Red)
    };

    let mut invaders = Vec::with_capacity(config.invader_cols * config.invader_rows);
    for c in 0..config.invader_cols {
        for r in 0..config.invader_rows {
            invaders.push(Invader {
                x: c as f32 * (config.invader_width + config.invader_spacing)
                    + config.formation_offset,
                y: r as f32 * (config.invader_height + config.invader_spacing)
                    + config.formation_offset,
                width: config.invader_width,
                height: config.invader_height,
                dx: speed,
                health,
                initial_health: health,
                tint,
            });
        }
    }
    invaders
}

// ── Per-frame steps ──────────────────────────────────────────────────────────

/// Right wins when both directions are held.  The player never leaves the canvas.
pub fn move_player(state: &mut GameState, controls: &Controls) {
    let max_x = state.config.canvas_width - state.player.width;
    let player = &mut state.player;
    if controls.right {
        player.x = (player.x + player.speed).min(max_x);
    } else if controls.left {
        player.x = (player.x - player.speed).max(0.0);
    }
}

/// Spawn a bullet from the player's nose if the trigger is held and the
/// cooldown (where the variant has one) has strictly elapsed.
pub fn try_fire(state: &mut GameState, controls: &Controls, now_ms: u64) -> bool {
    if !controls.fire {
        return false;
    }
    if state.variant.has_fire_cooldown() {
        let ready = match state.player.last_shot_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > state.player.fire_cooldown_ms,
        };
        if !ready {
            return false;
        }
        state.player.last_shot_ms = Some(now_ms);
    }
    state.bullets.push(Bullet {
        x: state.player.x + state.player.width / 2.0 - state.config.bullet_width / 2.0,
        y: state.player.y,
    });
    true
}

/// Move every bullet up and drop the ones that left the top of the canvas.
pub fn advance_bullets(state: &mut GameState) {
    let speed = state.config.bullet_speed;
    state.bullets.retain_mut(|b| {
        b.y -= speed;
        b.y >= 0.0
    });
}

/// Slide the formation sideways.  If any invader crossed a side edge, the
/// whole formation reverses and drops one invader height.  Returns whether
/// it bounced.
pub fn advance_formation(state: &mut GameState) -> bool {
    let canvas_width = state.config.canvas_width;
    let mut edge = false;
    for inv in state.invaders.iter_mut() {
        inv.x += inv.dx;
        if inv.x + inv.width > canvas_width || inv.x < 0.0 {
            edge = true;
        }
    }

    if edge {
        let drop = state.config.invader_height;
        for inv in state.invaders.iter_mut() {
            inv.dx = -inv.dx;
            inv.y += drop;
        }
    }
    edge
}

/// Pair every bullet with the first live invader it overlaps.  Hit bullets
/// and destroyed invaders are marked first and filtered out afterwards.
pub fn resolve_collisions(state: &mut GameState, rng: &mut impl Rng, report: &mut FrameReport) {
    let mut used_bullets: Vec<usize> = Vec::new();
    let mut killed_invaders: Vec<usize> = Vec::new();

    for (bi, bullet) in state.bullets.iter().enumerate() {
        let bullet_rect = bullet.rect(&state.config);
        for (ii, inv) in state.invaders.iter_mut().enumerate() {
            if killed_invaders.contains(&ii) || !bullet_rect.overlaps(&inv.rect()) {
                continue;
            }
            used_bullets.push(bi);
            inv.health = inv.health.saturating_sub(1);
            if inv.health == 0 {
                killed_invaders.push(ii);
                state.score += inv.score_value();
                report.kills += 1;
                report.points += inv.score_value();
            } else {
                inv.tint = Tint::Red;
                report.hits += 1;
            }
            break;
        }
    }

    for &ii in &killed_invaders {
        let inv = &state.invaders[ii];
        if let Some(kind) = roll_power_up(state.variant, &state.config, rng) {
            state.power_ups.push(PowerUp {
                x: inv.x + inv.width / 2.0 - state.config.power_up_size / 2.0,
                y: inv.y,
                kind,
            });
            report.power_ups_dropped += 1;
        }
    }

    state.invaders = state
        .invaders
        .drain(..)
        .enumerate()
        .filter(|(i, _)| !killed_invaders.contains(i))
        .map(|(_, inv)| inv)
        .collect();

    state.bullets = state
        .bullets
        .drain(..)
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b)
        .collect();
}

fn roll_power_up(variant: Variant, config: &GameConfig, rng: &mut impl Rng) -> Option<PowerUpKind> {
    let kinds = variant.power_up_kinds();
    if kinds.is_empty() || !rng.gen_bool(config.power_up_drop_chance) {
        return None;
    }
    kinds.choose(rng).copied()
}

/// Let power-ups fall.  Ones touching the player are applied and removed;
/// ones below the canvas are removed.  Returns the kinds collected.
pub fn advance_power_ups(state: &mut GameState) -> Vec<PowerUpKind> {
    let config = &state.config;
    let player = &mut state.player;
    let mut collected = Vec::new();

    state.power_ups.retain_mut(|pu| {
        pu.y += config.power_up_speed;
        if pu.rect(config).overlaps(&player.rect()) {
            apply_power_up(player, pu.kind, config);
            collected.push(pu.kind);
            return false;
        }
        pu.y <= config.canvas_height
    });

    for kind in &collected {
        tracing::debug!(?kind, "power-up collected");
    }
    collected
}

pub fn apply_power_up(player: &mut Player, kind: PowerUpKind, config: &GameConfig) {
    match kind {
        PowerUpKind::SpeedBoost => player.speed += config.speed_boost,
        PowerUpKind::RapidFire => {
            player.fire_cooldown_ms = player
                .fire_cooldown_ms
                .saturating_sub(config.rapid_fire_step_ms)
                .max(config.min_fire_cooldown_ms);
        }
    }
}

/// Loss if any invader's bottom edge passed the player's top edge.  An empty
/// formation either wins (final wave) or brings in the next wave.  Returns
/// whether a new wave was created.
pub fn check_end_conditions(state: &mut GameState) -> bool {
    let player_y = state.player.y;
    if state.invaders.iter().any(|inv| inv.y + inv.height > player_y) {
        state.status = GameStatus::Lost;
        tracing::info!(score = state.score, wave = state.wave, "formation reached the player");
        return false;
    }

    if !state.invaders.is_empty() {
        return false;
    }
    if state.wave >= state.variant.final_wave() {
        state.status = GameStatus::Won;
        tracing::info!(score = state.score, wave = state.wave, "final wave cleared");
        return false;
    }

    state.wave += 1;
    state.invaders = create_invaders(&state.config, state.variant, state.wave);
    tracing::info!(wave = state.wave, score = state.score, "next wave");
    true
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  A finished game is left untouched.
pub fn tick(
    state: &mut GameState,
    controls: &Controls,
    now_ms: u64,
    rng: &mut impl Rng,
) -> FrameReport {
    let mut report = FrameReport::default();
    if state.status.is_over() {
        return report;
    }
    state.frame += 1;

    move_player(state, controls);
    report.fired = try_fire(state, controls, now_ms);
    advance_bullets(state);
    report.formation_bounced = advance_formation(state);
    resolve_collisions(state, rng, &mut report);
    report.power_ups_collected = advance_power_ups(state);
    report.wave_advanced = check_end_conditions(state);

    report
}
