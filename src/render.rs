/// Drawing layer: translates a `GameState` into calls on a `Canvas`.
///
/// The canvas works in the same pixel space as the simulation.  How those
/// pixels reach a screen is up to the implementor.

use std::io;

use crate::entities::{GameState, GameStatus, Rect, Tint};

const C_PLAYER: Tint = Tint::Green;
const C_BULLET: Tint = Tint::White;
const C_TEXT: Tint = Tint::White;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    /// HUD text.
    Normal,
    /// End-screen banner.
    Banner,
}

/// A 2D drawing context: rectangle fill and text.
pub trait Canvas {
    fn clear(&mut self) -> io::Result<()>;

    fn fill_rect(&mut self, rect: Rect, tint: Tint) -> io::Result<()>;

    /// Draw `text` with its baseline anchor at `(x, y)`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: TextSize,
        align: TextAlign,
        tint: Tint,
    ) -> io::Result<()>;

    /// Make everything drawn since `clear` visible.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Render one complete frame.
pub fn draw_frame<C: Canvas>(canvas: &mut C, state: &GameState) -> io::Result<()> {
    canvas.clear()?;

    canvas.fill_rect(state.player.rect(), C_PLAYER)?;
    for bullet in &state.bullets {
        canvas.fill_rect(bullet.rect(&state.config), C_BULLET)?;
    }
    for inv in &state.invaders {
        canvas.fill_rect(inv.rect(), inv.tint)?;
    }
    for pu in &state.power_ups {
        canvas.fill_rect(pu.rect(&state.config), pu.kind.tint())?;
    }

    draw_hud(canvas, state)?;

    match state.status {
        GameStatus::Playing => {}
        GameStatus::Lost => draw_end_screen(canvas, state, "GAME OVER")?,
        GameStatus::Won => draw_end_screen(canvas, state, "YOU WIN!")?,
    }

    canvas.present()
}

fn draw_hud<C: Canvas>(canvas: &mut C, state: &GameState) -> io::Result<()> {
    canvas.fill_text(
        &format!("Score: {}", state.score),
        10.0,
        20.0,
        TextSize::Normal,
        TextAlign::Left,
        C_TEXT,
    )?;
    canvas.fill_text(
        &format!("Wave: {}", state.wave),
        state.config.canvas_width - 100.0,
        20.0,
        TextSize::Normal,
        TextAlign::Left,
        C_TEXT,
    )
}

fn draw_end_screen<C: Canvas>(canvas: &mut C, state: &GameState, banner: &str) -> io::Result<()> {
    let cx = state.config.canvas_width / 2.0;
    let cy = state.config.canvas_height / 2.0;
    canvas.fill_text(banner, cx, cy, TextSize::Banner, TextAlign::Center, C_TEXT)?;
    canvas.fill_text(
        &format!("Final Score: {}", state.score),
        cx,
        cy + 40.0,
        TextSize::Normal,
        TextAlign::Center,
        Tint::Yellow,
    )?;
    canvas.fill_text(
        "R - Play Again  Q - Quit",
        cx,
        cy + 70.0,
        TextSize::Normal,
        TextAlign::Center,
        C_TEXT,
    )
}
