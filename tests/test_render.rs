use std::io;

use space_invaders::compute::init_state;
use space_invaders::config::GameConfig;
use space_invaders::entities::*;
use space_invaders::render::*;

#[derive(Debug, PartialEq)]
enum Call {
    Clear,
    Rect(Rect, Tint),
    Text(String, f32, f32, TextSize, TextAlign),
    Present,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text(t, ..) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn rects_with(&self, tint: Tint) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Rect(_, t) if *t == tint))
            .count()
    }
}

impl Canvas for Recorder {
    fn clear(&mut self) -> io::Result<()> {
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, tint: Tint) -> io::Result<()> {
        self.calls.push(Call::Rect(rect, tint));
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: TextSize,
        align: TextAlign,
        _tint: Tint,
    ) -> io::Result<()> {
        self.calls.push(Call::Text(text.to_string(), x, y, size, align));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }
}

#[test]
fn frame_starts_with_clear_and_ends_with_present() {
    let s = init_state(Variant::Classic, GameConfig::default()).unwrap();
    let mut canvas = Recorder::default();
    draw_frame(&mut canvas, &s).unwrap();
    assert_eq!(canvas.calls.first(), Some(&Call::Clear));
    assert_eq!(canvas.calls.last(), Some(&Call::Present));
}

#[test]
fn draws_every_entity() {
    let mut s = init_state(Variant::Waves, GameConfig::default()).unwrap();
    s.bullets.push(Bullet { x: 10.0, y: 10.0 });
    s.power_ups.push(PowerUp { x: 20.0, y: 20.0, kind: PowerUpKind::RapidFire });
    s.power_ups.push(PowerUp { x: 40.0, y: 20.0, kind: PowerUpKind::SpeedBoost });

    let mut canvas = Recorder::default();
    draw_frame(&mut canvas, &s).unwrap();

    assert_eq!(canvas.calls[1], Call::Rect(s.player.rect(), Tint::Green));
    assert_eq!(canvas.rects_with(Tint::White), 1);
    assert_eq!(canvas.rects_with(Tint::Red), 50);
    assert_eq!(canvas.rects_with(Tint::Yellow), 1);
    assert_eq!(canvas.rects_with(Tint::Cyan), 1);
}

#[test]
fn hud_shows_score_and_wave() {
    let mut s = init_state(Variant::Waves, GameConfig::default()).unwrap();
    s.score = 120;
    s.wave = 2;
    let mut canvas = Recorder::default();
    draw_frame(&mut canvas, &s).unwrap();

    assert!(canvas.calls.contains(&Call::Text(
        "Score: 120".to_string(),
        10.0,
        20.0,
        TextSize::Normal,
        TextAlign::Left
    )));
    assert!(canvas.calls.contains(&Call::Text(
        "Wave: 2".to_string(),
        700.0,
        20.0,
        TextSize::Normal,
        TextAlign::Left
    )));
    assert!(!canvas.texts().contains(&"GAME OVER"));
}

#[test]
fn lost_game_shows_game_over_banner() {
    let mut s = init_state(Variant::Classic, GameConfig::default()).unwrap();
    s.status = GameStatus::Lost;
    s.score = 40;
    let mut canvas = Recorder::default();
    draw_frame(&mut canvas, &s).unwrap();

    assert!(canvas.calls.contains(&Call::Text(
        "GAME OVER".to_string(),
        400.0,
        300.0,
        TextSize::Banner,
        TextAlign::Center
    )));
    assert!(canvas.texts().contains(&"Final Score: 40"));
    assert!(!canvas.texts().contains(&"YOU WIN!"));
}

#[test]
fn won_game_shows_win_banner() {
    let mut s = init_state(Variant::Waves, GameConfig::default()).unwrap();
    s.invaders.clear();
    s.status = GameStatus::Won;
    let mut canvas = Recorder::default();
    draw_frame(&mut canvas, &s).unwrap();

    assert!(canvas.texts().contains(&"YOU WIN!"));
    assert!(!canvas.texts().contains(&"GAME OVER"));
    assert_eq!(canvas.rects_with(Tint::Red), 0);
}
