use space_invaders::config::GameConfig;
use space_invaders::entities::*;

#[test]
fn rect_overlap_is_strict() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0))); // contained
    // Sharing an edge is not a collision
    assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(50.0, 50.0, 1.0, 1.0)));
}

#[test]
fn rect_overlap_is_symmetric() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(9.0, -5.0, 3.0, 6.0);
    assert_eq!(a.overlaps(&b), b.overlaps(&a));
}

#[test]
fn entity_rects_use_config_sizes() {
    let cfg = GameConfig::default();
    let bullet = Bullet { x: 3.0, y: 4.0 };
    assert_eq!(bullet.rect(&cfg), Rect::new(3.0, 4.0, 5.0, 10.0));
    let pu = PowerUp { x: 1.0, y: 2.0, kind: PowerUpKind::SpeedBoost };
    assert_eq!(pu.rect(&cfg), Rect::new(1.0, 2.0, 15.0, 15.0));
}

#[test]
fn score_value_scales_with_initial_health() {
    let mut inv = Invader {
        x: 0.0,
        y: 0.0,
        width: 40.0,
        height: 30.0,
        dx: 2.0,
        health: 3,
        initial_health: 3,
        tint: Tint::Orange,
    };
    assert_eq!(inv.score_value(), 30);
    inv.health = 1; // damage does not change the reward
    assert_eq!(inv.score_value(), 30);
}

#[test]
fn variant_rules() {
    assert!(!Variant::Classic.has_fire_cooldown());
    assert!(Variant::PowerUps.has_fire_cooldown());
    assert!(Variant::Waves.has_fire_cooldown());

    assert!(Variant::Classic.power_up_kinds().is_empty());
    assert_eq!(Variant::PowerUps.power_up_kinds(), &[PowerUpKind::SpeedBoost]);
    assert_eq!(
        Variant::Waves.power_up_kinds(),
        &[PowerUpKind::SpeedBoost, PowerUpKind::RapidFire]
    );

    assert_eq!(Variant::Classic.final_wave(), 1);
    assert_eq!(Variant::PowerUps.final_wave(), 1);
    assert_eq!(Variant::Waves.final_wave(), 2);
    assert!(Variant::ALL.iter().filter(|v| v.scales_with_wave()).eq([&Variant::Waves]));
}

#[test]
fn status_is_over() {
    assert!(!GameStatus::Playing.is_over());
    assert!(GameStatus::Lost.is_over());
    assert!(GameStatus::Won.is_over());
}

#[test]
fn power_up_tints_differ() {
    assert_eq!(PowerUpKind::SpeedBoost.tint(), Tint::Cyan);
    assert_eq!(PowerUpKind::RapidFire.tint(), Tint::Yellow);
}

#[test]
fn game_state_clone_is_independent() {
    let cfg = GameConfig::default();
    let original = GameState {
        variant: Variant::Classic,
        player: Player {
            x: 375.0,
            y: 540.0,
            width: 50.0,
            height: 50.0,
            speed: 5.0,
            fire_cooldown_ms: 500,
            last_shot_ms: None,
        },
        config: cfg,
        bullets: Vec::new(),
        invaders: Vec::new(),
        power_ups: Vec::new(),
        score: 0,
        wave: 1,
        status: GameStatus::Playing,
        frame: 0,
    };
    let mut copy = original.clone();
    copy.player.x = 0.0;
    copy.bullets.push(Bullet { x: 1.0, y: 1.0 });
    assert_eq!(original.player.x, 375.0);
    assert!(original.bullets.is_empty());
}
