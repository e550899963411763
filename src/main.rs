mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use space_invaders::compute::{init_state, tick};
use space_invaders::config::GameConfig;
use space_invaders::entities::{Controls, GameState, Variant};
use space_invaders::error::GameError;
use space_invaders::render::draw_frame;

use display::TerminalCanvas;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Classic,
    PowerUps,
    Waves,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Classic => Variant::Classic,
            VariantArg::PowerUps => Variant::PowerUps,
            VariantArg::Waves => Variant::Waves,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "space_invaders")]
#[command(about = "Terminal Space-Invaders in three incremental variants")]
struct Args {
    /// Skip the menu and play this variant
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for power-up drops (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Logical canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    canvas_width: f32,

    /// Logical canvas height in pixels
    #[arg(long, default_value_t = 600.0)]
    canvas_height: f32,

    /// Write tracing output to this file (RUST_LOG filters, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig, GameError> {
        let config = GameConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            fps: self.fps,
            ..GameConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

/// The screen belongs to the game, so logs only go to an explicit file.
fn init_tracing(path: &Path) -> Result<(), GameError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW`.
fn is_held(key_seen: &HashMap<KeyCode, Instant>, key: &KeyCode, now: Instant) -> bool {
    key_seen
        .get(key)
        .map(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn held_controls(key_seen: &HashMap<KeyCode, Instant>, now: Instant) -> Controls {
    let any = |keys: &[KeyCode]| keys.iter().any(|k| is_held(key_seen, k, now));
    Controls {
        left: any(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
        right: any(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        fire: any(&[KeyCode::Char(' ')]),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Variant),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<MenuResult, GameError> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SPACE  INVADERS  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select variant:"))?;

    let options: [(&str, Color, &str); 3] = [
        ("1", Color::Green,  "Fire at will, one formation"),
        ("2", Color::Yellow, "Fire cooldown, speed-boost drops"),
        ("3", Color::Red,    "Two waves, tougher invaders, rapid fire"),
    ];

    for (i, (variant, (key, color, desc))) in Variant::ALL.iter().zip(options.iter()).enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<10}", variant.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups (catch falling squares):"))?;
    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print("■"))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(" Speed boost"))?;
    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 5))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print("■"))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(" Rapid fire"))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 7))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Variant::Classic)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Variant::PowerUps)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Variant::Waves)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            // Input thread is gone; nothing more can be chosen.
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_seen` map records when each key last produced a press
/// or repeat event.  Each frame the keys still inside `HOLD_WINDOW` become the
/// three `Controls` flags, so Space and a direction can be held together.
/// Keyboard-enhancement terminals also send `Release`, which drops the key
/// immediately; classic terminals let it expire.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> Result<bool, GameError> {
    let frame_time = Duration::from_secs_f64(1.0 / state.config.fps as f64);
    let started = Instant::now();
    let mut key_seen: HashMap<KeyCode, Instant> = HashMap::new();
    let mut logged_end = false;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_seen.insert(code, frame_start);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if state.status.is_over() => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_seen.insert(code, frame_start);
                }
                KeyEventKind::Release => {
                    key_seen.remove(&code);
                }
            }
        }

        let controls = held_controls(&key_seen, frame_start);
        let now_ms = frame_start.duration_since(started).as_millis() as u64;
        let report = tick(state, &controls, now_ms, rng);
        if report.kills > 0 || report.wave_advanced {
            tracing::debug!(frame = state.frame, ?report, "frame");
        }
        if state.status.is_over() && !logged_end {
            tracing::info!(status = ?state.status, score = state.score, frames = state.frame, "game over");
            logged_end = true;
        }

        let (cols, rows) = terminal::size()?;
        let mut canvas = TerminalCanvas::new(
            out,
            cols,
            rows,
            state.config.canvas_width,
            state.config.canvas_height,
        );
        draw_frame(&mut canvas, state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let args = Args::parse();
    let config = args.game_config()?;
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = run(&mut out, &rx, &args, config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal session failed");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
    config: GameConfig,
    rng: &mut StdRng,
) -> Result<(), GameError> {
    loop {
        let variant = match args.variant {
            Some(arg) => Variant::from(arg),
            None => match show_menu(out, rx)? {
                MenuResult::Quit => break,
                MenuResult::Start(variant) => variant,
            },
        };

        tracing::info!(variant = variant.label(), seed = ?args.seed, "starting game");
        let mut state = init_state(variant, config.clone())?;
        let quit = game_loop(out, &mut state, rx, rng)?;

        if quit {
            break;
        }
        // Otherwise loop back to the menu (or straight into a new game)
    }
    Ok(())
}
