mod display;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use portfolio_arcade::clock::SystemClock;
use portfolio_arcade::config::ArcadeConfig;
use portfolio_arcade::game::{Game, Phase};
use portfolio_arcade::input::{Binding, InputState};
use portfolio_arcade::leaderboard::{FileLeaderboard, Leaderboard, ScoreReporter, TOP_N};
use portfolio_arcade::ruleset::Variant;

use display::Scene;

const LOG_ENV: &str = "ARCADE_LOG";
const MAX_NAME_LEN: usize = 12;
/// Frame scale ceiling, so a stalled terminal can't launch the player.
const MAX_DT: f32 = 3.0;

fn init_tracing() -> anyhow::Result<()> {
    // The terminal belongs to the game; logs go to a file.
    let path = std::env::var(LOG_ENV).unwrap_or_else(|_| "portfolio_arcade.log".to_string());
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn binding_for(code: KeyCode) -> Option<Binding> {
    match code {
        KeyCode::Left => Some(Binding::ArrowLeft),
        KeyCode::Right => Some(Binding::ArrowRight),
        KeyCode::Up => Some(Binding::ArrowUp),
        KeyCode::Char(' ') => Some(Binding::Space),
        KeyCode::Char(c) => Some(Binding::Key(c)),
        _ => None,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Variant),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  PORTFOLIO  ARCADE  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select a game:"))?;

    let options: [(&str, Color, &str); 3] = [
        ("1", Color::Green, "run, jump, stomp with power-ups"),
        ("2", Color::Yellow, "flap through the pipes"),
        ("3", Color::Red, "endless run, it keeps speeding up"),
    ];
    for (i, (variant, (key, color, desc))) in Variant::ALL.iter().zip(options).enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(format!("{:<12}", variant.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Variant::Platformer)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Variant::Flappy)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Variant::LaneRunner)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

#[derive(PartialEq)]
enum LoopExit {
    Menu,
    Quit,
}

/// Drive one game until the player leaves it.
///
/// Key events only touch the held-binding map (or, outside play, the state
/// machine).  Each frame then asks the game for a ticket, steps once with
/// whatever is held, and draws a snapshot when one is published.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    hold_window: Option<u64>,
    title: &str,
) -> anyhow::Result<LoopExit> {
    let frame_interval = config.frame_interval();
    let pipe_gap = game.ruleset().tuning().pipe_gap;
    let mut input = InputState::new(hold_window);
    let mut name_input = String::new();
    let mut frame: u64 = 0;
    let mut last_step = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                if let Some(binding) = binding_for(code) {
                    input.release(binding);
                }
                continue;
            }
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(LoopExit::Quit);
            }

            match game.phase() {
                Phase::Start => match code {
                    KeyCode::Enter => game.begin()?,
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(LoopExit::Quit),
                    KeyCode::Esc => return Ok(LoopExit::Menu),
                    _ => {}
                },
                Phase::EnterName => match code {
                    KeyCode::Enter => {
                        if let Err(err) = game.confirm_name(&name_input) {
                            tracing::debug!(error = %err, "name rejected");
                        }
                    }
                    KeyCode::Backspace => {
                        name_input.pop();
                    }
                    KeyCode::Esc => return Ok(LoopExit::Menu),
                    KeyCode::Char(c) if !c.is_control() && name_input.chars().count() < MAX_NAME_LEN => {
                        name_input.push(c);
                    }
                    _ => {}
                },
                Phase::Playing => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(LoopExit::Quit)
                    }
                    _ => {
                        if let Some(binding) = binding_for(code) {
                            input.press(binding, frame);
                        }
                    }
                },
                Phase::GameOver => match code {
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        input.clear();
                        game.restart()?;
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => return Ok(LoopExit::Menu),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(LoopExit::Quit)
                    }
                    _ => {}
                },
            }
        }

        // ── Step ──────────────────────────────────────────────────────────────
        match game.request_frame() {
            Some(ticket) => {
                let dt = (last_step.elapsed().as_secs_f32() / frame_interval.as_secs_f32())
                    .min(MAX_DT);
                last_step = Instant::now();
                game.step(ticket, input.held(frame), dt);
            }
            None => last_step = Instant::now(),
        }

        if let Some(snapshot) = game.publish() {
            let scene = Scene {
                title,
                pipe_gap,
                name_input: &name_input,
            };
            display::render(out, &snapshot, &scene)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            thread::sleep(frame_interval - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let config = ArcadeConfig::from_env()?;
    let preset_name = std::env::args().nth(1);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // With release events a key stays held until it is let go; terminals
    // without them fall back to the hold window.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    tracing::info!(release_events = keyboard_enhanced, "terminal ready");

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let hold_window = (!keyboard_enhanced).then_some(config.hold_window_frames);
    let result = run(&mut out, &rx, &config, hold_window, preset_name);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!(error = %err, "arcade exited with an error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    hold_window: Option<u64>,
    preset_name: Option<String>,
) -> anyhow::Result<()> {
    let board: Arc<dyn Leaderboard> = Arc::new(FileLeaderboard::new(config.leaderboard_file()));
    let clock = Arc::new(SystemClock::new());
    let mut player_name = preset_name;

    loop {
        let variant = match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start(variant) => variant,
        };

        let mut game = Game::new(
            variant.ruleset(config),
            clock.clone(),
            player_name.clone(),
            &mut thread_rng(),
        )
        .with_reporter(ScoreReporter::spawn(board.clone()))
        .with_snapshot_interval(config.snapshot_interval());

        match board.list_top_scores(TOP_N) {
            Ok(top) => game.set_top_scores(top),
            Err(err) => tracing::warn!(error = %err, "could not load leaderboard"),
        }

        let exit = game_loop(out, &mut game, rx, config, hold_window, variant.label())?;
        // Keep the name for the next game picked from the menu.
        player_name = game.player_name().map(str::to_string);

        if exit == LoopExit::Quit {
            if let Some(reporter) = game.take_reporter() {
                reporter.shutdown();
            }
            break;
        }
    }
    Ok(())
}
