//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and a published snapshot.  No game
//! logic is performed; this module only translates snapshots into terminal
//! commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use portfolio_arcade::entities::{CollectibleKind, Facing, HazardKind, Platform};
use portfolio_arcade::game::{Game, Phase};
use portfolio_arcade::leaderboard::ScoreEntry;
use portfolio_arcade::snapshot::{EntityKind, EntityView, FrameSnapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_NAME: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_POWERED: Color = Color::Magenta;
const C_PLATFORM: Color = Color::DarkGreen;
const C_HAZARD_GROUND: Color = Color::Red;
const C_HAZARD_FLYING: Color = Color::DarkRed;
const C_PIPE: Color = Color::Green;
const C_COIN: Color = Color::Yellow;
const C_POWER: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// What the renderer needs beyond the snapshot.
pub struct Scene<'a> {
    pub title: &'a str,
    /// Pipe opening height in world units (flappy only).
    pub pipe_gap: f32,
    /// Name typed so far on the name-entry screen.
    pub name_input: &'a str,
}

/// World (percent of viewport) → terminal cell mapping.
struct Viewport {
    width: u16,
    height: u16,
    camera: f32,
}

impl Viewport {
    fn cell_x(&self, world_x: f32) -> f32 {
        let inner = self.width.saturating_sub(2) as f32;
        1.0 + (world_x - self.camera) * inner / 100.0
    }

    fn col(&self, world_x: f32) -> Option<u16> {
        let c = self.cell_x(world_x);
        (c >= 1.0 && c < self.width.saturating_sub(1) as f32).then_some(c as u16)
    }

    fn row(&self, world_y: f32) -> Option<u16> {
        let inner = self.height.saturating_sub(4) as f32;
        let r = 2.0 + world_y * inner / 100.0;
        (r >= 2.0 && r < self.height.saturating_sub(2) as f32).then_some(r as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &FrameSnapshot, scene: &Scene) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport {
        width,
        height,
        camera: snap.camera_offset,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &view)?;
    draw_hud(out, snap, scene, &view)?;

    match snap.phase {
        Phase::Start => draw_title(out, snap, scene, &view)?,
        Phase::EnterName => draw_name_entry(out, scene, &view)?,
        Phase::Playing | Phase::GameOver => {
            for platform in &snap.platforms {
                draw_platform(out, platform, &view)?;
            }
            for entity in snap.entities.iter().filter(|e| e.visible) {
                draw_entity(out, entity, scene, &view)?;
            }
            draw_player(out, snap, &view)?;
            draw_controls_hint(out, &view)?;
            if snap.phase == Phase::GameOver {
                draw_game_over(out, snap, &view)?;
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    snap: &FrameSnapshot,
    scene: &Scene,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", snap.score)))?;

    let title = format!("[ {} ]", scene.title.to_uppercase());
    let tx = (view.width / 2).saturating_sub(title.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&title))?;

    let power_tag = if snap.player.powered { "[★ POWER] " } else { "" };
    let name = snap.player_name.as_deref().unwrap_or("???");
    let right = format!("{}{}", power_tag, name);
    let rx = view.width.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !power_tag.is_empty() {
        out.queue(style::SetForegroundColor(C_PLAYER_POWERED))?;
        out.queue(Print(power_tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_NAME))?;
    out.queue(Print(name))?;
    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(out: &mut W, platform: &Platform, view: &Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(platform.y) else {
        return Ok(());
    };
    let left = view.cell_x(platform.x).max(1.0);
    let right = view.cell_x(platform.x + platform.width).min(view.width.saturating_sub(2) as f32);
    if right < left {
        return Ok(());
    }
    let len = (right - left) as usize + 1;
    out.queue(cursor::MoveTo(left as u16, row))?;
    out.queue(style::SetForegroundColor(C_PLATFORM))?;
    out.queue(Print("▀".repeat(len)))?;
    Ok(())
}

fn draw_entity<W: Write>(
    out: &mut W,
    entity: &EntityView,
    scene: &Scene,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some(col) = view.col(entity.x) else {
        return Ok(());
    };
    match entity.kind {
        EntityKind::Hazard(HazardKind::Pipe) => return draw_pipe(out, entity, col, scene, view),
        EntityKind::Hazard(HazardKind::Ground) => {
            // Feet sit on the surface row; the sprite goes just above it.
            if let Some(row) = view.row(entity.y) {
                out.queue(cursor::MoveTo(col, row.saturating_sub(1).max(2)))?;
                out.queue(style::SetForegroundColor(C_HAZARD_GROUND))?;
                out.queue(Print("▲"))?;
            }
        }
        EntityKind::Hazard(HazardKind::Flying) => {
            if let Some(row) = view.row(entity.y) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(C_HAZARD_FLYING))?;
                out.queue(Print("W"))?;
            }
        }
        EntityKind::Collectible(kind) => {
            if let Some(row) = view.row(entity.y) {
                let (glyph, color) = match kind {
                    CollectibleKind::Coin => ("o", C_COIN),
                    CollectibleKind::Power => ("★", C_POWER),
                };
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

fn draw_pipe<W: Write>(
    out: &mut W,
    entity: &EntityView,
    col: u16,
    scene: &Scene,
    view: &Viewport,
) -> std::io::Result<()> {
    let gap_top = entity.y - scene.pipe_gap / 2.0;
    let gap_bottom = entity.y + scene.pipe_gap / 2.0;
    out.queue(style::SetForegroundColor(C_PIPE))?;
    for row in 2..view.height.saturating_sub(2) {
        let world_y = (row as f32 - 2.0) * 100.0 / view.height.saturating_sub(4) as f32;
        if world_y < gap_top || world_y > gap_bottom {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("█"))?;
        }
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, snap: &FrameSnapshot, view: &Viewport) -> std::io::Result<()> {
    let p = &snap.player;
    let (Some(col), Some(row)) = (view.col(p.x), view.row(p.y)) else {
        return Ok(());
    };
    let glyph = match (p.facing, p.airborne) {
        (_, true) => "^",
        (Facing::Right, false) => ">",
        (Facing::Left, false) => "<",
    };
    let color = if p.powered { C_PLAYER_POWERED } else { C_PLAYER };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row.saturating_sub(1).max(2)))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_top_scores<W: Write>(
    out: &mut W,
    view: &Viewport,
    start_row: u16,
    scores: &[ScoreEntry],
) -> std::io::Result<()> {
    draw_centered(out, view, start_row, "── Top Scores ──", Color::Cyan)?;
    if scores.is_empty() {
        return draw_centered(out, view, start_row + 1, "no scores yet", C_HINT);
    }
    for (i, entry) in scores.iter().enumerate() {
        let line = format!("{}. {:<12} {:>7}", i + 1, entry.name, entry.score);
        draw_centered(out, view, start_row + 1 + i as u16, &line, Color::White)?;
    }
    Ok(())
}

fn draw_title<W: Write>(
    out: &mut W,
    snap: &FrameSnapshot,
    scene: &Scene,
    view: &Viewport,
) -> std::io::Result<()> {
    let cy = view.height / 2;
    draw_centered(out, view, cy.saturating_sub(6), &format!("★  {}  ★", scene.title.to_uppercase()), Color::Cyan)?;
    draw_centered(out, view, cy.saturating_sub(4), "ENTER - Start   Q - Quit", Color::White)?;
    draw_top_scores(out, view, cy.saturating_sub(2), &snap.top_scores)
}

fn draw_name_entry<W: Write>(out: &mut W, scene: &Scene, view: &Viewport) -> std::io::Result<()> {
    let cy = view.height / 2;
    draw_centered(out, view, cy.saturating_sub(2), "Enter your name:", Color::White)?;
    draw_centered(out, view, cy, &format!("> {}_", scene.name_input), Color::Yellow)?;
    // Confirm is only offered once the name is non-blank.
    let (hint, color) = if Game::can_confirm(scene.name_input) {
        ("ENTER - Play", Color::Green)
    } else {
        ("type a name to continue", C_HINT)
    };
    draw_centered(out, view, cy + 2, hint, color)
}

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE / ↑ / W : Jump   Q : Quit"))?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, snap: &FrameSnapshot, view: &Viewport) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let start_row = (view.height / 2).saturating_sub(6);
    for (i, (msg, color)) in lines.iter().enumerate() {
        draw_centered(out, view, start_row + i as u16, msg, *color)?;
    }

    let score_row = start_row + lines.len() as u16;
    draw_centered(out, view, score_row, &format!("Final Score: {:>7}", snap.score), Color::Yellow)?;
    draw_top_scores(out, view, score_row + 2, &snap.top_scores)?;

    let hint_row = score_row + 4 + snap.top_scores.len().max(1) as u16;
    draw_centered(out, view, hint_row, "R - Play Again  M - Menu  Q - Quit", Color::White)
}
