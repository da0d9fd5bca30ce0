//! Terminal renderer for the `play` front end.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only scales world
//! rectangles (+y up) onto terminal cells (+row down).

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use arcade_loop::{EntityKind, GameConfig, GameKind, GameState, Renderable};

use crate::keymap;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_GAME: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;

/// Everything the renderer needs for one frame.
pub struct View<'a> {
    pub kind: GameKind,
    pub config: &'a GameConfig,
    pub state: GameState,
    pub score: u32,
    pub best: u32,
    pub entities: &'a [Renderable],
}

/// Terminal-cell rectangle of the play field inside the border.
#[derive(Clone, Copy, Debug)]
struct Field {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
}

impl Field {
    fn for_terminal(width: u16, height: u16) -> Self {
        // Row 0 HUD, row 1 top border, row h-2 bottom border, row h-1 hint.
        Self {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    /// Cell span `(col0, col1, row0, row1)`, inclusive, or `None` when the
    /// rectangle is entirely outside the field.
    fn project(&self, config: &GameConfig, r: &Renderable) -> Option<(u16, u16, u16, u16)> {
        let sx = self.cols as f32 / config.screen_width;
        let sy = self.rows as f32 / config.screen_height;

        let x0 = (r.position.x * sx).floor();
        let x1 = ((r.position.x + r.size.x) * sx).ceil() - 1.0;
        // Flip: world y grows upward, rows grow downward.
        let y_top = self.rows as f32 - ((r.position.y + r.size.y) * sy).ceil();
        let y_bottom = self.rows as f32 - (r.position.y * sy).floor() - 1.0;

        let max_c = self.cols as f32 - 1.0;
        let max_r = self.rows as f32 - 1.0;
        if x1 < 0.0 || x0 > max_c || y_bottom < 0.0 || y_top > max_r {
            return None;
        }

        let c0 = x0.clamp(0.0, max_c) as u16;
        let c1 = x1.max(x0).clamp(0.0, max_c) as u16;
        let r0 = y_top.clamp(0.0, max_r) as u16;
        let r1 = y_bottom.max(y_top).clamp(0.0, max_r) as u16;
        Some((self.left + c0, self.left + c1, self.top + r0, self.top + r1))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, view: &View<'_>) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let field = Field::for_terminal(width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, view, width)?;

    for entity in view.entities {
        draw_entity(out, view, &field, entity)?;
    }

    draw_controls_hint(out, view.kind, height)?;

    match view.state {
        GameState::NotStarted => draw_title(out, view, width, height)?,
        GameState::GameOver => draw_game_over(out, view, width, height)?,
        GameState::Running => {}
    }

    // Cursor to the hint row so a stray write cannot land on the field.
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &View<'_>, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if view.best > 0 {
        out.queue(Print(format!("Score:{:>6}  Best:{:>6}", view.score, view.best)))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", view.score)))?;
    }

    let label = format!("[ {} ]", view.kind.name().to_uppercase());
    let lx = (width / 2).saturating_sub(label.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_GAME))?;
    out.queue(Print(label))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn glyph(kind: EntityKind) -> (&'static str, Color) {
    match kind {
        EntityKind::Player => ("█", Color::White),
        EntityKind::Obstacle => ("▓", Color::Green),
        EntityKind::SnakeSegment => ("■", Color::Green),
        EntityKind::Food => ("●", Color::Red),
        EntityKind::Bullet => ("║", Color::Cyan),
        EntityKind::Enemy => ("▼", Color::Magenta),
    }
}

fn draw_entity<W: Write>(
    out: &mut W,
    view: &View<'_>,
    field: &Field,
    entity: &Renderable,
) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = field.project(view.config, entity) else {
        return Ok(());
    };
    let (ch, color) = glyph(entity.kind);
    let row_text = ch.repeat((c1 - c0 + 1) as usize);

    out.queue(style::SetForegroundColor(color))?;
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&row_text))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, kind: GameKind, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(keymap::hint(kind)))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_title<W: Write>(
    out: &mut W,
    view: &View<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let title = match view.kind {
        GameKind::Helicopter => "★  HELICOPTER  ★",
        GameKind::Snake => "★  SNAKE  ★",
        GameKind::Shooter => "★  SPACE  SHOOTER  ★",
    };
    let lines = [
        (title.to_string(), C_TITLE),
        (String::new(), C_HINT),
        ("Press SPACE to play".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &View<'_>,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let new_best = view.score >= view.best && view.score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", view.score)
    } else {
        format!("Best Score:  {:>6}", view.best)
    };
    let best_color = if new_best { Color::Yellow } else { Color::DarkGrey };

    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>6}", view.score), Color::Yellow),
        (best_line, best_color),
        ("SPACE - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}
