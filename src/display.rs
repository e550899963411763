/// Rendering back-end: all terminal I/O lives here.
///
/// `TerminalCanvas` implements `Canvas` by scaling the game's pixel space
/// onto the terminal grid inside a border.  No game logic is performed.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal,
    QueueableCommand,
};
use space_invaders::entities::{Rect, Tint};
use space_invaders::render::{Canvas, TextAlign, TextSize};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HINT: Color = Color::DarkGrey;

fn color_of(tint: Tint) -> Color {
    match tint {
        Tint::Green => Color::Green,
        Tint::White => Color::White,
        Tint::Red => Color::Red,
        Tint::Orange => Color::DarkYellow,
        Tint::Cyan => Color::Cyan,
        Tint::Yellow => Color::Yellow,
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

pub struct TerminalCanvas<'a, W: Write> {
    out: &'a mut W,
    cols: u16,
    rows: u16,
    /// Terminal cells per canvas pixel.
    sx: f32,
    sy: f32,
}

impl<'a, W: Write> TerminalCanvas<'a, W> {
    /// Fit a `canvas_width`×`canvas_height` pixel space into a terminal of
    /// `cols`×`rows` cells.  The top/bottom/side borders and the hint row are
    /// reserved, so the play field is `cols-2` × `rows-3` cells.
    pub fn new(out: &'a mut W, cols: u16, rows: u16, canvas_width: f32, canvas_height: f32) -> Self {
        let field_cols = cols.saturating_sub(2).max(1);
        let field_rows = rows.saturating_sub(3).max(1);
        TerminalCanvas {
            out,
            cols,
            rows,
            sx: field_cols as f32 / canvas_width,
            sy: field_rows as f32 / canvas_height,
        }
    }

    fn field_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(3).max(1)
    }

    /// Canvas pixel → terminal column, clamped into the field.
    fn col(&self, x: f32) -> u16 {
        let c = (x * self.sx).floor().max(0.0) as u16;
        1 + c.min(self.field_cols() - 1)
    }

    /// Canvas pixel → terminal row, clamped into the field.
    fn row(&self, y: f32) -> u16 {
        let r = (y * self.sy).floor().max(0.0) as u16;
        1 + r.min(self.field_rows() - 1)
    }

    fn draw_border(&mut self) -> io::Result<()> {
        let w = self.cols as usize;
        let bottom = self.rows.saturating_sub(2);

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;
        for row in 1..bottom {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
        Ok(())
    }
}

impl<'a, W: Write> Canvas for TerminalCanvas<'a, W> {
    fn clear(&mut self) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()
    }

    /// Every rectangle covers at least one cell, so 5-pixel bullets stay
    /// visible on small terminals.
    fn fill_rect(&mut self, rect: Rect, tint: Tint) -> io::Result<()> {
        if rect.x + rect.w < 0.0 || rect.y + rect.h < 0.0 {
            return Ok(());
        }
        let c0 = self.col(rect.x);
        let c1 = self.col(rect.x + rect.w - 0.01).max(c0);
        let r0 = self.row(rect.y);
        let r1 = self.row(rect.y + rect.h - 0.01).max(r0);

        let fill = "█".repeat((c1 - c0 + 1) as usize);
        self.out.queue(style::SetForegroundColor(color_of(tint)))?;
        for r in r0..=r1 {
            self.out.queue(cursor::MoveTo(c0, r))?;
            self.out.queue(Print(&fill))?;
        }
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: TextSize,
        align: TextAlign,
        tint: Tint,
    ) -> io::Result<()> {
        let len = text.chars().count() as u16;
        let anchor = self.col(x);
        let col = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor.saturating_sub(len / 2).max(1),
        };
        self.out.queue(cursor::MoveTo(col, self.row(y)))?;
        self.out.queue(style::SetForegroundColor(color_of(tint)))?;
        if size == TextSize::Banner {
            self.out.queue(style::SetAttribute(Attribute::Bold))?;
        }
        self.out.queue(Print(text))?;
        if size == TextSize::Banner {
            self.out.queue(style::SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.draw_controls_hint()?;
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::TerminalCanvas;
    use space_invaders::entities::{Rect, Tint};
    use space_invaders::render::Canvas;

    /// Draw one rect on a 20×8 terminal (18×5 field) and return the raw bytes.
    fn draw(rect: Rect) -> String {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut canvas = TerminalCanvas::new(&mut buf, 20, 8, 800.0, 600.0);
            canvas.fill_rect(rect, Tint::White).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bullet_covers_exactly_one_cell() {
        let out = draw(Rect::new(10.0, 10.0, 5.0, 10.0));
        assert_eq!(out.matches('█').count(), 1);
        assert!(out.contains("\u{1b}[2;2H")); // first field cell, inside the border
    }

    #[test]
    fn off_field_rect_is_clamped_inside_the_border() {
        let out = draw(Rect::new(5000.0, 5000.0, 40.0, 30.0));
        assert_eq!(out.matches('█').count(), 1);
        // Last field cell: column 18, row 5 (1-based 19;6).
        assert!(out.contains("\u{1b}[6;19H"));
    }

    #[test]
    fn rect_above_and_left_of_canvas_is_skipped() {
        let out = draw(Rect::new(-100.0, -100.0, 10.0, 10.0));
        assert_eq!(out.matches('█').count(), 0);
    }

    #[test]
    fn player_spans_its_scaled_width() {
        // 50 px at 18/800 cells per px: columns 9 and 10.
        let out = draw(Rect::new(375.0, 540.0, 50.0, 50.0));
        assert_eq!(out.matches('█').count(), 2);
    }
}
