use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::error::Error;
use crate::grid::Pos;
use crate::run::{RunOutcome, RunReport};
use crate::state::Maze;

pub const CELL_W: usize = 2;
pub const HUD_ROWS: usize = 1;
pub const MIN_GRID: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Glyph {
    Wall,
    Passage,
    Cursor,
    Target,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

/// Grid size that fills a terminal of `cols` x `rows`, leaving room for the HUD.
pub fn grid_size(cols: u16, rows: u16) -> Result<(usize, usize), Error> {
    let width = cols as usize / CELL_W;
    let height = (rows as usize).saturating_sub(HUD_ROWS);
    if width < MIN_GRID || height < MIN_GRID {
        return Err(Error::TerminalTooSmall {
            need_w: (MIN_GRID * CELL_W) as u16,
            need_h: (MIN_GRID + HUD_ROWS) as u16,
            have_w: cols,
            have_h: rows,
        });
    }
    Ok((width, height))
}

/// Redraws only cells that changed since the previous frame.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_run: Option<RunReport>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Wall,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_run: None,
            needs_full: true,
            origin_x: 0,
            origin_y: HUD_ROWS as u16,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn record(&mut self, report: RunReport) {
        self.last_run = Some(report);
    }

    /// Draws one frame. `term` is the terminal size as (cols, rows).
    pub fn render<W: Write>(&mut self, out: &mut W, maze: &Maze, term: (u16, u16)) -> io::Result<()> {
        let width = maze.grid.width();
        let height = maze.grid.height();
        let needed_w = (width * CELL_W) as u16;
        let needed_h = (height + HUD_ROWS) as u16;
        let (term_w, term_h) = term;

        out.queue(MoveTo(0, 0))?;
        if term_w < needed_w || term_h < needed_h {
            out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + HUD_ROWS as u16;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let hud = hud_line(maze, self.last_run.as_ref());
        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x, self.origin_y - HUD_ROWS as u16))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(&hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        // Sample the moving markers once so a frame shows a single position for each.
        let cursor = maze.state.cursor();
        let target = maze.state.target();
        for y in 0..height {
            for x in 0..width {
                let pos = Pos::new(x, y);
                let cell = cell_for(maze, pos, cursor, target);
                let idx = y * width + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(out, x, y, cell)?;
                }
            }
        }
        self.needs_full = false;

        out.flush()
    }

    fn draw_cell<W: Write>(&self, out: &mut W, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Wall => "██",
            Glyph::Passage => "  ",
            Glyph::Cursor => "██",
            Glyph::Target => "◆ ",
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        out.queue(MoveTo(x_pos, y_pos))?;
        out.queue(SetForegroundColor(cell.color))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

/// Target is drawn over the cursor, the cursor over the maze.
pub fn cell_for(maze: &Maze, pos: Pos, cursor: Pos, target: Pos) -> Cell {
    if pos == target {
        return Cell {
            glyph: Glyph::Target,
            color: Color::Magenta,
        };
    }
    if pos == cursor {
        return Cell {
            glyph: Glyph::Cursor,
            color: Color::White,
        };
    }
    if maze.grid.get(pos) {
        Cell {
            glyph: Glyph::Passage,
            color: Color::Reset,
        }
    } else {
        Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        }
    }
}

pub fn hud_line(maze: &Maze, last_run: Option<&RunReport>) -> String {
    let state = &maze.state;
    let cursor = state.cursor();
    let target = state.target();
    let mut hud = format!(
        "Run: {}  Phase: {}  Depth: {}  Target: ({}, {})  Cursor: ({}, {})",
        state.run(),
        state.phase(),
        state.max_depth(),
        target.x,
        target.y,
        cursor.x,
        cursor.y
    );
    if let Some(report) = last_run {
        // A run that found no path restarts just like a solved one.
        let outcome = match report.outcome {
            RunOutcome::Solved | RunOutcome::Exhausted => "finished",
            RunOutcome::Interrupted => "interrupted",
        };
        hud.push_str(&format!("  Last: {} in {} cells", outcome, report.carved));
    }
    hud.push_str("  (q to quit)");
    hud
}
