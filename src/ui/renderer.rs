/// Presentation layer: batched terminal renderer.
///
/// Consumes the post-update world state each frame, read-only:
///   1. Compose the frame into an in-memory canvas of (char, color)
///   2. Queue all terminal commands with `queue!`
///   3. Flush once at the end
///
/// The world is measured in pixels, the terminal in cells; the canvas
/// maps one terminal cell to a fixed block of world pixels derived
/// from the current terminal size, so the whole field stays visible.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::agent::{Agent, Facing};
use crate::sim::world::{Mode, WorldState};

/// Vertical offsets
const HUD_ROW: usize = 0;
const MESSAGE_ROW: usize = 1;
const MAP_ROW: usize = 2;

const HEALTH_BAR_CELLS: u32 = 20;

// ── Canvas ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset };

struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, cells: vec![BLANK; width * height] }
    }

    fn set(&mut self, x: usize, y: usize, ch: char, fg: Color) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Cell { ch, fg };
        }
    }

    /// Write a string at (x, y). Each char occupies one column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, ch, fg);
            cx += 1;
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        let x = self.width.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { writer: BufWriter::with_capacity(16384, io::stdout()) }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let mut canvas = Canvas::new(tw as usize, th as usize);

        compose_field(&mut canvas, world);
        compose_agents(&mut canvas, world);
        compose_hud(&mut canvas, world);
        if world.mode == Mode::Paused {
            compose_pause_overlay(&mut canvas);
        }

        // Emit the whole canvas, batching color changes.
        let mut fg = Color::Reset;
        queue!(self.writer, ResetColor)?;
        for row in 0..canvas.height {
            queue!(self.writer, MoveTo(0, row as u16))?;
            for col in 0..canvas.width {
                let cell = canvas.cells[row * canvas.width + col];
                if cell.fg != fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    fg = cell.fg;
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }
}

// ── World → canvas mapping ──

struct Viewport {
    px_per_col: i32,
    px_per_row: i32,
    origin_x: i32,
    origin_y: i32,
}

impl Viewport {
    fn for_world(world: &WorldState, canvas: &Canvas) -> Self {
        let cols = canvas.width.max(1) as i32;
        let rows = canvas.height.saturating_sub(MAP_ROW).max(1) as i32;
        Viewport {
            px_per_col: (world.bounds.width + cols - 1) / cols,
            px_per_row: (world.bounds.height + rows - 1) / rows,
            origin_x: world.bounds.x,
            origin_y: world.bounds.y,
        }
    }

    /// World pixel → canvas cell. None when off-screen (a jump apex
    /// can leave the field).
    fn to_cell(&self, wx: i32, wy: i32) -> Option<(usize, usize)> {
        let cx = (wx - self.origin_x) / self.px_per_col.max(1);
        let cy = (wy - self.origin_y) / self.px_per_row.max(1);
        if cx < 0 || cy < 0 {
            return None;
        }
        Some((cx as usize, cy as usize + MAP_ROW))
    }
}

fn compose_field(canvas: &mut Canvas, world: &WorldState) {
    let vp = Viewport::for_world(world, canvas);

    // Sparse starfield above the walk band, regolith texture below.
    let band_top = world.protagonist.bounds().min_y;
    let band_row = vp
        .to_cell(world.bounds.x, band_top)
        .map(|(_, r)| r)
        .unwrap_or(canvas.height);

    for row in MAP_ROW..canvas.height {
        for col in 0..canvas.width {
            if row < band_row {
                if (col * 7 + row * 13) % 47 == 0 {
                    canvas.set(col, row, '·', Color::DarkGrey);
                }
            } else if row == band_row {
                canvas.set(col, row, '─', Color::DarkGrey);
            } else if (col * 5 + row * 3) % 11 == 0 {
                canvas.set(col, row, '.', Color::DarkGrey);
            }
        }
    }
}

fn compose_agents(canvas: &mut Canvas, world: &WorldState) {
    let vp = Viewport::for_world(world, canvas);

    for agent in &world.agents {
        draw_agent(canvas, &vp, agent, Color::Red, false);
    }

    // Blink while the hit cooldown is running.
    let blinking = world.protagonist.invulnerable(world.tick) && world.tick % 2 == 0;
    draw_agent(canvas, &vp, &world.protagonist, Color::Cyan, blinking);
}

fn draw_agent(canvas: &mut Canvas, vp: &Viewport, agent: &Agent, color: Color, blink: bool) {
    let fg = if blink { Color::White } else { color };
    let bbox = agent.bounding_box();

    let top_left = vp.to_cell(bbox.x, bbox.y);
    let bottom_right = vp.to_cell(bbox.right() - 1, bbox.bottom() - 1);
    let ((x0, y0), (x1, y1)) = match (top_left, bottom_right) {
        (Some(a), Some(b)) => (a, b),
        _ => return,
    };

    for row in y0..=y1 {
        for col in x0..=x1 {
            canvas.set(col, row, '█', fg);
        }
    }

    // Facing marker on the leading edge.
    let marker_row = y0 + (y1 - y0) / 2;
    match agent.facing() {
        Facing::Right => canvas.set(x1 + 1, marker_row, '▸', fg),
        Facing::Left => {
            if x0 > 0 {
                canvas.set(x0 - 1, marker_row, '◂', fg);
            }
        }
    }
}

fn compose_hud(canvas: &mut Canvas, world: &WorldState) {
    let p = &world.protagonist;
    let full = p.full_health().max(1);
    let filled = (p.health() * HEALTH_BAR_CELLS + full - 1) / full;

    let bar_color = if p.health() * 4 <= full {
        Color::Red
    } else if p.health() * 2 <= full {
        Color::Yellow
    } else {
        Color::Green
    };

    canvas.put_str(0, HUD_ROW, "HP ", Color::White);
    for i in 0..HEALTH_BAR_CELLS as usize {
        let ch = if (i as u32) < filled { '█' } else { '░' };
        canvas.set(3 + i, HUD_ROW, ch, bar_color);
    }
    let numbers = format!(" {}/{}", p.health(), p.full_health());
    canvas.put_str(3 + HEALTH_BAR_CELLS as usize, HUD_ROW, &numbers, Color::White);

    let hints = "[SPACE] Jump  [P] Pause  [Q] Quit";
    let x = canvas.width.saturating_sub(hints.chars().count());
    canvas.put_str(x, HUD_ROW, hints, Color::DarkGrey);

    if !world.message.is_empty() {
        canvas.put_centered(MESSAGE_ROW, &world.message, Color::Yellow);
    }
}

fn compose_pause_overlay(canvas: &mut Canvas) {
    let mid = canvas.height / 2;
    canvas.put_centered(mid.saturating_sub(1), "╔══════════════════╗", Color::White);
    canvas.put_centered(mid, "║      PAUSED      ║", Color::White);
    canvas.put_centered(mid + 1, "╚══════════════════╝", Color::White);
    canvas.put_centered(mid + 2, "[P] Resume", Color::DarkGrey);
}
