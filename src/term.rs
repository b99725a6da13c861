use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{self, Color as TermColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use tracing::warn;

use crate::error::{GameError, Result};
use crate::game::Outcome;
use crate::geometry::Grid;
use crate::render::{Color, DrawCommand};
use crate::window::{DrawTarget, Key, Window};

type Coords = (u16, u16);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Paint {
    ch: char,
    fg: Option<Color>,
    bg: Option<Color>,
}

const BLANK: Paint = Paint { ch: ' ', fg: None, bg: None };

/// Playfield contents: `front` is on screen, `back` is the next frame.
struct PaintBuffer {
    width: usize,
    height: usize,
    front: Vec<Paint>,
    back: Vec<Paint>,
}

impl PaintBuffer {
    fn new(width: u16, height: u16) -> Self {
        let (width, height) = (width as usize, height as usize);
        PaintBuffer { width, height, front: vec![BLANK; width * height], back: vec![BLANK; width * height] }
    }

    fn clear(&mut self) {
        self.back.fill(BLANK);
    }

    /// Fills the rectangle's background; an outline brackets it on the
    /// first and last columns. Anything off the playfield is clipped.
    fn paint(&mut self, command: &DrawCommand) {
        let rect = command.rect;
        let (field_w, field_h) = (self.width as i32, self.height as i32);

        for y in rect.y.max(0)..rect.bottom().min(field_h) {
            for x in rect.x.max(0)..rect.right().min(field_w) {
                let ch = match command.outline {
                    None => ' ',
                    Some(_) if rect.width == 1 => '#',
                    Some(_) if x == rect.x => '[',
                    Some(_) if x == rect.right() - 1 => ']',
                    Some(_) => ' ',
                };

                self.back[y as usize * self.width + x as usize] =
                    Paint { ch, fg: command.outline, bg: Some(command.fill) };
            }
        }
    }

    /// Cells whose paint differs from the screen, as `(x, y, paint)`.
    /// They count as on screen afterwards.
    fn take_changes(&mut self) -> Vec<(u16, u16, Paint)> {
        let width = self.width;
        let mut changes = vec![];

        for (i, (back, front)) in self.back.iter().zip(self.front.iter_mut()).enumerate() {
            if back != front {
                changes.push(((i % width) as u16, (i / width) as u16, *back));
                *front = *back;
            }
        }

        changes
    }
}

/// Crossterm front end: a bordered playfield on the alternate screen.
pub struct TermWindow {
    size: Coords,
    /// Terminal position of the playfield's top-left cell, inside the border.
    origin: Coords,
    field: Coords,
    stdout: Stdout,
    buffer: PaintBuffer,
    frame_interval: Duration,
    pressed: Option<Key>,
    closed: bool,
    active: bool,
}

impl TermWindow {
    pub fn open(grid: &Grid, frame_interval: Duration) -> Result<Self> {
        let size = terminal::size()?;
        let clamp = |v: i64| v.clamp(0, u16::MAX as i64) as u16;
        let (surface_w, surface_h) = grid.surface_size().map_or((i64::MAX, i64::MAX), |(w, h)| (w as i64, h as i64));
        let needed = (surface_w.saturating_add(2), surface_h.saturating_add(2));

        if needed.0 > size.0 as i64 || needed.1 > size.1 as i64 {
            return Err(GameError::TerminalTooSmall { needed: (clamp(needed.0), clamp(needed.1)), actual: size });
        }

        let field = (surface_w as u16, surface_h as u16);
        let origin = ((size.0 - field.0 - 2) / 2 + 1, (size.1 - field.1 - 2) / 2 + 1);

        let mut win = TermWindow {
            size,
            origin,
            field,
            stdout: stdout(),
            buffer: PaintBuffer::new(field.0, field.1),
            frame_interval,
            pressed: None,
            closed: false,
            active: false,
        };

        // From here on, dropping `win` puts the terminal back.
        win.setup()?;
        win.draw_borders()?;
        Ok(win)
    }

    fn setup(&mut self) -> Result<()> {
        self.active = true;
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (left, top) = (self.origin.0 - 1, self.origin.1 - 1);
        let right = self.origin.0 + self.field.0;
        let bottom = self.origin.1 + self.field.1;

        for x in left..=right {
            let ch = if x == left || x == right { '+' } else { '-' };
            queue!(self.stdout, cursor::MoveTo(x, top), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(x, bottom), style::Print(ch))?;
        }

        for y in top + 1..bottom {
            queue!(self.stdout, cursor::MoveTo(left, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(right, y), style::Print('|'))?;
        }

        self.stdout.flush()?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        for (x, y, paint) in self.buffer.take_changes() {
            queue!(
                self.stdout,
                cursor::MoveTo(self.origin.0 + x, self.origin.1 + y),
                style::SetForegroundColor(paint.fg.map_or(TermColor::Reset, term_color)),
                style::SetBackgroundColor(paint.bg.map_or(TermColor::Reset, term_color)),
                style::Print(paint.ch)
            )?;
        }

        queue!(self.stdout, style::ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Collects input until the frame deadline, then drains what is queued.
    /// The last direction key wins.
    fn pump_events(&mut self) -> Result<()> {
        self.pressed = None;
        let deadline = Instant::now() + self.frame_interval;

        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !poll(timeout)? {
                break;
            }

            if let Event::Key(ev) = read()? {
                if ev.kind != KeyEventKind::Press {
                    continue;
                }
                if is_quit(&ev) {
                    self.closed = true;
                } else if let Some(key) = direction_key(&ev) {
                    self.pressed = Some(key);
                }
            }
        }

        Ok(())
    }

    fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    /// Shows the ending and score in a centered box and waits for a key.
    pub fn show_summary(&mut self, outcome: &Outcome) -> Result<()> {
        let ending = outcome.ending.to_string();
        let score = format!("Score: {}", outcome.score);
        let length = format!("Length: {}", outcome.length);
        self.show_message(&[&ending, &score, &length, "", "Press any key to exit"])?;
        self.read_key_blocking()?;
        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 2) as u16;
        let center = (self.size.0 / 2, self.size.1 / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.stdout, style::ResetColor)?;
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(" ".repeat(msg_width as usize)))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        self.stdout.flush()?;
        Ok(())
    }
}

impl Window for TermWindow {
    fn is_closed(&self) -> bool {
        self.closed
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed == Some(key)
    }

    fn update(&mut self) -> Result<()> {
        self.present()?;
        self.pump_events()
    }
}

impl DrawTarget for TermWindow {
    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.buffer.paint(command);
    }
}

impl Drop for TermWindow {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("failed to restore terminal: {}", e);
        }
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Black => TermColor::Black,
        Color::Grey => TermColor::Grey,
        Color::Red => TermColor::Red,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    match ev.code {
        KeyCode::Char('c') => ev.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn direction_key(ev: &KeyEvent) -> Option<Key> {
    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Key::Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Key::Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Key::Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}
