use crate::config::Geometry;
use crate::error::{GameError, Result};
use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Ctrl+C. Raw mode swallows the signal, so it arrives as a key.
    Interrupt,
    Other,
}

/// Rectangle on screen: origin row/column plus size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub row: TermInt,
    pub col: TermInt,
    pub height: TermInt,
    pub width: TermInt,
}

impl Region {
    pub fn new(origin: Coords, height: TermInt, width: TermInt) -> Self {
        Region { row: origin.1, col: origin.0, height, width }
    }
}

pub trait DrawSurface {
    /// Blanks the frame being composed.
    fn clear(&mut self);

    /// Paints `rows` top to bottom starting at the region's origin. Anything
    /// outside the region is clipped.
    fn paint(&mut self, region: Region, rows: &[&str]);

    /// Puts the composed frame on screen.
    fn show(&mut self) -> Result<()>;
}

pub trait InputSource {
    fn poll_key(&mut self) -> Result<Option<Key>>;
    fn wait_key(&mut self) -> Result<Key>;
}

/// Double buffered character grid over the real terminal. `back` is the frame
/// being composed, `screen` mirrors what the terminal currently shows.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    back: Vec<char>,
    active: bool,
}

impl TermManager {
    pub fn new(geometry: &Geometry) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        if cols < geometry.cols || rows < geometry.rows {
            return Err(GameError::TerminalTooSmall {
                have_cols: cols,
                have_rows: rows,
                need_cols: geometry.cols,
                need_rows: geometry.rows,
            });
        }

        let (width, height) = (geometry.cols, geometry.rows);
        let cells = width as usize * height as usize;
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen: vec![' '; cells],
            back: vec![' '; cells],
            active: false,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl DrawSurface for TermManager {
    fn clear(&mut self) {
        self.back.iter_mut().for_each(|ch| *ch = ' ');
    }

    fn paint(&mut self, region: Region, rows: &[&str]) {
        paint_into(&mut self.back, (self.width, self.height), region, rows);
    }

    fn show(&mut self) -> Result<()> {
        for (x, y, ch) in sync_cells(&self.back, &mut self.screen, self.width) {
            queue!(self.stdout, cursor::MoveTo(x, y), style::Print(ch))?;
        }

        self.stdout.flush()?;
        Ok(())
    }
}

impl InputSource for TermManager {
    fn poll_key(&mut self) -> Result<Option<Key>> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                return Ok(Some(to_key(ev)));
            }
        }

        Ok(None)
    }

    fn wait_key(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(to_key(ev));
            }
        }
    }
}

/// Writes `rows` into a row-major grid of `size` (width, height), clipped to
/// both the region and the grid.
pub fn paint_into(grid: &mut [char], size: (TermInt, TermInt), region: Region, rows: &[&str]) {
    let (width, height) = size;

    for (dy, line) in rows.iter().take(region.height as usize).enumerate() {
        let y = region.row as usize + dy;
        if y >= height as usize {
            break;
        }

        for (dx, ch) in line.chars().take(region.width as usize).enumerate() {
            let x = region.col as usize + dx;
            if x >= width as usize {
                break;
            }
            grid[width as usize * y + x] = ch;
        }
    }
}

/// Copies `back` into `screen` and returns the cells that changed as
/// (column, row, char).
fn sync_cells(back: &[char], screen: &mut [char], width: TermInt) -> Vec<(TermInt, TermInt, char)> {
    let mut changed = vec![];

    for (i, (&ch, shown)) in back.iter().zip(screen.iter_mut()).enumerate() {
        if ch != *shown {
            *shown = ch;
            changed.push(((i % width as usize) as TermInt, (i / width as usize) as TermInt, ch));
        }
    }

    changed
}

fn to_key(ev: KeyEvent) -> Key {
    match ev.code {
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_rows(grid: &[char], width: usize) -> Vec<String> {
        grid.chunks(width).map(|row| row.iter().collect()).collect()
    }

    #[test]
    fn paint_clips_to_region() {
        let mut grid = vec!['.'; 6 * 3];
        paint_into(&mut grid, (6, 3), Region::new((1, 0), 2, 3), &["abcdef", "ghijkl", "mnopqr"]);
        assert_eq!(grid_rows(&grid, 6), vec![".abc..", ".ghi..", "......"]);
    }

    #[test]
    fn paint_clips_to_grid() {
        let mut grid = vec!['.'; 4 * 2];
        paint_into(&mut grid, (4, 2), Region::new((2, 1), 5, 5), &["xyz", "uvw"]);
        assert_eq!(grid_rows(&grid, 4), vec!["....", "..xy"]);
    }

    #[test]
    fn only_changed_cells_are_redrawn() {
        let back: Vec<char> = "ab..cd".chars().collect();
        let mut screen: Vec<char> = "ab.xc.".chars().collect();

        let changed = sync_cells(&back, &mut screen, 3);
        assert_eq!(changed, vec![(0, 1, '.'), (2, 1, 'd')]);
        assert_eq!(screen, back);
        assert!(sync_cells(&back, &mut screen, 3).is_empty());
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let ev = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(to_key(ev), Key::Interrupt);

        let ev = KeyEvent { code: KeyCode::Char('P'), modifiers: KeyModifiers::SHIFT };
        assert_eq!(to_key(ev), Key::Char('p'));

        let ev = KeyEvent { code: KeyCode::Esc, modifiers: KeyModifiers::NONE };
        assert_eq!(to_key(ev), Key::Other);
    }
}
