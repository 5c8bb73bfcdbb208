use std::io::{self, Write};

use crossterm::{cursor::MoveTo, execute};
use log::info;

use crate::engine::Hud;
use crate::entities::{EntityKind, EntityView};
use crate::types::{PlayArea, Vector2D};

const HUD_ROWS: u16 = 1;
const HELP_ROWS: u16 = 1;
const BAR_WIDTH: usize = 10;
const CONTROLS_HELP: &str = "Left/Right: rotate  Space: fire  P: pause  Q: quit";

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    buffer: Vec<Vec<char>>,
    width: u16,
    height: u16,
    cursor: (u16, u16),
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer { buffer: vec![vec![' '; width as usize]; height as usize], width, height, cursor: (0, 0) }
    }

    fn move_to(&mut self, x: u16, y: u16) {
        self.cursor = (x, y);
    }

    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            let (x, y) = self.cursor;
            if y < self.height && x < self.width {
                self.buffer[y as usize][x as usize] = c;
            }
            self.cursor.0 = x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer.get(y as usize).map(|row| row.iter().collect()).unwrap_or_default()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Nothing to hide or show headless
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

/// Maps world coordinates onto the terminal rows between the HUD and the help line.
/// X and Y scale independently, so circles come out as ellipses on most terminals.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    area: PlayArea,
    columns: u16,
    rows: u16,
    top: u16,
}

impl Viewport {
    pub fn new(area: PlayArea, terminal_width: u16, terminal_height: u16) -> Self {
        Viewport {
            area,
            columns: terminal_width.max(1),
            rows: terminal_height.saturating_sub(HUD_ROWS + HELP_ROWS).max(1),
            top: HUD_ROWS,
        }
    }

    pub fn to_cell(&self, point: Vector2D) -> Option<(u16, u16)> {
        if !self.area.contains_with_margin(point, 0.0) {
            return None;
        }
        let column = (point.x / self.area.width * self.columns as f64).floor() as u16;
        let row = (point.y / self.area.height * self.rows as f64).floor() as u16;
        Some((column.min(self.columns - 1), self.top + row.min(self.rows - 1)))
    }

    /// World position of the middle of a terminal cell.
    pub fn cell_center(&self, column: u16, row: u16) -> Vector2D {
        Vector2D::new(
            (column as f64 + 0.5) * self.area.width / self.columns as f64,
            ((row - self.top) as f64 + 0.5) * self.area.height / self.rows as f64,
        )
    }

    fn cell_size(&self) -> Vector2D {
        Vector2D::new(self.area.width / self.columns as f64, self.area.height / self.rows as f64)
    }
}

// --- GameGrid for geometric rendering ---
pub struct GameGrid {
    grid: Vec<Vec<char>>,
    width: u16,
    height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    pub fn write_text(&mut self, x: u16, y: u16, text: &str) {
        for (i, c) in text.chars().enumerate() {
            self.set_char(x.saturating_add(i as u16), y, c);
        }
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    pub fn draw_entity(&mut self, viewport: &Viewport, view: &EntityView) {
        match view.kind {
            EntityKind::Earth => self.fill_disc(viewport, view.position, view.radius, 'o'),
            EntityKind::Asteroid => self.fill_disc(viewport, view.position, view.radius, spin_glyph(view.angle)),
            EntityKind::Bullet => self.plot(viewport, view.position, '.'),
            EntityKind::Spaceship => self.plot(viewport, view.position, ship_glyph(view.angle)),
        }
    }

    fn plot(&mut self, viewport: &Viewport, point: Vector2D, c: char) {
        if let Some((x, y)) = viewport.to_cell(point) {
            self.set_char(x, y, c);
        }
    }

    fn fill_disc(&mut self, viewport: &Viewport, center: Vector2D, radius: f64, c: char) {
        let cell = viewport.cell_size();
        let reach_x = (radius / cell.x).ceil() as i32 + 1;
        let reach_y = (radius / cell.y).ceil() as i32 + 1;
        if let Some((cx, cy)) = viewport.to_cell(center) {
            for dy in -reach_y..=reach_y {
                for dx in -reach_x..=reach_x {
                    let (x, y) = (cx as i32 + dx, cy as i32 + dy);
                    if x < 0 || y < viewport.top as i32 || y >= (viewport.top + viewport.rows) as i32 {
                        continue;
                    }
                    let (x, y) = (x as u16, y as u16);
                    if viewport.cell_center(x, y).distance_to(center) <= radius {
                        self.set_char(x, y, c);
                    }
                }
            }
        }
        // Objects smaller than a cell still show up
        self.plot(viewport, center, c);
    }

    pub fn draw_hud(&mut self, hud: &Hud) {
        self.write_text(0, 0, &format_hud(hud));
    }

    pub fn draw_help(&mut self) {
        self.write_text(0, self.height.saturating_sub(1), CONTROLS_HELP);
    }

    pub fn draw_banner(&mut self, message: &str) {
        let x = (self.width / 2).saturating_sub(message.len() as u16 / 2);
        self.write_text(x, self.height / 2, message);
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }

    pub fn clear_screen_manual(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(self.width as usize))?;
        }
        stdout.execute_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

/// Ship nose direction; angles grow clockwise because screen Y points down.
pub fn ship_glyph(angle: f64) -> char {
    let angle = angle.rem_euclid(360.0);
    if !(45.0..315.0).contains(&angle) {
        '>'
    } else if angle < 135.0 {
        'v'
    } else if angle < 225.0 {
        '<'
    } else {
        '^'
    }
}

pub fn spin_glyph(angle: f64) -> char {
    const GLYPHS: [char; 4] = ['-', '\\', '|', '/'];
    let octant = ((angle.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize;
    GLYPHS[octant % 4]
}

pub fn health_bar(value: f64, max: f64, width: usize) -> String {
    let fraction = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (fraction * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn format_hud(hud: &Hud) -> String {
    format!(
        "SHIP {} {:>3.0}  LIVES {}  EARTH {} {:>3.0}",
        health_bar(hud.spaceship_health, hud.spaceship_max_health, BAR_WIDTH),
        hud.spaceship_health,
        hud.lives,
        health_bar(hud.earth_health, hud.earth_max_health, BAR_WIDTH),
        hud.earth_health
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        // 64 columns, 48 playfield rows
        Viewport::new(PlayArea::new(640.0, 480.0), 64, 50)
    }

    #[test]
    fn test_viewport_maps_corners_and_rejects_outside() {
        let viewport = viewport();
        assert_eq!(viewport.to_cell(Vector2D::new(0.0, 0.0)), Some((0, 1)));
        assert_eq!(viewport.to_cell(Vector2D::new(640.0, 480.0)), Some((63, 48)));
        assert_eq!(viewport.to_cell(Vector2D::new(325.0, 245.0)), Some((32, 25)));
        assert_eq!(viewport.to_cell(Vector2D::new(-1.0, 10.0)), None);
    }

    #[test]
    fn test_glyphs_follow_angle() {
        assert_eq!(ship_glyph(0.0), '>');
        assert_eq!(ship_glyph(90.0), 'v');
        assert_eq!(ship_glyph(180.0), '<');
        assert_eq!(ship_glyph(270.0), '^');
        assert_eq!(ship_glyph(350.0), '>');
        assert_eq!(spin_glyph(0.0), '-');
        assert_eq!(spin_glyph(90.0), '|');
        assert_eq!(spin_glyph(225.0), '\\');
    }

    #[test]
    fn test_health_bar_scales_and_clamps() {
        assert_eq!(health_bar(100.0, 100.0, 4), "[####]");
        assert_eq!(health_bar(50.0, 100.0, 4), "[##--]");
        assert_eq!(health_bar(-3.0, 100.0, 4), "[----]");
    }

    #[test]
    fn test_entities_land_on_grid() {
        let viewport = viewport();
        let mut grid = GameGrid::new(64, 50);
        let earth = EntityView { kind: EntityKind::Earth, position: Vector2D::new(320.0, 240.0), radius: 75.0, angle: 0.0 };
        let ship = EntityView { kind: EntityKind::Spaceship, position: Vector2D::new(420.0, 240.0), radius: 10.0, angle: 0.0 };
        grid.draw_entity(&viewport, &earth);
        grid.draw_entity(&viewport, &ship);
        assert_eq!(grid.char_at(32, 25), Some('o'));
        assert_eq!(grid.char_at(42, 25), Some('>'));
        assert_eq!(grid.char_at(0, 1), Some(' '));
    }

    #[test]
    fn test_headless_render_writes_rows() {
        let mut grid = GameGrid::new(8, 3);
        grid.write_text(0, 1, "abc");
        let mut target = OutputTarget::ScreenBuffer(ScreenBuffer::new(8, 3));
        grid.render(&mut target).unwrap();
        match target {
            OutputTarget::ScreenBuffer(sb) => assert_eq!(sb.row(1), "abc     "),
            OutputTarget::Stdout(_) => unreachable!(),
        }
    }
}
