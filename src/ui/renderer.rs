/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Drawing is a pure read of the session: one compose function per scene,
/// chosen by an exhaustive match.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, SetTitle},
};

use crate::config::GameConfig;
use crate::domain::entity::{Direction, PlayerState};
use crate::domain::map::GameMap;
use crate::sim::scene::{self, MenuItem, Scene, SceneId};
use crate::sim::session::GameSession;
use crate::sim::store::LevelId;
use super::backdrop::Backdrop;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// terminal's own default never shows through between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column; clipped at the edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Write a string centred on column `cx`.
    fn put_centered(&mut self, cx: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        self.put_str(cx.saturating_sub(len / 2), y, s, fg, bg);
    }

    /// Darken every cell; used behind overlays.
    fn dim(&mut self) {
        for cell in &mut self.cells {
            cell.fg = shade(cell.fg, 3);
            cell.bg = shade(cell.bg, 3);
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Corridor geometry ──

/// Depth rings drawn in the first-person view.
const RINGS: usize = 5;

/// What a single view cell shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ViewPart {
    Ceiling(usize),
    Floor(usize),
    /// Side wall at depth `ring`; `open` when a tile lies beyond it.
    Side { ring: usize, left: bool },
    /// Map boundary straight ahead.
    EndWall(usize),
    /// Corridor continues past the last drawn ring.
    Void,
}

/// Classify view cell (c, r) of a `w`×`h` view for a player who can walk
/// `ahead` more tiles in the facing direction.
fn corridor_cell(c: usize, r: usize, w: usize, h: usize, ahead: usize) -> ViewPart {
    let half_w = (w as f32 / 2.0).max(1.0);
    let half_h = (h as f32 / 2.0).max(1.0);
    let hx = c.min(w - 1 - c) as f32 / half_w;
    let hy = r.min(h - 1 - r) as f32 / half_h;
    let ring_x = ((hx * RINGS as f32) as usize).min(RINGS - 1);
    let ring_y = ((hy * RINGS as f32) as usize).min(RINGS - 1);
    let ring = ring_x.min(ring_y);

    if ring > ahead {
        return ViewPart::EndWall(ahead + 1);
    }
    if ring == RINGS - 1 {
        return ViewPart::Void;
    }
    if ring_x < ring_y {
        ViewPart::Side { ring, left: c < w / 2 }
    } else if r < h / 2 {
        ViewPart::Ceiling(ring)
    } else {
        ViewPart::Floor(ring)
    }
}

/// Is there a walkable tile beside the corridor at `ring` tiles ahead?
fn side_open(map: &GameMap, p: &PlayerState, ring: usize, left: bool) -> bool {
    let (dx, dy) = p.facing.delta();
    let side = if left { p.facing.turn_left() } else { p.facing.turn_right() };
    let (sx, sy) = side.delta();
    let k = ring as i32;
    map.in_bounds(p.x + dx * k + sx, p.y + dy * k + sy)
}

/// Darken a colour by `ring` steps.
fn shade(color: Color, ring: usize) -> Color {
    match color {
        Color::Rgb { r, g, b } => {
            let f = 1.0 - ring as f32 * 0.15;
            let s = |v: u8| (v as f32 * f) as u8;
            Color::Rgb { r: s(r), g: s(g), b: s(b) }
        }
        other => other,
    }
}

fn facing_arrow(d: Direction) -> char {
    match d {
        Direction::North => '▲',
        Direction::East => '▶',
        Direction::South => '▼',
        Direction::West => '◀',
    }
}

// ── Renderer ──

/// Each minimap cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Layout rows/cols
const HUD_ROW: usize = 0;
const VIEW_ROW: usize = 2;
const VIEW_COL: usize = 1;
const VIEW_W: usize = 48;
const VIEW_H: usize = 18;
const MAP_COL: usize = VIEW_COL + VIEW_W + 3;

const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const BUTTON_BG: Color = Color::Rgb { r: 130, g: 130, b: 130 };
const BUTTON_HOVER: Color = Color::Rgb { r: 200, g: 200, b: 200 };
const EXIT_BG: Color = Color::Rgb { r: 190, g: 33, b: 55 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_scene: Option<SceneId>,
    pad_connected: bool,
    message: String,
    message_timer: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_scene: None,
            pad_connected: false,
            message: String::new(),
            message_timer: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
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

    /// Show a message bar for `frames` frames.
    pub fn set_message(&mut self, msg: &str, frames: u32) {
        self.message = msg.to_string();
        self.message_timer = frames;
    }

    pub fn render(&mut self, session: &GameSession, config: &GameConfig, pad_connected: bool) -> io::Result<()> {
        self.pad_connected = pad_connected;

        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Scene change → clear for clean transition
        let scene_id = session.scene_id();
        if self.last_scene != Some(scene_id) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            let title = match session.displayed_level() {
                Some(level) => format!("Gridcrawl - {}", config.level(level).name),
                None => "Gridcrawl".to_string(),
            };
            queue!(self.writer, SetTitle(title))?;
            self.last_scene = Some(scene_id);
        }

        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 { self.message.clear(); }
        }

        self.front.clear();

        match &session.scene {
            Scene::MainMenu { cursor } => self.compose_main_menu(session, config, *cursor),
            Scene::Level(active) => {
                self.compose_level(session, config, active.level, &active.player, &active.map);
            }
            Scene::Pause { level, cursor } => {
                // Background: the paused level as it was saved.
                let slot = session.store.slot(*level);
                self.compose_level(session, config, *level, &slot.player, &slot.map);
                self.front.dim();
                self.compose_pause_overlay(session, config, *level, *cursor);
            }
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last_pos: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                // Position cursor unless we're right after the last write
                let contiguous = matches!(last_pos, Some((lx, ly)) if ly == y && lx + 1 == x);
                if !contiguous {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_pos = Some((x, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_main_menu(&mut self, session: &GameSession, config: &GameConfig, cursor: usize) {
        let cx = self.front.width / 2;
        let title_bg = Color::Rgb { r: 0, g: 82, b: 172 };
        for y in 0..self.front.height {
            self.front.fill_row(y, title_bg);
        }

        self.front.put_centered(cx, 2, "╔══════════════════════╗", Color::White, title_bg);
        self.front.put_centered(cx, 3, "║      MAIN  MENU      ║", Color::White, title_bg);
        self.front.put_centered(cx, 4, "╚══════════════════════╝", Color::White, title_bg);

        let items = scene::main_menu_items(&session.store);
        self.compose_buttons(config, &items, cursor, 7);

        let help_row = 7 + items.len() * 2 + 2;
        let help = "↑↓/WS select   ENTER confirm   1-9 level   ESC quit";
        self.front.put_centered(cx, help_row, help, Color::Grey, title_bg);
        let score = format!("Score: {}", session.score);
        self.front.put_centered(cx, help_row + 1, &score, GOLD, title_bg);
    }

    /// Menu rows drawn as buttons, one blank row apart.
    fn compose_buttons(&mut self, config: &GameConfig, items: &[MenuItem], cursor: usize, top: usize) {
        const BUTTON_W: usize = 32;
        let left = (self.front.width / 2).saturating_sub(BUTTON_W / 2);

        for (i, item) in items.iter().enumerate() {
            let row = top + i * 2;
            if row >= self.front.height { break; }

            let label = match item {
                MenuItem::Resume => "RESUME".to_string(),
                MenuItem::Level(l) => format!("Level {}: {}", l, config.level(*l).name),
                MenuItem::MainMenu => "MAIN MENU".to_string(),
                MenuItem::Exit => "EXIT GAME".to_string(),
            };
            let hover = i == cursor;
            let fill = match (item, hover) {
                (_, true) => BUTTON_HOVER,
                (MenuItem::Exit, false) => EXIT_BG,
                _ => BUTTON_BG,
            };

            for x in left..left + BUTTON_W {
                self.front.set(x, row, Cell::new(' ', Color::Black, fill));
            }
            let marker = if hover { "▸" } else { " " };
            self.front.put_str(left + 1, row, marker, Color::Black, fill);
            let lx = left + (BUTTON_W.saturating_sub(label.chars().count())) / 2;
            self.front.put_str(lx, row, &label, Color::Black, fill);
            // drop shadow
            self.front.set(left + BUTTON_W, row, Cell::new(' ', Color::Black, Color::Rgb { r: 40, g: 40, b: 40 }));
        }
    }

    fn compose_level(
        &mut self,
        session: &GameSession,
        config: &GameConfig,
        level: LevelId,
        player: &PlayerState,
        map: &GameMap,
    ) {
        let entry = config.level(level);

        // ── HUD row ──
        let hud = format!(
            " Lvl: {} ({}) | X: {} Y: {} | Facing: {} | Score: {} ",
            level, entry.name, player.x, player.y, player.facing.name(), session.score,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        self.compose_view(&entry.theme.backdrop(), player, map);
        self.compose_minimap(player, map);

        // ── Message bar ──
        let msg_row = VIEW_ROW + VIEW_H + 1;
        if !self.message.is_empty() && msg_row < self.front.height {
            let msg = format!(" ◈ {} ", self.message);
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &msg, Color::Black, MSG_BG);
        }

        // ── Help bar ──
        let help_row = VIEW_ROW + VIEW_H + 3;
        if help_row < self.front.height {
            let help = if self.pad_connected {
                " W/↑:Forward  A/←:Turn L  D/→:Turn R  ESC:Pause  │  Pad: D-pad, Start"
            } else {
                " W/↑:Forward  A/←:Turn L  D/→:Turn R  ESC:Pause"
            };
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    /// First-person corridor view, looking along the player's facing.
    fn compose_view(&mut self, bd: &Backdrop, player: &PlayerState, map: &GameMap) {
        let ahead = map.run_length(player.x, player.y, player.facing.delta());

        for r in 0..VIEW_H {
            for c in 0..VIEW_W {
                let cell = match corridor_cell(c, r, VIEW_W, VIEW_H, ahead) {
                    ViewPart::Ceiling(ring) => Cell::new(' ', Color::White, shade(bd.ceiling, ring)),
                    ViewPart::Floor(ring) => Cell::new(' ', Color::White, shade(bd.floor, ring)),
                    ViewPart::Side { ring, left } => {
                        if side_open(map, player, ring, left) {
                            Cell::new(' ', Color::White, shade(bd.edge, ring))
                        } else {
                            let base = if ring < 2 { bd.wall } else { bd.wall_far };
                            Cell::new(bd.texture, shade(base, ring + 1), shade(base, ring))
                        }
                    }
                    ViewPart::EndWall(depth) => {
                        Cell::new(bd.texture, shade(bd.wall_far, depth + 1), shade(bd.wall_far, depth))
                    }
                    ViewPart::Void => Cell::new(' ', Color::White, Cell::BASE_BG),
                };
                self.front.set(VIEW_COL + c, VIEW_ROW + r, cell);
            }
        }
    }

    fn compose_minimap(&mut self, player: &PlayerState, map: &GameMap) {
        let grid_bg = Color::Rgb { r: 30, g: 30, b: 45 };
        for y in 0..map.height() {
            let row = VIEW_ROW + y;
            if row >= self.front.height { break; }
            for x in 0..map.width() {
                let col = MAP_COL + x * CELL_W;
                if col + 1 >= self.front.width { break; }

                let (gx, gy) = (x as i32, y as i32);
                let cell = if (gx, gy) == (player.x, player.y) {
                    Cell::new(facing_arrow(player.facing), Color::Yellow, grid_bg)
                } else if map.tile(gx, gy).is_some_and(|t| t.is_claimed) {
                    Cell::new('◆', GOLD, grid_bg)
                } else {
                    Cell::new('·', Color::DarkGrey, grid_bg)
                };
                self.front.set(col, row, cell);
                self.front.set(col + 1, row, Cell::new(' ', Color::White, grid_bg));
            }
        }
    }

    fn compose_pause_overlay(&mut self, session: &GameSession, config: &GameConfig, level: LevelId, cursor: usize) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };

        let items = scene::pause_menu_items(&session.store, level);
        let box_w = 40_usize.min(self.front.width);
        let box_h = (items.len() * 2 + 6).min(self.front.height.saturating_sub(VIEW_ROW));
        let box_x = (self.front.width.saturating_sub(box_w)) / 2;
        let box_y = VIEW_ROW;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::Reset, dim));
            }
        }

        let cx = box_x + box_w / 2;
        self.front.put_centered(cx, box_y + 1, "╔══════════════════╗", hdr, dim);
        self.front.put_centered(cx, box_y + 2, "║      PAUSED      ║", hdr, dim);
        self.front.put_centered(cx, box_y + 3, "╚══════════════════╝", hdr, dim);

        self.compose_buttons(config, &items, cursor, box_y + 5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_edges_and_centre() {
        // corners are nearest ring
        assert!(matches!(corridor_cell(0, 0, 48, 18, 4), ViewPart::Ceiling(0) | ViewPart::Side { ring: 0, .. }));
        // left edge mid-height is a near side wall
        assert_eq!(corridor_cell(0, 9, 48, 18, 4), ViewPart::Side { ring: 0, left: true });
        assert_eq!(corridor_cell(47, 9, 48, 18, 4), ViewPart::Side { ring: 0, left: false });
        // top edge centre is ceiling, bottom edge centre is floor
        assert_eq!(corridor_cell(24, 0, 48, 18, 4), ViewPart::Ceiling(0));
        assert_eq!(corridor_cell(24, 17, 48, 18, 4), ViewPart::Floor(0));
    }

    #[test]
    fn corridor_end_wall_when_blocked() {
        // facing the map edge: nothing ahead, centre shows the wall
        assert_eq!(corridor_cell(24, 9, 48, 18, 0), ViewPart::EndWall(1));
        // long corridor fades to void
        assert_eq!(corridor_cell(24, 9, 48, 18, 9), ViewPart::Void);
    }

    #[test]
    fn side_openings_follow_map() {
        let map = GameMap::new(10, 10);
        let p = PlayerState::new(0, 5, Direction::North);
        assert!(!side_open(&map, &p, 0, true)); // west of x=0 is outside
        assert!(side_open(&map, &p, 0, false));
    }

    #[test]
    fn shade_darkens() {
        let c = Color::Rgb { r: 100, g: 100, b: 100 };
        assert_eq!(shade(c, 0), c);
        assert!(matches!(shade(c, 2), Color::Rgb { r, .. } if r < 100));
    }

    #[test]
    fn put_str_clips() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abcd", Color::White, Color::Reset);
        assert_eq!(fb.get(3, 0).ch, 'b');
        assert_eq!(fb.get(0, 0), Cell::BLANK);
    }
}
