//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameState;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{tile_rank, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything the view needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub game: &'a GameState,
    /// Score gained by the most recent move, shown as `+N` when non-zero.
    pub last_delta: u64,
    pub show_help: bool,
}

impl<'a> ViewState<'a> {
    pub fn new(game: &'a GameState) -> Self {
        Self {
            game,
            last_delta: 0,
            show_help: false,
        }
    }
}

/// Rows reserved above and below the board for the header and footer.
const HEADER_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 2;

const SCREEN_BG: Rgb = Rgb::hex(0x000000);
const BOARD_BG: Rgb = Rgb::hex(0x3c3a32);
const EMPTY_TILE_BG: Rgb = Rgb::hex(0x5a564c);
const DARK_TEXT: Rgb = Rgb::hex(0x776e65);
const LIGHT_TEXT: Rgb = Rgb::hex(0xf9f6f2);

/// Background per tile rank 1..=11 (2 through 2048).
const TILE_BG: [Rgb; 11] = [
    Rgb::hex(0xeee4da),
    Rgb::hex(0xede0c8),
    Rgb::hex(0xf2b179),
    Rgb::hex(0xf59563),
    Rgb::hex(0xf67c5f),
    Rgb::hex(0xf65e3b),
    Rgb::hex(0xedcf72),
    Rgb::hex(0xedcc61),
    Rgb::hex(0xedc850),
    Rgb::hex(0xedc53f),
    Rgb::hex(0xedc22e),
];

/// Style for a tile value. Ranks above 11 reuse the 2048 color.
pub fn tile_style(value: Tile) -> CellStyle {
    let rank = tile_rank(value);
    if rank == 0 {
        return CellStyle::new(DARK_TEXT, EMPTY_TILE_BG).dim();
    }
    let rank = rank.clamp(1, 11) as usize;
    let fg = if rank <= 2 { DARK_TEXT } else { LIGHT_TEXT };
    CellStyle::new(fg, TILE_BG[rank - 1]).bold()
}

/// Terminal cells per board tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    pub w: u16,
    pub h: u16,
}

impl TileSize {
    pub const LARGE: TileSize = TileSize { w: 8, h: 3 };
    pub const COMPACT: TileSize = TileSize { w: 6, h: 1 };
}

/// A lightweight terminal renderer for the 2048 board.
pub struct GameView {
    preferred: TileSize,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            preferred: TileSize::LARGE,
        }
    }
}

impl GameView {
    /// Tile size used for an `n x n` board in `viewport`.
    ///
    /// Falls back to the compact size when the preferred one does not fit.
    pub fn tile_size_for(&self, n: usize, viewport: Viewport) -> TileSize {
        let fits = |t: TileSize| {
            let (w, h) = frame_size(n, t);
            w <= viewport.width && h + HEADER_ROWS + FOOTER_ROWS <= viewport.height
        };
        if fits(self.preferred) {
            self.preferred
        } else {
            TileSize::COMPACT
        }
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, view: &ViewState<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::blank(CellStyle::new(LIGHT_TEXT, SCREEN_BG)));

        let game = view.game;
        let n = game.size();
        let tile = self.tile_size_for(n, viewport);
        let (frame_w, frame_h) = frame_size(n, tile);

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let total_h = frame_h + HEADER_ROWS + FOOTER_ROWS;
        let start_y = viewport.height.saturating_sub(total_h) / 2 + HEADER_ROWS;

        self.draw_header(fb, view, start_x, start_y.saturating_sub(HEADER_ROWS));

        fb.fill_rect(start_x, start_y, frame_w, frame_h, ' ', CellStyle::new(LIGHT_TEXT, BOARD_BG));
        fb.draw_box(start_x, start_y, frame_w, frame_h, CellStyle::new(DARK_TEXT, BOARD_BG));

        for (row, values) in game.board().iter_rows().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let x = start_x + 1 + col as u16 * tile.w;
                let y = start_y + 1 + row as u16 * tile.h;
                self.draw_tile(fb, x, y, tile, value);
            }
        }

        self.draw_footer(fb, view, start_x, start_y + frame_h, frame_w);

        if view.show_help {
            self.draw_help(fb, viewport);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, view: &ViewState<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(view, viewport, &mut fb);
        fb
    }

    fn draw_header(&self, fb: &mut FrameBuffer, view: &ViewState<'_>, x: u16, y: u16) {
        let title = CellStyle::new(Rgb::hex(0xedc22e), SCREEN_BG).bold();
        let label = CellStyle::new(Rgb::hex(0xbbada0), SCREEN_BG);
        let value = CellStyle::new(LIGHT_TEXT, SCREEN_BG).bold();
        let delta = CellStyle::new(Rgb::hex(0x8fd18f), SCREEN_BG).bold();

        let n = view.game.size();
        let mut cx = fb.put_str(x, y, "2048", title);
        cx = fb.put_str(cx + 1, y, &format!("{}x{}", n, n), label);
        cx = fb.put_str(cx + 2, y, "SCORE ", label);
        cx = fb.put_str(cx, y, &view.game.score().to_string(), value);
        if view.last_delta > 0 {
            fb.put_str(cx + 1, y, &format!("+{}", view.last_delta), delta);
        }
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, x: u16, y: u16, tile: TileSize, value: Tile) {
        let style = tile_style(value);
        if value == 0 {
            fb.fill_rect(x, y, tile.w, tile.h, ' ', style);
            fb.put_char(x + tile.w / 2, y + tile.h / 2, '·', style);
            return;
        }
        fb.fill_rect(x, y, tile.w, tile.h, ' ', style);
        fb.put_str_centered(x, y + tile.h / 2, tile.w, &value.to_string(), style);
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, view: &ViewState<'_>, x: u16, y: u16, w: u16) {
        let game = view.game;
        if game.won() {
            let style = CellStyle::new(Rgb::hex(0x000000), Rgb::hex(0xedc22e)).bold();
            fb.put_str_centered(x, y, w, " YOU WIN! press r to play again ", style);
        } else if game.game_over() {
            let style = CellStyle::new(LIGHT_TEXT, Rgb::hex(0xa03020)).bold();
            fb.put_str_centered(x, y, w, " GAME OVER  press r to restart ", style);
        }

        let hint = CellStyle::new(Rgb::hex(0x8a8a8a), SCREEN_BG).dim();
        fb.put_str_centered(x, y + 1, w, "? help  q quit", hint);
    }

    fn draw_help(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        const LINES: [&str; 6] = [
            "arrows / wasd / hjkl  move",
            "r                     restart",
            "+ / -                 board size",
            "?                     close help",
            "q / ctrl-c            quit",
            "",
        ];
        let inner_w = LINES.iter().map(|l| l.len() as u16).max().unwrap_or(0) + 2;
        let box_w = inner_w + 2;
        let box_h = LINES.len() as u16 + 2;
        let x = viewport.width.saturating_sub(box_w) / 2;
        let y = viewport.height.saturating_sub(box_h) / 2;

        let panel = CellStyle::new(LIGHT_TEXT, Rgb::hex(0x202028));
        fb.fill_rect(x, y, box_w, box_h, ' ', panel);
        fb.draw_box(x, y, box_w, box_h, panel.bold());
        fb.put_str_centered(x, y, box_w, " HELP ", panel.bold());
        for (i, line) in LINES.iter().enumerate() {
            fb.put_str(x + 2, y + 1 + i as u16, line, panel);
        }
    }
}

fn frame_size(n: usize, tile: TileSize) -> (u16, u16) {
    let n = n as u16;
    (n * tile.w + 2, n * tile.h + 2)
}
