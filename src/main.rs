//! Terminal 2048 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer-based renderer from
//! `tui_2048::term`. The game is turn based: the loop blocks on the next
//! terminal event and redraws after each one.

use anyhow::Result;
use clap::builder::TypedValueParser;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tui_2048::core::GameState;
use tui_2048::input::{handle_key_event, should_quit, UiAction};
use tui_2048::term::{FrameBuffer, GameView, TerminalRenderer, ViewState, Viewport};
use tui_2048::types::{DEFAULT_BOARD_SIZE, MAX_PLAYER_BOARD_SIZE, MIN_PLAYER_BOARD_SIZE};

#[derive(Parser, Debug)]
#[command(version, about = "Play 2048 in the terminal")]
struct Args {
    /// Board side length.
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE,
          value_parser = clap::value_parser!(u8).range(MIN_PLAYER_BOARD_SIZE as i64..=MAX_PLAYER_BOARD_SIZE as i64).map(usize::from))]
    size: usize,
    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
}

/// Client-side game session: the game plus what the view needs between frames.
struct App {
    game: GameState,
    size: usize,
    last_delta: u64,
    show_help: bool,
}

impl App {
    fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        Ok(Self {
            game: GameState::new(size, rng)?,
            size,
            last_delta: 0,
            show_help: false,
        })
    }

    fn view_state(&self) -> ViewState<'_> {
        ViewState {
            game: &self.game,
            last_delta: self.last_delta,
            show_help: self.show_help,
        }
    }

    fn restart<R: Rng + ?Sized>(&mut self, size: usize, rng: &mut R) -> Result<()> {
        self.game.restart(size, rng)?;
        self.size = size;
        self.last_delta = 0;
        Ok(())
    }

    /// Apply one UI action. Moves are ignored once the game has ended.
    fn handle<R: Rng + ?Sized>(&mut self, action: UiAction, rng: &mut R) -> Result<()> {
        if self.game.is_terminal() && !action.allowed_when_finished() {
            return Ok(());
        }
        match action {
            UiAction::Move(direction) => {
                let result = self.game.apply_move(direction, rng);
                if result.moved {
                    self.last_delta = result.score_delta;
                }
            }
            UiAction::Restart => self.restart(self.size, rng)?,
            UiAction::Grow => {
                let size = (self.size + 1).min(MAX_PLAYER_BOARD_SIZE);
                self.restart(size, rng)?;
            }
            UiAction::Shrink => {
                let size = self.size.saturating_sub(1).max(MIN_PLAYER_BOARD_SIZE);
                self.restart(size, rng)?;
            }
            UiAction::ToggleHelp => self.show_help = !self.show_help,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut app = App::new(args.size, &mut rng)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app, &mut rng);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, app: &mut App, rng: &mut StdRng) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&app.view_state(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    app.handle(action, rng)?;
                }
            }
            Event::Resize(_, _) => term.invalidate(),
            _ => {}
        }
    }
}
