//! Core game state and the state machine that drives it
//!
//! Each call to [`Game::step`] handles one optional user action in the
//! current state. Gravity is polled: while a piece is moving, every step
//! compares the last gravity tick with the clock.

use crate::field::{Field, FIELD_WIDTH};
use crate::generator::PieceGenerator;
use crate::highscore::HighScoreStore;
use crate::piece::Piece;
use crate::score::{self, Score};
use std::time::Instant;

/// State machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Title screen, waiting for Start
    Start,
    /// Bring the next piece into play
    Spawn,
    /// Piece under player control
    Moving,
    /// Gravity moves the piece one row
    Shifting,
    /// Piece is written into the field
    Attaching,
    GameOver,
    Pause,
    /// Terminal; the driving loop stops here
    Exit,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Start,
    Pause,
    Terminate,
    Left,
    Right,
    Down,
    /// Rotate
    Action,
}

/// Everything the renderer needs, owned by [`Game`]
#[derive(Debug, Clone)]
pub struct GameState {
    pub field: Field,
    /// Falling piece; None before the first spawn and while attaching
    pub current: Option<Piece>,
    /// Preview of the piece that spawns next
    pub next: Piece,
    pub score: Score,
    pub paused: bool,
    /// When gravity last moved the piece
    pub last_tick: Instant,
    pub state: State,
}

impl GameState {
    pub fn new(next: Piece, high_score: u64, now: Instant) -> Self {
        Self {
            field: Field::new(),
            current: None,
            next,
            score: Score::new(high_score),
            paused: false,
            last_tick: now,
            state: State::Start,
        }
    }
}

/// The state machine driver
pub struct Game<S: HighScoreStore> {
    state: GameState,
    generator: PieceGenerator,
    store: S,
}

impl<S: HighScoreStore> Game<S> {
    /// Create a new game at the title screen
    pub fn new(store: S) -> Self {
        Self::with_generator(store, PieceGenerator::new(), Instant::now())
    }

    /// Create a game with a specific generator and start time
    pub fn with_generator(store: S, mut generator: PieceGenerator, now: Instant) -> Self {
        let next = generator.generate();
        let state = GameState::new(next, store.load(), now);
        Self {
            state,
            generator,
            store,
        }
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the driving loop should stop
    pub fn is_finished(&self) -> bool {
        self.state.state == State::Exit
    }

    /// Process one step using the wall clock
    pub fn step(&mut self, action: Option<UserAction>) {
        self.step_at(action, Instant::now());
    }

    /// Process one step at a given instant
    pub fn step_at(&mut self, action: Option<UserAction>, now: Instant) {
        let from = self.state.state;
        let to = match from {
            State::Start => match action {
                Some(UserAction::Start) => State::Spawn,
                Some(UserAction::Terminate) => State::Exit,
                _ => State::Start,
            },
            State::Spawn => self.spawn(),
            State::Moving => self.moving(action, now),
            State::Shifting => self.shifting(),
            State::Attaching => self.attaching(),
            State::GameOver => match action {
                Some(UserAction::Start) => {
                    self.reset(now);
                    State::Spawn
                }
                Some(UserAction::Terminate) => State::Exit,
                _ => State::GameOver,
            },
            State::Pause => match action {
                Some(UserAction::Pause) => {
                    self.state.paused = false;
                    self.state.last_tick = now;
                    State::Moving
                }
                Some(UserAction::Terminate) => State::Exit,
                _ => State::Pause,
            },
            State::Exit => State::Exit,
        };

        if to != from {
            tracing::debug!("{:?} -> {:?}", from, to);
        }
        self.state.state = to;
    }

    /// Move the preview piece to the top centre and draw a new preview
    fn spawn(&mut self) -> State {
        let mut piece = std::mem::replace(&mut self.state.next, self.generator.generate());
        piece.x = FIELD_WIDTH as i32 / 2 - 2;
        piece.y = piece.kind.spawn_row();

        let blocked = self.state.field.overlaps(&piece);
        // Lift the piece clear of the stack so the final frame shows it intact
        while self.state.field.overlaps(&piece) {
            piece.y -= 1;
        }
        self.state.current = Some(piece);

        if blocked {
            tracing::info!("Game over with score {}", self.state.score.points);
            State::GameOver
        } else {
            State::Moving
        }
    }

    fn moving(&mut self, action: Option<UserAction>, now: Instant) -> State {
        let field = &self.state.field;
        let Some(piece) = self.state.current.as_mut() else {
            return State::Spawn;
        };

        let mut next = State::Moving;
        match action {
            Some(UserAction::Left) => {
                piece.move_left(field);
            }
            Some(UserAction::Right) => {
                piece.move_right(field);
            }
            Some(UserAction::Down) => {
                piece.hard_drop(field);
            }
            Some(UserAction::Action) => {
                piece.rotate(field);
            }
            Some(UserAction::Pause) => {
                self.state.paused = true;
                next = State::Pause;
            }
            Some(UserAction::Terminate) => next = State::Exit,
            Some(UserAction::Start) | None => {}
        }

        // Gravity is checked on every moving step, but never overrides
        // a pause or exit requested in the same step
        if now.duration_since(self.state.last_tick) >= self.state.score.fall_interval {
            self.state.last_tick = now;
            if next == State::Moving {
                next = State::Shifting;
            }
        }
        next
    }

    fn shifting(&mut self) -> State {
        let field = &self.state.field;
        let Some(piece) = self.state.current.as_mut() else {
            return State::Spawn;
        };
        piece.move_down(field);
        if field.collision(piece).bottom {
            State::Attaching
        } else {
            State::Moving
        }
    }

    fn attaching(&mut self) -> State {
        if let Some(piece) = self.state.current.take() {
            self.state.field.attach(&piece);
        }
        score::apply_score(&mut self.state, &mut self.store);
        score::recompute_level(&mut self.state);
        State::Spawn
    }

    /// Back to a fresh field and score. The session's high score is kept
    /// even if the store never managed to persist it.
    fn reset(&mut self, now: Instant) {
        let next = self.generator.generate();
        let high_score = self.state.score.high_score.max(self.store.load());
        self.state = GameState::new(next, high_score, now);
        tracing::info!("Restarting, high score {}", self.state.score.high_score);
    }
}
