//! Scoring and level progression

use crate::game::GameState;
use crate::highscore::HighScoreStore;
use std::time::Duration;

pub const LEVEL_MIN: u32 = 1;
pub const LEVEL_MAX: u32 = 10;
/// Points needed per level
const POINTS_PER_LEVEL: u64 = 600;
/// Gravity interval before the first level computation
pub const BASE_FALL_MS: u64 = 900;
/// Interval reduction per level
const FALL_STEP_MS: u64 = 80;

/// Points awarded for rows cleared by a single attach
pub fn score_for(lines: u32) -> u64 {
    match lines {
        1 => 100,
        2 => 300,
        3 => 700,
        4 => 1500,
        _ => 0,
    }
}

/// Level reached at a given score, capped at LEVEL_MAX
pub fn level_for(points: u64) -> u32 {
    let level = points / POINTS_PER_LEVEL + 1;
    level.min(LEVEL_MAX as u64) as u32
}

/// Gravity interval at a level. The level cap keeps it positive (100ms at 10).
pub fn fall_interval(level: u32) -> Duration {
    Duration::from_millis(BASE_FALL_MS - level as u64 * FALL_STEP_MS)
}

/// Score tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Best score seen, including previous sessions
    pub high_score: u64,
    /// Current level
    pub level: u32,
    /// Time between gravity steps
    pub fall_interval: Duration,
}

impl Score {
    pub fn new(high_score: u64) -> Self {
        Self {
            points: 0,
            high_score,
            level: LEVEL_MIN,
            fall_interval: Duration::from_millis(BASE_FALL_MS),
        }
    }

    /// Add points for a clear; returns true if the high score was beaten
    pub fn add_clear(&mut self, lines: u32) -> bool {
        self.points += score_for(lines);
        if self.points > self.high_score {
            self.high_score = self.points;
            return true;
        }
        false
    }

    /// Update level and gravity from the current score
    pub fn recompute_level(&mut self) {
        self.level = level_for(self.points);
        self.fall_interval = fall_interval(self.level);
    }
}

/// Clear every full row, score them and persist a beaten high score.
/// Returns the number of rows cleared.
pub fn apply_score<S: HighScoreStore + ?Sized>(state: &mut GameState, store: &mut S) -> u32 {
    let lines = state.field.clear_all_full_rows();
    if lines > 0 {
        tracing::info!("Cleared {} line(s) for {} points", lines, score_for(lines));
    }
    if state.score.add_clear(lines) {
        tracing::info!("New high score {}", state.score.high_score);
        store.save(state.score.high_score);
    }
    lines
}

/// Recompute level and gravity interval after scoring
pub fn recompute_level(state: &mut GameState) {
    let previous = state.score.level;
    state.score.recompute_level();
    if state.score.level != previous {
        tracing::info!("Level {} -> {}", previous, state.score.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FIELD_HEIGHT, FIELD_WIDTH};
    use crate::highscore::MemoryHighScore;
    use crate::piece::Piece;
    use crate::tetromino::TetrominoType;
    use std::time::Instant;

    const BOTTOM: i32 = FIELD_HEIGHT as i32 - 1;

    fn state_with_full_rows(rows: &[i32]) -> GameState {
        let mut state = GameState::new(Piece::new(TetrominoType::T), 0, Instant::now());
        for &row in rows {
            for col in 0..FIELD_WIDTH as i32 {
                state.field.set(row, col, 5);
            }
        }
        state
    }

    #[test]
    fn test_points_per_clear() {
        assert_eq!(score_for(0), 0);
        assert_eq!(score_for(1), 100);
        assert_eq!(score_for(2), 300);
        assert_eq!(score_for(3), 700);
        assert_eq!(score_for(4), 1500);
        assert_eq!(score_for(5), 0);
    }

    #[test]
    fn test_level_curve() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(599), 1);
        assert_eq!(level_for(600), 2);
        assert_eq!(level_for(1199), 2);
        assert_eq!(level_for(1200), 3);
        assert_eq!(level_for(5399), 9);
        assert_eq!(level_for(5400), 10);
        assert_eq!(level_for(1_000_000), 10);
    }

    #[test]
    fn test_fall_interval() {
        assert_eq!(fall_interval(1), Duration::from_millis(820));
        assert_eq!(fall_interval(10), Duration::from_millis(100));
    }

    #[test]
    fn test_high_score_only_on_strict_improvement() {
        let mut score = Score::new(300);
        assert!(!score.add_clear(1));
        assert_eq!(score.high_score, 300);
        // Reaching the high score exactly does not replace it
        assert!(!score.add_clear(1));
        assert!(!score.add_clear(1));
        assert_eq!(score.points, 300);
        assert!(score.add_clear(1));
        assert_eq!(score.high_score, 400);
    }

    #[test]
    fn test_tetris_reaches_level_three() {
        let mut score = Score::new(0);
        score.add_clear(4);
        score.recompute_level();
        assert_eq!(score.points, 1500);
        assert_eq!(score.level, 3);
        assert_eq!(score.fall_interval, Duration::from_millis(660));
    }

    #[test]
    fn test_new_score() {
        let score = Score::new(77);
        assert_eq!(score.points, 0);
        assert_eq!(score.level, LEVEL_MIN);
        assert_eq!(score.fall_interval, Duration::from_millis(BASE_FALL_MS));
    }

    #[test]
    fn test_apply_score_per_attach() {
        let cases: [(&[i32], u32, u64); 4] = [
            (&[BOTTOM], 1, 100),
            (&[BOTTOM, BOTTOM - 1], 2, 300),
            (&[BOTTOM, BOTTOM - 1, BOTTOM - 2], 3, 700),
            (&[BOTTOM, BOTTOM - 1, BOTTOM - 2, BOTTOM - 3], 4, 1500),
        ];
        for (rows, lines, points) in cases {
            let mut state = state_with_full_rows(rows);
            let mut store = MemoryHighScore::default();
            assert_eq!(apply_score(&mut state, &mut store), lines);
            assert_eq!(state.score.points, points);
            assert_eq!(state.score.high_score, points);
            assert_eq!(store.value, points);
            assert_eq!(store.saves, 1);
            assert!(state.field.is_empty());
        }
    }

    #[test]
    fn test_stacked_rows_score_as_one_clear() {
        // A single sweep leaves the upper row behind; it still counts as a double
        let mut state = state_with_full_rows(&[BOTTOM, BOTTOM - 1]);
        assert_eq!(state.field.clone().clear_full_rows(), 1);

        let mut store = MemoryHighScore::default();
        assert_eq!(apply_score(&mut state, &mut store), 2);
        assert_eq!(state.score.points, 300);
    }

    #[test]
    fn test_apply_score_with_gap() {
        let mut state = state_with_full_rows(&[BOTTOM, BOTTOM - 2]);
        state.field.set(BOTTOM - 1, 0, 5);
        let mut store = MemoryHighScore::default();
        assert_eq!(apply_score(&mut state, &mut store), 2);
        assert_eq!(state.score.points, 300);
        assert_eq!(state.field.get(BOTTOM, 0), Some(5));
        assert!(!state.field.is_occupied(BOTTOM, 1));
    }

    #[test]
    fn test_apply_score_without_clear() {
        let mut state = state_with_full_rows(&[]);
        let mut store = MemoryHighScore::default();
        assert_eq!(apply_score(&mut state, &mut store), 0);
        assert_eq!(state.score.points, 0);
        assert_eq!(store.saves, 0);
    }
}
