//! Terminal UI rendering with ratatui
//!
//! Drawing only reads the [`GameState`] snapshot; nothing here mutates the game.

use crate::field::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::game::{GameState, State};
use crate::piece::Piece;
use crate::settings::DisplaySettings;
use crate::tetromino;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Total width needed: field(22) + side panel(24) = 46
const GAME_WIDTH: u16 = 46;
/// Total height needed: field(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

/// Terminal color for a cell color code
pub fn color_for(code: u8) -> Color {
    match code {
        tetromino::RED => Color::Red,
        tetromino::GREEN => Color::Green,
        tetromino::BLUE => Color::Blue,
        tetromino::CYAN => Color::Cyan,
        tetromino::ORANGE => Color::Rgb(204, 110, 0),
        tetromino::YELLOW => Color::Rgb(230, 230, 0),
        tetromino::VIOLET => Color::Rgb(113, 26, 204),
        _ => Color::White,
    }
}

/// Render one frame for the current state
pub fn render(frame: &mut Frame, state: &GameState, display: &DisplaySettings, title_pieces: &[Piece]) {
    let area = frame.area();
    match state.state {
        State::Start | State::Exit => render_start(frame, area, title_pieces, display.block_chars()),
        _ => render_game(frame, area, state, display.block_chars()),
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Title screen with a scatter of random pieces
fn render_start(frame: &mut Frame, area: Rect, pieces: &[Piece], block_char: &str) {
    let screen = center_rect(area, GAME_WIDTH, GAME_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(screen);
    frame.render_widget(block, screen);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4), // Pieces
            Constraint::Length(6), // Title
            Constraint::Min(1),
            Constraint::Length(2), // Hints
        ])
        .split(inner);

    if !pieces.is_empty() {
        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, pieces.len() as u32); pieces.len()])
            .split(layout[1]);
        for (piece, slot) in pieces.iter().zip(slots.iter()) {
            render_mini_piece(frame, *slot, piece, block_char);
        }
    }

    let title_lines = vec![
        Line::styled("█▀▄ █▀█ █ █▀▀ █▄▀ █▀▀ ▄▀█ █   █  ", Style::default().fg(Color::Cyan)),
        Line::styled("█▄█ █▀▄ █ █▄▄ █ █ █▀  █▀█ █▄▄ █▄▄", Style::default().fg(Color::Cyan)),
    ];
    let title = Paragraph::new(title_lines).alignment(Alignment::Center);
    frame.render_widget(title, layout[2]);

    let hints = vec![
        Line::styled("ENTER - start game", Style::default().fg(Color::Yellow).slow_blink()),
        Line::styled("    q - exit      ", Style::default().fg(Color::Yellow).slow_blink()),
    ];
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), layout[4]);
}

fn render_game(frame: &mut Frame, area: Rect, state: &GameState, block_char: &str) {
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Create main layout: field | stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(FIELD_WIDTH as u16 * 2 + 2),
            Constraint::Min(20),
        ])
        .split(game_area);

    render_field(frame, main_layout[0], state, block_char);

    let panel = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = panel.inner(main_layout[1]);
    frame.render_widget(panel, main_layout[1]);

    if state.state == State::GameOver {
        render_game_over(frame, inner, state);
        return;
    }

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Score, high score, level
            Constraint::Length(4), // Next
            Constraint::Min(6),    // Controls
        ])
        .split(inner);

    render_stats(frame, right_layout[0], state);
    render_mini_piece(frame, right_layout[1], &state.next, block_char);
    render_controls(frame, right_layout[2]);

    if state.state == State::Pause {
        render_overlay(frame, main_layout[0], "PAUSE", "p - resume");
    }
}

/// Render the field with the falling piece drawn over it
fn render_field(frame: &mut Frame, area: Rect, state: &GameState, block_char: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut grid = *state.field.rows();
    // Blocks still above the top edge are not drawn
    if let Some(piece) = &state.current {
        for (row, col, color) in piece.blocks() {
            if (0..FIELD_HEIGHT as i32).contains(&row) && (0..FIELD_WIDTH as i32).contains(&col) {
                grid[row as usize][col as usize] = color;
            }
        }
    }

    let lines: Vec<Line> = grid
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&code| match code {
                    0 => Span::raw(EMPTY),
                    c => Span::styled(block_char, Style::default().fg(color_for(c))),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a piece's bitmap (for the next preview and the title screen)
fn render_mini_piece(frame: &mut Frame, area: Rect, piece: &Piece, block_char: &str) {
    if area.height < 1 || area.width < 8 {
        return;
    }

    let lines: Vec<Line> = piece
        .cells
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&code| match code {
                    0 => Span::raw(EMPTY),
                    c => Span::styled(block_char, Style::default().fg(color_for(c))),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn stat_lines(state: &GameState) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("SCORE: ", Style::default().fg(Color::Gray)),
            Span::styled(state.score.points.to_string(), Style::default().fg(Color::Yellow).bold()),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("HIGH SCORE: ", Style::default().fg(Color::Gray)),
            Span::styled(state.score.high_score.to_string(), Style::default().fg(Color::Green)),
        ]),
        Line::raw(""),
    ]
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, state: &GameState) {
    let mut lines = stat_lines(state);
    lines.push(Line::from(vec![
        Span::styled("LEVEL: ", Style::default().fg(Color::Gray)),
        Span::styled(state.score.level.to_string(), Style::default().fg(Color::Cyan)),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::styled("NEXT:", Style::default().fg(Color::Gray)));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::styled("<   >  -  move", style),
        Line::styled("  V    -  drop", style),
        Line::styled("SPACE  -  rotate", style),
        Line::styled("  p    -  pause", style),
        Line::styled("  q    -  exit", style),
    ];
    let bottom = Rect {
        y: area.y + area.height.saturating_sub(lines.len() as u16),
        height: area.height.min(lines.len() as u16),
        ..area
    };
    frame.render_widget(Paragraph::new(lines), bottom);
}

fn render_game_over(frame: &mut Frame, area: Rect, state: &GameState) {
    let mut lines = stat_lines(state);
    lines.push(Line::styled("[GAME OVER]", Style::default().fg(Color::Blue).bold()));
    lines.push(Line::raw(""));
    lines.push(Line::styled("TRY AGAIN?", Style::default().fg(Color::Yellow).slow_blink()));
    lines.push(Line::raw(""));
    lines.push(Line::raw("ENTER  -  YES"));
    lines.push(Line::raw("  q    -  NO"));

    frame.render_widget(Paragraph::new(lines), area);
}

/// Render an overlay (for pause)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 16, 5);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold().slow_blink()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::PieceGenerator;
    use crate::game::{Game, UserAction};
    use crate::highscore::MemoryHighScore;
    use crate::tetromino::TetrominoType;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn draw(state: &GameState) -> String {
        let backend = TestBackend::new(60, 26);
        let mut terminal = Terminal::new(backend).unwrap();
        let pieces = [Piece::new(TetrominoType::T), Piece::new(TetrominoType::I)];
        terminal
            .draw(|frame| render(frame, state, &DisplaySettings::default(), &pieces))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn game() -> (Game<MemoryHighScore>, Instant) {
        let t0 = Instant::now();
        let store = MemoryHighScore {
            value: 4200,
            saves: 0,
        };
        (Game::with_generator(store, PieceGenerator::with_seed(5), t0), t0)
    }

    #[test]
    fn test_color_codes() {
        for kind in TetrominoType::all() {
            assert_ne!(color_for(kind.color_code()), Color::White);
        }
    }

    #[test]
    fn test_start_screen() {
        let (game, _) = game();
        let screen = draw(game.state());
        assert!(screen.contains("ENTER - start game"));
        assert!(screen.contains("q - exit"));
    }

    #[test]
    fn test_play_screen_shows_stats() {
        let (mut game, t0) = game();
        game.step_at(Some(UserAction::Start), t0);
        game.step_at(None, t0);
        let screen = draw(game.state());
        assert!(screen.contains("SCORE: 0"));
        assert!(screen.contains("HIGH SCORE: 4200"));
        assert!(screen.contains("LEVEL: 1"));
        assert!(screen.contains("NEXT:"));
        assert!(screen.contains("[]"));
    }

    #[test]
    fn test_pause_overlay() {
        let (mut game, t0) = game();
        game.step_at(Some(UserAction::Start), t0);
        game.step_at(None, t0);
        game.step_at(Some(UserAction::Pause), t0);
        assert!(draw(game.state()).contains("PAUSE"));
    }
}
