//! Terminal UI rendering with ratatui

use crate::board::Cell;
use crate::effects::Particles;
use crate::game::Game;
use crate::menu::GameOverSummary;
use crate::piece::Piece;
use crate::settings::Settings;
use crate::tetromino::PieceColor;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::collections::HashMap;

const EMPTY: &str = "  ";
const PARTICLE: &str = "••";

/// Board column width in terminal cells
const CELL_WIDTH: u16 = 2;
/// Side panel: next box + score + stats
const PANEL_WIDTH: u16 = 24;
/// Preview box interior, in board cells
const PREVIEW_CELLS: u16 = 4;

impl From<PieceColor> for Color {
    fn from(color: PieceColor) -> Self {
        match color {
            PieceColor::Yellow => Color::Yellow,
            PieceColor::Red => Color::Red,
            PieceColor::Green => Color::Green,
            PieceColor::Blue => Color::Blue,
            PieceColor::Cyan => Color::Cyan,
            PieceColor::Magenta => Color::Magenta,
        }
    }
}

/// Render the title screen
pub fn render_start_screen(frame: &mut Frame, best_score: u64) {
    let area = center_rect(frame.area(), 64, 14);

    let title_style = Style::default().fg(Color::Cyan).bold();
    let lines = vec![
        Line::styled("█▀▀ █▀█ █▀▄▀█ █▄▄ █▀█ ▀█▀ █▀█ █ █▀", title_style),
        Line::styled("█▄▄ █▄█ █ ▀ █ █▄█ █▄█  █  █▀▄ █ ▄█", title_style),
        Line::raw(""),
        Line::raw(""),
        Line::styled("Press SPACE to start", Style::default().fg(Color::White)),
        Line::raw(""),
        Line::styled(
            format!("Best score: {}", best_score),
            Style::default().fg(Color::Yellow),
        ),
        Line::raw(""),
        Line::raw(""),
        Line::styled(
            "←/→ move  ↑ rotate  ↓ soft drop  SPACE hard drop  ESC quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the game-over screen
pub fn render_game_over_screen(frame: &mut Frame, summary: &GameOverSummary) {
    let area = center_rect(frame.area(), 34, 13);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" GAME OVER ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::raw(""),
        Line::styled(
            format!("Score: {}", summary.score),
            Style::default().fg(Color::White).bold(),
        ),
        Line::styled(
            format!("Best: {}", summary.best_score),
            Style::default().fg(Color::Yellow),
        ),
        Line::styled(
            format!("Lines: {}  Level: {}", summary.lines, summary.level),
            Style::default().fg(Color::Gray),
        ),
    ];
    if summary.new_best {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "NEW HIGH SCORE!",
            Style::default().fg(Color::Magenta).bold(),
        ));
    } else {
        lines.push(Line::raw(""));
        lines.push(Line::raw(""));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("SPACE  play again", Style::default().fg(Color::Gray)));
    lines.push(Line::styled("ESC    quit", Style::default().fg(Color::Gray)));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render the playfield, side panel and particles
pub fn render_game(
    frame: &mut Frame,
    game: &Game,
    particles: &Particles,
    settings: &Settings,
    games_played: u32,
) {
    let board_width = game.board.width() as u16 * CELL_WIDTH + 2;
    let board_height = game.board.height() as u16 + 2;
    let game_area = center_rect(frame.area(), board_width + PANEL_WIDTH, board_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game, particles, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_CELLS + 2),
            Constraint::Length(6),
            Constraint::Min(8),
        ])
        .split(main_layout[1]);

    let (block_char, _) = settings.visual.block_chars();
    render_next(frame, right_layout[0], &game.next, block_char);
    render_score(frame, right_layout[1], game);
    render_stats(frame, right_layout[2], game, games_played);
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

/// Render the next piece centred in its preview box
fn render_next(frame: &mut Frame, area: Rect, piece: &Piece, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let preview = center_rect(
        inner,
        piece.shape.width() as u16 * CELL_WIDTH,
        piece.shape.height() as u16,
    );
    let style = Style::default().fg(piece.color.into());
    let lines: Vec<Line> = piece
        .shape
        .rows()
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&filled| {
                        if filled {
                            Span::styled(block_char, style)
                        } else {
                            Span::raw(EMPTY)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), preview);
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, game: &Game, particles: &Particles, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Overlays keyed by (x, y), later inserts win
    let mut overlay: HashMap<(i32, i32), (&str, Style)> = HashMap::new();

    if settings.visual.show_ghost {
        let ghost = game.ghost();
        if ghost.y != game.current.y {
            let style = Style::default().fg(ghost.color.into()).dim();
            for pos in ghost.cells() {
                overlay.insert(pos, (ghost_char, style));
            }
        }
    }

    let current_style = Style::default().fg(game.current.color.into());
    for pos in game.current.cells() {
        overlay.insert(pos, (block_char, current_style));
    }

    if settings.visual.particles {
        for particle in particles.iter() {
            let pos = (particle.x.floor() as i32, particle.y.floor() as i32);
            let mut style = Style::default().fg(particle.color.into());
            if particle.is_fading() {
                style = style.dim();
            }
            overlay.insert(pos, (PARTICLE, style));
        }
    }

    let lines: Vec<Line> = game
        .board
        .rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    if let Some(&(text, style)) = overlay.get(&(x as i32, y as i32)) {
                        return Span::styled(text, style);
                    }
                    match cell {
                        Cell::Filled(color) => {
                            Span::styled(block_char, Style::default().fg((*color).into()))
                        }
                        Cell::Empty => Span::raw(EMPTY),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render score and level
fn render_score(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("SCORE ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.points),
                Style::default().fg(Color::Yellow).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled("LEVEL ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.level),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];

    if game.combo.streak > 1 {
        lines.push(Line::styled(
            format!("Combo x{}", game.combo.streak),
            Style::default().fg(Color::Magenta).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the statistics panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, games_played: u32) {
    let block = Block::default()
        .title(" STATS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White);
    let row = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(name, label), Span::styled(v, value)])
    };

    let lines = vec![
        row("Games    ", games_played.to_string()),
        row("Pieces   ", game.stats.pieces_placed.to_string()),
        row("Lines    ", game.score.lines.to_string()),
        row("Max combo", format!(" {}", game.stats.max_combo)),
        row("Time     ", format!("{}s", game.stats.play_seconds())),
        row("Best     ", game.best_score.max(game.score.points).to_string()),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_start_screen_shows_best_score() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render_start_screen(f, 4321)).unwrap();
        assert!(buffer_text(&terminal).contains("Best score: 4321"));
    }

    #[test]
    fn test_game_over_screen_flags_new_best() {
        let summary = GameOverSummary {
            score: 900,
            best_score: 900,
            new_best: true,
            lines: 6,
            level: 1,
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render_game_over_screen(f, &summary)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Score: 900"));
        assert!(text.contains("NEW HIGH SCORE!"));
    }

    #[test]
    fn test_game_screen_renders_panel() {
        let mut game = Game::new(GameConfig::default(), 77);
        game.start();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| render_game(f, &game, &Particles::new(), &Settings::default(), 3))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("NEXT"));
        assert!(text.contains("SCORE 0"));
        assert!(text.contains("LEVEL 1"));
        assert!(text.contains("Games    3"));
        assert!(text.contains("Best     77"));
    }
}
