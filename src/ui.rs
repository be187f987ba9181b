//! Terminal UI rendering with ratatui

use crate::game::{Game, GameState};
use crate::piece::Piece;
use crate::settings::Settings;
use crate::tetromino::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Width of the next piece / stats column
const SIDE_WIDTH: u16 = 18;

/// What occupies one board slot on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Frame,
    Locked(Palette),
    Active(Palette),
    Outline(Palette),
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let config = game.config();

    // Board plus a one-cell frame on every side, two columns per cell
    let board_width = (config.width() as u16 + 2) * 2;
    let board_height = config.height() as u16 + 2;
    let game_area = center_rect(area, board_width + SIDE_WIDTH, board_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(SIDE_WIDTH)])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next piece
            Constraint::Length(7), // Stats
            Constraint::Min(0),    // Controls
        ])
        .split(main_layout[1]);

    let (block_char, _) = settings.visual.block_chars();
    render_next(frame, right_layout[0], game.next(), block_char);
    render_stats(frame, right_layout[1], game);
    render_controls(frame, right_layout[2], settings);

    let start_hint = format!("Press {} to start", first_key(&settings.keys.start));
    match game.state() {
        GameState::Idle => render_overlay(frame, game_area, "READY", &start_hint),
        GameState::Paused => render_overlay(frame, game_area, "PAUSED", &start_hint),
        GameState::Terminal => {
            let hint = format!("Press {} to reset", first_key(&settings.keys.reset));
            render_overlay(frame, game_area, "GAME OVER", &hint);
        }
        GameState::Running => {}
    }
}

/// Center a rect within another rect
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

fn first_key(keys: &[String]) -> &str {
    keys.first().map(String::as_str).unwrap_or("?")
}

/// Work out what every slot shows, frame included. Index [row][col] where
/// row/col 0 are the frame and the board starts at (1, 1).
fn compose_slots(game: &Game, show_outline: bool) -> Vec<Vec<Slot>> {
    let board = game.board();
    let (width, height) = (board.width(), board.height());
    let mut slots = vec![vec![Slot::Empty; width + 2]; height + 2];

    for (r, row) in slots.iter_mut().enumerate() {
        for (c, slot) in row.iter_mut().enumerate() {
            if r == 0 || c == 0 || r == height + 1 || c == width + 1 {
                *slot = Slot::Frame;
            }
        }
    }

    for cell in board.locked_cells() {
        slots[cell.y as usize + 1][cell.x as usize + 1] = Slot::Locked(cell.palette);
    }

    let active = game.active();
    let mut put = |x: i32, y: i32, slot: Slot| {
        if board.is_in_bounds(x, y) {
            slots[y as usize + 1][x as usize + 1] = slot;
        }
    };

    if show_outline && game.state() != GameState::Terminal {
        let offset = game.landing_offset();
        for (x, y) in active.cells() {
            put(x, y + offset, Slot::Outline(active.palette));
        }
    }
    for (x, y) in active.cells() {
        put(x, y, Slot::Active(active.palette));
    }

    slots
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, outline_char) = settings.visual.block_chars();

    let lines: Vec<Line> = compose_slots(game, settings.visual.show_outline)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|slot| match slot {
                    Slot::Empty => Span::raw(EMPTY),
                    Slot::Frame => Span::styled(block_char, shade(Palette::FRAME)),
                    Slot::Locked(p) | Slot::Active(p) => Span::styled(block_char, shade(p)),
                    Slot::Outline(p) => Span::styled(outline_char, Style::default().fg(p.mid)),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Face in the mid tone over the dark edge tone
fn shade(palette: Palette) -> Style {
    Style::default().fg(palette.mid).bg(palette.bottom)
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, next: &Piece, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Only rows that hold cells, so padding rows don't push the piece around
    let size = next.grid.size();
    let lines: Vec<Line> = (0..size)
        .filter(|&r| (0..size).any(|c| next.grid.get(r, c)))
        .map(|r| {
            let spans: Vec<Span> = (0..size)
                .map(|c| {
                    if next.grid.get(r, c) {
                        Span::styled(block_char, shade(next.palette))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = game.score();
    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", score.points),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", score.lines),
            Style::default().fg(Color::Green),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a short key reference
fn render_controls(frame: &mut Frame, area: Rect, settings: &Settings) {
    let keys = &settings.keys;
    let entries = [
        ("Move", format!("{}/{}", first_key(&keys.move_left), first_key(&keys.move_right))),
        ("Down", first_key(&keys.soft_drop).to_string()),
        ("Drop", first_key(&keys.hard_drop).to_string()),
        ("Rotate", format!("{}/{}", first_key(&keys.rotate_cw), first_key(&keys.rotate_ccw))),
        ("Start", first_key(&keys.start).to_string()),
        ("Pause", first_key(&keys.pause).to_string()),
        ("Reset", first_key(&keys.reset).to_string()),
        ("Quit", first_key(&keys.quit).to_string()),
    ];

    let lines: Vec<Line> = entries
        .into_iter()
        .map(|(label, key)| {
            Line::from(vec![
                Span::styled(format!(" {:<7}", label), Style::default().fg(Color::DarkGray)),
                Span::styled(key, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Render an overlay (for idle/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
