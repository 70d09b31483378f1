//! Stateless UI rendering for a powertoe game.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;

use super::app::App;
use super::input::power_key;
use crate::scoreboard::Scoreboard;
use powertoe_core::{Cell, GameResult, GameSession, Player, Position, PowerUpKind, SessionPhase};

const HELP: &str = "arrows/1-9 move  enter place  f d s b h t power-ups  r reset  q quit";

/// Renders board, power-ups, scoreboard and status.
pub fn draw(frame: &mut Frame, session: &GameSession, app: &App, scoreboard: &Scoreboard) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Min(13),    // Board and side panel
            Constraint::Length(3),  // Status
            Constraint::Length(1),  // Key help
        ])
        .split(area);

    let title = Paragraph::new("Powertoe - Tic Tac Toe with Power-ups")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(chunks[1]);
    draw_board(frame, body[0], session, app.cursor());
    draw_side_panel(frame, body[1], session, scoreboard);

    let status = Paragraph::new(status_line(session, app))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn status_line(session: &GameSession, app: &App) -> String {
    let phase = match session.phase() {
        SessionPhase::AwaitingMove(player) => match session.double_move() {
            Some(double) if double == player => format!("{} to move (double move)", player),
            _ => format!("{} to move", player),
        },
        SessionPhase::AwaitingPowerUpTarget(player, kind) => {
            format!("{}: choose a target for {}", player, kind.label())
        }
        SessionPhase::Terminal(GameResult::Win { player, .. }) => {
            format!("{} wins! Press r to play again", player)
        }
        SessionPhase::Terminal(_) => "Draw! Press r to play again".to_string(),
    };
    let phase = match session.freeze() {
        Some(freeze) => format!("{} ({} frozen)", phase, freeze.player),
        None => phase,
    };
    if app.status().is_empty() {
        phase
    } else {
        format!("{} | {}", phase, app.status())
    }
}

fn draw_board(frame: &mut Frame, area: Rect, session: &GameSession, cursor: Position) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for row in 0..3 {
        let positions: Vec<Position> = Position::iter().filter(|pos| pos.row() == row).collect();
        draw_row(frame, rows[row * 2], session, cursor, &positions);
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1]);
        }
    }
}

fn draw_row(
    frame: &mut Frame,
    area: Rect,
    session: &GameSession,
    cursor: Position,
    positions: &[Position],
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for pos in positions {
        let column = pos.column();
        draw_cell(frame, cols[column * 2], session, cursor, *pos);
        if column < 2 {
            draw_separator_vertical(frame, cols[column * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, session: &GameSession, cursor: Position, pos: Position) {
    let index = pos.to_index();
    let (mark, base_style) = match session.board().get(index) {
        Ok(Cell::Occupied(Player::X)) => (
            "X".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Ok(Cell::Occupied(Player::O)) => (
            "O".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        _ => ((index + 1).to_string(), Style::default().fg(Color::DarkGray)),
    };

    let symbol = if session.is_shielded(index) {
        format!("[{}]", mark)
    } else {
        format!(" {} ", mark)
    };

    let style = if pos == cursor {
        base_style.bg(Color::White).fg(Color::Black)
    } else if session.is_shielded(index) {
        base_style.add_modifier(Modifier::UNDERLINED)
    } else {
        base_style
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(symbol, style)))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_side_panel(frame: &mut Frame, area: Rect, session: &GameSession, scoreboard: &Scoreboard) {
    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:<16}{:>7}{:>7}", "", "X", "O"),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(PowerUpKind::iter().map(|kind| power_up_line(session, kind)));
    let power_ups = Paragraph::new(lines).block(
        Block::default()
            .title("Power-ups")
            .borders(Borders::ALL),
    );
    frame.render_widget(power_ups, panels[0]);

    let vs_ai = scoreboard.vs_ai();
    let score = Paragraph::new(vec![
        Line::from(format!(
            "Games {}  X {}  O {}  Draw {}",
            scoreboard.games(),
            scoreboard.x_wins(),
            scoreboard.o_wins(),
            scoreboard.draws()
        )),
        Line::from(format!(
            "Vs AI {}W {}L {}D",
            vs_ai.won(),
            vs_ai.lost(),
            vs_ai.drawn()
        )),
        Line::from(format!(
            "Streak {} (best {})",
            scoreboard.streak().current(),
            scoreboard.streak().longest()
        )),
    ])
    .block(Block::default().title("Scoreboard").borders(Borders::ALL));
    frame.render_widget(score, panels[1]);
}

fn power_up_line(session: &GameSession, kind: PowerUpKind) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{} {:<14}", power_key(kind), kind.label()))];
    for player in Player::BOTH {
        let slot = session.power_ups(player).slot(kind);
        let span = if *slot.available() {
            Span::styled(format!("{:>7}", "ready"), Style::default().fg(Color::Green))
        } else {
            Span::styled(
                format!("{:>7}", slot.cooldown()),
                Style::default().fg(Color::DarkGray),
            )
        };
        spans.push(span);
    }
    Line::from(spans)
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use powertoe_core::SessionConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(session: &GameSession, app: &App, scoreboard: &Scoreboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal
            .draw(|frame| draw(frame, session, app, scoreboard))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_screen_shows_board_and_cooldowns() {
        let mut session = GameSession::new(SessionConfig::default());
        session.apply_placement(4).unwrap();
        session
            .activate_power_up(Player::O, PowerUpKind::Freeze)
            .unwrap();
        let app = App::new(Player::X, true);

        let screen = render(&session, &app, &Scoreboard::new());
        assert!(screen.contains("Powertoe"));
        assert!(screen.contains(" X "));
        assert!(screen.contains(" 1 "));
        assert!(screen.contains("O to move (X frozen)"), "{screen}");
        assert!(screen.contains("f Freeze"));
        assert!(screen.contains("ready      3"), "{screen}");
        assert!(screen.contains("Games 0"));
    }

    #[test]
    fn test_shielded_cells_are_bracketed() {
        let mut session = GameSession::new(SessionConfig::default());
        session
            .activate_power_up(Player::X, PowerUpKind::Shield)
            .unwrap();
        session.select_cell(8).unwrap();
        let mut app = App::new(Player::X, true);
        app.set_status("Cell 9 shielded");

        let screen = render(&session, &app, &Scoreboard::new());
        assert!(screen.contains("[9]"), "{screen}");
        assert!(screen.contains("X to move | Cell 9 shielded"), "{screen}");
    }
}
