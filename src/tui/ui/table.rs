use crate::cards::{faces, Card};
use crate::game::PlayerView;
use crate::hand::HAND_SIZE;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(4), // opponent
            Constraint::Length(4), // own board
            Constraint::Length(5), // hand
            Constraint::Min(4),    // status
        ])
        .split(f.area());

    let Some(view) = &app.view else {
        let waiting = Paragraph::new("Waiting for the match to start...")
            .block(Block::default().title("pazaak").borders(Borders::ALL));
        f.render_widget(waiting, chunks[0]);
        draw_status(f, app, chunks[4]);
        return;
    };
    let me = &view.current_player;
    let opp = &view.opponent;

    let clock = match app.time_left {
        Some(left) => format!("   Time left: {}s", left.as_secs()),
        None => String::new(),
    };
    let header = Paragraph::new(Line::from(format!(
        "You: P{} ({} won)   Opponent: P{} ({} won){}",
        me.number, me.round_wins, opp.number, opp.round_wins, clock
    )))
    .block(Block::default().title("pazaak").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_board(f, chunks[1], &format!("Opponent P{}", opp.number), opp);
    draw_board(f, chunks[2], "Your board", me);

    let hand_block = Block::default().title("Hand").borders(Borders::ALL);
    let hand_area = chunks[3];
    let hand_inner = inner(hand_area);
    f.render_widget(hand_block, hand_area);
    let slot_width = hand_inner.width / HAND_SIZE as u16;
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..HAND_SIZE).map(|_| Constraint::Length(slot_width)).collect::<Vec<_>>())
        .split(hand_inner);
    for (i, slot) in slots.iter().enumerate() {
        let card = me.hand.get(i);
        let selected = app.selected == Some(i);
        render_card_widget(f, *slot, i + 1, card, selected, selected && app.flip);
    }

    draw_status(f, app, chunks[4]);
}

fn draw_board(f: &mut Frame, area: Rect, title: &str, p: &PlayerView) {
    let standing = if p.stand { "  STANDING" } else { "" };
    let style = if p.board_value > 20 {
        Style::default().fg(Color::Red)
    } else if p.board_value == 20 {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let lines = vec![
        Line::from(Span::styled(format!("Value: {}{}", p.board_value, standing), style)),
        Line::from(faces(&p.board)),
    ];
    let para = Paragraph::new(lines).block(Block::default().title(title.to_string()).borders(Borders::ALL));
    f.render_widget(para, area);
}

fn render_card_widget(
    f: &mut Frame,
    area: Rect,
    key: usize,
    card: Option<&Card>,
    selected: bool,
    flipped: bool,
) {
    let (label, color) = match card {
        Some(c) if flipped => (format!("{} (flip)", c.identifier()), Color::Magenta),
        Some(c) if c.is_flippable() => (c.identifier().to_string(), Color::Cyan),
        Some(c) => (c.identifier().to_string(), Color::White),
        None => ("--".to_string(), Color::DarkGray),
    };
    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let para = Paragraph::new(Line::from(Span::styled(label, Style::default().fg(color))))
        .alignment(Alignment::Center)
        .block(Block::default().title(key.to_string()).borders(Borders::ALL).border_style(border));
    f.render_widget(para, area);
}

fn draw_status(f: &mut Frame, app: &AppState, area: Rect) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner(area));

    let mut left = Vec::new();
    match app.view.as_ref().and_then(|v| v.winner.as_ref()) {
        Some(w) => left.push(Line::from(format!("Match over: player {} wins", w.number))),
        None => {
            let m = app.pending_move();
            let card = m.card().unwrap_or("no card");
            let flip = if m.flip_card { " flipped" } else { "" };
            let stand = if m.stand { ", then stand" } else { "" };
            left.push(Line::from(format!("Move: {card}{flip}{stand}")));
        }
    }
    if let Some(msg) = app.status() {
        left.push(Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Yellow))));
    }

    let right = vec![Line::from("1-4 card • F flip • S stand"), Line::from("Enter send • ? help • Q quit")];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let lines = vec![
        Line::from("Get as close to 20 as you can without going over."),
        Line::from("Each turn a card is drawn for you; you may then play one hand card."),
        Line::from(""),
        Line::from("1-4    select a hand card (again to deselect)"),
        Line::from("F      flip the selected card's sign (+- cards)"),
        Line::from("S      stand after this move"),
        Line::from("Enter  send the move"),
        Line::from("Q      quit"),
        Line::from(""),
        Line::from("Esc or ? closes this help."),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title("Help").borders(Borders::ALL)),
        area,
    );
}
