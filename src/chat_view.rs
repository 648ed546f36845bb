use crate::{app::App, constants::INPUT_PLACEHOLDER};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SEND_LABEL: &str = "[ Send ]";
const CLEAR_LABEL: &str = "[ Clear Chat ]";

/// Screen regions of the chat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    pub messages: Rect,
    pub status: Rect,
    pub input: Rect,
    pub send_button: Rect,
    pub clear_button: Rect,
    pub logs: Rect,
}

impl ChatLayout {
    pub fn new(area: Rect) -> Self {
        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
            .margin(1)
            .split(area);

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(horizontal_chunks[0]);

        let buttons = chat_chunks[3];
        let send_width = (SEND_LABEL.width() as u16).min(buttons.width);
        let send_button = Rect { width: send_width, ..buttons };
        let clear_x = buttons.x + send_width + 1;
        let clear_button = Rect {
            x: clear_x.min(buttons.right()),
            width: (CLEAR_LABEL.width() as u16).min(buttons.right().saturating_sub(clear_x)),
            ..buttons
        };

        Self {
            messages: chat_chunks[0],
            status: chat_chunks[1],
            input: chat_chunks[2],
            send_button,
            clear_button,
            logs: horizontal_chunks[1],
        }
    }
}

pub fn draw_chat(f: &mut Frame, app: &mut App) {
    let layout = ChatLayout::new(f.area());

    draw_messages(f, app, layout.messages);

    app.status_indicator.update_spinner();
    app.status_indicator.render(f, layout.status);

    draw_input(f, app, layout.input);
    draw_buttons(f, app, &layout);
    draw_logs(f, app, layout.logs);

    app.layout = Some(layout);
}

fn draw_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let revision = app.panel.messages().revision();
    if revision != app.seen_revision {
        app.seen_revision = revision;
        app.follow_latest = true;
    }

    let mut lines = Vec::new();
    for message in app.panel.messages().iter() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message.render(area.width));
    }

    let total_lines = lines.len().min(u16::MAX as usize) as u16;
    let max_scroll = total_lines.saturating_sub(area.height);
    if app.follow_latest || app.chat_scroll >= max_scroll {
        app.follow_latest = true;
        app.chat_scroll = max_scroll;
    }

    let msgs_para = Paragraph::new(lines).block(Block::default());
    f.render_widget(msgs_para.scroll((app.chat_scroll, 0)), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    let separator_style = Style::default().fg(Color::DarkGray);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(separator.clone(), separator_style))),
        Rect { height: 1, ..area },
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(separator, separator_style))),
        Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        },
    );

    let pending = app.panel.pending_input();
    let text = if pending.is_empty() {
        Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(pending, Style::default().fg(Color::White))
    };

    let visible_width = area.width.saturating_sub(2);
    let text_width = pending.width().min(u16::MAX as usize) as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    let input_line = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(2),
        ..area
    };
    let input = Line::from(vec![
        Span::styled("→ ", Style::default().fg(Color::DarkGray)),
        text,
    ]);
    f.render_widget(Paragraph::new(input).scroll((0, scroll_offset)), input_line);

    f.set_cursor_position(Position::new(
        input_cursor_x(area, text_width),
        area.y + 1,
    ));
}

/// Column just past the typed text, kept on the last cell of the input row.
fn input_cursor_x(area: Rect, text_width: u16) -> u16 {
    let scroll_offset = text_width.saturating_sub(area.width.saturating_sub(2));
    let cursor_x = area.x.saturating_add(2).saturating_add(text_width - scroll_offset);
    cursor_x.min(area.right().saturating_sub(1))
}

fn draw_buttons(f: &mut Frame, app: &App, layout: &ChatLayout) {
    let send_style = if app.panel.is_sending() {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };

    f.render_widget(
        Paragraph::new(Span::styled(SEND_LABEL, send_style)),
        layout.send_button,
    );
    f.render_widget(
        Paragraph::new(Span::styled(CLEAR_LABEL, Style::default().fg(Color::Red))),
        layout.clear_button,
    );
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let log_lines: Vec<Line> = app
        .logs
        .entries
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::DarkGray)),
                Span::raw(entry.as_str()),
            ])
        })
        .collect();

    // newest entries stay in view
    let total_log_lines = log_lines.len().min(u16::MAX as usize) as u16;
    let logs_scroll = total_log_lines.saturating_sub(inner.height);

    let logs_para = Paragraph::new(log_lines)
        .block(block)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    f.render_widget(logs_para.scroll((logs_scroll, 0)), area);
}
