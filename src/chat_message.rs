use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};
use textwrap::wrap;

use crate::constants::SEND_ERROR_MESSAGE;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

impl Author {
    pub fn label(&self) -> &'static str {
        match self {
            Author::User => "You",
            Author::Assistant => "Assistant",
        }
    }
}

/// A single turn in the conversation.
///
/// Stored and transmitted as `{"role", "sender", "content"}`; the two author
/// fields always co-vary, so in memory they are one [`Author`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredMessage", into = "StoredMessage")]
pub struct ChatMessage {
    pub author: Author,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredMessage {
    role: Role,
    // Older entries may lack it; role decides the author either way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sender: Option<Sender>,
    content: String,
}

impl From<StoredMessage> for ChatMessage {
    fn from(stored: StoredMessage) -> Self {
        let author = match stored.role {
            Role::User => Author::User,
            Role::Assistant => Author::Assistant,
        };
        ChatMessage {
            author,
            content: stored.content,
        }
    }
}

impl From<ChatMessage> for StoredMessage {
    fn from(message: ChatMessage) -> Self {
        let (role, sender) = match message.author {
            Author::User => (Role::User, Sender::User),
            Author::Assistant => (Role::Assistant, Sender::Ai),
        };
        StoredMessage {
            role,
            sender: Some(sender),
            content: message.content,
        }
    }
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            author: Author::Assistant,
            content: content.into(),
        }
    }

    /// The apology bubble shown when a send fails.
    pub fn send_error() -> Self {
        Self::assistant(SEND_ERROR_MESSAGE)
    }

    pub fn is_from_user(&self) -> bool {
        self.author == Author::User
    }

    /// Lays the message out as styled lines for a column `width` cells wide.
    pub fn render(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let style = self.base_style();

        self.render_header(&mut lines, style);
        self.render_content(&mut lines, width, style);
        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("╰─".to_string(), style),
        ]));

        lines
    }

    fn indent(&self) -> &'static str {
        if self.is_from_user() {
            "  "
        } else {
            ""
        }
    }

    fn base_style(&self) -> Style {
        match self.author {
            Author::User => Style::default().fg(Color::Rgb(255, 223, 128)),
            Author::Assistant => Style::default().fg(Color::Rgb(144, 238, 144)),
        }
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style) {
        lines.push(Line::from(vec![
            Span::styled(self.indent().to_string(), style),
            Span::styled("┌─ ".to_string(), style),
            Span::styled(
                self.author.label().to_string(),
                style.add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    fn render_content(&self, lines: &mut Vec<Line<'static>>, width: u16, style: Style) {
        let mut in_code_block = false;
        let mut code_buffer = String::new();
        let mut text_buffer = String::new();

        for line in self.content.lines() {
            if line.trim().starts_with("```") {
                self.flush_text(lines, &text_buffer, width, style);
                self.flush_code(lines, &code_buffer, style);
                text_buffer.clear();
                code_buffer.clear();
                in_code_block = !in_code_block;
                continue;
            }

            let buffer = if in_code_block {
                &mut code_buffer
            } else {
                &mut text_buffer
            };
            buffer.push_str(line);
            buffer.push('\n');
        }

        self.flush_text(lines, &text_buffer, width, style);
        self.flush_code(lines, &code_buffer, style);
    }

    fn flush_text(&self, lines: &mut Vec<Line<'static>>, buffer: &str, width: u16, style: Style) {
        if buffer.is_empty() {
            return;
        }

        // indent + "│ " gutter
        let wrap_width = (width as usize).saturating_sub(4).max(1);
        for wrapped in wrap(buffer.trim_end(), wrap_width) {
            lines.push(Line::from(vec![
                Span::styled(self.indent().to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped.to_string(), style),
            ]));
        }
    }

    fn flush_code(&self, lines: &mut Vec<Line<'static>>, buffer: &str, style: Style) {
        if buffer.is_empty() {
            return;
        }

        let code_style = Style::default()
            .fg(Color::Rgb(209, 154, 102))
            .add_modifier(Modifier::BOLD);

        for code_line in buffer.lines() {
            lines.push(Line::from(vec![
                Span::styled(self.indent().to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled("▎".to_string(), Style::default().fg(Color::DarkGray)),
                Span::styled(format!(" {}", code_line), code_style),
            ]));
        }
    }
}
