use crate::app::App;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

/// Follow-up work the event loop has to do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    None,
    /// Dispatch this text to the server.
    Send(String),
    Quit,
}

pub fn handle_chat_input(key: KeyEvent, app: &mut App) -> PanelAction {
    if key.kind != KeyEventKind::Press {
        return PanelAction::None;
    }

    match key.code {
        KeyCode::Esc => return PanelAction::Quit,
        KeyCode::Enter => return send_action(app),
        KeyCode::PageUp => app.scroll_up(),
        KeyCode::PageDown => app.scroll_down(),
        KeyCode::Backspace => app.panel.pop_input(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => return PanelAction::Quit,
                    'l' => app.clear_chat(),
                    'u' => app.scroll_up(),
                    'd' => app.scroll_down(),
                    _ => {}
                }
            } else {
                app.panel.push_input(c);
            }
        }
        _ => {}
    }
    PanelAction::None
}

/// Clicks on the Send and Clear Chat buttons; wheel scrolls the transcript.
pub fn handle_mouse(event: MouseEvent, app: &mut App) -> PanelAction {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(layout) = app.layout else {
                return PanelAction::None;
            };
            let at = Position::new(event.column, event.row);
            if layout.send_button.contains(at) {
                return send_action(app);
            }
            if layout.clear_button.contains(at) {
                app.clear_chat();
            }
        }
        MouseEventKind::ScrollUp => app.scroll_up(),
        MouseEventKind::ScrollDown => app.scroll_down(),
        _ => {}
    }
    PanelAction::None
}

fn send_action(app: &mut App) -> PanelAction {
    match app.request_send() {
        Some(content) => PanelAction::Send(content),
        None => PanelAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::PanelStorage, chat_message::ChatMessage, chat_panel::ChatPanel,
        chat_view::ChatLayout, storage::MemoryStorage,
    };
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn app_with(messages: Vec<ChatMessage>) -> App {
        let storage: PanelStorage = Box::new(MemoryStorage::with_history(messages));
        App::new(ChatPanel::mount(storage))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn click(x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_chat_input(press(KeyCode::Char(c)), app);
        }
    }

    #[test]
    fn test_typing_edits_pending_input() {
        let mut app = app_with(Vec::new());
        type_text(&mut app, "Helloo");
        handle_chat_input(press(KeyCode::Backspace), &mut app);
        assert_eq!(app.panel.pending_input(), "Hello");
    }

    #[test]
    fn test_enter_dispatches_once() {
        let mut app = app_with(Vec::new());
        type_text(&mut app, "Hello");

        assert_eq!(
            handle_chat_input(press(KeyCode::Enter), &mut app),
            PanelAction::Send("Hello".to_string())
        );
        // single-flight: a second Enter while waiting does nothing
        assert_eq!(handle_chat_input(press(KeyCode::Enter), &mut app), PanelAction::None);
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let mut app = app_with(Vec::new());
        type_text(&mut app, "   ");
        assert_eq!(handle_chat_input(press(KeyCode::Enter), &mut app), PanelAction::None);
        assert_eq!(app.panel.pending_input(), "   ");
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = app_with(Vec::new());
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        handle_chat_input(release, &mut app);
        assert_eq!(app.panel.pending_input(), "");
    }

    #[test]
    fn test_ctrl_l_clears_chat() {
        let mut app = app_with(vec![ChatMessage::user("Hello")]);
        assert_eq!(handle_chat_input(ctrl('l'), &mut app), PanelAction::None);
        assert!(app.panel.messages().is_empty());
        assert_eq!(app.panel.pending_input(), "");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(Vec::new());
        assert_eq!(handle_chat_input(press(KeyCode::Esc), &mut app), PanelAction::Quit);
        assert_eq!(handle_chat_input(ctrl('c'), &mut app), PanelAction::Quit);
    }

    #[test]
    fn test_buttons_respond_to_clicks() {
        let mut app = app_with(vec![ChatMessage::user("old")]);
        let layout = ChatLayout::new(Rect::new(0, 0, 90, 30));
        app.layout = Some(layout);
        app.panel.set_pending_input("Hello");

        let send = layout.send_button;
        assert_eq!(
            handle_mouse(click(send.x, send.y), &mut app),
            PanelAction::Send("Hello".to_string())
        );

        let clear = layout.clear_button;
        assert_eq!(handle_mouse(click(clear.x + 1, clear.y), &mut app), PanelAction::None);
        assert!(app.panel.messages().is_empty());
    }

    #[test]
    fn test_clicks_before_first_draw_are_ignored() {
        let mut app = app_with(vec![ChatMessage::user("old")]);
        app.panel.set_pending_input("Hello");
        assert_eq!(handle_mouse(click(2, 2), &mut app), PanelAction::None);
        assert!(!app.panel.is_sending());
    }
}
