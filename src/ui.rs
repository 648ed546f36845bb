// src/ui.rs

use crate::{
    api::ChatClient,
    app::{dispatch_message, App},
    chat_view::draw_chat,
    errors::ParleyResult,
    key_handlers::{handle_chat_input, handle_mouse, PanelAction},
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::{mpsc, Mutex};

const TICK_RATE: Duration = Duration::from_millis(100);

enum Event {
    Input(CEvent),
    Tick,
}

/// Takes over the terminal and runs the chat panel until the user quits.
pub async fn run_ui(app: Arc<Mutex<App>>, client: ChatClient) -> ParleyResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, client).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        error!("UI loop exited with error: {}", e);
    }
    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: Arc<Mutex<App>>,
    client: ChatClient,
) -> ParleyResult<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // crossterm's reader blocks, so it gets its own thread
    tokio::task::spawn_blocking(move || loop {
        let event = match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(ev) => Event::Input(ev),
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    return;
                }
            },
            Ok(false) => Event::Tick,
            Err(e) => {
                error!("Failed to poll terminal events: {}", e);
                return;
            }
        };
        if tx.blocking_send(event).is_err() {
            return;
        }
    });

    loop {
        {
            let mut guard = app.lock().await;
            terminal.draw(|f| draw_chat(f, &mut guard))?;
        }

        let Some(event) = rx.recv().await else {
            break;
        };

        let action = match event {
            Event::Input(CEvent::Key(key)) => handle_chat_input(key, &mut *app.lock().await),
            Event::Input(CEvent::Mouse(mouse)) => handle_mouse(mouse, &mut *app.lock().await),
            Event::Input(_) | Event::Tick => PanelAction::None,
        };

        match action {
            PanelAction::Send(content) => {
                tokio::spawn(dispatch_message(app.clone(), client.clone(), content));
            }
            PanelAction::Quit => {
                app.lock().await.should_quit = true;
            }
            PanelAction::None => {}
        }

        if app.lock().await.should_quit {
            info!("Quitting chat panel");
            break;
        }
    }

    Ok(())
}
