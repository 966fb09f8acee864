use std::io;
use std::time::Duration;

use color_eyre::Result;
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use veritas_tui::app::App;
use veritas_tui::backend::BackendClient;
use veritas_tui::config::Config;
use veritas_tui::input::{self, Command};
use veritas_tui::session::DEFAULT_THREAD_ID;
use veritas_tui::ui;

/// Set up file-based tracing so log output never corrupts the TUI.
fn init_file_logging() -> Result<()> {
    let file = std::fs::File::create("veritas-tui.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::from_env();
    if config.log_to_file {
        init_file_logging()?;
    }
    tracing::info!(backend = %config.backend_url, "starting veritas-tui");

    let client = BackendClient::with_base_url(&config.backend_url);
    let mut app = App::new(client);
    app.check_connection();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore the terminal even when the loop errored
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx = app.message_rx.take();

    loop {
        if app.needs_redraw || app.any_loading() {
            terminal.draw(|frame| ui::render(frame, app))?;
            app.needs_redraw = false;
        }

        // 100ms tick keeps the loading spinner moving
        let timeout = tokio::time::sleep(Duration::from_millis(100));

        tokio::select! {
            _ = timeout => {
                if app.any_loading() {
                    app.tick();
                    app.mark_dirty();
                }
            }

            // Async completions from spawned request tasks
            maybe_message = async {
                match message_rx.as_mut() {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(message) = maybe_message {
                    app.handle_message(message);
                }
            }

            // Keyboard events
            event_result = event_stream.next() => {
                if let Some(Ok(event)) = event_result {
                    match event {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            if let Some(command) = input::map_key(key) {
                                apply_command(app, command);
                            }
                        }
                        Event::Paste(text) => app.input_str(&text),
                        Event::Resize(_, _) => app.mark_dirty(),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn apply_command(app: &mut App, command: Command) {
    match command {
        Command::Quit => app.quit(),
        Command::Submit => app.submit_input(),
        Command::InsertChar(c) => app.input_char(c),
        Command::Backspace => app.input_backspace(),
        Command::ClearInput => app.input_clear(),
        Command::NextThread => app.switch_next(),
        Command::PrevThread => app.switch_prev(),
        Command::GoToRetrieval => app.switch_to(DEFAULT_THREAD_ID, None),
        Command::DeleteThread => app.delete_active_thread(),
        Command::ClearAllThreads => app.clear_all_threads(),
        Command::ClearHistory => app.clear_active_history(),
        Command::CycleModel => app.cycle_model(),
        Command::TopKUp => app.top_k_up(),
        Command::TopKDown => app.top_k_down(),
        Command::ScrollUp(lines) => app.scroll_up(lines),
        Command::ScrollDown(lines) => app.scroll_down(lines),
        Command::CopyLastMessage => app.copy_last_message(),
        Command::OpenResult(index) => app.open_chat_from_retrieval(index),
    }
}
