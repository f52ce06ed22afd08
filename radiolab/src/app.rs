use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use radiolab_api::Client;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::SimulatedDetector;
use crate::app_core::{AppCore, DataEventHandler};
use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::commands::{executor, AppCommand};
use crate::config::Settings;
use crate::input::KeyEvent;
use crate::log_buffer::LogBuffer;
use crate::logging::init_logging_with_buffer;
use crate::routes::Route;
use crate::state::AppState;
use crate::ui::screens::Screen;

/// Spawns the jobs each command requests on the tokio runtime
struct TaskHandler {
    task_manager: BackgroundTaskManager,
    data_loader: DataLoader,
}

impl DataEventHandler for TaskHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        executor::execute_command(command, state, &mut self.task_manager, &self.data_loader);
    }
}

pub struct App {
    settings: Settings,
    start: Route,
}

impl App {
    pub fn new(settings: Settings, start: Route) -> Self {
        Self { settings, start }
    }

    pub async fn run(&self) -> Result<()> {
        let log_buffer = LogBuffer::new(5000);
        let log_path = init_logging_with_buffer(log_buffer.clone())?;

        tracing::info!("radiolab starting, logging to {}", log_path.display());
        tracing::info!("Backend at {}", self.settings.api.base_url);

        let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel();

        let api_client = Arc::new(Client::new(&self.settings.api.base_url));
        let data_loader = DataLoader::new(
            api_client,
            Arc::new(SimulatedDetector),
            self.settings.ui.analysis_delay(),
            data_tx,
        );
        let handler = TaskHandler {
            task_manager: BackgroundTaskManager::new(),
            data_loader,
        };
        let mut core = AppCore::with_settings(handler, self.settings.ui.clone());

        let mut terminal = self.init()?;
        let mut event_stream = EventStream::new();

        core.open(self.start);

        tracing::info!("Entering main event loop");

        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
        loop {
            if let Screen::Logs(logs_state) = core.state_mut().current_screen_mut() {
                logs_state.total_entries = log_buffer.len();
            }

            terminal.draw(|f| {
                crate::ui::render_app(f, core.state(), &log_buffer);
            })?;

            tokio::select! {
                _ = interval.tick() => {
                    if let Some(throbber_state) = core.state_mut().loading_state() {
                        throbber_state.calc_next();
                    }
                    core.tick(Instant::now());
                }
                Some(Ok(event)) = event_stream.next() => {
                    if let Event::Key(key) = event {
                        if matches!(key.kind, KeyEventKind::Press) {
                            // Logging here while the Logs screen is open would scroll it
                            let on_logs_screen = matches!(core.state().current_screen(), Screen::Logs(_));
                            if !on_logs_screen {
                                tracing::debug!("Key press: {:?}", key);
                            }
                            core.handle_key(KeyEvent::from(key));
                        }
                    }
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", data_event);
                    core.handle_data_event(data_event);
                }
            }

            if core.should_quit() {
                tracing::info!("Quit requested, exiting event loop");
                break;
            }
        }

        tracing::info!("Cleaning up application");
        core.handler_mut().task_manager.cancel_all();

        self.exit(terminal)?;

        Ok(())
    }

    fn init(&self) -> Result<Terminal<CrosstermBackend<std::io::Stdout>>, std::io::Error> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    fn exit(
        &self,
        mut terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), std::io::Error> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
