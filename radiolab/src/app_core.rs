use crate::commands::handlers;
use crate::config::UiSettings;
use crate::events::{AppCommand, DataEvent};
use crate::input::KeyEvent;
use crate::routes::Route;
use crate::state::{reducer, AppState};
use std::time::Instant;

/// Side effects of command execution (production = real loader + tasks, test = mock)
///
/// Tests inject an implementation that records jobs instead of spawning them.
pub trait DataEventHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState);
}

/// Testable application core without terminal dependencies
///
/// Generic over H (handler). In production the handler spawns background jobs, in
/// tests it applies commands synchronously.
pub struct AppCore<H: DataEventHandler> {
    ui_state: AppState,
    handler: H,
}

impl<H: DataEventHandler> AppCore<H> {
    pub fn new(handler: H) -> Self {
        Self::with_settings(handler, UiSettings::default())
    }

    pub fn with_settings(handler: H, settings: UiSettings) -> Self {
        Self {
            ui_state: AppState::with_settings(settings),
            handler,
        }
    }

    /// Opens the starting page. Home is already the root screen.
    pub fn open(&mut self, route: Route) {
        if route != Route::Home {
            self.execute(AppCommand::Navigate(route));
        }
    }

    /// Translates a key press to a command and executes it
    pub fn handle_key(&mut self, event: KeyEvent) {
        if let Some(command) = handlers::handle_key_input(event, &self.ui_state) {
            self.execute(command);
        }
    }

    /// Applies a background result, then runs any navigation it asks for
    pub fn handle_data_event(&mut self, event: DataEvent) {
        for follow_up in reducer::reduce_data_event(&mut self.ui_state, event) {
            tracing::debug!("Follow-up command: {:?}", follow_up);
            self.execute(follow_up);
        }
    }

    /// Advances timers: notifications, search debounce and pending redirects
    pub fn tick(&mut self, now: Instant) {
        self.execute(AppCommand::Tick(now));
    }

    pub fn execute(&mut self, command: AppCommand) {
        self.handler
            .execute_with_context(command, &mut self.ui_state);
    }

    /// Read-only access to the current UI state (for rendering or assertions)
    pub fn state(&self) -> &AppState {
        &self.ui_state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.ui_state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }
}
