use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor;
use crate::config::UiSettings;
use crate::events::{AppCommand, DataEvent, Job, RequestId};
use crate::input::{Key, KeyEvent};
use crate::routes::Route;
use crate::state::AppState;
use crate::ui::screens::Screen;
use std::time::{Duration, Instant};

/// Mock data event handler for tests (no real async tasks)
///
/// Commands run through execute_command_sync and the jobs they request are recorded
/// instead of spawned.
#[derive(Default)]
pub struct MockDataHandler {
    pub jobs: Vec<Job>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        let jobs = executor::execute_command_sync(command, state);
        self.jobs.extend(jobs);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
    clock: Instant,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(UiSettings::default())
    }

    pub fn with_settings(settings: UiSettings) -> Self {
        Self {
            core: AppCore::with_settings(MockDataHandler::new(), settings),
            clock: Instant::now(),
        }
    }

    /// Start on `path`, the way the binary does with its argument
    pub fn open(&mut self, path: &str) {
        let route = Route::parse(path).unwrap_or_else(|e| panic!("bad test path {path}: {e}"));
        self.core.open(route);
    }

    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    pub fn send_key_event(&mut self, event: KeyEvent) {
        self.core.handle_key(event);
    }

    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    /// Type each character of `text` as a key press
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(Key::Char(c));
        }
    }

    /// Inject a data event (simulate an API response)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    /// Move the test clock forward and deliver one tick
    pub fn advance(&mut self, by: Duration) {
        self.clock += by;
        self.core.tick(self.clock);
    }

    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    /// Every job requested so far
    pub fn jobs(&self) -> &[Job] {
        &self.core.handler().jobs
    }

    /// Drain the recorded jobs
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.core.handler_mut().jobs)
    }

    /// Request id of the most recent load job matching `pred`
    pub fn last_request(&self, pred: impl Fn(&Job) -> bool) -> RequestId {
        self.jobs()
            .iter()
            .rev()
            .filter(|job| pred(job))
            .find_map(|job| match job {
                Job::LoadProjects { request }
                | Job::LoadReports { request }
                | Job::LoadProject { request, .. }
                | Job::LoadProjectImages { request, .. }
                | Job::LoadProjectReports { request, .. }
                | Job::LoadReport { request, .. }
                | Job::Analyze { request, .. } => Some(*request),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no matching load job in {:?}", self.jobs()))
    }

    /// Assert that the app is on a specific screen type
    ///
    /// Uses discriminant comparison so the screen's state need not be built.
    pub fn assert_screen_type(&self, expected_discriminant: std::mem::Discriminant<Screen>) {
        let current = self.state().current_screen();
        assert_eq!(
            std::mem::discriminant(current),
            expected_discriminant,
            "Expected different screen. Current: {:?}",
            current
        );
    }

    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
