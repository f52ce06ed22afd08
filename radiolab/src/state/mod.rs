pub mod form;
pub mod notifications;
pub mod pagination;
pub mod reducer;
pub mod search;
pub mod validators;

use crate::analysis::AnalysisTarget;
use crate::config::UiSettings;
use crate::events::RequestId;
use crate::ui::screens::Screen;
use crate::uploads::Selection;
use form::{FormState, TextField};
use notifications::Notifications;
use pagination::Page;
use radiolab_api::endpoints::{
    images::Image, projects::Project, reports::Report, AngleMeasurement, ImageId, ProjectId,
    ReportId,
};
use ratatui::widgets::TableState;
use search::{Debounced, Searchable};
use std::cell::RefCell;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

impl LoadingState {
    pub fn started() -> Self {
        LoadingState::Loading(ThrobberState::default())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    fn throbber(&mut self) -> Option<&mut ThrobberState> {
        match self {
            LoadingState::Loading(throbber_state) => Some(throbber_state),
            _ => None,
        }
    }
}

/// Represents input mode for list screens
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Modal dialogs. While one is open it receives all keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// Destructive project deletion; the user has to type the project name.
    DeleteProject {
        project_id: ProjectId,
        project_name: String,
        typed: String,
    },
    DeleteReport {
        report_id: ReportId,
        project_id: ProjectId,
        name: String,
    },
    DeleteImage {
        image_id: ImageId,
        project_id: ProjectId,
        name: String,
    },
    EditReport {
        report_id: ReportId,
        form: FormState,
    },
    SaveReport {
        image_index: usize,
        form: FormState,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogState {
    pub dialog: Dialog,
    /// The confirmed action is in flight; further input is ignored.
    pub busy: bool,
}

impl DialogState {
    pub fn new(dialog: Dialog) -> Self {
        Self {
            dialog,
            busy: false,
        }
    }
}

pub fn report_form(name: &str, notes: &str) -> FormState {
    FormState::new(vec![
        TextField::required("Name").with_value(name),
        TextField::optional("Notes").with_value(notes),
    ])
}

pub fn project_form(project: Option<&Project>) -> FormState {
    let (name, patient_id, description) = match project {
        Some(p) => (
            p.name.as_str(),
            p.patient_id.as_str(),
            p.description.as_deref().unwrap_or(""),
        ),
        None => ("", "", ""),
    };
    FormState::new(vec![
        TextField::required("Name").with_value(name),
        TextField::required("Patient ID").with_value(patient_id),
        TextField::optional("Description").with_value(description),
    ])
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Bottom of the navigation stack; `history` holds the screens above it.
    root: Screen,
    pub history: Vec<Screen>,

    pub settings: UiSettings,
    pub notifications: Notifications,

    // UI state
    pub help_visible: bool,
    pub pending_key: Option<char>,

    // System
    pub should_quit: bool,
    next_request: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(UiSettings::default())
    }

    pub fn with_settings(settings: UiSettings) -> Self {
        Self {
            root: Screen::Home(HomeState::new()),
            history: Vec::new(),
            notifications: Notifications::new(settings.notification_ttl()),
            settings,
            help_visible: false,
            pending_key: None,
            should_quit: false,
            next_request: 0,
        }
    }

    /// Get the current screen (top of the navigation stack)
    pub fn current_screen(&self) -> &Screen {
        self.history.last().unwrap_or(&self.root)
    }

    pub fn current_screen_mut(&mut self) -> &mut Screen {
        match self.history.last_mut() {
            Some(screen) => screen,
            None => &mut self.root,
        }
    }

    /// The screen `navigate_back` would return to.
    pub fn previous_screen(&self) -> Option<&Screen> {
        match self.history.len() {
            0 => None,
            1 => Some(&self.root),
            len => self.history.get(len - 2),
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len() + 1
    }

    /// Navigate to a new screen (push to stack)
    pub fn navigate_to(&mut self, screen: Screen) {
        tracing::debug!(
            "Navigating to new screen, stack depth: {} -> {}",
            self.depth(),
            self.depth() + 1
        );
        self.history.push(screen);
    }

    /// Navigate back (pop from stack)
    /// Returns true if navigation succeeded, false if already at root
    pub fn navigate_back(&mut self) -> bool {
        if self.history.pop().is_some() {
            tracing::debug!("Navigating back, stack depth now {}", self.depth());
            true
        } else {
            tracing::debug!("Cannot navigate back, already at root screen");
            false
        }
    }

    /// Swap the current screen for `screen` without growing the stack.
    pub fn replace_current(&mut self, screen: Screen) {
        tracing::debug!("Replacing current screen at depth {}", self.depth());
        *self.current_screen_mut() = screen;
    }

    /// Pops back to the nearest screen matching `predicate`. Returns false (and leaves
    /// the stack untouched) when no such screen is open.
    pub fn rewind_to(&mut self, predicate: impl Fn(&Screen) -> bool) -> bool {
        if let Some(index) = self.history.iter().rposition(&predicate) {
            self.history.truncate(index + 1);
            return true;
        }
        if predicate(&self.root) {
            self.history.clear();
            return true;
        }
        false
    }

    /// The modal dialog open on the current screen, if any.
    pub fn active_dialog(&self) -> Option<&DialogState> {
        match self.current_screen() {
            Screen::ProjectDetail(state) => state.dialog.as_ref(),
            Screen::Reports(state) => state.dialog.as_ref(),
            Screen::ReportDetail(state) => state.dialog.as_ref(),
            Screen::Analyze(state) => state.dialog.as_ref(),
            _ => None,
        }
    }

    pub fn issue_request(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId::new(self.next_request)
    }

    pub fn redirect_deadline(&self) -> Instant {
        Instant::now() + self.settings.redirect_delay()
    }

    pub fn search_debounce(&self) -> Duration {
        self.settings.search_debounce()
    }

    /// Throbber of whatever is currently loading on screen, advanced by the UI tick.
    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        match self.current_screen_mut() {
            Screen::Projects(state) => state.list.loading.throbber(),
            Screen::Reports(state) => state.list.loading.throbber(),
            Screen::ProjectForm(state) => state.loading.throbber(),
            Screen::ProjectDetail(state) => {
                if state.loading.is_loading() {
                    return state.loading.throbber();
                }
                match state.tab {
                    DetailTab::Images => state.images.loading.throbber(),
                    DetailTab::Reports => state.reports.loading.throbber(),
                }
            }
            Screen::Upload(state) => state.loading.throbber(),
            Screen::Analyze(state) => match &mut state.analysis {
                AnalysisStatus::Running(throbber_state) => Some(throbber_state),
                _ => state.loading.throbber(),
            },
            Screen::ReportDetail(state) => state.loading.throbber(),
            Screen::Home(_) | Screen::Logs(_) => None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Home
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEntry {
    Projects,
    Reports,
    NewProject,
    Logs,
}

impl HomeEntry {
    pub const ALL: [HomeEntry; 4] = [
        HomeEntry::Projects,
        HomeEntry::Reports,
        HomeEntry::NewProject,
        HomeEntry::Logs,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            HomeEntry::Projects => "Projects",
            HomeEntry::Reports => "Reports",
            HomeEntry::NewProject => "New project",
            HomeEntry::Logs => "Logs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HomeEntry::Projects => "Browse patient cases and their radiographs",
            HomeEntry::Reports => "Review saved angle measurement reports",
            HomeEntry::NewProject => "Open a new patient case",
            HomeEntry::Logs => "Inspect the session log",
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct HomeState {
    pub table_state: RefCell<TableState>,
}

impl HomeState {
    pub fn new() -> Self {
        Self {
            table_state: RefCell::new(TableState::default().with_selected(0)),
        }
    }

    pub fn selected_entry(&self) -> Option<HomeEntry> {
        let index = self.table_state.borrow().selected().unwrap_or(0);
        HomeEntry::ALL.get(index).copied()
    }
}

// ============================================================================
// Lists
// ============================================================================

/// A searchable, paginated collection loaded in full from the backend.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    pub search: Debounced,
    pub input_mode: InputMode,
    /// Requested page (1-based). Clamped whenever the page is derived.
    pub page: usize,
    pub page_size: usize,
    pub table_state: RefCell<TableState>,
}

impl<T: Searchable + Clone> ListPage<T> {
    pub fn new(page_size: usize, debounce: Duration) -> Self {
        Self {
            items: Vec::new(),
            loading: LoadingState::NotStarted,
            request: None,
            search: Debounced::new(debounce),
            input_mode: InputMode::Normal,
            page: 1,
            page_size,
            table_state: RefCell::new(TableState::default()),
        }
    }

    /// Items matching the committed search term.
    pub fn filtered(&self) -> Vec<&T> {
        search::filter(&self.items, self.search.committed())
    }

    pub fn current_page(&self) -> Page<&T> {
        pagination::paginate(&self.filtered(), self.page_size, self.page)
    }

    pub fn selected(&self) -> Option<&T> {
        let index = self.table_state.borrow().selected()?;
        self.current_page().items.get(index).copied()
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = LoadingState::Loaded;
        self.clamp_page();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
        self.select_first();
    }

    /// The committed search term changed: start over from the first page.
    pub fn search_committed(&mut self) {
        tracing::debug!("Search committed: {:?}", self.search.committed());
        self.page = 1;
        self.select_first();
    }

    fn clamp_page(&mut self) {
        let (effective_page, len) = {
            let page = self.current_page();
            (page.effective_page, page.items.len())
        };
        self.page = effective_page;

        let mut table_state = self.table_state.borrow_mut();
        match table_state.selected() {
            _ if len == 0 => table_state.select(None),
            Some(selected) if selected >= len => table_state.select(Some(len - 1)),
            None => table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn select_first(&self) {
        let has_items = !self.current_page().items.is_empty();
        self.table_state
            .borrow_mut()
            .select(has_items.then_some(0));
    }
}

#[derive(Debug, Clone)]
pub struct ProjectsState {
    pub list: ListPage<Project>,
}

impl ProjectsState {
    pub fn new(settings: &UiSettings) -> Self {
        Self {
            list: ListPage::new(settings.projects_page_size, settings.search_debounce()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportsState {
    pub list: ListPage<Report>,
    pub dialog: Option<DialogState>,
}

impl ReportsState {
    pub fn new(settings: &UiSettings) -> Self {
        Self {
            list: ListPage::new(settings.reports_page_size, settings.search_debounce()),
            dialog: None,
        }
    }
}

// ============================================================================
// Project form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProjectId),
}

#[derive(Debug, Clone)]
pub struct ProjectFormState {
    pub mode: FormMode,
    pub form: FormState,
    /// The project as loaded, for edit mode. Only fields that differ are sent.
    pub original: Option<Project>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    pub redirect_at: Option<Instant>,
    pub submitting: bool,
}

impl ProjectFormState {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            form: project_form(None),
            original: None,
            loading: LoadingState::Loaded,
            request: None,
            redirect_at: None,
            submitting: false,
        }
    }

    pub fn edit(project_id: ProjectId, request: RequestId) -> Self {
        Self {
            mode: FormMode::Edit(project_id),
            form: project_form(None),
            original: None,
            loading: LoadingState::started(),
            request: Some(request),
            redirect_at: None,
            submitting: false,
        }
    }
}

// ============================================================================
// Project detail
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Images,
    Reports,
}

impl DetailTab {
    pub fn toggled(self) -> Self {
        match self {
            DetailTab::Images => DetailTab::Reports,
            DetailTab::Reports => DetailTab::Images,
        }
    }
}

/// A lazily loaded tab with its own loading state.
#[derive(Debug, Clone)]
pub struct TabState<T> {
    pub items: Vec<T>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    pub table_state: RefCell<TableState>,
}

impl<T> Default for TabState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: LoadingState::NotStarted,
            request: None,
            table_state: RefCell::new(TableState::default()),
        }
    }
}

impl<T> TabState<T> {
    pub fn selected(&self) -> Option<&T> {
        let index = self.table_state.borrow().selected()?;
        self.items.get(index)
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        let len = items.len();
        self.items = items;
        self.loading = LoadingState::Loaded;

        let mut table_state = self.table_state.borrow_mut();
        match table_state.selected() {
            _ if len == 0 => table_state.select(None),
            Some(selected) if selected >= len => table_state.select(Some(len - 1)),
            None => table_state.select(Some(0)),
            Some(_) => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectDetailState {
    pub project_id: ProjectId,
    pub project: Option<Project>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    /// Set once the project turned out not to exist.
    pub redirect_at: Option<Instant>,
    pub tab: DetailTab,
    pub images: TabState<Image>,
    pub reports: TabState<Report>,
    pub dialog: Option<DialogState>,
}

impl ProjectDetailState {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            project: None,
            loading: LoadingState::NotStarted,
            request: None,
            redirect_at: None,
            tab: DetailTab::default(),
            images: TabState::default(),
            reports: TabState::default(),
            dialog: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.redirect_at.is_some()
    }
}

// ============================================================================
// Upload
// ============================================================================

#[derive(Debug, Clone)]
pub struct UploadState {
    pub project_id: ProjectId,
    pub project: Option<Project>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    pub redirect_at: Option<Instant>,
    pub path_input: String,
    pub selection: Selection,
    pub uploading: bool,
    pub error: Option<String>,
}

impl UploadState {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            project: None,
            loading: LoadingState::NotStarted,
            request: None,
            redirect_at: None,
            path_input: String::new(),
            selection: Selection::default(),
            uploading: false,
            error: None,
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Running(ThrobberState),
    /// Measurements per analysis target, in target order.
    Done(Vec<Vec<AngleMeasurement>>),
}

#[derive(Debug, Clone)]
pub struct AnalyzeState {
    pub project_id: ProjectId,
    pub project: Option<Project>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    pub redirect_at: Option<Instant>,
    pub images: TabState<Image>,
    pub analysis: AnalysisStatus,
    pub analysis_request: Option<RequestId>,
    pub dialog: Option<DialogState>,
}

impl AnalyzeState {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            project: None,
            loading: LoadingState::NotStarted,
            request: None,
            redirect_at: None,
            images: TabState::default(),
            analysis: AnalysisStatus::Idle,
            analysis_request: None,
            dialog: None,
        }
    }

    /// Analysis needs a loaded project that reports at least one image.
    pub fn can_analyze(&self) -> bool {
        self.project.as_ref().is_some_and(Project::can_analyze)
    }

    pub fn targets(&self) -> Vec<AnalysisTarget> {
        let image_count = self.project.as_ref().map_or(0, |p| p.image_count);
        AnalysisTarget::from_images(&self.images.items, image_count)
    }

    pub fn selected_index(&self) -> usize {
        self.images.table_state.borrow().selected().unwrap_or(0)
    }

    /// Measurements for the selected target once the analysis has finished.
    pub fn selected_results(&self) -> Option<&[AngleMeasurement]> {
        match &self.analysis {
            AnalysisStatus::Done(results) => results.get(self.selected_index()).map(Vec::as_slice),
            _ => None,
        }
    }
}

// ============================================================================
// Report detail
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReportDetailState {
    pub report_id: ReportId,
    pub report: Option<Report>,
    pub loading: LoadingState,
    pub request: Option<RequestId>,
    pub redirect_at: Option<Instant>,
    pub dialog: Option<DialogState>,
}

impl ReportDetailState {
    pub fn new(report_id: ReportId) -> Self {
        Self {
            report_id,
            report: None,
            loading: LoadingState::NotStarted,
            request: None,
            redirect_at: None,
            dialog: None,
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct LogsState {
    pub scroll_offset: usize,
    pub total_entries: usize,
}

// ============================================================================
// Selection
// ============================================================================

pub trait Scrollable {
    fn num_items(&self) -> usize;
    fn table_state(&self) -> &RefCell<TableState>;

    fn select_prev(&mut self) {
        let mut table_state = self.table_state().borrow_mut();
        if self.num_items() > 0 {
            if table_state.selected().unwrap_or(0) == 0 {
                table_state.select(Some(self.num_items() - 1));
            } else {
                table_state.scroll_up_by(1)
            }
        }
    }

    fn select_next(&mut self) {
        let num_items = self.num_items();
        let mut table_state = self.table_state().borrow_mut();
        if num_items > 0 {
            if table_state.selected().unwrap_or(num_items - 1) >= num_items - 1 {
                table_state.select_first();
            } else {
                table_state.scroll_down_by(1)
            }
        }
    }

    fn select_top(&mut self) {
        let has_items = self.num_items() > 0;
        self.table_state()
            .borrow_mut()
            .select(has_items.then_some(0));
    }

    fn select_bottom(&mut self) {
        let num_items = self.num_items();
        self.table_state()
            .borrow_mut()
            .select(num_items.checked_sub(1));
    }
}

impl Scrollable for HomeState {
    fn num_items(&self) -> usize {
        HomeEntry::ALL.len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.table_state
    }
}

impl<T: Searchable + Clone> Scrollable for ListPage<T> {
    fn num_items(&self) -> usize {
        self.current_page().items.len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.table_state
    }
}

impl<T> Scrollable for TabState<T> {
    fn num_items(&self) -> usize {
        self.items.len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.table_state
    }
}

// Targets fall back to numbered placeholders, so selection follows them rather than
// the loaded image list.
impl Scrollable for AnalyzeState {
    fn num_items(&self) -> usize {
        self.targets().len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.images.table_state
    }
}
