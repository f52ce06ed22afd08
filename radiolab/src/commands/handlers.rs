use crate::events::AppCommand;
use crate::input::{Key, KeyEvent};
use crate::routes::Route;
use crate::state::*;
use crate::ui::screens::Screen;

/// Map user input (KeyEvent) to AppCommand based on current UI state
/// Returns None if the key should be ignored
pub fn handle_key_input(event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = event.key;

    // Priority 1: Modal dialogs take every key
    if let Some(dialog) = state.active_dialog() {
        return handle_dialog_keys(event, dialog);
    }

    // Priority 2: Text entry screens
    match state.current_screen() {
        Screen::ProjectForm(form_state) => {
            if form_state.submitting {
                return None;
            }
            if form_state.redirect_at.is_some() {
                return matches!(key, Key::Esc).then_some(AppCommand::Cancel);
            }
            return handle_form_keys(event);
        }
        Screen::Upload(upload_state) if upload_state.redirect_at.is_none() => {
            if upload_state.uploading {
                return None;
            }
            return handle_upload_keys(event);
        }
        _ => {}
    }

    // Priority 3: Search mode on list screens
    if let Some(InputMode::Search) = list_input_mode(state.current_screen()) {
        return match key {
            Key::Enter => Some(AppCommand::ExitSearchMode),
            Key::Backspace => Some(AppCommand::DeleteSearchChar),
            Key::Char(c) => Some(AppCommand::AppendSearchChar(c)),
            Key::Esc => Some(AppCommand::ClearSearch),
            _ => None,
        };
    }

    // Priority 4: Help popup
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    // Priority 5: Esc clears an active search before it navigates
    if matches!(key, Key::Esc) && has_search_term(state.current_screen()) {
        return Some(AppCommand::ClearSearch);
    }

    // Handle multi-key sequences
    if let Some(pending) = state.pending_key {
        return match (pending, key) {
            ('g', Key::Char('h')) => Some(AppCommand::Redirect(Route::Home)),
            ('g', Key::Char('p')) => Some(AppCommand::Navigate(Route::Projects)),
            ('g', Key::Char('r')) => Some(AppCommand::Navigate(Route::Reports)),
            ('g', Key::Char('n')) => Some(AppCommand::Navigate(Route::ProjectCreate)),
            ('g', Key::Char('l')) => Some(AppCommand::NavigateToLogs),
            // 'g' followed by 'g' -> navigate to top of table
            ('g', Key::Char('g')) => Some(AppCommand::NavigateToTop),
            // Any other key clears the pending key
            _ => Some(AppCommand::ClearPendingKey),
        };
    }

    match (state.current_screen(), key) {
        // Global commands
        (_, Key::Char('?')) => Some(AppCommand::ToggleHelp),
        (_, Key::Char('q')) => Some(AppCommand::Quit),
        (_, Key::Char('g')) => Some(AppCommand::SetPendingKey('g')),
        (_, Key::Char('G')) => Some(AppCommand::NavigateToBottom),
        (_, Key::Left | Key::Esc | Key::Char('h')) => Some(AppCommand::NavigateBack),
        (_, Key::Char('r')) => Some(AppCommand::Reload),
        (_, Key::Char('x')) => Some(AppCommand::DismissNotification),

        // Home screen
        (Screen::Home(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Home(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),
        (Screen::Home(home_state), Key::Enter | Key::Right | Key::Char('l')) => {
            home_state.selected_entry().map(|entry| match entry {
                HomeEntry::Projects => AppCommand::Navigate(Route::Projects),
                HomeEntry::Reports => AppCommand::Navigate(Route::Reports),
                HomeEntry::NewProject => AppCommand::Navigate(Route::ProjectCreate),
                HomeEntry::Logs => AppCommand::NavigateToLogs,
            })
        }

        // Projects screen
        (Screen::Projects(..), Key::Char('/')) => Some(AppCommand::EnterSearchMode),
        (Screen::Projects(..), Key::Char('n')) => Some(AppCommand::Navigate(Route::ProjectCreate)),
        (Screen::Projects(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Projects(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),
        (Screen::Projects(..), Key::Char(']') | Key::PageDown) => Some(AppCommand::NextPage),
        (Screen::Projects(..), Key::Char('[') | Key::PageUp) => Some(AppCommand::PreviousPage),
        (Screen::Projects(projects_state), Key::Enter | Key::Right | Key::Char('l')) => {
            projects_state
                .list
                .selected()
                .map(|project| AppCommand::Navigate(Route::ProjectDetail(project.id)))
        }

        // Reports screen
        (Screen::Reports(..), Key::Char('/')) => Some(AppCommand::EnterSearchMode),
        (Screen::Reports(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Reports(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),
        (Screen::Reports(..), Key::Char(']') | Key::PageDown) => Some(AppCommand::NextPage),
        (Screen::Reports(..), Key::Char('[') | Key::PageUp) => Some(AppCommand::PreviousPage),
        (Screen::Reports(..), Key::Char('p')) => Some(AppCommand::DownloadPdf),
        (Screen::Reports(reports_state), Key::Char('d')) => reports_state
            .list
            .selected()
            .map(|_| AppCommand::OpenDeleteSelected),
        (Screen::Reports(reports_state), Key::Enter | Key::Right | Key::Char('l')) => reports_state
            .list
            .selected()
            .map(|report| AppCommand::Navigate(Route::ReportDetail(report.id))),

        // Project detail screen
        (Screen::ProjectDetail(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::ProjectDetail(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),
        (Screen::ProjectDetail(..), Key::Tab | Key::BackTab) => Some(AppCommand::SwitchTab),
        (Screen::ProjectDetail(detail), key) => handle_project_detail_keys(key, detail),

        // Upload screen while its project is missing
        (Screen::Upload(..), _) => None,

        // Analyze screen
        (Screen::Analyze(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Analyze(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),
        (Screen::Analyze(..), Key::Enter | Key::Char('a')) => Some(AppCommand::RunAnalysis),
        (Screen::Analyze(..), Key::Char('s')) => Some(AppCommand::OpenSaveReport),
        (Screen::Analyze(..), Key::Char('p')) => Some(AppCommand::DownloadPdf),
        (Screen::Analyze(analyze_state), Key::Char('u')) => Some(AppCommand::Navigate(
            Route::Upload(analyze_state.project_id),
        )),

        // Report detail screen
        (Screen::ReportDetail(detail), Key::Char('e')) => {
            detail.report.as_ref().map(|_| AppCommand::OpenEditReport)
        }
        (Screen::ReportDetail(detail), Key::Char('d')) => {
            detail.report.as_ref().map(|_| AppCommand::OpenDeleteSelected)
        }
        (Screen::ReportDetail(..), Key::Char('p')) => Some(AppCommand::DownloadPdf),
        (Screen::ReportDetail(detail), Key::Char('o')) => detail
            .report
            .as_ref()
            .map(|report| AppCommand::Navigate(Route::ProjectDetail(report.project_id))),

        // Logs screen
        (Screen::Logs(..), Key::Up | Key::Char('k')) => Some(AppCommand::ScrollLogsUp),
        (Screen::Logs(..), Key::Down | Key::Char('j')) => Some(AppCommand::ScrollLogsDown),
        (Screen::Logs(..), Key::PageUp) => Some(AppCommand::ScrollLogsPageUp),
        (Screen::Logs(..), Key::PageDown) => Some(AppCommand::ScrollLogsPageDown),

        // Ignore other keys
        _ => None,
    }
}

fn handle_project_detail_keys(key: Key, detail: &ProjectDetailState) -> Option<AppCommand> {
    // Project actions need the project itself
    let project = detail.project.as_ref()?;

    match key {
        Key::Char('e') => Some(AppCommand::Navigate(Route::ProjectEdit(project.id))),
        Key::Char('u') => Some(AppCommand::Navigate(Route::Upload(project.id))),
        Key::Char('a') if project.can_analyze() => {
            Some(AppCommand::Navigate(Route::Analyze(project.id)))
        }
        Key::Char('D') => Some(AppCommand::OpenDeleteProject),
        Key::Char('d') => {
            let has_selection = match detail.tab {
                DetailTab::Images => detail.images.selected().is_some(),
                DetailTab::Reports => detail.reports.selected().is_some(),
            };
            has_selection.then_some(AppCommand::OpenDeleteSelected)
        }
        Key::Enter | Key::Right | Key::Char('l') if detail.tab == DetailTab::Reports => detail
            .reports
            .selected()
            .map(|report| AppCommand::Navigate(Route::ReportDetail(report.id))),
        _ => None,
    }
}

/// Keys while a modal dialog is open
fn handle_dialog_keys(event: KeyEvent, dialog: &DialogState) -> Option<AppCommand> {
    if dialog.busy {
        return None;
    }
    let key = event.key;

    match &dialog.dialog {
        Dialog::DeleteProject { .. } => {
            if event.is_ctrl('l') {
                return Some(AppCommand::ClearInput);
            }
            match key {
                Key::Enter => Some(AppCommand::Submit),
                Key::Esc => Some(AppCommand::Cancel),
                Key::Backspace => Some(AppCommand::DeleteInputChar),
                Key::Char(c) => Some(AppCommand::AppendInputChar(c)),
                _ => None,
            }
        }
        Dialog::DeleteReport { .. } | Dialog::DeleteImage { .. } => match key {
            Key::Enter | Key::Char('y') => Some(AppCommand::Submit),
            Key::Esc | Key::Char('n') => Some(AppCommand::Cancel),
            _ => None,
        },
        Dialog::EditReport { .. } | Dialog::SaveReport { .. } => handle_form_keys(event),
    }
}

/// Keys for multi-field forms (project form, report dialogs)
fn handle_form_keys(event: KeyEvent) -> Option<AppCommand> {
    // Ctrl+L to clear current field
    if event.is_ctrl('l') {
        return Some(AppCommand::ClearInput);
    }

    match event.key {
        Key::Tab | Key::Down => Some(AppCommand::NextField),
        Key::BackTab | Key::Up => Some(AppCommand::PreviousField),
        Key::Enter => Some(AppCommand::Submit),
        Key::Esc => Some(AppCommand::Cancel),
        Key::Backspace => Some(AppCommand::DeleteInputChar),
        Key::Char(c) => Some(AppCommand::AppendInputChar(c)),
        _ => None,
    }
}

/// Keys on the upload screen: the path line takes text, actions use Ctrl
fn handle_upload_keys(event: KeyEvent) -> Option<AppCommand> {
    if event.is_ctrl('u') {
        return Some(AppCommand::StartUpload);
    }
    if event.is_ctrl('d') {
        return Some(AppCommand::RemoveLastFile);
    }
    if event.is_ctrl('l') {
        return Some(AppCommand::ClearInput);
    }

    match event.key {
        Key::Enter => Some(AppCommand::Submit),
        Key::Esc => Some(AppCommand::Cancel),
        Key::Backspace => Some(AppCommand::DeleteInputChar),
        Key::Char(c) => Some(AppCommand::AppendInputChar(c)),
        _ => None,
    }
}

fn list_input_mode(screen: &Screen) -> Option<InputMode> {
    match screen {
        Screen::Projects(projects_state) => Some(projects_state.list.input_mode),
        Screen::Reports(reports_state) => Some(reports_state.list.input_mode),
        _ => None,
    }
}

fn has_search_term(screen: &Screen) -> bool {
    match screen {
        Screen::Projects(projects_state) => !projects_state.list.search.draft().is_empty(),
        Screen::Reports(reports_state) => !reports_state.list.search.draft().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiolab_api::endpoints::{
        images::Image, projects::Project, reports::Report, ImageId, ProjectId, ReportId,
    };

    fn project(image_count: u32) -> Project {
        Project {
            id: ProjectId::new(3),
            name: "Hallux study".to_string(),
            patient_id: "PAC-003".to_string(),
            description: Some("Left foot".to_string()),
            date: "15/04/2025".to_string(),
            image_count,
            report_count: 1,
        }
    }

    fn report(id: u64) -> Report {
        Report {
            id: ReportId::new(id),
            project_id: ProjectId::new(3),
            project_name: "Hallux study".to_string(),
            patient_id: "PAC-003".to_string(),
            name: Some(format!("Report {id}")),
            date: "15/04/2025".to_string(),
            image_count: 1,
            angles: Vec::new(),
            notes: None,
        }
    }

    fn on_screen(screen: Screen) -> AppState {
        let mut state = AppState::new();
        state.history = vec![screen];
        state
    }

    fn detail_state(image_count: u32) -> AppState {
        let mut detail = ProjectDetailState::new(ProjectId::new(3));
        detail.project = Some(project(image_count));
        detail.loading = LoadingState::Loaded;
        on_screen(Screen::ProjectDetail(Box::new(detail)))
    }

    fn reports_state() -> AppState {
        let state = AppState::new();
        let mut reports = ReportsState::new(&state.settings);
        reports.list.set_items(vec![report(1), report(2)]);
        on_screen(Screen::Reports(reports))
    }

    fn press(state: &AppState, key: Key) -> Option<AppCommand> {
        handle_key_input(KeyEvent::new(key), state)
    }

    // ============================================================================
    // Global Commands
    // ============================================================================

    #[test]
    fn test_quit_command() {
        let state = AppState::new();
        assert_eq!(press(&state, Key::Char('q')), Some(AppCommand::Quit));
    }

    #[test]
    fn test_help_visible_blocks_other_commands() {
        let mut state = reports_state();
        state.help_visible = true;

        assert_eq!(press(&state, Key::Char('j')), None);
        assert_eq!(press(&state, Key::Esc), Some(AppCommand::ToggleHelp));
    }

    #[test]
    fn test_g_sequences() {
        let mut state = AppState::new();
        assert_eq!(
            press(&state, Key::Char('g')),
            Some(AppCommand::SetPendingKey('g'))
        );

        state.pending_key = Some('g');
        assert_eq!(
            press(&state, Key::Char('p')),
            Some(AppCommand::Navigate(Route::Projects))
        );
        assert_eq!(
            press(&state, Key::Char('r')),
            Some(AppCommand::Navigate(Route::Reports))
        );
        assert_eq!(
            press(&state, Key::Char('z')),
            Some(AppCommand::ClearPendingKey)
        );
    }

    #[test]
    fn test_home_enter_opens_selected_entry() {
        let state = AppState::new();
        assert_eq!(
            press(&state, Key::Enter),
            Some(AppCommand::Navigate(Route::Projects))
        );
    }

    // ============================================================================
    // Lists
    // ============================================================================

    #[test]
    fn test_search_mode_captures_characters() {
        let mut state = reports_state();
        if let Screen::Reports(reports) = state.current_screen_mut() {
            reports.list.input_mode = InputMode::Search;
        }

        assert_eq!(
            press(&state, Key::Char('q')),
            Some(AppCommand::AppendSearchChar('q'))
        );
        assert_eq!(press(&state, Key::Enter), Some(AppCommand::ExitSearchMode));
        assert_eq!(press(&state, Key::Esc), Some(AppCommand::ClearSearch));
    }

    #[test]
    fn test_esc_clears_search_before_going_back() {
        let mut state = reports_state();
        assert_eq!(press(&state, Key::Esc), Some(AppCommand::NavigateBack));

        if let Screen::Reports(reports) = state.current_screen_mut() {
            reports.list.search.push('r', std::time::Instant::now());
        }
        assert_eq!(press(&state, Key::Esc), Some(AppCommand::ClearSearch));
    }

    #[test]
    fn test_enter_opens_selected_report() {
        let state = reports_state();
        assert_eq!(
            press(&state, Key::Enter),
            Some(AppCommand::Navigate(Route::ReportDetail(ReportId::new(1))))
        );
        assert_eq!(
            press(&state, Key::Char('d')),
            Some(AppCommand::OpenDeleteSelected)
        );
    }

    // ============================================================================
    // Project detail
    // ============================================================================

    #[test]
    fn test_analyze_unavailable_without_images() {
        let state = detail_state(0);
        assert_eq!(press(&state, Key::Char('a')), None);

        let state = detail_state(2);
        assert_eq!(
            press(&state, Key::Char('a')),
            Some(AppCommand::Navigate(Route::Analyze(ProjectId::new(3))))
        );
    }

    #[test]
    fn test_project_actions_wait_for_project() {
        let state = on_screen(Screen::ProjectDetail(Box::new(ProjectDetailState::new(
            ProjectId::new(3),
        ))));
        assert_eq!(press(&state, Key::Char('e')), None);
        assert_eq!(press(&state, Key::Char('D')), None);
    }

    #[test]
    fn test_delete_selected_image() {
        let mut state = detail_state(1);
        if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
            detail.images.set_items(vec![Image {
                id: ImageId::new("img-1"),
                project_id: ProjectId::new(3),
                name: "left.png".to_string(),
                url: "/uploads/left.png".to_string(),
                content_type: "image/png".to_string(),
                size: 10,
                uploaded_at: "2025-04-15T10:00:00Z".to_string(),
            }]);
        }
        assert_eq!(
            press(&state, Key::Char('d')),
            Some(AppCommand::OpenDeleteSelected)
        );
    }

    // ============================================================================
    // Dialogs and forms
    // ============================================================================

    #[test]
    fn test_typed_confirmation_dialog_takes_letters() {
        let mut state = detail_state(1);
        if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
            detail.dialog = Some(DialogState::new(Dialog::DeleteProject {
                project_id: ProjectId::new(3),
                project_name: "Hallux study".to_string(),
                typed: String::new(),
            }));
        }

        assert_eq!(
            press(&state, Key::Char('q')),
            Some(AppCommand::AppendInputChar('q'))
        );
        assert_eq!(press(&state, Key::Esc), Some(AppCommand::Cancel));
    }

    #[test]
    fn test_busy_dialog_ignores_keys() {
        let mut state = reports_state();
        if let Screen::Reports(reports) = state.current_screen_mut() {
            let mut dialog = DialogState::new(Dialog::DeleteReport {
                report_id: ReportId::new(1),
                project_id: ProjectId::new(3),
                name: "Report 1".to_string(),
            });
            dialog.busy = true;
            reports.dialog = Some(dialog);
        }
        assert_eq!(press(&state, Key::Char('y')), None);
        assert_eq!(press(&state, Key::Char('q')), None);
    }

    #[test]
    fn test_project_form_keys() {
        let state = on_screen(Screen::ProjectForm(Box::new(ProjectFormState::create())));

        assert_eq!(
            press(&state, Key::Char('j')),
            Some(AppCommand::AppendInputChar('j'))
        );
        assert_eq!(press(&state, Key::Tab), Some(AppCommand::NextField));
        assert_eq!(press(&state, Key::Enter), Some(AppCommand::Submit));
        assert_eq!(
            handle_key_input(KeyEvent::with_ctrl(Key::Char('l')), &state),
            Some(AppCommand::ClearInput)
        );
    }

    #[test]
    fn test_upload_ctrl_shortcuts() {
        let state = on_screen(Screen::Upload(Box::new(UploadState::new(ProjectId::new(3)))));

        assert_eq!(
            handle_key_input(KeyEvent::with_ctrl(Key::Char('u')), &state),
            Some(AppCommand::StartUpload)
        );
        assert_eq!(
            press(&state, Key::Char('u')),
            Some(AppCommand::AppendInputChar('u'))
        );
    }
}
