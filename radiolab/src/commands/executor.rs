use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::events::{AppCommand, Job, RequestId};
use crate::routes::Route;
use crate::state::form::FormState;
use crate::state::search::Searchable;
use crate::state::validators::{self, ValidationError};
use crate::state::*;
use crate::ui::screens::Screen;
use crate::uploads::{self, Selection};
use radiolab_api::endpoints::reports::{NewReport, Report};
use std::time::Instant;
use throbber_widgets_tui::ThrobberState;

const LOG_PAGE_SIZE: usize = 20;

/// Execute a command by updating state and spawning the background jobs it requests
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    for job in apply_command(command, state) {
        let task_id = job.task_id();
        tracing::debug!("Spawning background task {}", task_id);

        let data_loader = data_loader.clone();
        let future = async move {
            data_loader.run(job).await;
        };
        task_manager.spawn_load_task(task_id, future);
    }
}

/// Execute a command without spawning anything. Returns the jobs that would have been
/// started so tests can inspect them.
pub fn execute_command_sync(command: AppCommand, state: &mut AppState) -> Vec<Job> {
    apply_command(command, state)
}

fn apply_command(command: AppCommand, state: &mut AppState) -> Vec<Job> {
    // Ticks arrive between the two keys of a sequence and must not cancel it
    let keeps_pending_key = matches!(command, AppCommand::SetPendingKey(_) | AppCommand::Tick(_));

    let jobs = match command {
        // Selection
        AppCommand::SelectNext => {
            if let Some(target) = selection_target(state.current_screen_mut()) {
                target.select_next();
            }
            Vec::new()
        }
        AppCommand::SelectPrevious => {
            if let Some(target) = selection_target(state.current_screen_mut()) {
                target.select_prev();
            }
            Vec::new()
        }
        AppCommand::NavigateToTop => {
            match state.current_screen_mut() {
                Screen::Logs(s) => s.scroll_offset = s.total_entries.saturating_sub(1),
                screen => {
                    if let Some(target) = selection_target(screen) {
                        target.select_top();
                    }
                }
            }
            Vec::new()
        }
        AppCommand::NavigateToBottom => {
            match state.current_screen_mut() {
                Screen::Logs(s) => s.scroll_offset = 0,
                screen => {
                    if let Some(target) = selection_target(screen) {
                        target.select_bottom();
                    }
                }
            }
            Vec::new()
        }
        AppCommand::NextPage => {
            match state.current_screen_mut() {
                Screen::Projects(s) => s.list.set_page(s.list.page + 1),
                Screen::Reports(s) => s.list.set_page(s.list.page + 1),
                _ => {}
            }
            Vec::new()
        }
        AppCommand::PreviousPage => {
            match state.current_screen_mut() {
                Screen::Projects(s) => s.list.set_page(s.list.page.saturating_sub(1).max(1)),
                Screen::Reports(s) => s.list.set_page(s.list.page.saturating_sub(1).max(1)),
                _ => {}
            }
            Vec::new()
        }

        // Navigation
        AppCommand::Navigate(route) => {
            tracing::info!("Opening {}", route.path());
            let (screen, jobs) = screen_for(state, route);
            state.navigate_to(screen);
            jobs
        }
        AppCommand::Redirect(route) => redirect_to(state, route),
        AppCommand::NavigateBack => {
            if state.navigate_back() {
                reload_current(state)
            } else {
                Vec::new()
            }
        }
        AppCommand::Reload => reload_current(state),

        AppCommand::Tick(now) => tick(state, now),

        // Search
        AppCommand::EnterSearchMode => {
            if let Some(search) = search_target(state.current_screen_mut()) {
                search.set_input_mode(InputMode::Search);
            }
            Vec::new()
        }
        AppCommand::ExitSearchMode => {
            if let Some(search) = search_target(state.current_screen_mut()) {
                search.set_input_mode(InputMode::Normal);
                search.flush_search();
            }
            Vec::new()
        }
        AppCommand::AppendSearchChar(c) => {
            if let Some(search) = search_target(state.current_screen_mut()) {
                search.push_search(c);
            }
            Vec::new()
        }
        AppCommand::DeleteSearchChar => {
            if let Some(search) = search_target(state.current_screen_mut()) {
                search.pop_search();
            }
            Vec::new()
        }
        AppCommand::ClearSearch => {
            if let Some(search) = search_target(state.current_screen_mut()) {
                search.set_input_mode(InputMode::Normal);
                search.clear_search();
            }
            Vec::new()
        }

        AppCommand::SwitchTab => switch_tab(state),

        // Text input
        AppCommand::NextField => {
            if let Some(TextTarget::Form(form)) = text_target(state.current_screen_mut()) {
                form.next_field();
            }
            Vec::new()
        }
        AppCommand::PreviousField => {
            if let Some(TextTarget::Form(form)) = text_target(state.current_screen_mut()) {
                form.previous_field();
            }
            Vec::new()
        }
        AppCommand::AppendInputChar(c) => {
            match text_target(state.current_screen_mut()) {
                Some(TextTarget::Line(text)) => text.push(c),
                Some(TextTarget::Form(form)) => form.push_char(c),
                None => {}
            }
            Vec::new()
        }
        AppCommand::DeleteInputChar => {
            match text_target(state.current_screen_mut()) {
                Some(TextTarget::Line(text)) => {
                    text.pop();
                }
                Some(TextTarget::Form(form)) => form.pop_char(),
                None => {}
            }
            Vec::new()
        }
        AppCommand::ClearInput => {
            match text_target(state.current_screen_mut()) {
                Some(TextTarget::Line(text)) => text.clear(),
                Some(TextTarget::Form(form)) => form.clear_field(),
                None => {}
            }
            Vec::new()
        }
        AppCommand::Submit => submit(state),
        AppCommand::Cancel => cancel(state),

        // Dialogs
        AppCommand::OpenDeleteProject => {
            if let Screen::ProjectDetail(s) = state.current_screen_mut() {
                if let Some(project) = &s.project {
                    s.dialog = Some(DialogState::new(Dialog::DeleteProject {
                        project_id: project.id,
                        project_name: project.name.clone(),
                        typed: String::new(),
                    }));
                }
            }
            Vec::new()
        }
        AppCommand::OpenDeleteSelected => {
            open_delete_selected(state.current_screen_mut());
            Vec::new()
        }
        AppCommand::OpenEditReport => {
            if let Screen::ReportDetail(s) = state.current_screen_mut() {
                if let Some(report) = &s.report {
                    s.dialog = Some(DialogState::new(Dialog::EditReport {
                        report_id: report.id,
                        form: report_form(&report.display_name(), report.notes_or_empty()),
                    }));
                }
            }
            Vec::new()
        }
        AppCommand::OpenSaveReport => {
            let mut warning = None;
            if let Screen::Analyze(s) = state.current_screen_mut() {
                let index = s.selected_index();
                let analyzed = s
                    .selected_results()
                    .is_some_and(|results| !results.is_empty());
                match &s.project {
                    Some(project) if analyzed => {
                        let form = report_form(
                            &validators::default_analysis_name(project, index + 1),
                            &validators::default_analysis_notes(project, index + 1),
                        );
                        s.dialog = Some(DialogState::new(Dialog::SaveReport {
                            image_index: index,
                            form,
                        }));
                    }
                    _ => warning = Some(ValidationError::NotAnalyzed.to_string()),
                }
            }
            if let Some(warning) = warning {
                state.notifications.warning(warning);
            }
            Vec::new()
        }

        // Upload
        AppCommand::StartUpload => match state.current_screen_mut() {
            Screen::Upload(s) if !s.uploading => {
                if s.selection.accepted.is_empty() {
                    s.error = Some(ValidationError::NoFiles.to_string());
                    Vec::new()
                } else {
                    tracing::info!(
                        "Uploading {} file(s) to project {}",
                        s.selection.accepted.len(),
                        s.project_id
                    );
                    s.uploading = true;
                    s.error = None;
                    vec![Job::UploadFiles {
                        project_id: s.project_id,
                        files: s.selection.accepted.clone(),
                    }]
                }
            }
            _ => Vec::new(),
        },
        AppCommand::RemoveLastFile => {
            if let Screen::Upload(s) = state.current_screen_mut() {
                if !s.uploading {
                    s.selection.accepted.pop();
                }
            }
            Vec::new()
        }

        AppCommand::RunAnalysis => run_analysis(state),

        AppCommand::DownloadPdf => {
            state
                .notifications
                .info("PDF report download is not implemented yet");
            Vec::new()
        }
        AppCommand::DismissNotification => {
            state.notifications.dismiss_latest();
            Vec::new()
        }
        AppCommand::ToggleHelp => {
            state.help_visible = !state.help_visible;
            Vec::new()
        }

        // Logs
        AppCommand::NavigateToLogs => {
            if !matches!(state.current_screen(), Screen::Logs(_)) {
                state.navigate_to(Screen::Logs(LogsState::default()));
            }
            Vec::new()
        }
        AppCommand::ScrollLogsUp => {
            if let Screen::Logs(s) = state.current_screen_mut() {
                // Scroll up means going back in time (increase offset)
                if s.scroll_offset < s.total_entries.saturating_sub(1) {
                    s.scroll_offset += 1;
                }
            }
            Vec::new()
        }
        AppCommand::ScrollLogsDown => {
            if let Screen::Logs(s) = state.current_screen_mut() {
                s.scroll_offset = s.scroll_offset.saturating_sub(1);
            }
            Vec::new()
        }
        AppCommand::ScrollLogsPageUp => {
            if let Screen::Logs(s) = state.current_screen_mut() {
                s.scroll_offset =
                    (s.scroll_offset + LOG_PAGE_SIZE).min(s.total_entries.saturating_sub(1));
            }
            Vec::new()
        }
        AppCommand::ScrollLogsPageDown => {
            if let Screen::Logs(s) = state.current_screen_mut() {
                s.scroll_offset = s.scroll_offset.saturating_sub(LOG_PAGE_SIZE);
            }
            Vec::new()
        }
        AppCommand::ScrollLogsToTop => {
            if let Screen::Logs(s) = state.current_screen_mut() {
                s.scroll_offset = s.total_entries.saturating_sub(1);
            }
            Vec::new()
        }
        AppCommand::ScrollLogsToBottom => {
            if let Screen::Logs(s) = state.current_screen_mut() {
                s.scroll_offset = 0;
            }
            Vec::new()
        }

        // Key sequences
        AppCommand::SetPendingKey(c) => {
            state.pending_key = Some(c);
            Vec::new()
        }
        AppCommand::ClearPendingKey => {
            state.pending_key = None;
            Vec::new()
        }

        AppCommand::Quit => {
            state.should_quit = true;
            Vec::new()
        }
    };

    if !keeps_pending_key {
        state.pending_key = None;
    }

    jobs
}

// ============================================================================
// Routing
// ============================================================================

/// Builds the screen for `route` in its loading state, with the jobs that fill it.
fn screen_for(state: &mut AppState, route: Route) -> (Screen, Vec<Job>) {
    let request = state.issue_request();

    match route {
        Route::Home => (Screen::Home(HomeState::new()), Vec::new()),
        Route::Projects => {
            let mut projects = ProjectsState::new(&state.settings);
            projects.list.request = Some(request);
            projects.list.loading = LoadingState::started();
            (
                Screen::Projects(projects),
                vec![Job::LoadProjects { request }],
            )
        }
        Route::Reports => {
            let mut reports = ReportsState::new(&state.settings);
            reports.list.request = Some(request);
            reports.list.loading = LoadingState::started();
            (Screen::Reports(reports), vec![Job::LoadReports { request }])
        }
        Route::ProjectCreate => (
            Screen::ProjectForm(Box::new(ProjectFormState::create())),
            Vec::new(),
        ),
        Route::ProjectEdit(project_id) => (
            Screen::ProjectForm(Box::new(ProjectFormState::edit(project_id, request))),
            vec![Job::LoadProject {
                project_id,
                request,
            }],
        ),
        Route::ProjectDetail(project_id) => {
            let tab_request = state.issue_request();
            let mut detail = ProjectDetailState::new(project_id);
            let jobs = load_project_detail(&mut detail, request, tab_request);
            (Screen::ProjectDetail(Box::new(detail)), jobs)
        }
        Route::Upload(project_id) => {
            let mut upload = UploadState::new(project_id);
            upload.request = Some(request);
            upload.loading = LoadingState::started();
            (
                Screen::Upload(Box::new(upload)),
                vec![Job::LoadProject {
                    project_id,
                    request,
                }],
            )
        }
        Route::Analyze(project_id) => {
            let images_request = state.issue_request();
            let mut analyze = AnalyzeState::new(project_id);
            let jobs = load_analyze(&mut analyze, request, images_request);
            (Screen::Analyze(Box::new(analyze)), jobs)
        }
        Route::ReportDetail(report_id) => {
            let mut detail = ReportDetailState::new(report_id);
            detail.request = Some(request);
            detail.loading = LoadingState::started();
            (
                Screen::ReportDetail(Box::new(detail)),
                vec![Job::LoadReport { report_id, request }],
            )
        }
    }
}

/// Replaces the current screen with `route`. Home and list pages already on the stack
/// are rewound to instead, so leaving a detail page never stacks a second list.
fn redirect_to(state: &mut AppState, route: Route) -> Vec<Job> {
    tracing::info!("Redirecting to {}", route.path());

    let reused = match route {
        Route::Home => state.rewind_to(|s| matches!(s, Screen::Home(_))),
        Route::Projects => state.rewind_to(|s| matches!(s, Screen::Projects(_))),
        Route::Reports => state.rewind_to(|s| matches!(s, Screen::Reports(_))),
        _ => false,
    };
    if reused {
        return reload_current(state);
    }

    let (screen, jobs) = screen_for(state, route);
    state.replace_current(screen);
    jobs
}

/// Leaves a form-like screen: back when there is somewhere to go back to, otherwise
/// to `fallback`.
fn leave(state: &mut AppState, fallback: Route) -> Vec<Job> {
    if state.navigate_back() {
        reload_current(state)
    } else {
        redirect_to(state, fallback)
    }
}

/// Re-issues the loads of the current screen, keeping its search, page and tab.
fn reload_current(state: &mut AppState) -> Vec<Job> {
    let request = state.issue_request();
    let second_request = state.issue_request();

    match state.current_screen_mut() {
        Screen::Projects(s) => {
            s.list.request = Some(request);
            s.list.loading = LoadingState::started();
            vec![Job::LoadProjects { request }]
        }
        Screen::Reports(s) => {
            s.list.request = Some(request);
            s.list.loading = LoadingState::started();
            vec![Job::LoadReports { request }]
        }
        Screen::ProjectDetail(s) => load_project_detail(s, request, second_request),
        Screen::Analyze(s) => load_analyze(s, request, second_request),
        Screen::Upload(s) if !s.uploading => {
            s.request = Some(request);
            s.loading = LoadingState::started();
            vec![Job::LoadProject {
                project_id: s.project_id,
                request,
            }]
        }
        Screen::ReportDetail(s) => {
            s.request = Some(request);
            s.loading = LoadingState::started();
            vec![Job::LoadReport {
                report_id: s.report_id,
                request,
            }]
        }
        // Reloading a form would discard what the user typed
        _ => Vec::new(),
    }
}

fn load_project_detail(
    detail: &mut ProjectDetailState,
    request: RequestId,
    tab_request: RequestId,
) -> Vec<Job> {
    let project_id = detail.project_id;
    detail.request = Some(request);
    detail.loading = LoadingState::started();

    let mut jobs = vec![Job::LoadProject {
        project_id,
        request,
    }];

    // Only the visible tab loads now; the other one loads when it is opened
    match detail.tab {
        DetailTab::Images => {
            detail.images.request = Some(tab_request);
            detail.images.loading = LoadingState::started();
            detail.reports.loading = LoadingState::NotStarted;
            jobs.push(Job::LoadProjectImages {
                project_id,
                request: tab_request,
            });
        }
        DetailTab::Reports => {
            detail.reports.request = Some(tab_request);
            detail.reports.loading = LoadingState::started();
            detail.images.loading = LoadingState::NotStarted;
            jobs.push(Job::LoadProjectReports {
                project_id,
                request: tab_request,
            });
        }
    }
    jobs
}

fn load_analyze(
    analyze: &mut AnalyzeState,
    request: RequestId,
    images_request: RequestId,
) -> Vec<Job> {
    if matches!(analyze.analysis, AnalysisStatus::Running(_)) {
        return Vec::new();
    }
    let project_id = analyze.project_id;

    analyze.request = Some(request);
    analyze.loading = LoadingState::started();
    analyze.images.request = Some(images_request);
    analyze.images.loading = LoadingState::started();

    vec![
        Job::LoadProject {
            project_id,
            request,
        },
        Job::LoadProjectImages {
            project_id,
            request: images_request,
        },
    ]
}

fn switch_tab(state: &mut AppState) -> Vec<Job> {
    let request = state.issue_request();
    let Screen::ProjectDetail(detail) = state.current_screen_mut() else {
        return Vec::new();
    };

    detail.tab = detail.tab.toggled();
    tracing::debug!("Switched project tab to {:?}", detail.tab);

    let project_id = detail.project_id;
    match detail.tab {
        DetailTab::Images if detail.images.loading == LoadingState::NotStarted => {
            detail.images.request = Some(request);
            detail.images.loading = LoadingState::started();
            vec![Job::LoadProjectImages {
                project_id,
                request,
            }]
        }
        DetailTab::Reports if detail.reports.loading == LoadingState::NotStarted => {
            detail.reports.request = Some(request);
            detail.reports.loading = LoadingState::started();
            vec![Job::LoadProjectReports {
                project_id,
                request,
            }]
        }
        _ => Vec::new(),
    }
}

// ============================================================================
// Clock
// ============================================================================

fn tick(state: &mut AppState, now: Instant) -> Vec<Job> {
    state.notifications.expire(now);

    let due = |redirect_at: Option<Instant>| redirect_at.is_some_and(|at| now >= at);
    let redirect = match state.current_screen_mut() {
        Screen::Projects(s) => {
            if s.list.search.poll(now).is_some() {
                s.list.search_committed();
            }
            None
        }
        Screen::Reports(s) => {
            if s.list.search.poll(now).is_some() {
                s.list.search_committed();
            }
            None
        }
        Screen::ProjectDetail(s) if due(s.redirect_at) => Some(Route::Projects),
        Screen::ProjectForm(s) if due(s.redirect_at) => Some(Route::Projects),
        Screen::Upload(s) if due(s.redirect_at) => Some(Route::Projects),
        Screen::Analyze(s) if due(s.redirect_at) => Some(Route::Projects),
        Screen::ReportDetail(s) if due(s.redirect_at) => Some(Route::Reports),
        _ => None,
    };

    match redirect {
        Some(route) => redirect_to(state, route),
        None => Vec::new(),
    }
}

// ============================================================================
// Forms and dialogs
// ============================================================================

fn submit(state: &mut AppState) -> Vec<Job> {
    if let Some(jobs) = confirm_dialog(state) {
        return jobs;
    }
    match state.current_screen() {
        Screen::ProjectForm(_) => submit_project_form(state),
        Screen::Upload(_) => add_upload_path(state),
        _ => Vec::new(),
    }
}

/// Confirms the open dialog. `None` when no dialog is open.
fn confirm_dialog(state: &mut AppState) -> Option<Vec<Job>> {
    let screen = state.current_screen_mut();
    let dialog = open_dialog(screen)?;
    if dialog.busy {
        return Some(Vec::new());
    }
    let dialog = dialog.dialog.clone();

    let outcome = match dialog {
        Dialog::DeleteProject {
            project_id,
            project_name,
            typed,
        } => validators::confirm_project_name(&typed, &project_name)
            .map(|()| Job::DeleteProject { project_id }),
        Dialog::DeleteReport {
            report_id,
            project_id,
            ..
        } => Ok(Job::DeleteReport {
            report_id,
            project_id,
        }),
        Dialog::DeleteImage {
            image_id,
            project_id,
            ..
        } => Ok(Job::DeleteImage {
            image_id,
            project_id,
        }),
        Dialog::EditReport { report_id, form } => validators::validate_report_edit(&form)
            .map(|update| Job::UpdateReport { report_id, update }),
        Dialog::SaveReport { image_index, form } => {
            new_report(screen, image_index, &form).map(|report| Job::CreateReport { report })
        }
    };

    match outcome {
        Ok(job) => {
            tracing::info!("Dialog confirmed, starting {}", job.task_id());
            if let Some(dialog) = open_dialog(state.current_screen_mut()) {
                dialog.busy = true;
            }
            Some(vec![job])
        }
        Err(error) => {
            tracing::debug!("Dialog input rejected: {}", error);
            let message = error.to_string();
            let shown_inline = match text_target(state.current_screen_mut()) {
                Some(TextTarget::Form(form)) => {
                    form.error = Some(message.clone());
                    true
                }
                _ => false,
            };
            if !shown_inline {
                state.notifications.warning(message);
            }
            Some(Vec::new())
        }
    }
}

fn new_report(
    screen: &Screen,
    image_index: usize,
    form: &FormState,
) -> Result<NewReport, ValidationError> {
    let Screen::Analyze(analyze) = screen else {
        return Err(ValidationError::NotAnalyzed);
    };
    let project = analyze
        .project
        .as_ref()
        .ok_or(ValidationError::NotAnalyzed)?;
    let angles = match &analyze.analysis {
        AnalysisStatus::Done(results) => results.get(image_index).cloned().unwrap_or_default(),
        _ => Vec::new(),
    };
    validators::validate_new_report(form, project, angles, &validators::today())
}

fn submit_project_form(state: &mut AppState) -> Vec<Job> {
    let today = validators::today();
    let mut unchanged = false;

    let jobs = match state.current_screen_mut() {
        Screen::ProjectForm(s) if !s.submitting => {
            let outcome = match (s.mode, &s.original) {
                (FormMode::Create, _) => validators::validate_new_project(&s.form, &today)
                    .map(|project| Some(Job::CreateProject { project })),
                (FormMode::Edit(project_id), Some(original)) => {
                    validators::validate_project_changes(&s.form, original).map(|update| {
                        (!update.is_empty()).then_some(Job::UpdateProject { project_id, update })
                    })
                }
                // The project is still loading
                (FormMode::Edit(_), None) => return Vec::new(),
            };

            match outcome {
                Ok(Some(job)) => {
                    s.submitting = true;
                    s.form.error = None;
                    vec![job]
                }
                Ok(None) => {
                    unchanged = true;
                    Vec::new()
                }
                Err(error) => {
                    s.form.error = Some(error.to_string());
                    Vec::new()
                }
            }
        }
        _ => Vec::new(),
    };

    if unchanged {
        state.notifications.info("No changes to save");
    }
    jobs
}

fn add_upload_path(state: &mut AppState) -> Vec<Job> {
    let mut skipped = None;
    if let Screen::Upload(s) = state.current_screen_mut() {
        let raw = s.path_input.trim().to_string();
        if raw.is_empty() || s.uploading {
            return Vec::new();
        }

        let scanned = uploads::scan(&raw);
        if !scanned.rejected.is_empty() {
            skipped = Some(format!("Skipped {}", scanned.rejected_names()));
        }
        s.selection.merge(Selection {
            accepted: scanned.accepted,
            rejected: Vec::new(),
        });
        s.path_input.clear();
        s.error = None;
    }
    if let Some(skipped) = skipped {
        state.notifications.warning(skipped);
    }
    Vec::new()
}

fn cancel(state: &mut AppState) -> Vec<Job> {
    if let Some(slot) = dialog_slot(state.current_screen_mut()) {
        match slot.as_ref().map(|dialog| dialog.busy) {
            Some(false) => {
                tracing::debug!("Dialog dismissed");
                *slot = None;
                return Vec::new();
            }
            Some(true) => return Vec::new(),
            None => {}
        }
    }

    let fallback = match state.current_screen() {
        Screen::ProjectForm(s) if !s.submitting => match s.mode {
            FormMode::Create => Route::Projects,
            FormMode::Edit(project_id) => Route::ProjectDetail(project_id),
        },
        Screen::Upload(s) if !s.uploading => Route::ProjectDetail(s.project_id),
        _ => return Vec::new(),
    };
    leave(state, fallback)
}

fn delete_report_dialog(report: &Report) -> Dialog {
    Dialog::DeleteReport {
        report_id: report.id,
        project_id: report.project_id,
        name: report.display_name(),
    }
}

fn open_delete_selected(screen: &mut Screen) {
    let (slot, dialog) = match screen {
        Screen::Reports(s) => {
            let dialog = s.list.selected().map(delete_report_dialog);
            (&mut s.dialog, dialog)
        }
        Screen::ProjectDetail(s) => {
            let dialog = match s.tab {
                DetailTab::Images => s.images.selected().map(|image| Dialog::DeleteImage {
                    image_id: image.id.clone(),
                    project_id: s.project_id,
                    name: image.name.clone(),
                }),
                DetailTab::Reports => s.reports.selected().map(delete_report_dialog),
            };
            (&mut s.dialog, dialog)
        }
        Screen::ReportDetail(s) => {
            let dialog = s.report.as_ref().map(delete_report_dialog);
            (&mut s.dialog, dialog)
        }
        _ => return,
    };
    if let Some(dialog) = dialog {
        *slot = Some(DialogState::new(dialog));
    }
}

fn run_analysis(state: &mut AppState) -> Vec<Job> {
    let request = state.issue_request();
    let mut warning = None;

    let jobs = match state.current_screen_mut() {
        Screen::Analyze(s) if s.dialog.is_none() && s.project.is_some() => {
            if matches!(s.analysis, AnalysisStatus::Running(_)) {
                Vec::new()
            } else if !s.can_analyze() {
                warning = Some("This project has no radiographs to analyze");
                Vec::new()
            } else {
                let targets = s.targets();
                tracing::info!(
                    "Analyzing {} radiograph(s) of project {}",
                    targets.len(),
                    s.project_id
                );
                s.analysis = AnalysisStatus::Running(ThrobberState::default());
                s.analysis_request = Some(request);
                vec![Job::Analyze { request, targets }]
            }
        }
        _ => Vec::new(),
    };

    if let Some(warning) = warning {
        state.notifications.warning(warning);
    }
    jobs
}

// ============================================================================
// Targets
// ============================================================================

fn selection_target(screen: &mut Screen) -> Option<&mut dyn Scrollable> {
    let target: &mut dyn Scrollable = match screen {
        Screen::Home(s) => s,
        Screen::Projects(s) => &mut s.list,
        Screen::Reports(s) if s.dialog.is_none() => &mut s.list,
        Screen::ProjectDetail(s) if s.dialog.is_none() => match s.tab {
            DetailTab::Images => &mut s.images,
            DetailTab::Reports => &mut s.reports,
        },
        Screen::Analyze(s) if s.dialog.is_none() => &mut **s,
        _ => return None,
    };
    Some(target)
}

fn dialog_slot(screen: &mut Screen) -> Option<&mut Option<DialogState>> {
    match screen {
        Screen::ProjectDetail(s) => Some(&mut s.dialog),
        Screen::Reports(s) => Some(&mut s.dialog),
        Screen::ReportDetail(s) => Some(&mut s.dialog),
        Screen::Analyze(s) => Some(&mut s.dialog),
        _ => None,
    }
}

fn open_dialog(screen: &mut Screen) -> Option<&mut DialogState> {
    dialog_slot(screen)?.as_mut()
}

/// Where typed characters go on the current screen.
enum TextTarget<'a> {
    /// Single-line input: the typed project name or the upload path.
    Line(&'a mut String),
    Form(&'a mut FormState),
}

fn text_target(screen: &mut Screen) -> Option<TextTarget<'_>> {
    // Guards are checked up front so the borrow checker can see the
    // dialog fallback does not overlap with the returned borrows.
    let direct = matches!(screen, Screen::ProjectForm(s) if !s.submitting)
        || matches!(screen, Screen::Upload(s) if !s.uploading);
    if direct {
        return match screen {
            Screen::ProjectForm(s) => Some(TextTarget::Form(&mut s.form)),
            Screen::Upload(s) => Some(TextTarget::Line(&mut s.path_input)),
            _ => None,
        };
    }
    let dialog = open_dialog(screen).filter(|dialog| !dialog.busy)?;
    match &mut dialog.dialog {
        Dialog::DeleteProject { typed, .. } => Some(TextTarget::Line(typed)),
        Dialog::EditReport { form, .. } | Dialog::SaveReport { form, .. } => {
            Some(TextTarget::Form(form))
        }
        Dialog::DeleteReport { .. } | Dialog::DeleteImage { .. } => None,
    }
}

/// Search box of the list on screen.
trait SearchTarget {
    fn set_input_mode(&mut self, mode: InputMode);
    fn push_search(&mut self, c: char);
    fn pop_search(&mut self);
    /// Commits the draft now.
    fn flush_search(&mut self);
    fn clear_search(&mut self);
}

impl<T: Searchable + Clone> SearchTarget for ListPage<T> {
    fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    fn push_search(&mut self, c: char) {
        self.search.push(c, Instant::now());
    }

    fn pop_search(&mut self) {
        self.search.pop(Instant::now());
    }

    fn flush_search(&mut self) {
        if self.search.flush().is_some() {
            self.search_committed();
        }
    }

    fn clear_search(&mut self) {
        if self.search.clear().is_some() {
            self.search_committed();
        }
    }
}

fn search_target(screen: &mut Screen) -> Option<&mut dyn SearchTarget> {
    let target: &mut dyn SearchTarget = match screen {
        Screen::Projects(s) => &mut s.list,
        Screen::Reports(s) if s.dialog.is_none() => &mut s.list,
        _ => return None,
    };
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiolab_api::endpoints::{projects::Project, ProjectId};

    fn project(image_count: u32) -> Project {
        Project {
            id: ProjectId::new(4),
            name: "Bunion left".to_string(),
            patient_id: "PAC-004".to_string(),
            description: None,
            date: "15/04/2025".to_string(),
            image_count,
            report_count: 0,
        }
    }

    #[test]
    fn test_navigate_issues_loads_for_detail() {
        let mut state = AppState::new();
        let jobs = execute_command_sync(
            AppCommand::Navigate(Route::ProjectDetail(ProjectId::new(4))),
            &mut state,
        );

        assert_eq!(jobs.len(), 2);
        assert!(matches!(jobs[0], Job::LoadProject { .. }));
        assert!(matches!(jobs[1], Job::LoadProjectImages { .. }));
        assert_eq!(state.depth(), 2);
    }

    #[test]
    fn test_redirect_to_open_list_rewinds() {
        let mut state = AppState::new();
        execute_command_sync(AppCommand::Navigate(Route::Reports), &mut state);
        execute_command_sync(
            AppCommand::Navigate(Route::ReportDetail(radiolab_api::endpoints::ReportId::new(2))),
            &mut state,
        );

        let jobs = execute_command_sync(AppCommand::Redirect(Route::Reports), &mut state);

        assert_eq!(state.depth(), 2);
        assert!(matches!(state.current_screen(), Screen::Reports(_)));
        assert!(matches!(jobs.as_slice(), [Job::LoadReports { .. }]));
    }

    #[test]
    fn test_pending_key_survives_ticks() {
        let mut state = AppState::new();
        execute_command_sync(AppCommand::SetPendingKey('g'), &mut state);
        execute_command_sync(AppCommand::Tick(Instant::now()), &mut state);
        assert_eq!(state.pending_key, Some('g'));

        execute_command_sync(AppCommand::SelectNext, &mut state);
        assert_eq!(state.pending_key, None);
    }

    #[test]
    fn test_switch_tab_loads_once() {
        let mut state = AppState::new();
        execute_command_sync(
            AppCommand::Navigate(Route::ProjectDetail(ProjectId::new(4))),
            &mut state,
        );

        let first = execute_command_sync(AppCommand::SwitchTab, &mut state);
        assert!(matches!(first.as_slice(), [Job::LoadProjectReports { .. }]));

        if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
            detail.reports.set_items(Vec::new());
        }
        execute_command_sync(AppCommand::SwitchTab, &mut state);
        let again = execute_command_sync(AppCommand::SwitchTab, &mut state);
        assert!(again.is_empty());
    }

    #[test]
    fn test_delete_project_requires_exact_name() {
        let mut state = AppState::new();
        execute_command_sync(
            AppCommand::Navigate(Route::ProjectDetail(ProjectId::new(4))),
            &mut state,
        );
        if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
            detail.project = Some(project(1));
        }
        execute_command_sync(AppCommand::OpenDeleteProject, &mut state);

        for c in "bunion left".chars() {
            execute_command_sync(AppCommand::AppendInputChar(c), &mut state);
        }
        assert!(execute_command_sync(AppCommand::Submit, &mut state).is_empty());

        execute_command_sync(AppCommand::ClearInput, &mut state);
        for c in "Bunion left".chars() {
            execute_command_sync(AppCommand::AppendInputChar(c), &mut state);
        }
        let jobs = execute_command_sync(AppCommand::Submit, &mut state);
        assert!(matches!(jobs.as_slice(), [Job::DeleteProject { .. }]));
    }

    #[test]
    fn test_analysis_refused_without_images() {
        let mut state = AppState::new();
        execute_command_sync(
            AppCommand::Navigate(Route::Analyze(ProjectId::new(4))),
            &mut state,
        );
        if let Screen::Analyze(analyze) = state.current_screen_mut() {
            analyze.project = Some(project(0));
        }

        let jobs = execute_command_sync(AppCommand::RunAnalysis, &mut state);

        assert!(jobs.is_empty());
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_cancel_create_form_at_root_goes_to_projects() {
        let mut state = AppState::new();
        execute_command_sync(AppCommand::Redirect(Route::ProjectCreate), &mut state);

        let jobs = execute_command_sync(AppCommand::Cancel, &mut state);

        assert!(matches!(state.current_screen(), Screen::Projects(_)));
        assert!(matches!(jobs.as_slice(), [Job::LoadProjects { .. }]));
    }
}
