use super::{project_form, AnalysisStatus, AppState, Dialog, FormMode, LoadingState};
use crate::events::{AppCommand, DataEvent, RequestId};
use crate::routes::Route;
use crate::ui::screens::Screen;
use radiolab_api::{
    endpoints::{ProjectId, ReportId},
    workflows::{DeleteOutcome, WorkflowError},
    ApiError,
};
use std::time::Instant;

/// State transition for data events.
///
/// Returns follow-up commands (reloads, redirects) that the caller executes the same
/// way as user commands.
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) -> Vec<AppCommand> {
    match event {
        DataEvent::ProjectsLoaded { request, projects } => {
            match state.current_screen_mut() {
                Screen::Projects(projects_state) if projects_state.list.request == Some(request) => {
                    projects_state.list.set_items(projects);
                }
                _ => discard(request, "projects"),
            }
            Vec::new()
        }

        DataEvent::ReportsLoaded { request, reports } => {
            match state.current_screen_mut() {
                Screen::Reports(reports_state) if reports_state.list.request == Some(request) => {
                    reports_state.list.set_items(reports);
                }
                _ => discard(request, "reports"),
            }
            Vec::new()
        }

        DataEvent::ProjectLoaded { request, project } => {
            let mut warning = None;
            match state.current_screen_mut() {
                Screen::ProjectDetail(detail) if detail.request == Some(request) => {
                    detail.project = Some(project);
                    detail.loading = LoadingState::Loaded;
                }
                Screen::ProjectForm(form_state) if form_state.request == Some(request) => {
                    form_state.form = project_form(Some(&project));
                    form_state.original = Some(project);
                    form_state.loading = LoadingState::Loaded;
                }
                Screen::Upload(upload) if upload.request == Some(request) => {
                    upload.project = Some(project);
                    upload.loading = LoadingState::Loaded;
                }
                Screen::Analyze(analyze) if analyze.request == Some(request) => {
                    if !project.can_analyze() {
                        warning = Some("Upload radiographs before running an analysis");
                    }
                    analyze.project = Some(project);
                    analyze.loading = LoadingState::Loaded;
                }
                _ => discard(request, "project"),
            }
            if let Some(warning) = warning {
                state.notifications.warning(warning);
            }
            Vec::new()
        }

        DataEvent::ProjectImagesLoaded { request, images } => {
            match state.current_screen_mut() {
                Screen::ProjectDetail(detail) if detail.images.request == Some(request) => {
                    detail.images.set_items(images);
                }
                Screen::Analyze(analyze) if analyze.images.request == Some(request) => {
                    analyze.images.set_items(images);
                }
                _ => discard(request, "images"),
            }
            Vec::new()
        }

        DataEvent::ProjectReportsLoaded { request, reports } => {
            match state.current_screen_mut() {
                Screen::ProjectDetail(detail) if detail.reports.request == Some(request) => {
                    detail.reports.set_items(reports);
                }
                _ => discard(request, "project reports"),
            }
            Vec::new()
        }

        DataEvent::ReportLoaded { request, report } => {
            match state.current_screen_mut() {
                Screen::ReportDetail(detail) if detail.request == Some(request) => {
                    detail.report = Some(report);
                    detail.loading = LoadingState::Loaded;
                }
                _ => discard(request, "report"),
            }
            Vec::new()
        }

        DataEvent::LoadFailed { request, error } => {
            load_failed(state, request, &error);
            Vec::new()
        }

        // Projects
        DataEvent::ProjectCreated { project_id } => {
            state.notifications.success("Project created");
            match state.current_screen_mut() {
                Screen::ProjectForm(form_state) if form_state.mode == FormMode::Create => {
                    form_state.submitting = false;
                    vec![AppCommand::Redirect(Route::ProjectDetail(project_id))]
                }
                _ => Vec::new(),
            }
        }

        DataEvent::ProjectCreateFailed { error } => {
            form_failed(state, &error);
            state
                .notifications
                .error(format!("Could not create project: {error}"));
            Vec::new()
        }

        DataEvent::ProjectUpdated { project_id } => {
            state.notifications.success("Project updated");
            let on_form = matches!(
                state.current_screen(),
                Screen::ProjectForm(form_state) if form_state.mode == FormMode::Edit(project_id)
            );
            if on_form {
                return_to_project(state, project_id)
            } else {
                Vec::new()
            }
        }

        DataEvent::ProjectUpdateFailed { project_id, error } => {
            form_failed(state, &error);
            state
                .notifications
                .error(format!("Could not update project {project_id}: {error}"));
            Vec::new()
        }

        DataEvent::ProjectDeleted {
            project_id,
            already_gone,
        } => {
            if already_gone {
                state.notifications.info("Project was already deleted");
            } else {
                state.notifications.success("Project deleted");
            }
            match state.current_screen_mut() {
                Screen::ProjectDetail(detail) if detail.project_id == project_id => {
                    detail.dialog = None;
                    vec![AppCommand::Redirect(Route::Projects)]
                }
                _ => Vec::new(),
            }
        }

        DataEvent::ProjectDeleteFailed { project_id, error } => {
            if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
                if let Some(dialog) = detail.dialog.as_mut() {
                    dialog.busy = false;
                }
            }
            state
                .notifications
                .error(format!("Could not delete project {project_id}: {error}"));
            Vec::new()
        }

        // Reports
        DataEvent::ReportUpdated { report_id, update } => {
            if let Screen::ReportDetail(detail) = state.current_screen_mut() {
                if detail.report_id == report_id {
                    if let Some(report) = detail.report.as_mut() {
                        if let Some(name) = update.name {
                            report.name = Some(name);
                        }
                        if let Some(notes) = update.notes {
                            report.notes = Some(notes);
                        }
                    }
                    detail.dialog = None;
                }
            }
            state.notifications.success("Report updated");
            Vec::new()
        }

        DataEvent::ReportUpdateFailed { report_id, error } => {
            form_failed(state, &error);
            state
                .notifications
                .error(format!("Could not update report {report_id}: {error}"));
            Vec::new()
        }

        DataEvent::ReportDeleted {
            report_id,
            project_id,
            outcome,
        } => {
            match outcome {
                DeleteOutcome::Deleted { remaining } => {
                    tracing::info!(
                        "Report {} deleted, project {} has {} report(s)",
                        report_id,
                        project_id,
                        remaining
                    );
                    state.notifications.success("Report deleted");
                }
                DeleteOutcome::AlreadyGone => {
                    state.notifications.info("Report was already deleted");
                }
            }
            after_report_removed(state, report_id)
        }

        DataEvent::ReportDeleteFailed { report_id, error } => {
            state
                .notifications
                .error(format!("Could not delete report {report_id}: {error}"));
            if matches!(error, WorkflowError::CounterSync { .. }) {
                // The report itself is gone; only the project's counter is off.
                after_report_removed(state, report_id)
            } else {
                close_dialog(state);
                Vec::new()
            }
        }

        DataEvent::ReportCreated {
            report_id,
            project_id,
        } => {
            state.notifications.success("Report saved");
            match state.current_screen_mut() {
                Screen::Analyze(analyze) if analyze.project_id == project_id => {
                    analyze.dialog = None;
                    vec![AppCommand::Redirect(Route::ReportDetail(report_id))]
                }
                _ => Vec::new(),
            }
        }

        DataEvent::ReportCreateFailed { error } => {
            form_failed(state, &error);
            state
                .notifications
                .error(format!("Could not save report: {error}"));
            Vec::new()
        }

        // Images
        DataEvent::ImageDeleted {
            image_id,
            project_id,
            outcome,
        } => {
            match outcome {
                DeleteOutcome::Deleted { remaining } => {
                    tracing::info!(
                        "Image {} deleted, project {} has {} image(s)",
                        image_id,
                        project_id,
                        remaining
                    );
                    state.notifications.success("Image deleted");
                }
                DeleteOutcome::AlreadyGone => state.notifications.info("Image was already deleted"),
            }
            reload_project_detail(state)
        }

        DataEvent::ImageDeleteFailed { image_id, error } => {
            state
                .notifications
                .error(format!("Could not delete image {image_id}: {error}"));
            if matches!(error, WorkflowError::CounterSync { .. }) {
                reload_project_detail(state)
            } else {
                close_dialog(state);
                Vec::new()
            }
        }

        DataEvent::UploadCompleted {
            project_id,
            uploaded,
        } => {
            state
                .notifications
                .success(format!("Uploaded {uploaded} radiograph(s)"));
            match state.current_screen_mut() {
                Screen::Upload(upload) if upload.project_id == project_id => {
                    upload.uploading = false;
                    upload.selection = Default::default();
                    upload.error = None;
                }
                _ => return Vec::new(),
            }
            return_to_project(state, project_id)
        }

        DataEvent::UploadFailed {
            project_id,
            error,
            failed_files,
        } => {
            if let Screen::Upload(upload) = state.current_screen_mut() {
                if upload.project_id == project_id {
                    upload.uploading = false;
                    upload.error = Some(error.clone());
                    // Stored files drop out of the selection; a retry sends only the rest
                    upload
                        .selection
                        .accepted
                        .retain(|candidate| failed_files.contains(&candidate.file_name));
                }
            }
            state
                .notifications
                .error(format!("Upload failed: {error}"));
            Vec::new()
        }

        // Analysis
        DataEvent::AnalysisCompleted { request, results } => {
            let completed = match state.current_screen_mut() {
                Screen::Analyze(analyze) if analyze.analysis_request == Some(request) => {
                    analyze.analysis = AnalysisStatus::Done(results);
                    true
                }
                _ => {
                    discard(request, "analysis");
                    false
                }
            };
            if completed {
                state.notifications.success("Analysis complete");
            }
            Vec::new()
        }
    }
}

fn discard(request: RequestId, what: &str) {
    tracing::debug!("Discarding {} result for superseded request {}", what, request);
}

fn load_failed(state: &mut AppState, request: RequestId, error: &ApiError) {
    let deadline = state.redirect_deadline();

    let message = match state.current_screen_mut() {
        Screen::Projects(projects_state) if projects_state.list.request == Some(request) => {
            projects_state.list.loading = LoadingState::Error(error.to_string());
            Some(format!("Could not load projects: {error}"))
        }
        Screen::Reports(reports_state) if reports_state.list.request == Some(request) => {
            reports_state.list.loading = LoadingState::Error(error.to_string());
            Some(format!("Could not load reports: {error}"))
        }
        Screen::ProjectDetail(detail) if detail.request == Some(request) => Some(entity_failed(
            &mut detail.loading,
            &mut detail.redirect_at,
            deadline,
            "Project",
            error,
        )),
        Screen::ProjectDetail(detail) if detail.images.request == Some(request) => {
            detail.images.loading = LoadingState::Error(error.to_string());
            Some(format!("Could not load images: {error}"))
        }
        Screen::ProjectDetail(detail) if detail.reports.request == Some(request) => {
            detail.reports.loading = LoadingState::Error(error.to_string());
            Some(format!("Could not load reports: {error}"))
        }
        Screen::ProjectForm(form_state) if form_state.request == Some(request) => {
            Some(entity_failed(
                &mut form_state.loading,
                &mut form_state.redirect_at,
                deadline,
                "Project",
                error,
            ))
        }
        Screen::Upload(upload) if upload.request == Some(request) => Some(entity_failed(
            &mut upload.loading,
            &mut upload.redirect_at,
            deadline,
            "Project",
            error,
        )),
        Screen::Analyze(analyze) if analyze.request == Some(request) => Some(entity_failed(
            &mut analyze.loading,
            &mut analyze.redirect_at,
            deadline,
            "Project",
            error,
        )),
        Screen::Analyze(analyze) if analyze.images.request == Some(request) => {
            analyze.images.loading = LoadingState::Error(error.to_string());
            Some(format!("Could not load images: {error}"))
        }
        Screen::ReportDetail(detail) if detail.request == Some(request) => Some(entity_failed(
            &mut detail.loading,
            &mut detail.redirect_at,
            deadline,
            "Report",
            error,
        )),
        _ => {
            discard(request, "failed");
            None
        }
    };

    if let Some(message) = message {
        state.notifications.error(message);
    }
}

/// A detail page's entity failed to load. A missing entity schedules a redirect to its
/// list page.
fn entity_failed(
    loading: &mut LoadingState,
    redirect_at: &mut Option<Instant>,
    deadline: Instant,
    entity: &str,
    error: &ApiError,
) -> String {
    if error.is_not_found() {
        tracing::warn!("{} not found: {}", entity, error);
        *loading = LoadingState::Error(format!("{entity} not found"));
        *redirect_at = Some(deadline);
        format!("{entity} not found. Returning to the list.")
    } else {
        *loading = LoadingState::Error(error.to_string());
        format!("Could not load {}: {error}", entity.to_lowercase())
    }
}

/// Puts a rejected submission back into the editable form it came from.
fn form_failed(state: &mut AppState, error: &str) {
    let form = match state.current_screen_mut() {
        Screen::ProjectForm(form_state) => {
            form_state.submitting = false;
            Some(&mut form_state.form)
        }
        Screen::ReportDetail(detail) => detail.dialog.as_mut().and_then(|dialog| {
            dialog.busy = false;
            match &mut dialog.dialog {
                Dialog::EditReport { form, .. } => Some(form),
                _ => None,
            }
        }),
        Screen::Analyze(analyze) => analyze.dialog.as_mut().and_then(|dialog| {
            dialog.busy = false;
            match &mut dialog.dialog {
                Dialog::SaveReport { form, .. } => Some(form),
                _ => None,
            }
        }),
        _ => None,
    };
    if let Some(form) = form {
        form.error = Some(error.to_string());
    }
}

fn close_dialog(state: &mut AppState) {
    match state.current_screen_mut() {
        Screen::ProjectDetail(detail) => detail.dialog = None,
        Screen::Reports(reports_state) => reports_state.dialog = None,
        Screen::ReportDetail(detail) => detail.dialog = None,
        Screen::Analyze(analyze) => analyze.dialog = None,
        _ => {}
    }
}

fn after_report_removed(state: &mut AppState, report_id: ReportId) -> Vec<AppCommand> {
    match state.current_screen_mut() {
        Screen::ReportDetail(detail) if detail.report_id == report_id => {
            detail.dialog = None;
            vec![AppCommand::Redirect(Route::Reports)]
        }
        Screen::Reports(reports_state) => {
            reports_state.dialog = None;
            vec![AppCommand::Reload]
        }
        Screen::ProjectDetail(detail) => {
            detail.dialog = None;
            vec![AppCommand::Reload]
        }
        _ => Vec::new(),
    }
}

fn reload_project_detail(state: &mut AppState) -> Vec<AppCommand> {
    match state.current_screen_mut() {
        Screen::ProjectDetail(detail) => {
            detail.dialog = None;
            vec![AppCommand::Reload]
        }
        _ => Vec::new(),
    }
}

/// Leave a sub-page of a project: back to its detail page when that is where the user
/// came from, otherwise replace the sub-page with it.
fn return_to_project(state: &AppState, project_id: ProjectId) -> Vec<AppCommand> {
    let came_from_detail = matches!(
        state.previous_screen(),
        Some(Screen::ProjectDetail(detail)) if detail.project_id == project_id
    );
    if came_from_detail {
        vec![AppCommand::NavigateBack]
    } else {
        vec![AppCommand::Redirect(Route::ProjectDetail(project_id))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        AnalyzeState, DialogState, ProjectDetailState, ProjectFormState, ProjectsState,
        ReportDetailState, ReportsState, UploadState,
    };
    use crate::uploads::{Selection, UploadCandidate};
    use radiolab_api::endpoints::{projects::Project, reports::Report, AngleMeasurement};
    use std::path::PathBuf;

    fn project(id: u64, image_count: u32) -> Project {
        Project {
            id: ProjectId::new(id),
            name: format!("Project {id}"),
            patient_id: format!("PAC-{id}"),
            description: None,
            date: "15/04/2025".to_string(),
            image_count,
            report_count: 2,
        }
    }

    fn report(id: u64) -> Report {
        Report {
            id: ReportId::new(id),
            project_id: ProjectId::new(1),
            project_name: "Project 1".to_string(),
            patient_id: "PAC-1".to_string(),
            name: None,
            date: "15/04/2025".to_string(),
            image_count: 1,
            angles: vec![AngleMeasurement::new("Hallux Valgus angle", "23°")],
            notes: None,
        }
    }

    fn projects_state(request: RequestId) -> AppState {
        let mut state = AppState::new();
        let mut projects = ProjectsState::new(&state.settings);
        projects.list.request = Some(request);
        projects.list.loading = LoadingState::started();
        state.navigate_to(Screen::Projects(projects));
        state
    }

    fn detail_state(project_id: u64, request: RequestId) -> AppState {
        let mut state = AppState::new();
        let mut detail = ProjectDetailState::new(ProjectId::new(project_id));
        detail.request = Some(request);
        detail.loading = LoadingState::started();
        state.navigate_to(Screen::ProjectDetail(Box::new(detail)));
        state
    }

    // ========================================================================
    // Latest-wins loads
    // ========================================================================

    #[test]
    fn test_projects_loaded_for_current_request() {
        let request = RequestId::new(3);
        let mut state = projects_state(request);

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::ProjectsLoaded {
                request,
                projects: vec![project(1, 0), project(2, 1)],
            },
        );

        assert!(follow_ups.is_empty());
        let Screen::Projects(projects_state) = state.current_screen() else {
            panic!("expected projects screen");
        };
        assert_eq!(projects_state.list.items.len(), 2);
        assert_eq!(projects_state.list.loading, LoadingState::Loaded);
    }

    #[test]
    fn test_stale_projects_result_is_discarded() {
        let mut state = projects_state(RequestId::new(5));

        reduce_data_event(
            &mut state,
            DataEvent::ProjectsLoaded {
                request: RequestId::new(4),
                projects: vec![project(1, 0)],
            },
        );

        let Screen::Projects(projects_state) = state.current_screen() else {
            panic!("expected projects screen");
        };
        assert!(projects_state.list.items.is_empty());
        assert!(projects_state.list.loading.is_loading());
    }

    #[test]
    fn test_result_for_departed_screen_is_dropped() {
        let mut state = AppState::new();

        reduce_data_event(
            &mut state,
            DataEvent::ReportsLoaded {
                request: RequestId::new(1),
                reports: vec![report(1)],
            },
        );

        assert!(matches!(state.current_screen(), Screen::Home(_)));
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_list_failure_sets_error_and_notifies() {
        let request = RequestId::new(2);
        let mut state = projects_state(request);

        reduce_data_event(
            &mut state,
            DataEvent::LoadFailed {
                request,
                error: ApiError::transport("connection refused"),
            },
        );

        let Screen::Projects(projects_state) = state.current_screen() else {
            panic!("expected projects screen");
        };
        assert!(matches!(projects_state.list.loading, LoadingState::Error(_)));
        assert_eq!(state.notifications.len(), 1);
    }

    // ========================================================================
    // Detail pages
    // ========================================================================

    #[test]
    fn test_missing_project_schedules_redirect() {
        let request = RequestId::new(1);
        let mut state = detail_state(999, request);

        reduce_data_event(
            &mut state,
            DataEvent::LoadFailed {
                request,
                error: ApiError::from_status(404, r#"{"detail":"Project not found"}"#),
            },
        );

        let Screen::ProjectDetail(detail) = state.current_screen() else {
            panic!("expected project detail");
        };
        assert!(detail.is_missing());
        assert_eq!(
            detail.loading,
            LoadingState::Error("Project not found".to_string())
        );
    }

    #[test]
    fn test_server_error_does_not_redirect() {
        let request = RequestId::new(1);
        let mut state = detail_state(3, request);

        reduce_data_event(
            &mut state,
            DataEvent::LoadFailed {
                request,
                error: ApiError::from_status(500, "boom"),
            },
        );

        let Screen::ProjectDetail(detail) = state.current_screen() else {
            panic!("expected project detail");
        };
        assert!(!detail.is_missing());
    }

    #[test]
    fn test_tab_results_fill_their_own_tab() {
        let mut state = detail_state(1, RequestId::new(1));
        if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
            detail.reports.request = Some(RequestId::new(2));
        }

        reduce_data_event(
            &mut state,
            DataEvent::ProjectReportsLoaded {
                request: RequestId::new(2),
                reports: vec![report(1), report(2)],
            },
        );

        let Screen::ProjectDetail(detail) = state.current_screen() else {
            panic!("expected project detail");
        };
        assert_eq!(detail.reports.items.len(), 2);
        assert!(detail.images.items.is_empty());
        assert!(detail.loading.is_loading());
    }

    #[test]
    fn test_report_deleted_on_project_detail_reloads() {
        let mut state = detail_state(1, RequestId::new(1));
        if let Screen::ProjectDetail(detail) = state.current_screen_mut() {
            detail.dialog = Some(DialogState::new(Dialog::DeleteReport {
                report_id: ReportId::new(7),
                project_id: ProjectId::new(1),
                name: "Report #7".to_string(),
            }));
        }

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::ReportDeleted {
                report_id: ReportId::new(7),
                project_id: ProjectId::new(1),
                outcome: DeleteOutcome::Deleted { remaining: 1 },
            },
        );

        assert_eq!(follow_ups, vec![AppCommand::Reload]);
        let Screen::ProjectDetail(detail) = state.current_screen() else {
            panic!("expected project detail");
        };
        assert!(detail.dialog.is_none());
    }

    #[test]
    fn test_report_deleted_from_its_detail_redirects_to_list() {
        let mut state = AppState::new();
        state.navigate_to(Screen::ReportDetail(Box::new(ReportDetailState::new(
            ReportId::new(4),
        ))));

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::ReportDeleted {
                report_id: ReportId::new(4),
                project_id: ProjectId::new(1),
                outcome: DeleteOutcome::AlreadyGone,
            },
        );

        assert_eq!(follow_ups, vec![AppCommand::Redirect(Route::Reports)]);
    }

    #[test]
    fn test_counter_failure_still_reloads_list() {
        let mut state = AppState::new();
        let reports_state = ReportsState::new(&state.settings);
        state.navigate_to(Screen::Reports(reports_state));

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::ReportDeleteFailed {
                report_id: ReportId::new(4),
                error: WorkflowError::CounterSync {
                    project_id: ProjectId::new(1),
                    counter: radiolab_api::workflows::Counter::Reports,
                    source: ApiError::from_status(500, "down"),
                },
            },
        );

        assert_eq!(follow_ups, vec![AppCommand::Reload]);
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn test_report_update_applies_in_place() {
        let mut state = AppState::new();
        let mut detail = ReportDetailState::new(ReportId::new(1));
        detail.report = Some(report(1));
        state.navigate_to(Screen::ReportDetail(Box::new(detail)));

        reduce_data_event(
            &mut state,
            DataEvent::ReportUpdated {
                report_id: ReportId::new(1),
                update: radiolab_api::endpoints::reports::ReportUpdate {
                    name: Some("Follow-up".to_string()),
                    notes: Some("stable".to_string()),
                },
            },
        );

        let Screen::ReportDetail(detail) = state.current_screen() else {
            panic!("expected report detail");
        };
        let report = detail.report.as_ref().unwrap();
        assert_eq!(report.display_name(), "Follow-up");
        assert_eq!(report.notes_or_empty(), "stable");
    }

    // ========================================================================
    // Forms and workflows
    // ========================================================================

    #[test]
    fn test_project_created_redirects_to_detail() {
        let mut state = AppState::new();
        state.navigate_to(Screen::ProjectForm(Box::new(ProjectFormState::create())));

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::ProjectCreated {
                project_id: ProjectId::new(12),
            },
        );

        assert_eq!(
            follow_ups,
            vec![AppCommand::Redirect(Route::ProjectDetail(ProjectId::new(12)))]
        );
    }

    #[test]
    fn test_project_create_failure_stays_on_form() {
        let mut state = AppState::new();
        let mut form_state = ProjectFormState::create();
        form_state.submitting = true;
        state.navigate_to(Screen::ProjectForm(Box::new(form_state)));

        reduce_data_event(
            &mut state,
            DataEvent::ProjectCreateFailed {
                error: "request failed (422): name".to_string(),
            },
        );

        let Screen::ProjectForm(form_state) = state.current_screen() else {
            panic!("expected project form");
        };
        assert!(!form_state.submitting);
        assert!(form_state.form.error.is_some());
    }

    #[test]
    fn test_project_update_returns_to_detail() {
        let mut state = detail_state(5, RequestId::new(1));
        state.navigate_to(Screen::ProjectForm(Box::new(ProjectFormState::edit(
            ProjectId::new(5),
            RequestId::new(2),
        ))));

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::ProjectUpdated {
                project_id: ProjectId::new(5),
            },
        );

        assert_eq!(follow_ups, vec![AppCommand::NavigateBack]);
    }

    #[test]
    fn test_partial_upload_keeps_failed_files_selected() {
        let mut state = AppState::new();
        let mut upload = UploadState::new(ProjectId::new(1));
        upload.uploading = true;
        upload.selection = Selection {
            accepted: ["a.png", "b.png"]
                .iter()
                .map(|name| UploadCandidate {
                    path: PathBuf::from(name),
                    file_name: name.to_string(),
                    content_type: "image/png",
                    size: 1,
                })
                .collect(),
            rejected: Vec::new(),
        };
        state.navigate_to(Screen::Upload(Box::new(upload)));

        let follow_ups = reduce_data_event(
            &mut state,
            DataEvent::UploadFailed {
                project_id: ProjectId::new(1),
                error: "1 of 2 uploads failed".to_string(),
                failed_files: vec!["b.png".to_string()],
            },
        );

        assert!(follow_ups.is_empty());
        let Screen::Upload(upload) = state.current_screen() else {
            panic!("expected upload screen");
        };
        assert!(!upload.uploading);
        assert_eq!(upload.selection.accepted.len(), 1);
        assert_eq!(upload.selection.accepted[0].file_name, "b.png");
    }

    #[test]
    fn test_stale_analysis_is_ignored() {
        let mut state = AppState::new();
        let mut analyze = AnalyzeState::new(ProjectId::new(1));
        analyze.analysis_request = Some(RequestId::new(9));
        state.navigate_to(Screen::Analyze(Box::new(analyze)));

        reduce_data_event(
            &mut state,
            DataEvent::AnalysisCompleted {
                request: RequestId::new(8),
                results: vec![Vec::new()],
            },
        );

        let Screen::Analyze(analyze) = state.current_screen() else {
            panic!("expected analyze screen");
        };
        assert_eq!(analyze.analysis, AnalysisStatus::Idle);
    }

    #[test]
    fn test_analyze_warns_when_project_has_no_images() {
        let mut state = AppState::new();
        let mut analyze = AnalyzeState::new(ProjectId::new(1));
        analyze.request = Some(RequestId::new(1));
        state.navigate_to(Screen::Analyze(Box::new(analyze)));

        reduce_data_event(
            &mut state,
            DataEvent::ProjectLoaded {
                request: RequestId::new(1),
                project: project(1, 0),
            },
        );

        let Screen::Analyze(analyze) = state.current_screen() else {
            panic!("expected analyze screen");
        };
        assert!(!analyze.can_analyze());
        assert_eq!(state.notifications.len(), 1);
    }
}
