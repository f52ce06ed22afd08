pub mod components;
pub mod layouts;
pub mod screens;
pub mod theme;
pub mod utils;

use crate::log_buffer::LogBuffer;
use crate::state::AppState;
use ratatui::Frame;
use screens::*;

/// Pure render dispatcher - routes to appropriate screen renderer
/// This function is read-only and never mutates state
pub fn render_app(f: &mut Frame, state: &AppState, log_buffer: &LogBuffer) {
    match state.current_screen() {
        Screen::Home(home_state) => home_screen::render(f, home_state),
        Screen::Projects(projects_state) => projects_screen::render(f, projects_state),
        Screen::ProjectForm(form_state) => project_form_screen::render(f, form_state),
        Screen::ProjectDetail(detail_state) => project_detail_screen::render(f, detail_state),
        Screen::Upload(upload_state) => upload_screen::render(f, upload_state),
        Screen::Analyze(analyze_state) => analyze_screen::render(f, analyze_state),
        Screen::Reports(reports_state) => reports_screen::render(f, reports_state),
        Screen::ReportDetail(detail_state) => report_detail_screen::render(f, detail_state),
        Screen::Logs(logs_state) => logs_screen::render(f, logs_state, log_buffer),
    }

    // Dialogs sit above the screen, help above everything but toasts
    if let Some(dialog) = state.active_dialog() {
        components::dialogs::render_dialog(f, dialog);
    }

    if state.help_visible {
        components::help_popup::render_help_popup(f, state.current_screen());
    }

    components::notifications::render_notifications(f, &state.notifications);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::executor::execute_command_sync;
    use crate::events::{AppCommand, DataEvent};
    use crate::routes::Route;
    use crate::state::reducer::reduce_data_event;
    use radiolab_api::endpoints::{projects::Project, ProjectId};
    use ratatui::{backend::TestBackend, Terminal};

    fn project(id: u64, name: &str) -> Project {
        Project {
            id: ProjectId::new(id),
            name: name.to_string(),
            patient_id: format!("P-{id}"),
            description: None,
            date: "2024-03-09".to_string(),
            image_count: 2,
            report_count: 0,
        }
    }

    fn draw(state: &AppState) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let log_buffer = LogBuffer::new(10);
        terminal
            .draw(|f| render_app(f, state, &log_buffer))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_every_screen_renders() {
        let routes = [
            Route::Home,
            Route::Projects,
            Route::ProjectCreate,
            Route::ProjectDetail(ProjectId::new(1)),
            Route::ProjectEdit(ProjectId::new(1)),
            Route::Upload(ProjectId::new(1)),
            Route::Analyze(ProjectId::new(1)),
            Route::Reports,
        ];

        for route in routes {
            let mut state = AppState::new();
            execute_command_sync(AppCommand::Navigate(route), &mut state);
            draw(&state);
        }

        let mut state = AppState::new();
        execute_command_sync(AppCommand::NavigateToLogs, &mut state);
        assert!(draw(&state).contains("Logs"));
    }

    #[test]
    fn test_projects_table_shows_loaded_rows() {
        let mut state = AppState::new();
        let jobs = execute_command_sync(AppCommand::Navigate(Route::Projects), &mut state);
        let request = match &jobs[0] {
            crate::events::Job::LoadProjects { request } => *request,
            other => panic!("unexpected job {other:?}"),
        };
        reduce_data_event(
            &mut state,
            DataEvent::ProjectsLoaded {
                request,
                projects: vec![project(1, "Left foot"), project(2, "Right foot")],
            },
        );

        let screen = draw(&state);
        assert!(screen.contains("Left foot"));
        assert!(screen.contains("Right foot"));
        assert!(screen.contains("P-2"));
    }
}
