use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::state::{FormMode, LoadingState, ProjectFormState};
use crate::ui::{
    components::{chrome, empty_state, form},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &ProjectFormState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = match state.mode {
        FormMode::Create => "New project".to_string(),
        FormMode::Edit(project_id) => format!("Edit project #{project_id}"),
    };
    chrome::render_screen_title(f, title_area, &title, &state.loading);

    match (&state.mode, &state.loading) {
        (FormMode::Edit(_), LoadingState::Error(error)) => {
            let hint = if state.redirect_at.is_some() {
                "Returning to the project list..."
            } else {
                "Press r to retry or Esc to go back"
            };
            empty_state::render_empty_state(f, content_area, "Project", error, Some(hint));
        }
        (FormMode::Edit(_), LoadingState::Loading(_)) => {
            empty_state::render_loading_state(f, content_area, "Project", "Loading project...");
        }
        _ => render_form(f, content_area, state),
    }

    let help = if state.submitting {
        "Saving..."
    } else {
        "Tab: next field | Shift+Tab: previous | Ctrl+L: clear field | Enter: save | Esc: cancel"
    };
    chrome::render_help_bar(f, help_area, help);
}

fn render_form(f: &mut Frame, area: Rect, state: &ProjectFormState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Project details ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(form::form_height(&state.form)),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    form::render_form(f, chunks[0], &state.form, !state.submitting);

    let note = Paragraph::new("Fields marked * are required. New projects are dated today.")
        .style(theme::muted_style());
    f.render_widget(note, chunks[1]);
}
