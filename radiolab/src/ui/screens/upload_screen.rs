use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::state::{LoadingState, UploadState};
use crate::ui::{
    components::{chrome, empty_state},
    layouts, theme, utils,
};

pub fn render(f: &mut Frame, state: &UploadState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = match &state.project {
        Some(project) => format!("Upload radiographs · {}", project.name),
        None => "Upload radiographs".to_string(),
    };
    chrome::render_screen_title(f, title_area, &title, &state.loading);

    match (&state.project, &state.loading) {
        (None, LoadingState::Error(error)) => {
            let hint = state
                .redirect_at
                .map(|_| "Returning to the project list...");
            empty_state::render_empty_state(f, content_area, "Project", error, hint);
        }
        (None, _) => {
            empty_state::render_loading_state(f, content_area, "Project", "Loading project...")
        }
        (Some(_), _) => render_form(f, content_area, state),
    }

    let help = if state.uploading {
        "Uploading..."
    } else {
        "Enter: add path | Ctrl+D: remove last | Ctrl+L: clear path | Ctrl+U: upload | Esc: back"
    };
    chrome::render_help_bar(f, help_area, help);
}

fn render_form(f: &mut Frame, area: Rect, state: &UploadState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let mut spans = vec![Span::raw(state.path_input.as_str())];
    if !state.uploading {
        spans.push(Span::styled("█", theme::loading_style()));
    }
    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::accent_border_style())
            .title(" File or folder (PNG, JPEG, DICOM) "),
    );
    f.render_widget(input, chunks[0]);

    render_selection(f, chunks[1], state);

    let selection = &state.selection;
    let summary = format!(
        "{} file(s) selected, {} total",
        selection.accepted.len(),
        utils::fmt_size(selection.total_size())
    );
    f.render_widget(
        Paragraph::new(summary).style(theme::help_text_style()),
        chunks[2],
    );

    if let Some(error) = &state.error {
        f.render_widget(
            Paragraph::new(format!("Upload failed: {error}")).style(theme::error_style()),
            chunks[3],
        );
    }
}

fn render_selection(f: &mut Frame, area: Rect, state: &UploadState) {
    if state.selection.accepted.is_empty() {
        empty_state::render_empty_state(
            f,
            area,
            "Selected files",
            "No files selected",
            Some("Type a path and press Enter; folders add every supported file inside"),
        );
        return;
    }

    let header = Row::new(vec![
        Cell::from("File"),
        Cell::from("Type"),
        Cell::from(Text::from("Size").right_aligned()),
    ])
    .style(theme::header_style())
    .underlined();

    let rows: Vec<Row> = state
        .selection
        .accepted
        .iter()
        .map(|file| {
            Row::new(vec![
                Cell::from(file.file_name.clone()),
                Cell::from(file.content_type),
                Cell::from(Text::from(utils::fmt_size(file.size)).right_aligned()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Length(20),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Selected files "));

    f.render_widget(table, area);
}
