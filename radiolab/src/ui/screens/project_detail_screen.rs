use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::state::{DetailTab, LoadingState, ProjectDetailState, TabState};
use crate::ui::{
    components::{chrome, empty_state},
    layouts, theme, utils,
};
use radiolab_api::endpoints::{images::Image, projects::Project, reports::Report};

const SUMMARY_HEIGHT: u16 = 6;

pub fn render(f: &mut Frame, state: &ProjectDetailState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = match &state.project {
        Some(project) => format!("Project · {}", project.name),
        None => format!("Project #{}", state.project_id),
    };
    chrome::render_screen_title(f, title_area, &title, &state.loading);

    match (&state.project, &state.loading) {
        (Some(project), _) => render_project(f, content_area, state, project),
        (None, LoadingState::Error(error)) => {
            let hint = if state.redirect_at.is_some() {
                "Returning to the project list..."
            } else {
                "Press r to retry"
            };
            empty_state::render_empty_state(f, content_area, "Project", error, Some(hint));
        }
        (None, _) => {
            empty_state::render_loading_state(f, content_area, "Project", "Loading project...")
        }
    }

    chrome::render_help_bar(f, help_area, help_text(state));
}

fn help_text(state: &ProjectDetailState) -> &'static str {
    match &state.project {
        None => "r: reload | h: back | ?: help",
        Some(project) if project.can_analyze() => {
            "Tab: switch | e: edit | u: upload | a: analyze | d: delete selected | D: delete project | ?: help"
        }
        Some(_) => {
            "Tab: switch | e: edit | u: upload | d: delete selected | D: delete project | ?: help"
        }
    }
}

fn render_project(f: &mut Frame, area: Rect, state: &ProjectDetailState, project: &Project) {
    let (summary_area, tabs_area) = layouts::summary_and_content(area, SUMMARY_HEIGHT);

    render_summary(f, summary_area, project);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(tabs_area);

    let selected = match state.tab {
        DetailTab::Images => 0,
        DetailTab::Reports => 1,
    };
    let tabs = Tabs::new(vec![
        format!("Radiographs ({})", project.image_count),
        format!("Reports ({})", project.report_count),
    ])
    .select(selected)
    .style(theme::help_text_style())
    .highlight_style(theme::title_style().add_modifier(Modifier::UNDERLINED));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        DetailTab::Images => render_images(f, chunks[1], &state.images),
        DetailTab::Reports => render_reports(f, chunks[1], &state.reports),
    }
}

fn render_summary(f: &mut Frame, area: Rect, project: &Project) {
    let label = |text: &'static str| Span::styled(format!("{text:<12}"), theme::header_style());

    let analyze_hint = if project.can_analyze() {
        Span::styled("ready for analysis (a)", Style::default().fg(theme::COLOR_POSITIVE))
    } else {
        Span::styled("upload radiographs to analyze (u)", theme::muted_style())
    };

    let lines = vec![
        Line::from(vec![label("Patient ID"), Span::raw(project.patient_id.clone())]),
        Line::from(vec![label("Date"), Span::raw(utils::fmt_date(&project.date))]),
        Line::from(vec![
            label("Description"),
            Span::raw(project.description_or_default().to_string()),
        ]),
        Line::from(vec![label("Analysis"), analyze_hint]),
    ];

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(summary, area);
}

/// Draws the loading, error or empty message for a tab. False when the tab has rows.
fn tab_placeholder<T>(
    f: &mut Frame,
    area: Rect,
    tab: &TabState<T>,
    title: &str,
    empty: &str,
) -> bool {
    match &tab.loading {
        LoadingState::Error(error) => {
            empty_state::render_error_state(f, area, title, error);
            true
        }
        LoadingState::Loading(_) | LoadingState::NotStarted if tab.items.is_empty() => {
            empty_state::render_loading_state(f, area, title, "Loading...");
            true
        }
        _ if tab.items.is_empty() => {
            empty_state::render_empty_state(f, area, title, empty, None);
            true
        }
        _ => false,
    }
}

fn render_images(f: &mut Frame, area: Rect, images: &TabState<Image>) {
    let empty = "No radiographs uploaded yet (u to upload)";
    if tab_placeholder(f, area, images, "Radiographs", empty) {
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from(Text::from("Size").right_aligned()),
        Cell::from("Uploaded"),
    ])
    .style(theme::header_style())
    .underlined();

    let rows: Vec<Row> = images
        .items
        .iter()
        .map(|image| {
            Row::new(vec![
                Cell::from(image.name.clone()),
                Cell::from(image.content_type.clone()),
                Cell::from(Text::from(utils::fmt_size(image.size)).right_aligned()),
                Cell::from(utils::fmt_date(&image.uploaded_at)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(16),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Radiographs "))
    .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut images.table_state.borrow_mut());
}

fn render_reports(f: &mut Frame, area: Rect, reports: &TabState<Report>) {
    if tab_placeholder(f, area, reports, "Reports", "No reports saved for this project") {
        return;
    }

    let header = Row::new(vec![
        Cell::from("Report"),
        Cell::from("Date"),
        Cell::from("Measurements"),
    ])
    .style(theme::header_style())
    .underlined();

    let rows: Vec<Row> = reports
        .items
        .iter()
        .map(|report| {
            let angles = report
                .angles
                .iter()
                .map(|angle| angle.value.as_str())
                .collect::<Vec<_>>()
                .join(" / ");
            Row::new(vec![
                Cell::from(report.display_name()),
                Cell::from(utils::fmt_date(&report.date)),
                Cell::from(angles).style(theme::help_text_style()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(17),
            Constraint::Min(16),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Reports (Enter to open) "))
    .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut reports.table_state.borrow_mut());
}
