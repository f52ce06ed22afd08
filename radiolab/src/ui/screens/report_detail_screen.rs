use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::state::{LoadingState, ReportDetailState};
use crate::ui::{
    components::{chrome, empty_state},
    layouts, theme, utils,
};
use radiolab_api::endpoints::reports::Report;

pub fn render(f: &mut Frame, state: &ReportDetailState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = match &state.report {
        Some(report) => format!("Report · {}", report.display_name()),
        None => format!("Report #{}", state.report_id),
    };
    chrome::render_screen_title(f, title_area, &title, &state.loading);

    match (&state.report, &state.loading) {
        (Some(report), _) => render_report(f, content_area, report),
        (None, LoadingState::Error(error)) => {
            let hint = if state.redirect_at.is_some() {
                "Returning to the report list..."
            } else {
                "Press r to retry"
            };
            empty_state::render_empty_state(f, content_area, "Report", error, Some(hint));
        }
        (None, _) => {
            empty_state::render_loading_state(f, content_area, "Report", "Loading report...")
        }
    }

    chrome::render_help_bar(
        f,
        help_area,
        "e: edit | d: delete | o: open project | p: PDF | h: back | ?: help",
    );
}

fn render_report(f: &mut Frame, area: Rect, report: &Report) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .split(area);

    let label = |text: &'static str| Span::styled(format!("{text:<10}"), theme::header_style());
    let summary = Paragraph::new(vec![
        Line::from(vec![label("Project"), Span::raw(report.project_name.clone())]),
        Line::from(vec![label("Patient"), Span::raw(report.patient_id.clone())]),
        Line::from(vec![label("Date"), Span::raw(utils::fmt_date(&report.date))]),
        Line::from(vec![
            label("Images"),
            Span::raw(report.image_count.to_string()),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(summary, chunks[0]);

    if report.angles.is_empty() {
        empty_state::render_empty_state(f, chunks[1], "Measurements", "No measurements", None);
    } else {
        let rows: Vec<Row> = report
            .angles
            .iter()
            .map(|angle| {
                Row::new(vec![
                    Cell::from(angle.label.clone()),
                    Cell::from(Text::from(angle.value.clone()).right_aligned())
                        .style(theme::title_style()),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(10)])
            .header(
                Row::new(vec!["Angle", "Value"])
                    .style(theme::header_style())
                    .underlined(),
            )
            .block(Block::default().borders(Borders::ALL).title(" Measurements "));
        f.render_widget(table, chunks[1]);
    }

    let notes = match report.notes_or_empty() {
        "" => Paragraph::new("No notes").style(theme::muted_style()),
        notes => Paragraph::new(notes.to_string()),
    };
    f.render_widget(
        notes
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Notes ")),
        chunks[2],
    );
}
