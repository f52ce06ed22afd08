use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
};

use crate::state::{AnalysisStatus, AnalyzeState, LoadingState};
use crate::ui::{
    components::{chrome, empty_state},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &AnalyzeState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = match &state.project {
        Some(project) => format!("Analyze · {} ({})", project.name, project.patient_id),
        None => "Analyze".to_string(),
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
        (Some(_), _) if !state.can_analyze() => empty_state::render_empty_state(
            f,
            content_area,
            "Analysis",
            "This project has no radiographs yet",
            Some("Press u to upload radiographs first"),
        ),
        (Some(_), _) => {
            let (targets_area, results_area) = layouts::split_horizontal(content_area, 40);
            render_targets(f, targets_area, state);
            render_results(f, results_area, state);
        }
    }

    let help = match state.analysis {
        AnalysisStatus::Running(_) => "Analyzing...",
        AnalysisStatus::Done(_) => {
            "j/k: radiograph | s: save report | p: PDF | a: run again | u: upload | ?: help"
        }
        AnalysisStatus::Idle => "j/k: radiograph | Enter/a: run analysis | u: upload | ?: help",
    };
    chrome::render_help_bar(f, help_area, help);
}

fn render_targets(f: &mut Frame, area: Rect, state: &AnalyzeState) {
    let selected = state.selected_index();
    let items: Vec<ListItem> = state
        .targets()
        .into_iter()
        .map(|target| {
            let item = ListItem::new(format!("{:>2}. {}", target.index + 1, target.name));
            if target.index == selected {
                item.style(theme::selection_style())
            } else {
                item
            }
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Radiographs "));
    f.render_widget(list, area);
}

fn render_results(f: &mut Frame, area: Rect, state: &AnalyzeState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Measurements · image {} ", state.selected_index() + 1));

    match &state.analysis {
        AnalysisStatus::Idle => {
            let text = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Press Enter to detect angles on every radiograph",
                    theme::help_text_style(),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(text, area);
        }
        AnalysisStatus::Running(throbber_state) => {
            let inner = block.inner(area);
            f.render_widget(block, area);
            let throbber = throbber_widgets_tui::Throbber::default()
                .label("Detecting angles...")
                .style(theme::loading_style())
                .throbber_set(throbber_widgets_tui::BRAILLE_EIGHT);
            f.render_stateful_widget(throbber, inner, &mut throbber_state.clone());
        }
        AnalysisStatus::Done(_) => {
            let Some(measurements) = state.selected_results() else {
                let text = Paragraph::new("No measurements for this radiograph")
                    .style(theme::muted_style())
                    .block(block);
                f.render_widget(text, area);
                return;
            };

            let header = Row::new(vec![
                Cell::from("Angle"),
                Cell::from(Text::from("Value").right_aligned()),
            ])
            .style(theme::header_style())
            .underlined();

            let rows: Vec<Row> = measurements
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
                .header(header)
                .block(block);
            f.render_widget(table, area);
        }
    }
}
