use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::state::{LoadingState, ReportsState};
use crate::ui::{
    components::{chrome, empty_state, pagination_bar, search_input},
    layouts, theme, utils,
};

pub fn render(f: &mut Frame, state: &ReportsState) {
    let (title_area, search_area, table_area, pagination_area, help_area) =
        layouts::list_layout(f.area());
    let list = &state.list;

    chrome::render_screen_title(f, title_area, "Reports", &list.loading);
    search_input::render_search_input(
        f,
        search_area,
        &list.search,
        list.input_mode,
        "Search by report, project or patient ID",
    );
    render_table(f, table_area, state);

    let page = list.current_page();
    if !page.items.is_empty() {
        pagination_bar::render_pagination_bar(
            f,
            pagination_area,
            page.effective_page,
            page.total_pages,
            list.filtered().len(),
        );
    }

    chrome::render_help_bar(
        f,
        help_area,
        "j/k: select | Enter: open | d: delete | p: PDF | /: search | [/]: page | ?: help",
    );
}

fn render_table(f: &mut Frame, area: Rect, state: &ReportsState) {
    let list = &state.list;

    if let LoadingState::Error(error) = &list.loading {
        empty_state::render_error_state(f, area, "Reports", error);
        return;
    }
    if list.loading.is_loading() && list.items.is_empty() {
        empty_state::render_loading_state(f, area, "Reports", "Loading reports...");
        return;
    }

    let page = list.current_page();
    if page.items.is_empty() {
        let message = if list.search.committed().is_empty() {
            "No reports yet".to_string()
        } else {
            format!("No reports match \"{}\"", list.search.committed())
        };
        empty_state::render_empty_state(
            f,
            area,
            "Reports",
            &message,
            Some("Reports are saved from a project's analysis screen"),
        );
        return;
    }

    let header = Row::new(vec![
        Cell::from("Report"),
        Cell::from("Project"),
        Cell::from("Patient ID"),
        Cell::from("Date"),
        Cell::from(Text::from("Images").right_aligned()),
    ])
    .style(theme::header_style())
    .underlined();

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|report| {
            Row::new(vec![
                Cell::from(report.display_name()),
                Cell::from(report.project_name.clone()),
                Cell::from(report.patient_id.clone()),
                Cell::from(utils::fmt_date(&report.date)),
                Cell::from(Text::from(report.image_count.to_string()).right_aligned()),
            ])
        })
        .collect();

    let title = if list.search.committed().is_empty() {
        format!("Reports ({})", list.items.len())
    } else {
        format!("Reports ({} of {})", list.filtered().len(), list.items.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(26),
            Constraint::Percentage(16),
            Constraint::Length(17),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut list.table_state.borrow_mut());
}
