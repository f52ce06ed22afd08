use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::state::{LoadingState, ProjectsState};
use crate::ui::{
    components::{chrome, empty_state, pagination_bar, search_input},
    layouts, theme, utils,
};

pub fn render(f: &mut Frame, state: &ProjectsState) {
    let (title_area, search_area, table_area, pagination_area, help_area) =
        layouts::list_layout(f.area());
    let list = &state.list;

    chrome::render_screen_title(f, title_area, "Projects", &list.loading);
    search_input::render_search_input(
        f,
        search_area,
        &list.search,
        list.input_mode,
        "Search by name or patient ID",
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
        "j/k: select | Enter: open | n: new | /: search | [/]: page | r: reload | ?: help",
    );
}

fn render_table(f: &mut Frame, area: Rect, state: &ProjectsState) {
    let list = &state.list;

    if let LoadingState::Error(error) = &list.loading {
        empty_state::render_error_state(f, area, "Projects", error);
        return;
    }
    if list.loading.is_loading() && list.items.is_empty() {
        empty_state::render_loading_state(f, area, "Projects", "Loading projects...");
        return;
    }

    let page = list.current_page();
    if page.items.is_empty() {
        if list.search.committed().is_empty() {
            empty_state::render_empty_state(
                f,
                area,
                "Projects",
                "No projects yet",
                Some("Press n to create the first project"),
            );
        } else {
            empty_state::render_empty_state(
                f,
                area,
                "Projects",
                &format!("No projects match \"{}\"", list.search.committed()),
                Some("Esc clears the search"),
            );
        }
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Patient ID"),
        Cell::from("Date"),
        Cell::from(Text::from("Images").right_aligned()),
        Cell::from(Text::from("Reports").right_aligned()),
        Cell::from("Description"),
    ])
    .style(theme::header_style())
    .underlined();

    let rows: Vec<Row> = page
        .items
        .iter()
        .map(|project| {
            Row::new(vec![
                Cell::from(project.name.clone()),
                Cell::from(project.patient_id.clone()),
                Cell::from(utils::fmt_date(&project.date)),
                Cell::from(Text::from(project.image_count.to_string()).right_aligned()),
                Cell::from(Text::from(project.report_count.to_string()).right_aligned()),
                Cell::from(project.description_or_default().to_string())
                    .style(theme::help_text_style()),
            ])
        })
        .collect();

    let title = if list.search.committed().is_empty() {
        format!("Projects ({})", list.items.len())
    } else {
        format!("Projects ({} of {})", list.filtered().len(), list.items.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(14),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut list.table_state.borrow_mut());
}
