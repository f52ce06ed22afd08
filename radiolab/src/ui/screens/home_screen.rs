use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::state::{HomeEntry, HomeState, LoadingState};
use crate::ui::{
    components::chrome,
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &HomeState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    chrome::render_screen_title(
        f,
        title_area,
        "RadioLab · Radiograph analysis",
        &LoadingState::NotStarted,
    );

    let rows: Vec<Row> = HomeEntry::ALL
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.title()).style(theme::title_style()),
                Cell::from(entry.description()),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(Block::default().borders(Borders::ALL).title(" Start "))
        .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, content_area, &mut state.table_state.borrow_mut());

    chrome::render_help_bar(
        f,
        help_area,
        "j/k: select | Enter: open | gp: projects | gr: reports | ?: help | q: quit",
    );
}
