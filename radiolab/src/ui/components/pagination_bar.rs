use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::pagination::{page_labels, PageLabel};
use crate::ui::theme;

/// `‹ 1 … 4 [5] 6 … 12 ›  (57 results)`, centered under the table
pub fn render_pagination_bar(f: &mut Frame, area: Rect, current: usize, total: usize, results: usize) {
    let arrow_style = |enabled: bool| {
        if enabled {
            theme::help_text_style()
        } else {
            theme::muted_style()
        }
    };

    let mut spans = vec![Span::styled("‹ ", arrow_style(current > 1))];
    for label in page_labels(current, total) {
        match label {
            PageLabel::Page(page) if page == current => spans.push(Span::styled(
                format!("[{page}] "),
                theme::title_style().add_modifier(Modifier::REVERSED),
            )),
            PageLabel::Page(page) => {
                spans.push(Span::styled(format!("{page} "), theme::help_text_style()))
            }
            PageLabel::Ellipsis => spans.push(Span::styled("… ", theme::muted_style())),
        }
    }
    spans.push(Span::styled("›", arrow_style(current < total)));
    spans.push(Span::styled(
        format!("  ({results} results)"),
        theme::muted_style(),
    ));

    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
