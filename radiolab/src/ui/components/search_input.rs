//! Search box above the paginated list screens.

use ratatui::prelude::Rect;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::{search::Debounced, InputMode};
use crate::ui::theme;

pub fn render_search_input(
    f: &mut Frame,
    area: Rect,
    search: &Debounced,
    input_mode: InputMode,
    placeholder: &str,
) {
    let editing = input_mode == InputMode::Search;

    let line = if search.draft().is_empty() && !editing {
        Line::from(Span::styled(placeholder, theme::muted_style()))
    } else {
        let mut spans = vec![Span::styled(search.draft(), theme::loading_style())];
        if editing {
            spans.push(Span::styled("█", theme::loading_style()));
        }
        Line::from(spans)
    };

    let title = if editing {
        "Search (Enter: apply, Esc: clear)"
    } else {
        "Search (/)"
    };
    let border_style = if editing {
        theme::accent_border_style()
    } else {
        theme::help_text_style()
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    f.render_widget(input, area);
}
