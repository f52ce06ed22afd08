//! Title line and key hint bar framing every screen.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::LoadingState;
use crate::ui::{layouts, theme};

/// Screen title with the load status of its entity in the top-right corner.
pub fn render_screen_title(f: &mut Frame, area: Rect, title: &str, loading_state: &LoadingState) {
    let (title_area, status_area) = layouts::title_with_loading(area);

    f.render_widget(Paragraph::new(title).style(theme::title_style()), title_area);

    let (symbol, color) = match loading_state {
        LoadingState::NotStarted => return,
        LoadingState::Loading(throbber_state) => {
            let throbber = throbber_widgets_tui::Throbber::default()
                .style(theme::loading_style())
                .throbber_set(throbber_widgets_tui::BRAILLE_EIGHT);
            f.render_stateful_widget(throbber, status_area, &mut throbber_state.clone());
            return;
        }
        LoadingState::Loaded => ("●", theme::COLOR_POSITIVE),
        LoadingState::Error(_) => ("!", theme::COLOR_NEGATIVE),
    };
    f.render_widget(
        Paragraph::new(Span::styled(symbol, Style::default().fg(color))).alignment(Alignment::Right),
        status_area,
    );
}

/// Bottom bar of `key: action` hints separated by `|`. Keys are highlighted.
pub fn render_help_bar(f: &mut Frame, area: Rect, hints: &str) {
    let help = Paragraph::new(Line::from(hint_spans(hints)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, area);
}

fn hint_spans(hints: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    for (i, hint) in hints.split(" | ").enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme::muted_style()));
        }
        match hint.split_once(": ") {
            Some((keys, action)) => {
                spans.push(Span::styled(keys, theme::header_style()));
                spans.push(Span::styled(": ", theme::help_text_style()));
                spans.push(Span::styled(action, theme::help_text_style()));
            }
            // Status text such as "Uploading..." has no key
            None => spans.push(Span::styled(hint, theme::loading_style())),
        }
    }
    spans
}
