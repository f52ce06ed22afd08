//! Renders a FormState as labelled single-line inputs.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::form::FormState;
use crate::ui::theme;

const FIELD_HEIGHT: u16 = 3;

/// Height the form needs for its fields and error line
pub fn form_height(form: &FormState) -> u16 {
    FIELD_HEIGHT * form.fields.len() as u16 + 1
}

pub fn render_form(f: &mut Frame, area: Rect, form: &FormState, enabled: bool) {
    let mut constraints = vec![Constraint::Length(FIELD_HEIGHT); form.fields.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, field) in form.fields.iter().enumerate() {
        let focused = enabled && index == form.focused;
        let label = if field.required {
            format!(" {} * ", field.label)
        } else {
            format!(" {} ", field.label)
        };

        let mut spans = vec![Span::raw(field.value.as_str())];
        if focused {
            spans.push(Span::styled("█", theme::loading_style()));
        }

        let (style, border_style) = if focused {
            (
                theme::form_field_focused_style(),
                theme::accent_border_style(),
            )
        } else {
            (theme::form_field_style(), theme::help_text_style())
        };

        let input = Paragraph::new(Line::from(spans)).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(label),
        );
        f.render_widget(input, rows[index]);
    }

    if let Some(error) = &form.error {
        let error_line = Paragraph::new(Span::styled(format!(" {error}"), theme::error_style()));
        f.render_widget(error_line, rows[form.fields.len()]);
    }
}
