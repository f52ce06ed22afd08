use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Row, Table},
};
use tracing::Level;

use crate::log_buffer::LogBuffer;
use crate::state::{LoadingState, LogsState};
use crate::ui::{
    components::{chrome, empty_state},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &LogsState, log_buffer: &LogBuffer) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = format!("Logs ({} entries)", state.total_entries);
    chrome::render_screen_title(f, title_area, &title, &LoadingState::NotStarted);
    render_logs(f, content_area, state, log_buffer);
    render_help(f, help_area, state);
}

fn render_logs(f: &mut Frame, area: Rect, state: &LogsState, log_buffer: &LogBuffer) {
    let entries = log_buffer.get_entries();
    let total = entries.len();

    if total == 0 {
        empty_state::render_empty_state(f, area, "Session Logs", "No logs yet", None);
        return;
    }

    // Newest entries at the bottom; the offset counts rows scrolled up from there
    let inner_height = area.height.saturating_sub(4) as usize;
    let offset = state.scroll_offset.min(total.saturating_sub(1));
    let end = total - offset;
    let start = end.saturating_sub(inner_height);

    let rows: Vec<Row> = entries[start..end]
        .iter()
        .map(|entry| {
            let (level_str, level_style) = match entry.level {
                Level::ERROR => ("ERROR", theme::error_style()),
                Level::WARN => ("WARN ", theme::loading_style()),
                Level::INFO => ("INFO ", Style::default().fg(theme::COLOR_POSITIVE)),
                Level::DEBUG => ("DEBUG", Style::default().fg(Color::Blue)),
                Level::TRACE => ("TRACE", theme::muted_style()),
            };

            Row::new(vec![
                entry.timestamp.format("%H:%M:%S%.3f").to_string(),
                level_str.to_string(),
                truncate_target(&entry.target, 25),
                entry.message.clone(),
            ])
            .style(level_style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(25),
        Constraint::Min(30),
    ];

    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Logs [{}-{} of {}] ",
            start + 1,
            end,
            total
        )))
        .header(
            Row::new(vec!["Time", "Level", "Target", "Message"])
                .style(theme::header_style())
                .bottom_margin(1),
        );

    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, area: Rect, state: &LogsState) {
    let scroll_info = if state.scroll_offset > 0 {
        format!(" (scrolled {} from bottom)", state.scroll_offset)
    } else {
        String::new()
    };

    let help_text = format!(
        "j/k: scroll | G: bottom | gg: top | PgUp/PgDn: page | h: back | ?: help{}",
        scroll_info
    );

    chrome::render_help_bar(f, area, &help_text);
}

/// Keeps the tail of long module paths, which is the informative part
fn truncate_target(target: &str, max_len: usize) -> String {
    let count = target.chars().count();
    if count <= max_len {
        target.to_string()
    } else {
        let tail: String = target.chars().skip(count - max_len + 3).collect();
        format!("...{tail}")
    }
}
