use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::notifications::{NotificationLevel, Notifications};
use crate::ui::{layouts, theme, utils};

const TOAST_HEIGHT: u16 = 3;

/// Stack of toasts in the bottom-right corner, newest at the bottom
pub fn render_notifications(f: &mut Frame, notifications: &Notifications) {
    if notifications.is_empty() {
        return;
    }

    let area = layouts::notification_area(
        f.area(),
        theme::NOTIFICATION_WIDTH,
        TOAST_HEIGHT,
        notifications.len(),
    );
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(TOAST_HEIGHT); notifications.len()])
        .split(area);

    let text_width = theme::NOTIFICATION_WIDTH.saturating_sub(4) as usize;
    for (notification, slot) in notifications.iter().zip(slots.iter()) {
        let color = theme::notification_color(notification.level);
        let toast = Paragraph::new(utils::truncate(&notification.message, text_width))
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(level_title(notification.level)),
            );

        f.render_widget(Clear, *slot);
        f.render_widget(toast, *slot);
    }
}

fn level_title(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Info => " Info ",
        NotificationLevel::Success => " Done ",
        NotificationLevel::Warning => " Warning ",
        NotificationLevel::Error => " Error (x to dismiss) ",
    }
}
