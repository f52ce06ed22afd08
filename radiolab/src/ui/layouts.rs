//! Reusable layout builders for consistent screen structure.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{
    HELP_BAR_HEIGHT, PAGINATION_HEIGHT, SCREEN_MARGIN, SEARCH_INPUT_HEIGHT, TITLE_HEIGHT,
};

/// Standard screen layout with title, content area, and help bar.
///
/// Returns a tuple of (title_area, content_area, help_area)
pub fn screen_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(SCREEN_MARGIN)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(8),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Layout for paginated list screens: search box, table and page bar.
///
/// Returns a tuple of (title_area, search_area, table_area, pagination_area, help_area)
pub fn list_layout(area: Rect) -> (Rect, Rect, Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(SCREEN_MARGIN)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Length(SEARCH_INPUT_HEIGHT),
            Constraint::Min(6),
            Constraint::Length(PAGINATION_HEIGHT),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2], chunks[3], chunks[4])
}

/// Split a title area into title text and a one-cell load status.
///
/// Returns (title_text_area, status_area)
pub fn title_with_loading(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    (chunks[0], chunks[1])
}

/// A summary block above a content area
///
/// Returns (summary_area, content_area)
pub fn summary_and_content(area: Rect, summary_height: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Min(4)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Two side-by-side panes, the left one `left_percent` wide
pub fn split_horizontal(area: Rect, left_percent: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_percent),
            Constraint::Percentage(100 - left_percent),
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Create a centered popup rectangle.
///
/// # Arguments
/// * `percent_x` - Width as percentage of parent (0-100)
/// * `percent_y` - Height as percentage of parent (0-100)
/// * `area` - The parent area to center within
pub fn centered_popup(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Bottom-right corner stack for toasts, `count` rows of `height` each
pub fn notification_area(area: Rect, width: u16, height: u16, count: usize) -> Rect {
    let width = width.min(area.width);
    let total = (height.saturating_mul(count as u16)).min(area.height);
    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - total,
        width,
        height: total,
    }
}

/// Standard popup sizes
pub mod popup_sizes {
    /// Small popup (50% x 30%) - for simple confirmations
    pub const SMALL: (u16, u16) = (50, 30);

    /// Medium popup (60% x 40%) - for confirmations that take input
    pub const MEDIUM: (u16, u16) = (60, 40);

    /// Large popup (80% x 80%) - for help screens
    pub const LARGE: (u16, u16) = (80, 80);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_area_hugs_bottom_right() {
        let area = Rect::new(0, 0, 100, 40);
        let toast = notification_area(area, 48, 3, 2);
        assert_eq!(toast, Rect::new(52, 34, 48, 6));
    }

    #[test]
    fn test_notification_area_fits_small_terminals() {
        let area = Rect::new(0, 0, 30, 4);
        let toast = notification_area(area, 48, 3, 4);
        assert_eq!(toast.width, 30);
        assert_eq!(toast.height, 4);
        assert_eq!(toast.y, 0);
    }
}
