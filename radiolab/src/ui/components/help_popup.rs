use ratatui::{
    prelude::*,
    widgets::{List, ListItem},
    Frame,
};

use crate::state::InputMode;
use crate::ui::{layouts, screens::Screen, theme};

pub fn render_help_popup(f: &mut Frame, screen: &Screen) {
    let help_items = get_help_items(screen);

    let inner = super::dialogs::popup_frame(
        f,
        layouts::popup_sizes::LARGE,
        " Help (press ? or Esc to close) ",
        theme::accent_border_style(),
    );

    let items: Vec<ListItem> = help_items
        .iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(*description),
            ]))
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));

    f.render_widget(list, inner);
}

fn search_help(items: &mut Vec<(&'static str, &'static str)>, input_mode: InputMode, what: &'static str) {
    items.push(("/", "Search"));
    if input_mode == InputMode::Search {
        items.push(("Type", what));
        items.push(("Enter", "Apply search now"));
        items.push(("Esc", "Clear search"));
        items.push(("Backspace", "Delete last character"));
    }
    items.push(("]/PgDn", "Next page"));
    items.push(("[/PgUp", "Previous page"));
}

fn get_help_items(screen: &Screen) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![];

    match screen {
        Screen::Home(..) => {
            items.push(("↑/k ↓/j", "Move selection"));
            items.push(("Enter/→/l", "Open selected section"));
        }
        Screen::Projects(state) => {
            items.push(("↑/k ↓/j", "Move selection"));
            items.push(("Enter/→/l", "Open selected project"));
            items.push(("n", "New project"));
            search_help(
                &mut items,
                state.list.input_mode,
                "Filter by name or patient ID",
            );
            items.push(("r", "Reload projects"));
        }
        Screen::ProjectForm(..) => {
            items.push(("Tab/↓", "Next field"));
            items.push(("Shift+Tab/↑", "Previous field"));
            items.push(("Ctrl+L", "Clear field"));
            items.push(("Enter", "Save project"));
            items.push(("Esc", "Cancel"));
        }
        Screen::ProjectDetail(..) => {
            items.push(("Tab", "Switch between radiographs and reports"));
            items.push(("↑/k ↓/j", "Move selection"));
            items.push(("Enter/→/l", "Open selected report"));
            items.push(("e", "Edit project"));
            items.push(("u", "Upload radiographs"));
            items.push(("a", "Analyze (needs at least one radiograph)"));
            items.push(("d", "Delete selected radiograph or report"));
            items.push(("D", "Delete project"));
            items.push(("r", "Reload"));
        }
        Screen::Upload(..) => {
            items.push(("Type", "File or folder path"));
            items.push(("Enter", "Add path to the selection"));
            items.push(("Ctrl+D", "Remove last selected file"));
            items.push(("Ctrl+L", "Clear path"));
            items.push(("Ctrl+U", "Upload selected files"));
            items.push(("Esc", "Back to project"));
        }
        Screen::Analyze(..) => {
            items.push(("↑/k ↓/j", "Select radiograph"));
            items.push(("Enter/a", "Run analysis"));
            items.push(("s", "Save results as report"));
            items.push(("p", "Download PDF"));
            items.push(("u", "Upload more radiographs"));
        }
        Screen::Reports(state) => {
            items.push(("↑/k ↓/j", "Move selection"));
            items.push(("Enter/→/l", "Open selected report"));
            items.push(("d", "Delete selected report"));
            items.push(("p", "Download PDF"));
            search_help(
                &mut items,
                state.list.input_mode,
                "Filter by report, project or patient ID",
            );
            items.push(("r", "Reload reports"));
        }
        Screen::ReportDetail(..) => {
            items.push(("e", "Edit name and notes"));
            items.push(("d", "Delete report"));
            items.push(("o", "Open project"));
            items.push(("p", "Download PDF"));
        }
        Screen::Logs(..) => {
            items.push(("↑/k", "Scroll up (older logs)"));
            items.push(("↓/j", "Scroll down (newer logs)"));
            items.push(("Page Up", "Scroll up one page"));
            items.push(("Page Down", "Scroll down one page"));
            items.push(("g then g", "Scroll to oldest logs"));
            items.push(("G", "Scroll to newest logs"));
        }
    }

    items.push(("", ""));
    items.push(("--- Global ---", ""));
    items.push(("h/←/Esc", "Navigate back"));
    items.push(("g then h", "Go home"));
    items.push(("g then p", "Go to projects"));
    items.push(("g then r", "Go to reports"));
    items.push(("g then n", "New project"));
    items.push(("g then l", "Go to logs"));
    items.push(("g then g", "Navigate to top of list"));
    items.push(("G", "Navigate to bottom of list"));
    items.push(("x", "Dismiss notification"));
    items.push(("?", "Toggle this help"));
    items.push(("q", "Quit application"));

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LogsState;

    #[test]
    fn test_global_bindings_listed_on_every_screen() {
        let items = get_help_items(&Screen::Logs(LogsState::default()));
        assert!(items.iter().any(|(key, _)| *key == "q"));
        assert!(items.iter().any(|(key, _)| *key == "g then p"));
    }
}
