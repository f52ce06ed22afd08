use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::form;
use crate::state::{form::FormState, Dialog, DialogState};
use crate::ui::{layouts, theme};

/// Render whichever modal dialog is open on the current screen
pub fn render_dialog(f: &mut Frame, dialog: &DialogState) {
    match &dialog.dialog {
        Dialog::DeleteProject {
            project_name,
            typed,
            ..
        } => render_delete_project(f, project_name, typed, dialog.busy),
        Dialog::DeleteReport { name, .. } => render_confirmation(
            f,
            " Delete Report ",
            &format!("Delete report \"{name}\"?"),
            dialog.busy,
        ),
        Dialog::DeleteImage { name, .. } => render_confirmation(
            f,
            " Delete Radiograph ",
            &format!("Delete radiograph \"{name}\"? The file is removed from the project."),
            dialog.busy,
        ),
        Dialog::EditReport { form, .. } => {
            render_form_dialog(f, " Edit Report ", form, dialog.busy, "Enter: save")
        }
        Dialog::SaveReport { form, .. } => {
            render_form_dialog(f, " Save Report ", form, dialog.busy, "Enter: save report")
        }
    }
}

/// Clears a centered box of `size` percent over the screen, draws its border and
/// returns the area inside it.
pub fn popup_frame(f: &mut Frame, size: (u16, u16), title: &str, border_style: Style) -> Rect {
    let area = layouts::centered_popup(size.0, size.1, f.area());
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);

    f.render_widget(Clear, area);
    f.render_widget(block, area);
    inner
}

fn instructions(confirm: &str, busy: bool) -> Line<'static> {
    if busy {
        return Line::from(Span::styled("Working...", theme::loading_style()));
    }
    Line::from(vec![
        Span::styled(
            confirm.to_string(),
            Style::default()
                .fg(theme::COLOR_NEGATIVE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" / "),
        Span::styled("[Esc]", Style::default().fg(theme::COLOR_HELP_TEXT)),
        Span::raw(" Cancel"),
    ])
}

/// Yes/no confirmation for deleting a report or radiograph
fn render_confirmation(f: &mut Frame, title: &str, message: &str, busy: bool) {
    let inner = popup_frame(
        f,
        layouts::popup_sizes::SMALL,
        title,
        theme::danger_border_style(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let warning = Paragraph::new(message.to_string())
        .style(theme::loading_style().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(warning, chunks[0]);

    f.render_widget(
        Paragraph::new(instructions("[Y]es", busy)).alignment(Alignment::Center),
        chunks[2],
    );
}

/// Project deletion only confirms once the typed text equals the project name
fn render_delete_project(f: &mut Frame, project_name: &str, typed: &str, busy: bool) {
    let inner = popup_frame(
        f,
        layouts::popup_sizes::MEDIUM,
        " Delete Project ",
        theme::danger_border_style(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let warning = Paragraph::new(vec![
        Line::from(Span::styled(
            "This permanently deletes the project with its radiographs and reports.",
            theme::error_style(),
        )),
        Line::from(vec![
            Span::raw("Type "),
            Span::styled(project_name.to_string(), theme::header_style()),
            Span::raw(" to confirm."),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(warning, chunks[0]);

    let matches = typed == project_name;
    let border_style = if matches {
        theme::danger_border_style()
    } else {
        theme::accent_border_style()
    };
    let input = Paragraph::new(Line::from(vec![
        Span::raw(typed.to_string()),
        Span::styled("█", theme::loading_style()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Project name "),
    );
    f.render_widget(input, chunks[1]);

    let confirm = if matches {
        "[Enter] Delete"
    } else {
        "Name does not match"
    };
    f.render_widget(
        Paragraph::new(instructions(confirm, busy)).alignment(Alignment::Center),
        chunks[2],
    );
}

fn render_form_dialog(
    f: &mut Frame,
    title: &str,
    form_state: &FormState,
    busy: bool,
    confirm: &str,
) {
    let inner = popup_frame(
        f,
        layouts::popup_sizes::MEDIUM,
        title,
        theme::info_border_style(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(form::form_height(form_state)),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    form::render_form(f, chunks[0], form_state, !busy);

    let hint = if busy {
        Line::from(Span::styled("Saving...", theme::loading_style()))
    } else {
        Line::from(Span::styled(
            format!("{confirm} | Tab: next field | Esc: cancel"),
            theme::help_text_style(),
        ))
    };
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[1]);
}
