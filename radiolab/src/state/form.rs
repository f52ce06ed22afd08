/// A single line of text input in a form or dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl TextField {
    pub fn required(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: true,
        }
    }

    pub fn optional(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// Ordered text fields with one focused field and an inline validation message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub fields: Vec<TextField>,
    pub focused: usize,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(fields: Vec<TextField>) -> Self {
        Self {
            fields,
            focused: 0,
            error: None,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(TextField::trimmed).unwrap_or("")
    }

    pub fn field(&self, index: usize) -> Option<&TextField> {
        self.fields.get(index)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
            self.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
            self.error = None;
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState::new(vec![
            TextField::required("Name"),
            TextField::optional("Notes").with_value("  keep  "),
        ])
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut form = form();
        form.previous_field();
        assert_eq!(form.focused, 1);
        form.next_field();
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_typing_edits_focused_field_and_clears_error() {
        let mut form = form();
        form.error = Some("Name is required".to_string());

        form.push_char('A');
        form.push_char('b');
        form.pop_char();

        assert_eq!(form.value(0), "A");
        assert_eq!(form.error, None);
    }

    #[test]
    fn test_value_is_trimmed() {
        assert_eq!(form().value(1), "keep");
        assert_eq!(form().value(9), "");
    }
}
