//! Small field-list form used by the admin editors.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Digits only.
    Number,
    /// Space flips it.
    Toggle,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub checked: bool,
}

impl FormField {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            kind: FieldKind::Text,
            checked: false,
        }
    }

    pub fn number(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(label, value)
        }
    }

    pub fn toggle(label: &'static str, checked: bool) -> Self {
        Self {
            label,
            value: String::new(),
            kind: FieldKind::Toggle,
            checked,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub message: Option<String>,
}

impl FormState {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            focus: 0,
            message: None,
        }
    }

    pub fn next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn input(&mut self, ch: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match field.kind {
            FieldKind::Text => field.value.push(ch),
            FieldKind::Number if ch.is_ascii_digit() => field.value.push(ch),
            FieldKind::Number => {}
            FieldKind::Toggle if ch == ' ' => field.checked = !field.checked,
            FieldKind::Toggle => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    pub fn trimmed(&self, label: &str) -> &str {
        self.value(label).trim()
    }

    pub fn checked(&self, label: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.label == label && field.checked)
    }
}
