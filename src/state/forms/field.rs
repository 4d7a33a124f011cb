//! Form field value objects

/// How a field takes its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    #[default]
    Text,
    /// Masked input (passwords)
    Secret,
    /// Closed set of options, picked from a list
    Select(&'static [&'static str]),
}

/// Represents a single form field with its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: String,
    pub input: InputKind,
    /// Set once the user has left the field at least once
    pub touched: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, InputKind::Text)
    }

    /// Create a new masked field
    pub fn secret(name: &str, label: &str) -> Self {
        Self::new(name, label, InputKind::Secret)
    }

    /// Create a new select field
    pub fn select(name: &str, label: &str, options: &'static [&'static str]) -> Self {
        Self::new(name, label, InputKind::Select(options))
    }

    fn new(name: &str, label: &str, input: InputKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: String::new(),
            input,
            touched: false,
        }
    }

    /// Options offered by a select field, empty for free-form input
    pub fn options(&self) -> &'static [&'static str] {
        match self.input {
            InputKind::Select(options) => options,
            InputKind::Text | InputKind::Secret => &[],
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self.input, InputKind::Secret)
    }

    /// Value as it should be echoed back to the user
    pub fn display_value(&self) -> String {
        if self.is_secret() {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Ordered collection of the fields making up one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<FormField>,
}

impl FieldSet {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    /// Current value of a field, `None` if the form has no such field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|f| f.value.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Replace a field's value. Returns false for unknown fields.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.get_mut(name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Record that the user has left a field. Returns false for unknown fields.
    pub fn touch(&mut self, name: &str) -> bool {
        match self.get_mut(name) {
            Some(field) => {
                field.touched = true;
                true
            }
            None => false,
        }
    }

    pub fn touch_all(&mut self) {
        for field in &mut self.fields {
            field.touched = true;
        }
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.touched)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter()
    }

    /// Name/value pairs in form order
    pub fn values(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
