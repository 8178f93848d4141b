use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// HTML5 email pattern (WHATWG).
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex")
});

/// Accumulates validation failures for one submitted form. A form is valid
/// iff no field or non-field errors were recorded. Checks never
/// short-circuit, so one submission can surface several errors at once.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    pub field_errors: HashMap<String, Vec<String>>,
    pub non_field_errors: Vec<String>,
}

impl Validator {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Records `message` against `field` iff `ok` is false.
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_field_error(field, message);
        }
    }

    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    /// First error recorded for a field, for inline rendering.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
    }
}

pub fn not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Character count, not byte length, so multibyte input is bounded fairly.
pub fn max_chars(s: &str, n: usize) -> bool {
    s.chars().count() <= n
}

pub fn min_chars(s: &str, n: usize) -> bool {
    s.chars().count() >= n
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

pub fn matches(s: &str, rx: &Regex) -> bool {
    rx.is_match(s)
}
