use std::collections::BTreeMap;
use std::sync::LazyLock;
use regex::Regex;
use crate::api::FieldError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").expect("email regex"));
static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").expect("mobile regex"));
static AADHAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{12}$").expect("aadhar regex"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// Per-field messages shown under form inputs. Client checks and server
/// `errors` land in the same map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// Copies server-side `{field, message}` pairs over any client message for the same field.
    pub fn absorb(&mut self, errors: &[FieldError]) {
        for err in errors {
            self.0.insert(err.field.clone(), err.message.clone());
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn require(&mut self, field: &str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.insert(field, format!("{} is required", label));
            false
        } else {
            true
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.require(field, "Email", value) && !is_valid_email(value) {
            self.insert(field, "Please enter a valid email address");
        }
    }

    pub fn mobile(&mut self, field: &str, value: &str) {
        if self.require(field, "Phone number", value) && !is_valid_mobile(value) {
            self.insert(field, "Phone number must be exactly 10 digits");
        }
    }

    pub fn aadhar(&mut self, field: &str, value: &str) {
        if self.require(field, "Aadhar number", value) && !is_valid_aadhar(value) {
            self.insert(field, "Aadhar number must be exactly 12 digits");
        }
    }

    pub fn password(&mut self, field: &str, value: &str) {
        if self.require(field, "Password", value) && value.chars().count() < MIN_PASSWORD_LEN {
            self.insert(field, format!("Password must be at least {} characters", MIN_PASSWORD_LEN));
        }
    }

    /// Parses a whole number of years; records an error and returns `None` otherwise.
    pub fn years(&mut self, field: &str, label: &str, value: &str) -> Option<u32> {
        if !self.require(field, label, value) {
            return None;
        }
        match value.trim().parse::<u32>() {
            Ok(years) if years <= 60 => Some(years),
            _ => {
                self.insert(field, format!("{} must be a whole number of years", label));
                None
            }
        }
    }

    pub fn selection(&mut self, field: &str, label: &str, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.insert(field, format!("Please select a {}", label));
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

pub fn is_valid_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value.trim())
}

pub fn is_valid_aadhar(value: &str) -> bool {
    AADHAR_RE.is_match(value.trim())
}

/// Keeps only ASCII digits and truncates to `max` characters, for numeric inputs.
pub fn digits_only(value: &str, max: usize) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rules() {
        assert!(is_valid_email("principal@greenwood.edu.in"));
        assert!(is_valid_email("  a.b+c@x-y.org "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn mobile_and_aadhar_lengths() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("987654321"));
        assert!(!is_valid_mobile("98765432101"));
        assert!(!is_valid_mobile("98765-43210"));
        assert!(is_valid_aadhar("123412341234"));
        assert!(!is_valid_aadhar("1234 1234 1234"));
    }

    #[test]
    fn first_client_error_per_field_wins_but_server_overrides() {
        let mut errors = FieldErrors::new();
        errors.email("email", "");
        assert_eq!(errors.get("email"), Some("Email is required"));
        errors.email("email", "bad");
        assert_eq!(errors.get("email"), Some("Email is required"));

        errors.absorb(&[FieldError { field: "email".into(), message: "Email already exists".into() }]);
        assert_eq!(errors.get("email"), Some("Email already exists"));
    }

    #[test]
    fn years_and_selection() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.years("experience", "Experience", " 7 "), Some(7));
        assert_eq!(errors.years("experience", "Experience", "seven"), None);
        errors.selection("department", "department", None);
        errors.selection("class", "class", Some("c1"));
        assert!(errors.get("department").is_some());
        assert!(errors.get("class").is_none());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn password_length() {
        let mut errors = FieldErrors::new();
        errors.password("password", "short");
        assert!(errors.get("password").is_some());
        let mut errors = FieldErrors::new();
        errors.password("password", "longenough");
        assert!(errors.is_empty());
    }

    #[test]
    fn digits_only_truncates() {
        assert_eq!(digits_only("98a76-54321099", 10), "9876543210");
    }
}
