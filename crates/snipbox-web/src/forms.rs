//! One form struct per user action. Forms decode from URL-encoded bodies
//! with `#[serde(default)]` so missing fields become zero values and fall
//! through to validation; unknown fields are ignored. Decode failure itself
//! (a malformed body) is a client error, not a validation failure.

use serde::Deserialize;

use crate::validator::{self, EMAIL_RX, Validator};

const BLANK_MSG: &str = "This field cannot be blank";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i64,
    pub csrf_token: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl SnippetCreateForm {
    pub fn validate(&mut self) -> bool {
        self.validator
            .check_field(validator::not_blank(&self.title), "title", BLANK_MSG);
        self.validator.check_field(
            validator::max_chars(&self.title, 100),
            "title",
            "This filed cannot be more than 100 characters long",
        );
        self.validator
            .check_field(validator::not_blank(&self.content), "content", BLANK_MSG);
        self.validator.check_field(
            validator::permitted_value(&self.expires, &[1, 7, 365]),
            "expires",
            "This field must equal 1, 7, or 365",
        );
        self.validator.is_valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl UserSignupForm {
    pub fn validate(&mut self) -> bool {
        self.validator
            .check_field(validator::not_blank(&self.name), "name", BLANK_MSG);
        self.validator
            .check_field(validator::not_blank(&self.email), "email", BLANK_MSG);
        self.validator.check_field(
            validator::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        self.validator
            .check_field(validator::not_blank(&self.password), "password", BLANK_MSG);
        self.validator.check_field(
            validator::min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
        self.validator.is_valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserLoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl UserLoginForm {
    pub fn validate(&mut self) -> bool {
        self.validator
            .check_field(validator::not_blank(&self.email), "email", BLANK_MSG);
        self.validator.check_field(
            validator::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        self.validator
            .check_field(validator::not_blank(&self.password), "password", BLANK_MSG);
        self.validator.is_valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordUpdateForm {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
    pub csrf_token: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl PasswordUpdateForm {
    pub fn validate(&mut self) -> bool {
        self.validator.check_field(
            validator::not_blank(&self.current_password),
            "current_password",
            BLANK_MSG,
        );
        self.validator.check_field(
            validator::not_blank(&self.new_password),
            "new_password",
            BLANK_MSG,
        );
        self.validator.check_field(
            validator::not_blank(&self.new_password_confirmation),
            "new_password_confirmation",
            BLANK_MSG,
        );
        self.validator.check_field(
            validator::min_chars(&self.new_password, 8),
            "new_password",
            "This field must be at least 8 characters long",
        );
        self.validator.check_field(
            self.new_password == self.new_password_confirmation,
            "new_password_confirmation",
            "New Password do not match",
        );
        self.validator.is_valid()
    }
}

/// Logout is a bare state-changing POST; only the CSRF token travels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogoutForm {
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_form_accepts_valid_input() {
        for expires in [1, 7, 365] {
            let mut form = SnippetCreateForm {
                title: "a".repeat(100),
                content: "some content".into(),
                expires,
                ..Default::default()
            };
            assert!(form.validate());
        }
    }

    #[test]
    fn snippet_form_title_length_boundary() {
        let mut form = SnippetCreateForm {
            title: "a".repeat(101),
            content: "some content".into(),
            expires: 7,
            ..Default::default()
        };
        assert!(!form.validate());
        assert_eq!(
            form.validator.field_error("title"),
            Some("This filed cannot be more than 100 characters long")
        );

        // 100 multibyte chars pass even though the byte length is over 100.
        let mut form = SnippetCreateForm {
            title: "Å".repeat(100),
            content: "some content".into(),
            expires: 7,
            ..Default::default()
        };
        assert!(form.validate());
    }

    #[test]
    fn snippet_form_rejects_unknown_expiry() {
        for expires in [0, 2, 255, -7] {
            let mut form = SnippetCreateForm {
                title: "title".into(),
                content: "content".into(),
                expires,
                ..Default::default()
            };
            assert!(!form.validate());
            assert_eq!(
                form.validator.field_error("expires"),
                Some("This field must equal 1, 7, or 365")
            );
        }
    }

    #[test]
    fn snippet_form_surfaces_all_errors_at_once() {
        let mut form = SnippetCreateForm {
            expires: 255,
            ..Default::default()
        };
        assert!(!form.validate());
        assert_eq!(form.validator.field_error("title"), Some(BLANK_MSG));
        assert_eq!(form.validator.field_error("content"), Some(BLANK_MSG));
        assert!(form.validator.field_error("expires").is_some());
    }

    #[test]
    fn signup_form_rules() {
        let mut form = UserSignupForm {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            password: "validPa$$word".into(),
            ..Default::default()
        };
        assert!(form.validate());

        let mut form = UserSignupForm {
            name: "Bob".into(),
            email: "bob@example.".into(),
            password: "short".into(),
            ..Default::default()
        };
        assert!(!form.validate());
        assert_eq!(
            form.validator.field_error("email"),
            Some("This field must be a valid email address")
        );
        assert_eq!(
            form.validator.field_error("password"),
            Some("This field must be at least 8 characters long")
        );
    }

    #[test]
    fn login_form_rules() {
        let mut form = UserLoginForm {
            email: "alice@example.com".into(),
            password: "pa$$word".into(),
            ..Default::default()
        };
        assert!(form.validate());

        let mut form = UserLoginForm::default();
        assert!(!form.validate());
        assert_eq!(form.validator.field_error("email"), Some(BLANK_MSG));
        assert_eq!(form.validator.field_error("password"), Some(BLANK_MSG));
    }

    #[test]
    fn password_form_requires_matching_confirmation() {
        let mut form = PasswordUpdateForm {
            current_password: "pa$$word".into(),
            new_password: "qwerty123".into(),
            new_password_confirmation: "qwerty124".into(),
            ..Default::default()
        };
        assert!(!form.validate());
        assert_eq!(
            form.validator.field_error("new_password_confirmation"),
            Some("New Password do not match")
        );

        let mut form = PasswordUpdateForm {
            current_password: "pa$$word".into(),
            new_password: "qwerty123".into(),
            new_password_confirmation: "qwerty123".into(),
            ..Default::default()
        };
        assert!(form.validate());
    }
}
