//! Typed form inputs and the field rules they are checked against.
//!
//! Every input is normalised (trimmed) on construction, so the values that get
//! validated are exactly the values that get stored.

use std::fmt;

use serde::Serialize;

pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 1000;
pub const USERNAME_MAX_CHARS: usize = 150;
pub const NAME_MAX_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;

/// A single failed rule, attached to the form field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors produced while validating one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Value must be non-empty.
    pub fn required(&mut self, field: &'static str, value: &str) {
        if value.is_empty() {
            self.add(field, "This field is required.");
        }
    }

    /// Value must not exceed `max` characters.
    pub fn max_chars(&mut self, field: &'static str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn clean(value: impl Into<String>) -> String {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Title and body of a post, for both creation and editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: clean(title),
            content: clean(content),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("title", &self.title);
        errors.max_chars("title", &self.title, TITLE_MAX_CHARS);
        errors.required("content", &self.content);
        errors.max_chars("content", &self.content, CONTENT_MAX_CHARS);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub content: String,
}

impl CommentInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: clean(content),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.required("content", &self.content);
        errors.max_chars("content", &self.content, CONTENT_MAX_CHARS);
        errors.into_result()
    }
}

/// Registration form. The password is kept verbatim; whitespace is significant.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignupInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: clean(username),
            password: password.into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = clean(email);
        self
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = clean(first_name);
        self.last_name = clean(last_name);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);
        errors.required("password", &self.password);
        check_contact(&mut errors, &self.email, &self.first_name, &self.last_name);
        errors.into_result()
    }
}

impl fmt::Debug for SignupInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupInput")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Editable part of the caller's own account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            username: clean(username),
            email: clean(email),
            first_name: clean(first_name),
            last_name: clean(last_name),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);
        check_contact(&mut errors, &self.email, &self.first_name, &self.last_name);
        errors.into_result()
    }
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    errors.required("username", username);
    errors.max_chars("username", username, USERNAME_MAX_CHARS);
    if username.chars().any(char::is_whitespace) {
        errors.add("username", "Usernames may not contain spaces.");
    }
}

fn check_contact(errors: &mut ValidationErrors, email: &str, first_name: &str, last_name: &str) {
    if !email.is_empty() && !email.contains('@') {
        errors.add("email", "Enter a valid email address.");
    }
    errors.max_chars("email", email, EMAIL_MAX_CHARS);
    errors.max_chars("first_name", first_name, NAME_MAX_CHARS);
    errors.max_chars("last_name", last_name, NAME_MAX_CHARS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_post_input() {
        assert!(PostInput::new("test blog title", "test blog content")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_post_input_requires_each_field() {
        let errors = PostInput::new("", "content").validate().unwrap_err();
        assert!(errors.has_field("title"));
        assert!(!errors.has_field("content"));

        let errors = PostInput::new("title", "   ").validate().unwrap_err();
        assert!(errors.has_field("content"));
        assert!(!errors.has_field("title"));
    }

    #[test]
    fn test_post_input_length_bounds() {
        let at_limit = PostInput::new("t".repeat(TITLE_MAX_CHARS), "c".repeat(CONTENT_MAX_CHARS));
        assert!(at_limit.validate().is_ok());

        let over = PostInput::new("t".repeat(TITLE_MAX_CHARS + 1), "c".repeat(CONTENT_MAX_CHARS + 1));
        let errors = over.validate().unwrap_err();
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert!(PostInput::new(title, "body").validate().is_ok());
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let input = PostInput::new("  hello ", "\nworld\t");
        assert_eq!(input.title, "hello");
        assert_eq!(input.content, "world");
    }

    #[test]
    fn test_comment_input() {
        assert!(CommentInput::new("test comment").validate().is_ok());
        let errors = CommentInput::new("").validate().unwrap_err();
        assert!(errors.has_field("content"));
    }

    #[test]
    fn test_signup_requires_username_and_password() {
        assert!(SignupInput::new("test_user", "test_password").validate().is_ok());
        assert!(SignupInput::new("", "test_password")
            .validate()
            .unwrap_err()
            .has_field("username"));
        assert!(SignupInput::new("test_user", "")
            .validate()
            .unwrap_err()
            .has_field("password"));
    }

    #[test]
    fn test_signup_rejects_bad_email_and_spaces() {
        let errors = SignupInput::new("two words", "pw")
            .with_email("not-an-email")
            .validate()
            .unwrap_err();
        assert!(errors.has_field("username"));
        assert!(errors.has_field("email"));
    }

    #[test]
    fn test_signup_debug_redacts_password() {
        let rendered = format!("{:?}", SignupInput::new("alice", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_errors_display() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "bad");
        errors.add("content", "worse");
        assert_eq!(errors.to_string(), "title: bad; content: worse");
    }
}
