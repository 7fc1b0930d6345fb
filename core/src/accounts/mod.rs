use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AccountPolicy;
use crate::error::FieldError;
use crate::model::UserId;

mod password;

pub use password::{hash_password, verify_password};

const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";
const FIRST_NAME_MAX_LENGTH: usize = 20;
const LAST_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub second_last_name: Option<String>,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub second_last_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Checks every field of a registration and returns all problems found.
/// Uniqueness is checked by the store.
pub fn validate_registration(registration: &Registration, policy: &AccountPolicy) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(message) = validate_username(&registration.username, policy) {
        errors.push(FieldError::new("username", message));
    }
    if let Some(message) = validate_password(&registration.password, policy) {
        errors.push(FieldError::new("password", message));
    }
    if let Some(message) = validate_name(&registration.first_name, FIRST_NAME_MAX_LENGTH, true) {
        errors.push(FieldError::new("first_name", message));
    }
    if let Some(message) = validate_name(&registration.last_name, LAST_NAME_MAX_LENGTH, true) {
        errors.push(FieldError::new("last_name", message));
    }
    if let Some(name) = &registration.second_last_name {
        if let Some(message) = validate_name(name, LAST_NAME_MAX_LENGTH, false) {
            errors.push(FieldError::new("second_last_name", message));
        }
    }
    if let Some(message) = validate_email(&registration.email) {
        errors.push(FieldError::new("email", message));
    }

    errors
}

fn validate_username(username: &str, policy: &AccountPolicy) -> Option<String> {
    if username.trim().is_empty() {
        return Some(blank());
    }
    if username.chars().count() > policy.username_max_length {
        return Some(too_long(policy.username_max_length));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if !username.chars().all(allowed) {
        return Some("Username must contain only alphanumeric characters.".to_string());
    }
    None
}

fn validate_password(password: &str, policy: &AccountPolicy) -> Option<String> {
    if password.is_empty() {
        return Some(blank());
    }
    if password.chars().count() < policy.password_min_length {
        return Some(format!(
            "Password must be at least {} characters long.",
            policy.password_min_length
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Some("Password must contain at least one uppercase letter.".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Some("Password must contain at least one special character.".to_string());
    }
    None
}

fn validate_name(name: &str, max_length: usize, required: bool) -> Option<String> {
    if required && name.trim().is_empty() {
        return Some(blank());
    }
    if name.chars().count() > max_length {
        return Some(too_long(max_length));
    }
    None
}

fn validate_email(email: &str) -> Option<String> {
    if email.trim().is_empty() {
        return Some(blank());
    }
    let invalid = || Some("Enter a valid email address.".to_string());
    if email.chars().any(char::is_whitespace) {
        return invalid();
    }
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return invalid(),
    };
    if local.is_empty() || domain.contains('@') {
        return invalid();
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return invalid();
    }
    None
}

fn blank() -> String {
    "This field may not be blank.".to_string()
}

fn too_long(max_length: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max_length)
}
