//! Client-side form validation
//!
//! Every check here runs before a request is built; a failure is an
//! `ApiError::Validation` shown inline and nothing is sent.

use std::path::Path;

use crate::error::ApiError;

const MIN_PASSWORD_LEN: usize = 6;

fn invalid(msg: &str) -> ApiError {
    ApiError::Validation(msg.to_string())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ApiError> {
    if blank(email) || password.is_empty() {
        return Err(invalid("Please fill in all fields"));
    }
    Ok(())
}

/// # Examples
/// ```
/// use noticetui::logic::forms::validate_signup;
///
/// assert!(validate_signup("Asha", "a@x.io", "secret1", "secret1").is_ok());
/// assert!(validate_signup("Asha", "a@x.io", "secret1", "secret2").is_err());
/// assert!(validate_signup("Asha", "a@x.io", "abc", "abc").is_err());
/// ```
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ApiError> {
    if blank(name) || blank(email) || password.is_empty() || confirm.is_empty() {
        return Err(invalid("Please fill in all fields"));
    }
    if password != confirm {
        return Err(invalid("Passwords do not match"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters"));
    }
    Ok(())
}

pub fn validate_notice(title: &str, content: &str) -> Result<(), ApiError> {
    if blank(title) || blank(content) {
        return Err(invalid("Title and notice body are required"));
    }
    Ok(())
}

/// Loose shape check: something@something.tld, no spaces
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Add a recipient email, ignoring blanks and duplicates (case-insensitive).
///
/// Returns an error for malformed addresses and `Ok(false)` for ignored input.
pub fn add_recipient(recipients: &mut Vec<String>, raw: &str) -> Result<bool, ApiError> {
    let email = raw.trim();
    if email.is_empty() {
        return Ok(false);
    }
    if !looks_like_email(email) {
        return Err(ApiError::Validation(format!("'{}' is not a valid email", email)));
    }
    if recipients.iter().any(|r| r.eq_ignore_ascii_case(email)) {
        return Ok(false);
    }
    recipients.push(email.to_string());
    Ok(true)
}

/// Rosters are accepted as CSV or Excel workbooks
pub fn is_roster_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "csv" | "xlsx" | "xls"))
        .unwrap_or(false)
}

/// Student uploads need the full cohort plus a file; teacher uploads only a department
pub fn validate_upload(required: &[&str], file: &str) -> Result<(), ApiError> {
    if required.iter().any(|v| blank(v)) || blank(file) {
        return Err(invalid("All fields and the file are required."));
    }
    if !is_roster_file(Path::new(file.trim())) {
        return Err(invalid("Invalid file type. Please upload an Excel or CSV file."));
    }
    Ok(())
}

/// Manual entry requires the natural key and a name
pub fn validate_manual_entry(key_label: &str, key: &str, name: &str) -> Result<(), ApiError> {
    if blank(key) {
        return Err(ApiError::Validation(format!("{} is required", key_label)));
    }
    if blank(name) {
        return Err(invalid("Name is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        assert!(validate_login("", "pw").is_err());
        assert!(validate_login("a@x.io", "").is_err());
        assert!(validate_login("a@x.io", "pw").is_ok());
    }

    #[test]
    fn test_signup_messages() {
        let err = validate_signup("A", "a@x.io", "secret1", "secret2").unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        let err = validate_signup("A", "a@x.io", "abc", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = validate_signup("", "a@x.io", "secret1", "secret1").unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields");
    }

    #[test]
    fn test_signup_password_exactly_six() {
        assert!(validate_signup("A", "a@x.io", "abcdef", "abcdef").is_ok());
    }

    #[test]
    fn test_notice_requires_title_and_body() {
        assert!(validate_notice("  ", "body").is_err());
        assert!(validate_notice("Title", "").is_err());
        assert!(validate_notice("Title", "Body").is_ok());
    }

    #[test]
    fn test_add_recipient_dedupes_case_insensitively() {
        let mut list = Vec::new();
        assert!(add_recipient(&mut list, "dean@uni.edu").unwrap());
        assert!(!add_recipient(&mut list, " DEAN@uni.edu ").unwrap());
        assert!(!add_recipient(&mut list, "   ").unwrap());
        assert_eq!(list, vec!["dean@uni.edu".to_string()]);
    }

    #[test]
    fn test_add_recipient_rejects_malformed() {
        let mut list = Vec::new();
        assert!(add_recipient(&mut list, "not-an-email").is_err());
        assert!(add_recipient(&mut list, "a@b").is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn test_roster_file_extensions() {
        assert!(is_roster_file(Path::new("cse.CSV")));
        assert!(is_roster_file(Path::new("/tmp/teachers.xlsx")));
        assert!(!is_roster_file(Path::new("notes.txt")));
        assert!(!is_roster_file(Path::new("noext")));
    }

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload(&["CSE", "B.Tech", "2nd", "A"], "s.csv").is_ok());
        assert!(validate_upload(&["CSE", "", "2nd", "A"], "s.csv").is_err());
        assert!(validate_upload(&["CSE"], "").is_err());
        assert!(validate_upload(&["CSE"], "s.pdf").is_err());
    }

    #[test]
    fn test_manual_entry_requires_key() {
        let err = validate_manual_entry("Employee ID", "", "Ravi").unwrap_err();
        assert_eq!(err.to_string(), "Employee ID is required");
        assert!(validate_manual_entry("Employee ID", "T1", "Ravi").is_ok());
    }
}
