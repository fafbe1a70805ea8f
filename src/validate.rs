//! Field validators for request input
//!
//! Each validator is an independent guard returning a [`FieldCheck`]
//! instead of an error. Callers that surface several messages together
//! collect them with [`FieldErrors`].

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimum number of digits in a phone number
pub const MIN_PHONE_DIGITS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9()\-]+$").expect("valid phone regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):(?P<rest>\S+)$").expect("valid url regex")
});

/// Schemes that need an authority (`//host`) after the colon
const HIERARCHICAL_SCHEMES: [&str; 5] = ["http", "https", "ftp", "ws", "wss"];

/// Outcome of one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheck {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldCheck {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

/// Fails when the value is absent or blank
pub fn required(value: Option<&str>, field: &str) -> FieldCheck {
    if is_blank(value) {
        FieldCheck::fail(format!("{} is required", field))
    } else {
        FieldCheck::ok()
    }
}

/// Fails unless the value looks like `local@domain.tld`
pub fn email(value: Option<&str>) -> FieldCheck {
    match value.map(str::trim) {
        None | Some("") => FieldCheck::fail("Email is required"),
        Some(v) if EMAIL_RE.is_match(v) => FieldCheck::ok(),
        Some(_) => FieldCheck::fail("Please enter a valid email address"),
    }
}

/// Fails when absent or shorter than [`MIN_PASSWORD_LEN`] characters
pub fn password(value: Option<&str>) -> FieldCheck {
    match value {
        None | Some("") => FieldCheck::fail("Password is required"),
        Some(v) if v.chars().count() < MIN_PASSWORD_LEN => FieldCheck::fail(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )),
        Some(_) => FieldCheck::ok(),
    }
}

/// Fails unless the value is an absolute URL
pub fn url(value: Option<&str>) -> FieldCheck {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return FieldCheck::fail("URL is required");
    };

    let Some(caps) = URL_RE.captures(v) else {
        return FieldCheck::fail("Please enter a valid URL");
    };

    let scheme = caps["scheme"].to_ascii_lowercase();
    if HIERARCHICAL_SCHEMES.contains(&scheme.as_str()) {
        let host = caps["rest"]
            .strip_prefix("//")
            .and_then(|r| r.split(['/', '?', '#']).next())
            .unwrap_or("");
        if host.is_empty() {
            return FieldCheck::fail("Please enter a valid URL");
        }
    }
    FieldCheck::ok()
}

/// Fails unless the value (whitespace removed) is a phone number with
/// an optional leading `+` and at least [`MIN_PHONE_DIGITS`] digits
pub fn phone(value: Option<&str>) -> FieldCheck {
    let compact: String = value
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return FieldCheck::fail("Phone number is required");
    }

    let digits = compact.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(&compact) && digits >= MIN_PHONE_DIGITS {
        FieldCheck::ok()
    } else {
        FieldCheck::fail("Please enter a valid phone number")
    }
}

/// Fails listing every field of `record` that is missing, null or blank
pub fn required_fields(record: &serde_json::Value, fields: &[&str]) -> FieldCheck {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| match record.get(field) {
            None | Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .collect();

    if missing.is_empty() {
        FieldCheck::ok()
    } else {
        FieldCheck::fail(format!("Missing required fields: {}", missing.join(", ")))
    }
}

/// Validator selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Required,
    Email,
    Password,
    Url,
    Phone,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Required => "required",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Url => "url",
            FieldKind::Phone => "phone",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "required" => Ok(FieldKind::Required),
            "email" => Ok(FieldKind::Email),
            "password" => Ok(FieldKind::Password),
            "url" => Ok(FieldKind::Url),
            "phone" => Ok(FieldKind::Phone),
            other => Err(format!(
                "Unknown validator: {}. Use required, email, password, url or phone.",
                other
            )
            .into()),
        }
    }
}

/// Run the validator named by `kind`
pub fn check_field(kind: FieldKind, value: Option<&str>) -> FieldCheck {
    match kind {
        FieldKind::Required => required(value, "Value"),
        FieldKind::Email => email(value),
        FieldKind::Password => password(value),
        FieldKind::Url => url(value),
        FieldKind::Phone => phone(value),
    }
}

/// Failed checks keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `check` under `field` if it failed; the first failure per field is kept
    pub fn check(&mut self, field: &str, check: FieldCheck) -> &mut Self {
        if !check.is_valid {
            let message = check
                .error
                .unwrap_or_else(|| format!("{} is invalid", field));
            self.errors.entry(field.to_string()).or_insert(message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> std::result::Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}
