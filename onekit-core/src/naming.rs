//! Conversions between the naming conventions used by generated node modules.
//!
//! Every conversion goes through the kebab form first, so `LedController`,
//! `led_controller` and `led-controller` all produce the same set of names.

use crate::error::NodeError;
use regex::Regex;
use std::sync::OnceLock;

fn title_word_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"))
}

fn lower_upper_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"))
}

/// `MyMotor`, `my_motor`, `myMotor` -> `my-motor`
pub fn to_kebab_case(name: &str) -> String {
    let split_titles = title_word_boundary().replace_all(name, "${1}-${2}");
    let split_underscores = split_titles.replace('_', "-");
    lower_upper_boundary()
        .replace_all(&split_underscores, "${1}-${2}")
        .to_lowercase()
}

/// `my-motor` -> `MyMotor`
pub fn to_pascal_case(name: &str) -> String {
    to_kebab_case(name).split('-').map(capitalize).collect()
}

/// `my-motor` -> `my_motor`
pub fn to_snake_case(name: &str) -> String {
    to_kebab_case(name).replace('-', "_")
}

/// `my-motor` -> `MY_MOTOR`
pub fn to_upper_snake_case(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check that `name` can be used as a module, class or topic name.
pub fn validate_name(name: &str) -> Result<(), NodeError> {
    if name.is_empty() {
        return Err(NodeError::invalid_name(name, "name must not be empty"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(NodeError::invalid_name(
            name,
            "only letters, digits, underscores and hyphens are allowed",
        ));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(NodeError::invalid_name(
            name,
            "name must not start with a digit",
        ));
    }

    Ok(())
}

/// All four spellings of one name, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSet {
    pub kebab: String,
    pub pascal: String,
    pub snake: String,
    pub upper_snake: String,
}

impl NameSet {
    pub fn new(name: &str) -> Self {
        Self {
            kebab: to_kebab_case(name),
            pascal: to_pascal_case(name),
            snake: to_snake_case(name),
            upper_snake: to_upper_snake_case(name),
        }
    }
}
