//! Form rules for profile and address edits.
//!
//! The rules themselves are `validator` attributes on the model structs;
//! this module owns the patterns they reference and flattens the nested
//! `validator` report into one message per field.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use validator::{Validate, ValidationErrorsKind};

use crate::models::{Address, UpdateUserPayload};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|error| panic!("form pattern {pattern} failed to compile: {error}"))
}

/// `00000-000`
pub static ZIP_CODE: Lazy<Regex> = Lazy::new(|| compile(r"^\d{5}-\d{3}$"));

/// `(DD) DDDDD-DDDD`, anywhere in the input
pub static PHONE: Lazy<Regex> = Lazy::new(|| compile(r"\(\d{2}\) \d{5}-\d{4}"));

/// Field path -> first violated rule. Nested fields use `parent.field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct ValidationErrors(BTreeMap<String, String>);

fn render(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn collect(&mut self, prefix: &str, report: &validator::ValidationErrors) {
        for (field, kind) in report.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{}.{}", prefix, field)
            };

            match kind {
                ValidationErrorsKind::Field(errors) => {
                    if let Some(first) = errors.first() {
                        let message = first
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| first.code.to_string());
                        self.0.entry(path).or_insert(message);
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.collect(&path, nested),
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.collect(&format!("{}[{}]", path, index), nested);
                    }
                }
            }
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(report: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::default();
        errors.collect("", &report);
        errors
    }
}

pub fn is_valid_zip_code(zip: &str) -> bool {
    ZIP_CODE.is_match(zip)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

pub fn validate_address(address: &Address) -> Result<(), ValidationErrors> {
    address.validate().map_err(ValidationErrors::from)
}

/// Only the fields present in the payload are checked
pub fn validate_user_update(payload: &UpdateUserPayload) -> Result<(), ValidationErrors> {
    payload.validate().map_err(ValidationErrors::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            id: None,
            street: "Rua das Flores".into(),
            number: "123".into(),
            district: "Centro".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            zip_code: "01000-000".into(),
        }
    }

    #[test]
    fn zip_code_shape() {
        assert!(is_valid_zip_code("38114-512"));
        assert!(!is_valid_zip_code("38114512"));
        assert!(!is_valid_zip_code("3811-4512"));
        assert!(!is_valid_zip_code("38114-51a"));
        assert!(!is_valid_zip_code("38114-5120"));
    }

    #[test]
    fn phone_shape() {
        assert!(is_valid_phone("(34) 91234-5678"));
        assert!(is_valid_phone("+55 (34) 91234-5678"));
        assert!(!is_valid_phone("12312312311"));
        assert!(!is_valid_phone("(34) 1234-5678"));
    }

    #[test]
    fn valid_address_passes() {
        assert!(validate_address(&address()).is_ok());
    }

    #[test]
    fn address_reports_each_field_once() {
        let mut bad = address();
        bad.street = "R".into();
        bad.state = "Minas Gerais".into();
        bad.zip_code = "38114512".into();
        let errors = validate_address(&bad).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("state"), Some("O estado deve ter 2 letras (Ex: SP)"));
        assert_eq!(errors.get("street"), Some("A rua deve ter entre 3 e 50 caracteres"));
        assert_eq!(errors.get("zip_code"), Some("CEP inválido, use o formato 00000-000"));
    }

    #[test]
    fn user_update_checks_only_present_fields() {
        let payload = UpdateUserPayload {
            id: 2,
            phone: Some("(34) 99999-0000".into()),
            ..Default::default()
        };
        assert!(validate_user_update(&payload).is_ok());

        let payload = UpdateUserPayload {
            id: 2,
            password: Some("short".into()),
            address: Some(Address { city: "BH".into(), ..address() }),
            ..Default::default()
        };
        let errors = validate_user_update(&payload).unwrap_err();
        assert!(errors.get("password").is_some());
        assert_eq!(errors.get("address.city"), Some("A cidade deve ter entre 3 e 50 caracteres"));
        assert!(errors.to_string().contains("password: "));
    }

    #[test]
    fn malformed_email_and_missing_id_are_reported() {
        let payload = UpdateUserPayload {
            id: 0,
            email: Some("mara@".into()),
            ..Default::default()
        };
        let errors = validate_user_update(&payload).unwrap_err();
        assert_eq!(errors.get("id"), Some("O id é obrigatório"));
        assert_eq!(errors.get("email"), Some("E-mail inválido"));
    }
}
