use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::validation::{PHONE, ZIP_CODE};

/// Access role carried in the session token and on user records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Client => "CLIENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "CLIENT" => Ok(Role::Client),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[validate(length(min = 3, max = 50, message = "A rua deve ter entre 3 e 50 caracteres"))]
    pub street: String,
    #[validate(length(min = 1, max = 8, message = "O número deve ter entre 1 e 8 caracteres"))]
    pub number: String,
    #[validate(length(min = 3, max = 50, message = "O bairro deve ter entre 3 e 50 caracteres"))]
    pub district: String,
    #[validate(length(min = 3, max = 50, message = "A cidade deve ter entre 3 e 50 caracteres"))]
    pub city: String,
    #[validate(length(equal = 2, message = "O estado deve ter 2 letras (Ex: SP)"))]
    pub state: String,
    #[validate(regex(path = *ZIP_CODE, message = "CEP inválido, use o formato 00000-000"))]
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `PUT /users/{id}`; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(range(min = 1, message = "O id é obrigatório"))]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "O nome deve ter entre 1 e 50 caracteres"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "E-mail inválido"),
        length(max = 50, message = "O email não pode ter mais de 50 caracteres")
    )]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE, message = "Celular inválido, siga o formato (XX) XXXXX-XXXX"))]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, max = 50, message = "A senha deve ter entre 8 e 50 caracteres"))]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub address: Option<Address>,
}

/// Free-text filter matched server-side against name, email or phone
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsersFilter {
    #[serde(default)]
    pub query: Option<String>,
}
