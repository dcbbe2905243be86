//! Address auto-fill from a Brazilian postal code (CEP) via ViaCEP.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::client::ClientError;
use crate::models::Address;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViaCepResponse {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
}

impl ViaCepResponse {
    /// Fill an address form; the house number is never known to ViaCEP
    pub fn into_address(self, number: impl Into<String>) -> Address {
        let zip_code = normalize_cep(&self.cep)
            .map(|digits| format_cep(&digits))
            .unwrap_or(self.cep);

        Address {
            id: None,
            street: self.logradouro,
            number: number.into(),
            district: self.bairro,
            city: self.localidade,
            state: self.uf,
            zip_code,
        }
    }
}

/// Strip punctuation; `Some` only for exactly eight digits
pub fn normalize_cep(input: &str) -> Option<String> {
    let digits: String = input
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .collect();

    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// `38400000` -> `38400-000`
pub fn format_cep(digits: &str) -> String {
    if digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CepClient {
    http: reqwest::Client,
    base_url: String,
}

impl CepClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET {base}/{cep}/json/
    ///
    /// Lookups for anything other than eight digits are refused without a request.
    pub async fn lookup(&self, cep: &str) -> Result<ViaCepResponse, ClientError> {
        let digits = normalize_cep(cep)
            .ok_or_else(|| ClientError::InvalidInput(format!("CEP inválido: {}", cep)))?;

        let url = Url::parse(&format!("{}/{}/json/", self.base_url, digits))?;
        let response = crate::client::check(self.http.get(url).send().await?).await?;
        let body: Value = response.json().await?;

        // ViaCEP answers unknown codes with 200 and `{"erro": true}` (or "true").
        let not_found = match body.get("erro") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag == "true",
            _ => false,
        };
        if not_found {
            return Err(ClientError::NotFound(format!("CEP {}", digits)));
        }

        serde_json::from_value(body).map_err(|e| {
            tracing::warn!("Unexpected ViaCEP payload: {}", e);
            ClientError::InvalidInput(format!("CEP {}", digits))
        })
    }
}
