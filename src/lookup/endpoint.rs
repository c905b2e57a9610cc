//! Lookup service endpoints.

use serde::{Deserialize, Serialize};

use super::address::Schema;

/// Placeholder substituted with the looked-up CEP in URL templates.
pub const CEP_PLACEHOLDER: &str = "{cep}";

pub const BRASIL_API_TEMPLATE: &str = "https://brasilapi.com.br/api/cep/v1/{cep}";
pub const VIA_CEP_TEMPLATE: &str = "http://viacep.com.br/ws/{cep}/json/";

/// A lookup service taking part in a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Name used in outcome messages.
    pub label: String,
    /// URL with a `{cep}` placeholder.
    pub url_template: String,
    /// How the service's response body maps onto an address.
    pub schema: Schema,
}

impl Endpoint {
    pub fn new(label: impl Into<String>, url_template: impl Into<String>, schema: Schema) -> Self {
        Self {
            label: label.into(),
            url_template: url_template.into(),
            schema,
        }
    }

    pub fn brasil_api() -> Self {
        Self::new("BrasilAPI", BRASIL_API_TEMPLATE, Schema::BrasilApi)
    }

    pub fn via_cep() -> Self {
        Self::new("ViaCEP", VIA_CEP_TEMPLATE, Schema::ViaCep)
    }

    /// The two public services raced by default.
    pub fn defaults() -> Vec<Self> {
        vec![Self::brasil_api(), Self::via_cep()]
    }

    /// Check whether the template carries the CEP placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.url_template.contains(CEP_PLACEHOLDER)
    }

    /// Build the request URL for a CEP.
    pub fn url_for(&self, cep: &str) -> String {
        self.url_template
            .replace(CEP_PLACEHOLDER, &urlencoding::encode(cep))
    }
}
