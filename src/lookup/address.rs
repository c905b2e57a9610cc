//! Address records and the per-service payload mappings that produce them.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A postal address as reported by one of the lookup services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRecord {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state_code: String,
    pub zip_code: String,
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} - {} ({})",
            self.street, self.neighborhood, self.city, self.state_code, self.zip_code
        )
    }
}

/// Payload layout a service answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// BrasilAPI `cep/v1` layout (`street`, `neighborhood`, `city`, `state`, `cep`).
    /// ViaCEP field names are accepted as aliases.
    BrasilApi,
    /// ViaCEP layout (`logradouro`, `bairro`, `localidade`, `uf`, `cep`).
    ViaCep,
}

impl Schema {
    /// Decode a response body into an address record.
    ///
    /// Fields the service leaves `null` or omits decode as empty strings.
    /// ViaCEP's `{"erro": true}` answer for unknown CEPs is rejected.
    pub fn decode(self, body: &[u8]) -> Result<AddressRecord, serde_json::Error> {
        match self {
            Schema::BrasilApi => serde_json::from_slice::<BrasilApiPayload>(body).map(Into::into),
            Schema::ViaCep => {
                let payload: ViaCepPayload = serde_json::from_slice(body)?;
                if payload.erro.as_ref().is_some_and(is_truthy) {
                    return Err(de::Error::custom("CEP not found"));
                }
                Ok(payload.into())
            }
        }
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// ViaCEP has sent both `true` and `"true"` for its not-found flag.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[derive(Deserialize)]
struct BrasilApiPayload {
    #[serde(default, alias = "logradouro", deserialize_with = "nullable_string")]
    street: String,
    #[serde(default, alias = "bairro", deserialize_with = "nullable_string")]
    neighborhood: String,
    #[serde(default, alias = "localidade", deserialize_with = "nullable_string")]
    city: String,
    #[serde(default, alias = "uf", deserialize_with = "nullable_string")]
    state: String,
    #[serde(default, deserialize_with = "nullable_string")]
    cep: String,
}

impl From<BrasilApiPayload> for AddressRecord {
    fn from(p: BrasilApiPayload) -> Self {
        Self {
            street: p.street,
            neighborhood: p.neighborhood,
            city: p.city,
            state_code: p.state,
            zip_code: p.cep,
        }
    }
}

#[derive(Deserialize)]
struct ViaCepPayload {
    #[serde(default, deserialize_with = "nullable_string")]
    logradouro: String,
    #[serde(default, deserialize_with = "nullable_string")]
    bairro: String,
    #[serde(default, deserialize_with = "nullable_string")]
    localidade: String,
    #[serde(default, deserialize_with = "nullable_string")]
    uf: String,
    #[serde(default, deserialize_with = "nullable_string")]
    cep: String,
    #[serde(default)]
    erro: Option<Value>,
}

impl From<ViaCepPayload> for AddressRecord {
    fn from(p: ViaCepPayload) -> Self {
        Self {
            street: p.logradouro,
            neighborhood: p.bairro,
            city: p.localidade,
            state_code: p.uf,
            zip_code: p.cep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIACEP_BODY: &str = r#"{"cep":"01001-000","logradouro":"Praça da Sé","complemento":"lado ímpar","bairro":"Sé","localidade":"São Paulo","uf":"SP","ibge":"3550308"}"#;

    #[test]
    fn test_decode_viacep() {
        let address = Schema::ViaCep.decode(VIACEP_BODY.as_bytes()).unwrap();
        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.neighborhood, "Sé");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.state_code, "SP");
        assert_eq!(address.zip_code, "01001-000");
    }

    #[test]
    fn test_decode_brasilapi_native_fields() {
        let body = r#"{"cep":"01001000","state":"SP","city":"São Paulo","neighborhood":"Sé","street":"Praça da Sé","service":"open-cep"}"#;
        let address = Schema::BrasilApi.decode(body.as_bytes()).unwrap();
        assert_eq!(address.to_string(), "Praça da Sé, Sé, São Paulo - SP (01001000)");
    }

    #[test]
    fn test_decode_brasilapi_accepts_viacep_names() {
        let address = Schema::BrasilApi.decode(VIACEP_BODY.as_bytes()).unwrap();
        assert_eq!(
            address.to_string(),
            "Praça da Sé, Sé, São Paulo - SP (01001-000)"
        );
    }

    #[test]
    fn test_decode_viacep_not_found() {
        let err = Schema::ViaCep.decode(br#"{"erro": true}"#).unwrap_err();
        assert_eq!(err.to_string(), "CEP not found");
        let err = Schema::ViaCep.decode(br#"{"erro": "true"}"#).unwrap_err();
        assert_eq!(err.to_string(), "CEP not found");
    }

    #[test]
    fn test_decode_viacep_false_erro_flag() {
        let body = r#"{"cep":"01001-000","logradouro":"Praça da Sé","bairro":"Sé","localidade":"São Paulo","uf":"SP","erro":false}"#;
        assert!(Schema::ViaCep.decode(body.as_bytes()).is_ok());
    }

    #[test]
    fn test_decode_null_fields_as_empty() {
        let body = r#"{"cep":"13560000","state":"SP","city":"Sao Carlos","neighborhood":null,"street":null,"service":"viacep"}"#;
        let address = Schema::BrasilApi.decode(body.as_bytes()).unwrap();
        assert_eq!(address.street, "");
        assert_eq!(address.neighborhood, "");
        assert_eq!(address.to_string(), ", , Sao Carlos - SP (13560000)");
    }

    #[test]
    fn test_decode_absent_fields_as_empty() {
        let body = r#"{"cep":"13560-000","localidade":"Sao Carlos","uf":"SP"}"#;
        let address = Schema::ViaCep.decode(body.as_bytes()).unwrap();
        assert_eq!(address.to_string(), ", , Sao Carlos - SP (13560-000)");

        let address = Schema::BrasilApi.decode(b"{}").unwrap();
        assert_eq!(address.to_string(), ", ,  -  ()");
    }

    #[test]
    fn test_decode_malformed_body() {
        assert!(Schema::BrasilApi.decode(b"<html>502</html>").is_err());
        assert!(Schema::ViaCep.decode(b"").is_err());
    }

    #[test]
    fn test_schema_names() {
        let schema: Schema = serde_json::from_str(r#""viacep""#).unwrap();
        assert_eq!(schema, Schema::ViaCep);
        let schema: Schema = serde_json::from_str(r#""brasilapi""#).unwrap();
        assert_eq!(schema, Schema::BrasilApi);
    }
}
