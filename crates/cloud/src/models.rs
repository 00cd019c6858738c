//! Response models of the SGIS OpenAPI.
//!
//! Every endpoint wraps its payload as `{"errCd": .., "errMsg": .., "result": ..}`.
//! Numeric fields arrive as strings or numbers depending on the endpoint.

use hotspot_core::vector::value_as_f64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CloudError, Result};

/// Common response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(rename = "errCd", default)]
    pub err_cd: Option<Value>,
    #[serde(rename = "errMsg", default)]
    pub err_msg: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Service status code, `None` when absent.
    pub fn error_code(&self) -> Option<i64> {
        self.err_cd.as_ref().and_then(status_code)
    }

    /// The payload, or the service error the envelope reports.
    pub fn into_result(self) -> Result<T> {
        if let Some(code) = self.error_code().filter(|&c| c != 0) {
            return Err(CloudError::Api {
                code,
                message: self.err_msg.unwrap_or_default(),
            });
        }
        self.result
            .ok_or_else(|| CloudError::Parse("response has no result".into()))
    }
}

/// Read an `errCd` value given as number or numeric string.
pub(crate) fn status_code(value: &Value) -> Option<i64> {
    value_as_f64(value).map(|v| v as i64)
}

/// Payload of `auth/authentication.json`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResult {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "accessTimeout", default)]
    pub access_timeout: Option<Value>,
}

/// One row of `stats/population.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationItem {
    pub adm_cd: String,
    #[serde(default)]
    pub adm_nm: String,
    /// Total population
    #[serde(default)]
    pub tot_ppltn: Option<Value>,
    /// Population density (persons per km²)
    #[serde(default)]
    pub ppltn_dnsty: Option<Value>,
    /// Remaining attributes (households, age structure, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PopulationItem {
    /// Total population; missing or empty counts as zero.
    pub fn population(&self) -> f64 {
        self.tot_ppltn.as_ref().and_then(value_as_f64).unwrap_or(0.0)
    }

    /// Population density; missing or empty counts as zero.
    pub fn density(&self) -> f64 {
        self.ppltn_dnsty.as_ref().and_then(value_as_f64).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_envelope() {
        let json = r#"{"id":"API_0302","result":[
            {"adm_cd":"11010","adm_nm":"종로구","tot_ppltn":"141223","ppltn_dnsty":"5885.2","avg_age":"45.1"},
            {"adm_cd":"11020","adm_nm":"중구","tot_ppltn":121312,"ppltn_dnsty":""}
        ],"errMsg":"Success","errCd":0,"trId":"x"}"#;
        let env: ApiEnvelope<Vec<PopulationItem>> = serde_json::from_str(json).unwrap();
        assert_eq!(env.error_code(), Some(0));
        let items = env.into_result().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].population(), 141223.0);
        assert_eq!(items[0].density(), 5885.2);
        assert_eq!(items[1].population(), 121312.0);
        assert_eq!(items[1].density(), 0.0);
        assert!(items[0].extra.contains_key("avg_age"));
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"errMsg":"Invalid token","errCd":-401}"#;
        let env: ApiEnvelope<Vec<PopulationItem>> = serde_json::from_str(json).unwrap();
        match env.into_result() {
            Err(CloudError::Api { code, message }) => {
                assert_eq!(code, -401);
                assert_eq!(message, "Invalid token");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_string_status_code() {
        let json = r#"{"errCd":"-100","errMsg":"검색결과가 존재하지 않습니다"}"#;
        let env: ApiEnvelope<AuthResult> = serde_json::from_str(json).unwrap();
        assert_eq!(env.error_code(), Some(-100));
        assert!(env.into_result().is_err());
    }

    #[test]
    fn test_auth_result() {
        let json = r#"{"result":{"accessToken":"tok-1","accessTimeout":"1700000000000"},"errCd":0}"#;
        let env: ApiEnvelope<AuthResult> = serde_json::from_str(json).unwrap();
        assert_eq!(env.into_result().unwrap().access_token, "tok-1");
    }
}
