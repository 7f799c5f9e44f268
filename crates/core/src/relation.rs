//! Payload published to units on the signed-certificates relation

use crate::{CertificateChain, Result};
use serde::{Deserialize, Serialize};

/// Unit that issued a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitForCertificateResponse {
    /// Unit name, e.g. "acmesh-operator/0"
    pub name: String,
    /// Address other units reach the issuing unit on
    pub ingress_address: String,
}

/// Response written to relation data once a certificate is issued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateCreatedResponse {
    /// Issued leaf certificate
    pub certificate: String,
    /// CSR the certificate was issued for
    pub certificate_signing_request: String,
    /// Issuer chain
    pub ca: String,
    /// Leaf followed by the issuer chain
    pub fullchain: String,
    pub issued_by: UnitForCertificateResponse,
}

impl CertificateCreatedResponse {
    /// Build the response from an issued chain
    pub fn from_chain(
        chain: &CertificateChain,
        certificate_signing_request: impl Into<String>,
        issued_by: UnitForCertificateResponse,
    ) -> Self {
        Self {
            certificate: chain.leaf().to_string(),
            certificate_signing_request: certificate_signing_request.into(),
            ca: chain.ca(),
            fullchain: chain.fullchain(),
            issued_by,
        }
    }

    /// Serialize to the JSON carried on the relation
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a response read back from relation data
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Serialization`] on invalid JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creation_response_format() {
        let unit = UnitForCertificateResponse {
            name: "Unit name".to_string(),
            ingress_address: "123.123.123.1".to_string(),
        };
        let response = CertificateCreatedResponse {
            certificate: "A certificate".to_string(),
            certificate_signing_request: "A csr".to_string(),
            ca: "A ca certificate".to_string(),
            fullchain: "Concatenated fullchain certificate".to_string(),
            issued_by: unit,
        };

        let expected = json!({
            "certificate": "A certificate",
            "certificate_signing_request": "A csr",
            "ca": "A ca certificate",
            "fullchain": "Concatenated fullchain certificate",
            "issued_by": {"name": "Unit name", "ingress_address": "123.123.123.1"},
        });

        let actual: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(
            CertificateCreatedResponse::from_json(&response.to_json().unwrap()).unwrap(),
            response
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"certificate": "c", "ca": "a", "fullchain": "f",
            "issued_by": {"name": "n", "ingress_address": "i"}}"#;
        assert!(CertificateCreatedResponse::from_json(json).is_err());
    }
}
