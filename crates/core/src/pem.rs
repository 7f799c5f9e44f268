//! PEM certificate bundle handling
//!
//! acme.sh writes the issued certificate and its issuer chain as one
//! concatenated PEM file. [`split`] breaks such a bundle into individual
//! blocks and [`CertificateChain`] exposes the leaf, CA and fullchain views
//! published to related units.

use crate::{CoreError, Result};
use rustls::pki_types::{CertificateDer, pem::PemObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

pub const BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";
pub const END_MARKER: &str = "-----END CERTIFICATE-----";

/// A single PEM certificate block, delimiter lines included
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PemCertificate(String);

impl PemCertificate {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the block into DER
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedPem`] when the body is not valid base64.
    pub fn to_der(&self) -> Result<CertificateDer<'static>> {
        CertificateDer::from_pem_slice(self.0.as_bytes())
            .map_err(|e| CoreError::malformed_pem(format!("cannot decode certificate: {e:?}")))
    }
}

impl fmt::Display for PemCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PemCertificate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a PEM bundle into its certificate blocks, in order
///
/// Text outside blocks, including the newlines between them, is dropped.
/// A bundle without any markers yields an empty list.
///
/// # Errors
///
/// Returns [`CoreError::MalformedPem`] when markers are unbalanced: an end
/// marker without an open block, a begin marker inside an open block, or a
/// block that is never closed.
pub fn split(bundle: &str) -> Result<Vec<PemCertificate>> {
    let mut certificates = Vec::new();
    let mut rest = bundle;

    loop {
        let Some(begin) = rest.find(BEGIN_MARKER) else {
            if rest.contains(END_MARKER) {
                return Err(CoreError::malformed_pem(
                    "end marker without matching begin marker",
                ));
            }
            break;
        };

        if rest[..begin].contains(END_MARKER) {
            return Err(CoreError::malformed_pem(
                "end marker without matching begin marker",
            ));
        }

        let body_start = begin + BEGIN_MARKER.len();
        let Some(body_len) = rest[body_start..].find(END_MARKER) else {
            return Err(CoreError::malformed_pem(format!(
                "certificate {} is not terminated",
                certificates.len() + 1
            )));
        };

        if rest[body_start..body_start + body_len].contains(BEGIN_MARKER) {
            return Err(CoreError::malformed_pem(format!(
                "certificate {} opens a new block before closing",
                certificates.len() + 1
            )));
        }

        let end = body_start + body_len + END_MARKER.len();
        certificates.push(PemCertificate(rest[begin..end].to_string()));
        rest = &rest[end..];
    }

    debug!("Split PEM bundle into {} certificate(s)", certificates.len());
    Ok(certificates)
}

/// Issued certificate followed by its issuer chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certificates: Vec<PemCertificate>,
}

impl CertificateChain {
    /// Build a chain from a PEM bundle as written by acme.sh
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedPem`] if the bundle is malformed or holds
    /// no certificate.
    pub fn from_pem(bundle: &str) -> Result<Self> {
        let certificates = split(bundle)?;
        if certificates.is_empty() {
            return Err(CoreError::malformed_pem("bundle contains no certificates"));
        }
        Ok(Self { certificates })
    }

    /// Read a chain from a PEM file, e.g. acme.sh's `fullchain.cer`
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] if the file cannot be read and
    /// [`CoreError::MalformedPem`] if its content is not a chain.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bundle = std::fs::read_to_string(path)?;
        debug!("Read certificate chain from {}", path.display());
        Self::from_pem(&bundle)
    }

    /// The issued (end-entity) certificate
    pub fn leaf(&self) -> &PemCertificate {
        &self.certificates[0]
    }

    /// Issuer certificates following the leaf
    pub fn issuers(&self) -> &[PemCertificate] {
        &self.certificates[1..]
    }

    /// Issuer chain as one PEM string, empty when only the leaf is present
    pub fn ca(&self) -> String {
        join(self.issuers())
    }

    /// Leaf and issuers concatenated in order
    pub fn fullchain(&self) -> String {
        join(&self.certificates)
    }

    pub fn certificates(&self) -> &[PemCertificate] {
        &self.certificates
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Decode every certificate into DER, leaf first
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedPem`] on the first undecodable block.
    pub fn to_der(&self) -> Result<Vec<CertificateDer<'static>>> {
        self.certificates.iter().map(PemCertificate::to_der).collect()
    }
}

fn join(certificates: &[PemCertificate]) -> String {
    certificates.iter().fold(String::new(), |mut out, cert| {
        out.push_str(cert.as_str());
        out.push('\n');
        out
    })
}
