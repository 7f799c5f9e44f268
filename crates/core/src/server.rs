//! ACME server resolution
//!
//! Operators configure the ACME server either with a shorthand keyword
//! understood by acme.sh (`letsencrypt`, `zerossl`, ...) or with the full URL
//! of an ACME directory. Both forms resolve to an [`AcmeDirectoryUrl`].

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use url::Url;

/// Final path segment required on user-supplied directory URLs
pub const DIRECTORY_SEGMENT: &str = "dir";

const HTTPS_PREFIX: &str = "https://";

/// Shorthand keywords and the ACME directory each one stands for
pub const KNOWN_SERVERS: &[(&str, &str)] = &[
    (
        "letsencrypt",
        "https://acme-v02.api.letsencrypt.org/directory",
    ),
    (
        "letsencrypt_test",
        "https://acme-staging-v02.api.letsencrypt.org/directory",
    ),
    ("zerossl", "https://acme.zerossl.com/v2/DV90"),
    ("buypass", "https://api.buypass.com/acme/directory"),
    ("buypass_test", "https://api.test4.buypass.no/acme/directory"),
    ("sslcom", "https://acme.ssl.com/sslcom-dv-rsa"),
    ("google", "https://dv.acme-v02.api.pki.goog/directory"),
    (
        "googletest",
        "https://dv.acme-v02.test-api.pki.goog/directory",
    ),
];

/// Canonical ACME directory URL, always `https`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcmeDirectoryUrl(String);

impl AcmeDirectoryUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parsed form of the URL
    ///
    /// Resolution already parsed the value, so this only fails if the
    /// instance was built by deserializing untrusted input.
    pub fn to_url(&self) -> Result<Url> {
        Url::parse(&self.0).map_err(|e| CoreError::invalid_server(&self.0, e.to_string()))
    }
}

impl fmt::Display for AcmeDirectoryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AcmeDirectoryUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Look up a shorthand keyword, exact and case-sensitive
pub fn lookup_keyword(keyword: &str) -> Option<&'static str> {
    KNOWN_SERVERS
        .iter()
        .find(|(name, _)| *name == keyword)
        .map(|(_, url)| *url)
}

/// Resolve a server identifier to its ACME directory URL
///
/// Keywords map through [`KNOWN_SERVERS`]. Anything else must be an `https`
/// URL with a host whose last path segment is [`DIRECTORY_SEGMENT`], and is
/// returned unchanged.
///
/// # Errors
///
/// Returns [`CoreError::InvalidServer`] for empty input, a scheme other than
/// `https`, an unparsable URL, or a path not ending in the directory segment.
pub fn resolve(identifier: &str) -> Result<AcmeDirectoryUrl> {
    if let Some(url) = lookup_keyword(identifier) {
        debug!("Resolved ACME server keyword {} to {}", identifier, url);
        return Ok(AcmeDirectoryUrl(url.to_string()));
    }

    if identifier.trim().is_empty() {
        return Err(CoreError::invalid_server(identifier, "server cannot be empty"));
    }

    if identifier.trim() != identifier {
        return Err(CoreError::invalid_server(
            identifier,
            "server must not contain leading or trailing whitespace",
        ));
    }

    if !identifier.starts_with(HTTPS_PREFIX) {
        return Err(CoreError::invalid_server(
            identifier,
            "server must be a known keyword or an https:// URL",
        ));
    }

    let url = Url::parse(identifier)
        .map_err(|e| CoreError::invalid_server(identifier, format!("invalid URL - {e}")))?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::invalid_server(identifier, "URL has no host"));
    }

    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    if last_segment != DIRECTORY_SEGMENT {
        return Err(CoreError::invalid_server(
            identifier,
            format!("URL path must end with /{DIRECTORY_SEGMENT}"),
        ));
    }

    debug!("Accepted ACME directory URL {}", identifier);
    Ok(AcmeDirectoryUrl(identifier.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(identifier: &str) {
        match resolve(identifier) {
            Err(CoreError::InvalidServer { server, .. }) => assert_eq!(server, identifier),
            other => panic!("expected InvalidServer for {identifier:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_keyword_resolution() {
        let server = resolve("zerossl").unwrap();
        assert_eq!(server.as_str(), "https://acme.zerossl.com/v2/DV90");

        let server = resolve("letsencrypt").unwrap();
        assert_eq!(
            server.as_str(),
            "https://acme-v02.api.letsencrypt.org/directory"
        );
    }

    #[test]
    fn test_every_keyword_resolves_to_its_directory() {
        let expected = [
            ("letsencrypt", "https://acme-v02.api.letsencrypt.org/directory"),
            (
                "letsencrypt_test",
                "https://acme-staging-v02.api.letsencrypt.org/directory",
            ),
            ("zerossl", "https://acme.zerossl.com/v2/DV90"),
            ("buypass", "https://api.buypass.com/acme/directory"),
            ("buypass_test", "https://api.test4.buypass.no/acme/directory"),
            ("sslcom", "https://acme.ssl.com/sslcom-dv-rsa"),
            ("google", "https://dv.acme-v02.api.pki.goog/directory"),
            ("googletest", "https://dv.acme-v02.test-api.pki.goog/directory"),
        ];
        assert_eq!(KNOWN_SERVERS.len(), expected.len());

        for (keyword, url) in expected {
            let server = resolve(keyword).unwrap();
            assert_eq!(server.as_str(), url, "{keyword}");
            assert!(server.to_url().is_ok(), "{keyword}");
        }
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_invalid("ZeroSSL");
        assert_invalid("LETSENCRYPT");
    }

    #[test]
    fn test_empty_and_blank_rejected() {
        assert_invalid("");
        assert_invalid("   ");
        assert_invalid("\n");
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        assert_invalid("http:/url");
        assert_invalid("http://acme.com/dir");
        assert_invalid("some://invalid/server");
        assert_invalid("ftp://acme.com/dir");
        assert_invalid("HTTPS://acme.com/dir");
    }

    #[test]
    fn test_directory_segment_required() {
        assert_invalid("https://acme.com");
        assert_invalid("https://acme.com/");
        assert_invalid("https://acme.com/dir/");
        assert_invalid("https://acme.com/directory");
        assert_invalid("https://acme.com/dir/extra");
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        assert_invalid(" https://acme.com/dir");
        assert_invalid("https://acme.com/dir ");
        assert_invalid(" zerossl");
    }

    #[test]
    fn test_valid_url_returned_unchanged() {
        let valid = "https://acme.com/dir";
        assert_eq!(resolve(valid).unwrap().as_str(), valid);

        let pebble = "https://localhost:14000/dir";
        assert_eq!(resolve(pebble).unwrap().into_string(), pebble);

        let nested = "https://ca.internal.example/acme/v1/dir";
        assert_eq!(resolve(nested).unwrap().to_string(), nested);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let server = resolve("https://acme.com/dir").unwrap();
        assert_eq!(
            serde_json::to_string(&server).unwrap(),
            "\"https://acme.com/dir\""
        );
    }
}
