//! Location of acme.sh account state

use crate::{AcmeDirectoryUrl, CoreError, Result};
use std::path::{Path, PathBuf};

/// Directory acme.sh keeps its state in, relative to the install dir
pub const ACMESH_HOME: &str = ".acme.sh";

/// Path of the account-info file acme.sh keeps for `server`
///
/// acme.sh stores one account per CA under
/// `<install_dir>/.acme.sh/ca/<host>/<path>/account.json`, without the port.
///
/// # Errors
///
/// Returns [`CoreError::InvalidServer`] if the URL has no host.
pub fn account_info_path(install_dir: &Path, server: &AcmeDirectoryUrl) -> Result<PathBuf> {
    let url = server.to_url()?;
    let host = url
        .host_str()
        .ok_or_else(|| CoreError::invalid_server(server.as_str(), "URL has no host"))?;

    let mut path = install_dir.join(ACMESH_HOME).join("ca").join(host);
    for segment in url.path_segments().into_iter().flatten() {
        if !segment.is_empty() {
            path.push(segment);
        }
    }
    path.push("account.json");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve;

    #[test]
    fn test_account_info_path_drops_port() {
        let server = resolve("https://localhost:14000/dir").unwrap();
        let path = account_info_path(Path::new("/root"), &server).unwrap();
        assert_eq!(path, PathBuf::from("/root/.acme.sh/ca/localhost/dir/account.json"));
    }

    #[test]
    fn test_account_info_path_for_domain() {
        let server = resolve("https://localhost.com/dir").unwrap();
        let path = account_info_path(Path::new("/root"), &server).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/root/.acme.sh/ca/localhost.com/dir/account.json")
        );
    }

    #[test]
    fn test_account_info_path_for_keyword() {
        let server = resolve("zerossl").unwrap();
        let path = account_info_path(Path::new("/home/ubuntu"), &server).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/ubuntu/.acme.sh/ca/acme.zerossl.com/v2/DV90/account.json")
        );
    }
}
