use std::path::PathBuf;

use anyhow::Context;
use ini::{Ini, ParseOption};
use nimbus_domain::CredentialSet;
use nimbus_services::CredentialConfigInfra;
use tracing::{debug, warn};

const AWS_SECTION: &str = "aws";
const DEFAULT_SECTION: &str = "DEFAULT";

/// Reads the `[aws]` section of the local `config.ini`.
///
/// Key names match case-insensitively and values are taken verbatim: quotes
/// and backslashes are part of the value. Keys missing from `[aws]` are
/// looked up in `[DEFAULT]`, but the `[aws]` section itself must exist.
#[derive(Clone)]
pub struct NimbusCredentialsFile {
    path: PathBuf,
}

impl NimbusCredentialsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> anyhow::Result<Option<Ini>> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_file_opt(&self.path, options)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        Ok(Some(ini))
    }
}

fn lookup(ini: &Ini, key: &str) -> Option<String> {
    [AWS_SECTION, DEFAULT_SECTION].into_iter().find_map(|section| {
        ini.section(Some(section))?
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(key))
            .map(|(_, value)| value.trim().to_string())
    })
}

impl CredentialConfigInfra for NimbusCredentialsFile {
    fn resolve_local_credentials(&self) -> Option<CredentialSet> {
        let ini = match self.read() {
            Ok(Some(ini)) => ini,
            Ok(None) => {
                debug!(path = %self.path.display(), "No local credentials file");
                return None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = ?err, "Ignoring unreadable credentials file");
                return None;
            }
        };

        if ini.section(Some(AWS_SECTION)).is_none() {
            debug!(path = %self.path.display(), "Credentials file has no [aws] section");
            return None;
        }

        let credentials = CredentialSet::from_parts(
            lookup(&ini, "access_key_id"),
            lookup(&ini, "secret_access_key"),
            lookup(&ini, "region"),
        );
        if credentials.is_none() {
            debug!(path = %self.path.display(), "[aws] section lacks access_key_id or secret_access_key");
        }
        credentials
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use nimbus_domain::Region;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn fixture_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn resolve(content: &str) -> Option<CredentialSet> {
        let file = fixture_file(content);
        NimbusCredentialsFile::new(file.path()).resolve_local_credentials()
    }

    #[test]
    fn test_full_section() {
        let actual = resolve(
            "[aws]\naccess_key_id = AKIAEXAMPLE\nsecret_access_key = xyz\nregion = us-west-2\n",
        );
        let expected = Some(CredentialSet::new(
            "AKIAEXAMPLE",
            "xyz",
            Some(Region::new("us-west-2")),
        ));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_region_is_optional() {
        let actual = resolve("[aws]\naccess_key_id = AKIAEXAMPLE\nsecret_access_key = xyz\n");
        let expected = Some(CredentialSet::new("AKIAEXAMPLE", "xyz", None));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_key_names_ignore_case() {
        let actual = resolve("[aws]\nACCESS_KEY_ID = AKIA\nSecret_Access_Key = xyz\nRegion = eu-west-1\n");
        let expected = Some(CredentialSet::new("AKIA", "xyz", Some(Region::new("eu-west-1"))));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_values_are_verbatim() {
        let actual = resolve("[aws]\naccess_key_id = AKIA\nsecret_access_key = \"xy\\z\"\n");
        let expected = Some(CredentialSet::new("AKIA", "\"xy\\z\"", None));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_default_section_fills_missing_keys() {
        let actual = resolve(
            "[DEFAULT]\nregion = us-east-1\n\n[aws]\naccess_key_id = AKIA\nsecret_access_key = xyz\n",
        );
        let expected = Some(CredentialSet::new("AKIA", "xyz", Some(Region::new("us-east-1"))));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_aws_section_overrides_default() {
        let actual = resolve(
            "[DEFAULT]\nregion = us-east-1\n\n[aws]\naccess_key_id = AKIA\nsecret_access_key = xyz\nregion = ap-south-1\n",
        );
        let expected = Some(CredentialSet::new("AKIA", "xyz", Some(Region::new("ap-south-1"))));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_default_section_alone_is_not_enough() {
        let actual = resolve("[DEFAULT]\naccess_key_id = AKIA\nsecret_access_key = xyz\n");
        assert_eq!(actual, None);
    }

    #[test]
    fn test_missing_secret_key() {
        let actual = resolve("[aws]\naccess_key_id = AKIAEXAMPLE\nregion = us-west-2\n");
        assert_eq!(actual, None);
    }

    #[test]
    fn test_missing_section() {
        let actual = resolve("[other]\naccess_key_id = AKIAEXAMPLE\nsecret_access_key = xyz\n");
        assert_eq!(actual, None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let actual =
            NimbusCredentialsFile::new(dir.path().join("config.ini")).resolve_local_credentials();
        assert_eq!(actual, None);
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let actual = NimbusCredentialsFile::new(dir.path()).resolve_local_credentials();
        assert_eq!(actual, None);
    }
}
