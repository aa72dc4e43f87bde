use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::error::Kind as FigmentKind;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Deserializer};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use tracing::instrument;

/// Environment prefix for overriding the photo source credentials.
pub const SOURCE_ENV_PREFIX: &str = "ALBUMCOPY_SOURCE_";
/// Environment prefix for overriding the destination credentials.
pub const DESTINATION_ENV_PREFIX: &str = "ALBUMCOPY_DESTINATION_";

/// Table inside each credential file that holds the keys.
const SECTION: &str = "TOKEN";

/// An opaque access token plus the account identifier it belongs to.
///
/// Tokens are pre-obtained; no authentication flow happens here.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(deserialize_with = "string_or_number")]
    pub token: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { token: token.into(), user_id: user_id.into() }
    }

    /// Load credentials from the `[TOKEN]` table of a TOML file, with
    /// `{env_prefix}TOKEN` and `{env_prefix}USER_ID` taking precedence.
    ///
    /// A missing file is not an error by itself (the environment may supply
    /// everything), but a key missing from both sources is.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, env_prefix: &str) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::from(Toml::file(path))
            .focus(SECTION)
            .merge(Env::prefixed(env_prefix).only(&["token", "user_id"]));
        match figment.extract() {
            Ok(credentials) => Ok(credentials),
            Err(e) => {
                let kind = match &e.kind {
                    FigmentKind::MissingField(field) => ErrorKind::Missing(path.to_path_buf(), field.to_string()),
                    _ => ErrorKind::Invalid(path.to_path_buf()),
                };
                Err(e).or_raise(|| kind)
            },
        }
    }
}

// Never print the token.
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials").field("token", &"********").field("user_id", &self.user_id).finish()
    }
}

/// Account identifiers are numeric on most services, and both TOML and the
/// environment provider will happily hand us an integer. Accept either.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[rstest]
    #[case("user_id = \"42\"", "42")]
    #[case("user_id = 123456", "123456")]
    #[case("user_id = -7", "-7")]
    fn test_loads_token_section(#[case] user_id: &str, #[case] expected: &str) {
        let file = write_config(&format!("[TOKEN]\ntoken = \"abc\"\n{user_id}\n"));
        let creds = Credentials::load(file.path(), "ALBUMCOPY_TEST_NOPE_").unwrap();
        assert_eq!(creds, Credentials::new("abc", expected));
    }

    #[test]
    fn test_missing_key() {
        let file = write_config("[TOKEN]\ntoken = \"abc\"\n");
        let err = Credentials::load(file.path(), "ALBUMCOPY_TEST_NOPE_").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Missing(_, field) if field == "user_id"));
    }

    #[test]
    fn test_keys_outside_section_are_ignored() {
        let file = write_config("token = \"abc\"\nuser_id = \"42\"\n");
        assert!(Credentials::load(file.path(), "ALBUMCOPY_TEST_NOPE_").is_err());
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config("[TOKEN\ntoken = ");
        let err = Credentials::load(file.path(), "ALBUMCOPY_TEST_NOPE_").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("vk.toml", "[TOKEN]\ntoken = \"from-file\"\nuser_id = \"1\"\n")?;
            jail.set_env("ALBUMCOPY_SOURCE_TOKEN", "from-env");
            let creds = Credentials::load("vk.toml", SOURCE_ENV_PREFIX).unwrap();
            assert_eq!(creds.token, "from-env");
            assert_eq!(creds.user_id, "1");
            Ok(())
        });
    }

    #[test]
    fn test_environment_only() {
        Jail::expect_with(|jail| {
            jail.set_env("ALBUMCOPY_DESTINATION_TOKEN", "OAuth xyz");
            jail.set_env("ALBUMCOPY_DESTINATION_USER_ID", "7");
            let creds = Credentials::load("does-not-exist.toml", DESTINATION_ENV_PREFIX).unwrap();
            assert_eq!(creds, Credentials::new("OAuth xyz", "7"));
            Ok(())
        });
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("secret", "1");
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
