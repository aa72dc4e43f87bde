use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Environment prefix for run configuration overrides (e.g. `ALBUMCOPY_COUNT=10`).
const RUN_ENV_PREFIX: &str = "ALBUMCOPY_";

/// Everything about a run that isn't a credential.
///
/// The defaults reproduce the fixed behaviour of a bare invocation: upload
/// at most 5 new files into `VK backups`, and write the summary to
/// `VK_backups.json` in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Destination folder, relative to the destination storage root.
    pub folder: String,
    /// Upper bound on newly copied files (and on manifest entries visited).
    pub count: usize,
    /// Where the JSON summary gets written.
    pub output: PathBuf,
    /// Photo source API version sent with every request.
    pub api_version: String,
    /// Map every planned file to its own photo, instead of collapsing
    /// same-like-count photos onto the first one.
    pub map_each_entry: bool,
    pub templates: NameTemplates,
}

/// Optional overrides for the file name templates. `None` means the
/// library's built-in template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameTemplates {
    /// Template for a like-count shared by exactly one photo.
    pub single: Option<String>,
    /// Template for a like-count shared by several photos.
    pub multiple: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            folder: "VK backups".to_string(),
            count: 5,
            output: PathBuf::from("VK_backups.json"),
            api_version: "5.131".to_string(),
            map_each_entry: false,
            templates: NameTemplates::default(),
        }
    }
}

impl RunConfig {
    /// Layer defaults, an optional TOML file and `ALBUMCOPY_*` environment
    /// variables (nested keys use `__`, e.g. `ALBUMCOPY_TEMPLATES__SINGLE`).
    #[instrument(skip_all, fields(path = ?path.as_ref().map(|p| p.as_ref().display().to_string())))]
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        let source = match &path {
            Some(path) => {
                figment = figment.merge(Toml::file(path.as_ref()));
                path.as_ref().to_path_buf()
            },
            None => PathBuf::from("<defaults>"),
        };
        figment = figment.merge(Env::prefixed(RUN_ENV_PREFIX).split("__").ignore(&[
            "source_token",
            "source_user_id",
            "destination_token",
            "destination_user_id",
        ]));
        figment.extract().or_raise(|| ErrorKind::Invalid(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = RunConfig::load(None::<&Path>).unwrap();
            assert_eq!(config, RunConfig::default());
            assert_eq!(config.folder, "VK backups");
            assert_eq!(config.count, 5);
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "run.toml",
                r#"
                folder = "Holiday"
                count = 12
                [templates]
                multiple = "{{ likes }}-{{ date }}"
                "#,
            )?;
            let config = RunConfig::load(Some("run.toml")).unwrap();
            assert_eq!(config.folder, "Holiday");
            assert_eq!(config.count, 12);
            assert_eq!(config.output, PathBuf::from("VK_backups.json"));
            assert_eq!(config.templates.single, None);
            assert_eq!(config.templates.multiple.as_deref(), Some("{{ likes }}-{{ date }}"));
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("run.toml", "count = 12")?;
            jail.set_env("ALBUMCOPY_COUNT", "3");
            jail.set_env("ALBUMCOPY_MAP_EACH_ENTRY", "true");
            // Credential overrides share the prefix and must not leak in.
            jail.set_env("ALBUMCOPY_SOURCE_TOKEN", "secret");
            let config = RunConfig::load(Some("run.toml")).unwrap();
            assert_eq!(config.count, 3);
            assert!(config.map_each_entry);
            Ok(())
        });
    }

    #[rstest]
    #[case("count = \"many\"")]
    #[case("count = -1")]
    #[case("map_each_entry = \"sometimes\"")]
    #[case("folder = [\"a\", \"b\"]")]
    fn test_invalid_value(#[case] contents: &str) {
        Jail::expect_with(|jail| {
            jail.create_file("run.toml", contents)?;
            let err = RunConfig::load(Some("run.toml")).unwrap_err();
            assert!(matches!(&*err, ErrorKind::Invalid(_)));
            Ok(())
        });
    }
}
