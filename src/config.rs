//! Harness settings sourced from `TEST_*` environment variables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::compute::gcloud;
use crate::error::HarnessError;
use crate::scenarios::ScenarioContext;
use crate::terraform::DEFAULT_TF_COMMAND;

pub const PREFIX_ENV: &str = "TEST_PREFIX";
pub const PROJECT_ENV: &str = "TEST_GOOGLE_CLOUD_PROJECT";
pub const FALLBACK_PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
pub const LABELS_ENV: &str = "TEST_GOOGLE_LABELS";
pub const TF_COMMAND_ENV: &str = "TEST_TF_COMMAND";
pub const SKIP_DESTROY_ENV: &str = "TEST_SKIP_DESTROY_PHASE";
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

pub const DEFAULT_PREFIX: &str = "mrpn";

const TRUTHY: [&str; 5] = ["true", "t", "yes", "y", "1"];
const FIXTURE_FILES: [&str; 3] = ["main.tf", "outputs.tf", "variables.tf"];

/// Unparsed settings, as read from the environment or the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSettings {
    pub prefix: Option<String>,
    pub project: Option<String>,
    pub labels: Option<String>,
    pub tf_command: Option<String>,
    pub skip_destroy: Option<String>,
}

impl RawSettings {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            prefix: lookup(PREFIX_ENV),
            project: lookup(PROJECT_ENV),
            labels: lookup(LABELS_ENV),
            tf_command: lookup(TF_COMMAND_ENV),
            skip_destroy: lookup(SKIP_DESTROY_ENV),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub prefix: String,
    pub project_id: String,
    pub labels: BTreeMap<String, String>,
    pub tf_command: String,
    pub skip_destroy: bool,
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, HarnessError> {
        let lookup = |key: &str| std::env::var(key).ok();
        Self::resolve(RawSettings::from_lookup(lookup), lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        Self::resolve(RawSettings::from_lookup(&lookup), &lookup)
    }

    /// Applies defaults and parsing rules. `lookup` supplies the secondary
    /// variables used to find a project when none was given.
    pub fn resolve(
        raw: RawSettings,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, HarnessError> {
        let prefix = non_empty(raw.prefix).unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let explicit_project =
            non_empty(raw.project).or_else(|| non_empty(lookup(FALLBACK_PROJECT_ENV)));
        let project_id = resolve_project_id(explicit_project, &lookup)?;
        let labels = parse_labels(raw.labels.as_deref().unwrap_or_default())?;
        let tf_command =
            non_empty(raw.tf_command).unwrap_or_else(|| DEFAULT_TF_COMMAND.to_string());
        let skip_destroy = raw.skip_destroy.as_deref().is_some_and(is_truthy);

        debug!(
            prefix = %prefix,
            project = %project_id,
            labels = labels.len(),
            tf_command = %tf_command,
            skip_destroy,
            "resolved harness configuration"
        );

        Ok(Self {
            prefix,
            project_id,
            labels,
            tf_command,
            skip_destroy,
        })
    }

    pub fn scenario_context(&self) -> ScenarioContext {
        ScenarioContext {
            project_id: self.project_id.clone(),
            prefix: self.prefix.clone(),
            labels: self.labels.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses `key:value,key:value`. Blank input yields no labels.
pub fn parse_labels(raw: &str) -> Result<BTreeMap<String, String>, HarnessError> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            pair.split_once(':')
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| {
                    HarnessError::Config(format!(
                        "{}: expected key:value, got '{}'",
                        LABELS_ENV, pair
                    ))
                })
        })
        .collect()
}

pub fn is_truthy(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    TRUTHY.contains(&value.as_str())
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    quota_project_id: Option<String>,
}

/// Explicit project, else the default credentials' project, else the gcloud
/// configuration.
pub fn resolve_project_id(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, HarnessError> {
    if let Some(project) = non_empty(explicit) {
        return Ok(project);
    }

    let candidates = non_empty(lookup(CREDENTIALS_ENV))
        .map(PathBuf::from)
        .into_iter()
        .chain(default_credentials_path());
    for path in candidates {
        if let Some(project) = project_from_credentials(&path) {
            debug!(path = %path.display(), "project taken from default credentials");
            return Ok(project);
        }
    }

    match gcloud(&["config", "get-value", "project"]) {
        Ok(project) if project != "(unset)" => Ok(project),
        Ok(_) => Err(no_project("gcloud has no project configured")),
        Err(message) => Err(no_project(&message)),
    }
}

fn no_project(detail: &str) -> HarnessError {
    HarnessError::Config(format!(
        "no Google Cloud project; set {} or {} ({})",
        PROJECT_ENV, FALLBACK_PROJECT_ENV, detail
    ))
}

fn default_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join("gcloud")
            .join("application_default_credentials.json")
    })
}

/// `project_id`, falling back to `quota_project_id`, of a credentials file.
pub fn project_from_credentials(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let credentials: CredentialsFile = serde_json::from_str(&contents).ok()?;
    non_empty(credentials.project_id).or_else(|| non_empty(credentials.quota_project_id))
}

/// Canonical path of a root fixture directory holding the module entrypoint files.
pub fn validate_fixture_dir(path: &Path) -> Result<PathBuf, HarnessError> {
    let dir = path.canonicalize().map_err(|e| {
        HarnessError::Config(format!("fixture directory {}: {}", path.display(), e))
    })?;
    if !dir.is_dir() {
        return Err(HarnessError::Config(format!(
            "fixture path {} is not a directory",
            dir.display()
        )));
    }

    let missing: Vec<&str> = FIXTURE_FILES
        .iter()
        .copied()
        .filter(|file| !dir.join(file).is_file())
        .collect();
    if !missing.is_empty() {
        return Err(HarnessError::Config(format!(
            "fixture directory {} is missing {}",
            dir.display(),
            missing.join(", ")
        )));
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_explicit_project() {
        let config = HarnessConfig::from_lookup(lookup_from(&[(PROJECT_ENV, "my-project")])).unwrap();

        assert_eq!(config.prefix, "mrpn");
        assert_eq!(config.project_id, "my-project");
        assert!(config.labels.is_empty());
        assert_eq!(config.tf_command, "tofu");
        assert!(!config.skip_destroy);
    }

    #[test]
    fn test_all_variables() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            (PREFIX_ENV, "  ci42 "),
            (PROJECT_ENV, " "),
            (FALLBACK_PROJECT_ENV, "fallback-project"),
            (LABELS_ENV, "owner:net-team, ci:true"),
            (TF_COMMAND_ENV, "terraform"),
            (SKIP_DESTROY_ENV, "Yes"),
        ]))
        .unwrap();

        assert_eq!(config.prefix, "ci42");
        assert_eq!(config.project_id, "fallback-project");
        assert_eq!(config.labels["owner"], "net-team");
        assert_eq!(config.labels["ci"], "true");
        assert_eq!(config.tf_command, "terraform");
        assert!(config.skip_destroy);
    }

    #[test]
    fn test_empty_prefix_uses_default() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            (PREFIX_ENV, ""),
            (PROJECT_ENV, "p"),
        ]))
        .unwrap();
        assert_eq!(config.prefix, "mrpn");
    }

    #[test]
    fn test_malformed_labels_are_rejected() {
        let result = HarnessConfig::from_lookup(lookup_from(&[
            (PROJECT_ENV, "p"),
            (LABELS_ENV, "owner:me,broken"),
        ]));
        match result {
            Err(HarnessError::Config(message)) => assert!(message.contains("'broken'")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_labels_blank() {
        assert!(parse_labels("").unwrap().is_empty());
        assert!(parse_labels(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_labels_keeps_colons_in_values() {
        let labels = parse_labels("url:http://x").unwrap();
        assert_eq!(labels["url"], "http://x");
    }

    #[test]
    fn test_is_truthy() {
        for value in ["true", "T", "yes", "Y", "1", " TRUE "] {
            assert!(is_truthy(value), "{value} should be truthy");
        }
        for value in ["", "false", "0", "no", "on", "2"] {
            assert!(!is_truthy(value), "{value} should not be truthy");
        }
    }

    #[test]
    fn test_project_from_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adc.json");
        fs::write(&path, r#"{"type": "authorized_user", "quota_project_id": "quota-p"}"#).unwrap();

        let project = resolve_project_id(
            None,
            lookup_from(&[(CREDENTIALS_ENV, path.to_str().unwrap())]),
        )
        .unwrap();
        assert_eq!(project, "quota-p");

        fs::write(&path, r#"{"project_id": "sa-p", "quota_project_id": "quota-p"}"#).unwrap();
        assert_eq!(project_from_credentials(&path), Some("sa-p".to_string()));
    }

    #[test]
    fn test_project_from_unreadable_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adc.json");
        assert_eq!(project_from_credentials(&path), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(project_from_credentials(&path), None);
    }

    #[test]
    fn test_validate_fixture_dir() {
        let dir = tempfile::tempdir().unwrap();
        for file in FIXTURE_FILES {
            fs::write(dir.path().join(file), "").unwrap();
        }

        let validated = validate_fixture_dir(dir.path()).unwrap();
        assert_eq!(validated, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_validate_fixture_dir_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.tf"), "").unwrap();

        match validate_fixture_dir(dir.path()) {
            Err(HarnessError::Config(message)) => {
                assert!(message.contains("outputs.tf, variables.tf"), "{message}");
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_fixture_dir_not_found() {
        let result = validate_fixture_dir(Path::new("/nonexistent/fixture"));
        assert!(matches!(result, Err(HarnessError::Config(_))));
    }
}
