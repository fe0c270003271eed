use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_PATH: &str = "~/.clai.env";
const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Resolves the API credential: the `~/.clai.env` config file wins when it
/// exists, otherwise the `OPENAI_API_KEY` environment variable. Resolved
/// once per run and never persisted.
pub fn resolve() -> Result<String> {
    resolve_with(|key| env::var(key).ok())
}

fn resolve_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Result<String> {
    if let Some(path) = expand_tilde(CONFIG_FILE_PATH, get_var("HOME").as_deref())
        && path.exists()
    {
        debug!(path = %path.display(), "resolving credential from config file");
        return read_key_file(&path);
    }

    if let Some(value) = get_var(API_KEY_VAR).filter(|value| !value.trim().is_empty()) {
        debug!(var = API_KEY_VAR, "resolving credential from environment");
        return Ok(value);
    }

    Err(anyhow!(
        "No API credential found. Create {} with {}=\"<key>\" or set the {} environment variable.",
        CONFIG_FILE_PATH,
        API_KEY_VAR,
        API_KEY_VAR
    ))
}

/// Reads an env-file formatted config file and returns the value bound to
/// `OPENAI_API_KEY`. Quotes and trailing newlines are stripped by the
/// env-file parser.
fn read_key_file(path: &Path) -> Result<String> {
    let entries = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    for entry in entries {
        let (key, value) = entry
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        if key == API_KEY_VAR {
            if value.trim().is_empty() {
                return Err(anyhow!(
                    "Config file '{}' defines an empty {}",
                    path.display(),
                    API_KEY_VAR
                ));
            }
            return Ok(value);
        }
    }

    Err(anyhow!(
        "Config file '{}' does not define {}",
        path.display(),
        API_KEY_VAR
    ))
}

fn expand_tilde(path: &str, home: Option<&str>) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = home.filter(|value| !value.is_empty())?;
            Some(Path::new(home).join(rest))
        }
        None => Some(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    use super::{expand_tilde, resolve_with};

    fn get_var_from(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn expand_tilde_joins_against_home() {
        assert_eq!(
            expand_tilde("~/.clai.env", Some("/home/alex")),
            Some(PathBuf::from("/home/alex/.clai.env"))
        );
    }

    #[test]
    fn expand_tilde_without_home_yields_nothing() {
        assert_eq!(expand_tilde("~/.clai.env", None), None);
        assert_eq!(expand_tilde("~/.clai.env", Some("")), None);
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(
            expand_tilde("/etc/clai.env", None),
            Some(PathBuf::from("/etc/clai.env"))
        );
    }

    #[test]
    fn resolve_reads_quoted_key_from_config_file() {
        let home = tempfile::tempdir().expect("temp home should be creatable");
        fs::write(home.path().join(".clai.env"), "OPENAI_API_KEY=\"sk-test123\"\n")
            .expect("config file should be writable");

        let credential = resolve_with(get_var_from(&[(
            "HOME",
            home.path().to_str().expect("temp path should be utf-8"),
        )]))
        .expect("credential should resolve from file");
        assert_eq!(credential, "sk-test123");
    }

    #[test]
    fn resolve_prefers_config_file_over_environment() {
        let home = tempfile::tempdir().expect("temp home should be creatable");
        fs::write(home.path().join(".clai.env"), "OPENAI_API_KEY=sk-fromfile\n")
            .expect("config file should be writable");

        let credential = resolve_with(get_var_from(&[
            ("HOME", home.path().to_str().expect("temp path should be utf-8")),
            ("OPENAI_API_KEY", "sk-fromenv"),
        ]))
        .expect("credential should resolve from file");
        assert_eq!(credential, "sk-fromfile");
    }

    #[test]
    fn resolve_falls_back_to_environment_without_config_file() {
        let home = tempfile::tempdir().expect("temp home should be creatable");

        let credential = resolve_with(get_var_from(&[
            ("HOME", home.path().to_str().expect("temp path should be utf-8")),
            ("OPENAI_API_KEY", "sk-env456"),
        ]))
        .expect("credential should resolve from environment");
        assert_eq!(credential, "sk-env456");
    }

    #[test]
    fn resolve_fails_without_any_source() {
        let home = tempfile::tempdir().expect("temp home should be creatable");

        let err = resolve_with(get_var_from(&[(
            "HOME",
            home.path().to_str().expect("temp path should be utf-8"),
        )]))
        .expect_err("resolution should fail");
        assert!(err.to_string().contains("No API credential found"));
    }

    #[test]
    fn resolve_fails_when_config_file_lacks_the_key() {
        let home = tempfile::tempdir().expect("temp home should be creatable");
        fs::write(home.path().join(".clai.env"), "OTHER_KEY=value\n")
            .expect("config file should be writable");

        let err = resolve_with(get_var_from(&[
            ("HOME", home.path().to_str().expect("temp path should be utf-8")),
            ("OPENAI_API_KEY", "sk-ignored"),
        ]))
        .expect_err("resolution should fail");
        assert!(err.to_string().contains("does not define OPENAI_API_KEY"));
    }
}
