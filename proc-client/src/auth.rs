use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

const AUTH_ENV: &str = "PROC_AUTH";

/// Resolves the credential used for the `Authorization` header.
///
/// First non-empty wins: explicit `--auth` value, then the `PROC_AUTH`
/// environment variable, then `~/.proc/auth`. Nothing available resolves to
/// the empty string; the token is opaque at this layer and never validated.
pub fn resolve(explicit: Option<&str>) -> String {
    resolve_from(
        explicit,
        env::var(AUTH_ENV).ok().as_deref(),
        read_stored().as_deref(),
    )
}

pub fn resolve_from(
    explicit: Option<&str>,
    environment: Option<&str>,
    stored: Option<&str>,
) -> String {
    for source in [explicit, environment, stored] {
        match source {
            Some(value) if !value.is_empty() => return value.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// Persists the credential resolved from flag or environment to
/// `~/.proc/auth`, overwriting any previous value.
pub fn login(explicit: Option<&str>) -> Result<()> {
    let authorization = resolve_from(explicit, env::var(AUTH_ENV).ok().as_deref(), None);
    let path = auth_path().context("could not locate home directory")?;
    let dir = path.parent().expect("auth path always has a parent");
    fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    fs::write(&path, authorization).with_context(|| format!("could not write {}", path.display()))
}

/// Removes the stored credential. Succeeds whether or not one existed.
pub fn logout() -> Result<()> {
    let Some(path) = auth_path() else {
        return Ok(());
    };
    if path.exists() {
        fs::remove_file(&path).with_context(|| format!("could not remove {}", path.display()))?;
    }
    Ok(())
}

fn auth_path() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(".proc").join("auth"))
}

fn read_stored() -> Option<String> {
    let contents = fs::read_to_string(auth_path()?).ok()?;
    Some(contents.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_value_wins() {
        assert_eq!(
            resolve_from(Some("flag"), Some("env"), Some("file")),
            "flag"
        );
    }

    #[test]
    fn environment_beats_stored_file() {
        assert_eq!(resolve_from(None, Some("env"), Some("file")), "env");
        assert_eq!(resolve_from(Some(""), Some("env"), Some("file")), "env");
    }

    #[test]
    fn stored_file_is_the_last_resort() {
        assert_eq!(resolve_from(None, None, Some("file")), "file");
    }

    #[test]
    fn nothing_resolves_to_empty_without_error() {
        assert_eq!(resolve_from(None, None, None), "");
        assert_eq!(resolve_from(Some(""), Some(""), Some("")), "");
    }
}
