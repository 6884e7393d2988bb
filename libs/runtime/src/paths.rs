//! Home directory resolution.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

fn user_home() -> Option<PathBuf> {
    #[cfg(windows)]
    let var = std::env::var_os("APPDATA").or_else(|| std::env::var_os("USERPROFILE"));
    #[cfg(not(windows))]
    let var = std::env::var_os("HOME");

    var.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Expand a leading `~` and make the path absolute against the current directory.
fn expand(raw: &str) -> Result<PathBuf> {
    let path = if raw == "~" {
        user_home().context("cannot expand '~': no home directory")?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        user_home()
            .context("cannot expand '~': no home directory")?
            .join(rest)
    } else {
        PathBuf::from(raw)
    };

    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()
            .context("cannot read current directory")?
            .join(path))
    }
}

/// Resolve the application home directory.
///
/// `configured` wins when set; otherwise `<user home>/<default_subdir>` is used.
/// With `create` the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand(raw.trim())?,
        None => user_home()
            .context("no user home directory; set app.home_dir explicitly")?
            .join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create home dir {}", path.display()))?;
    } else if path.exists() && !path.is_dir() {
        bail!("home dir {} exists but is not a directory", path.display());
    }

    Ok(path)
}

/// Resolve `file` against `base_dir` unless it is already absolute.
pub fn resolve_under(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_dir_is_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/home");

        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".unused", true).unwrap();

        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_dir_becomes_absolute() {
        let resolved = resolve_home_dir(Some("some/relative".into()), ".unused", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/relative"));
    }

    #[test]
    fn existing_file_is_rejected_without_create() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let err = resolve_home_dir(Some(file.to_string_lossy().to_string()), ".unused", false)
            .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn resolve_under_keeps_absolute_paths() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_under(&abs.to_string_lossy(), Path::new("/base")), abs);
        assert_eq!(
            resolve_under("logs/app.log", Path::new("/base")),
            PathBuf::from("/base/logs/app.log")
        );
    }
}
