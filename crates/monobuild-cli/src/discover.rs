//! Finding per-component manifests on disk.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use globset::GlobBuilder;
use ignore::WalkBuilder;
use monobuild_core::manifest::ManifestSource;
use tracing::{debug, instrument};

/// Walk `root` and collect every file whose root-relative path matches
/// `pattern`, sorted by path.
///
/// Hidden files are searched and `.gitignore` rules are honoured. `*` does
/// not cross `/`; use `**` for that. A manifest directly under `root` has no
/// component directory and is skipped.
///
/// A directory the walk cannot enter comes back as a source whose content is
/// the error, so it is reported with the other manifest problems.
///
/// # Errors
///
/// Returns an error if `pattern` is not a valid glob.
#[instrument(skip(root), fields(root = %root.display()))]
pub fn manifest_sources(root: &Path, pattern: &str) -> Result<Vec<ManifestSource>> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("Malformed dependency file pattern '{pattern}'"))?
        .compile_matcher();

    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(false)
        .git_ignore(true)
        .git_exclude(true)
        .require_git(false)
        .ignore(true)
        .sort_by_file_path(|a: &Path, b: &Path| a.cmp(b));

    let mut sources = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "walk failed");
                sources.push(walk_failure(root, &err));
                continue;
            }
        };

        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !matcher.is_match(relative) {
            continue;
        }
        if relative.parent().is_none_or(|dir| dir.as_os_str().is_empty()) {
            debug!(path = %relative.display(), "skipping manifest without a component");
            continue;
        }

        let content = std::fs::read_to_string(entry.path());
        sources.push(ManifestSource::new(relative, content));
    }

    debug!(manifests = sources.len(), "discovered manifests");
    Ok(sources)
}

fn walk_failure(root: &Path, err: &ignore::Error) -> ManifestSource {
    let path = error_path(err).unwrap_or(root);
    let relative = path
        .strip_prefix(root)
        .ok()
        .filter(|relative| !relative.as_os_str().is_empty())
        .unwrap_or(path);
    let message = err
        .io_error()
        .map_or_else(|| err.to_string(), ToString::to_string);

    ManifestSource::new(relative, Err(io::Error::other(message)))
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monobuild_core::ManifestError;
    use monobuild_core::manifest::read_manifests;
    use std::fs;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().expect("has parent")).expect("create dirs");
        fs::write(full, content).expect("write file");
    }

    fn components(sources: &[ManifestSource]) -> Vec<&str> {
        sources.iter().map(|s| s.component.as_str()).collect()
    }

    #[test]
    fn finds_nested_manifests_in_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "libs/two/Dependencies", "");
        write(dir.path(), "app/Dependencies", "libs/one\n");
        write(dir.path(), "libs/one/Dependencies", "");
        write(dir.path(), "app/src/main.go", "package main");

        let sources = manifest_sources(dir.path(), "**/Dependencies").expect("valid glob");
        assert_eq!(components(&sources), vec!["app", "libs/one", "libs/two"]);
        assert_eq!(
            sources[0].content.as_deref().expect("readable"),
            "libs/one\n"
        );
    }

    #[test]
    fn honours_gitignore_and_searches_hidden_dirs() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), ".gitignore", "vendor/\n");
        write(dir.path(), "vendor/thing/Dependencies", "");
        write(dir.path(), ".github/actions/Dependencies", "");

        let sources = manifest_sources(dir.path(), "**/Dependencies").expect("valid glob");
        assert_eq!(components(&sources), vec![".github/actions"]);
    }

    #[test]
    fn custom_pattern_and_root_manifest() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "deps.txt", "");
        write(dir.path(), "a/deps.txt", "");
        write(dir.path(), "a/b/deps.txt", "");

        let sources = manifest_sources(dir.path(), "*/deps.txt").expect("valid glob");
        assert_eq!(components(&sources), vec!["a"]);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = manifest_sources(dir.path(), "a[").expect_err("bad glob");
        assert!(err.to_string().contains("a["));
    }

    #[test]
    fn missing_root_is_an_unreadable_manifest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("gone");

        let sources = manifest_sources(&missing, "**/Dependencies").expect("valid glob");
        assert_eq!(sources.len(), 1);
        assert!(sources[0].content.is_err());

        let outcome = read_manifests(sources, false);
        assert!(matches!(
            outcome.errors.as_slice(),
            [ManifestError::Unreadable { path, .. }] if *path == missing
        ));
        assert!(outcome.into_result().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "app/Dependencies", "");
        write(dir.path(), "locked/lib/Dependencies", "");

        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        let blocked = fs::read_dir(&locked).is_err();

        let sources = manifest_sources(dir.path(), "**/Dependencies").expect("valid glob");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        // privileged users can read the directory anyway
        if !blocked {
            return;
        }

        let errors = read_manifests(sources, false).errors;
        assert!(
            errors
                .iter()
                .all(|err| matches!(err, ManifestError::Unreadable { .. })),
            "unexpected errors: {errors:?}"
        );
        assert!(errors.iter().any(|err| matches!(
            err,
            ManifestError::Unreadable { path, .. } if path == Path::new("locked")
        )));
    }
}
