// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = path.to_path_buf();
    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolves the config file path in priority order: an explicit CLI-supplied
/// path, then a file found by walking up from `cwd`, then the default
/// location.
pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: PathBuf,
    default_config_dir: PathBuf,
    default_filename: &str,
    cli_file: Option<PathBuf>,
) -> PathBuf {
    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return cli_file;
        }
        return clean(cwd.join(cli_file));
    }

    if let Some(found) = find_in_parent(&cwd, default_filename) {
        return found;
    }

    clean(default_config_dir.join(default_filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_when_nothing_found() {
        fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
            None
        }
        let path = resolve_config_path(
            not_found,
            PathBuf::from("/foo/bar"),
            PathBuf::from("/my/config"),
            "murmur.config.yaml",
            None,
        );
        assert_eq!(path, PathBuf::from("/my/config/murmur.config.yaml"));
    }

    #[test]
    fn cli_supplied_absolute_path_wins() {
        fn found(_: &Path, _: &str) -> Option<PathBuf> {
            Some(PathBuf::from("/found/murmur.config.yaml"))
        }
        let path = resolve_config_path(
            found,
            PathBuf::from("/foo/bar"),
            PathBuf::from("/my/config"),
            "murmur.config.yaml",
            Some(PathBuf::from("/explicit/conf.yaml")),
        );
        assert_eq!(path, PathBuf::from("/explicit/conf.yaml"));
    }

    #[test]
    fn found_in_parent_takes_precedence_over_default() {
        fn found(_: &Path, _: &str) -> Option<PathBuf> {
            Some(PathBuf::from("/foo/murmur.config.yaml"))
        }
        let path = resolve_config_path(
            found,
            PathBuf::from("/foo/bar"),
            PathBuf::from("/my/config"),
            "murmur.config.yaml",
            None,
        );
        assert_eq!(path, PathBuf::from("/foo/murmur.config.yaml"));
    }
}
