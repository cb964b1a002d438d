//! Lexical path handling for manifest locations.
//!
//! Manifest identity is its normalized path. Normalization is purely
//! lexical: `.` components are dropped and `..` pops the previous normal
//! component. The filesystem is never consulted, so symlinks are not
//! resolved.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// A leading `..` on a relative path is kept, since there is nothing to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve `reference` against the directory containing `document`.
///
/// Absolute references are normalized as-is.
pub fn resolve_relative(document: &Path, reference: &Path) -> PathBuf {
    if reference.is_absolute() {
        return normalize_path(reference);
    }
    let base = document.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_current_dir_components() {
        assert_eq!(
            normalize_path(Path::new("./a/./b/manifest.yml")),
            PathBuf::from("a/b/manifest.yml")
        );
    }

    #[test]
    fn parent_dir_pops_normal_component() {
        assert_eq!(
            normalize_path(Path::new("/srv/apps/web/../base.yml")),
            PathBuf::from("/srv/apps/base.yml")
        );
    }

    #[test]
    fn parent_dir_above_root_is_ignored() {
        assert_eq!(normalize_path(Path::new("/../x.yml")), PathBuf::from("/x.yml"));
    }

    #[test]
    fn leading_parent_dir_on_relative_path_is_kept() {
        assert_eq!(
            normalize_path(Path::new("../../x.yml")),
            PathBuf::from("../../x.yml")
        );
    }

    #[test]
    fn empty_result_becomes_current_dir() {
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn resolve_relative_uses_document_directory() {
        let doc = Path::new("/srv/apps/web/manifest.yml");
        assert_eq!(
            resolve_relative(doc, Path::new("../shared/base.yml")),
            PathBuf::from("/srv/apps/shared/base.yml")
        );
        assert_eq!(
            resolve_relative(doc, Path::new("parent.yml")),
            PathBuf::from("/srv/apps/web/parent.yml")
        );
    }

    #[test]
    fn resolve_relative_keeps_absolute_reference() {
        let doc = Path::new("/srv/apps/web/manifest.yml");
        assert_eq!(
            resolve_relative(doc, Path::new("/etc/heir/../base.yml")),
            PathBuf::from("/etc/base.yml")
        );
    }

    #[test]
    fn resolve_relative_for_bare_file_name() {
        assert_eq!(
            resolve_relative(Path::new("manifest.yml"), Path::new("base.yml")),
            PathBuf::from("base.yml")
        );
    }
}
