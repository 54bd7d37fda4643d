use crate::file::ResolvedFile;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// An entry collected before display paths are known.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    unreadable: Option<String>,
}

/// Expands request paths into an ordered, deduplicated list of files.
pub(crate) struct Resolver {
    workspace_root: Option<PathBuf>,
}

impl Resolver {
    /// Creates a resolver; a relative root is taken relative to the current directory.
    pub(crate) fn new(workspace_root: Option<&str>) -> Self {
        Self {
            workspace_root: workspace_root.map(absolutize),
        }
    }

    /// Resolves request entries in order.
    ///
    /// Directories are walked depth-first with entries sorted by file name.
    /// A file reached twice keeps its first position. Missing or unreadable
    /// entries come back as `SkippedUnreadable` records; every other record is
    /// pending classification by the loader.
    pub(crate) fn resolve(&self, paths: &[String]) -> Vec<ResolvedFile> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for raw in paths {
            let path = absolutize(raw);
            debug!("Resolving entry: {}", path.display());

            match fs::metadata(&path) {
                Ok(md) if md.is_file() => {
                    push_unique(&mut candidates, &mut seen, path, None);
                }
                Ok(md) if md.is_dir() => Self::expand_dir(&path, &mut candidates, &mut seen),
                Ok(_) => {
                    warn!("{} is neither file nor directory", path.display());
                    push_unique(
                        &mut candidates,
                        &mut seen,
                        path,
                        Some("neither file nor directory".to_string()),
                    );
                }
                Err(e) => {
                    warn!("Cannot access {}: {}", path.display(), e);
                    push_unique(&mut candidates, &mut seen, path, Some(e.to_string()));
                }
            }
        }

        let base = self.display_base(&candidates);
        debug!(
            "Resolved {} entries (display base: {:?})",
            candidates.len(),
            base.as_deref().map(Path::display)
        );

        candidates
            .into_iter()
            .map(|c| {
                let relative = display_path(&c.path, base.as_deref());
                match c.unreadable {
                    Some(reason) => ResolvedFile::unreadable(c.path, relative, reason),
                    None => ResolvedFile::pending(c.path, relative),
                }
            })
            .collect()
    }

    fn expand_dir(dir: &Path, candidates: &mut Vec<Candidate>, seen: &mut HashSet<PathBuf>) {
        let mut found = 0usize;

        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let is_file = file_type.is_file()
                        || (file_type.is_symlink()
                            && fs::metadata(entry.path()).is_ok_and(|md| md.is_file()));

                    if is_file {
                        trace!("Found file in dir: {}", entry.path().display());
                        found += 1;
                        push_unique(candidates, seen, normalize_lexically(entry.path()), None);
                    }
                }
                Err(e) => {
                    let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                    warn!("Failed to access {}: {}", path.display(), e);
                    push_unique(candidates, seen, path, Some(e.to_string()));
                }
            }
        }

        debug!("Found {} files in {}", found, dir.display());
    }

    /// Base for display paths: the workspace root, or the common ancestor of
    /// all readable files.
    fn display_base(&self, candidates: &[Candidate]) -> Option<PathBuf> {
        if let Some(root) = &self.workspace_root {
            return Some(root.clone());
        }

        let files: Vec<&Path> = candidates
            .iter()
            .filter(|c| c.unreadable.is_none())
            .map(|c| c.path.as_path())
            .collect();

        common_ancestor(&files)
    }
}

fn push_unique(
    candidates: &mut Vec<Candidate>,
    seen: &mut HashSet<PathBuf>,
    path: PathBuf,
    unreadable: Option<String>,
) {
    let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if seen.insert(key) {
        candidates.push(Candidate { path, unreadable });
    } else {
        trace!("Skipping duplicate: {}", path.display());
    }
}

/// Makes a path absolute against the current directory and removes `.`/`..`
/// components lexically. Symlinks are not resolved.
pub(crate) fn absolutize(raw: impl AsRef<Path>) -> PathBuf {
    let raw = raw.as_ref();
    let absolute = std::path::absolute(raw).unwrap_or_else(|_| raw.to_path_buf());
    normalize_lexically(&absolute)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Longest common ancestor directory of the given files.
///
/// Returns `None` when the files share nothing but a filesystem root or drive
/// prefix.
pub(crate) fn common_ancestor(files: &[&Path]) -> Option<PathBuf> {
    let mut parents = files.iter().filter_map(|f| f.parent());
    let first = parents.next()?;
    let mut common: Vec<Component<'_>> = first.components().collect();

    for parent in parents {
        let shared = common
            .iter()
            .zip(parent.components())
            .take_while(|(a, b)| *a == b)
            .count();
        common.truncate(shared);
    }

    if !common.iter().any(|c| matches!(c, Component::Normal(_))) {
        return None;
    }

    Some(common.iter().collect())
}

/// Display path of `path` relative to `base`, with `/` separators.
///
/// Falls back to the absolute path when there is no base or the file lies
/// outside it.
pub(crate) fn display_path(path: &Path, base: Option<&Path>) -> String {
    let shown = base
        .and_then(|b| path.strip_prefix(b).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path);
    normalize_separators(shown)
}

/// Normalizes a path to use `/` as separator.
pub(crate) fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
