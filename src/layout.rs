//! The project-layout seam: paths and the storage-mode flag are owned by
//! a host collaborator, never by this crate. `FilesystemProjectLayout`
//! is a usable default so the fold engine can be exercised without a
//! real host, but callers are free to supply their own implementation.

use std::path::{Path, PathBuf};

/// Fixed JSONL file names shared between writers (out of scope here) and
/// this crate's readers.
pub const MESSAGES_FILE: &str = "messages.jsonl";
pub const THREADS_FILE: &str = "threads.jsonl";
pub const QUESTIONS_FILE: &str = "questions.jsonl";
pub const AGENTS_FILE: &str = "agents.jsonl";
pub const PERMISSIONS_FILE: &str = "permissions.jsonl";
pub const AGENT_STATE_FILE: &str = "agent_state.jsonl";

/// Sentinel file whose presence under the shared directory switches a
/// project into multi-machine mode.
const MULTI_MACHINE_SENTINEL: &str = ".v2";

/// Resolves the legacy and multi-machine directories for a project, and
/// the storage-mode flag that the [`crate::reader`] mode router consults.
pub trait ProjectLayout {
    /// The legacy single-writer directory, e.g. `<project>/.fray`.
    fn legacy_dir(&self, project_path: &Path) -> PathBuf;

    /// The per-machine directories under the shared multi-machine root,
    /// e.g. `<project>/.fray/shared/machines/<machine>`. Empty if the
    /// shared root has no machine subdirectories yet.
    fn shared_machines_dirs(&self, project_path: &Path) -> Vec<PathBuf>;

    /// The local host's own runtime agents log. Always a single file,
    /// never merged across machines, regardless of storage mode.
    fn local_runtime_path(&self, project_path: &Path) -> PathBuf;

    /// True when the project has opted into the multi-machine shared
    /// layout (the `.v2` sentinel under the shared directory).
    fn is_multi_machine_mode(&self, project_path: &Path) -> bool {
        self.storage_version(project_path) == 2
    }

    /// `2` implies multi-machine mode; `1` (or absent) implies legacy.
    fn storage_version(&self, project_path: &Path) -> u32;
}

/// Default filesystem-backed layout using the `.fray` conventions from
/// the external project-layout collaborator.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemProjectLayout;

impl FilesystemProjectLayout {
    fn shared_root(&self, project_path: &Path) -> PathBuf {
        project_path.join(".fray").join("shared")
    }

    fn machines_root(&self, project_path: &Path) -> PathBuf {
        self.shared_root(project_path).join("machines")
    }
}

impl ProjectLayout for FilesystemProjectLayout {
    fn legacy_dir(&self, project_path: &Path) -> PathBuf {
        project_path.join(".fray")
    }

    fn shared_machines_dirs(&self, project_path: &Path) -> Vec<PathBuf> {
        let root = self.machines_root(project_path);
        let Ok(entries) = std::fs::read_dir(&root) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.path())
            .collect();
        dirs.sort();
        dirs
    }

    fn local_runtime_path(&self, project_path: &Path) -> PathBuf {
        self.legacy_dir(project_path).join(AGENTS_FILE)
    }

    fn storage_version(&self, project_path: &Path) -> u32 {
        if self.shared_root(project_path).join(MULTI_MACHINE_SENTINEL).is_file() {
            2
        } else {
            1
        }
    }
}

/// Name of the machine a directory entry belongs to, derived from its
/// final path component.
pub(crate) fn machine_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn legacy_mode_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let layout = FilesystemProjectLayout;
        assert_eq!(layout.storage_version(dir.path()), 1);
        assert!(!layout.is_multi_machine_mode(dir.path()));
    }

    #[test]
    fn v2_sentinel_switches_to_multi_machine() {
        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join(".fray").join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join(".v2"), "").unwrap();
        let layout = FilesystemProjectLayout;
        assert_eq!(layout.storage_version(dir.path()), 2);
        assert!(layout.is_multi_machine_mode(dir.path()));
    }

    #[test]
    fn shared_machines_dirs_empty_without_machines() {
        let dir = tempfile::tempdir().unwrap();
        let layout = FilesystemProjectLayout;
        assert!(layout.shared_machines_dirs(dir.path()).is_empty());
    }

    #[test]
    fn shared_machines_dirs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let machines = dir.path().join(".fray").join("shared").join("machines");
        fs::create_dir_all(machines.join("beta")).unwrap();
        fs::create_dir_all(machines.join("alpha")).unwrap();
        let layout = FilesystemProjectLayout;
        let dirs = layout.shared_machines_dirs(dir.path());
        let names: Vec<String> = dirs.iter().map(|d| machine_name(d)).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
