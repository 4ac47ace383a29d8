//! Enumerates machine subdirectories
//! under the shared root and collects lines from each, annotating every
//! line with its originating machine and its in-file index. Directory
//! order is not meaningful here — [`crate::order`] re-imposes the real
//! ordering afterwards.

use std::path::Path;

use crate::error::FoldResult;
use crate::layout::{machine_name, ProjectLayout};
use crate::line_source::read_lines;

pub struct MachineLine {
    pub line: String,
    pub machine: String,
    pub index: usize,
}

pub fn load_shared_lines(
    layout: &dyn ProjectLayout,
    project_path: &Path,
    file_name: &str,
) -> FoldResult<Vec<MachineLine>> {
    let mut out = Vec::new();
    for dir in layout.shared_machines_dirs(project_path) {
        let machine = machine_name(&dir);
        let lines = read_lines(&dir.join(file_name))?;
        out.extend(
            lines
                .into_iter()
                .enumerate()
                .map(|(index, line)| MachineLine {
                    line,
                    machine: machine.clone(),
                    index,
                }),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FilesystemProjectLayout;
    use std::fs;

    #[test]
    fn no_machines_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let layout = FilesystemProjectLayout;
        assert!(load_shared_lines(&layout, dir.path(), "messages.jsonl")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn collects_lines_with_machine_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let machines = dir.path().join(".fray").join("shared").join("machines");
        fs::create_dir_all(machines.join("alpha")).unwrap();
        fs::create_dir_all(machines.join("beta")).unwrap();
        fs::write(machines.join("alpha").join("messages.jsonl"), "l1\nl2\n").unwrap();
        fs::write(machines.join("beta").join("messages.jsonl"), "l3\n").unwrap();

        let layout = FilesystemProjectLayout;
        let lines = load_shared_lines(&layout, dir.path(), "messages.jsonl").unwrap();
        assert_eq!(lines.len(), 3);
        let alpha: Vec<_> = lines.iter().filter(|l| l.machine == "alpha").collect();
        assert_eq!(alpha.len(), 2);
        assert_eq!(alpha[0].index, 0);
        assert_eq!(alpha[1].index, 1);
    }
}
