use std::path::{Component, Path, PathBuf};

/// Path helpers shared by the tree and the commands.
pub trait PathExt {
    /// The display label of an entry: its final component, or the whole path
    /// when there is none (e.g. `/`).
    fn label(&self) -> String;

    /// The path of a sibling entry called `name`.
    fn sibling(&self, name: &str) -> PathBuf;

    /// Resolves `.` and `..` lexically, without touching the filesystem.
    fn normalized(&self) -> PathBuf;
}

impl PathExt for Path {
    fn label(&self) -> String {
        match self.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => self.display().to_string(),
        }
    }

    fn sibling(&self, name: &str) -> PathBuf {
        match self.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }

    fn normalized(&self) -> PathBuf {
        let mut components = Vec::new();

        for component in self.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(components.last(), Some(Component::Normal(_))) {
                        components.pop();
                    }
                }
                _ => components.push(component),
            }
        }

        components.iter().collect()
    }
}
