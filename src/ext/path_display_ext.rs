use std::path::{Component, Path, PathBuf};

/// Renders a path for diagnostics: canonical when it exists, otherwise made
/// absolute and lexically cleaned of `.` and `..` components.
pub fn best_effort_display(path: &Path) -> String {
    if let Ok(canonical) = path.canonicalize() {
        return canonical.display().to_string();
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    lexically_clean(&absolute).display().to_string()
}

fn lexically_clean(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut kept: Vec<Component>, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(kept.last(), Some(Component::Normal(_))) {
                        kept.pop();
                    }
                }
                other => kept.push(other),
            }
            kept
        })
        .iter()
        .collect()
}

pub trait PathDisplayExt {
    fn best_effort_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> PathDisplayExt for P {
    fn best_effort_display(&self) -> String {
        best_effort_display(self.as_ref())
    }
}
