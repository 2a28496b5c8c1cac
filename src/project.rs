//! Project identification from the working directory.
//!
//! A project is a direct child of the projects root. Working anywhere else,
//! including a nested directory inside a project, yields no project.

use regex::Regex;
use std::path::Path;

use crate::error::Result;

/// Normalize separators so Windows-style paths match the same pattern.
fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Matches working directories of the form `<root>/<project>`.
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    pattern: Regex,
}

impl ProjectResolver {
    pub fn new(projects_dir: &Path) -> Result<Self> {
        let root = normalize(&projects_dir.to_string_lossy());
        let root = root.trim_end_matches('/');
        let pattern = Regex::new(&format!("^{}/([^/]+)/?$", regex::escape(root)))?;
        Ok(Self { pattern })
    }

    /// Returns the trailing segment when `cwd` sits directly under the root.
    pub fn resolve(&self, cwd: &Path) -> Option<String> {
        let cwd = normalize(&cwd.to_string_lossy());
        let project = self
            .pattern
            .captures(&cwd)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        match &project {
            Some(name) => tracing::debug!(project = %name, "resolved project"),
            None => tracing::debug!(cwd = %cwd, "working directory is not a project"),
        }
        project
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolver(root: &str) -> ProjectResolver {
        ProjectResolver::new(Path::new(root)).unwrap()
    }

    #[test]
    fn test_direct_child_is_a_project() {
        let r = resolver("/home/me/Projects");
        assert_eq!(
            r.resolve(Path::new("/home/me/Projects/nova")),
            Some("nova".to_string())
        );
        assert_eq!(
            r.resolve(Path::new("/home/me/Projects/nova/")),
            Some("nova".to_string())
        );
    }

    #[test]
    fn test_other_paths_are_rejected() {
        let r = resolver("/home/me/Projects");
        assert_eq!(r.resolve(Path::new("/home/me/Projects")), None);
        assert_eq!(r.resolve(Path::new("/home/me/Projects/nova/src")), None);
        assert_eq!(r.resolve(Path::new("/home/me/Documents/nova")), None);
        assert_eq!(r.resolve(Path::new("/tmp/home/me/Projects/nova")), None);
    }

    #[test]
    fn test_trailing_slash_on_root() {
        let r = resolver("/home/me/Projects/");
        assert_eq!(
            r.resolve(&PathBuf::from("/home/me/Projects").join("web-app")),
            Some("web-app".to_string())
        );
    }

    #[test]
    fn test_windows_style_paths() {
        let r = resolver(r"C:\Projects");
        assert_eq!(
            r.resolve(Path::new(r"C:\Projects\nova")),
            Some("nova".to_string())
        );
        assert_eq!(r.resolve(Path::new(r"C:\Projects\nova\src")), None);
    }

    #[test]
    fn test_regex_metacharacters_in_root() {
        let r = resolver("/home/me/my.projects (old)");
        assert_eq!(
            r.resolve(Path::new("/home/me/my.projects (old)/nova")),
            Some("nova".to_string())
        );
        assert_eq!(r.resolve(Path::new("/home/me/myXprojects (old)/nova")), None);
    }
}
