//! Project manifest (`.ufazien.json`) linking a directory to its website.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::{manifest_path, MANIFEST_FILE};
use crate::core::error::AppError;

/// Website type for projects deployed from a build output folder.
pub const BUILD_WEBSITE_TYPE: &str = "build";

/// Content of a `.gitignore` created for a new project.
pub const DEFAULT_GITIGNORE: &str = "# Environment variables
.env
.ufazien.json

# OS files
.DS_Store
Thumbs.db
desktop.ini

# IDE files
.vscode/
.idea/
*.swp
*.swo
*.sublime-project
*.sublime-workspace

# Temporary files
*.tmp
*.log
*.cache

# Build files
dist/
build/
*.min.js
*.min.css
";

/// What [`ensure_gitignore`] did to the project's `.gitignore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreChange {
    Created,
    Updated,
    Unchanged,
}

/// Keeps `.env` and the manifest out of version control.
///
/// Creates `.gitignore` when absent, otherwise appends whichever of the two
/// entries it does not mention yet.
pub fn ensure_gitignore(project_dir: &Path) -> Result<GitignoreChange, AppError> {
    let path = project_dir.join(".gitignore");

    let existing = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::write(&path, DEFAULT_GITIGNORE)
                .map_err(|e| AppError::Config(format!("Failed to write .gitignore: {}", e)))?;
            return Ok(GitignoreChange::Created);
        }
        Err(e) => {
            return Err(AppError::Config(format!("Failed to read .gitignore: {}", e)));
        }
    };

    let mut additions = Vec::new();
    if !existing.contains(".env") {
        additions.push("# Environment variables\n.env");
    }
    if !existing.contains(MANIFEST_FILE) {
        additions.push(MANIFEST_FILE);
    }
    if additions.is_empty() {
        return Ok(GitignoreChange::Unchanged);
    }

    let mut file = OpenOptions::new().append(true).open(&path)?;
    write!(file, "\n{}\n", additions.join("\n"))?;
    Ok(GitignoreChange::Updated)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub website_id: String,
    pub website_name: String,
    pub subdomain: String,
    /// `static`, `php` or `build`.
    pub website_type: String,
    pub domain: String,
    /// Written as `null` when the project has no database.
    #[serde(default)]
    pub database_id: Option<String>,
    /// Folder packaged instead of the project root, for `build` projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_folder: Option<String>,
}

impl ProjectManifest {
    /// Reads the manifest of a project. Missing or unparsable files give `None`.
    pub fn find(project_dir: &Path) -> Option<Self> {
        let content = fs::read_to_string(manifest_path(project_dir)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Writes the manifest and lists it in an existing `.gitignore`.
    pub fn save(&self, project_dir: &Path) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize manifest: {}", e)))?;

        fs::write(manifest_path(project_dir), content)
            .map_err(|e| AppError::Config(format!("Failed to write {}: {}", MANIFEST_FILE, e)))?;

        let gitignore = project_dir.join(".gitignore");
        if let Ok(existing) = fs::read_to_string(&gitignore) {
            if !existing.contains(MANIFEST_FILE) {
                let mut file = OpenOptions::new().append(true).open(&gitignore)?;
                write!(file, "\n{}\n", MANIFEST_FILE)?;
            }
        }

        Ok(())
    }

    /// Folder to package: the build folder for build projects, else the root.
    pub fn archive_subfolder(&self) -> Option<&str> {
        if self.website_type == BUILD_WEBSITE_TYPE {
            self.build_folder.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> ProjectManifest {
        ProjectManifest {
            website_id: "w-1".into(),
            website_name: "Shop".into(),
            subdomain: "shop".into(),
            website_type: "php".into(),
            domain: "shop.ufazien.com".into(),
            database_id: Some("db-1".into()),
            build_folder: None,
        }
    }

    #[test]
    fn test_save_and_find() {
        let dir = TempDir::new().unwrap();
        manifest().save(dir.path()).unwrap();

        assert_eq!(ProjectManifest::find(dir.path()), Some(manifest()));

        let raw = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(raw.contains("\n  \"website_id\": \"w-1\""));
        assert!(!raw.contains("build_folder"));
    }

    #[test]
    fn test_save_writes_null_database_id() {
        let dir = TempDir::new().unwrap();
        let mut m = manifest();
        m.database_id = None;
        m.save(dir.path()).unwrap();

        let raw = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(raw.contains("\"database_id\": null"));
        assert_eq!(ProjectManifest::find(dir.path()), Some(m));
    }

    #[test]
    fn test_ensure_gitignore_creates_file() {
        let dir = TempDir::new().unwrap();

        assert_eq!(ensure_gitignore(dir.path()).unwrap(), GitignoreChange::Created);
        let content = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content, DEFAULT_GITIGNORE);
        assert!(content.lines().any(|l| l == ".env"));
        assert!(content.lines().any(|l| l == MANIFEST_FILE));
    }

    #[test]
    fn test_ensure_gitignore_appends_missing_entries() {
        let dir = TempDir::new().unwrap();
        let gitignore = dir.path().join(".gitignore");
        fs::write(&gitignore, "node_modules/\n").unwrap();

        assert_eq!(ensure_gitignore(dir.path()).unwrap(), GitignoreChange::Updated);
        let content = fs::read_to_string(&gitignore).unwrap();
        assert!(content.starts_with("node_modules/\n"));
        assert!(content.lines().any(|l| l == ".env"));
        assert!(content.lines().any(|l| l == MANIFEST_FILE));

        assert_eq!(ensure_gitignore(dir.path()).unwrap(), GitignoreChange::Unchanged);
        assert_eq!(fs::read_to_string(&gitignore).unwrap(), content);
    }

    #[test]
    fn test_ensure_gitignore_only_adds_what_is_missing() {
        let dir = TempDir::new().unwrap();
        let gitignore = dir.path().join(".gitignore");
        fs::write(&gitignore, ".env\n").unwrap();

        ensure_gitignore(dir.path()).unwrap();
        let content = fs::read_to_string(&gitignore).unwrap();
        assert_eq!(content.matches(".env").count(), 1);
        assert_eq!(content.matches(MANIFEST_FILE).count(), 1);
    }

    #[test]
    fn test_find_missing_or_corrupt() {
        let dir = TempDir::new().unwrap();
        assert_eq!(ProjectManifest::find(dir.path()), None);

        fs::write(dir.path().join(MANIFEST_FILE), "{ broken").unwrap();
        assert_eq!(ProjectManifest::find(dir.path()), None);
    }

    #[test]
    fn test_save_appends_to_gitignore_once() {
        let dir = TempDir::new().unwrap();
        let gitignore = dir.path().join(".gitignore");
        fs::write(&gitignore, "node_modules/\n").unwrap();

        manifest().save(dir.path()).unwrap();
        manifest().save(dir.path()).unwrap();

        let content = fs::read_to_string(&gitignore).unwrap();
        assert_eq!(content.matches(MANIFEST_FILE).count(), 1);
    }

    #[test]
    fn test_save_does_not_create_gitignore() {
        let dir = TempDir::new().unwrap();
        manifest().save(dir.path()).unwrap();
        assert!(!dir.path().join(".gitignore").exists());
    }

    #[test]
    fn test_archive_subfolder_only_for_build_projects() {
        let mut m = manifest();
        m.build_folder = Some("dist".into());
        assert_eq!(m.archive_subfolder(), None);

        m.website_type = BUILD_WEBSITE_TYPE.into();
        assert_eq!(m.archive_subfolder(), Some("dist"));
    }
}
