//! Handlers for `nova config`: reusable plaintext configuration files.

use std::fmt;
use std::path::Path;

use crate::db::{ConfigInput, ConfigSummary, Repository};
use crate::error::Result;
use crate::utils::{edit_in_editor, render_table};

/// What happened to one config item. Displayed verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOutcome {
    Cloned(String),
    UnknownShorthand(String),
    WriteFailed(String),
    NoShorthands,
    Added { shorthand: String, filename: String },
    ShorthandExists(String),
    FilenameExists(String),
    Removed(String),
    Updated(String),
    NoChanges(String),
}

impl fmt::Display for ConfigOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOutcome::Cloned(filename) => write!(f, "Cloned file: {}", filename),
            ConfigOutcome::UnknownShorthand(s) => write!(f, "Unknown config shorthand: {}", s),
            ConfigOutcome::WriteFailed(filename) => write!(f, "Unable to write file: {}", filename),
            ConfigOutcome::NoShorthands => write!(f, "Please provide some shorthands to clone"),
            ConfigOutcome::Added {
                shorthand,
                filename,
            } => write!(
                f,
                "Added config \"{}\" which expands to \"{}\"",
                shorthand, filename
            ),
            ConfigOutcome::ShorthandExists(s) => write!(f, "Shorthand already exists: {}", s),
            ConfigOutcome::FilenameExists(filename) => {
                write!(f, "Filename already exists: {}", filename)
            }
            ConfigOutcome::Removed(s) => write!(f, "Removed config: {}", s),
            ConfigOutcome::Updated(filename) => write!(f, "Updated config: {}", filename),
            ConfigOutcome::NoChanges(filename) => write!(f, "No changes made to file: {}", filename),
        }
    }
}

fn report(outcome: ConfigOutcome) -> ConfigOutcome {
    println!("{}", outcome);
    outcome
}

/// Handle `nova config clone <shorthand...>`.
///
/// Items are processed left to right and independently: an unknown shorthand
/// or a failed write is reported and the rest still run.
pub async fn handle_config_clone(
    repo: &Repository,
    cwd: &Path,
    shorthands: &[String],
) -> Result<Vec<ConfigOutcome>> {
    if shorthands.is_empty() {
        return Ok(vec![report(ConfigOutcome::NoShorthands)]);
    }

    let mut outcomes = Vec::with_capacity(shorthands.len());
    for shorthand in shorthands {
        let outcome = match repo.find_config_by_shorthand(shorthand)? {
            None => ConfigOutcome::UnknownShorthand(shorthand.clone()),
            Some(config) => {
                let target = cwd.join(&config.filename);
                match tokio::fs::write(&target, config.content.as_bytes()).await {
                    Ok(()) => ConfigOutcome::Cloned(config.filename),
                    Err(e) => {
                        tracing::warn!(path = %target.display(), "write failed: {}", e);
                        ConfigOutcome::WriteFailed(config.filename)
                    }
                }
            }
        };
        outcomes.push(report(outcome));
    }

    Ok(outcomes)
}

/// Handle `nova config list`.
pub async fn handle_config_list(repo: &Repository) -> Result<Vec<ConfigSummary>> {
    let configs = repo.list_configs()?;

    if configs.is_empty() {
        println!("No configs stored");
        return Ok(configs);
    }

    let rows: Vec<Vec<String>> = configs
        .iter()
        .map(|c| vec![c.shorthand.clone(), c.filename.clone()])
        .collect();
    println!("{}", render_table(&["Shorthand", "Filename"], &rows));

    Ok(configs)
}

/// Handle `nova config add <shorthand> <filename>`.
///
/// Uses the file's current content when it can be read, otherwise stores an
/// empty config to be filled in with `config edit`.
pub async fn handle_config_add(
    repo: &Repository,
    cwd: &Path,
    shorthand: &str,
    filename: &str,
) -> Result<ConfigOutcome> {
    if repo.find_config_by_shorthand(shorthand)?.is_some() {
        return Ok(report(ConfigOutcome::ShorthandExists(shorthand.to_string())));
    }
    if repo.find_config_by_filename(filename)?.is_some() {
        return Ok(report(ConfigOutcome::FilenameExists(filename.to_string())));
    }

    let content = match tokio::fs::read_to_string(cwd.join(filename)).await {
        Ok(content) => content,
        Err(_) => {
            tracing::warn!("Could not read file data: {}", filename);
            String::new()
        }
    };

    let stored = repo.upsert_config(&ConfigInput {
        filename: filename.to_string(),
        shorthand: shorthand.to_string(),
        content,
    })?;

    Ok(report(ConfigOutcome::Added {
        shorthand: stored.shorthand,
        filename: stored.filename,
    }))
}

/// Handle `nova config remove <shorthand>`.
pub async fn handle_config_remove(repo: &Repository, shorthand: &str) -> Result<ConfigOutcome> {
    let outcome = match repo.delete_configs_by_shorthand(shorthand)? {
        0 => ConfigOutcome::UnknownShorthand(shorthand.to_string()),
        _ => ConfigOutcome::Removed(shorthand.to_string()),
    };
    Ok(report(outcome))
}

/// Handle `nova config edit <shorthand>`: open the stored content in `editor`
/// and save it back if it changed.
pub async fn handle_config_edit(
    repo: &Repository,
    editor: &str,
    shorthand: &str,
) -> Result<ConfigOutcome> {
    let Some(config) = repo.find_config_by_shorthand(shorthand)? else {
        return Ok(report(ConfigOutcome::UnknownShorthand(shorthand.to_string())));
    };

    let edited = edit_in_editor(editor, &config.filename, &config.content)?;
    if edited == config.content {
        return Ok(report(ConfigOutcome::NoChanges(config.filename)));
    }

    let stored = repo.upsert_config(&ConfigInput {
        filename: config.filename,
        shorthand: config.shorthand,
        content: edited,
    })?;
    Ok(report(ConfigOutcome::Updated(stored.filename)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_db;
    use std::path::PathBuf;

    fn setup() -> (Repository, PathBuf) {
        let cwd = std::env::temp_dir().join(format!("nova_configs_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&cwd).unwrap();
        (Repository::new(init_memory_db().unwrap()), cwd)
    }

    #[tokio::test]
    async fn test_clone_without_arguments() {
        let (repo, cwd) = setup();
        let outcomes = handle_config_clone(&repo, &cwd, &[]).await.unwrap();
        assert_eq!(outcomes, vec![ConfigOutcome::NoShorthands]);
    }

    #[tokio::test]
    async fn test_add_reads_file_when_present() {
        let (repo, cwd) = setup();
        std::fs::write(cwd.join(".prettierrc"), "{\"semi\": false}").unwrap();

        let outcome = handle_config_add(&repo, &cwd, "prettier", ".prettierrc")
            .await
            .unwrap();
        assert_eq!(
            outcome.to_string(),
            "Added config \"prettier\" which expands to \".prettierrc\""
        );

        let stored = repo.find_config_by_shorthand("prettier").unwrap().unwrap();
        assert_eq!(stored.content, "{\"semi\": false}");
    }

    #[tokio::test]
    async fn test_add_missing_file_stores_empty_content() {
        let (repo, cwd) = setup();
        handle_config_add(&repo, &cwd, "ts", "tsconfig.json").await.unwrap();

        let stored = repo.find_config_by_shorthand("ts").unwrap().unwrap();
        assert_eq!(stored.content, "");
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates() {
        let (repo, cwd) = setup();
        handle_config_add(&repo, &cwd, "ts", "tsconfig.json").await.unwrap();

        assert_eq!(
            handle_config_add(&repo, &cwd, "ts", "other.json").await.unwrap(),
            ConfigOutcome::ShorthandExists("ts".to_string())
        );
        assert_eq!(
            handle_config_add(&repo, &cwd, "tsc", "tsconfig.json")
                .await
                .unwrap(),
            ConfigOutcome::FilenameExists("tsconfig.json".to_string())
        );
        assert_eq!(repo.list_configs().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let (repo, cwd) = setup();
        handle_config_add(&repo, &cwd, "ts", "tsconfig.json").await.unwrap();

        assert_eq!(
            handle_config_remove(&repo, "ts").await.unwrap(),
            ConfigOutcome::Removed("ts".to_string())
        );
        assert_eq!(
            handle_config_remove(&repo, "ts").await.unwrap(),
            ConfigOutcome::UnknownShorthand("ts".to_string())
        );
    }

    #[tokio::test]
    async fn test_edit_unknown_shorthand() {
        let (repo, _cwd) = setup();
        assert_eq!(
            handle_config_edit(&repo, "true", "nope").await.unwrap(),
            ConfigOutcome::UnknownShorthand("nope".to_string())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_without_changes() {
        let (repo, cwd) = setup();
        std::fs::write(cwd.join(".editorconfig"), "root = true\n").unwrap();
        handle_config_add(&repo, &cwd, "ec", ".editorconfig").await.unwrap();

        // `true` exits immediately without touching the file
        assert_eq!(
            handle_config_edit(&repo, "true", "ec").await.unwrap(),
            ConfigOutcome::NoChanges(".editorconfig".to_string())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_edit_saves_changed_content() {
        use std::os::unix::fs::PermissionsExt;

        let (repo, cwd) = setup();
        std::fs::write(cwd.join(".editorconfig"), "root = true\n").unwrap();
        handle_config_add(&repo, &cwd, "ec", ".editorconfig").await.unwrap();

        // Editor that overwrites whatever file it is given
        let editor = cwd.join("fake-editor.sh");
        std::fs::write(&editor, "#!/bin/sh\nprintf 'root = false\\n' > \"$1\"\n").unwrap();
        std::fs::set_permissions(&editor, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(
            handle_config_edit(&repo, &editor.to_string_lossy(), "ec")
                .await
                .unwrap(),
            ConfigOutcome::Updated(".editorconfig".to_string())
        );

        let stored = repo.find_config_by_shorthand("ec").unwrap().unwrap();
        assert_eq!(stored.content, "root = false\n");
        assert_eq!(stored.filename, ".editorconfig");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (repo, _cwd) = setup();
        assert!(handle_config_list(&repo).await.unwrap().is_empty());
    }
}
