use super::metadata::model_identity;
use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A result table discovered on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    /// Model identity derived from the file name
    pub identity: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Which files in a directory count as result tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFilter {
    /// Every `.csv` file
    AnyCsv,
    /// `.csv` files whose name mentions `evaluation` (the selectable model list)
    Evaluation,
}

impl TableFilter {
    fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        if !lower.ends_with(".csv") {
            return false;
        }
        match self {
            TableFilter::AnyCsv => true,
            TableFilter::Evaluation => lower.contains("evaluation"),
        }
    }
}

/// Discover result tables directly inside `root` (not recursive), sorted by file name.
///
/// A missing or unreadable directory is an error; unreadable entries and
/// files whose name yields an empty identity are skipped.
pub fn discover_tables(root: &Path, filter: TableFilter) -> Result<Vec<TableSource>> {
    if !root.is_dir() {
        return Err(crate::error::RagdashError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("result directory not found: {}", root.display()),
        )));
    }

    let mut tables = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !filter.accepts(&file_name) {
            continue;
        }
        let identity = model_identity(&file_name);
        if identity.is_empty() {
            log::debug!("Skipping {}: no model name", path.display());
            continue;
        }
        tables.push(TableSource {
            identity,
            file_name,
            path: path.to_path_buf(),
        });
    }

    log::debug!("Discovered {} result tables in {}", tables.len(), root.display());
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_tables() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("llama_evaluation_results.csv"), "a\n").unwrap();
        fs::write(root.join("Falcon_evaluation_results.csv"), "a\n").unwrap();
        fs::write(root.join("scratch.csv"), "a\n").unwrap();
        fs::write(root.join("Mistral.CSV"), "a\n").unwrap();
        fs::write(root.join("_evaluation_results.csv"), "a\n").unwrap();
        fs::write(root.join(".csv"), "a\n").unwrap();
        fs::write(root.join("readme.md"), "# Results").unwrap();
        fs::write(root.join("nested/mistral_evaluation_results.csv"), "a\n").unwrap();

        let all = discover_tables(root, TableFilter::AnyCsv).unwrap();
        let identities: Vec<&str> = all.iter().map(|t| t.identity.as_str()).collect();
        assert_eq!(identities, vec!["falcon", "mistral", "llama", "scratch"]);

        let models = discover_tables(root, TableFilter::Evaluation).unwrap();
        assert_eq!(models.len(), 2);
        assert!(models.iter().all(|t| t.file_name.contains("evaluation")));
    }

    #[test]
    fn test_discover_tables_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(discover_tables(&temp_dir.path().join("absent"), TableFilter::AnyCsv).is_err());
    }
}
