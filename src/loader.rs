//! This module provides the `TableLoader` struct, responsible for loading source
//! transition tables from files and strings.

use crate::parser::parse;
use crate::table::Table;
use crate::types::ConversionError;
use std::fs;
use std::path::{Path, PathBuf};

/// `TableLoader` is a utility struct for loading source transition tables.
/// It provides methods to load tables from individual files, from string content,
/// and to discover and load all `.tm` files within a specified directory.
pub struct TableLoader;

impl TableLoader {
    /// Loads a single transition table from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the `.tm` file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Table)` if the file is successfully read and parsed into a `Table`.
    /// * `Err(ConversionError::FileError)` if the file cannot be read.
    /// * `Err(ConversionError::ParseError)` or `Err(ConversionError::MalformedInput)`
    ///   if the file content is not a valid table.
    pub fn load_table(path: &Path) -> Result<Table, ConversionError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConversionError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single transition table from the provided string content.
    ///
    /// This is useful for parsing tables that are not stored in files, e.g., from
    /// user input.
    pub fn load_table_from_string(content: &str) -> Result<Table, ConversionError> {
        parse(content)
    }

    /// Loads all valid transition table files (`.tm` extension) from a given directory.
    ///
    /// It iterates through the directory, attempts to load each `.tm` file, and
    /// collects the results. Directories and non-`.tm` files are skipped.
    ///
    /// # Arguments
    ///
    /// * `directory` - A reference to the `Path` of the directory to scan for tables.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Table), ConversionError>>` - A vector where each
    ///   element is a `Result` indicating whether a table was successfully loaded
    ///   (containing its path and the `Table` itself) or if an error occurred
    ///   during loading (containing a `ConversionError`).
    pub fn load_tables(directory: &Path) -> Vec<Result<(PathBuf, Table), ConversionError>> {
        if !directory.exists() {
            return vec![Err(ConversionError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(ConversionError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(ConversionError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.tm files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "tm") {
                    return None;
                }

                match Self::load_table(&path) {
                    Ok(table) => Some(Ok((path, table))),
                    Err(e) => Some(Err(ConversionError::FileError(format!(
                        "Failed to load table from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");

        let content = "; sample\nA _ 1 r A\nA 1 1 l halt\n";

        let mut file = File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let result = TableLoader::load_table(&file_path);
        assert!(result.is_ok());

        let table = result.unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.states(), ["A"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = TableLoader::load_table(&dir.path().join("missing.tm"));
        assert!(matches!(result, Err(ConversionError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"A _ 1\n").unwrap();

        let result = TableLoader::load_table(&file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_tables_from_directory() {
        let dir = tempdir().unwrap();

        // Create a valid table file
        let valid_path = dir.path().join("valid.tm");
        let mut valid_file = File::create(&valid_path).unwrap();
        valid_file
            .write_all(b"A _ 1 r A\nA 1 1 l halt\n")
            .unwrap();

        // Create an invalid table file
        let invalid_path = dir.path().join("invalid.tm");
        let mut invalid_file = File::create(&invalid_path).unwrap();
        invalid_file.write_all(b"not a table\n").unwrap();

        // Create a non-.tm file that should be ignored
        let ignored_path = dir.path().join("ignored.txt");
        let mut ignored_file = File::create(&ignored_path).unwrap();
        ignored_file.write_all(b"A _ 1 r A\n").unwrap();

        let results = TableLoader::load_tables(dir.path());

        // We should have 2 results: 1 success and 1 error
        assert_eq!(results.len(), 2);

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        let error_count = results.iter().filter(|r| r.is_err()).count();

        assert_eq!(success_count, 1);
        assert_eq!(error_count, 1);
    }

    #[test]
    fn test_load_tables_missing_directory() {
        let dir = tempdir().unwrap();
        let results = TableLoader::load_tables(&dir.path().join("nowhere"));

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
