use crate::table::Table;
use crate::types::ConversionError;

use std::sync::RwLock;

// Default embedded sample tables
const TABLE_TEXTS: [(&str, &str); 3] = [
    ("invert", include_str!("../tables/invert.tm")),
    ("triad", include_str!("../tables/triad.tm")),
    ("hexrot", include_str!("../tables/hexrot.tm")),
];

lazy_static::lazy_static! {
    pub static ref TABLES: RwLock<Vec<(String, Table)>> = RwLock::new(Vec::new());
}

pub struct TableManager;

impl TableManager {
    /// Initialize the TableManager with the embedded sample tables
    pub fn load() -> Result<(), ConversionError> {
        let mut tables = Vec::new();

        for (name, text) in TABLE_TEXTS {
            if let Ok(table) = crate::parser::parse(text) {
                tables.push((name.to_string(), table));
            } else {
                eprintln!("Failed to parse sample table {}", name);
            }
        }

        if let Ok(mut write_guard) = TABLES.write() {
            *write_guard = tables;
        } else {
            return Err(ConversionError::FileError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the number of available sample tables
    pub fn count() -> usize {
        // Initialize with the embedded tables if not already initialized
        let _ = Self::load();

        TABLES.read().map(|tables| tables.len()).unwrap_or(0)
    }

    /// Get a sample table by its index
    pub fn by_index(index: usize) -> Result<Table, ConversionError> {
        // Initialize with the embedded tables if not already initialized
        let _ = Self::load();

        TABLES
            .read()
            .map_err(|_| ConversionError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| {
                ConversionError::MalformedInput(format!("Sample index {} out of range", index))
            })
    }

    /// Get a sample table by its name
    pub fn by_name(name: &str) -> Result<Table, ConversionError> {
        // Initialize with the embedded tables if not already initialized
        let _ = Self::load();

        TABLES
            .read()
            .map_err(|_| ConversionError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|(table_name, _)| table_name == name)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| {
                ConversionError::MalformedInput(format!("Sample table '{}' not found", name))
            })
    }

    /// List all sample table names
    pub fn names() -> Vec<String> {
        // Initialize with the embedded tables if not already initialized
        let _ = Self::load();

        TABLES
            .read()
            .map(|tables| tables.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_samples_parse() {
        TableManager::load().unwrap();
        assert_eq!(TableManager::count(), TABLE_TEXTS.len());
    }

    #[test]
    fn test_by_name() {
        let table = TableManager::by_name("triad").unwrap();
        assert_eq!(table.stats(), (2, 3, 1));

        assert!(TableManager::by_name("missing").is_err());
    }

    #[test]
    fn test_by_index() {
        let table = TableManager::by_index(0).unwrap();
        assert_eq!(table.states(), ["A"]);

        assert!(TableManager::by_index(99).is_err());
    }

    #[test]
    fn test_names() {
        let names = TableManager::names();
        assert_eq!(names, ["invert", "triad", "hexrot"]);
    }

    #[test]
    fn test_samples_convert() {
        for name in TableManager::names() {
            let table = TableManager::by_name(&name).unwrap();
            let reduction = crate::synthesizer::convert(&table, 2).unwrap();
            assert!(!reduction.is_empty());
        }
    }
}
