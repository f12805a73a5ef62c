//! Registry of record type declarations.
//!
//! Declarations are serde data and can live as JSON files, one per record
//! type, at `<dir>/record_<name>.json`. Hooks, default factories, and
//! computed fields are code and never round-trip through disk; a loaded
//! declaration carries data-only semantics until hooks are re-attached.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::RecordType;

/// In-memory registry of record types, optionally backed by a directory
/// of declaration files.
pub struct RecordRegistry {
    /// Directory containing declaration files
    record_dir: PathBuf,
    /// Registered record types indexed by name
    records: HashMap<String, RecordType>,
}

impl RecordRegistry {
    /// Creates a registry over the given declaration directory.
    pub fn new(record_dir: &Path) -> Self {
        Self {
            record_dir: record_dir.to_path_buf(),
            records: HashMap::new(),
        }
    }

    /// Returns the declaration directory path.
    pub fn record_dir(&self) -> &Path {
        &self.record_dir
    }

    /// Loads all declaration files from the directory.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.record_dir.exists() {
            fs::create_dir_all(&self.record_dir).map_err(|e| {
                SchemaError::malformed_file(
                    self.record_dir.display().to_string(),
                    format!("failed to create record directory: {}", e),
                )
            })?;
            return Ok(()); // nothing to load
        }

        let entries = fs::read_dir(&self.record_dir).map_err(|e| {
            SchemaError::malformed_file(
                self.record_dir.display().to_string(),
                format!("failed to read record directory: {}", e),
            )
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_file(
                    self.record_dir.display().to_string(),
                    format!("failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_record_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single declaration file.
    fn load_record_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_file(
                path.display().to_string(),
                format!("failed to read file: {}", e),
            )
        })?;

        let record: RecordType = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_file(path.display().to_string(), format!("invalid JSON: {}", e))
        })?;

        record.validate_structure().map_err(|e| {
            SchemaError::malformed_file(path.display().to_string(), e.to_string())
        })?;

        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    /// Registers a record type directly.
    ///
    /// The declaration is structurally validated; registering the same name
    /// twice is rejected.
    pub fn register(&mut self, record: RecordType) -> SchemaResult<()> {
        record.validate_structure()?;

        if self.records.contains_key(&record.name) {
            return Err(SchemaError::DuplicateRecord(record.name.clone()));
        }

        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    /// Gets a record type by name.
    pub fn get(&self, name: &str) -> Option<&RecordType> {
        self.records.get(name)
    }

    /// Checks whether a record type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Returns all registered record types.
    pub fn all_records(&self) -> impl Iterator<Item = &RecordType> {
        self.records.values()
    }

    /// Returns the number of registered record types.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Saves a declaration to disk at the standard location.
    pub fn save_record(&self, record: &RecordType) -> SchemaResult<PathBuf> {
        record.validate_structure()?;

        let filename = format!("record_{}.json", record.name);
        let path = self.record_dir.join(&filename);

        if path.exists() {
            return Err(SchemaError::DuplicateRecord(record.name.clone()));
        }

        if !self.record_dir.exists() {
            fs::create_dir_all(&self.record_dir).map_err(|e| {
                SchemaError::malformed_file(
                    self.record_dir.display().to_string(),
                    format!("failed to create record directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            SchemaError::malformed_file(
                path.display().to_string(),
                format!("failed to serialize declaration: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::malformed_file(
                path.display().to_string(),
                format!("failed to write file: {}", e),
            )
        })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use tempfile::TempDir;

    fn sample_record() -> RecordType {
        RecordType::new(
            "users",
            vec![FieldDef::int("id"), FieldDef::string("name")],
        )
    }

    #[test]
    fn test_register_and_get() {
        let tmp = TempDir::new().unwrap();
        let mut registry = RecordRegistry::new(tmp.path());

        registry.register(sample_record()).unwrap();

        let record = registry.get("users");
        assert!(record.is_some());
        assert_eq!(record.unwrap().name, "users");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut registry = RecordRegistry::new(tmp.path());

        registry.register(sample_record()).unwrap();

        let result = registry.register(sample_record());
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::DuplicateRecord(_)
        ));
    }

    #[test]
    fn test_structurally_invalid_registration_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut registry = RecordRegistry::new(tmp.path());

        let record = RecordType::new(
            "broken",
            vec![FieldDef::string("a"), FieldDef::int("a")],
        );
        assert!(registry.register(record).is_err());
        assert_eq!(registry.record_count(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let registry = RecordRegistry::new(tmp.path());

        registry.save_record(&sample_record()).unwrap();

        let mut registry2 = RecordRegistry::new(tmp.path());
        registry2.load_all().unwrap();

        assert!(registry2.contains("users"));
        assert_eq!(registry2.get("users").unwrap().fields.len(), 2);
    }

    #[test]
    fn test_save_twice_rejected() {
        let tmp = TempDir::new().unwrap();
        let registry = RecordRegistry::new(tmp.path());

        registry.save_record(&sample_record()).unwrap();
        assert!(registry.save_record(&sample_record()).is_err());
    }

    #[test]
    fn test_unknown_record() {
        let tmp = TempDir::new().unwrap();
        let registry = RecordRegistry::new(tmp.path());

        assert!(registry.get("nonexistent").is_none());
        assert!(!registry.contains("nonexistent"));
    }

    #[test]
    fn test_load_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let mut registry = RecordRegistry::new(tmp.path());

        assert!(registry.load_all().is_ok());
        assert_eq!(registry.record_count(), 0);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("record_bad.json"), "{ not json").unwrap();

        let mut registry = RecordRegistry::new(tmp.path());
        let result = registry.load_all();
        assert!(matches!(
            result.unwrap_err(),
            SchemaError::MalformedFile { .. }
        ));
    }
}
