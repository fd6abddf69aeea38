use crate::error::RepositoryError;
use crate::field_id::{make_id, type_of};
use crate::types::{FieldId, FieldType, TYPE_BASE};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use smol_str::SmolStr;
use std::path::Path;
use tracing::{debug, warn};

// ─── Table format ───────────────────────────────────────────────────────────
//
//  {
//    "groups": [
//      { "base": 1000,
//        "fields": [ { "id": 1, "name": "CUSTOMER_NAME", "type": "string" } ] }
//    ]
//  }
//
//  Resulting id = make_id(type, base + id).

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    groups: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    #[serde(default)]
    base: i64,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    id: i64,
    name: SmolStr,
    #[serde(rename = "type")]
    field_type: String,
}

// ─── FieldRepository ────────────────────────────────────────────────────────

/// Name ↔ id lookup table. Built explicitly and handed to whatever needs
/// name resolution; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct FieldRepository {
    by_name: FxHashMap<SmolStr, FieldId>,
    by_id: FxHashMap<FieldId, SmolStr>,
}

impl FieldRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table file. Bad entries are logged and skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let repository = Self::from_json_str(&text)?;
        debug!(path = %path.display(), fields = repository.len(), "field table loaded");
        Ok(repository)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RepositoryError> {
        let table: TableFile = serde_json::from_str(json)?;
        let mut repository = Self::new();
        for group in table.groups {
            for field in group.fields {
                let field_type = match field.field_type.parse::<FieldType>() {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(name = %field.name, error = %e, "skipping field");
                        continue;
                    }
                };
                if field.id <= 0 {
                    warn!(name = %field.name, id = field.id, "skipping field with non-positive id");
                    continue;
                }
                // The relative id must stay below TYPE_BASE or it bleeds into the type bits.
                let relative = match group.base.checked_add(field.id) {
                    Some(relative) if relative > 0 && relative < TYPE_BASE => relative,
                    _ => {
                        warn!(
                            name = %field.name,
                            base = group.base,
                            id = field.id,
                            "skipping field with out-of-range id"
                        );
                        continue;
                    }
                };
                let id = make_id(field_type, relative);
                if let Err(e) = repository.insert(field.name.clone(), id) {
                    warn!(name = %field.name, id, error = %e, "skipping field");
                }
            }
        }
        Ok(repository)
    }

    /// Register a single field.
    pub fn insert(&mut self, name: SmolStr, id: FieldId) -> Result<(), RepositoryError> {
        type_of(id).map_err(RepositoryError::InvalidId)?;
        if self.by_name.contains_key(&name) {
            return Err(RepositoryError::DuplicateName(name));
        }
        if self.by_id.contains_key(&id) {
            return Err(RepositoryError::DuplicateId(id));
        }
        self.by_id.insert(id, name.clone());
        self.by_name.insert(name, id);
        Ok(())
    }

    #[inline]
    pub fn name_to_id(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn id_to_name(&self, id: FieldId) -> Option<&str> {
        self.by_id.get(&id).map(SmolStr::as_str)
    }

    pub fn name_to_type(&self, name: &str) -> Option<FieldType> {
        self.name_to_id(name).and_then(|id| type_of(id).ok())
    }

    #[inline]
    pub fn type_to_name(field_type: FieldType) -> &'static str {
        field_type.name()
    }

    #[inline]
    pub fn name_of_type(name: &str) -> Option<FieldType> {
        name.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = r#"{
        "groups": [
            { "base": 1000,
              "fields": [
                { "id": 1, "name": "CUSTOMER_NAME", "type": "string" },
                { "id": 2, "name": "CUSTOMER_AGE", "type": "short" },
                { "id": 3, "name": "BROKEN", "type": "decimal" },
                { "id": 0, "name": "ZERO", "type": "long" },
                { "id": 4, "name": "CUSTOMER_NAME", "type": "long" }
              ] },
            { "fields": [ { "id": 7, "name": "BLOB", "type": "binary" } ] }
        ]
    }"#;

    #[test]
    fn test_lookup_both_ways() {
        let repo = FieldRepository::from_json_str(TABLE).unwrap();
        let id = repo.name_to_id("CUSTOMER_NAME").unwrap();
        assert_eq!(id, 6 * TYPE_BASE + 1001);
        assert_eq!(repo.id_to_name(id), Some("CUSTOMER_NAME"));
        assert_eq!(repo.name_to_type("CUSTOMER_AGE"), Some(FieldType::Short));
        assert_eq!(repo.name_to_id("BLOB"), Some(7 * TYPE_BASE + 7));
    }

    #[test]
    fn test_bad_entries_skipped() {
        let repo = FieldRepository::from_json_str(TABLE).unwrap();
        assert_eq!(repo.len(), 3);
        assert_eq!(repo.name_to_id("BROKEN"), None);
        assert_eq!(repo.name_to_id("ZERO"), None);
        // duplicate name keeps the first registration
        assert_eq!(repo.name_to_type("CUSTOMER_NAME"), Some(FieldType::String));
    }

    #[test]
    fn test_out_of_range_ids_skipped() {
        let table = format!(
            r#"{{
                "groups": [
                    {{ "base": {TYPE_BASE}, "fields": [ {{ "id": 1, "name": "WRAPS", "type": "string" }} ] }},
                    {{ "base": {max}, "fields": [ {{ "id": 1, "name": "OVERFLOWS", "type": "long" }} ] }},
                    {{ "base": -50, "fields": [ {{ "id": 10, "name": "NEGATIVE", "type": "short" }} ] }},
                    {{ "base": 10, "fields": [ {{ "id": 5, "name": "KEPT", "type": "char" }} ] }}
                ]
            }}"#,
            max = i64::MAX
        );
        let repo = FieldRepository::from_json_str(&table).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.name_to_id("WRAPS"), None);
        assert_eq!(repo.name_to_id("OVERFLOWS"), None);
        assert_eq!(repo.name_to_id("NEGATIVE"), None);
        assert_eq!(repo.name_to_type("KEPT"), Some(FieldType::Char));
    }

    #[test]
    fn test_insert_rejects_duplicates_and_bad_ids() {
        let mut repo = FieldRepository::new();
        let id = make_id(FieldType::Long, 5);
        repo.insert(SmolStr::new("A"), id).unwrap();
        assert!(matches!(
            repo.insert(SmolStr::new("A"), make_id(FieldType::Long, 6)),
            Err(RepositoryError::DuplicateName(name)) if name.as_str() == "A"
        ));
        assert!(matches!(
            repo.insert(SmolStr::new("B"), id),
            Err(RepositoryError::DuplicateId(dup)) if dup == id
        ));
        assert!(matches!(
            repo.insert(SmolStr::new("C"), 0),
            Err(RepositoryError::InvalidId(_))
        ));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldRepository::type_to_name(FieldType::Double), "double");
        assert_eq!(FieldRepository::name_of_type("char"), Some(FieldType::Char));
        assert_eq!(FieldRepository::name_of_type("int"), None);
    }

    #[test]
    fn test_invalid_json_is_loader_error() {
        assert!(matches!(
            FieldRepository::from_json_str("{ not json"),
            Err(RepositoryError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(TABLE.as_bytes())?;
        let repo = FieldRepository::load(file.path())?;
        assert_eq!(repo.len(), 3);
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            FieldRepository::load("/nonexistent/field/table.json"),
            Err(RepositoryError::Io(_))
        ));
    }
}
