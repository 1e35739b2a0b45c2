//! JSON metadata snapshot written next to a compiled library.
//!
//! Layout: `{"assembly": "...", "types": [<TypeInfo> | null, ...]}`. Entries
//! that are `null` or fail to decode stand for types the extractor could not
//! resolve; they are counted, not fatal.

use super::{MetadataProvider, TypeInfo};
use crate::error::{CheckError, PartialMetadataLoad};
use serde::Deserialize;
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of the snapshot, replacing the library's own.
pub const SNAPSHOT_EXTENSION: &str = "api.json";

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    assembly: Option<String>,
    #[serde(default)]
    types: Vec<Json>,
}

/// `MetadataProvider` backed by a decoded snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    assembly: String,
    resolved: Vec<TypeInfo>,
    unresolved: usize,
}

/// Snapshot path for a library: `bin/Acme.dll` -> `bin/Acme.api.json`.
pub fn snapshot_path_for(library: &Path) -> PathBuf {
    library.with_extension(SNAPSHOT_EXTENSION)
}

impl SnapshotProvider {
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let data = fs::read_to_string(path).map_err(|e| CheckError::MetadataUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&data, path)
    }

    /// Decode snapshot text; `origin` is only used for error messages and as
    /// the fallback assembly name.
    pub fn parse(data: &str, origin: &Path) -> Result<Self, CheckError> {
        let raw: RawSnapshot =
            serde_json::from_str(data).map_err(|e| CheckError::MetadataUnavailable {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut resolved = Vec::with_capacity(raw.types.len());
        let mut unresolved = 0usize;
        for entry in raw.types {
            if entry.is_null() {
                unresolved += 1;
                continue;
            }
            match serde_json::from_value::<TypeInfo>(entry) {
                Ok(t) => resolved.push(t),
                Err(e) => {
                    log::debug!("Unresolvable type entry in {}: {e}", origin.display());
                    unresolved += 1;
                }
            }
        }

        let assembly = raw.assembly.unwrap_or_else(|| {
            origin
                .file_name()
                .map(|n| n.to_string_lossy().trim_end_matches(".api.json").to_string())
                .unwrap_or_default()
        });

        Ok(SnapshotProvider {
            assembly,
            resolved,
            unresolved,
        })
    }
}

impl MetadataProvider for SnapshotProvider {
    fn assembly_name(&self) -> &str {
        &self.assembly
    }

    fn types(&self) -> Result<Vec<TypeInfo>, PartialMetadataLoad> {
        if self.unresolved > 0 {
            Err(PartialMetadataLoad {
                resolved: self.resolved.clone(),
                unresolved: self.unresolved,
            })
        } else {
            Ok(self.resolved.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TypeRef;
    use tempfile::tempdir;

    #[test]
    fn test_snapshot_path_replaces_library_extension() {
        assert_eq!(
            snapshot_path_for(Path::new("bin/Acme.Core.dll")),
            PathBuf::from("bin/Acme.Core.api.json")
        );
    }

    #[test]
    fn test_load_snapshot_with_members() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Acme.api.json");
        fs::write(
            &path,
            r#"{
  "assembly": "Acme, Version=1.0.0.0",
  "types": [
    {
      "namespace": "Acme",
      "name": "Widget",
      "constructors": [
        {"name": ".ctor", "parameters": [
          {"name": "size", "type": {"kind": "named", "namespace": "System", "name": "Int32"}}
        ]}
      ],
      "properties": [
        {"name": "Size", "getter": {"visibility": "public"}}
      ]
    }
  ]
}"#,
        )
        .unwrap();

        let p = SnapshotProvider::load(&path).unwrap();
        assert_eq!(p.assembly_name(), "Acme, Version=1.0.0.0");
        let types = p.types().unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(
            types[0].constructors[0].parameters[0].ty,
            TypeRef::named("System", "Int32")
        );
        assert_eq!(types[0].public_properties().count(), 1);
    }

    #[test]
    fn test_null_and_broken_entries_yield_partial_load() {
        let data = r#"{"types": [null, {"namespace": "Acme", "name": "Ok"}, {"bogus": true}]}"#;
        let p = SnapshotProvider::parse(data, Path::new("Acme.api.json")).unwrap();
        assert_eq!(p.assembly_name(), "Acme");
        let err = p.types().unwrap_err();
        assert_eq!(err.unresolved, 2);
        assert_eq!(err.resolved.len(), 1);
        assert_eq!(err.resolved[0].name, "Ok");
    }

    #[test]
    fn test_missing_or_invalid_snapshot_is_unavailable() {
        let dir = tempdir().unwrap();
        let missing = SnapshotProvider::load(&dir.path().join("none.api.json"));
        assert!(matches!(
            missing,
            Err(CheckError::MetadataUnavailable { .. })
        ));
        let invalid = SnapshotProvider::parse("not json", Path::new("x.api.json"));
        assert!(matches!(
            invalid,
            Err(CheckError::MetadataUnavailable { .. })
        ));
    }
}
