//! Face id to person name table built from the `[Contacts2]` section.
//!
//! ```text
//! [Contacts2]
//! 1e85e978a76ab144=Fname1 Lname1;;
//! 2b4c9bd7e3dafa35=Fname2 Lname2;;
//! ```

use std::collections::HashMap;

use super::ini::PicasaIni;
use crate::config::EmbedConfig;

pub const CONTACTS_SECTION: &str = "Contacts2";

/// Face id Picasa assigns to every face it could not attach to a person.
pub const UNKNOWN_FACE_ID: &str = "ffffffffffffffff";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactTable {
    names: HashMap<String, String>,
}

impl ContactTable {
    /// Build the table from a parsed index file.
    ///
    /// The second value is `false` when the index has no contacts section,
    /// in which case only the unknown-face entry (if enabled) is present.
    pub fn from_ini(ini: &PicasaIni, config: &EmbedConfig) -> (Self, bool) {
        let mut table = Self::default();

        // Kept so unknown people stay searchable in the written tags
        if config.write_unknown_faces {
            table.insert(UNKNOWN_FACE_ID, &config.unknown_face_name);
        }

        let Some(section) = ini.section(CONTACTS_SECTION) else {
            return (table, false);
        };

        // Sections iterate in sorted key order, so among ids differing only in
        // case the lowercase spelling is inserted last and wins
        for (face_id, raw_name) in section {
            table.insert(face_id, strip_contact_name(raw_name));
        }

        (table, true)
    }

    pub fn insert(&mut self, face_id: &str, name: &str) {
        self.names.insert(normalize_face_id(face_id), name.to_string());
    }

    pub fn name(&self, face_id: &str) -> Option<&str> {
        self.names.get(&normalize_face_id(face_id)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Drop the trailing `;` terminators from a contact value.
pub fn strip_contact_name(raw: &str) -> &str {
    raw.trim_end_matches(';')
}

/// Face ids are hex and compared case-insensitively.
pub fn normalize_face_id(face_id: &str) -> String {
    face_id.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_contact_name() {
        assert_eq!(strip_contact_name("Name;;"), "Name");
        assert_eq!(strip_contact_name("Name"), "Name");
        assert_eq!(strip_contact_name(";;;"), "");
        assert_eq!(strip_contact_name("A;B;;"), "A;B");
    }

    #[test]
    fn test_from_ini() {
        let ini = PicasaIni::parse("[Contacts2]\nabc123=Jane Doe;;\nDEF456=John Roe;;\n");
        let (table, found) = ContactTable::from_ini(&ini, &EmbedConfig::default());

        assert!(found);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name("abc123"), Some("Jane Doe"));
        assert_eq!(table.name("def456"), Some("John Roe"));
        assert_eq!(table.name("ABC123"), Some("Jane Doe"));
        assert_eq!(table.name(UNKNOWN_FACE_ID), None);
    }

    #[test]
    fn test_case_variant_ids_resolve_deterministically() {
        let ini = PicasaIni::parse("[Contacts2]\nabc123=Lower;;\nABC123=Upper;;\n");
        let (table, _) = ContactTable::from_ini(&ini, &EmbedConfig::default());

        assert_eq!(table.len(), 1);
        assert_eq!(table.name("abc123"), Some("Lower"));

        let reordered = PicasaIni::parse("[Contacts2]\nABC123=Upper;;\nabc123=Lower;;\n");
        let (table, _) = ContactTable::from_ini(&reordered, &EmbedConfig::default());
        assert_eq!(table.name("ABC123"), Some("Lower"));
    }

    #[test]
    fn test_missing_section() {
        let ini = PicasaIni::parse("[a.jpg]\ncaption=x\n");
        let (table, found) = ContactTable::from_ini(&ini, &EmbedConfig::default());

        assert!(!found);
        assert!(table.is_empty());
    }

    #[test]
    fn test_unknown_face_entry() {
        let config = EmbedConfig {
            write_unknown_faces: true,
            ..EmbedConfig::default()
        };
        let ini = PicasaIni::parse("");
        let (table, found) = ContactTable::from_ini(&ini, &config);

        assert!(!found);
        assert_eq!(table.name(UNKNOWN_FACE_ID), Some("Unknown"));
    }
}
