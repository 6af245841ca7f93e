//! Per-image records assembled from the index file sections.
//!
//! ```text
//! [xscan-0173.png]
//! faces=rect64(65723403d3b0e89c),84a18ca5ba06032e;rect64(3d600745f087703),f9ba0eb0b8dbac6a
//! backuphash=14029
//! caption=Jun. 2005
//! keywords=La Villette,Paris,France
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::contacts::{normalize_face_id, ContactTable, UNKNOWN_FACE_ID};
use super::ini::{PicasaIni, Section};
use super::rect::Rectangle;
use crate::config::{EmbedConfig, ScannerConfig};
use crate::diagnostics::Diagnostic;

static FACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rect64\(([^)]+)\),([0-9a-f]+)").expect("valid regex")
});

/// A named face area within one image.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRegion {
    /// Lowercase hex face id, the identity used for deduplication.
    pub face_id: String,
    pub name: String,
    pub rect: Rectangle,
}

/// Everything that gets embedded into one image file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRecord {
    pub caption: String,
    pub keywords: Vec<String>,
    /// In index order. One entry per face id unless duplicates were requested.
    pub faces: Vec<FaceRegion>,
}

impl ImageRecord {
    pub fn is_empty(&self) -> bool {
        self.caption.is_empty() && self.keywords.is_empty() && self.faces.is_empty()
    }
}

/// A face entry as written in the `faces` key, before name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEntry {
    pub face_id: String,
    pub rect: Rectangle,
}

/// Split a `faces=` value into its entries.
///
/// Entries that don't look like `rect64(<hex>),<id>` are skipped so newer
/// Picasa additions don't break parsing.
pub fn parse_faces_line(value: &str) -> Vec<FaceEntry> {
    value
        .split(';')
        .filter_map(|entry| {
            let caps = FACE_RE.captures(entry.trim())?;
            let rect = Rectangle::from_rect64(&caps[1]).ok()?;
            Some(FaceEntry {
                face_id: normalize_face_id(&caps[2]),
                rect,
            })
        })
        .collect()
}

/// Comma separated, each keyword trimmed. Empty items are dropped.
pub fn parse_keywords(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds image records for the sections of a single index file.
pub struct RecordBuilder<'a> {
    index_path: &'a Path,
    contacts: &'a ContactTable,
    config: &'a EmbedConfig,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(index_path: &'a Path, contacts: &'a ContactTable, config: &'a EmbedConfig) -> Self {
        Self {
            index_path,
            contacts,
            config,
        }
    }

    pub fn build(
        &self,
        image_name: &str,
        section: &Section,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ImageRecord {
        let mut record = ImageRecord {
            caption: section.get("caption").cloned().unwrap_or_default(),
            keywords: section
                .get("keywords")
                .map(|value| parse_keywords(value))
                .unwrap_or_default(),
            faces: Vec::new(),
        };

        let Some(faces_value) = section.get("faces") else {
            return record;
        };

        let mut seen = HashSet::new();

        for entry in parse_faces_line(faces_value) {
            if entry.face_id == UNKNOWN_FACE_ID && !self.config.write_unknown_faces {
                continue;
            }

            let Some(name) = self.contacts.name(&entry.face_id) else {
                diagnostics.push(Diagnostic::UnknownFace {
                    index: self.index_path.to_path_buf(),
                    image: image_name.to_string(),
                    face_id: entry.face_id,
                });
                continue;
            };

            if !self.config.write_duplicate_faces && !seen.insert(entry.face_id.clone()) {
                diagnostics.push(Diagnostic::DuplicateFace {
                    index: self.index_path.to_path_buf(),
                    image: image_name.to_string(),
                    face_id: entry.face_id,
                });
                continue;
            }

            record.faces.push(FaceRegion {
                face_id: entry.face_id,
                name: name.to_string(),
                rect: entry.rect,
            });
        }

        record
    }
}

/// Build the records of every image section in an index file, keyed by
/// image file name.
///
/// `file_exists` decides whether the referenced image is still on disk;
/// sections for missing files are skipped with a diagnostic.
pub fn load_image_records<F>(
    ini: &PicasaIni,
    index_path: &Path,
    embed: &EmbedConfig,
    scanner: &ScannerConfig,
    file_exists: F,
    diagnostics: &mut Vec<Diagnostic>,
) -> HashMap<String, ImageRecord>
where
    F: Fn(&Path) -> bool,
{
    let (contacts, has_contacts) = ContactTable::from_ini(ini, embed);
    if !has_contacts {
        diagnostics.push(Diagnostic::NoContacts {
            index: index_path.to_path_buf(),
        });
    }

    let builder = RecordBuilder::new(index_path, &contacts, embed);
    let directory = index_path.parent().unwrap_or_else(|| Path::new(""));
    let mut records = HashMap::new();

    for (image_name, section) in ini.sections() {
        if !scanner.is_image_name(image_name) {
            continue;
        }

        let image_path = directory.join(image_name);
        if !file_exists(&image_path) {
            diagnostics.push(Diagnostic::MissingImage { path: image_path });
            continue;
        }

        let record = builder.build(image_name, section, diagnostics);
        records.insert(image_name.to_string(), record);
    }

    records
}
