//! Conversion of an [`ImageRecord`] into tag-writer arguments.
//!
//! Records are first lowered into a dialect-neutral list of [`Tag`]s, then
//! rendered by the exiftool or exiv2 renderer. The order of the tag list is
//! significant: tag writers apply arguments in sequence, so a later tag with
//! the same key can overwrite an earlier one.

pub mod exiftool;
pub mod exiv2;

use crate::config::{Dialect, EmbedConfig};
use crate::picasa::rect::{round_xmp, RoundedRect};
use crate::picasa::ImageRecord;

/// Pixel size of the image the regions are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Equivalent caption tags, see the MWG guidance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionField {
    ExifImageDescription,
    IptcCaption,
    XmpDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordField {
    IptcKeywords,
    XmpSubject,
}

/// One MWG region. `x`/`y` are the center of the face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MwgRegion {
    pub name: String,
    pub x: String,
    pub y: String,
    pub w: String,
    pub h: String,
}

/// One Windows Photo Gallery region, top-left based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WpgRegion {
    pub name: String,
    pub rect: RoundedRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Caption {
        field: CaptionField,
        value: String,
    },
    Keyword {
        field: KeywordField,
        value: String,
    },
    MwgRegions {
        dimensions: Dimensions,
        regions: Vec<MwgRegion>,
    },
    WpgRegions {
        regions: Vec<WpgRegion>,
    },
}

/// Renders the tag list into the argument grammar of one tag writer.
pub trait TagRenderer {
    fn render_tag(&self, tag: &Tag, args: &mut Vec<String>);

    fn render(&self, tags: &[Tag]) -> Vec<String> {
        let mut args = Vec::new();
        for tag in tags {
            self.render_tag(tag, &mut args);
        }
        args
    }
}

pub fn renderer(dialect: Dialect) -> &'static dyn TagRenderer {
    match dialect {
        Dialect::ExifTool => &exiftool::ExifToolRenderer,
        Dialect::Exiv2 => &exiv2::Exiv2Renderer,
    }
}

/// Whether [`build_tags`] would emit an MWG block, i.e. whether the caller
/// has to look up the pixel dimensions.
pub fn needs_dimensions(record: &ImageRecord, config: &EmbedConfig) -> bool {
    config.write_xmp && config.write_xmp_mwg && !record.faces.is_empty()
}

/// Caption with the keywords appended, when configured.
pub fn effective_caption(record: &ImageRecord, config: &EmbedConfig) -> String {
    if !config.append_keywords_to_caption || record.keywords.is_empty() {
        return record.caption.clone();
    }

    let keywords = record.keywords.join(", ");
    if record.caption.is_empty() {
        keywords
    } else {
        format!("{} - {}", record.caption, keywords)
    }
}

/// Lower a record into the ordered tag list.
///
/// The MWG block needs the pixel dimensions; without them it is left out and
/// the remaining tags are still produced.
pub fn build_tags(
    record: &ImageRecord,
    dimensions: Option<Dimensions>,
    config: &EmbedConfig,
) -> Vec<Tag> {
    let mut tags = Vec::new();

    let caption = effective_caption(record, config);
    if !caption.is_empty() {
        let fields = [
            (config.write_exif, CaptionField::ExifImageDescription),
            (config.write_iptc, CaptionField::IptcCaption),
            (config.write_xmp, CaptionField::XmpDescription),
        ];
        for (enabled, field) in fields {
            if enabled {
                tags.push(Tag::Caption {
                    field,
                    value: caption.clone(),
                });
            }
        }
    }

    for keyword in &record.keywords {
        if config.write_iptc {
            tags.push(Tag::Keyword {
                field: KeywordField::IptcKeywords,
                value: keyword.clone(),
            });
        }
        // XMP subject is an unordered bag, source order keeps output stable
        if config.write_xmp {
            tags.push(Tag::Keyword {
                field: KeywordField::XmpSubject,
                value: keyword.clone(),
            });
        }
    }

    if needs_dimensions(record, config) {
        if let Some(dimensions) = dimensions {
            let regions = record
                .faces
                .iter()
                .map(|face| MwgRegion {
                    name: face.name.clone(),
                    x: round_xmp(face.rect.center_x()),
                    y: round_xmp(face.rect.center_y()),
                    w: round_xmp(face.rect.w),
                    h: round_xmp(face.rect.h),
                })
                .collect();
            tags.push(Tag::MwgRegions { dimensions, regions });
        }
    }

    if config.write_xmp && config.write_xmp_wpg && !record.faces.is_empty() {
        let regions = record
            .faces
            .iter()
            .map(|face| WpgRegion {
                name: face.name.clone(),
                rect: face.rect.rounded(),
            })
            .collect();
        tags.push(Tag::WpgRegions { regions });
    }

    tags
}

/// Render a record for the configured dialect. `None` means there is
/// nothing to embed and the tag writer should not be run.
pub fn serialize(
    record: &ImageRecord,
    dimensions: Option<Dimensions>,
    config: &EmbedConfig,
) -> Option<Vec<String>> {
    let tags = build_tags(record, dimensions, config);
    if tags.is_empty() {
        return None;
    }
    Some(renderer(config.dialect).render(&tags))
}

/// Escape a value placed inside an XMP structure.
pub fn escape_xmp(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '|' | ',' | '{' | '}' | '[' | ']') {
            escaped.push('|');
        }
        escaped.push(c);
    }
    escaped
}
