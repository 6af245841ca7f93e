//! exiftool argument rendering: one `-Group:Tag=value` flag per tag, with
//! face regions written as a single structured value.

use super::{
    escape_xmp, CaptionField, Dimensions, KeywordField, MwgRegion, Tag, TagRenderer, WpgRegion,
};

pub struct ExifToolRenderer;

impl TagRenderer for ExifToolRenderer {
    fn render_tag(&self, tag: &Tag, args: &mut Vec<String>) {
        match tag {
            Tag::Caption { field, value } => {
                let name = match field {
                    // ASCII only, error-prone with non-latin captions
                    CaptionField::ExifImageDescription => "EXIF:ImageDescription",
                    CaptionField::IptcCaption => "IPTC:Caption-Abstract",
                    CaptionField::XmpDescription => "XMP:Description",
                };
                args.push(format!("-{}={}", name, value));
            }
            Tag::Keyword { field, value } => {
                let name = match field {
                    KeywordField::IptcKeywords => "IPTC:Keywords",
                    KeywordField::XmpSubject => "XMP:Subject",
                };
                args.push(format!("-{}={}", name, value));
            }
            Tag::MwgRegions { dimensions, regions } => {
                args.push(format!("-RegionInfo={}", mwg_structure(dimensions, regions)));
            }
            Tag::WpgRegions { regions } => {
                args.push(format!("-RegionInfoMP={}", wpg_structure(regions)));
            }
        }
    }
}

fn mwg_structure(dimensions: &Dimensions, regions: &[MwgRegion]) -> String {
    let areas: Vec<String> = regions
        .iter()
        .map(|region| {
            format!(
                "{{Area={{W={},H={},X={},Y={},Unit=normalized}},Name={},Type=Face}}",
                region.w,
                region.h,
                region.x,
                region.y,
                escape_xmp(&region.name)
            )
        })
        .collect();

    format!(
        "{{AppliedToDimensions={{W={},H={},Unit=pixel}},RegionList=[{}]}}",
        dimensions.width,
        dimensions.height,
        areas.join(",")
    )
}

fn wpg_structure(regions: &[WpgRegion]) -> String {
    let areas: Vec<String> = regions
        .iter()
        .map(|region| {
            // The rectangle is one string value, so its commas are escaped
            format!(
                "{{PersonDisplayName={},Rectangle={}|, {}|, {}|, {}}}",
                escape_xmp(&region.name),
                region.rect.x,
                region.rect.y,
                region.rect.w,
                region.rect.h
            )
        })
        .collect();

    format!("{{Regions=[{}]}}", areas.join(","))
}
