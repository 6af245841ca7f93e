//! exiv2 modify-command rendering. Every tag becomes one or more `set`/`add`
//! commands on a key path; the caller passes each with `-M`.
//!
//! Region lists need explicit 1-based indices and have to be created as an
//! empty array before their items are set.

use super::{CaptionField, KeywordField, Tag, TagRenderer};

const MWG_REGIONS: &str = "Xmp.mwg-rs.Regions/mwg-rs";
const WPG_REGIONS: &str = "Xmp.MP.RegionInfo/MPRI:Regions";

pub struct Exiv2Renderer;

impl TagRenderer for Exiv2Renderer {
    fn render_tag(&self, tag: &Tag, args: &mut Vec<String>) {
        match tag {
            Tag::Caption { field, value } => {
                let command = match field {
                    CaptionField::ExifImageDescription => {
                        format!("set Exif.Image.ImageDescription Ascii {}", value)
                    }
                    CaptionField::IptcCaption => {
                        format!("set Iptc.Application2.Caption {}", escape_exiv_string(value))
                    }
                    CaptionField::XmpDescription => {
                        format!("set Xmp.dc.description LangAlt {}", escape_exiv_string(value))
                    }
                };
                args.push(command);
            }
            Tag::Keyword { field, value } => {
                let command = match field {
                    KeywordField::IptcKeywords => {
                        format!("add Iptc.Application2.Keywords {}", escape_exiv_string(value))
                    }
                    // `set` on a bag appends
                    KeywordField::XmpSubject => {
                        format!("set Xmp.dc.subject {}", escape_exiv_string(value))
                    }
                };
                args.push(command);
            }
            Tag::MwgRegions { dimensions, regions } => {
                let dim = format!("{}:AppliedToDimensions/stDim", MWG_REGIONS);
                args.push(format!("set {}:w {}", dim, dimensions.width));
                args.push(format!("set {}:h {}", dim, dimensions.height));
                args.push(format!("set {}:unit pixel", dim));
                args.push(format!("set {}:RegionList \"\"", MWG_REGIONS));

                for (i, region) in regions.iter().enumerate() {
                    let item = format!("{}:RegionList[{}]/mwg-rs", MWG_REGIONS, i + 1);
                    args.push(format!("set {}:Name {}", item, escape_exiv_string(&region.name)));
                    args.push(format!("set {}:Type Face", item));
                    args.push(format!("set {}:Area/stArea:x {}", item, region.x));
                    args.push(format!("set {}:Area/stArea:y {}", item, region.y));
                    args.push(format!("set {}:Area/stArea:w {}", item, region.w));
                    args.push(format!("set {}:Area/stArea:h {}", item, region.h));
                    args.push(format!("set {}:Area/stArea:unit normalized", item));
                }
            }
            Tag::WpgRegions { regions } => {
                args.push(format!("set {} \"\"", WPG_REGIONS));

                for (i, region) in regions.iter().enumerate() {
                    let item = format!("{}[{}]/MPReg", WPG_REGIONS, i + 1);
                    let rect = &region.rect;
                    args.push(format!(
                        "set {}:Rectangle {}, {}, {}, {}",
                        item, rect.x, rect.y, rect.w, rect.h
                    ));
                    args.push(format!(
                        "set {}:PersonDisplayName {}",
                        item,
                        escape_exiv_string(&region.name)
                    ));
                }
            }
        }
    }
}

/// Double-quote a value for an exiv2 `set`/`add` command.
///
/// Only embedded quotes need a backslash; the command is passed as a
/// single argument and never goes through a shell.
pub fn escape_exiv_string(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Dimensions, MwgRegion, WpgRegion};
    use crate::picasa::Rectangle;

    #[test]
    fn test_escape_exiv_string() {
        assert_eq!(escape_exiv_string("Trip"), "\"Trip\"");
        assert_eq!(escape_exiv_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_exiv_string(""), "\"\"");
    }

    #[test]
    fn test_caption_and_keywords() {
        let tags = vec![
            Tag::Caption {
                field: CaptionField::ExifImageDescription,
                value: "Trip".to_string(),
            },
            Tag::Caption {
                field: CaptionField::IptcCaption,
                value: "Trip".to_string(),
            },
            Tag::Caption {
                field: CaptionField::XmpDescription,
                value: "Trip \"2005\"".to_string(),
            },
            Tag::Keyword {
                field: KeywordField::IptcKeywords,
                value: "Paris".to_string(),
            },
            Tag::Keyword {
                field: KeywordField::XmpSubject,
                value: "Paris".to_string(),
            },
        ];

        assert_eq!(
            Exiv2Renderer.render(&tags),
            vec![
                "set Exif.Image.ImageDescription Ascii Trip",
                "set Iptc.Application2.Caption \"Trip\"",
                "set Xmp.dc.description LangAlt \"Trip \\\"2005\\\"\"",
                "add Iptc.Application2.Keywords \"Paris\"",
                "set Xmp.dc.subject \"Paris\"",
            ]
        );
    }

    #[test]
    fn test_mwg_regions_are_indexed() {
        let region = |name: &str| MwgRegion {
            name: name.to_string(),
            x: "0.200000".to_string(),
            y: "0.200000".to_string(),
            w: "0.200000".to_string(),
            h: "0.200000".to_string(),
        };
        let tags = vec![Tag::MwgRegions {
            dimensions: Dimensions { width: 640, height: 480 },
            regions: vec![region("Jane"), region("Tom")],
        }];

        let args = Exiv2Renderer.render(&tags);
        assert_eq!(args.len(), 4 + 2 * 7);
        assert_eq!(args[0], "set Xmp.mwg-rs.Regions/mwg-rs:AppliedToDimensions/stDim:w 640");
        assert_eq!(args[1], "set Xmp.mwg-rs.Regions/mwg-rs:AppliedToDimensions/stDim:h 480");
        assert_eq!(args[2], "set Xmp.mwg-rs.Regions/mwg-rs:AppliedToDimensions/stDim:unit pixel");
        assert_eq!(args[3], "set Xmp.mwg-rs.Regions/mwg-rs:RegionList \"\"");
        assert_eq!(
            args[4],
            "set Xmp.mwg-rs.Regions/mwg-rs:RegionList[1]/mwg-rs:Name \"Jane\""
        );
        assert_eq!(
            args[6],
            "set Xmp.mwg-rs.Regions/mwg-rs:RegionList[1]/mwg-rs:Area/stArea:x 0.200000"
        );
        assert_eq!(
            args[11],
            "set Xmp.mwg-rs.Regions/mwg-rs:RegionList[2]/mwg-rs:Name \"Tom\""
        );
        assert_eq!(
            args[17],
            "set Xmp.mwg-rs.Regions/mwg-rs:RegionList[2]/mwg-rs:Area/stArea:unit normalized"
        );
    }

    #[test]
    fn test_wpg_regions() {
        let tags = vec![Tag::WpgRegions {
            regions: vec![WpgRegion {
                name: "Jane".to_string(),
                rect: Rectangle::new(0.1, 0.25, 0.2, 0.125).rounded(),
            }],
        }];

        assert_eq!(
            Exiv2Renderer.render(&tags),
            vec![
                "set Xmp.MP.RegionInfo/MPRI:Regions \"\"",
                "set Xmp.MP.RegionInfo/MPRI:Regions[1]/MPReg:Rectangle 0.100000, 0.250000, 0.200000, 0.125000",
                "set Xmp.MP.RegionInfo/MPRI:Regions[1]/MPReg:PersonDisplayName \"Jane\"",
            ]
        );
    }
}
