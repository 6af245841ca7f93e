//! Line-oriented parser for `.picasa.ini` index files.
//!
//! The format looks like INI but values routinely contain `=` and `;`, so
//! every line is split on its first `=` only and nothing else is interpreted.
//! Lines are decoded lossily; older indexes carry Latin-1 captions.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Key/value pairs of one `[section]`.
pub type Section = BTreeMap<String, String>;

/// Parsed index file: section name to its key/value pairs, sorted by name.
///
/// Entries that appear before the first section header are collected under
/// the empty section name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PicasaIni {
    sections: BTreeMap<String, Section>,
}

impl PicasaIni {
    /// Read and parse an index file from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut ini = Self::default();
        let mut current = String::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            ini.parse_line(&String::from_utf8_lossy(&buf), &mut current);
        }

        Ok(ini)
    }

    pub fn parse(content: &str) -> Self {
        let mut ini = Self::default();
        let mut current = String::new();

        for line in content.lines() {
            ini.parse_line(line, &mut current);
        }

        ini
    }

    fn parse_line(&mut self, line: &str, current: &mut String) {
        let line = line.trim();

        if let Some(name) = section_header(line) {
            *current = name.to_string();
            self.sections.entry(current.clone()).or_default();
            return;
        }

        // Blank and malformed lines fall through here
        if let Some((key, value)) = line.split_once('=') {
            self.sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[Contacts2]
1e85e978a76ab144=Fname1 Lname1;;
2b4c9bd7e3dafa35=Fname2 Lname2;;

[xscan-0173.png]
faces=rect64(65723403d3b0e89c),84a18ca5ba06032e;rect64(3d600745f087703),f9ba0eb0b8dbac6a
backuphash=14029
caption=Jun. 2005
keywords=La Villette,Paris,France
";

    #[test]
    fn test_parse_sections() {
        let ini = PicasaIni::parse(SAMPLE);

        assert_eq!(ini.len(), 2);
        let contacts = ini.section("Contacts2").unwrap();
        assert_eq!(contacts.get("1e85e978a76ab144").unwrap(), "Fname1 Lname1;;");

        let image = ini.section("xscan-0173.png").unwrap();
        assert_eq!(image.get("caption").unwrap(), "Jun. 2005");
        assert_eq!(image.get("backuphash").unwrap(), "14029");
    }

    #[test]
    fn test_value_keeps_extra_delimiters() {
        let ini = PicasaIni::parse("[a.jpg]\ncaption=1+1=2; really\n");
        assert_eq!(
            ini.section("a.jpg").unwrap().get("caption").unwrap(),
            "1+1=2; really"
        );
    }

    #[test]
    fn test_last_value_wins() {
        let ini = PicasaIni::parse("[a.jpg]\ncaption=first\ncaption=second\n");
        assert_eq!(ini.section("a.jpg").unwrap().get("caption").unwrap(), "second");
    }

    #[test]
    fn test_stray_entries_before_header() {
        let ini = PicasaIni::parse("stray=value\n[a.jpg]\ncaption=x\n");
        assert_eq!(ini.section("").unwrap().get("stray").unwrap(), "value");
    }

    #[test]
    fn test_malformed_lines_ignored() {
        let ini = PicasaIni::parse("[a.jpg]\nno delimiter here\n\n   \n[broken\ncaption=x\n");
        let section = ini.section("a.jpg").unwrap();
        assert_eq!(section.len(), 1);
        assert_eq!(section.get("caption").unwrap(), "x");
    }

    #[test]
    fn test_whitespace_trimmed_and_crlf() {
        let ini = PicasaIni::parse("  [a.jpg]  \r\n  caption=Trip\r\n");
        assert_eq!(ini.section("a.jpg").unwrap().get("caption").unwrap(), "Trip");
    }

    #[test]
    fn test_invalid_utf8_only_affects_its_line() {
        let raw: &[u8] = b"[Contacts2]\nabc=Jane;;\n[a.jpg]\ncaption=Caf\xe9\n[b.jpg]\ncaption=ok\n";
        let ini = PicasaIni::from_reader(raw).unwrap();

        assert_eq!(ini.len(), 3);
        assert_eq!(ini.section("Contacts2").unwrap().get("abc").unwrap(), "Jane;;");
        assert_eq!(
            ini.section("a.jpg").unwrap().get("caption").unwrap(),
            "Caf\u{fffd}"
        );
        assert_eq!(ini.section("b.jpg").unwrap().get("caption").unwrap(), "ok");
    }

    #[test]
    fn test_sections_iterate_sorted() {
        let ini = PicasaIni::parse("[c.jpg]\ncaption=3\n[a.jpg]\ncaption=1\n[b.jpg]\ncaption=2\n");
        let names: Vec<&str> = ini.sections().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PicasaIni::load(&dir.path().join(".picasa.ini")).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".picasa.ini");
        std::fs::write(&path, SAMPLE).unwrap();

        let ini = PicasaIni::load(&path).unwrap();
        assert_eq!(ini, PicasaIni::parse(SAMPLE));
    }
}
