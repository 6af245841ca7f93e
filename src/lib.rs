//! Embed the captions, keywords and face tags Picasa keeps in per-directory
//! `.picasa.ini` files into the images themselves, as EXIF, IPTC and XMP
//! (MWG and Windows Photo Gallery face regions).

pub mod config;
pub mod diagnostics;
pub mod embed;
pub mod export;
pub mod logging;
pub mod metadata;
pub mod picasa;
pub mod scanner;
pub mod tools;

pub use config::Config;
pub use diagnostics::Diagnostic;
pub use embed::{EmbedSummary, Embedder};
