pub mod contacts;
pub mod ini;
pub mod rect;
pub mod record;

pub use contacts::{ContactTable, UNKNOWN_FACE_ID};
pub use ini::PicasaIni;
pub use rect::{round_xmp, Rectangle};
pub use record::{load_image_records, FaceRegion, ImageRecord};
