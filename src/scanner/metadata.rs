use anyhow::{Context, Result};
use std::path::Path;

use crate::metadata::Dimensions;

/// Read the pixel size from the image header without decoding the image.
pub fn image_dimensions(path: &Path) -> Result<Dimensions> {
    let reader = image::ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()?;
    let (width, height) = reader.into_dimensions()?;

    Ok(Dimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        image::RgbImage::new(64, 48).save(&path).unwrap();

        assert_eq!(
            image_dimensions(&path).unwrap(),
            Dimensions { width: 64, height: 48 }
        );
    }

    #[test]
    fn test_image_dimensions_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        assert!(image_dimensions(&path).is_err());
        assert!(image_dimensions(&dir.path().join("missing.png")).is_err());
    }
}
