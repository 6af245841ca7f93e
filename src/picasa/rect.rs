//! Face rectangles and the packed `rect64` encoding.
//!
//! A `rect64` value is up to 16 hex digits holding four 16-bit fixed-point
//! fractions (`left`, `top`, `right`, `bottom`), each scaled by 1/65536.
//! Leading zeros are often dropped by Picasa, so shorter values are
//! left-padded before splitting.

use thiserror::Error;

const RECT64_DIGITS: usize = 16;
const FIELD_SCALE: f64 = 65536.0;

/// Digits after the decimal point accepted by face-tag consumers.
pub const XMP_PRECISION: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RectError {
    #[error("rect64 value is empty")]
    Empty,

    #[error("rect64 value has {0} digits, at most 16 allowed")]
    TooLong(usize),

    #[error("rect64 value contains non-hex character {0:?}")]
    InvalidDigit(char),
}

/// Rectangle in normalized `[0, 1]` coordinates with a top-left origin.
///
/// Multiply `x` and `w` by the image width, `y` and `h` by the image height
/// to get pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Rectangle scaled to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

/// Rectangle with every coordinate already formatted by [`round_xmp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundedRect {
    pub x: String,
    pub y: String,
    pub w: String,
    pub h: String,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Decode a `rect64(...)` argument.
    ///
    /// Right/bottom are not checked against left/top; a reversed edge gives a
    /// negative width or height.
    pub fn from_rect64(value: &str) -> Result<Self, RectError> {
        if value.is_empty() {
            return Err(RectError::Empty);
        }
        if value.len() > RECT64_DIGITS {
            return Err(RectError::TooLong(value.len()));
        }

        let packed = value.chars().try_fold(0u64, |acc, c| {
            c.to_digit(16)
                .map(|digit| (acc << 4) | u64::from(digit))
                .ok_or(RectError::InvalidDigit(c))
        })?;
        let field = |shift: u32| ((packed >> shift) & 0xffff) as f64 / FIELD_SCALE;

        let left = field(48);
        let top = field(32);
        let right = field(16);
        let bottom = field(0);

        Ok(Self::new(left, top, right - left, bottom - top))
    }

    /// Encode back to the 16-digit `rect64` form. Edges are quantized to
    /// 1/65536 and clamped to the representable range.
    pub fn to_rect64(&self) -> String {
        let quantize = |v: f64| (v * FIELD_SCALE).round().clamp(0.0, 65535.0) as u64;

        let packed = (quantize(self.x) << 48)
            | (quantize(self.y) << 32)
            | (quantize(self.x + self.w) << 16)
            | quantize(self.y + self.h);

        format!("{:016x}", packed)
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn pixel_sized(&self, image_width: u32, image_height: u32) -> PixelRect {
        let width = f64::from(image_width);
        let height = f64::from(image_height);

        PixelRect {
            x: (self.x * width).round() as i64,
            y: (self.y * height).round() as i64,
            w: (self.w * width).round() as i64,
            h: (self.h * height).round() as i64,
        }
    }

    pub fn rounded(&self) -> RoundedRect {
        RoundedRect {
            x: round_xmp(self.x),
            y: round_xmp(self.y),
            w: round_xmp(self.w),
            h: round_xmp(self.h),
        }
    }
}

/// Format a coordinate with exactly [`XMP_PRECISION`] decimals, rounding
/// halves away from zero.
///
/// Picasa refuses face tags with more than 9 digits of precision and itself
/// writes 6.
pub fn round_xmp(value: f64) -> String {
    let scale = 10f64.powi(XMP_PRECISION as i32);
    let mut scaled = value * scale;
    // Snap products like 0.49999999999999994 back onto the half they represent
    if scaled.abs() < 1e6 {
        scaled = (scaled * 1e9).round() / 1e9;
    }
    let formatted = format!("{:.*}", XMP_PRECISION, scaled.round() / scale);
    // "-0.000000" would otherwise leak out of tiny negative values
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        return formatted[1..].to_string();
    }
    formatted
}
