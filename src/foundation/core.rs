use crate::foundation::error::{StrataError, StrataResult};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Format {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Format {
    /// Create a validated format with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> StrataResult<Self> {
        if width == 0 || height == 0 {
            return Err(StrataError::validation("format dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Byte length of an RGBA8 buffer covering the full format.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Top-left pixel position of a drawn layer on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    /// Horizontal offset from the canvas left edge.
    pub x: u32,
    /// Vertical offset from the canvas top edge.
    pub y: u32,
}

/// Pixel extent a layer is drawn at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl From<Format> for Size {
    fn from(f: Format) -> Self {
        Self {
            width: f.width,
            height: f.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_rejects_zero_dimensions() {
        assert!(Format::new(0, 10).is_err());
        assert!(Format::new(10, 0).is_err());
        assert!(Format::new(1, 1).is_ok());
    }

    #[test]
    fn rgba8_len_covers_all_pixels() {
        let f = Format::new(3, 2).unwrap();
        assert_eq!(f.rgba8_len(), 24);
    }
}
