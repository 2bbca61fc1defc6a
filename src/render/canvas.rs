use std::path::Path;

use crate::foundation::core::{Format, Position, Size};
use crate::foundation::error::{StrataError, StrataResult};
use crate::render::composite::{over_in_place, premultiply_rgba8_in_place, unpremultiply_rgba8};

/// Decoded trait image in premultiplied RGBA8, already scaled to its draw
/// size.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

/// Decode encoded image bytes and scale them to `size`.
///
/// Scaling happens on straight-alpha pixels before premultiplication so the
/// filter does not smear color out of transparent regions.
pub fn decode_image_fit(bytes: &[u8], size: Size) -> StrataResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StrataError::image(format!("decode trait image: {e}")))?;
    let mut rgba = dyn_img.to_rgba8();
    if rgba.dimensions() != (size.width, size.height) {
        rgba = image::imageops::resize(
            &rgba,
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );
    }

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Ok(PreparedImage {
        width: size.width,
        height: size.height,
        data,
    })
}

/// The shared canvas one edition is painted onto, layer by layer.
///
/// Pixels are premultiplied RGBA8. The canvas is owned by the generation
/// session and reused across editions; whether it is cleared between
/// editions is the session's canvas policy, not a property of this type.
#[derive(Debug)]
pub struct EditionCanvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl EditionCanvas {
    /// Fully transparent canvas covering `format`.
    pub fn new(format: Format) -> Self {
        Self {
            width: format.width,
            height: format.height,
            data: vec![0; format.rgba8_len()],
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Source-over `img` onto the canvas with its top-left corner at `pos`.
    ///
    /// Regions falling outside the canvas are clipped.
    pub fn draw(&mut self, img: &PreparedImage, pos: Position) -> StrataResult<()> {
        if pos.x >= self.width || pos.y >= self.height {
            return Ok(());
        }
        let cols = img.width.min(self.width - pos.x) as usize;
        let rows = img.height.min(self.height - pos.y);
        if cols == 0 {
            return Ok(());
        }

        for row in 0..rows {
            let src_off = (row * img.width) as usize * 4;
            let dst_off = (((pos.y + row) * self.width) + pos.x) as usize * 4;
            over_in_place(
                &mut self.data[dst_off..dst_off + cols * 4],
                &img.data[src_off..src_off + cols * 4],
            )?;
        }
        Ok(())
    }

    /// Write the current canvas state as a straight-alpha PNG.
    pub fn save_png(&self, path: &Path) -> StrataResult<()> {
        let straight = unpremultiply_rgba8(&self.data);
        image::save_buffer_with_format(
            path,
            &straight,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| StrataError::image(format!("write edition png '{}': {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_scales_to_requested_size() {
        let bytes = png_bytes(1, 1, [10, 20, 30, 255]);
        let img = decode_image_fit(
            &bytes,
            Size {
                width: 2,
                height: 2,
            },
        )
        .unwrap();
        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(img.data.len(), 16);
        assert_eq!(&img.data[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_image_fit(
            b"not a png",
            Size {
                width: 1,
                height: 1,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("image error:"));
    }

    #[test]
    fn draw_composites_and_clear_resets() {
        let mut canvas = EditionCanvas::new(Format {
            width: 2,
            height: 1,
        });
        let red = PreparedImage {
            width: 1,
            height: 1,
            data: vec![255, 0, 0, 255],
        };
        canvas.draw(&red, Position::default()).unwrap();
        assert_eq!(&canvas.pixels()[..4], &[255, 0, 0, 255]);
        assert_eq!(&canvas.pixels()[4..], &[0, 0, 0, 0]);

        // opaque pixels survive a transparent overdraw
        let clear_img = PreparedImage {
            width: 1,
            height: 1,
            data: vec![0, 0, 0, 0],
        };
        canvas.draw(&clear_img, Position::default()).unwrap();
        assert_eq!(&canvas.pixels()[..4], &[255, 0, 0, 255]);

        canvas.clear();
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn draw_clips_at_canvas_edge() {
        let mut canvas = EditionCanvas::new(Format {
            width: 2,
            height: 2,
        });
        let img = PreparedImage {
            width: 2,
            height: 2,
            data: vec![255; 16],
        };
        canvas.draw(&img, Position { x: 1, y: 1 }).unwrap();
        // only the bottom-right pixel is touched
        assert_eq!(&canvas.pixels()[..12], &[0u8; 12]);
        assert_eq!(&canvas.pixels()[12..], &[255, 255, 255, 255]);
    }

    #[test]
    fn save_png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.png");

        let mut canvas = EditionCanvas::new(Format {
            width: 1,
            height: 1,
        });
        let px = PreparedImage {
            width: 1,
            height: 1,
            data: vec![40, 80, 120, 255],
        };
        canvas.draw(&px, Position::default()).unwrap();
        canvas.save_png(&path).unwrap();

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(0, 0).0, [40, 80, 120, 255]);
    }
}
