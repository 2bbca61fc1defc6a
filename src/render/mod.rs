//! Compositing primitives: the shared edition canvas, trait image decode,
//! and premultiplied source-over blending.

pub mod canvas;
pub mod composite;

pub use canvas::{EditionCanvas, PreparedImage, decode_image_fit};
