use std::io::Cursor;
use std::path::Path;

use docx_rs::Pic;
use image::{ImageFormat, ImageReader};

use super::{ReportError, emu};

/// A decoded image, re-encoded as PNG for embedding.
///
/// Everything goes through PNG so formats Word renders poorly (WebP) end up
/// in the package in a form it understands.
#[derive(Debug, Clone)]
pub struct Picture {
    png: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

impl Picture {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ReportError> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;

        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;

        Ok(Self {
            png: png.into_inner(),
            width_px: image.width(),
            height_px: image.height(),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Scale to `inches` wide, keeping the aspect ratio.
    pub fn fit_width(self, inches: f64) -> Pic {
        let width = emu(inches);
        let height = scale(width, self.height_px, self.width_px);
        self.into_pic(width, height)
    }

    /// Scale to `inches` tall, keeping the aspect ratio.
    pub fn fit_height(self, inches: f64) -> Pic {
        let height = emu(inches);
        let width = scale(height, self.width_px, self.height_px);
        self.into_pic(width, height)
    }

    fn into_pic(self, width_emu: u32, height_emu: u32) -> Pic {
        Pic::new_with_dimensions(self.png, self.width_px, self.height_px).size(width_emu, height_emu)
    }
}

fn scale(known: u32, num: u32, den: u32) -> u32 {
    if den == 0 {
        return known;
    }
    (u64::from(known) * u64::from(num) / u64::from(den)) as u32
}

#[cfg(test)]
mod tests {
    use image::DynamicImage;

    use super::*;

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn webp_is_reencoded_as_png() {
        let webp = encode(&DynamicImage::new_rgba8(30, 12), ImageFormat::WebP);
        assert!(!webp.starts_with(PNG_SIGNATURE));

        let picture = Picture::decode(&webp).unwrap();
        assert!(picture.png.starts_with(PNG_SIGNATURE));
        assert_eq!(picture.dimensions(), (30, 12));
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let jpeg = encode(&DynamicImage::new_rgb8(64, 48), ImageFormat::Jpeg);
        let picture = Picture::decode(&jpeg).unwrap();
        assert_eq!(picture.dimensions(), (64, 48));
        assert!(picture.png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            Picture::decode(b"definitely not an image"),
            Err(ReportError::Image(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Picture::load(Path::new("/nonexistent/logo.png")),
            Err(ReportError::Io(_))
        ));
    }

    #[test]
    fn scaling_keeps_aspect_ratio() {
        assert_eq!(scale(548_640, 300, 100), 1_645_920);
        assert_eq!(scale(1_417_320, 50, 100), 708_660);
        assert_eq!(scale(10, 1, 0), 10);
    }
}
