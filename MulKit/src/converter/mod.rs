//! Texture map → PNG conversion
//!
//! Expands 1-5-5-5 pixels to RGBA8 and encodes them with the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, RgbaImage};

use crate::error::{Error, Result};
use crate::texture::Texture;

/// Expand a 5-bit channel to 8 bits, replicating the high bits into the low
fn expand5(v: u16) -> u8 {
    let v = (v & 0x1F) as u8;
    (v << 3) | (v >> 2)
}

/// Convert 1-5-5-5 pixels to RGBA8. Alpha is 255 when the top bit is set.
#[must_use]
pub fn argb1555_to_rgba8(pixels: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * 4);
    for &p in pixels {
        out.push(expand5(p >> 10));
        out.push(expand5(p >> 5));
        out.push(expand5(p));
        out.push(if p & 0x8000 != 0 { 255 } else { 0 });
    }
    out
}

/// Encode a texture as PNG bytes
///
/// # Errors
/// Returns an error if the image buffer cannot be built or encoding fails.
pub fn texture_to_png_bytes(texture: &Texture) -> Result<Vec<u8>> {
    let img: RgbaImage =
        ImageBuffer::from_raw(texture.width(), texture.height(), texture.to_rgba8())
            .ok_or(Error::ImageBufferFailed)?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_data);
    img.write_with_encoder(encoder)
        .map_err(|e| Error::PngEncode {
            message: e.to_string(),
        })?;

    Ok(png_data)
}

/// Write a texture to a PNG file
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn save_texture_png<P: AsRef<Path>>(texture: &Texture, png_path: P) -> Result<()> {
    let png_data = texture_to_png_bytes(texture)?;

    let mut output = BufWriter::new(File::create(png_path.as_ref())?);
    output.write_all(&png_data)?;
    output.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::OPAQUE_BIT;

    #[test]
    fn test_argb1555_channels() {
        assert_eq!(argb1555_to_rgba8(&[0xFFFF]), vec![255, 255, 255, 255]);
        assert_eq!(argb1555_to_rgba8(&[0x0000]), vec![0, 0, 0, 0]);
        assert_eq!(argb1555_to_rgba8(&[0x8000 | 0x7C00]), vec![255, 0, 0, 255]); // Red
        assert_eq!(argb1555_to_rgba8(&[0x8000 | 0x03E0]), vec![0, 255, 0, 255]); // Green
        assert_eq!(argb1555_to_rgba8(&[0x8000 | 0x001F]), vec![0, 0, 255, 255]); // Blue
        assert_eq!(argb1555_to_rgba8(&[0x0010]), vec![0, 0, 132, 0]);
    }

    #[test]
    fn test_png_signature() {
        let texture = Texture::new(0, 64, vec![OPAQUE_BIT | 0x1234; 64 * 64], None);
        let png = texture_to_png_bytes(&texture).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
