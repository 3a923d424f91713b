//! Image decoding for batch materialization.
//!
//! Decoding is a black box to the harness: a decoder maps a file path to an
//! RGB pixel array. The default implementation decodes JPEG files with
//! `jpeg-decoder`; tests and embedders can plug in their own decoder.
//!
//! # Example
//!
//! ```ignore
//! use detect_bench::decode::{ImageDecoder, JpegDecoder};
//!
//! let pixels = JpegDecoder.decode(Path::new("images/1.jpg"))?;
//! println!("{}x{}", pixels.width(), pixels.height());
//! ```

use std::path::Path;

use imgref::ImgVec;
use rgb::RGB8;

use crate::error::Result;
#[cfg(feature = "jpeg-decode")]
use crate::error::Error;

/// Decoded image pixels, row-major RGB.
pub type PixelArray = ImgVec<RGB8>;

/// Maps an image path to its decoded pixels.
///
/// Implementations must be shareable across threads because a batch may be
/// decoded in parallel.
pub trait ImageDecoder: Send + Sync {
    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> Result<PixelArray>;
}

impl<F> ImageDecoder for F
where
    F: Fn(&Path) -> Result<PixelArray> + Send + Sync,
{
    fn decode(&self, path: &Path) -> Result<PixelArray> {
        self(path)
    }
}

/// JPEG file decoder producing RGB pixels.
#[cfg(feature = "jpeg-decode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegDecoder;

#[cfg(feature = "jpeg-decode")]
impl ImageDecoder for JpegDecoder {
    fn decode(&self, path: &Path) -> Result<PixelArray> {
        let data = std::fs::read(path).map_err(|e| decode_error(path, e))?;
        decode_jpeg(&data).map_err(|reason| Error::ImageDecode {
            path: path.to_path_buf(),
            reason,
        })
    }
}

#[cfg(feature = "jpeg-decode")]
fn decode_error(path: &Path, reason: impl ToString) -> Error {
    Error::ImageDecode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Decode JPEG bytes to RGB.
#[cfg(feature = "jpeg-decode")]
fn decode_jpeg(data: &[u8]) -> std::result::Result<PixelArray, String> {
    use std::io::Cursor;

    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(data));
    let pixels = decoder.decode().map_err(|e| e.to_string())?;

    let info = decoder
        .info()
        .ok_or_else(|| "Missing JPEG info after decode".to_string())?;

    let width = info.width as usize;
    let height = info.height as usize;

    let rgb: Vec<RGB8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .map(|c| RGB8::new(c[0], c[1], c[2]))
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().map(|&g| RGB8::new(g, g, g)).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .map(|c| RGB8::new(c[0], c[0], c[0]))
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => {
            return Err("CMYK JPEGs are not supported".to_string());
        }
    };

    if rgb.len() != width * height {
        return Err(format!(
            "Decoded {} pixels, expected {}x{}",
            rgb.len(),
            width,
            height
        ));
    }

    Ok(ImgVec::new(rgb, width, height))
}
