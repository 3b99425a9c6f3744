//! Pet photo preprocessing.
//!
//! Photos are stored inline in the pet row, so uploads are decoded, scaled by
//! a single uniform ratio and re-encoded as JPEG before they reach the form.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Default bound for both axes, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 800;
/// JPEG quality used for re-encoding (0.8 on a 0–1 scale).
pub const JPEG_QUALITY: u8 = 80;

const JPEG_MIME: &str = "image/jpeg";

/// Failure to turn uploaded bytes into an embeddable photo.
#[derive(Debug, thiserror::Error)]
pub enum ImageDecodeError {
    /// The bytes are not an image in a supported format.
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),
    /// The decoded image has a zero-length edge.
    #[error("image has no pixels ({width}x{height})")]
    Empty {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
    /// Re-encoding the scaled image failed.
    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Re-encoded photo ready to embed in a pet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type of `bytes`.
    pub mime_type: &'static str,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Render as a `data:` URI suitable for the pet `photo` column.
    ///
    /// # Examples
    /// ```
    /// use petcondo::domain::EncodedImage;
    ///
    /// let image = EncodedImage {
    ///     mime_type: "image/jpeg",
    ///     width: 1,
    ///     height: 1,
    ///     bytes: vec![1, 2, 3],
    /// };
    /// assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,AQID");
    /// ```
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Output size for a `width` x `height` source bounded by `max_dimension`.
///
/// Equivalent to multiplying both axes by `min(max/width, max/height)`: the
/// longer edge lands exactly on the bound, the other keeps the aspect ratio.
/// Smaller sources are scaled up by the same rule. Fractional pixels are
/// truncated and an edge never drops below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = u64::from(width.max(height));
    if longest == 0 {
        return (0, 0);
    }
    let scale = |edge: u32| {
        let scaled = u64::from(edge) * u64::from(max_dimension) / longest;
        u32::try_from(scaled).unwrap_or(max_dimension).max(1)
    };
    (scale(width), scale(height))
}

/// Decode `bytes`, scale them into `max_dimension` and re-encode as JPEG.
///
/// On error nothing is returned, so callers leave their form state untouched.
pub fn compress_image(bytes: &[u8], max_dimension: u32) -> Result<EncodedImage, ImageDecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(ImageDecodeError::Decode)?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageDecodeError::Empty { width, height });
    }

    let (target_width, target_height) = scaled_dimensions(width, height, max_dimension.max(1));
    let resized = decoded.resize_exact(target_width, target_height, FilterType::Triangle);
    let bytes = encode_jpeg(&resized)?;

    tracing::debug!(
        source_width = width,
        source_height = height,
        width = target_width,
        height = target_height,
        encoded_bytes = bytes.len(),
        "photo preprocessed"
    );

    Ok(EncodedImage {
        mime_type: JPEG_MIME,
        width: target_width,
        height: target_height,
        bytes,
    })
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, ImageDecodeError> {
    // JPEG has no alpha channel; transparent areas are flattened.
    let rgb = image.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(ImageDecodeError::Encode)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use rstest::rstest;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 80, 40, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("png encodes");
        buffer.into_inner()
    }

    #[rstest]
    #[case(1600, 1200, 800, (800, 600))]
    #[case(1200, 1600, 800, (600, 800))]
    #[case(1000, 1000, 800, (800, 800))]
    #[case(400, 200, 800, (800, 400))]
    #[case(3000, 10, 800, (800, 2))]
    #[case(10_000, 1, 800, (800, 1))]
    fn uniform_ratio_preserves_aspect(
        #[case] width: u32,
        #[case] height: u32,
        #[case] max: u32,
        #[case] expected: (u32, u32),
    ) {
        assert_eq!(scaled_dimensions(width, height, max), expected);
    }

    #[test]
    fn compresses_to_bounded_jpeg() {
        let encoded = compress_image(&png(1600, 900), DEFAULT_MAX_DIMENSION).expect("compresses");
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!((encoded.width, encoded.height), (800, 450));

        let reloaded = image::load_from_memory(&encoded.bytes).expect("jpeg decodes");
        assert_eq!(reloaded.dimensions(), (800, 450));
        assert_eq!(
            image::guess_format(&encoded.bytes).expect("format"),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn data_uri_is_base64_jpeg() {
        let encoded = compress_image(&png(20, 10), 10).expect("compresses");
        let uri = encoded.to_data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert_eq!((encoded.width, encoded.height), (10, 5));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = compress_image(b"definitely not an image", 800).expect_err("must fail");
        assert!(matches!(err, ImageDecodeError::Decode(_)));
    }
}
