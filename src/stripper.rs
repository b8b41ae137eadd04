//! Turns the near-white background of an image into transparency.
//!
//! A pixel is near-white when its red, green and blue channels are all
//! strictly greater than the threshold. Alpha takes no part in the decision:
//! a translucent near-white pixel is cleared like an opaque one.

use std::path::Path;

use image::{ImageError, ImageFormat, ImageReader, Rgba, RgbaImage};

use crate::error::Error;

pub const DEFAULT_THRESHOLD: u8 = 240;

pub const TRANSPARENT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 0]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripSummary {
    pub width: u32,
    pub height: u32,
    pub cleared_pixels: usize,
}

pub fn is_near_white(pixel: &Rgba<u8>, threshold: u8) -> bool {
    let [red, green, blue, _] = pixel.0;
    red > threshold && green > threshold && blue > threshold
}

/// Rewrites every near-white pixel to [`TRANSPARENT_WHITE`] and returns how
/// many pixels were rewritten. All other pixels keep their channels,
/// including alpha.
pub fn clear_near_white(image: &mut RgbaImage, threshold: u8) -> usize {
    let mut cleared = 0;
    for pixel in image.pixels_mut() {
        if is_near_white(pixel, threshold) {
            *pixel = TRANSPARENT_WHITE;
            cleared += 1;
        }
    }
    cleared
}

/// Decodes `input_path`, clears its near-white pixels and encodes the result
/// as PNG to `output_path`. An existing file at `output_path` is replaced,
/// which makes `input_path == output_path` a destructive in-place rewrite.
pub fn strip_background(
    input_path: &Path,
    output_path: &Path,
    threshold: u8,
) -> crate::Result<StripSummary> {
    let decode_error = |e| Error::Decode(input_path.display().to_string(), e);
    // Format comes from the file's signature, not its extension.
    let mut image = ImageReader::open(input_path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?
        .into_rgba8();
    let cleared_pixels = clear_near_white(&mut image, threshold);
    log::debug!(
        "{}: cleared {} of {} pixels above threshold {}",
        input_path.display(),
        cleared_pixels,
        image.width() as u64 * image.height() as u64,
        threshold
    );
    image
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|e| Error::Encode(output_path.display().to_string(), e))?;
    Ok(StripSummary {
        width: image.width(),
        height: image.height(),
        cleared_pixels,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::{
        clear_near_white, is_near_white, strip_background, DEFAULT_THRESHOLD, TRANSPARENT_WHITE,
    };
    use crate::error::Error;

    fn single_pixel(pixel: Rgba<u8>, threshold: u8) -> Rgba<u8> {
        let mut image = RgbaImage::from_pixel(1, 1, pixel);
        clear_near_white(&mut image, threshold);
        *image.get_pixel(0, 0)
    }

    #[test]
    fn bright_pixel_becomes_transparent_white() {
        let result = single_pixel(Rgba([250, 252, 249, 255]), DEFAULT_THRESHOLD);
        assert_eq!(result, TRANSPARENT_WHITE);
    }

    #[test]
    fn dark_pixel_is_left_untouched() {
        let result = single_pixel(Rgba([10, 20, 30, 255]), DEFAULT_THRESHOLD);
        assert_eq!(result, Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn lower_threshold_captures_more_pixels() {
        let pixel = Rgba([210, 210, 210, 255]);
        assert_eq!(single_pixel(pixel, DEFAULT_THRESHOLD), pixel);
        assert_eq!(single_pixel(pixel, 200), TRANSPARENT_WHITE);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        assert!(!is_near_white(&Rgba([240, 255, 255, 255]), 240));
        assert!(!is_near_white(&Rgba([255, 240, 255, 255]), 240));
        assert!(!is_near_white(&Rgba([255, 255, 240, 255]), 240));
        assert!(is_near_white(&Rgba([241, 241, 241, 255]), 240));
        assert!(!is_near_white(&Rgba([255, 255, 255, 255]), 255));
    }

    #[test]
    fn alpha_is_ignored_when_classifying() {
        let result = single_pixel(Rgba([245, 245, 245, 80]), DEFAULT_THRESHOLD);
        assert_eq!(result, TRANSPARENT_WHITE);
        let result = single_pixel(Rgba([100, 245, 245, 80]), DEFAULT_THRESHOLD);
        assert_eq!(result, Rgba([100, 245, 245, 80]));
    }

    #[test]
    fn counts_cleared_pixels_and_keeps_ordering() {
        let mut image = RgbaImage::from_fn(4, 3, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([x as u8, y as u8, 7, 200])
            }
        });
        let cleared = clear_near_white(&mut image, DEFAULT_THRESHOLD);
        assert_eq!(cleared, 6);
        assert_eq!(image.dimensions(), (4, 3));
        for (x, y, pixel) in image.enumerate_pixels() {
            if (x + y) % 2 == 0 {
                assert_eq!(*pixel, TRANSPARENT_WHITE, "pixel ({}, {})", x, y);
            } else {
                assert_eq!(*pixel, Rgba([x as u8, y as u8, 7, 200]), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rgb_input_gains_opaque_alpha() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("zeni-icon.png");
        let source = RgbImage::from_fn(5, 2, |x, _| {
            if x < 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([30, 60, 90])
            }
        });
        source.save(&path).unwrap();

        let summary = strip_background(&path, &path, DEFAULT_THRESHOLD).unwrap();
        assert_eq!((summary.width, summary.height), (5, 2));
        assert_eq!(summary.cleared_pixels, 4);

        let result = image::open(&path).unwrap();
        assert_eq!(result.color(), image::ColorType::Rgba8);
        for (x, _, pixel) in result.to_rgba8().enumerate_pixels() {
            if x < 2 {
                assert_eq!(*pixel, TRANSPARENT_WHITE);
            } else {
                assert_eq!(*pixel, Rgba([30, 60, 90, 255]));
            }
        }
    }

    #[test]
    fn stripping_twice_is_byte_identical() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("zeni-waving.png");
        RgbaImage::from_fn(8, 8, |x, y| Rgba([(x * 32) as u8, 250, (y * 32) as u8, 255]))
            .save(&path)
            .unwrap();

        strip_background(&path, &path, DEFAULT_THRESHOLD).unwrap();
        let once = fs::read(&path).unwrap();
        strip_background(&path, &path, DEFAULT_THRESHOLD).unwrap();
        let twice = fs::read(&path).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn writes_to_separate_output_without_touching_input() {
        let directory = TempDir::new().unwrap();
        let input = directory.path().join("zeni-happy.png");
        let output = directory.path().join("zeni-happy-transparent.png");
        RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]))
            .save(&input)
            .unwrap();
        let original = fs::read(&input).unwrap();

        strip_background(&input, &output, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(fs::read(&input).unwrap(), original);
        let result = image::open(&output).unwrap().to_rgba8();
        assert!(result.pixels().all(|pixel| *pixel == TRANSPARENT_WHITE));
    }

    #[test]
    fn png_without_extension_is_detected_by_content() {
        let directory = TempDir::new().unwrap();
        let fixture = directory.path().join("fixture.png");
        RgbaImage::from_pixel(2, 2, Rgba([250, 250, 250, 255]))
            .save(&fixture)
            .unwrap();
        let path = directory.path().join("zeni-icon");
        fs::rename(&fixture, &path).unwrap();

        let summary = strip_background(&path, &path, DEFAULT_THRESHOLD).unwrap();
        assert_eq!(summary.cleared_pixels, 4);
        let result = image::load_from_memory(&fs::read(&path).unwrap())
            .unwrap()
            .to_rgba8();
        assert!(result.pixels().all(|pixel| *pixel == TRANSPARENT_WHITE));
    }

    #[test]
    fn missing_input_is_a_decode_error() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("missing.png");
        let result = strip_background(&path, &path, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(Error::Decode(_, _))));
    }

    #[test]
    fn invalid_input_is_a_decode_error() {
        let directory = TempDir::new().unwrap();
        let path = directory.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();
        let result = strip_background(&path, &path, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(Error::Decode(_, _))));
        assert_eq!(fs::read(&path).unwrap(), b"definitely not a png");
    }

    #[test]
    fn unwritable_output_is_an_encode_error() {
        let directory = TempDir::new().unwrap();
        let input = directory.path().join("zeni-worried.png");
        RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]))
            .save(&input)
            .unwrap();
        let output = directory.path().join("no-such-dir").join("out.png");
        let result = strip_background(&input, &output, DEFAULT_THRESHOLD);
        assert!(matches!(result, Err(Error::Encode(_, _))));
    }
}
