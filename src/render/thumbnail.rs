use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat};
use std::fs;
use std::path::Path;

use crate::error::RenderError;
use crate::size_class::ThumbSize;
use crate::source::extension_of;

use super::Fit;

/// Resize `image` into the box of `size`
pub fn fit_image(image: &DynamicImage, size: &ThumbSize, fit: Fit) -> DynamicImage {
    match fit {
        Fit::Cover => image.resize_to_fill(size.width, size.height, FilterType::Lanczos3),
        Fit::Contain => image.resize(size.width, size.height, FilterType::Lanczos3),
    }
}

/// Encode `thumb` at `dest`, creating missing directories.
///
/// The format follows the extension of `dest`, read the same way the scanner
/// reads it. JPEG has no alpha channel, so those thumbnails are flattened to
/// RGB first.
pub fn save_thumbnail(thumb: DynamicImage, dest: &Path) -> Result<(), RenderError> {
    let encode_err = |source| RenderError::Encode {
        path: dest.to_path_buf(),
        source,
    };
    let format = thumbnail_format(dest).ok_or_else(|| {
        encode_err(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(
                ImageFormatHint::Unknown,
                UnsupportedErrorKind::Format(ImageFormatHint::Unknown),
            ),
        ))
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| RenderError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let thumb = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(thumb.to_rgb8()),
        _ => thumb,
    };

    thumb.save_with_format(dest, format).map_err(encode_err)
}

fn thumbnail_format(dest: &Path) -> Option<ImageFormat> {
    let name = dest.file_name()?.to_str()?;
    ImageFormat::from_extension(extension_of(name)?)
}
