//! Writing finished images to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{ImageBuffer, RenderError, RenderResult};
use log::info;

/// Write a plain-text PPM (`P3`) image, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgb in image.to_rgb8().chunks_exact(3) {
        write!(writer, "{} {} {} ", rgb[0], rgb[1], rgb[2])?;
    }

    writer.flush()
}

/// Save an image, choosing the format from the file extension.
///
/// `.ppm` writes plain-text PPM; `.png` writes an 8-bit RGB PNG with the
/// same gamma-encoded values.
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => {
            let file = File::create(path)?;
            write_ppm(image, BufWriter::new(file))?;
        }
        "png" => {
            let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8()).ok_or(
                RenderError::InvalidDimensions {
                    width: image.width,
                    height: image.height,
                },
            )?;
            rgb.save_with_format(path, image::ImageFormat::Png)?;
        }
        _ => return Err(RenderError::UnsupportedFormat(path.display().to_string())),
    }

    info!("Saved {}", path.display());
    Ok(())
}
