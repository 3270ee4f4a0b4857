// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing a finished buffer to disk.  The renderer only needs "put
//! this RGB grid at this path"; which encoder does it is picked from
//! the output file's extension.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image;
use image::{ColorType, ImageFormat, ImageOutputFormat};
use std::fs::File;
use std::path::Path;

use errors::RenderError;
use pixels::PixelBuffer;

/// Something that can persist a completed buffer.
pub trait ImageSink {
    /// Encode `buffer` into the file at `path`.
    fn write(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), RenderError>;
}

/// Streams the buffer's bytes straight into a binary PPM.
#[derive(Copy, Clone, Debug, Default)]
pub struct PnmSink;

impl ImageSink for PnmSink {
    fn write(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), RenderError> {
        let output = File::create(path).map_err(|e| RenderError::io(path, e))?;
        let mut encoder =
            PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        let bytes = buffer.to_rgb8();
        encoder
            .encode(
                &bytes[..],
                buffer.width() as u32,
                buffer.height() as u32,
                ColorType::RGB(8),
            )
            .map_err(|e| RenderError::io(path, e))
    }
}

/// Hands the buffer to the `image` crate, which chooses an encoder
/// (PNG, BMP, JPEG, ...) from the file extension.
#[derive(Copy, Clone, Debug, Default)]
pub struct ImageFileSink;

impl ImageSink for ImageFileSink {
    fn write(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), RenderError> {
        image::save_buffer(
            path,
            &buffer.to_rgb8(),
            buffer.width() as u32,
            buffer.height() as u32,
            ColorType::RGB(8),
        )
        .map_err(|e| RenderError::io(path, e))
    }
}

fn is_pnm(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_ref().map(String::as_str) {
        Some("ppm") | Some("pnm") => true,
        _ => false,
    }
}

/// PPM/PNM paths get the direct writer; everything else goes through
/// the `image` crate's format detection.
pub fn sink_for(path: &Path) -> Box<dyn ImageSink> {
    if is_pnm(path) {
        Box::new(PnmSink)
    } else {
        Box::new(ImageFileSink)
    }
}

/// Fail unless `sink_for(path)` will be able to encode to `path`, so a
/// bad extension is caught before any rendering happens.
pub fn check_output(path: &Path) -> Result<(), RenderError> {
    if is_pnm(path) {
        return Ok(());
    }
    let format = ImageFormat::from_path(path)
        .map_err(|e| RenderError::invalid("output_path", format!("{}: {}", path.display(), e)))?;
    match ImageOutputFormat::from(format) {
        ImageOutputFormat::Unsupported(_) if format != ImageFormat::TIFF => Err(RenderError::invalid(
            "output_path",
            format!("{}: {:?} cannot be written", path.display(), format),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colors::Rgb;
    use pixels::Axis;
    use planes::Pixel;
    use tempfile;

    fn striped() -> PixelBuffer {
        let mut buffer = PixelBuffer::new(3, 2, Axis::Columns);
        for mut band in buffer.bands_mut(&[0..3]) {
            band.fill(|p: Pixel| Ok(Rgb(p.0 as f32 / 2.0, p.1 as f32, 0.5)))
                .unwrap();
        }
        buffer
    }

    #[test]
    fn both_sinks_round_trip_through_the_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = striped();
        for name in &["out.ppm", "out.png"] {
            let path = dir.path().join(name);
            sink_for(&path).write(&buffer, &path).unwrap();
            let decoded = image::open(&path).unwrap().to_rgb();
            assert_eq!((decoded.width(), decoded.height()), (3, 2));
            assert_eq!(decoded.into_raw(), buffer.to_rgb8(), "{}", name);
        }
    }

    #[test]
    fn output_formats_are_checked_up_front() {
        for name in &["out.ppm", "OUT.PNM", "out.png", "out.bmp", "out.jpg", "out.tiff"] {
            assert!(check_output(Path::new(name)).is_ok(), "{}", name);
        }
        for name in &["out.webp", "out.tga", "out.xyz", "out"] {
            match check_output(Path::new(name)) {
                Err(RenderError::InvalidArgument { .. }) => {}
                other => panic!("{} should be rejected, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ppm");
        match PnmSink.write(&striped(), &path) {
            Err(RenderError::Io { .. }) => {}
            other => panic!("expected an io error, got {:?}", other),
        }
    }
}
