//! Writing a finished canvas to disk.

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError};

use crate::canvas::Canvas;
use crate::error::Error;

/// The encodings we can write, chosen by file extension.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// `.png`
    Png,
    /// `.bmp`
    Bmp,
}

impl OutputFormat {
    /// Picks the format from the path's extension, ignoring case.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OutputFormat, Error> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_ref().map(String::as_str) {
            Some("png") => Ok(OutputFormat::Png),
            Some("bmp") => Ok(OutputFormat::Bmp),
            _ => Err(Error::UnrecognizedExtension(path.display().to_string())),
        }
    }
}

fn encode_error(path: &Path, cause: ImageError) -> Error {
    Error::Encode {
        path: path.display().to_string(),
        cause,
    }
}

/// Writes the canvas as 8-bit RGBA, four channels, `width * 4` bytes
/// per row, in whatever format the filename asks for.
pub fn write_image<P: AsRef<Path>>(outfile: P, canvas: &Canvas) -> Result<(), Error> {
    let path = outfile.as_ref();
    let format = OutputFormat::from_path(path)?;
    if canvas.is_empty() {
        return Err(Error::EmptyImage(canvas.width(), canvas.height()));
    }
    let too_large = || Error::Dimensions {
        width: canvas.width(),
        height: canvas.height(),
    };
    let width = u32::try_from(canvas.width()).map_err(|_| too_large())?;
    let height = u32::try_from(canvas.height()).map_err(|_| too_large())?;
    let pixels = canvas.to_rgba_bytes();

    let output = File::create(path).map_err(|e| encode_error(path, ImageError::IoError(e)))?;
    let mut output = BufWriter::new(output);
    let encoded = match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut output).write_image(&pixels, width, height, ColorType::Rgba8)
        }
        OutputFormat::Bmp => {
            BmpEncoder::new(&mut output).encode(&pixels, width, height, ColorType::Rgba8)
        }
    };
    encoded.map_err(|e| encode_error(path, e))?;
    output
        .flush()
        .map_err(|e| encode_error(path, ImageError::IoError(e)))?;

    info!("wrote {}x{} {:?} to {}", width, height, format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, RenderConfig};
    use tempfile::tempdir;

    fn rendered(width: usize, height: usize) -> Canvas {
        let mut canvas = Canvas::new(width, height).unwrap();
        render(&mut canvas, &RenderConfig::default()).unwrap();
        canvas
    }

    #[test]
    fn formats_come_from_the_extension() {
        assert_eq!(OutputFormat::from_path("output.bmp").unwrap(), OutputFormat::Bmp);
        assert_eq!(OutputFormat::from_path("a/b/c.png").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path("LOUD.PNG").unwrap(), OutputFormat::Png);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        for name in &["output.jpg", "output", "png", "output.png.txt"] {
            match OutputFormat::from_path(name) {
                Err(Error::UnrecognizedExtension(n)) => assert_eq!(n, *name),
                other => panic!("{} gave {:?}", name, other),
            }
        }
    }

    #[test]
    fn unknown_extension_message_names_the_file() {
        let err = OutputFormat::from_path("mandel.gif").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not determine ext for filename \"mandel.gif\""
        );
    }

    #[test]
    fn bmp_round_trip_preserves_every_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("round.bmp");
        let canvas = rendered(31, 17);
        write_image(&path, &canvas).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (31, 17));
        assert_eq!(decoded.into_raw(), canvas.to_rgba_bytes());
    }

    #[test]
    fn png_round_trip_preserves_every_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("round.png");
        let canvas = rendered(16, 9);
        write_image(&path, &canvas).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 9));
        assert_eq!(decoded.into_raw(), canvas.to_rgba_bytes());
    }

    #[test]
    fn empty_canvas_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bmp");
        let canvas = Canvas::new(0, 4).unwrap();
        match write_image(&path, &canvas) {
            Err(Error::EmptyImage(0, 4)) => {}
            other => panic!("expected an empty image error, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_an_encode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        match write_image(&path, &rendered(2, 2)) {
            Err(Error::Encode { .. }) => {}
            other => panic!("expected an encode error, got {:?}", other),
        }
    }
}
