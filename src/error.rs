//! The single error type shared by every stage of a render.

use failure::Fail;
use image::ImageError;

/// Everything that can stop a render from producing an image.  None
/// of these are retried; the binary reports them and exits.
#[derive(Debug, Fail)]
pub enum Error {
    /// The requested canvas cannot exist: its pixel count overflows,
    /// or it is too large for the image encoder.
    #[fail(display = "invalid dimensions {}x{}", width, height)]
    Dimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The pixel buffer could not be allocated.
    #[fail(display = "could not allocate a buffer of {} pixels", _0)]
    Allocation(usize),

    /// The worker count or cache line size cannot be used.
    #[fail(display = "invalid render configuration: {}", _0)]
    Config(String),

    /// One of the render threads panicked before finishing its blocks.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The output filename has no extension we know how to encode.
    #[fail(display = "Could not determine ext for filename \"{}\"", _0)]
    UnrecognizedExtension(String),

    /// A canvas with no pixels cannot be written to an image file.
    #[fail(display = "cannot write an empty {}x{} image", _0, _1)]
    EmptyImage(usize, usize),

    /// The encoder failed to write the file.
    #[fail(display = "could not write \"{}\": {}", path, cause)]
    Encode {
        /// The file we were writing.
        path: String,
        /// What the encoder reported.
        #[cause]
        cause: ImageError,
    },
}
