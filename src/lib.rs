//! # Block transform image codec
//!
//! The lossy stages of a baseline JPEG encoder and their inverses: every `N x N` block of a
//! YCbCr image is transformed with an orthonormal DCT, quantized with a luma or chroma table
//! scaled by a compression factor and reordered in zig-zag order. The result is one DC and one
//! AC stream per channel, ready for an entropy coder. No entropy coding or file format is
//! implemented.
//!
//! ## Example
//! ```
//! use jpeg_transform::{Channel, CompressionFactor, ImageCodec, Image, YCbCr};
//!
//! # fn main() -> Result<(), jpeg_transform::CodecError> {
//! let image = Image::from_fn(20, 30, |row, col| YCbCr::new((row * 8 + col) as u8, 128, 128));
//!
//! // Images must be padded to the block grid
//! let image = image.pad_to_multiple(8)?;
//!
//! let mut codec = ImageCodec::default();
//! codec.set_compression_factor(CompressionFactor::new(2.0)?);
//!
//! let streams = codec.encode(&image)?;
//! assert_eq!(streams.dc(Channel::Y).len(), 12);
//! assert_eq!(streams.ac(Channel::Cb).len(), 12 * 63);
//!
//! let decoded = codec.decode(&streams, image.rows(), image.cols())?;
//! assert_eq!(decoded.rows(), 24);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

mod block;
mod codec;
mod color_transform;
mod error;
mod fdct;
mod image;
pub mod metrics;
mod quantization;
mod streams;
mod zigzag;

#[cfg(test)]
mod tests;

/// Largest supported block size
pub const MAX_BLOCK_SIZE: usize = 32;

pub use block::{BlockCodec, BlockScratch};
pub use codec::ImageCodec;
pub use color_transform::{rgb_row_to_ycbcr, rgb_to_ycbcr};
pub use error::{CodecError, CodecResult};
pub use fdct::TransformBasis;
pub use image::{Channel, Image, YCbCr};
pub use quantization::{
    ChannelClass, CompressionFactor, QuantizationTable, QuantizationTableType, QuantizationTables,
};
pub use streams::EncodedStreams;
pub use zigzag::{ZigzagIndex, ZIGZAG_8X8};
