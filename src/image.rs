use alloc::vec::Vec;

use rgb::RGB8;

use crate::color_transform::rgb_row_to_ycbcr;
use crate::error::{CodecError, CodecResult};
use crate::quantization::ChannelClass;

/// # One pixel in the luma/chroma colorspace
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct YCbCr {
    pub y: u8,
    pub cb: u8,
    pub cr: u8,
}

impl YCbCr {
    /// Full white luma with neutral chroma, used to pad images to the block grid
    pub const WHITE: YCbCr = YCbCr::new(255, 128, 128);

    pub const fn new(y: u8, cb: u8, cr: u8) -> YCbCr {
        YCbCr { y, cb, cr }
    }

    #[inline]
    pub fn channel(self, channel: Channel) -> u8 {
        match channel {
            Channel::Y => self.y,
            Channel::Cb => self.cb,
            Channel::Cr => self.cr,
        }
    }

    #[inline]
    pub fn channel_mut(&mut self, channel: Channel) -> &mut u8 {
        match channel {
            Channel::Y => &mut self.y,
            Channel::Cb => &mut self.cb,
            Channel::Cr => &mut self.cr,
        }
    }
}

/// # Channels of a [YCbCr] image in stream order
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    Y = 0,
    Cb = 1,
    Cr = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Y, Channel::Cb, Channel::Cr];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Channel> {
        Channel::ALL.get(index).copied()
    }

    /// The quantization table class of this channel
    #[inline]
    pub fn class(self) -> ChannelClass {
        match self {
            Channel::Y => ChannelClass::Luma,
            Channel::Cb | Channel::Cr => ChannelClass::Chroma,
        }
    }
}

/// # A YCbCr image, stored row-major
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    rows: usize,
    cols: usize,
    pixels: Vec<YCbCr>,
}

impl Image {
    /// Creates an image with every pixel set to `fill`
    pub fn new(rows: usize, cols: usize, fill: YCbCr) -> Image {
        Image {
            rows,
            cols,
            pixels: alloc::vec![fill; rows * cols],
        }
    }

    pub fn from_pixels(rows: usize, cols: usize, pixels: Vec<YCbCr>) -> CodecResult<Image> {
        if pixels.len() != rows * cols {
            return Err(CodecError::InvalidDimensions {
                rows,
                cols,
                block_size: 1,
            });
        }
        Ok(Image { rows, cols, pixels })
    }

    /// Creates an image by calling `f(row, col)` for every pixel
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Image
    where
        F: FnMut(usize, usize) -> YCbCr,
    {
        let mut pixels = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                pixels.push(f(row, col));
            }
        }
        Image { rows, cols, pixels }
    }

    /// Converts row-major full range RGB pixels into a YCbCr image
    pub fn from_rgb(pixels: &[RGB8], rows: usize, cols: usize) -> CodecResult<Image> {
        if pixels.len() != rows * cols {
            return Err(CodecError::InvalidDimensions {
                rows,
                cols,
                block_size: 1,
            });
        }

        let mut out = alloc::vec![YCbCr::default(); rows * cols];
        if cols > 0 {
            for (src, dst) in pixels.chunks_exact(cols).zip(out.chunks_exact_mut(cols)) {
                rgb_row_to_ycbcr(src, dst);
            }
        }
        Ok(Image {
            rows,
            cols,
            pixels: out,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn pixels(&self) -> &[YCbCr] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<YCbCr> {
        self.pixels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<YCbCr> {
        if row < self.rows && col < self.cols {
            Some(self.pixels[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut YCbCr> {
        if row < self.rows && col < self.cols {
            Some(&mut self.pixels[row * self.cols + col])
        } else {
            None
        }
    }

    /// True if both dimensions are non-zero multiples of `block_size`
    pub fn is_aligned(&self, block_size: usize) -> bool {
        block_size > 0
            && self.rows > 0
            && self.cols > 0
            && self.rows % block_size == 0
            && self.cols % block_size == 0
    }

    /// Returns a copy extended at the bottom and right with [YCbCr::WHITE] so that both
    /// dimensions are multiples of `block_size`
    pub fn pad_to_multiple(&self, block_size: usize) -> CodecResult<Image> {
        if block_size == 0 {
            return Err(CodecError::InvalidBlockSize(block_size));
        }

        let rows = self.rows.div_ceil(block_size) * block_size;
        let cols = self.cols.div_ceil(block_size) * block_size;

        if rows == self.rows && cols == self.cols {
            return Ok(self.clone());
        }

        Ok(Image::from_fn(rows, cols, |row, col| {
            self.get(row, col).unwrap_or(YCbCr::WHITE)
        }))
    }

    /// Copies one channel of the `size x size` block at `(row, col)` into `out`
    pub(crate) fn read_block(
        &self,
        channel: Channel,
        row: usize,
        col: usize,
        size: usize,
        out: &mut [u8],
    ) {
        for (x, line) in out.chunks_exact_mut(size).enumerate().take(size) {
            let start = (row + x) * self.cols + col;
            for (o, p) in line.iter_mut().zip(&self.pixels[start..start + size]) {
                *o = p.channel(channel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rgb::RGB8;

    use super::*;

    #[test]
    fn test_channel_access() {
        let mut p = YCbCr::new(1, 2, 3);
        assert_eq!(p.channel(Channel::Y), 1);
        assert_eq!(p.channel(Channel::Cb), 2);
        assert_eq!(p.channel(Channel::Cr), 3);

        *p.channel_mut(Channel::Cb) = 200;
        assert_eq!(p, YCbCr::new(1, 200, 3));

        assert_eq!(Channel::from_index(2), Some(Channel::Cr));
        assert_eq!(Channel::from_index(3), None);
        assert_eq!(Channel::Y.class(), ChannelClass::Luma);
        assert_eq!(Channel::Cr.class(), ChannelClass::Chroma);
    }

    #[test]
    fn test_pad_to_multiple() {
        let image = Image::new(5, 10, YCbCr::new(10, 20, 30));
        let padded = image.pad_to_multiple(8).unwrap();

        assert_eq!(padded.rows(), 8);
        assert_eq!(padded.cols(), 16);
        assert!(padded.is_aligned(8));
        assert_eq!(padded.get(4, 9), Some(YCbCr::new(10, 20, 30)));
        assert_eq!(padded.get(5, 0), Some(YCbCr::WHITE));
        assert_eq!(padded.get(0, 10), Some(YCbCr::WHITE));
        assert_eq!(padded.get(7, 15), Some(YCbCr::WHITE));

        // Already aligned images are returned unchanged
        let aligned = Image::new(16, 8, YCbCr::default());
        assert_eq!(aligned.pad_to_multiple(8).unwrap(), aligned);

        assert!(image.pad_to_multiple(0).is_err());
    }

    #[test]
    fn test_read_block() {
        let image = Image::from_fn(16, 16, |row, col| YCbCr::new((row * 16 + col) as u8, 0, 0));

        let mut block = [0u8; 64];
        image.read_block(Channel::Y, 8, 0, 8, &mut block);
        assert_eq!(block[0], 128);
        assert_eq!(block[1], 129);
        assert_eq!(block[8], 144);
        assert_eq!(block[63], 247);
    }

    #[test]
    fn test_from_rgb() {
        let pixels = vec![RGB8::new(255, 255, 255); 6];
        let image = Image::from_rgb(&pixels, 2, 3).unwrap();
        assert!(image.pixels().iter().all(|&p| p == YCbCr::WHITE));

        assert!(Image::from_rgb(&pixels, 2, 2).is_err());
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Image::from_pixels(2, 2, vec![YCbCr::default(); 3]).is_err());
        assert!(Image::from_pixels(2, 2, vec![YCbCr::default(); 4]).is_ok());
    }
}
