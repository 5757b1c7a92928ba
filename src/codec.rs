use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::block::{BlockCodec, BlockScratch};
use crate::error::{CodecError, CodecResult};
use crate::image::{Channel, Image, YCbCr};
use crate::quantization::{
    ChannelClass, CompressionFactor, QuantizationTableType, QuantizationTables,
};
use crate::streams::EncodedStreams;
use crate::MAX_BLOCK_SIZE;

/// Per-worker state, block scratch plus the block's 8 bit samples
type Worker = (BlockScratch, Vec<u8>);

fn new_worker(block_size: usize) -> Worker {
    (
        BlockScratch::new(block_size),
        alloc::vec![0; block_size * block_size],
    )
}

/// # Whole image encoder and decoder
///
/// Splits images into `N x N` blocks, processed in raster order, and turns every channel of every
/// block into one DC value and `N² - 1` AC values with [BlockCodec].
///
/// Encode and decode must run with the same block size, tables and compression factor for the
/// decoded image to match the encoded one.
#[derive(Debug, Clone)]
pub struct ImageCodec {
    codec: BlockCodec,
    factor: CompressionFactor,
}

impl Default for ImageCodec {
    /// 8x8 blocks, Annex K tables and a compression factor of 1.0
    fn default() -> Self {
        ImageCodec {
            codec: BlockCodec::baseline(),
            factor: CompressionFactor::DEFAULT,
        }
    }
}

impl ImageCodec {
    /// Create a new codec for `block_size x block_size` blocks
    ///
    /// Uses the Annex K tables, resampled when the block size is not 8.
    pub fn new(block_size: usize) -> CodecResult<ImageCodec> {
        if block_size == 0 || block_size > MAX_BLOCK_SIZE {
            return Err(CodecError::InvalidBlockSize(block_size));
        }

        Ok(ImageCodec {
            codec: BlockCodec::new(block_size, QuantizationTables::standard(block_size))?,
            factor: CompressionFactor::DEFAULT,
        })
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.codec.block_size()
    }

    pub fn block_codec(&self) -> &BlockCodec {
        &self.codec
    }

    pub fn set_compression_factor(&mut self, factor: CompressionFactor) {
        self.factor = factor;
    }

    pub fn compression_factor(&self) -> CompressionFactor {
        self.factor
    }

    /// Sets the compression factor from a quality between 1 and 100
    ///
    /// See [CompressionFactor::from_quality].
    pub fn set_quality(&mut self, quality: u8) {
        self.factor = CompressionFactor::from_quality(quality);
    }

    /// Set quantization tables for luma and chroma channels
    pub fn set_quantization_tables(
        &mut self,
        luma: QuantizationTableType,
        chroma: QuantizationTableType,
    ) -> CodecResult<()> {
        let tables = QuantizationTables::from_types(&luma, &chroma, self.block_size())?;
        self.codec.set_tables(tables)
    }

    /// Replaces both tables. They must match the block size.
    pub fn set_custom_tables(&mut self, tables: QuantizationTables) -> CodecResult<()> {
        self.codec.set_tables(tables)
    }

    pub fn quantization_tables(&self) -> &QuantizationTables {
        self.codec.tables()
    }

    /// Encodes an image whose dimensions are multiples of the block size.
    ///
    /// Use [Image::pad_to_multiple] for other images.
    pub fn encode(&self, image: &Image) -> CodecResult<EncodedStreams> {
        let n = self.block_size();
        let (blocks_v, blocks_h) = self.block_grid(image.rows(), image.cols())?;
        let num_blocks = blocks_v * blocks_h;
        let ac_len = self.codec.ac_len();

        log::debug!(
            "Encoding {}x{} image, {} blocks of {}x{}, factor {}",
            image.rows(),
            image.cols(),
            num_blocks,
            n,
            n,
            self.factor.get()
        );
        self.check_clamping();

        let mut streams = EncodedStreams::zeroed(n, num_blocks);

        for channel in Channel::ALL {
            let (dc, ac) = streams.channel_mut(channel);

            // 1x1 blocks carry no AC values, and zero sized chunks are not allowed
            if ac_len == 0 {
                self.encode_dc_only(image, channel, blocks_h, dc)?;
                continue;
            }

            #[cfg(feature = "parallel")]
            dc.par_iter_mut()
                .zip(ac.par_chunks_mut(ac_len))
                .enumerate()
                .try_for_each_init(
                    || new_worker(n),
                    |worker, (b, (dc, ac))| {
                        self.encode_block_at(image, channel, b, blocks_h, worker, dc, ac)
                    },
                )?;

            #[cfg(not(feature = "parallel"))]
            {
                let mut worker = new_worker(n);
                for (b, (dc, ac)) in dc.iter_mut().zip(ac.chunks_exact_mut(ac_len)).enumerate() {
                    self.encode_block_at(image, channel, b, blocks_h, &mut worker, dc, ac)?;
                }
            }
        }

        log::debug!(
            "Encoded {} DC and {} AC values per channel",
            streams.dc(Channel::Y).len(),
            streams.ac(Channel::Y).len()
        );

        Ok(streams)
    }

    /// Reconstructs a `rows x cols` image from streams made by [encode](Self::encode).
    pub fn decode(&self, streams: &EncodedStreams, rows: usize, cols: usize) -> CodecResult<Image> {
        let n = self.block_size();
        let (blocks_v, blocks_h) = self.block_grid(rows, cols)?;
        let num_blocks = blocks_v * blocks_h;

        if streams.block_size() != n {
            return Err(CodecError::malformed(alloc::format!(
                "streams use block size {}, codec uses {}",
                streams.block_size(),
                n
            )));
        }

        let ac_len = self.codec.ac_len();
        for channel in Channel::ALL {
            let dc = streams.dc(channel).len();
            let ac = streams.ac(channel).len();
            if dc != num_blocks || ac != num_blocks * ac_len {
                return Err(CodecError::malformed(alloc::format!(
                    "{:?} streams hold {} DC and {} AC values, expected {} and {}",
                    channel,
                    dc,
                    ac,
                    num_blocks,
                    num_blocks * ac_len
                )));
            }
        }

        log::debug!(
            "Decoding {}x{} image, {} blocks of {}x{}, factor {}",
            rows,
            cols,
            num_blocks,
            n,
            n,
            self.factor.get()
        );
        self.check_clamping();

        let mut pixels = alloc::vec![YCbCr::default(); rows * cols];

        #[cfg(feature = "parallel")]
        pixels
            .par_chunks_mut(n * cols)
            .enumerate()
            .try_for_each_init(
                || new_worker(n),
                |worker, (block_row, out)| {
                    self.decode_block_row(streams, block_row, blocks_h, cols, worker, out)
                },
            )?;

        #[cfg(not(feature = "parallel"))]
        {
            let mut worker = new_worker(n);
            for (block_row, out) in pixels.chunks_exact_mut(n * cols).enumerate() {
                self.decode_block_row(streams, block_row, blocks_h, cols, &mut worker, out)?;
            }
        }

        log::debug!("Decoded {} pixels", pixels.len());

        Image::from_pixels(rows, cols, pixels)
    }

    /// Number of block rows and block columns, if the dimensions are block aligned
    fn block_grid(&self, rows: usize, cols: usize) -> CodecResult<(usize, usize)> {
        let n = self.block_size();
        if rows == 0 || cols == 0 || rows % n != 0 || cols % n != 0 {
            return Err(CodecError::InvalidDimensions {
                rows,
                cols,
                block_size: n,
            });
        }
        Ok((rows / n, cols / n))
    }

    fn check_clamping(&self) {
        for class in [ChannelClass::Luma, ChannelClass::Chroma] {
            if self.codec.tables().table(class).clamps_at(self.factor) {
                log::warn!(
                    "Compression factor {} clamps {:?} divisors to 1",
                    self.factor.get(),
                    class
                );
            }
        }
    }

    fn encode_dc_only(
        &self,
        image: &Image,
        channel: Channel,
        blocks_h: usize,
        dc: &mut [i32],
    ) -> CodecResult<()> {
        let n = self.block_size();

        #[cfg(feature = "parallel")]
        dc.par_iter_mut().enumerate().try_for_each_init(
            || new_worker(n),
            |worker, (b, dc)| {
                self.encode_block_at(image, channel, b, blocks_h, worker, dc, &mut [])
            },
        )?;

        #[cfg(not(feature = "parallel"))]
        {
            let mut worker = new_worker(n);
            for (b, dc) in dc.iter_mut().enumerate() {
                self.encode_block_at(image, channel, b, blocks_h, &mut worker, dc, &mut [])?;
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn encode_block_at(
        &self,
        image: &Image,
        channel: Channel,
        b: usize,
        blocks_h: usize,
        worker: &mut Worker,
        dc: &mut i32,
        ac: &mut [i32],
    ) -> CodecResult<()> {
        let n = self.block_size();
        let (block_row, block_col) = (b / blocks_h, b % blocks_h);
        if block_col == 0 {
            log::trace!("Encoding {:?} block row {}", channel, block_row);
        }

        let (scratch, samples) = worker;
        image.read_block(channel, block_row * n, block_col * n, n, samples);
        *dc = self
            .codec
            .forward(samples, channel.class(), self.factor, scratch, ac)?;
        Ok(())
    }

    /// Decodes one row of blocks into `out`, which holds the `n` pixel rows it covers
    fn decode_block_row(
        &self,
        streams: &EncodedStreams,
        block_row: usize,
        blocks_h: usize,
        cols: usize,
        worker: &mut Worker,
        out: &mut [YCbCr],
    ) -> CodecResult<()> {
        let n = self.block_size();
        let ac_len = self.codec.ac_len();
        let (scratch, samples) = worker;

        log::trace!("Decoding block row {}", block_row);

        for block_col in 0..blocks_h {
            let b = block_row * blocks_h + block_col;

            for channel in Channel::ALL {
                let dc = streams.dc(channel)[b];
                let ac = &streams.ac(channel)[b * ac_len..(b + 1) * ac_len];
                self.codec
                    .inverse(dc, ac, channel.class(), self.factor, scratch, samples)?;

                for (x, line) in samples.chunks_exact(n).enumerate() {
                    let start = x * cols + block_col * n;
                    for (pixel, &s) in out[start..start + n].iter_mut().zip(line) {
                        *pixel.channel_mut(channel) = s;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantization::QuantizationTable;

    fn factor(f: f32) -> CompressionFactor {
        CompressionFactor::new(f).unwrap()
    }

    #[test]
    fn test_defaults() {
        let codec = ImageCodec::default();
        assert_eq!(codec.block_size(), 8);
        assert_eq!(codec.compression_factor(), CompressionFactor::DEFAULT);
        assert_eq!(
            codec.quantization_tables(),
            &QuantizationTables::standard(8)
        );
    }

    #[test]
    fn test_invalid_block_size() {
        assert!(matches!(
            ImageCodec::new(0),
            Err(CodecError::InvalidBlockSize(0))
        ));
        assert!(matches!(
            ImageCodec::new(MAX_BLOCK_SIZE + 1),
            Err(CodecError::InvalidBlockSize(_))
        ));
        assert!(ImageCodec::new(4).is_ok());
    }

    #[test]
    fn test_settings() {
        let mut codec = ImageCodec::default();

        codec.set_quality(75);
        assert_eq!(codec.compression_factor().get(), 0.5);

        codec.set_compression_factor(factor(3.0));
        assert_eq!(codec.compression_factor().get(), 3.0);

        codec
            .set_quantization_tables(QuantizationTableType::Flat, QuantizationTableType::Flat)
            .unwrap();
        assert_eq!(
            codec
                .quantization_tables()
                .divisor(ChannelClass::Chroma, 7, 7, CompressionFactor::DEFAULT)
                .unwrap(),
            16
        );

        let small = QuantizationTable::flat(4, 2);
        let tables = QuantizationTables::new(small.clone(), small).unwrap();
        assert!(codec.set_custom_tables(tables).is_err());
    }

    #[test]
    fn test_unaligned_dimensions() {
        let codec = ImageCodec::default();

        let image = Image::new(12, 16, YCbCr::WHITE);
        assert!(matches!(
            codec.encode(&image),
            Err(CodecError::InvalidDimensions {
                rows: 12,
                cols: 16,
                block_size: 8
            })
        ));

        let empty = Image::new(0, 0, YCbCr::WHITE);
        assert!(matches!(
            codec.encode(&empty),
            Err(CodecError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_constant_image() {
        let codec = ImageCodec::default();
        let image = Image::new(8, 8, YCbCr::new(128, 128, 128));

        let streams = codec.encode(&image).unwrap();
        assert_eq!(streams.dc(Channel::Y), &[64]);
        // round(1024 / 17)
        assert_eq!(streams.dc(Channel::Cb), &[60]);
        assert_eq!(streams.dc(Channel::Cr), &[60]);
        for channel in Channel::ALL {
            assert!(streams.ac(channel).iter().all(|&a| a == 0));
        }

        // 60 * 17 / 8 is exactly 127.5 for the chroma channels
        let decoded = codec.decode(&streams, 8, 8).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_block_size_1() {
        let codec = ImageCodec::new(1).unwrap();
        let image = Image::new(2, 3, YCbCr::new(100, 128, 128));

        let streams = codec.encode(&image).unwrap();
        assert_eq!(streams.num_blocks(), 6);
        // round(100 / 16) and round(128 / 17)
        assert_eq!(streams.dc(Channel::Y), &[6; 6]);
        assert_eq!(streams.dc(Channel::Cr), &[8; 6]);
        for channel in Channel::ALL {
            assert!(streams.ac(channel).is_empty());
        }

        let decoded = codec.decode(&streams, 2, 3).unwrap();
        assert!(decoded
            .pixels()
            .iter()
            .all(|&p| p == YCbCr::new(96, 136, 136)));
    }
}
