use alloc::vec::Vec;

use crate::error::{CodecError, CodecResult};
use crate::fdct::TransformBasis;
use crate::quantization::{ChannelClass, CompressionFactor, QuantizationTables};
use crate::zigzag::ZigzagIndex;

/// Per-worker buffers for [BlockCodec]. One instance may be reused for any number of blocks.
#[derive(Debug, Clone)]
pub struct BlockScratch {
    samples: Vec<f32>,
    coefficients: Vec<f32>,
    tmp: Vec<f64>,
    divisors: Vec<f32>,
}

impl BlockScratch {
    pub fn new(block_size: usize) -> BlockScratch {
        let nn = block_size * block_size;
        BlockScratch {
            samples: alloc::vec![0.0; nn],
            coefficients: alloc::vec![0.0; nn],
            tmp: alloc::vec![0.0; nn],
            divisors: alloc::vec![0.0; nn],
        }
    }
}

/// # Transform, quantization and scan of single blocks
///
/// Holds the shared read-only state (basis, zig-zag order and tables). All methods take `&self`
/// so a single codec can be used from several threads at once, each with its own [BlockScratch].
#[derive(Debug, Clone)]
pub struct BlockCodec {
    basis: TransformBasis,
    zigzag: ZigzagIndex,
    tables: QuantizationTables,
}

impl BlockCodec {
    pub fn new(block_size: usize, tables: QuantizationTables) -> CodecResult<BlockCodec> {
        if tables.size() != block_size {
            return Err(CodecError::InvalidQuantizationTable {
                expected: block_size * block_size,
                actual: tables.size() * tables.size(),
            });
        }

        Ok(BlockCodec {
            basis: TransformBasis::new(block_size)?,
            zigzag: ZigzagIndex::new(block_size)?,
            tables,
        })
    }

    /// 8x8 blocks with the Annex K tables
    pub fn baseline() -> BlockCodec {
        BlockCodec {
            basis: TransformBasis::build(8),
            zigzag: ZigzagIndex::build(8),
            tables: QuantizationTables::standard(8),
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.basis.size()
    }

    /// Number of AC values per block
    #[inline]
    pub fn ac_len(&self) -> usize {
        let n = self.block_size();
        n * n - 1
    }

    pub fn basis(&self) -> &TransformBasis {
        &self.basis
    }

    pub fn zigzag(&self) -> &ZigzagIndex {
        &self.zigzag
    }

    pub fn tables(&self) -> &QuantizationTables {
        &self.tables
    }

    /// Replaces the tables. Fails if they were built for another block size.
    pub fn set_tables(&mut self, tables: QuantizationTables) -> CodecResult<()> {
        if tables.size() != self.block_size() {
            return Err(CodecError::InvalidQuantizationTable {
                expected: self.block_size() * self.block_size(),
                actual: tables.size() * tables.size(),
            });
        }
        self.tables = tables;
        Ok(())
    }

    /// Transforms and quantizes one row-major block.
    ///
    /// The AC coefficients are written to `ac` in zig-zag order with the DC position left out,
    /// the quantized DC coefficient is returned.
    pub fn forward(
        &self,
        block: &[u8],
        class: ChannelClass,
        factor: CompressionFactor,
        scratch: &mut BlockScratch,
        ac: &mut [i32],
    ) -> CodecResult<i32> {
        let n = self.block_size();
        self.check_block(block.len())?;
        self.check_ac(ac.len())?;
        self.prepare_divisors(class, factor, scratch);

        for (s, &p) in scratch.samples.iter_mut().zip(block) {
            *s = f32::from(p);
        }

        self.basis
            .forward(&scratch.samples, &mut scratch.coefficients, &mut scratch.tmp);

        let coefficients = &scratch.coefficients;
        let divisors = &scratch.divisors;
        let quantize = |natural: usize| (coefficients[natural] / divisors[natural]).round() as i32;

        let order = self.zigzag.scan_order();
        debug_assert_eq!(order.len(), n * n);

        for (out, &natural) in ac.iter_mut().zip(&order[1..]) {
            *out = quantize(natural as usize);
        }

        Ok(quantize(0))
    }

    /// Dequantizes and inverse transforms one block, the mirror of [forward](Self::forward).
    ///
    /// Reconstructed intensities are rounded to the nearest integer and clamped to `0..=255`.
    pub fn inverse(
        &self,
        dc: i32,
        ac: &[i32],
        class: ChannelClass,
        factor: CompressionFactor,
        scratch: &mut BlockScratch,
        block: &mut [u8],
    ) -> CodecResult<()> {
        self.check_ac(ac.len())?;
        self.check_block(block.len())?;
        self.prepare_divisors(class, factor, scratch);

        let order = self.zigzag.scan_order();
        let divisors = &scratch.divisors;
        let coefficients = &mut scratch.coefficients;

        coefficients[0] = dc as f32 * divisors[0];
        for (&q, &natural) in ac.iter().zip(&order[1..]) {
            let natural = natural as usize;
            coefficients[natural] = q as f32 * divisors[natural];
        }

        self.basis
            .inverse(coefficients, &mut scratch.samples, &mut scratch.tmp);

        for (out, &s) in block.iter_mut().zip(&scratch.samples) {
            *out = s.round().clamp(0.0, 255.0) as u8;
        }

        Ok(())
    }

    /// [forward](Self::forward) with freshly allocated scratch and output
    pub fn encode_block(
        &self,
        block: &[u8],
        class: ChannelClass,
        factor: CompressionFactor,
    ) -> CodecResult<(i32, Vec<i32>)> {
        let mut scratch = BlockScratch::new(self.block_size());
        let mut ac = alloc::vec![0; self.ac_len()];
        let dc = self.forward(block, class, factor, &mut scratch, &mut ac)?;
        Ok((dc, ac))
    }

    /// [inverse](Self::inverse) with freshly allocated scratch and output
    pub fn decode_block(
        &self,
        dc: i32,
        ac: &[i32],
        class: ChannelClass,
        factor: CompressionFactor,
    ) -> CodecResult<Vec<u8>> {
        let n = self.block_size();
        let mut scratch = BlockScratch::new(n);
        let mut block = alloc::vec![0; n * n];
        self.inverse(dc, ac, class, factor, &mut scratch, &mut block)?;
        Ok(block)
    }

    fn prepare_divisors(
        &self,
        class: ChannelClass,
        factor: CompressionFactor,
        scratch: &mut BlockScratch,
    ) {
        // scratch from another codec
        if scratch.divisors.len() != self.block_size() * self.block_size() {
            *scratch = BlockScratch::new(self.block_size());
        }

        self.tables
            .table(class)
            .scaled_divisors(factor, &mut scratch.divisors);
    }

    fn check_block(&self, len: usize) -> CodecResult<()> {
        let n = self.block_size();
        if len != n * n {
            return Err(CodecError::InvalidDimensions {
                rows: len / n,
                cols: n,
                block_size: n,
            });
        }
        Ok(())
    }

    fn check_ac(&self, len: usize) -> CodecResult<()> {
        if len != self.ac_len() {
            return Err(CodecError::malformed(alloc::format!(
                "expected {} AC values per block, got {}",
                self.ac_len(),
                len
            )));
        }
        Ok(())
    }
}
