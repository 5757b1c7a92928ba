use alloc::vec::Vec;
use core::num::NonZeroU16;

use crate::error::{CodecError, CodecResult};

/// # Quantization table used for encoding
///
/// Tables are based on tables from mozjpeg. All presets are defined for 8x8 blocks and are
/// resampled to the nearest frequency for other block sizes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuantizationTableType {
    /// Sample quantization tables given in Annex K (Clause K.1) of Recommendation ITU-T T.81 (1992) | ISO/IEC 10918-1:1994.
    #[default]
    Default,

    /// Flat
    Flat,

    /// Custom, tuned for MS-SSIM
    CustomMsSsim,

    /// Custom, tuned for PSNR-HVS
    CustomPsnrHvs,

    /// ImageMagick table by N. Robidoux
    ///
    /// From <http://www.imagemagick.org/discourse-server/viewtopic.php?f=22&t=20333&p=98008#p98008>
    ImageMagick,

    /// Relevance of human vision to JPEG-DCT compression (1992) Klein, Silverstein and Carney.
    KleinSilversteinCarney,

    /// DCTune perceptual optimization of compressed dental X-Rays (1997) Watson, Taylor, Borthwick
    DentalXRays,

    /// A visual detection model for DCT coefficient quantization (12/9/93) Ahumada, Watson, Peterson
    VisualDetectionModel,

    /// An improved detection model for DCT coefficient quantization (1993) Peterson, Ahumada and Watson
    ImprovedDetectionModel,

    /// A user supplied table with `block_size²` values in row-major `(u, v)` order
    Custom(Vec<u16>),
}

impl QuantizationTableType {
    fn index(&self) -> Option<usize> {
        use QuantizationTableType::*;

        match self {
            Default => Some(0),
            Flat => Some(1),
            CustomMsSsim => Some(2),
            CustomPsnrHvs => Some(3),
            ImageMagick => Some(4),
            KleinSilversteinCarney => Some(5),
            DentalXRays => Some(6),
            VisualDetectionModel => Some(7),
            ImprovedDetectionModel => Some(8),
            Custom(_) => None,
        }
    }
}

// Tables are based on mozjpeg jcparam.c
static DEFAULT_LUMA_TABLES: [[u16; 64]; 9] = [
    [
        // Annex K
        16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69,
        56, 14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81,
        104, 113, 92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
    ],
    [
        // Flat
        16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
        16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
        16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
    ],
    [
        // Custom, tuned for MS-SSIM
        12, 17, 20, 21, 30, 34, 56, 63, 18, 20, 20, 26, 28, 51, 61, 55, 19, 20, 21, 26, 33, 58, 69,
        55, 26, 26, 26, 30, 46, 87, 86, 66, 31, 33, 36, 40, 46, 96, 100, 73, 40, 35, 46, 62, 81,
        100, 111, 91, 46, 66, 76, 86, 102, 121, 120, 101, 68, 90, 90, 96, 113, 102, 105, 103,
    ],
    [
        // Custom, tuned for PSNR-HVS
        9, 10, 12, 14, 27, 32, 51, 62, 11, 12, 14, 19, 27, 44, 59, 73, 12, 14, 18, 25, 42, 59, 79,
        78, 17, 18, 25, 42, 61, 92, 87, 92, 23, 28, 42, 75, 79, 112, 112, 99, 40, 42, 59, 84, 88,
        124, 132, 111, 42, 64, 78, 95, 105, 126, 125, 99, 70, 75, 100, 102, 116, 100, 107, 98,
    ],
    [
        // ImageMagick table by N. Robidoux
        // From http://www.imagemagick.org/discourse-server/viewtopic.php?f=22&t=20333&p=98008#p98008
        16, 16, 16, 18, 25, 37, 56, 85, 16, 17, 20, 27, 34, 40, 53, 75, 16, 20, 24, 31, 43, 62, 91,
        135, 18, 27, 31, 40, 53, 74, 106, 156, 25, 34, 43, 53, 69, 94, 131, 189, 37, 40, 62, 74,
        94, 124, 169, 238, 56, 53, 91, 106, 131, 169, 226, 311, 85, 75, 135, 156, 189, 238, 311,
        418,
    ],
    [
        // Relevance of human vision to JPEG-DCT compression (1992) Klein, Silverstein and Carney.
        10, 12, 14, 19, 26, 38, 57, 86, 12, 18, 21, 28, 35, 41, 54, 76, 14, 21, 25, 32, 44, 63, 92,
        136, 19, 28, 32, 41, 54, 75, 107, 157, 26, 35, 44, 54, 70, 95, 132, 190, 38, 41, 63, 75,
        95, 125, 170, 239, 57, 54, 92, 107, 132, 170, 227, 312, 86, 76, 136, 157, 190, 239, 312,
        419,
    ],
    [
        // DCTune perceptual optimization of compressed dental X-Rays (1997) Watson, Taylor, Borthwick
        7, 8, 10, 14, 23, 44, 95, 241, 8, 8, 11, 15, 25, 47, 102, 255, 10, 11, 13, 19, 31, 58, 127,
        255, 14, 15, 19, 27, 44, 83, 181, 255, 23, 25, 31, 44, 72, 136, 255, 255, 44, 47, 58, 83,
        136, 255, 255, 255, 95, 102, 127, 181, 255, 255, 255, 255, 241, 255, 255, 255, 255, 255,
        255, 255,
    ],
    [
        // A visual detection model for DCT coefficient quantization (12/9/93) Ahumada, Watson, Peterson
        15, 11, 11, 12, 15, 19, 25, 32, 11, 13, 10, 10, 12, 15, 19, 24, 11, 10, 14, 14, 16, 18, 22,
        27, 12, 10, 14, 18, 21, 24, 28, 33, 15, 12, 16, 21, 26, 31, 36, 42, 19, 15, 18, 24, 31, 38,
        45, 53, 25, 19, 22, 28, 36, 45, 55, 65, 32, 24, 27, 33, 42, 53, 65, 77,
    ],
    [
        // An improved detection model for DCT coefficient quantization (1993) Peterson, Ahumada and Watson
        14, 10, 11, 14, 19, 25, 34, 45, 10, 11, 11, 12, 15, 20, 26, 33, 11, 11, 15, 18, 21, 25, 31,
        38, 14, 12, 18, 24, 28, 33, 39, 47, 19, 15, 21, 28, 36, 43, 51, 59, 25, 20, 25, 33, 43, 54,
        64, 74, 34, 26, 31, 39, 51, 64, 77, 91, 45, 33, 38, 47, 59, 74, 91, 108,
    ],
];

// Tables are based on mozjpeg jcparam.c
static DEFAULT_CHROMA_TABLES: [[u16; 64]; 9] = [
    [
        // Annex K
        17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99,
        99, 47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    ],
    [
        // Flat
        16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
        16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
        16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16, 16,
    ],
    [
        // Custom, tuned for MS-SSIM
        8, 12, 15, 15, 86, 96, 96, 98, 13, 13, 15, 26, 90, 96, 99, 98, 12, 15, 18, 96, 99, 99, 99,
        99, 17, 16, 90, 96, 99, 99, 99, 99, 96, 96, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    ],
    [
        //Custom, tuned for PSNR-HVS
        9, 10, 17, 19, 62, 89, 91, 97, 12, 13, 18, 29, 84, 91, 88, 98, 14, 19, 29, 93, 95, 95, 98,
        97, 20, 26, 84, 88, 95, 95, 98, 94, 26, 86, 91, 93, 97, 99, 98, 99, 99, 100, 98, 99, 99,
        99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 97, 97, 99, 99, 99, 99, 97, 99,
    ],
    [
        // ImageMagick table by N. Robidoux
        // From http://www.imagemagick.org/discourse-server/viewtopic.php?f=22&t=20333&p=98008#p98008
        16, 16, 16, 18, 25, 37, 56, 85, 16, 17, 20, 27, 34, 40, 53, 75, 16, 20, 24, 31, 43, 62, 91,
        135, 18, 27, 31, 40, 53, 74, 106, 156, 25, 34, 43, 53, 69, 94, 131, 189, 37, 40, 62, 74,
        94, 124, 169, 238, 56, 53, 91, 106, 131, 169, 226, 311, 85, 75, 135, 156, 189, 238, 311,
        418,
    ],
    [
        // Relevance of human vision to JPEG-DCT compression (1992) Klein, Silverstein and Carney.
        10, 12, 14, 19, 26, 38, 57, 86, 12, 18, 21, 28, 35, 41, 54, 76, 14, 21, 25, 32, 44, 63, 92,
        136, 19, 28, 32, 41, 54, 75, 107, 157, 26, 35, 44, 54, 70, 95, 132, 190, 38, 41, 63, 75,
        95, 125, 170, 239, 57, 54, 92, 107, 132, 170, 227, 312, 86, 76, 136, 157, 190, 239, 312,
        419,
    ],
    [
        // DCTune perceptual optimization of compressed dental X-Rays (1997) Watson, Taylor, Borthwick
        7, 8, 10, 14, 23, 44, 95, 241, 8, 8, 11, 15, 25, 47, 102, 255, 10, 11, 13, 19, 31, 58, 127,
        255, 14, 15, 19, 27, 44, 83, 181, 255, 23, 25, 31, 44, 72, 136, 255, 255, 44, 47, 58, 83,
        136, 255, 255, 255, 95, 102, 127, 181, 255, 255, 255, 255, 241, 255, 255, 255, 255, 255,
        255, 255,
    ],
    [
        // A visual detection model for DCT coefficient quantization (12/9/93) Ahumada, Watson, Peterson
        15, 11, 11, 12, 15, 19, 25, 32, 11, 13, 10, 10, 12, 15, 19, 24, 11, 10, 14, 14, 16, 18, 22,
        27, 12, 10, 14, 18, 21, 24, 28, 33, 15, 12, 16, 21, 26, 31, 36, 42, 19, 15, 18, 24, 31, 38,
        45, 53, 25, 19, 22, 28, 36, 45, 55, 65, 32, 24, 27, 33, 42, 53, 65, 77,
    ],
    [
        // An improved detection model for DCT coefficient quantization (1993) Peterson, Ahumada and Watson
        14, 10, 11, 14, 19, 25, 34, 45, 10, 11, 11, 12, 15, 20, 26, 33, 11, 11, 15, 18, 21, 25, 31,
        38, 14, 12, 18, 24, 28, 33, 39, 47, 19, 15, 21, 28, 36, 43, 51, 59, 25, 20, 25, 33, 43, 54,
        64, 74, 34, 26, 31, 39, 51, 64, 77, 91, 45, 33, 38, 47, 59, 74, 91, 108,
    ],
];

/// Which of the two tables a channel is quantized with
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChannelClass {
    Luma,
    Chroma,
}

/// # Multiplier applied to every quantization divisor
///
/// Values above 1.0 give coarser quantization (more loss), values below 1.0 finer.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct CompressionFactor(f32);

impl CompressionFactor {
    pub const DEFAULT: CompressionFactor = CompressionFactor(1.0);

    pub fn new(factor: f32) -> CodecResult<CompressionFactor> {
        if factor.is_finite() && factor > 0.0 {
            Ok(CompressionFactor(factor))
        } else {
            Err(CodecError::InvalidCompressionFactor(factor))
        }
    }

    /// Maps a libjpeg quality setting (1..100) to a factor. Quality 50 is the unscaled table.
    pub fn from_quality(quality: u8) -> CompressionFactor {
        let quality = quality.clamp(1, 100) as u32;

        let scale = if quality < 50 {
            5000 / quality
        } else {
            200 - quality * 2
        };

        // Quality 100 would give a zero scale, use the smallest step instead
        CompressionFactor(scale.max(1) as f32 / 100.0)
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for CompressionFactor {
    fn default() -> Self {
        CompressionFactor::DEFAULT
    }
}

/// A single `N x N` table of quantization divisors, row-major by `(u, v)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    size: usize,
    table: Vec<NonZeroU16>,
}

impl QuantizationTable {
    pub fn new(
        q_type: &QuantizationTableType,
        class: ChannelClass,
        size: usize,
    ) -> CodecResult<QuantizationTable> {
        match q_type {
            QuantizationTableType::Custom(values) => Self::from_values(size, values),
            preset => {
                // index() is only None for Custom
                let index = preset.index().unwrap_or(0);
                let base = match class {
                    ChannelClass::Luma => &DEFAULT_LUMA_TABLES[index],
                    ChannelClass::Chroma => &DEFAULT_CHROMA_TABLES[index],
                };
                Ok(Self::resample(base, size))
            }
        }
    }

    /// Creates a table from user supplied values. Zero entries are raised to 1.
    pub fn from_values(size: usize, values: &[u16]) -> CodecResult<QuantizationTable> {
        if values.len() != size * size {
            return Err(CodecError::InvalidQuantizationTable {
                expected: size * size,
                actual: values.len(),
            });
        }

        let table = values.iter().map(|&v| to_divisor(v)).collect();
        Ok(QuantizationTable { size, table })
    }

    /// A table with the same divisor everywhere
    pub fn flat(size: usize, value: u16) -> QuantizationTable {
        QuantizationTable {
            size,
            table: alloc::vec![to_divisor(value); size * size],
        }
    }

    fn resample(base: &[u16; 64], size: usize) -> QuantizationTable {
        if size != 8 {
            log::debug!("Resampling 8x8 quantization table to {}x{}", size, size);
        }

        let mut table = Vec::with_capacity(size * size);
        for u in 0..size {
            let bu = u * 8 / size;
            for v in 0..size {
                let bv = v * 8 / size;
                table.push(to_divisor(base[bu * 8 + bv]));
            }
        }
        QuantizationTable { size, table }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the unscaled divisor at `(u, v)`
    pub fn get_raw(&self, u: usize, v: usize) -> CodecResult<u16> {
        self.check_index(u, v)?;
        Ok(self.table[u * self.size + v].get())
    }

    /// Returns `round(base * factor)`, never less than 1
    pub fn divisor(&self, u: usize, v: usize, factor: CompressionFactor) -> CodecResult<u32> {
        self.check_index(u, v)?;
        Ok(scale_divisor(self.table[u * self.size + v], factor))
    }

    /// Writes all scaled divisors in row-major order into `out`
    pub(crate) fn scaled_divisors(&self, factor: CompressionFactor, out: &mut [f32]) {
        for (o, &q) in out.iter_mut().zip(&self.table) {
            *o = scale_divisor(q, factor) as f32;
        }
    }

    /// True if `factor` pushes at least one divisor down to the minimum of 1 by clamping
    pub(crate) fn clamps_at(&self, factor: CompressionFactor) -> bool {
        self.table
            .iter()
            .any(|q| (f32::from(q.get()) * factor.get()).round() < 1.0)
    }

    fn check_index(&self, u: usize, v: usize) -> CodecResult<()> {
        if u >= self.size || v >= self.size {
            return Err(CodecError::InvalidIndex {
                table: "quantization table",
                index: (u, v),
                size: self.size,
            });
        }
        Ok(())
    }
}

#[inline(always)]
fn to_divisor(value: u16) -> NonZeroU16 {
    NonZeroU16::new(value).unwrap_or(NonZeroU16::MIN)
}

#[inline(always)]
fn scale_divisor(base: NonZeroU16, factor: CompressionFactor) -> u32 {
    let scaled = (f32::from(base.get()) * factor.get()).round();
    // float to int casts saturate, so very large factors end at u32::MAX
    (scaled as u32).max(1)
}

/// # Luma and chroma quantization tables
///
/// Channel 0 uses the luma table, channels 1 and 2 share the chroma table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTables {
    luma: QuantizationTable,
    chroma: QuantizationTable,
}

impl QuantizationTables {
    pub fn new(luma: QuantizationTable, chroma: QuantizationTable) -> CodecResult<Self> {
        if luma.size() != chroma.size() {
            return Err(CodecError::InvalidQuantizationTable {
                expected: luma.size() * luma.size(),
                actual: chroma.size() * chroma.size(),
            });
        }
        Ok(QuantizationTables { luma, chroma })
    }

    pub fn from_types(
        luma: &QuantizationTableType,
        chroma: &QuantizationTableType,
        size: usize,
    ) -> CodecResult<Self> {
        Ok(QuantizationTables {
            luma: QuantizationTable::new(luma, ChannelClass::Luma, size)?,
            chroma: QuantizationTable::new(chroma, ChannelClass::Chroma, size)?,
        })
    }

    /// Annex K tables for `size`
    pub fn standard(size: usize) -> Self {
        QuantizationTables {
            luma: QuantizationTable::resample(&DEFAULT_LUMA_TABLES[0], size),
            chroma: QuantizationTable::resample(&DEFAULT_CHROMA_TABLES[0], size),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.luma.size()
    }

    pub fn table(&self, class: ChannelClass) -> &QuantizationTable {
        match class {
            ChannelClass::Luma => &self.luma,
            ChannelClass::Chroma => &self.chroma,
        }
    }

    pub fn divisor(
        &self,
        class: ChannelClass,
        u: usize,
        v: usize,
        factor: CompressionFactor,
    ) -> CodecResult<u32> {
        self.table(class).divisor(u, v, factor)
    }
}
