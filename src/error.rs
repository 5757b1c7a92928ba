use thiserror::Error;

/// # Errors returned by the codec
///
/// All variants are contract violations; none of them leaves a partial result behind.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Image or block dimensions are not a multiple of the block size
    #[error("Invalid dimensions {rows}x{cols} for block size {block_size}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        block_size: usize,
    },

    /// Two images that should be compared have different sizes
    #[error("Image size mismatch: {expected:?} vs {actual:?}")]
    SizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Out of range lookup into a basis, quantization or zig-zag table
    #[error("Index {index:?} out of range for {table} of size {size}")]
    InvalidIndex {
        table: &'static str,
        index: (usize, usize),
        size: usize,
    },

    /// DC or AC stream does not match the expected block layout
    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    #[error("Invalid block size {0}, must be between 1 and {max}", max = crate::MAX_BLOCK_SIZE)]
    InvalidBlockSize(usize),

    #[error("Invalid compression factor {0}, must be positive and finite")]
    InvalidCompressionFactor(f32),

    #[error("Invalid quantization table: expected {expected} values, got {actual}")]
    InvalidQuantizationTable { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

impl CodecError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        CodecError::MalformedStream(msg.into())
    }
}
