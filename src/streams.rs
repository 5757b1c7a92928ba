use alloc::vec::Vec;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::CodecResult;
use crate::image::Channel;

/// # Quantized coefficients of an encoded image
///
/// One DC and one AC stream per channel, in [Channel] order. Block `b` of channel `k` owns
/// `dc[k][b]` and `ac[k][b * (N² - 1)..(b + 1) * (N² - 1)]`, blocks counted in raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStreams {
    block_size: usize,
    dc: [Vec<i32>; 3],
    ac: [Vec<i32>; 3],
}

impl EncodedStreams {
    /// Wraps existing streams, e.g. ones produced by an entropy decoder.
    ///
    /// Lengths are only checked when the streams are decoded.
    pub fn new(block_size: usize, dc: [Vec<i32>; 3], ac: [Vec<i32>; 3]) -> EncodedStreams {
        EncodedStreams { block_size, dc, ac }
    }

    /// Zero-filled streams for `num_blocks` blocks per channel
    pub(crate) fn zeroed(block_size: usize, num_blocks: usize) -> EncodedStreams {
        let ac_len = num_blocks * (block_size * block_size - 1);
        EncodedStreams {
            block_size,
            dc: core::array::from_fn(|_| alloc::vec![0; num_blocks]),
            ac: core::array::from_fn(|_| alloc::vec![0; ac_len]),
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks in the luma DC stream
    pub fn num_blocks(&self) -> usize {
        self.dc[0].len()
    }

    pub fn dc(&self, channel: Channel) -> &[i32] {
        &self.dc[channel.index()]
    }

    pub fn ac(&self, channel: Channel) -> &[i32] {
        &self.ac[channel.index()]
    }

    /// DC and AC streams of one channel
    pub(crate) fn channel_mut(&mut self, channel: Channel) -> (&mut [i32], &mut [i32]) {
        (&mut self.dc[channel.index()], &mut self.ac[channel.index()])
    }

    pub fn into_parts(self) -> ([Vec<i32>; 3], [Vec<i32>; 3]) {
        (self.dc, self.ac)
    }

    /// Writes the streams as plain text.
    ///
    /// For every channel `k` a `DCencoding[k]` header, the space separated values and an empty
    /// line, followed by the same for `ACencoding[k]`.
    pub fn write_debug<W: Write>(&self, w: &mut W) -> CodecResult<()> {
        for (k, dc) in self.dc.iter().enumerate() {
            write_stream(w, "DCencoding", k, dc)?;
        }
        for (k, ac) in self.ac.iter().enumerate() {
            write_stream(w, "ACencoding", k, ac)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn write_debug_file<P: AsRef<Path>>(&self, path: P) -> CodecResult<()> {
        let path = path.as_ref();
        log::debug!("Writing stream dump to {}", path.display());

        let mut w = BufWriter::new(File::create(path)?);
        self.write_debug(&mut w)
    }
}

fn write_stream<W: Write>(w: &mut W, name: &str, k: usize, values: &[i32]) -> CodecResult<()> {
    writeln!(w, "{}[{}]", name, k)?;
    let mut first = true;
    for v in values {
        if !first {
            w.write_all(b" ")?;
        }
        write!(w, "{}", v)?;
        first = false;
    }
    writeln!(w)?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_debug() {
        let streams = EncodedStreams::new(
            2,
            [vec![1, -2], vec![3, 4], vec![]],
            [vec![0, 0, 1, -1, 5, 6], vec![7; 6], vec![]],
        );

        let mut out = Vec::new();
        streams.write_debug(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "DCencoding[0]\n1 -2\n\n\
                        DCencoding[1]\n3 4\n\n\
                        DCencoding[2]\n\n\n\
                        ACencoding[0]\n0 0 1 -1 5 6\n\n\
                        ACencoding[1]\n7 7 7 7 7 7\n\n\
                        ACencoding[2]\n\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_zeroed_lengths() {
        let streams = EncodedStreams::zeroed(8, 6);
        assert_eq!(streams.num_blocks(), 6);
        for channel in Channel::ALL {
            assert_eq!(streams.dc(channel).len(), 6);
            assert_eq!(streams.ac(channel).len(), 6 * 63);
        }
    }
}
