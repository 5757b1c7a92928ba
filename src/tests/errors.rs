use crate::{CodecError, EncodedStreams, Image, ImageCodec, YCbCr};

fn encoded(rows: usize, cols: usize) -> (ImageCodec, EncodedStreams) {
    let codec = ImageCodec::default();
    let image = Image::new(rows, cols, YCbCr::new(90, 120, 140));
    let streams = codec.encode(&image).unwrap();
    (codec, streams)
}

#[test]
fn decode_unaligned_dimensions() {
    let (codec, streams) = encoded(16, 16);

    assert!(matches!(
        codec.decode(&streams, 16, 12),
        Err(CodecError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        codec.decode(&streams, 0, 16),
        Err(CodecError::InvalidDimensions { .. })
    ));
}

#[test]
fn decode_wrong_block_count() {
    let (codec, streams) = encoded(16, 16);

    // Aligned, but eight blocks instead of four
    assert!(matches!(
        codec.decode(&streams, 32, 16),
        Err(CodecError::MalformedStream(_))
    ));
}

#[test]
fn decode_truncated_streams() {
    let (codec, streams) = encoded(16, 16);
    let (dc, ac) = streams.into_parts();

    let mut short_ac = ac.clone();
    short_ac[2].pop();
    let truncated = EncodedStreams::new(8, dc.clone(), short_ac);
    assert!(matches!(
        codec.decode(&truncated, 16, 16),
        Err(CodecError::MalformedStream(_))
    ));

    let mut long_dc = dc;
    long_dc[1].push(0);
    let extended = EncodedStreams::new(8, long_dc, ac);
    assert!(matches!(
        codec.decode(&extended, 16, 16),
        Err(CodecError::MalformedStream(_))
    ));
}

#[test]
fn decode_block_size_mismatch() {
    let small = ImageCodec::new(4).unwrap();
    let image = Image::new(16, 16, YCbCr::WHITE);
    let streams = small.encode(&image).unwrap();

    assert!(matches!(
        ImageCodec::default().decode(&streams, 16, 16),
        Err(CodecError::MalformedStream(_))
    ));
}

#[test]
fn errors_display() {
    let err = CodecError::InvalidDimensions {
        rows: 10,
        cols: 12,
        block_size: 8,
    };
    assert_eq!(err.to_string(), "Invalid dimensions 10x12 for block size 8");

    let err = CodecError::InvalidBlockSize(0);
    assert_eq!(
        err.to_string(),
        "Invalid block size 0, must be between 1 and 32"
    );
}
