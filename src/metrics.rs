//! Error measures between an image and its reconstruction

use crate::error::{CodecError, CodecResult};
use crate::image::{Channel, Image, YCbCr};

fn check_sizes(a: &Image, b: &Image) -> CodecResult<()> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(CodecError::SizeMismatch {
            expected: (a.rows(), a.cols()),
            actual: (b.rows(), b.cols()),
        });
    }
    Ok(())
}

fn channels(channel: Option<Channel>) -> &'static [Channel] {
    match channel {
        Some(Channel::Y) => &[Channel::Y],
        Some(Channel::Cb) => &[Channel::Cb],
        Some(Channel::Cr) => &[Channel::Cr],
        None => &Channel::ALL,
    }
}

/// Sum of squared sample differences over one channel, or all three for `None`
pub fn sum_squared_error(a: &Image, b: &Image, channel: Option<Channel>) -> CodecResult<u64> {
    check_sizes(a, b)?;

    let channels = channels(channel);
    let sum = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(&pa, &pb)| {
            channels
                .iter()
                .map(|&c| {
                    let d = u64::from(pa.channel(c).abs_diff(pb.channel(c)));
                    d * d
                })
                .sum::<u64>()
        })
        .sum();

    Ok(sum)
}

/// Mean of the squared sample differences. Zero for empty images.
pub fn mean_squared_error(a: &Image, b: &Image, channel: Option<Channel>) -> CodecResult<f64> {
    let sse = sum_squared_error(a, b, channel)?;
    let samples = a.pixels().len() * channels(channel).len();
    if samples == 0 {
        return Ok(0.0);
    }
    Ok(sse as f64 / samples as f64)
}

/// Peak signal to noise ratio in dB for 8 bit samples, infinite for identical images
pub fn psnr(a: &Image, b: &Image, channel: Option<Channel>) -> CodecResult<f64> {
    let mse = mean_squared_error(a, b, channel)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0 * 255.0 / mse).log10())
}

/// Visualizes `a - b` per channel as `enhancement * (a - b) + 127.5`, rounded and clamped.
///
/// Equal samples map to 128, larger `enhancement` makes small errors visible.
pub fn difference_image(a: &Image, b: &Image, enhancement: f32) -> CodecResult<Image> {
    check_sizes(a, b)?;

    let diff = |x: u8, y: u8| {
        let d = f32::from(x) - f32::from(y);
        (enhancement * d + 127.5).round().clamp(0.0, 255.0) as u8
    };

    let pixels = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(&pa, &pb)| {
            YCbCr::new(diff(pa.y, pb.y), diff(pa.cb, pb.cb), diff(pa.cr, pb.cr))
        })
        .collect();

    Image::from_pixels(a.rows(), a.cols(), pixels)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_squared_error() {
        let a = Image::new(2, 2, YCbCr::new(10, 20, 30));
        let mut b = a.clone();
        *b.get_mut(0, 1).unwrap() = YCbCr::new(13, 16, 30);

        assert_eq!(sum_squared_error(&a, &b, Some(Channel::Y)).unwrap(), 9);
        assert_eq!(sum_squared_error(&a, &b, Some(Channel::Cb)).unwrap(), 16);
        assert_eq!(sum_squared_error(&a, &b, Some(Channel::Cr)).unwrap(), 0);
        assert_eq!(sum_squared_error(&a, &b, None).unwrap(), 25);

        assert_abs_diff_eq!(mean_squared_error(&a, &b, Some(Channel::Y)).unwrap(), 2.25);
        assert_abs_diff_eq!(mean_squared_error(&a, &b, None).unwrap(), 25.0 / 12.0);
    }

    #[test]
    fn test_psnr() {
        let a = Image::new(4, 4, YCbCr::new(100, 100, 100));
        assert!(psnr(&a, &a, None).unwrap().is_infinite());

        // Every sample off by one gives mse 1
        let b = Image::new(4, 4, YCbCr::new(101, 99, 101));
        assert_abs_diff_eq!(
            psnr(&a, &b, None).unwrap(),
            20.0 * 255f64.log10(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_difference_image() {
        let a = Image::new(1, 2, YCbCr::new(100, 50, 0));
        let b = Image::from_pixels(1, 2, vec![YCbCr::new(100, 52, 255), YCbCr::new(90, 50, 0)])
            .unwrap();

        let diff = difference_image(&a, &b, 4.0).unwrap();
        assert_eq!(diff.get(0, 0), Some(YCbCr::new(128, 120, 0)));
        assert_eq!(diff.get(0, 1), Some(YCbCr::new(168, 128, 128)));
    }

    #[test]
    fn test_size_mismatch() {
        let a = Image::new(2, 2, YCbCr::WHITE);
        let b = Image::new(2, 3, YCbCr::WHITE);
        assert!(matches!(
            sum_squared_error(&a, &b, None),
            Err(CodecError::SizeMismatch { .. })
        ));
        assert!(difference_image(&a, &b, 1.0).is_err());
    }
}
