// Full range BT.601 RGB -> YCbCr, the JPEG (JFIF) equations.

use rgb::RGB8;

use crate::image::YCbCr;

// --- Constants for BT.601 Full Range YCbCr <-> RGB ---
const KR: f32 = 0.299;
const KG: f32 = 0.587;
const KB: f32 = 0.114;

// Cb = 0.5 * (B - Y) / (1 - KB), Cr = 0.5 * (R - Y) / (1 - KR), centered at 128
const CB_SCALE: f32 = 0.5 / (1.0 - KB);
const CR_SCALE: f32 = 0.5 / (1.0 - KR);

#[inline(always)]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Converts one RGB pixel to YCbCr with all components in [0, 255]
#[inline]
pub fn rgb_to_ycbcr(pixel: RGB8) -> YCbCr {
    let r = f32::from(pixel.r);
    let g = f32::from(pixel.g);
    let b = f32::from(pixel.b);

    let y = KR * r + KG * g + KB * b;
    let cb = 128.0 + (b - y) * CB_SCALE;
    let cr = 128.0 + (r - y) * CR_SCALE;

    YCbCr::new(to_u8(y), to_u8(cb), to_u8(cr))
}

/// Converts a row of RGB pixels into `out`. Both slices must have the same length.
pub fn rgb_row_to_ycbcr(row: &[RGB8], out: &mut [YCbCr]) {
    debug_assert_eq!(row.len(), out.len());
    for (o, &p) in out.iter_mut().zip(row) {
        *o = rgb_to_ycbcr(p);
    }
}
