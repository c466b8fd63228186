//! Nearest-neighbour 3D LUT application.
//!
//! Each pixel's red, green and blue are quantised independently onto the
//! cube grid (`floor(v / 255 * (N - 1))`), combined into the linear index
//! `r + g·N + b·N²` and looked up in the LUT image's row-major packing.
//! Alpha, when present, is copied through untouched. The work is spread over
//! the rayon pool one pixel row at a time.

use rayon::prelude::*;

use crate::image_pipeline::lut::LutSpec;
use crate::image_pipeline::raster::{ChannelOrder, RasterBuffer};

/// Grid index of an 8-bit component on a cube of side `level`.
#[inline]
pub fn grid_index(value: u8, level: usize) -> usize {
    if level <= 1 {
        return 0;
    }
    let max = level - 1;
    let normalized = (value as f64 / 255.0) * max as f64;
    (normalized.floor() as usize).min(max)
}

/// Applies `lut` to `source`, writing colour bytes in `output_order`.
///
/// The result has the same width, height and channel count as the source.
pub fn apply_lut(source: &RasterBuffer, lut: &LutSpec, output_order: ChannelOrder) -> RasterBuffer {
    let channels = source.channels;
    let level = lut.level();
    let [src_r, src_g, src_b] = source.order.offsets();
    let [dst_r, dst_g, dst_b] = output_order.offsets();
    let row_len = source.width as usize * channels;

    let mut data = vec![0u8; source.data.len()];
    if row_len > 0 {
        data.par_chunks_mut(row_len)
            .zip(source.data.par_chunks(row_len))
            .for_each(|(out_row, in_row)| {
                for (out, px) in out_row
                    .chunks_exact_mut(channels)
                    .zip(in_row.chunks_exact(channels))
                {
                    let r = grid_index(px[src_r], level);
                    let g = grid_index(px[src_g], level);
                    let b = grid_index(px[src_b], level);
                    let [lr, lg, lb] = lut.entry(r + g * level + b * level * level);

                    out[dst_r] = lr;
                    out[dst_g] = lg;
                    out[dst_b] = lb;
                    if channels == 4 {
                        out[3] = px[3];
                    }
                }
            });
    }

    RasterBuffer {
        width: source.width,
        height: source.height,
        channels,
        order: output_order,
        data,
    }
}
