// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-neighbour rescaling, used to mirror a composite onto an output of
//! a different resolution.

use crate::color::Pixel;

/// Rescales `src` (`src_width × src_height`) into `dst`
/// (`dst_width × dst_height`) by nearest-neighbour sampling.
///
/// Destination pixel `(x, y)` takes source pixel
/// `(x * src_width / dst_width, y * src_height / dst_height)`.
///
/// Returns `false` and leaves `dst` untouched if either buffer is shorter
/// than its stated dimensions. An empty source or destination is a no-op.
pub fn scale_nearest(
    src: &[Pixel],
    src_width: u32,
    src_height: u32,
    dst: &mut [Pixel],
    dst_width: u32,
    dst_height: u32,
) -> bool {
    let (sw, sh) = (src_width as usize, src_height as usize);
    let (dw, dh) = (dst_width as usize, dst_height as usize);
    let fits = |len: usize, w: usize, h: usize| w.checked_mul(h).is_some_and(|n| n <= len);
    if !fits(src.len(), sw, sh) || !fits(dst.len(), dw, dh) {
        return false;
    }
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
        return true;
    }

    for (y, row) in dst.chunks_exact_mut(dw).take(dh).enumerate() {
        let src_row = &src[(y * sh / dh) * sw..][..sw];
        for (x, out) in row.iter_mut().enumerate() {
            *out = src_row[x * sw / dw];
        }
    }
    true
}
