//! Level-by-level loop driver for stencil kernels.
//!
//! A kernel writes one output array and reads any number of others. The
//! output is split into horizontal planes of `kk` values; each selected
//! plane is handed to the kernel exactly once, together with its level `k`.
//! With the `parallel` feature the planes are processed by rayon tasks,
//! which does not change results since every output cell has one writer.

use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Apply `kernel(k, plane)` to every plane `k` in `levels` of `out`.
///
/// `plane` is `out[k * kk .. (k + 1) * kk]`, so a kernel addresses its
/// output at `i + j * jj` and its inputs at `i + j * jj + k * kk`.
#[cfg(not(feature = "parallel"))]
pub fn for_each_level<F>(out: &mut [f64], kk: usize, levels: Range<usize>, kernel: F)
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    out.chunks_mut(kk)
        .enumerate()
        .skip(levels.start)
        .take(levels.len())
        .for_each(|(k, plane)| kernel(k, plane));
}

/// Apply `kernel(k, plane)` to every plane `k` in `levels` of `out`, in
/// parallel over planes.
///
/// `plane` is `out[k * kk .. (k + 1) * kk]`, so a kernel addresses its
/// output at `i + j * jj` and its inputs at `i + j * jj + k * kk`.
#[cfg(feature = "parallel")]
pub fn for_each_level<F>(out: &mut [f64], kk: usize, levels: Range<usize>, kernel: F)
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    out.par_chunks_mut(kk)
        .enumerate()
        .skip(levels.start)
        .take(levels.len())
        .for_each(|(k, plane)| kernel(k, plane));
}
