// SIMD kernels for the hot paths of the in-memory model:
// dot products during nearest-neighbor scans and weighted accumulation
// while composing expressions. Scalar fallbacks keep two accumulators
// so the compiler can pipeline them.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 32;

#[cfg(target_arch = "aarch64")]
const MIN_DIM_SIZE_NEON: usize = 16;

/// Dot product of two equal-length slices.
///
/// Returns 0.0 when the lengths differ.
#[inline]
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
            && a.len() >= MIN_DIM_SIZE_AVX
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") && a.len() >= MIN_DIM_SIZE_NEON {
            return unsafe { dot_product_neon(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;

    let mut acc_lo = _mm256_setzero_ps();
    let mut acc_hi = _mm256_setzero_ps();

    while i + 15 < dim {
        let xa = _mm256_loadu_ps(a.as_ptr().add(i));
        let xb = _mm256_loadu_ps(b.as_ptr().add(i));
        let ya = _mm256_loadu_ps(a.as_ptr().add(i + 8));
        let yb = _mm256_loadu_ps(b.as_ptr().add(i + 8));

        acc_lo = _mm256_fmadd_ps(xa, xb, acc_lo);
        acc_hi = _mm256_fmadd_ps(ya, yb, acc_hi);

        i += 16;
    }

    let combined = _mm256_add_ps(acc_lo, acc_hi);
    let upper = _mm256_extractf128_ps(combined, 1);
    let lower = _mm256_castps256_ps128(combined);
    let mut folded = _mm_add_ps(upper, lower);
    folded = _mm_hadd_ps(folded, folded);
    folded = _mm_hadd_ps(folded, folded);

    let mut dot = _mm_cvtss_f32(folded);
    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }
    dot
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn dot_product_neon(a: &[f32], b: &[f32]) -> f32 {
    let dim = a.len();
    let mut i = 0;

    let mut acc_lo = vdupq_n_f32(0.0);
    let mut acc_hi = vdupq_n_f32(0.0);

    while i + 7 < dim {
        acc_lo = vfmaq_f32(acc_lo, vld1q_f32(a.as_ptr().add(i)), vld1q_f32(b.as_ptr().add(i)));
        acc_hi = vfmaq_f32(
            acc_hi,
            vld1q_f32(a.as_ptr().add(i + 4)),
            vld1q_f32(b.as_ptr().add(i + 4)),
        );
        i += 8;
    }

    let mut dot = vaddvq_f32(vaddq_f32(acc_lo, acc_hi));
    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }
    dot
}

#[inline]
fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    let mut even = 0.0f32;
    let mut odd = 0.0f32;

    let pairs_a = a.chunks_exact(2);
    let tail = pairs_a.remainder();
    for (pa, pb) in pairs_a.zip(b.chunks_exact(2)) {
        even += pa[0] * pb[0];
        odd += pa[1] * pb[1];
    }
    if let Some(last) = tail.first() {
        even += last * b[a.len() - 1];
    }

    even + odd
}

/// `acc += weight * x`, element-wise. Extra elements of the longer slice are ignored.
#[inline]
pub fn scaled_add(acc: &mut [f32], weight: f32, x: &[f32]) {
    for (dst, src) in acc.iter_mut().zip(x) {
        *dst += weight * src;
    }
}

/// Euclidean norm of a slice.
#[inline]
pub fn norm_simd(v: &[f32]) -> f32 {
    dot_product_simd(v, v).sqrt()
}
