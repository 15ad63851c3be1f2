use archmage::SimdToken;
use criterion::{BatchSize, BenchmarkGroup, Criterion, Throughput, measurement::WallTime};
use tailor::{PixelFormat, PlaneMut, PlaneRef, PostprocessOptions};

// === SIMD tier detection ===

fn probe<T: SimdToken>() -> &'static str {
    if T::summon().is_some() {
        "available"
    } else {
        "not available"
    }
}

fn print_simd_info() {
    eprintln!("=== SIMD Tier Detection ===");
    #[cfg(target_arch = "x86_64")]
    {
        eprintln!(
            "  AVX2+FMA (x86-64-v3):    {}",
            probe::<archmage::X64V3Token>()
        );
    }
    eprintln!("  Scalar:                  always available");
    eprintln!("===========================");
}

// === Scalar disable/enable via archmage ===

fn disable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(true);
}

fn enable_all_simd() {
    let _ = archmage::dangerously_disable_tokens_except_wasm(false);
}

// === Naive baselines ===

fn naive_narrow_swap_16_to_8(buf: &mut [u8], width: usize, rows: usize, stride: usize) {
    for y in 0..rows {
        for x in 0..width * 3 {
            let from = x - x % 3 + (2 - x % 3);
            let at = y * stride + from * 2;
            let v = u16::from_le_bytes([buf[at], buf[at + 1]]);
            buf[y * width * 3 + x] = (v >> 8) as u8;
        }
    }
}

fn naive_pack_16_to_10(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)) {
        let v = u16::from_le_bytes([s[0], s[1]]) >> 6;
        d.copy_from_slice(&v.to_le_bytes());
    }
}

fn naive_composite(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        let a = s[3] as u32;
        for c in 0..3 {
            d[c] = ((s[c] as u32 * a + 127) / 255) as u8;
        }
    }
}

fn naive_split(src: &[u8], dst: &mut [u8]) {
    let (luma, alpha) = dst.split_at_mut(src.len() / 2);
    for ((s, l), a) in src.chunks_exact(2).zip(luma).zip(alpha) {
        *l = s[0];
        *a = s[1];
    }
}

// === Benchmark helpers ===

const W: usize = 1920;
const H: usize = 1080;

fn pattern(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

/// In-place operation: tailor (best SIMD), tailor_scalar, naive. Every
/// iteration starts from a fresh copy of `buf`.
fn bench_inplace(
    group: &mut BenchmarkGroup<WallTime>,
    tailor_fn: fn(&mut [u8]),
    naive_fn: fn(&mut [u8]),
    buf: &[u8],
) {
    group.bench_function("tailor", |b| {
        b.iter_batched_ref(|| buf.to_vec(), |v| tailor_fn(v), BatchSize::LargeInput);
    });

    disable_all_simd();
    group.bench_function("tailor_scalar", |b| {
        b.iter_batched_ref(|| buf.to_vec(), |v| tailor_fn(v), BatchSize::LargeInput);
    });
    enable_all_simd();

    group.bench_function("naive", |b| {
        b.iter_batched_ref(|| buf.to_vec(), |v| naive_fn(v), BatchSize::LargeInput);
    });
}

/// Copy operation: tailor (best SIMD), tailor_scalar, naive.
fn bench_copy(
    group: &mut BenchmarkGroup<WallTime>,
    tailor_fn: fn(&[u8], &mut [u8]),
    naive_fn: fn(&[u8], &mut [u8]),
    src: &[u8],
    dst_len: usize,
) {
    group.bench_function("tailor", |b| {
        let mut dst = vec![0u8; dst_len];
        b.iter(|| tailor_fn(src, &mut dst));
    });

    disable_all_simd();
    group.bench_function("tailor_scalar", |b| {
        let mut dst = vec![0u8; dst_len];
        b.iter(|| tailor_fn(src, &mut dst));
    });
    enable_all_simd();

    group.bench_function("naive", |b| {
        let mut dst = vec![0u8; dst_len];
        b.iter(|| naive_fn(src, &mut dst));
    });
}

fn format(mode: &str) -> PixelFormat {
    mode.parse().unwrap()
}

// === Benchmark groups ===

// Codec rows are padded to 64 bytes
const PADDED_RGB16: usize = (W * 6).div_ceil(64) * 64;

fn tailor_decode_rgb16_to_bgr8(buf: &mut [u8]) {
    let plane = PlaneMut::new(buf, W, H, PADDED_RGB16, format("RGB;16")).unwrap();
    let opts = PostprocessOptions::new()
        .bgr(true)
        .packed(true)
        .target_depth(tailor::BitDepth::Eight);
    tailor::postprocess_decoded(plane, &opts).unwrap();
}

fn naive_decode_rgb16_to_bgr8(buf: &mut [u8]) {
    naive_narrow_swap_16_to_8(buf, W, H, PADDED_RGB16);
}

fn bench_decode_narrow_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_rgb16_to_packed_bgr8");
    let n = PADDED_RGB16 * H;
    group.throughput(Throughput::Bytes(n as u64));
    bench_inplace(
        &mut group,
        tailor_decode_rgb16_to_bgr8,
        naive_decode_rgb16_to_bgr8,
        &pattern(n),
    );
    group.finish();
}

fn tailor_pack_16_to_10(src: &[u8], dst: &mut [u8]) {
    let src = PlaneRef::packed(src, W, H, format("RGB;16")).unwrap();
    let mut dst = PlaneMut::packed(dst, W, H, format("RGB;10")).unwrap();
    tailor::pack_for_encode(&src, &mut dst).unwrap();
}

fn bench_encode_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_rgb16_to_rgb10");
    let n = W * H * 6;
    group.throughput(Throughput::Bytes(n as u64));
    bench_copy(
        &mut group,
        tailor_pack_16_to_10,
        naive_pack_16_to_10,
        &pattern(n),
        n,
    );
    group.finish();
}

fn tailor_composite(src: &[u8], dst: &mut [u8]) {
    let src = PlaneRef::packed(src, W, H, format("RGBa")).unwrap();
    let mut dst = PlaneMut::packed(dst, W, H, format("RGB")).unwrap();
    tailor::composite_rgba_to_rgb(&src, &mut dst).unwrap();
}

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite_rgba_to_rgb");
    let n = W * H * 4;
    group.throughput(Throughput::Bytes(n as u64));
    bench_copy(&mut group, tailor_composite, naive_composite, &pattern(n), W * H * 3);
    group.finish();
}

fn tailor_split(src: &[u8], dst: &mut [u8]) {
    let src = PlaneRef::packed(src, W, H, format("LA")).unwrap();
    let (l, a) = dst.split_at_mut(W * H);
    let mut luma = PlaneMut::packed(l, W, H, format("L")).unwrap();
    let mut alpha = PlaneMut::packed(a, W, H, format("L")).unwrap();
    tailor::deinterleave_luma_alpha(&src, &mut luma, &mut alpha).unwrap();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("deinterleave_la8");
    let n = W * H * 2;
    group.throughput(Throughput::Bytes(n as u64));
    bench_copy(&mut group, tailor_split, naive_split, &pattern(n), n);
    group.finish();
}

// === Custom main for tier detection before criterion runs ===

fn main() {
    print_simd_info();

    let mut criterion = Criterion::default().configure_from_args();
    bench_decode_narrow_swap(&mut criterion);
    bench_encode_pack(&mut criterion);
    bench_composite(&mut criterion);
    bench_split(&mut criterion);
    criterion.final_summary();
}
