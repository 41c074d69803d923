/// Reinterprets little-endian FP32 tensor bytes. Trailing bytes that do not
/// form a full value are ignored.
pub fn u8_to_f32_vec(v: &[u8]) -> Vec<f32> {
    v.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Rounds to the given number of decimals from the exact decimal expansion of
/// `value`. Exact ties go to the even digit.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse::<f64>().unwrap_or(value)
}
