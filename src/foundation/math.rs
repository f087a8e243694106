use std::cmp::Ordering;

/// Compare two dotted-numeric version strings segment by segment.
///
/// Missing or non-numeric segments count as zero, so `"1.21"` equals
/// `"1.21.0"`. Empty strings sort below any non-empty version.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = a.trim();
    let b = b.trim();
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let parts_a: Vec<u64> = a.split('.').map(|s| s.parse().unwrap_or(0)).collect();
    let parts_b: Vec<u64> = b.split('.').map(|s| s.parse().unwrap_or(0)).collect();
    let len = parts_a.len().max(parts_b.len());
    for i in 0..len {
        let va = parts_a.get(i).copied().unwrap_or(0);
        let vb = parts_b.get(i).copied().unwrap_or(0);
        match va.cmp(&vb) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    Ordering::Equal
}

/// Epsilon equality used when probing range-dispatch thresholds.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6
}

/// Integer upscale factor for face textures: the largest power of two `s`
/// with `s <= output_size`, divided by the 16px tile size, floored, never
/// below 1. Requested 64 -> 4, 50 -> 2, 16 -> 1.
pub fn upscale_factor(output_size: u32) -> u32 {
    let mut s = 1u32;
    while s * 2 <= output_size {
        s *= 2;
    }
    (s / 16).max(1)
}
