use rustc_hash::FxHashMap;

/// Widest dust window the rolling base-10 hash supports without overflowing
/// its 32-bit counter.
pub const MAX_WINDOW: usize = 9;

fn base_code(byte: u8) -> u32 {
    match byte.to_ascii_uppercase() {
        b'N' => 1,
        b'A' => 2,
        b'C' => 3,
        b'G' => 4,
        b'T' => 5,
        _ => 0,
    }
}

/// Low-complexity score over every `k`-length window of `read`.
///
/// Each window is hashed by packing per-base digit codes into a rolling
/// base-10 integer, dropping the oldest digit as the window slides. Repeated
/// windows raise the score: each distinct window contributes
/// `count * (count - 1) / 2`, accumulated as a running sum over distinct
/// windows in scan order, and the grand total is divided by the number of
/// windows. Reads shorter than `k` score zero.
///
/// `k` must be between 1 and [`MAX_WINDOW`]; wider windows overflow the
/// rolling hash and are rejected as a configuration error before any read is
/// scored.
pub fn dust_score(read: &[u8], k: usize) -> f64 {
    assert!(
        (1..=MAX_WINDOW).contains(&k),
        "dust window size must be between 1 and {}",
        MAX_WINDOW
    );
    if read.len() < k {
        return 0.0;
    }

    let max_pow = 10u32.pow(k as u32 - 1);
    let mut counts: FxHashMap<u32, u32> = FxHashMap::default();
    let mut order = Vec::new();
    let mut hash = 0u32;

    for (i, &b) in read.iter().enumerate() {
        hash = hash * 10 + base_code(b);
        if i >= k - 1 {
            let count = counts.entry(hash).or_insert(0);
            if *count == 0 {
                order.push(hash);
            }
            *count += 1;
            hash %= max_pow;
        }
    }

    let mut score = 0.0;
    let mut total = 0.0;
    for hash in order {
        let count = counts[&hash] as f64;
        score += count * (count - 1.0) / 2.0;
        total += score;
    }

    total / ((read.len() - k + 1) as f64)
}
