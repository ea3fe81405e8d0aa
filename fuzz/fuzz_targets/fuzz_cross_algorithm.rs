#![no_main]

use libfuzzer_sys::fuzz_target;

use ackpool_core::calculator::{Calculator, PooledCalculator};
use ackpool_core::recursive::{closed_form, RecursiveCalculator};
use ackpool_core::worker;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // m in 0..=3, n capped so f(m, n) stays cheap
    let m = u64::from(data[0] % 4);
    let n = match m {
        0 | 1 => u64::from(u16::from_le_bytes([data[1], *data.get(2).unwrap_or(&0)])),
        2 => u64::from(data[1]),
        _ => u64::from(data[1] % 6),
    };

    let pooled = PooledCalculator::new().calculate(m, n);
    let recursive = RecursiveCalculator::new().calculate(m, n);

    assert_eq!(pooled, recursive, "Pooled != Recursive at f({m}, {n})");
    assert_eq!(pooled.ok(), closed_form(m, n), "closed form at f({m}, {n})");
    assert_eq!(worker::with_local(|w| w.live()).unwrap(), 0);
});
