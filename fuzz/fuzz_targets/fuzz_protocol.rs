#![no_main]

use libfuzzer_sys::fuzz_target;

use ackpool_core::calculator::Fault;
use ackpool_core::worker::Worker;
use ackpool_core::OpToken;

// Arbitrary sequences of protocol calls must never panic, and every misuse
// must come back as an error.
fuzz_target!(|data: &[u8]| {
    let mut worker = Worker::new();
    let mut tokens: Vec<OpToken> = Vec::new();

    for chunk in data.chunks(2) {
        let op = chunk[0] % 7;
        let arg = chunk.get(1).copied().unwrap_or(0);
        let pick = |tokens: &[OpToken]| {
            (!tokens.is_empty()).then(|| tokens[usize::from(arg) % tokens.len()])
        };
        match op {
            0 => {
                if let Ok(token) = worker.start(u64::from(arg % 3), u64::from(arg % 5)) {
                    tokens.push(token);
                }
            }
            1 => {
                if let Some(token) = pick(&tokens) {
                    let _ = worker.set_result(token, u64::from(arg));
                }
            }
            2 => {
                if let Some(token) = pick(&tokens) {
                    let _ = worker.set_fault(token, Fault::Overflow { n: u64::from(arg) });
                }
            }
            3 => {
                if let Some(token) = pick(&tokens) {
                    let _ = worker.release(token);
                }
            }
            4 => {
                if let Some(token) = pick(&tokens) {
                    let _ = worker.result(token);
                    let _ = worker.status(token);
                }
            }
            5 => {
                if worker.step().is_err() {
                    worker.abandon();
                }
            }
            _ => {
                worker.abandon();
                for token in &tokens {
                    assert!(worker.result(*token).is_err());
                }
            }
        }
    }

    // A worker that saw arbitrary misuse still computes correctly once reset.
    worker.abandon();
    assert_eq!(worker.compute(2, 2), Ok(7));
    assert_eq!(worker.live(), 0);
});
