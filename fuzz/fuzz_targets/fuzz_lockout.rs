#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use shakeguard_core::{LockoutState, MAX_FAILED_ATTEMPTS};

#[derive(Debug, Arbitrary)]
enum Op {
    Failure { advance_ms: u32 },
    Success,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut state = LockoutState::new();
    let mut now_ms: u64 = 0;

    for op in ops {
        match op {
            Op::Failure { advance_ms } => {
                now_ms += u64::from(advance_ms);
                let was_locked = state.is_locked_out(now_ms);
                let tripped = state.record_failure(now_ms);

                // Failures while locked out must be inert
                if was_locked {
                    assert!(!tripped);
                }
                if tripped {
                    assert!(state.is_locked_out(now_ms));
                }
            }
            Op::Success => {
                state.record_success();
                assert_eq!(state.failed_attempts, 0);
                assert_eq!(state.locked_until_ms, None);
            }
        }

        // The counter never reaches the limit, and a live lockout always
        // coincides with a zeroed counter
        assert!(state.failed_attempts < MAX_FAILED_ATTEMPTS);
        if state.is_locked_out(now_ms) {
            assert_eq!(state.failed_attempts, 0);
        }
    }
});
