#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use shakeguard_core::{
    Outcome, Step, VerificationSession, MAX_TARGET_SHAKES, MIN_TARGET_SHAKES,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Shake,
    Tick,
    Cancel,
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (raw_target, ops) = input;
    let target =
        MIN_TARGET_SHAKES + raw_target % (MAX_TARGET_SHAKES - MIN_TARGET_SHAKES + 1);
    let mut session = VerificationSession::new(target);

    let mut terminal_steps = 0u32;
    let mut last_count = 0u8;

    for op in ops {
        let before = session.outcome();
        let step = match op {
            Op::Shake => session.apply_shake(),
            Op::Tick => session.tick(),
            Op::Cancel => session.cancel(),
        };

        if step.is_terminal() {
            terminal_steps += 1;
        }

        // Inputs after a terminal outcome must change nothing
        if before.is_terminal() {
            assert_eq!(step, Step::Ignored);
            assert_eq!(session.outcome(), before);
        }

        // Progress is monotone and capped at the target
        assert!(session.count() >= last_count);
        assert!(session.count() <= target);
        last_count = session.count();
    }

    // At most one terminal transition per session
    assert!(terminal_steps <= 1);
    if terminal_steps == 0 {
        assert_eq!(session.outcome(), Outcome::Pending);
    } else {
        assert!(session.outcome().is_terminal());
    }
});
