//! Property tests for balanced block/unblock sequences.

use hal::EnergyMode;
use node_sleep::{SleepArbiter, SleepError};
use proptest::prelude::*;

fn mode() -> impl Strategy<Value = EnergyMode> {
    (0usize..EnergyMode::COUNT).prop_map(|i| EnergyMode::from_index(i).unwrap())
}

proptest! {
    #[test]
    fn balanced_sequences_restore_the_starting_mode(
        modes in proptest::collection::vec(mode(), 0..12),
        seed in any::<u64>(),
    ) {
        let arbiter = SleepArbiter::with_limit(64);
        let before = arbiter.current_block_mode();

        let mut outstanding: Vec<EnergyMode> = Vec::new();
        for mode in &modes {
            arbiter.block(*mode);
            outstanding.push(*mode);

            let current = arbiter.current_block_mode();
            prop_assert!(outstanding.iter().all(|held| current <= *held));
        }

        // Release in a scrambled but deterministic order.
        let mut state = seed;
        while !outstanding.is_empty() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let pick = (state >> 33) as usize % outstanding.len();
            let mode = outstanding.swap_remove(pick);
            arbiter.unblock(mode);

            let current = arbiter.current_block_mode();
            prop_assert!(outstanding.iter().all(|held| current <= *held));
        }

        prop_assert_eq!(arbiter.current_block_mode(), before);
    }

    #[test]
    fn extra_unblock_is_detected(mode in mode(), blocks in 0u8..4) {
        let arbiter = SleepArbiter::new();
        for _ in 0..blocks {
            arbiter.block(mode);
        }
        for _ in 0..blocks {
            prop_assert!(arbiter.try_unblock(mode).is_ok());
        }

        prop_assert_eq!(arbiter.try_unblock(mode), Err(SleepError::Underflow { mode }));
        prop_assert_eq!(arbiter.votes(mode), 0);
    }
}
