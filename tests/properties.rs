//! Property tests for the processor, channels, ring and permutation generator.

use amplifier::io::{Constant, LastValue, Queue};
use amplifier::{AmplifierNetwork, IoChannel, Permutations, Processor, Program, FEEDBACK_PHASES};
use proptest::prelude::*;
use std::collections::HashSet;

const COMPARE_TO_EIGHT: [i64; 47] = [
    3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0, 0,
    1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4, 20, 1105,
    1, 46, 98, 99,
];

const FEEDBACK_PROGRAM: [i64; 29] = [
    3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1, 28, 1005,
    28, 6, 99, 0, 0, 5,
];

const MAX_PASSES: usize = 1000;

fn run_with_input(value: i64) -> (Vec<i64>, Vec<i64>) {
    let input = Queue::from(vec![value]);
    let output = Queue::new();
    let mut processor = Processor::connected(COMPARE_TO_EIGHT.to_vec(), &input, &output);
    processor.run_until_halt().unwrap();
    let memory = processor.into_memory().into_vec();
    (memory, output.into_vec())
}

#[derive(Debug, Clone)]
enum ChannelOp {
    Write(i64),
    Read,
    Reset,
}

fn channel_op() -> impl Strategy<Value = ChannelOp> {
    prop_oneof![
        any::<i64>().prop_map(ChannelOp::Write),
        Just(ChannelOp::Read),
        Just(ChannelOp::Reset),
    ]
}

proptest! {
    #[test]
    fn execution_is_deterministic(value in -1000i64..1000) {
        let first = run_with_input(value);
        let second = run_with_input(value);
        prop_assert_eq!(&first, &second);

        let expected = if value < 8 { 999 } else if value == 8 { 1000 } else { 1001 };
        prop_assert_eq!(first.1, vec![expected]);
    }

    #[test]
    fn echo_reproduces_input(value in any::<i64>()) {
        let output = LastValue::new();
        let mut processor = Processor::connected(vec![3, 0, 4, 0, 99], Constant(value), &output);
        processor.run_until_halt().unwrap();
        prop_assert_eq!(output.get(), Some(value));
    }

    #[test]
    fn reset_starts_over(steps in 0usize..60, value in -20i64..20) {
        let input = Constant(value);
        let output = LastValue::new();
        let mut processor = Processor::connected(COMPARE_TO_EIGHT.to_vec(), input, &output);
        for _ in 0..steps {
            processor.step().unwrap();
        }

        processor.reset(COMPARE_TO_EIGHT.to_vec());
        prop_assert!(!processor.halted());
        prop_assert!(!processor.io_blocked());
        prop_assert_eq!(processor.pc(), 0);

        processor.run_until_halt().unwrap();
        let fresh = run_with_input(value);
        prop_assert_eq!(processor.memory(), &fresh.0[..]);
        prop_assert_eq!(output.get(), fresh.1.last().cloned());
    }

    #[test]
    fn channel_holds_at_most_one_value(ops in prop::collection::vec(channel_op(), 0..50)) {
        let channel = IoChannel::new("test");
        let mut model: Option<i64> = None;
        for op in ops {
            match op {
                ChannelOp::Write(value) => {
                    prop_assert_eq!(channel.write(value), model.is_none());
                    if model.is_none() {
                        model = Some(value);
                    }
                }
                ChannelOp::Read => {
                    prop_assert_eq!(channel.read(), model.take());
                }
                ChannelOp::Reset => {
                    channel.reset();
                    model = None;
                }
            }
            prop_assert_eq!(channel.peek(), model);
        }
    }

    #[test]
    fn permutations_are_complete(items in prop::collection::hash_set(-100i64..100, 0..=6)) {
        let items: Vec<i64> = items.into_iter().collect();
        let permutations = Permutations::new(items.clone()).unwrap();
        let expected: usize = (1..=items.len()).product();
        prop_assert_eq!(permutations.len(), expected);

        let mut sorted_items = items.clone();
        sorted_items.sort();
        let mut seen = HashSet::new();
        for permutation in &permutations {
            let mut sorted = permutation.clone();
            sorted.sort();
            prop_assert_eq!(&sorted, &sorted_items);
            prop_assert!(seen.insert(permutation));
        }
        prop_assert_eq!(seen.len(), expected);
    }

    #[test]
    fn ring_is_deterministic(phases in Just(FEEDBACK_PHASES.to_vec()).prop_shuffle()) {
        let program = Program::new(FEEDBACK_PROGRAM.to_vec());
        let mut network = AmplifierNetwork::new(program.clone(), phases.len()).unwrap();
        let first = network.amplify(&phases, Some(MAX_PASSES)).unwrap();
        let second = network.amplify(&phases, Some(MAX_PASSES)).unwrap();
        let fresh = AmplifierNetwork::with_phases(program, &phases)
            .unwrap()
            .run_bounded(MAX_PASSES)
            .unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, fresh);
        prop_assert!(first <= 139629729);
    }
}
