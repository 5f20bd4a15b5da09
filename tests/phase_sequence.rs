#![allow(missing_docs)]
//! Host-level tests for the half-step phase table.

use stepper_envoy::stepper::phase::{Direction, PHASE_COUNT, Phase, WAVE_PATTERN, sequence};

fn all_phases() -> impl Iterator<Item = Phase> {
    (0..PHASE_COUNT).filter_map(Phase::new)
}

fn energized(coils: [bool; 4]) -> usize {
    coils.iter().filter(|on| **on).count()
}

#[test]
fn odd_phases_energize_one_coil() {
    for phase in all_phases().filter(|phase| phase.index() % 2 == 1) {
        assert_eq!(energized(sequence(phase)), 1, "phase {}", phase.index());
    }
}

#[test]
fn even_phases_energize_two_adjacent_coils() {
    for phase in all_phases().filter(|phase| phase.index() % 2 == 0) {
        let coils = sequence(phase);
        assert_eq!(energized(coils), 2, "phase {}", phase.index());

        // Adjacent around the ring: A-B, B-C, C-D, or D-A.
        let adjacent_pair = (0..4).any(|coil| coils[coil] && coils[(coil + 1) % 4]);
        assert!(adjacent_pair, "phase {} coils {:?}", phase.index(), coils);
    }
}

#[test]
fn table_matches_expected_wave() {
    let expected = [
        [true, true, false, false],
        [true, false, false, false],
        [true, false, false, true],
        [false, false, false, true],
        [false, false, true, true],
        [false, false, true, false],
        [false, true, true, false],
        [false, true, false, false],
    ];
    let actual: Vec<[bool; 4]> = all_phases().map(sequence).collect();
    assert_eq!(actual, expected);
}

#[test]
fn neighboring_phases_share_a_coil() {
    for phase in all_phases() {
        let here = sequence(phase);
        let next = sequence(phase.step(Direction::Forward));
        let shared = here.iter().zip(next).filter(|(a, b)| **a && *b).count();
        assert_eq!(shared, 1, "phase {} -> next", phase.index());
    }
}

#[test]
fn all_eight_states_are_distinct() {
    let states: Vec<[bool; 4]> = all_phases().map(sequence).collect();
    for (index, state) in states.iter().enumerate() {
        assert!(!states[index + 1..].contains(state), "phase {index} repeats");
    }
}

#[test]
fn step_wraps_in_both_directions() {
    let last = Phase::new(7).unwrap();
    assert_eq!(last.step(Direction::Forward), Phase::ZERO);
    assert_eq!(Phase::ZERO.step(Direction::Reverse), last);
}

#[test]
fn new_rejects_out_of_range_index() {
    assert_eq!(Phase::new(8), None);
    assert_eq!(Phase::new(3).map(Phase::index), Some(3));
}

#[test]
fn direction_follows_sign() {
    assert_eq!(Direction::of(12), Some(Direction::Forward));
    assert_eq!(Direction::of(-1), Some(Direction::Reverse));
    assert_eq!(Direction::of(0), None);
    assert_eq!(Direction::Reverse.unit(), -1);
}

#[test]
fn wave_pattern_constant() {
    assert_eq!(WAVE_PATTERN, 0x0707);
}
