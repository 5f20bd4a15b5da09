//! Half-step phase sequencing for 4-coil unipolar motors.
//!
//! See [`sequence`] for how a [`Phase`] maps to coil states.

/// Number of half-step positions in one electrical cycle.
pub const PHASE_COUNT: u8 = 8;

/// Coil pattern for all eight half-steps.
///
/// Shift right by the phase index and read bits 0, 2, 4, 6 as coils A, B, C, D.
/// Even phases see two adjacent coils set, odd phases see one.
pub const WAVE_PATTERN: u16 = 0b0000_0111_0000_0111;

/// Position in the 8-state half-step cycle, always in `0..8`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    /// Phase 0, where every driver starts.
    pub const ZERO: Self = Self(0);

    /// Phase at `index`, or `None` when `index` is 8 or more.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < PHASE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Index in `0..8`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The neighboring phase in `direction`, wrapping around the cycle.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        // PHASE_COUNT is a power of two, so masking is the non-negative modulo.
        let index = match direction {
            Direction::Forward => self.0.wrapping_add(1),
            Direction::Reverse => self.0.wrapping_add(PHASE_COUNT - 1),
        };
        Self(index & (PHASE_COUNT - 1))
    }
}

/// Direction of travel through the phase cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing phase index, positive step counts.
    Forward,
    /// Decreasing phase index, negative step counts.
    Reverse,
}

impl Direction {
    /// Direction implied by a signed step count, or `None` for zero.
    #[must_use]
    pub const fn of(steps: i32) -> Option<Self> {
        if steps > 0 {
            Some(Self::Forward)
        } else if steps < 0 {
            Some(Self::Reverse)
        } else {
            None
        }
    }

    /// `+1` or `-1`.
    #[must_use]
    pub const fn unit(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// Coil states `[A, B, C, D]` for `phase`.
///
/// | phase | A | B | C | D |
/// |-------|---|---|---|---|
/// | 0     | ● | ● |   |   |
/// | 1     | ● |   |   |   |
/// | 2     | ● |   |   | ● |
/// | 3     |   |   |   | ● |
/// | 4     |   |   | ● | ● |
/// | 5     |   |   | ● |   |
/// | 6     |   | ● | ● |   |
/// | 7     |   | ● |   |   |
///
/// ```
/// use stepper_envoy::stepper::phase::{sequence, Phase};
///
/// assert_eq!(sequence(Phase::ZERO), [true, true, false, false]);
/// ```
#[must_use]
pub const fn sequence(phase: Phase) -> [bool; 4] {
    let wave = WAVE_PATTERN >> phase.0;
    [
        wave & 0b1 != 0,
        (wave >> 2) & 0b1 != 0,
        (wave >> 4) & 0b1 != 0,
        (wave >> 6) & 0b1 != 0,
    ]
}
