use crate::error::{HmmError, HmmResult};

/// Base symbol treated as ambiguous on either sequence.
pub const UNKNOWN_BASE: u8 = b'N';

/// Penalty for aligning against an ambiguous base, whatever the quality.
pub const AMBIGUOUS_PENALTY: i16 = 2;

/// Base qualities above this are capped before scaling.
pub const MAX_QUALITY: u8 = 127;

/// Largest accepted gap penalty or nucleotide prior. Keeps every per-step
/// sum of fixed-point penalties inside the headroom above the overflow
/// sentinel.
pub const MAX_PENALTY: u8 = 127;

/// Source of affine gap penalties indexed by truth position.
pub trait GapSchedule {
    fn penalty(&self, pos: usize) -> i16;

    /// Number of truth positions covered, or `None` for a position-independent
    /// penalty.
    fn positions(&self) -> Option<usize>;

    fn max_penalty(&self) -> u8;
}

impl GapSchedule for u8 {
    #[inline]
    fn penalty(&self, _pos: usize) -> i16 {
        *self as i16
    }

    fn positions(&self) -> Option<usize> {
        None
    }

    fn max_penalty(&self) -> u8 {
        *self
    }
}

impl GapSchedule for [u8] {
    #[inline]
    fn penalty(&self, pos: usize) -> i16 {
        self[pos] as i16
    }

    fn positions(&self) -> Option<usize> {
        Some(self.len())
    }

    fn max_penalty(&self) -> u8 {
        self.iter().copied().max().unwrap_or(0)
    }
}

impl GapSchedule for Vec<u8> {
    #[inline]
    fn penalty(&self, pos: usize) -> i16 {
        self.as_slice().penalty(pos)
    }

    fn positions(&self) -> Option<usize> {
        self.as_slice().positions()
    }

    fn max_penalty(&self) -> u8 {
        self.as_slice().max_penalty()
    }
}

impl<T: GapSchedule + ?Sized> GapSchedule for &T {
    #[inline]
    fn penalty(&self, pos: usize) -> i16 {
        (**self).penalty(pos)
    }

    fn positions(&self) -> Option<usize> {
        (**self).positions()
    }

    fn max_penalty(&self) -> u8 {
        (**self).max_penalty()
    }
}

/// Gap-open schedule, gap-extend schedule and nucleotide-insertion prior for
/// one engine call. Values are validated once here so the recurrence never
/// has to.
#[derive(Clone, Debug)]
pub struct Penalties<O, E> {
    gap_open: O,
    gap_extend: E,
    nuc_prior: u8,
}

impl<O: GapSchedule, E: GapSchedule> Penalties<O, E> {
    pub fn new(gap_open: O, gap_extend: E, nuc_prior: u8) -> HmmResult<Self> {
        if gap_open.max_penalty() > MAX_PENALTY {
            return Err(HmmError::InvalidPenalty {
                msg: format!(
                    "gap open {} exceeds {MAX_PENALTY}",
                    gap_open.max_penalty()
                ),
            });
        }
        if gap_extend.max_penalty() > MAX_PENALTY {
            return Err(HmmError::InvalidPenalty {
                msg: format!(
                    "gap extend {} exceeds {MAX_PENALTY}",
                    gap_extend.max_penalty()
                ),
            });
        }
        if nuc_prior > MAX_PENALTY {
            return Err(HmmError::InvalidPenalty {
                msg: format!("nucleotide prior {nuc_prior} exceeds {MAX_PENALTY}"),
            });
        }
        Ok(Self {
            gap_open,
            gap_extend,
            nuc_prior,
        })
    }

    pub fn gap_open(&self) -> &O {
        &self.gap_open
    }

    pub fn gap_extend(&self) -> &E {
        &self.gap_extend
    }

    pub fn nuc_prior(&self) -> u8 {
        self.nuc_prior
    }

    /// Smallest number of truth positions covered by a per-position schedule.
    pub(crate) fn positions(&self) -> Option<usize> {
        match (self.gap_open.positions(), self.gap_extend.positions()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[inline]
pub fn capped_quality(quality: u8) -> i16 {
    quality.min(MAX_QUALITY) as i16
}

#[inline]
pub fn is_ambiguous(base: u8) -> bool {
    base == UNKNOWN_BASE
}

/// Penalty for aligning `target_base` (observed with `quality`) against
/// `truth_base`: zero on a match, the capped quality on a mismatch, and never
/// more than [`AMBIGUOUS_PENALTY`] when either base is ambiguous.
pub fn mismatch_penalty(truth_base: u8, target_base: u8, quality: u8) -> i16 {
    let mismatch = if truth_base == target_base {
        0
    } else {
        capped_quality(quality)
    };
    if is_ambiguous(truth_base) || is_ambiguous(target_base) {
        mismatch.min(AMBIGUOUS_PENALTY)
    } else {
        mismatch
    }
}
