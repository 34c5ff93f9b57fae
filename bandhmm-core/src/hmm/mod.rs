mod engine;
pub mod lanes;
pub mod penalty;
pub mod scalar_ref;
mod score;
mod traceback;
pub mod types;

pub use engine::State;
pub use lanes::{Lanes, Portable};
pub use penalty::{mismatch_penalty, GapSchedule, Penalties};
pub use types::{Alignment, Cigar, CigarOp, FAILED, GAP};

use crate::error::{HmmError, HmmResult};
use log::debug;
use std::marker::PhantomData;


/// Banded pair-HMM aligner whose band size is the lane count of `V`.
///
/// `truth` must carry `BAND_SIZE - 1` flanking bases on each side of the
/// region the target is expected to align to, i.e.
/// `truth.len() == target.len() + 2 * BAND_SIZE - 1`. `score` and `align`
/// only check this in debug builds; `try_score` and `try_align` check it
/// always.
///
/// The aligner holds no state, so one instance can be shared freely across
/// threads.
pub struct PairHmm<V> {
    _lanes: PhantomData<fn() -> V>,
}

/// Portable engine of any band size.
pub type PortablePairHmm<const N: usize> = PairHmm<Portable<N>>;

/// 128-bit lanes, band size 8.
#[cfg(feature = "simd")]
pub type PairHmm8 = PairHmm<wide::i16x8>;

/// 256-bit lanes, band size 16.
#[cfg(feature = "simd")]
pub type PairHmm16 = PairHmm<wide::i16x16>;

impl<V> Clone for PairHmm<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for PairHmm<V> {}

impl<V> Default for PairHmm<V> {
    fn default() -> Self {
        Self {
            _lanes: PhantomData,
        }
    }
}

impl<V: Lanes> std::fmt::Debug for PairHmm<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairHmm")
            .field("band_size", &V::LANES)
            .finish()
    }
}

impl<V: Lanes> PairHmm<V> {
    pub const BAND_SIZE: usize = V::LANES;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn band_size(&self) -> usize {
        Self::BAND_SIZE
    }

    /// Truth length required for a target of `target_len` bases.
    pub fn truth_len_for(target_len: usize) -> usize {
        target_len + 2 * Self::BAND_SIZE - 1
    }

    /// Minimum alignment penalty, or [`FAILED`] when every terminal score
    /// overflowed.
    pub fn score<O, E>(
        &self,
        truth: &[u8],
        target: &[u8],
        qualities: &[u8],
        penalties: &Penalties<O, E>,
    ) -> i32
    where
        O: GapSchedule,
        E: GapSchedule,
    {
        match score::align_score::<V, _, _>(truth, target, qualities, penalties) {
            Some(score) => score,
            None => {
                debug!(
                    "no terminal score below sentinel (truth_len={}, target_len={}, band={})",
                    truth.len(),
                    target.len(),
                    Self::BAND_SIZE
                );
                FAILED
            }
        }
    }

    /// Minimum alignment penalty together with the alignment achieving it.
    /// On overflow or a traceback range violation the result is
    /// [`Alignment::failed`].
    pub fn align<O, E>(
        &self,
        truth: &[u8],
        target: &[u8],
        qualities: &[u8],
        penalties: &Penalties<O, E>,
    ) -> Alignment
    where
        O: GapSchedule,
        E: GapSchedule,
    {
        match traceback::align::<V, _, _>(truth, target, qualities, penalties) {
            Ok(alignment) => alignment,
            Err(err) => {
                debug!(
                    "alignment failed (truth_len={}, target_len={}, band={}): {err}",
                    truth.len(),
                    target.len(),
                    Self::BAND_SIZE
                );
                Alignment::failed()
            }
        }
    }

    /// Validates inputs, then behaves as [`PairHmm::score`] with overflow
    /// reported as [`HmmError::ScoreOverflow`].
    pub fn try_score<O, E>(
        &self,
        truth: &[u8],
        target: &[u8],
        qualities: &[u8],
        penalties: &Penalties<O, E>,
    ) -> HmmResult<i32>
    where
        O: GapSchedule,
        E: GapSchedule,
    {
        self.check_inputs(truth, target, qualities, penalties)?;
        score::align_score::<V, _, _>(truth, target, qualities, penalties)
            .ok_or(HmmError::ScoreOverflow)
    }

    /// Validates inputs, then behaves as [`PairHmm::align`] with failures
    /// reported as errors.
    pub fn try_align<O, E>(
        &self,
        truth: &[u8],
        target: &[u8],
        qualities: &[u8],
        penalties: &Penalties<O, E>,
    ) -> HmmResult<Alignment>
    where
        O: GapSchedule,
        E: GapSchedule,
    {
        self.check_inputs(truth, target, qualities, penalties)?;
        traceback::align::<V, _, _>(truth, target, qualities, penalties)
    }

    /// Checks the length invariants the recurrence relies on.
    pub fn check_inputs<O, E>(
        &self,
        truth: &[u8],
        target: &[u8],
        qualities: &[u8],
        penalties: &Penalties<O, E>,
    ) -> HmmResult<()>
    where
        O: GapSchedule,
        E: GapSchedule,
    {
        validate_inputs(Self::BAND_SIZE, truth, target, qualities, penalties)
    }
}

pub(crate) fn validate_inputs<O, E>(
    band_size: usize,
    truth: &[u8],
    target: &[u8],
    qualities: &[u8],
    penalties: &Penalties<O, E>,
) -> HmmResult<()>
where
    O: GapSchedule,
    E: GapSchedule,
{
    if truth.len() <= band_size {
        return Err(HmmError::TruthTooShort {
            truth_len: truth.len(),
            band_size,
        });
    }
    let expected = target.len() + 2 * band_size - 1;
    if truth.len() != expected {
        return Err(HmmError::LengthMismatch {
            truth_len: truth.len(),
            target_len: target.len(),
            band_size,
            expected,
        });
    }
    if qualities.len() != target.len() {
        return Err(HmmError::QualityLengthMismatch {
            qualities: qualities.len(),
            target_len: target.len(),
        });
    }
    if let Some(positions) = penalties.positions() {
        if positions < truth.len() {
            return Err(HmmError::GapScheduleTooShort {
                positions,
                truth_len: truth.len(),
            });
        }
    }
    Ok(())
}
