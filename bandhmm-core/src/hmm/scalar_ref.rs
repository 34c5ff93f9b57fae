//! Scalar reference for the banded recurrence, one cell at a time in `i32`.
//! Rows `i` are target positions, columns `j` are truth positions; a cell is
//! in the band when `0 <= j - i < 2 * band`.
//!
//! Much slower than the lane engines, and only reports the score.

use super::engine::{INFINITY, TRACE_BITS};
use super::penalty::{mismatch_penalty, GapSchedule, Penalties};
use super::validate_inputs;
use crate::error::{HmmError, HmmResult};

const UNREACHABLE: i32 = i32::MAX / 4;

/// Smallest penalty the fixed-point engines treat as overflowed.
const SENTINEL_PENALTY: i32 = (INFINITY as i32 - i16::MIN as i32) >> TRACE_BITS;

#[inline]
fn plus(score: i32, penalty: i16) -> i32 {
    (score + penalty as i32).min(UNREACHABLE)
}

/// Minimum alignment penalty of `target` against `truth` with a band of
/// `band` lanes, following the same recurrence as [`super::PairHmm`].
/// Scores at or above the engines' sentinel are reported as
/// [`HmmError::ScoreOverflow`].
pub fn score_scalar<O, E>(
    truth: &[u8],
    target: &[u8],
    qualities: &[u8],
    penalties: &Penalties<O, E>,
    band: usize,
) -> HmmResult<i32>
where
    O: GapSchedule,
    E: GapSchedule,
{
    if band == 0 {
        return Err(HmmError::TruthTooShort {
            truth_len: truth.len(),
            band_size: band,
        });
    }
    validate_inputs(band, truth, target, qualities, penalties)?;
    let n = target.len();
    let m = truth.len();
    if n == 0 {
        return Ok(0);
    }

    let open = |j: usize| penalties.gap_open().penalty(j);
    let extend = |j: usize| penalties.gap_extend().penalty(j);
    let prior = penalties.nuc_prior() as i16;
    let width = 2 * band;

    let mut h_m = vec![UNREACHABLE; n * m];
    let mut h_i = vec![UNREACHABLE; n * m];
    let mut h_d = vec![UNREACHABLE; n * m];

    for i in 0..n {
        for j in i..(i + width).min(m) {
            let idx = i * m + j;

            // Row 0 may start anywhere in the leading flank.
            let diag = if i == 0 {
                0
            } else {
                let p = idx - m - 1;
                h_m[p].min(h_i[p]).min(h_d[p])
            };
            h_m[idx] = plus(diag, mismatch_penalty(truth[j], target[i], qualities[i]));

            // A leading insertion opens only at even truth offsets.
            h_i[idx] = if i == 0 {
                if j % 2 == 0 {
                    plus(plus(0, open(j)), prior)
                } else {
                    UNREACHABLE
                }
            } else if j + 1 - i < width {
                let p = idx - m;
                plus(plus(h_i[p], extend(j)).min(plus(h_m[p], open(j))), prior)
            } else {
                UNREACHABLE
            };

            h_d[idx] = if j > i {
                let p = idx - 1;
                // even cells extend with the previous truth position's penalty
                let ext_pos = if (i + j) % 2 == 0 { j - 1 } else { j };
                plus(h_d[p], extend(ext_pos)).min(plus(h_m[p].min(h_i[p]), open(j)))
            } else {
                UNREACHABLE
            };
        }
    }

    let last = n - 1;
    let best = (last..(last + width).min(m))
        .map(|j| {
            let idx = last * m + j;
            h_m[idx].min(h_i[idx]).min(h_d[idx])
        })
        .min()
        .unwrap_or(UNREACHABLE);

    if best >= SENTINEL_PENALTY {
        Err(HmmError::ScoreOverflow)
    } else {
        Ok(best)
    }
}
