//! Traceback aligner: runs the labelled recurrence, then walks the recorded
//! origin labels backwards from the best terminal cell.

use super::engine::{self, State, StepRecorder};
use super::lanes::Lanes;
use super::penalty::{GapSchedule, Penalties};
use super::types::{Alignment, GAP};
use crate::error::{HmmError, HmmResult};

/// Origin of each of the three states for every (half-step, lane) cell,
/// stored flat as `step * lanes + lane`.
pub(crate) struct LabelTable {
    lanes: usize,
    labels: Vec<[State; 3]>,
}

impl LabelTable {
    pub(crate) fn new(truth_len: usize, band: usize) -> Self {
        let steps = 2 * (truth_len + band);
        Self {
            lanes: band,
            labels: vec![[State::Match; 3]; steps * band],
        }
    }

    /// Origin of `state` at `(step, lane)`, or `None` outside the table.
    pub(crate) fn origin(&self, step: isize, lane: isize, state: State) -> Option<State> {
        let step = usize::try_from(step).ok()?;
        let lane = usize::try_from(lane).ok().filter(|&l| l < self.lanes)?;
        self.labels
            .get(step * self.lanes + lane)
            .map(|cell| cell[state.index()])
    }
}

impl<V: Lanes> StepRecorder<V> for LabelTable {
    const LABELLED: bool = true;

    #[inline]
    fn record(&mut self, step: usize, m: V, i: V, d: V) {
        let base = step * self.lanes;
        for (lane, cell) in self.labels[base..base + self.lanes].iter_mut().enumerate() {
            *cell = [
                State::from_label(m.extract(lane)),
                State::from_label(i.extract(lane)),
                State::from_label(d.extract(lane)),
            ];
        }
    }
}

pub(crate) fn align<V, O, E>(
    truth: &[u8],
    target: &[u8],
    qualities: &[u8],
    penalties: &Penalties<O, E>,
) -> HmmResult<Alignment>
where
    V: Lanes,
    O: GapSchedule,
    E: GapSchedule,
{
    let mut table = LabelTable::new(truth.len(), V::LANES);
    let terminal = engine::run::<V, _, _, _>(truth, target, qualities, penalties, &mut table);
    let (score, step) = match (terminal.penalty(), terminal.step) {
        (Some(score), Some(step)) => (score, step),
        _ => return Err(HmmError::ScoreOverflow),
    };
    let (first_pos, aligned_truth, aligned_target) = walk(&table, step, truth, target)?;
    Ok(Alignment {
        score,
        first_pos,
        truth: aligned_truth,
        target: aligned_target,
    })
}

/// Follow origin labels from the terminal at `step` back to the first target
/// base, returning the first truth offset and the two aligned strings.
fn walk(
    table: &LabelTable,
    step: usize,
    truth: &[u8],
    target: &[u8],
) -> HmmResult<(i32, Vec<u8>, Vec<u8>)> {
    let target_len = target.len() as isize;
    let mut s = step as isize;
    let mut lane = s / 2 - target_len;
    let mut y = target_len;
    let mut x = s - y;

    let out_of_range = |s: isize, lane: isize| HmmError::TracebackOutOfRange { step: s, lane };

    let mut state = table
        .origin(s, lane, State::Match)
        .ok_or_else(|| out_of_range(s, lane))?;
    s -= 2;

    let mut aligned_truth = Vec::with_capacity(truth.len() + target.len());
    let mut aligned_target = Vec::with_capacity(truth.len() + target.len());
    while y > 0 {
        if s < 0 || lane < 0 {
            return Err(out_of_range(s, lane));
        }
        let next = table
            .origin(s, lane, state)
            .ok_or_else(|| out_of_range(s, lane))?;
        match state {
            State::Match => {
                s -= 2;
                x -= 1;
                y -= 1;
                aligned_truth.push(base_at(truth, x).ok_or_else(|| out_of_range(s, lane))?);
                aligned_target.push(target[y as usize]);
            }
            State::Insert => {
                lane += s & 1;
                s -= 1;
                y -= 1;
                aligned_truth.push(GAP);
                aligned_target.push(target[y as usize]);
            }
            State::Delete => {
                s -= 1;
                lane -= s & 1;
                x -= 1;
                aligned_truth.push(base_at(truth, x).ok_or_else(|| out_of_range(s, lane))?);
                aligned_target.push(GAP);
            }
        }
        state = next;
    }

    aligned_truth.reverse();
    aligned_target.reverse();
    let first_pos = i32::try_from(x).map_err(|_| out_of_range(s, lane))?;
    Ok((first_pos, aligned_truth, aligned_target))
}

#[inline]
fn base_at(seq: &[u8], pos: isize) -> Option<u8> {
    usize::try_from(pos).ok().and_then(|p| seq.get(p).copied())
}
