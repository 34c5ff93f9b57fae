//! Banded pair-HMM recurrence.
//!
//! Each target position is processed as two half-steps. In the even half the
//! target window advances by one base; in the odd half the truth window does.
//! At the even half of step `k`, lane `j` pairs `truth[k + j]` with
//! `target[k - j]`; the odd half pairs `truth[k + 1 + j]` with the same target
//! base. Half-step index `s` is `2k` or `2k + 1`.
//!
//! Scores are stored in a biased fixed-point domain: `i16::MIN` is a zero
//! penalty, every penalty is shifted left by [`TRACE_BITS`], and the low bits
//! hold the origin label of the state when labels are being recorded.
//! Every state is clamped to [`INFINITY`] once per half-step, after its
//! labels are recorded, so a cell that no alignment reaches stays at the
//! sentinel. `INFINITY` sits far enough below `i16::MAX` that one half-step of
//! the largest accepted penalties can be added to it without wrapping.

use super::lanes::Lanes;
use super::penalty::{
    capped_quality, is_ambiguous, GapSchedule, Penalties, AMBIGUOUS_PENALTY, UNKNOWN_BASE,
};

pub(crate) const TRACE_BITS: u32 = 2;
pub(crate) const INFINITY: i16 = 0x7800;
const ZERO_SCORE: i16 = i16::MIN;
const LABEL_MASK: i16 = 3;
const AMBIGUOUS_SCORE: i16 = AMBIGUOUS_PENALTY << TRACE_BITS;
const FILL_QUALITY: i16 = 64 << TRACE_BITS;
const FILL_BASE: u8 = b'0';

/// Alignment state of a band cell, encoded as the label kept in the low score
/// bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Match,
    Insert,
    Delete,
}

impl State {
    #[inline]
    pub(crate) fn from_label(bits: i16) -> Self {
        match bits & LABEL_MASK {
            0 => State::Match,
            1 => State::Insert,
            _ => State::Delete,
        }
    }

    #[inline]
    fn label(self) -> i16 {
        match self {
            State::Match => 0,
            State::Insert => 1,
            State::Delete => 3,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            State::Match => 0,
            State::Insert => 1,
            State::Delete => 2,
        }
    }
}

/// Sink for the state vectors produced at every half-step.
pub(crate) trait StepRecorder<V: Lanes> {
    /// Whether origin labels are written into the low score bits.
    const LABELLED: bool;

    fn record(&mut self, step: usize, m: V, i: V, d: V);
}

/// Recorder for score-only runs.
pub(crate) struct Unlabelled;

impl<V: Lanes> StepRecorder<V> for Unlabelled {
    const LABELLED: bool = false;

    #[inline]
    fn record(&mut self, _step: usize, _m: V, _i: V, _d: V) {}
}

/// Best terminal cell seen so far.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Terminal {
    pub(crate) score: i16,
    pub(crate) step: Option<usize>,
}

impl Terminal {
    fn new() -> Self {
        Self {
            score: INFINITY,
            step: None,
        }
    }

    #[inline]
    fn offer(&mut self, score: i16, step: usize) {
        if score < self.score {
            self.score = score;
            self.step = Some(step);
        }
    }

    /// Penalty of the best terminal in score units, or `None` when no
    /// terminal came in under the overflow sentinel.
    pub(crate) fn penalty(&self) -> Option<i32> {
        self.step
            .map(|_| (self.score as i32 - ZERO_SCORE as i32) >> TRACE_BITS)
    }
}

#[inline]
fn ambiguity_score(base: u8) -> i16 {
    if is_ambiguous(base) {
        AMBIGUOUS_SCORE
    } else {
        INFINITY
    }
}

/// Minimum of the masked qualities and the ambiguity penalties of both windows.
#[inline]
fn mismatch<V: Lanes>(target: V, truth: V, quality: V, truth_ambig: V, target_ambig: V) -> V {
    target
        .cmp_eq(truth)
        .andnot(quality)
        .min(truth_ambig.min(target_ambig))
}

/// Pull every state back down to the sentinel. Labels must already have been
/// recorded: a clamped cell loses its origin bits.
#[inline]
fn clamp<V: Lanes>(inf: V, m: &mut V, i: &mut V, d: &mut V) {
    *m = Lanes::min(*m, inf);
    *i = Lanes::min(*i, inf);
    *d = Lanes::min(*d, inf);
}

#[inline]
fn apply_labels<V: Lanes>(m: &mut V, i: &mut V, d: &mut V) {
    let mask = V::splat(LABEL_MASK);
    *m = mask.andnot(*m).or(V::splat(State::Match.label()));
    *i = mask.andnot(*i).or(V::splat(State::Insert.label()));
    *d = mask.andnot(*d).or(V::splat(State::Delete.label()));
}

/// Run the full recurrence for one truth/target pair, handing every
/// half-step to `recorder`. Callers uphold
/// `truth.len() == target.len() + 2 * V::LANES - 1` and
/// `truth.len() > V::LANES`.
pub(crate) fn run<V, O, E, R>(
    truth: &[u8],
    target: &[u8],
    qualities: &[u8],
    penalties: &Penalties<O, E>,
    recorder: &mut R,
) -> Terminal
where
    V: Lanes,
    O: GapSchedule,
    E: GapSchedule,
    R: StepRecorder<V>,
{
    let band = V::LANES;
    let truth_len = truth.len();
    let target_len = target.len();
    debug_assert!(truth_len > band && truth_len == target_len + 2 * band - 1);
    debug_assert_eq!(qualities.len(), target_len);

    let gap_open_src = penalties.gap_open();
    let gap_extend_src = penalties.gap_extend();

    let inf = V::splat(INFINITY);
    let prior = V::splat((penalties.nuc_prior() as i16) << TRACE_BITS);
    let (mut m1, mut i1, mut d1) = (inf, inf, inf);
    let (mut m2, mut i2, mut d2) = (inf, inf, inf);

    // Lane k of both match vectors is reset to a zero penalty at step k, which
    // lets an alignment start anywhere in the leading truth flank.
    let mut init_mask = V::splat(0).insert(0, -1);
    let mut init_score = V::splat(0).insert(0, ZERO_SCORE);

    let mut truth_win = V::from_fn(|lane| truth[lane] as i16);
    let mut truth_ambig = V::from_fn(|lane| ambiguity_score(truth[lane]));
    let mut target_win = inf;
    let mut target_ambig = inf;
    let mut quality_win = V::splat(FILL_QUALITY);
    let mut gap_open = V::from_fn(|lane| gap_open_src.penalty(lane) << TRACE_BITS);
    let mut gap_extend = V::from_fn(|lane| gap_extend_src.penalty(lane) << TRACE_BITS);

    let mut terminal = Terminal::new();

    for k in 0..=(target_len + band) {
        let s = 2 * k;
        // Past the end of the target the window is drained with a filler base
        // that never matches.
        let (base, quality, ambig) = match target.get(k) {
            Some(&b) => (
                b,
                capped_quality(qualities[k]) << TRACE_BITS,
                ambiguity_score(b),
            ),
            None => (FILL_BASE, FILL_QUALITY, INFINITY),
        };
        target_win = target_win.shift_up().insert(0, base as i16);
        quality_win = quality_win.shift_up().insert(0, quality);
        target_ambig = target_ambig.shift_up().insert(0, ambig);

        // even half: truth current, target advanced
        m1 = init_score.or(init_mask.andnot(m1));
        m2 = init_score.or(init_mask.andnot(m2));
        m1 = m1.min(i1.min(d1));
        if let Some(lane) = terminal_lane(k, target_len, band) {
            terminal.offer(m1.extract(lane), s);
        }
        m1 = m1.add(mismatch(target_win, truth_win, quality_win, truth_ambig, target_ambig));
        // Insert -> Delete is allowed here
        d1 = d2
            .add(gap_extend)
            .min(m2.min(i2).add(gap_open.shift_down()));
        d1 = d1.shift_up().insert(0, INFINITY);
        i1 = i2.add(gap_extend).min(m2.add(gap_open)).add(prior);
        if R::LABELLED {
            recorder.record(s, m1, i1, d1);
        }
        clamp(inf, &mut m1, &mut i1, &mut d1);
        if R::LABELLED {
            apply_labels(&mut m1, &mut i1, &mut d1);
        }

        // odd half: truth advanced, target current
        let pos = band + k;
        let next_truth = truth.get(pos).copied().unwrap_or(UNKNOWN_BASE);
        truth_win = truth_win.shift_down().insert(band - 1, next_truth as i16);
        truth_ambig = truth_ambig
            .shift_down()
            .insert(band - 1, ambiguity_score(next_truth));
        let gap_idx = pos.min(truth_len - 1);
        gap_open = gap_open
            .shift_down()
            .insert(band - 1, gap_open_src.penalty(gap_idx) << TRACE_BITS);
        gap_extend = gap_extend
            .shift_down()
            .insert(band - 1, gap_extend_src.penalty(gap_idx) << TRACE_BITS);
        init_mask = init_mask.shift_up();
        init_score = init_score.shift_up();

        m2 = m2.min(i2.min(d2));
        if let Some(lane) = terminal_lane(k, target_len, band) {
            terminal.offer(m2.extract(lane), s + 1);
        }
        m2 = m2.add(mismatch(target_win, truth_win, quality_win, truth_ambig, target_ambig));
        // Insert -> Delete again; the insert state only ever opens from match
        d2 = d1.add(gap_extend).min(m1.min(i1).add(gap_open));
        i2 = i1
            .shift_down()
            .add(gap_extend)
            .min(m1.shift_down().add(gap_open))
            .add(prior)
            .insert(band - 1, INFINITY);
        if R::LABELLED {
            recorder.record(s + 1, m2, i2, d2);
        }
        clamp(inf, &mut m2, &mut i2, &mut d2);
        if R::LABELLED {
            apply_labels(&mut m2, &mut i2, &mut d2);
        }
    }

    terminal
}

/// Lane holding the target-exhausted cell at step `k`, if it lies in the band.
#[inline]
pub(crate) fn terminal_lane(k: usize, target_len: usize, band: usize) -> Option<usize> {
    k.checked_sub(target_len).filter(|&lane| lane < band)
}
