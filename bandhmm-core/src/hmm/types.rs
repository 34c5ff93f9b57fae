use std::fmt;

/// Score and first position reported when no alignment could be produced.
pub const FAILED: i32 = -1;

/// Gap symbol used in aligned strings.
pub const GAP: u8 = b'-';

/// CIGAR operations, named from the truth's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CigarOp {
    /// Consumes truth and target.
    Match,
    /// Consumes target, gap in truth.
    Ins,
    /// Consumes truth, gap in target.
    Del,
}

impl CigarOp {
    fn symbol(self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Ins => 'I',
            CigarOp::Del => 'D',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Cigar {
    pub ops: Vec<(CigarOp, usize)>,
}

impl Cigar {
    pub fn push(&mut self, op: CigarOp, len: usize) {
        if len == 0 {
            return;
        }
        if let Some((last_op, last_len)) = self.ops.last_mut() {
            if *last_op == op {
                *last_len += len;
                return;
            }
        }
        self.ops.push((op, len));
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.ops.iter().map(|(_, n)| *n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Bases consumed on the truth and on the target.
    pub fn consumed(&self) -> (usize, usize) {
        self.ops
            .iter()
            .fold((0, 0), |(truth, target), &(op, len)| match op {
                CigarOp::Match => (truth + len, target + len),
                CigarOp::Ins => (truth, target + len),
                CigarOp::Del => (truth + len, target),
            })
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (op, len) in &self.ops {
            write!(f, "{}{}", len, op.symbol())?;
        }
        Ok(())
    }
}

/// Result of a traceback alignment. `truth` and `target` are the aligned
/// strings, equal in length, with [`GAP`] marking gap columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub score: i32,
    /// Offset in the truth of the first aligned truth base, or [`FAILED`].
    pub first_pos: i32,
    pub truth: Vec<u8>,
    pub target: Vec<u8>,
}

impl Alignment {
    pub fn failed() -> Self {
        Self {
            score: FAILED,
            first_pos: FAILED,
            truth: Vec::new(),
            target: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.score == FAILED
    }

    /// Exclusive end of the aligned truth span.
    pub fn last_pos(&self) -> Option<usize> {
        if self.is_failure() {
            return None;
        }
        let truth_bases = self.truth.iter().filter(|&&b| b != GAP).count();
        usize::try_from(self.first_pos)
            .ok()
            .map(|first| first + truth_bases)
    }

    pub fn cigar(&self) -> Cigar {
        let mut cigar = Cigar::default();
        for (&t, &q) in self.truth.iter().zip(&self.target) {
            let op = if t == GAP {
                CigarOp::Ins
            } else if q == GAP {
                CigarOp::Del
            } else {
                CigarOp::Match
            };
            cigar.push(op, 1);
        }
        cigar
    }
}
