use super::engine::{self, Unlabelled};
use super::lanes::Lanes;
use super::penalty::{GapSchedule, Penalties};

/// Minimum terminal penalty over the band, or `None` when every terminal
/// reached the overflow sentinel. No label table is allocated.
pub(crate) fn align_score<V, O, E>(
    truth: &[u8],
    target: &[u8],
    qualities: &[u8],
    penalties: &Penalties<O, E>,
) -> Option<i32>
where
    V: Lanes,
    O: GapSchedule,
    E: GapSchedule,
{
    engine::run::<V, _, _, _>(truth, target, qualities, penalties, &mut Unlabelled).penalty()
}
