pub mod error;
pub mod hmm;

pub use error::{HmmError, HmmResult};
pub use hmm::{Alignment, PairHmm, Penalties, PortablePairHmm};
#[cfg(feature = "simd")]
pub use hmm::{PairHmm16, PairHmm8};
