pub mod crossings;
pub mod cycles;
pub mod verification;

#[doc(inline)]
pub use crossings::{segment_crossings, CrossingGraph};

#[doc(inline)]
pub use cycles::enumerate_cycles;

#[doc(inline)]
pub use verification::{verify_assignment, ClassReport, VerificationReport};
