//! Types shared between storage and the command line.

mod cycle;
pub use cycle::{Cycle, InvalidCycle};

mod receiver;
pub use receiver::ReceiverLookup;
