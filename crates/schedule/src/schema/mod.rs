//! Raw downtime configuration as written by operators, before validation.
//!
//! - `RawScheduleConfig`: every attribute read with three states
//!   (absent / explicit null / value) so an empty block is distinguishable
//!   from no block at all
//! - `Mode`: the closed recurrence-mode enum used once a raw `mode` resolves

mod mode;
mod presence;
mod raw;

pub use mode::*;
pub use presence::*;
pub use raw::*;
