//! An Intcode virtual machine and the amplifier feedback ring built on top of it.
//!
//! [`Processor`] runs a single program and suspends, rather than blocks, when its input or
//! output can't make progress. [`AmplifierNetwork`] connects several processors in a ring of
//! single-slot [`IoChannel`]s and schedules them round-robin until they all halt.
//! [`find_max_signal`] searches every ordering of a set of phase settings, using
//! [`Permutations`], for the one giving the largest output signal.

pub mod channel;
pub mod error;
pub mod io;
pub mod network;
pub mod permutations;
pub mod process;
pub mod program;
pub mod search;

pub use channel::IoChannel;
pub use error::{Error, Result};
pub use network::{run_to_completion, Amplifier, AmplifierNetwork};
pub use permutations::Permutations;
pub use process::{Processor, State};
pub use program::Program;
pub use search::{find_max_signal, Best, FEEDBACK_PHASES, SINGLE_PASS_PHASES};
