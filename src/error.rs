use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Everything that can go wrong while loading, running or searching Intcode programs.
///
/// Blocking on input or output is not in here: a blocked processor is suspended, not failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The opcode at `pc` is not part of the instruction set
    #[error("Unknown opcode {opcode} at {pc} (instruction {word})")]
    MalformedInstruction { pc: usize, word: i64, opcode: i64 },

    /// A parameter mode digit other than position (0) or immediate (1)
    #[error("Unknown mode {mode} for parameter {index} at {pc} (instruction {word})")]
    UnknownMode {
        pc: usize,
        word: i64,
        index: usize,
        mode: i64,
    },

    #[error("Write through immediate parameter {index} at {pc} (instruction {word})")]
    InvalidWriteTarget { pc: usize, word: i64, index: usize },

    /// An input or output instruction ran on a processor with nothing connected to that side
    #[error("No {capability} connected for instruction {word} at {pc}")]
    MissingCapability {
        pc: usize,
        word: i64,
        capability: &'static str,
    },

    #[error("Address {address} out of bounds at {pc} (instruction {word})")]
    AddressOutOfBounds { pc: usize, word: i64, address: i64 },

    /// The program counter left memory without the program halting
    #[error("Program counter {pc} ran off the end of memory")]
    PcOutOfBounds { pc: usize },

    /// `set` or `jump` named an address outside memory
    #[error("Address {address} outside memory of {len} cells")]
    NoSuchAddress { address: usize, len: usize },

    /// Only raised by the checked stepping functions
    #[error("Arithmetic overflow at {pc} (instruction {word})")]
    ArithmeticOverflow { pc: usize, word: i64 },

    #[error("Network of {expected} amplifiers given {actual} phase settings")]
    PhaseCountMismatch { expected: usize, actual: usize },

    #[error("Channel {channel} already holds a value")]
    ChannelOccupied { channel: String },

    #[error("Amplifier network has no amplifiers")]
    EmptyNetwork,

    #[error("Amplifiers halted without a signal on {channel}")]
    NoSignal { channel: String },

    #[error("Amplifiers still running after {passes} passes")]
    PassLimitExceeded { passes: usize },

    #[error("Too many items to permute: {len}")]
    TooManyItems { len: usize },

    #[error(transparent)]
    Parse(#[from] ParseIntError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
