use super::error::{Error, Result};
use super::io::{Disconnected, Input, Output};
use log::{debug, trace};
use std::convert::TryFrom;

/// Where a processor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    InputBlocked,
    OutputBlocked,
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Position,
    Immediate,
}

struct Modes(i64);

impl Modes {
    fn mode(&self, index: usize) -> std::result::Result<Mode, i64> {
        let mode = (self.0 / (10 as i64).pow(index as u32)) % 10;
        match mode {
            0 => Ok(Mode::Position),
            1 => Ok(Mode::Immediate),
            _ => Err(mode),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Parameter {
    mode: Mode,
    value: i64,
}

/// Checks `address` against a memory of `len` cells.
fn address(address: i64, len: usize) -> Option<usize> {
    usize::try_from(address).ok().filter(|&address| address < len)
}

struct Parameters<'a> {
    memory: &'a [i64],
    pc: usize,
    word: i64,
    modes: Modes,
}

impl<'a> Parameters<'a> {
    fn new(memory: &'a [i64], pc: usize, word: i64) -> Self {
        Parameters {
            memory,
            pc,
            word,
            modes: Modes(word / 100),
        }
    }

    fn get(&self, index: usize) -> Result<Parameter> {
        let mode = self.modes.mode(index).map_err(|mode| Error::UnknownMode {
            pc: self.pc,
            word: self.word,
            index,
            mode,
        })?;
        let location = self.pc + 1 + index;
        let value = *self
            .memory
            .get(location)
            .ok_or(Error::AddressOutOfBounds {
                pc: self.pc,
                word: self.word,
                address: location as i64,
            })?;
        Ok(Parameter { mode, value })
    }

    /// A write destination: must be in position mode and inside memory.
    fn get_address(&self, index: usize) -> Result<usize> {
        let parameter = self.get(index)?;
        match parameter.mode {
            Mode::Position => {
                address(parameter.value, self.memory.len()).ok_or(Error::AddressOutOfBounds {
                    pc: self.pc,
                    word: self.word,
                    address: parameter.value,
                })
            }
            Mode::Immediate => Err(Error::InvalidWriteTarget {
                pc: self.pc,
                word: self.word,
                index,
            }),
        }
    }
}

#[derive(Debug)]
enum Instruction {
    Add {
        x: Parameter,
        y: Parameter,
        output: usize,
    },
    Mul {
        x: Parameter,
        y: Parameter,
        output: usize,
    },
    Input {
        output: usize,
    },
    Output {
        input: Parameter,
    },
    JumpIfTrue {
        input: Parameter,
        address: Parameter,
    },
    JumpIfFalse {
        input: Parameter,
        address: Parameter,
    },
    LessThan {
        x: Parameter,
        y: Parameter,
        output: usize,
    },
    Equals {
        x: Parameter,
        y: Parameter,
        output: usize,
    },
    Exit,
}

impl Instruction {
    fn parse(memory: &[i64], pc: usize, word: i64) -> Result<Self> {
        use Instruction::*;
        let opcode = word % 100;
        let parameters = Parameters::new(memory, pc, word);
        match opcode {
            1 => Ok(Add {
                x: parameters.get(0)?,
                y: parameters.get(1)?,
                output: parameters.get_address(2)?,
            }),
            2 => Ok(Mul {
                x: parameters.get(0)?,
                y: parameters.get(1)?,
                output: parameters.get_address(2)?,
            }),
            3 => Ok(Input {
                output: parameters.get_address(0)?,
            }),
            4 => Ok(Output {
                input: parameters.get(0)?,
            }),
            5 => Ok(JumpIfTrue {
                input: parameters.get(0)?,
                address: parameters.get(1)?,
            }),
            6 => Ok(JumpIfFalse {
                input: parameters.get(0)?,
                address: parameters.get(1)?,
            }),
            7 => Ok(LessThan {
                x: parameters.get(0)?,
                y: parameters.get(1)?,
                output: parameters.get_address(2)?,
            }),
            8 => Ok(Equals {
                x: parameters.get(0)?,
                y: parameters.get(1)?,
                output: parameters.get_address(2)?,
            }),
            99 => Ok(Exit),
            _ => Err(Error::MalformedInstruction { pc, word, opcode }),
        }
    }

    fn size(&self) -> usize {
        use Instruction::*;
        match self {
            Add { .. } | Mul { .. } | LessThan { .. } | Equals { .. } => 4,
            JumpIfTrue { .. } | JumpIfFalse { .. } => 3,
            Input { .. } | Output { .. } => 2,
            Exit => 1,
        }
    }
}

/// An Intcode interpreter that owns the memory it runs against.
///
/// Input and output go through the capabilities `I` and `O`. When a capability can't deliver,
/// the processor doesn't wait: it records that it's blocked, leaves the program counter on the
/// I/O instruction and returns. Calling [`step`](Processor::step) again retries the
/// instruction.
pub struct Processor<I, O> {
    name: String,
    memory: Box<[i64]>,
    pc: usize,
    halted: bool,
    input_blocked: bool,
    output_blocked: bool,
    input: Option<I>,
    output: Option<O>,
}

impl Processor<Disconnected, Disconnected> {
    /// A processor with no input or output connected.
    pub fn new(memory: impl Into<Box<[i64]>>) -> Self {
        Processor {
            name: "Processor".to_string(),
            memory: memory.into(),
            pc: 0,
            halted: false,
            input_blocked: false,
            output_blocked: false,
            input: None,
            output: None,
        }
    }
}

impl<I: Input, O: Output> Processor<I, O> {
    pub fn connected(memory: impl Into<Box<[i64]>>, input: I, output: O) -> Self {
        Processor::new(memory).with_input(input).with_output(output)
    }

    pub fn with_input<J: Input>(self, input: J) -> Processor<J, O> {
        Processor {
            name: self.name,
            memory: self.memory,
            pc: self.pc,
            halted: self.halted,
            input_blocked: self.input_blocked,
            output_blocked: self.output_blocked,
            input: Some(input),
            output: self.output,
        }
    }

    pub fn with_output<P: Output>(self, output: P) -> Processor<I, P> {
        Processor {
            name: self.name,
            memory: self.memory,
            pc: self.pc,
            halted: self.halted,
            input_blocked: self.input_blocked,
            output_blocked: self.output_blocked,
            input: self.input,
            output: Some(output),
        }
    }

    pub fn named<T: ToString>(mut self, name: T) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn memory(&self) -> &[i64] {
        &self.memory
    }

    pub fn into_memory(self) -> Box<[i64]> {
        self.memory
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn input_blocked(&self) -> bool {
        self.input_blocked
    }

    pub fn output_blocked(&self) -> bool {
        self.output_blocked
    }

    pub fn io_blocked(&self) -> bool {
        self.input_blocked || self.output_blocked
    }

    pub fn state(&self) -> State {
        if self.halted {
            State::Halted
        } else if self.input_blocked {
            State::InputBlocked
        } else if self.output_blocked {
            State::OutputBlocked
        } else {
            State::Running
        }
    }

    fn check_address(&self, address: usize) -> Result<usize> {
        if address < self.memory.len() {
            Ok(address)
        } else {
            Err(Error::NoSuchAddress {
                address,
                len: self.memory.len(),
            })
        }
    }

    /// Overwrite a memory cell, e.g. to patch a program before running it.
    pub fn set(&mut self, address: usize, value: i64) -> Result<()> {
        let address = self.check_address(address)?;
        self.memory[address] = value;
        Ok(())
    }

    /// Move the program counter. Halted and blocked flags are left alone.
    pub fn jump(&mut self, address: usize) -> Result<()> {
        self.pc = self.check_address(address)?;
        Ok(())
    }

    /// Start again from the beginning of `memory`. The old memory is dropped.
    pub fn reset(&mut self, memory: impl Into<Box<[i64]>>) {
        self.memory = memory.into();
        self.pc = 0;
        self.halted = false;
        self.input_blocked = false;
        self.output_blocked = false;
    }

    fn load(&self, parameter: Parameter, word: i64) -> Result<i64> {
        match parameter.mode {
            Mode::Position => address(parameter.value, self.memory.len())
                .map(|address| self.memory[address])
                .ok_or(Error::AddressOutOfBounds {
                    pc: self.pc,
                    word,
                    address: parameter.value,
                }),
            Mode::Immediate => Ok(parameter.value),
        }
    }

    fn jump_target(&self, parameter: Parameter, word: i64) -> Result<usize> {
        let target = self.load(parameter, word)?;
        address(target, self.memory.len()).ok_or(Error::AddressOutOfBounds {
            pc: self.pc,
            word,
            address: target,
        })
    }

    fn arithmetic(
        &self,
        word: i64,
        checked: bool,
        x: i64,
        y: i64,
        op: fn(i64, i64) -> Option<i64>,
        wrapping_op: fn(i64, i64) -> i64,
    ) -> Result<i64> {
        if checked {
            op(x, y).ok_or(Error::ArithmeticOverflow { pc: self.pc, word })
        } else {
            Ok(wrapping_op(x, y))
        }
    }

    /// Execute a single instruction.
    ///
    /// Does nothing once the processor has halted. A blocked input or output leaves memory and
    /// the program counter untouched. Add and Multiply wrap on overflow.
    pub fn step(&mut self) -> Result<()> {
        self.execute(false)
    }

    /// Like [`step`](Processor::step), but an Add or Multiply that overflows fails with
    /// [`Error::ArithmeticOverflow`] before anything is written.
    pub fn step_checked(&mut self) -> Result<()> {
        self.execute(true)
    }

    fn execute(&mut self, checked: bool) -> Result<()> {
        if self.halted {
            return Ok(());
        }

        let word = *self
            .memory
            .get(self.pc)
            .ok_or(Error::PcOutOfBounds { pc: self.pc })?;
        let instruction = Instruction::parse(&self.memory, self.pc, word)?;
        trace!(
            "{}: {:>6} | {:05} {:?}",
            self.name,
            self.pc,
            word,
            instruction
        );

        let mut next = self.pc + instruction.size();
        match instruction {
            Instruction::Add { x, y, output } => {
                let (x, y) = (self.load(x, word)?, self.load(y, word)?);
                let value =
                    self.arithmetic(word, checked, x, y, i64::checked_add, i64::wrapping_add)?;
                self.memory[output] = value;
            }
            Instruction::Mul { x, y, output } => {
                let (x, y) = (self.load(x, word)?, self.load(y, word)?);
                let value =
                    self.arithmetic(word, checked, x, y, i64::checked_mul, i64::wrapping_mul)?;
                self.memory[output] = value;
            }
            Instruction::Input { output } => {
                let input = self.input.as_ref().ok_or(Error::MissingCapability {
                    pc: self.pc,
                    word,
                    capability: "input",
                })?;
                match input.get() {
                    Some(value) => {
                        self.memory[output] = value;
                        self.input_blocked = false;
                    }
                    None => {
                        debug!("{}: blocked on input at {}", self.name, self.pc);
                        self.input_blocked = true;
                        return Ok(());
                    }
                }
            }
            Instruction::Output { input } => {
                let value = self.load(input, word)?;
                let output = self.output.as_ref().ok_or(Error::MissingCapability {
                    pc: self.pc,
                    word,
                    capability: "output",
                })?;
                if output.put(value) {
                    self.output_blocked = false;
                } else {
                    debug!("{}: blocked on output at {}", self.name, self.pc);
                    self.output_blocked = true;
                    return Ok(());
                }
            }
            Instruction::JumpIfTrue { input, address } => {
                if self.load(input, word)? != 0 {
                    next = self.jump_target(address, word)?;
                }
            }
            Instruction::JumpIfFalse { input, address } => {
                if self.load(input, word)? == 0 {
                    next = self.jump_target(address, word)?;
                }
            }
            Instruction::LessThan { x, y, output } => {
                self.memory[output] = if self.load(x, word)? < self.load(y, word)? {
                    1
                } else {
                    0
                }
            }
            Instruction::Equals { x, y, output } => {
                self.memory[output] = if self.load(x, word)? == self.load(y, word)? {
                    1
                } else {
                    0
                }
            }
            Instruction::Exit => {
                debug!("{}: halted at {}", self.name, self.pc);
                self.halted = true;
                return Ok(());
            }
        }

        self.pc = next;
        Ok(())
    }

    /// Step until the program halts.
    ///
    /// Keeps retrying a blocked instruction, so this only returns for capabilities that always
    /// deliver eventually; use [`run_until_halt_or_blocked`](Processor::run_until_halt_or_blocked)
    /// otherwise.
    pub fn run_until_halt(&mut self) -> Result<()> {
        while !self.halted {
            self.step()?;
        }
        Ok(())
    }

    /// [`run_until_halt`](Processor::run_until_halt) using
    /// [`step_checked`](Processor::step_checked).
    pub fn run_until_halt_checked(&mut self) -> Result<()> {
        while !self.halted {
            self.step_checked()?;
        }
        Ok(())
    }

    /// Step until the program halts or blocks on I/O, and report which.
    pub fn run_until_halt_or_blocked(&mut self) -> Result<State> {
        loop {
            self.step()?;
            if self.halted || self.io_blocked() {
                return Ok(self.state());
            }
        }
    }
}
