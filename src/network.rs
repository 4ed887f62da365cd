use super::channel::IoChannel;
use super::error::{Error, Result};
use super::io::{Input, Output};
use super::process::{Processor, State};
use super::program::Program;
use log::debug;
use std::rc::Rc;

pub type Amplifier = Processor<Rc<IoChannel>, Rc<IoChannel>>;

/// Round-robin the processors until they've all halted, returning the number of passes.
///
/// Each pass runs every remaining processor, in order, until it halts or blocks. Nothing here
/// notices a set of processors that are all waiting on each other; pass `max_passes` to give
/// up with [`Error::PassLimitExceeded`] instead of looping forever.
pub fn run_to_completion<I, O>(
    mut processes: Vec<&mut Processor<I, O>>,
    max_passes: Option<usize>,
) -> Result<usize>
where
    I: Input,
    O: Output,
{
    let mut passes = 0;
    while !processes.is_empty() {
        if let Some(max_passes) = max_passes {
            if passes >= max_passes {
                return Err(Error::PassLimitExceeded { passes });
            }
        }
        let mut remaining_processes = vec![];
        for process in processes {
            if process.run_until_halt_or_blocked()? != State::Halted {
                remaining_processes.push(process);
            }
        }
        processes = remaining_processes;
        passes += 1;
    }
    Ok(passes)
}

/// A ring of amplifiers, each running its own copy of the same program.
///
/// Amplifier `i` writes to channel `i`, which is read by amplifier `i + 1`; the last channel
/// feeds back into amplifier 0 and carries the final signal.
pub struct AmplifierNetwork {
    program: Program,
    amplifiers: Vec<Amplifier>,
    channels: Vec<Rc<IoChannel>>,
}

impl AmplifierNetwork {
    pub fn new(program: Program, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::EmptyNetwork);
        }

        let channels: Vec<_> = (0..size)
            .map(|index| Rc::new(IoChannel::new(format!("{}->{}", index, (index + 1) % size))))
            .collect();
        let amplifiers = channels
            .iter()
            .cycle()
            .skip(size - 1)
            .zip(channels.iter())
            .enumerate()
            .map(|(index, (input, output))| {
                Processor::connected(program.memory(), input.clone(), output.clone())
                    .named(format!("Amplifier {}", index))
            })
            .collect();

        Ok(AmplifierNetwork {
            program,
            amplifiers,
            channels,
        })
    }

    /// Build a network with one amplifier per phase setting, ready to [`run`](Self::run).
    pub fn with_phases(program: Program, phase_settings: &[i64]) -> Result<Self> {
        let mut network = AmplifierNetwork::new(program, phase_settings.len())?;
        network.configure(phase_settings)?;
        Ok(network)
    }

    pub fn len(&self) -> usize {
        self.amplifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplifiers.is_empty()
    }

    pub fn amplifiers(&self) -> &[Amplifier] {
        &self.amplifiers
    }

    /// The channel feeding amplifier 0.
    fn feedback(&self) -> &IoChannel {
        &self.channels[self.channels.len() - 1]
    }

    fn write(channel: &IoChannel, value: i64) -> Result<()> {
        if channel.write(value) {
            Ok(())
        } else {
            Err(Error::ChannelOccupied {
                channel: channel.name().to_string(),
            })
        }
    }

    /// Start a fresh trial: reload every amplifier with the original program, let each one
    /// consume its phase setting, then put the initial signal of 0 in front of amplifier 0.
    pub fn configure(&mut self, phase_settings: &[i64]) -> Result<()> {
        if phase_settings.len() != self.len() {
            return Err(Error::PhaseCountMismatch {
                expected: self.len(),
                actual: phase_settings.len(),
            });
        }

        for (amplifier, channel) in self.amplifiers.iter_mut().zip(&self.channels) {
            amplifier.reset(self.program.memory());
            channel.reset();
        }

        let size = self.len();
        for (index, setting) in phase_settings.iter().enumerate() {
            let input = &self.channels[(index + size - 1) % size];
            Self::write(input, *setting)?;
            self.amplifiers[index].run_until_halt_or_blocked()?;
        }

        Self::write(self.feedback(), 0)
    }

    /// Run until every amplifier halts and return the signal left for amplifier 0.
    ///
    /// Loops forever if the amplifiers deadlock; see [`run_bounded`](Self::run_bounded).
    pub fn run(&mut self) -> Result<i64> {
        self.run_with_limit(None)
    }

    pub fn run_bounded(&mut self, max_passes: usize) -> Result<i64> {
        self.run_with_limit(Some(max_passes))
    }

    fn run_with_limit(&mut self, max_passes: Option<usize>) -> Result<i64> {
        let passes = run_to_completion(self.amplifiers.iter_mut().collect(), max_passes)?;
        debug!("{} amplifiers halted after {} passes", self.len(), passes);

        let feedback = self.feedback();
        feedback.peek().ok_or_else(|| Error::NoSignal {
            channel: feedback.name().to_string(),
        })
    }

    /// Configure and run in one go.
    pub fn amplify(&mut self, phase_settings: &[i64], max_passes: Option<usize>) -> Result<i64> {
        self.configure(phase_settings)?;
        self.run_with_limit(max_passes)
    }

    pub fn final_signal(&self) -> Option<i64> {
        self.feedback().peek()
    }
}
