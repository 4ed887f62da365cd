use amplifier::io::{Print, Prompt};
use amplifier::{
    find_max_signal, Error, Processor, Program, State, FEEDBACK_PHASES, SINGLE_PASS_PHASES,
};
use itertools::Itertools;
use log::error;
use std::fs::File;
use std::io::{self, stdin, stdout};
use std::path::{Path, PathBuf};
use std::process::exit;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "amplifier", about = "Run Intcode programs and tune amplifier rings")]
enum Opts {
    /// Find the phase settings giving the largest thruster signal
    Search {
        /// Use the feedback loop phase settings (5 to 9) instead of 0 to 4
        #[structopt(short, long)]
        feedback: bool,

        /// Search these phase settings instead, e.g. 5,6,7,8,9
        #[structopt(short, long, use_delimiter = true, allow_hyphen_values = true)]
        phases: Option<Vec<i64>>,

        /// Give up on a setting after this many scheduling passes
        #[structopt(long)]
        max_passes: Option<usize>,

        /// Program to run; read from stdin if not given
        #[structopt(parse(from_os_str))]
        file: Option<PathBuf>,
    },

    /// Run a program, reading input from stdin one value per line and printing output
    Run {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
}

fn load(file: Option<&Path>) -> Result<Program, Error> {
    match file {
        Some(path) => Program::parse(File::open(path)?),
        None => Program::parse(stdin()),
    }
}

fn search(program: &Program, phases: &[i64], max_passes: Option<usize>) -> Result<(), Error> {
    let best = find_max_signal(program, phases, max_passes)?;
    println!("{}", best.signal);
    println!("{}", best.phase_settings.iter().join(","));
    Ok(())
}

fn run(program: &Program) -> Result<(), Error> {
    let stdin = stdin();
    let mut processor = Processor::connected(
        program.memory(),
        Prompt::new(stdin.lock()),
        Print::new(stdout()),
    );

    match processor.run_until_halt_or_blocked()? {
        State::Halted => Ok(()),
        State::InputBlocked => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("ran out of input at {}", processor.pc()),
        )
        .into()),
        state => Err(io::Error::new(
            io::ErrorKind::Other,
            format!("stopped at {} in state {:?}", processor.pc(), state),
        )
        .into()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match Opts::from_args() {
        Opts::Search {
            feedback,
            phases,
            max_passes,
            file,
        } => load(file.as_deref()).and_then(|program| {
            let phases = match phases {
                Some(phases) => phases,
                None if feedback => FEEDBACK_PHASES.to_vec(),
                None => SINGLE_PASS_PHASES.to_vec(),
            };
            search(&program, &phases, max_passes)
        }),
        Opts::Run { file } => load(Some(file.as_path())).and_then(|program| run(&program)),
    };

    if let Err(error) = result {
        error!("{}", error);
        exit(1);
    }
}
