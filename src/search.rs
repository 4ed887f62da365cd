use super::error::{Error, Result};
use super::network::AmplifierNetwork;
use super::permutations::Permutations;
use super::program::Program;
use itertools::Itertools;
use log::{debug, info};

/// Phase settings for a chain where each amplifier runs once.
pub const SINGLE_PASS_PHASES: [i64; 5] = [0, 1, 2, 3, 4];

/// Phase settings for amplifiers running in a feedback loop.
pub const FEEDBACK_PHASES: [i64; 5] = [5, 6, 7, 8, 9];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Best {
    pub phase_settings: Vec<i64>,
    pub signal: i64,
}

/// Try every ordering of `candidates` as phase settings and keep the one giving the largest
/// signal. On a tie the earlier ordering wins.
pub fn find_max_signal(
    program: &Program,
    candidates: &[i64],
    max_passes: Option<usize>,
) -> Result<Best> {
    let mut network = AmplifierNetwork::new(program.clone(), candidates.len())?;
    let permutations = Permutations::new(candidates)?;

    let mut best: Option<Best> = None;
    for phase_settings in &permutations {
        let signal = network.amplify(&phase_settings, max_passes)?;
        debug!("{} -> {}", phase_settings.iter().join(","), signal);
        if best.as_ref().map_or(true, |best| signal > best.signal) {
            best = Some(Best {
                phase_settings,
                signal,
            });
        }
    }

    let best = best.ok_or(Error::EmptyNetwork)?;
    info!(
        "Best of {} settings: {} -> {}",
        permutations.len(),
        best.phase_settings.iter().join(","),
        best.signal
    );
    Ok(best)
}
