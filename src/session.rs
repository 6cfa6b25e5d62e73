use crate::config::Timing;

/// Per-coin accumulators. One tick is one hundredth of a second, so round
/// times are kept as exact tick counts and only converted for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub games_played: u32,
    pub sum_ticks: u32,
    pub cheat_aborted: bool,
}

/// What follows once a round's result has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Session was forfeited by a cheat.
    Forfeit,
    NextRound,
    /// All rounds played; carries the average in hundredths of a second.
    Average(u32),
}

impl Session {
    pub fn record_round(&mut self, ticks: u32) {
        self.sum_ticks = self.sum_ticks.saturating_add(ticks);
        self.games_played += 1;
    }

    pub fn sum_seconds(&self) -> f64 {
        f64::from(self.sum_ticks) * 0.01
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn next_step(&self, timing: &Timing) -> NextStep {
        if self.cheat_aborted {
            NextStep::Forfeit
        } else if self.games_played < timing.games_per_coin {
            NextStep::NextRound
        } else {
            NextStep::Average(average_hundredths(self.sum_ticks, timing.games_per_coin))
        }
    }
}

/// `sum / rounds` rounded half up to whole hundredths.
pub fn average_hundredths(sum_ticks: u32, rounds: u32) -> u32 {
    let rounds = u64::from(rounds.max(1));
    let rounded = (2 * u64::from(sum_ticks) + rounds) / (2 * rounds);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Formats hundredths of a second as `S.hh`.
pub fn format_hundredths(hundredths: u32) -> String {
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

pub fn format_average(hundredths: u32) -> String {
    format!("{}{}", crate::display::AVERAGE_PREFIX, format_hundredths(hundredths))
}
