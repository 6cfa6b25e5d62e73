//! The six device states and their pure reaction to each event.
//!
//! A state never touches the controller directly. [`State::on_event`] returns a
//! [`Command`] and the controller carries it out, so every transition can be
//! checked without a display or random source.

use crate::config::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    CoinInserted,
    GoStopPressed,
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum State {
    Idle,
    WaitingForGo,
    WaitingPeriod { delay_ticks: u32 },
    Measuring,
    ShowResult,
    ShowAverage,
}

/// What the controller must do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ignore,
    /// Prompt for go and wait for it.
    AwaitGo,
    /// Draw a delay and start the random wait.
    BeginWait,
    /// Go pressed during the random wait.
    Cheat,
    StartMeasuring,
    /// Refresh the running time while measuring.
    ShowElapsed(u32),
    /// Finish the round with the given (capped) tick count.
    RecordRound(u32),
    AdvanceOrAverage,
    EndSession,
}

impl State {
    pub fn on_event(self, event: Event, ticks_in_state: u32, timing: &Timing) -> Command {
        match (self, event) {
            (State::Idle, Event::CoinInserted) => Command::AwaitGo,
            (State::Idle, Event::GoStopPressed | Event::Tick) => Command::Ignore,

            (State::WaitingForGo, Event::CoinInserted) => Command::Ignore,
            (State::WaitingForGo, Event::GoStopPressed) => Command::BeginWait,
            (State::WaitingForGo, Event::Tick) => {
                if ticks_in_state >= timing.go_timeout_ticks {
                    Command::EndSession
                } else {
                    Command::Ignore
                }
            }

            (State::WaitingPeriod { .. }, Event::CoinInserted) => Command::Ignore,
            (State::WaitingPeriod { .. }, Event::GoStopPressed) => Command::Cheat,
            (State::WaitingPeriod { delay_ticks }, Event::Tick) => {
                if ticks_in_state >= delay_ticks {
                    Command::StartMeasuring
                } else {
                    Command::Ignore
                }
            }

            (State::Measuring, Event::CoinInserted) => Command::Ignore,
            (State::Measuring, Event::GoStopPressed) => {
                Command::RecordRound(ticks_in_state.min(timing.max_measure_ticks))
            }
            (State::Measuring, Event::Tick) => {
                if ticks_in_state >= timing.max_measure_ticks {
                    Command::RecordRound(timing.max_measure_ticks)
                } else {
                    Command::ShowElapsed(ticks_in_state)
                }
            }

            (State::ShowResult, Event::CoinInserted) => Command::Ignore,
            (State::ShowResult, Event::GoStopPressed) => Command::AdvanceOrAverage,
            (State::ShowResult, Event::Tick) => {
                if ticks_in_state >= timing.result_hold_ticks {
                    Command::AdvanceOrAverage
                } else {
                    Command::Ignore
                }
            }

            (State::ShowAverage, Event::CoinInserted) => Command::Ignore,
            (State::ShowAverage, Event::GoStopPressed) => Command::EndSession,
            (State::ShowAverage, Event::Tick) => {
                if ticks_in_state >= timing.average_hold_ticks {
                    Command::EndSession
                } else {
                    Command::Ignore
                }
            }
        }
    }

    /// True while a coin's session is in progress.
    pub fn in_session(&self) -> bool {
        !matches!(self, State::Idle)
    }
}
