use tracing::{debug, info, warn};

use crate::config::Timing;
use crate::display::{DisplaySink, INSERT_COIN, PRESS_GO, WAIT};
use crate::random::RandomSource;
use crate::session::{format_average, format_hundredths, NextStep, Session};
use crate::state::{Command, Event, State};

/// Reaction game controller for one device.
///
/// Collaborators are bound at construction, so every controller that exists
/// is ready to take events.
#[derive(Debug)]
pub struct Controller<D, R> {
    display: D,
    random: R,
    timing: Timing,
    state: State,
    ticks_in_state: u32,
    session: Session,
}

impl<D: DisplaySink, R: RandomSource> Controller<D, R> {
    /// Binds the display and random source, then runs [`Controller::init`].
    pub fn connect(display: D, random: R) -> Self {
        Self::with_timing(display, random, Timing::default())
    }

    pub fn with_timing(display: D, random: R, timing: Timing) -> Self {
        let mut controller = Self {
            display,
            random,
            timing,
            state: State::Idle,
            ticks_in_state: 0,
            session: Session::default(),
        };
        controller.init();
        controller
    }

    /// Back to Idle with a fresh session, prompting for a coin.
    pub fn init(&mut self) {
        self.change_state(State::Idle);
        self.session.reset();
        self.display.set_display(INSERT_COIN);
    }

    pub fn coin_inserted(&mut self) {
        self.handle(Event::CoinInserted);
    }

    pub fn go_stop_pressed(&mut self) {
        self.handle(Event::GoStopPressed);
    }

    pub fn tick(&mut self) {
        self.ticks_in_state = self.ticks_in_state.saturating_add(1);
        self.handle(Event::Tick);
    }

    fn handle(&mut self, event: Event) {
        let command = self.state.on_event(event, self.ticks_in_state, &self.timing);
        self.apply(command);
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Ignore => {}
            Command::AwaitGo => {
                info!("coin accepted");
                self.display.set_display(PRESS_GO);
                self.change_state(State::WaitingForGo);
            }
            Command::BeginWait => self.begin_wait(),
            Command::Cheat => {
                warn!(
                    games_played = self.session.games_played,
                    "go pressed during wait, session forfeited"
                );
                self.session.cheat_aborted = true;
                self.end_session();
            }
            Command::StartMeasuring => {
                self.display.set_display(&format_hundredths(0));
                self.change_state(State::Measuring);
            }
            Command::ShowElapsed(ticks) => {
                self.display.set_display(&format_hundredths(ticks));
            }
            Command::RecordRound(ticks) => {
                self.display.set_display(&format_hundredths(ticks));
                self.session.record_round(ticks);
                info!(
                    round = self.session.games_played,
                    ticks,
                    capped = ticks >= self.timing.max_measure_ticks,
                    "round recorded"
                );
                self.change_state(State::ShowResult);
            }
            Command::AdvanceOrAverage => self.advance_or_average(),
            Command::EndSession => {
                if self.state == State::WaitingForGo {
                    warn!("no go within timeout, session ended");
                }
                self.end_session();
            }
        }
    }

    fn begin_wait(&mut self) {
        self.display.set_display(WAIT);
        let delay_ticks = self
            .random
            .get_random(self.timing.min_delay_ticks, self.timing.max_delay_ticks);
        debug!(delay_ticks, "random wait drawn");
        self.change_state(State::WaitingPeriod { delay_ticks });
    }

    fn advance_or_average(&mut self) {
        match self.session.next_step(&self.timing) {
            NextStep::Forfeit => self.end_session(),
            NextStep::NextRound => self.begin_wait(),
            NextStep::Average(hundredths) => {
                info!(
                    average = %format_hundredths(hundredths),
                    rounds = self.session.games_played,
                    "session complete"
                );
                self.display.set_display(&format_average(hundredths));
                self.change_state(State::ShowAverage);
            }
        }
    }

    fn end_session(&mut self) {
        self.display.set_display(INSERT_COIN);
        self.change_state(State::Idle);
        self.session.reset();
    }

    fn change_state(&mut self, next: State) {
        debug!(from = %self.state, to = %next, ticks = self.ticks_in_state, "state change");
        self.state = next;
        self.ticks_in_state = 0;
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn random(&self) -> &R {
        &self.random
    }

    pub fn random_mut(&mut self) -> &mut R {
        &mut self.random
    }
}
