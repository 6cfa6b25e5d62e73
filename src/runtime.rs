use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Unified event type consumed by the cabinet loop
#[derive(Clone, Debug)]
pub enum DeviceEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DeviceEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<DeviceEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // some terminals report releases too; a button is one press
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    tx.send(DeviceEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(DeviceEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(%err, "terminal input failed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DeviceEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<DeviceEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DeviceEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DeviceEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input events with ticks on a fixed cadence.
///
/// The next tick is due one interval after the previous one regardless of how
/// many input events arrived in between.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Blocks until the next input event or the tick deadline, whichever comes first.
    pub fn step(&mut self) -> DeviceEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.fire_tick(now);
        }

        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.fire_tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => {
                // nothing will ever arrive, just keep the cadence
                let remaining = self.next_tick.saturating_duration_since(Instant::now());
                std::thread::sleep(remaining);
                self.fire_tick(Instant::now())
            }
        }
    }

    fn fire_tick(&mut self, now: Instant) -> DeviceEvent {
        self.next_tick += self.ticker.interval();
        // after a long stall, resynchronise instead of bursting
        if self.next_tick + self.ticker.interval() < now {
            tracing::debug!("tick driver fell behind, resynchronising");
            self.next_tick = now + self.ticker.interval();
        }
        DeviceEvent::Tick
    }
}

/// Physical controls of the cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Coin,
    GoStop,
    Quit,
}

pub fn button_for(key: &KeyEvent) -> Option<Button> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Button::Quit);
    }
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('5') => Some(Button::Coin),
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('g') | KeyCode::Char('G') => {
            Some(Button::GoStop)
        }
        KeyCode::Esc | KeyCode::Char('q') => Some(Button::Quit),
        _ => None,
    }
}
