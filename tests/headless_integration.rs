use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use reaction_machine::{
    display::RecordingDisplay,
    random::ScriptedRandom,
    runtime::{button_for, Button, DeviceEvent, FixedTicker, Runner, TestEventSource},
    session::format_hundredths,
    Controller, State,
};

type Device = Controller<RecordingDisplay, ScriptedRandom>;

fn press(c: char) -> DeviceEvent {
    DeviceEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Same dispatch the cabinet loop performs. Returns false on quit.
fn dispatch(device: &mut Device, event: DeviceEvent) -> bool {
    match event {
        DeviceEvent::Tick => device.tick(),
        DeviceEvent::Resize => {}
        DeviceEvent::Key(key) => match button_for(&key) {
            Some(Button::Quit) => return false,
            Some(Button::Coin) => device.coin_inserted(),
            Some(Button::GoStop) => device.go_stop_pressed(),
            None => {}
        },
    }
    true
}

// Headless round through the runner: keys arrive over the channel, ticks come
// from the runner's cadence, no TTY involved.
#[test]
fn headless_round_through_runner() {
    let mut device = Controller::connect(RecordingDisplay::new(), ScriptedRandom::new([100]));

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(press('c')).unwrap();
    tx.send(press(' ')).unwrap();

    let mut stopped = false;
    for _ in 0..2000u32 {
        if !dispatch(&mut device, runner.step()) {
            break;
        }
        if !stopped && device.state() == State::Measuring && device.ticks_in_state() == 5 {
            tx.send(press(' ')).unwrap();
            stopped = true;
        }
        if device.state() == State::ShowResult {
            break;
        }
    }

    // an overdue tick may beat the key, so the stop lands on 5 or a little later
    let recorded = device.session().sum_ticks;
    assert_eq!(device.state(), State::ShowResult);
    assert!((5..10).contains(&recorded), "recorded {recorded} ticks");
    assert_eq!(device.display().current(), format_hundredths(recorded));
    assert_eq!(device.session().games_played, 1);
}

#[test]
fn headless_quit_key_stops_loop() {
    let mut device = Controller::connect(RecordingDisplay::new(), ScriptedRandom::default());
    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(50)),
    );

    tx.send(press('c')).unwrap();
    tx.send(DeviceEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))).unwrap();

    assert!(dispatch(&mut device, runner.step()));
    assert_eq!(device.state(), State::WaitingForGo);
    assert!(!dispatch(&mut device, runner.step()));
}

#[test]
fn headless_go_timeout_by_ticks() {
    let mut device = Controller::connect(RecordingDisplay::new(), ScriptedRandom::default());
    device.coin_inserted();

    let (_tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_micros(200)),
    );

    for _ in 0..1000u32 {
        dispatch(&mut device, runner.step());
    }

    assert_eq!(device.state(), State::Idle);
    assert_eq!(device.display().current(), "Insert coin");
}
