//! Deterministic replay of a device session.
//!
//! A script is a list of button presses, tick runs and queued random delays,
//! optionally interleaved with expectations on what the display shows:
//!
//! ```text
//! coin
//! random 120
//! go
//! tick 125
//! go
//! expect 0.05
//! ```

use crate::config::Timing;
use crate::controller::Controller;
use crate::display::RecordingDisplay;
use crate::error::ScriptError;
use crate::random::ScriptedRandom;
use crate::transcript::{Transcript, TranscriptEntry};

const STATE_NAMES: [&str; 6] = [
    "Idle",
    "WaitingForGo",
    "WaitingPeriod",
    "Measuring",
    "ShowResult",
    "ShowAverage",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Init,
    Coin,
    Go,
    Tick(u32),
    Random(u32),
    ExpectDisplay(String),
    ExpectState(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    /// Steps paired with their 1-based source line.
    steps: Vec<(usize, Step)>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let text = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();
            if text.is_empty() {
                continue;
            }
            steps.push((line, parse_step(line, text)?));
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(|(_, step)| step)
    }

    /// Runs the script against a fresh controller and returns every display write.
    pub fn run(&self, timing: &Timing) -> Result<Transcript, ScriptError> {
        let mut controller =
            Controller::with_timing(RecordingDisplay::new(), ScriptedRandom::default(), *timing);
        let mut transcript = Transcript::default();
        let mut tick: u64 = 0;
        drain(&mut controller, &mut transcript, tick);

        for (line, step) in &self.steps {
            match step {
                Step::Init => controller.init(),
                Step::Coin => controller.coin_inserted(),
                Step::Go => controller.go_stop_pressed(),
                Step::Tick(n) => {
                    for _ in 0..*n {
                        controller.tick();
                        tick += 1;
                        drain(&mut controller, &mut transcript, tick);
                    }
                }
                Step::Random(value) => controller.random_mut().push(*value),
                Step::ExpectDisplay(expected) => {
                    let actual = controller.display().current();
                    if actual != expected {
                        return Err(ScriptError::DisplayMismatch {
                            line: *line,
                            expected: expected.clone(),
                            actual: actual.to_owned(),
                        });
                    }
                }
                Step::ExpectState(expected) => {
                    let actual = controller.state().to_string();
                    if &actual != expected {
                        return Err(ScriptError::StateMismatch {
                            line: *line,
                            expected: expected.clone(),
                            actual,
                        });
                    }
                }
            }
            drain(&mut controller, &mut transcript, tick);
        }

        let random = controller.random();
        if random.remaining() > 0 {
            tracing::warn!(
                unused = random.remaining(),
                "replay ended with queued random values left"
            );
        }
        tracing::debug!(
            ticks = tick,
            writes = transcript.entries().len(),
            draws = random.draws(),
            "replay finished"
        );
        Ok(transcript)
    }
}

fn drain(
    controller: &mut Controller<RecordingDisplay, ScriptedRandom>,
    transcript: &mut Transcript,
    tick: u64,
) {
    let state = controller.state().to_string();
    for display in controller.display_mut().take_writes() {
        transcript.push(TranscriptEntry {
            tick,
            state: state.clone(),
            display,
        });
    }
}

fn parse_step(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (keyword, rest) = match text.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (text, ""),
    };
    let err = |message: String| ScriptError::Parse { line, message };

    match keyword.to_ascii_lowercase().as_str() {
        "init" => no_argument(rest, Step::Init).map_err(err),
        "coin" => no_argument(rest, Step::Coin).map_err(err),
        "go" => no_argument(rest, Step::Go).map_err(err),
        "tick" => {
            if rest.is_empty() {
                Ok(Step::Tick(1))
            } else {
                parse_count(rest).map(Step::Tick).map_err(err)
            }
        }
        "random" => parse_count(rest).map(Step::Random).map_err(err),
        "expect" => Ok(Step::ExpectDisplay(unquote(rest).to_owned())),
        "expect-state" => {
            if STATE_NAMES.contains(&rest) {
                Ok(Step::ExpectState(rest.to_owned()))
            } else {
                Err(err(format!("unknown state {rest:?}")))
            }
        }
        other => Err(err(format!("unknown command {other:?}"))),
    }
}

fn no_argument(rest: &str, step: Step) -> Result<Step, String> {
    if rest.is_empty() {
        Ok(step)
    } else {
        Err(format!("unexpected argument {rest:?}"))
    }
}

fn parse_count(rest: &str) -> Result<u32, String> {
    rest.parse::<u32>()
        .map_err(|_| format!("expected a non-negative number, got {rest:?}"))
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_commands() {
        let script = Script::parse(
            "# a comment\n\
             init\n\
             coin\n\
             random 120   # first delay\n\
             go\n\
             tick\n\
             tick 119\n\
             expect \"0.00\"\n\
             expect Average = 0.72\n\
             expect-state Measuring\n",
        )
        .unwrap();
        let steps: Vec<&Step> = script.steps().collect();
        assert_eq!(
            steps,
            vec![
                &Step::Init,
                &Step::Coin,
                &Step::Random(120),
                &Step::Go,
                &Step::Tick(1),
                &Step::Tick(119),
                &Step::ExpectDisplay("0.00".into()),
                &Step::ExpectDisplay("Average = 0.72".into()),
                &Step::ExpectState("Measuring".into()),
            ]
        );
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let err = Script::parse("coin\n\ntick lots\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 3, .. }), "{err:?}");

        let err = Script::parse("jump").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 1, .. }));

        let err = Script::parse("coin 2").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 1, .. }));

        let err = Script::parse("expect-state Sleeping").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 1, .. }));
    }

    #[test]
    fn run_records_ticks_of_each_write() {
        let script = Script::parse("coin\nrandom 120\ngo\ntick 125\ngo\nexpect 0.05\n").unwrap();
        let transcript = script.run(&Timing::default()).unwrap();
        let entries = transcript.entries();

        assert_eq!(entries[0].display, "Insert coin");
        assert_eq!(entries[0].tick, 0);
        assert_eq!(entries[1].display, "Press GO!");
        assert_eq!(entries[2].display, "Wait...");
        assert_eq!(entries[2].state, "WaitingPeriod");

        let measuring_start = entries.iter().find(|e| e.display == "0.00").unwrap();
        assert_eq!(measuring_start.tick, 120);
        assert_eq!(measuring_start.state, "Measuring");

        let last = entries.last().unwrap();
        assert_eq!(last.display, "0.05");
        assert_eq!(last.tick, 125);
        assert_eq!(last.state, "ShowResult");
    }

    #[test]
    fn unused_random_values_do_not_fail_the_run() {
        let script = Script::parse("random 120\nrandom 130\ncoin\ngo\nexpect Wait...\n").unwrap();
        let transcript = script.run(&Timing::default()).unwrap();
        assert_eq!(transcript.displays().last(), Some("Wait..."));
    }

    #[test]
    fn failed_expectation_reports_actual() {
        let script = Script::parse("coin\nexpect Wait...\n").unwrap();
        let err = script.run(&Timing::default()).unwrap_err();
        assert_eq!(
            err,
            ScriptError::DisplayMismatch {
                line: 2,
                expected: "Wait...".into(),
                actual: "Press GO!".into(),
            }
        );

        let script = Script::parse("coin\nexpect-state Idle\n").unwrap();
        assert!(matches!(
            script.run(&Timing::default()),
            Err(ScriptError::StateMismatch { line: 2, .. })
        ));
    }
}
