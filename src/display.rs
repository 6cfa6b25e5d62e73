pub const INSERT_COIN: &str = "Insert coin";
pub const PRESS_GO: &str = "Press GO!";
pub const WAIT: &str = "Wait...";
pub const AVERAGE_PREFIX: &str = "Average = ";

/// Where the controller writes what the player should see.
pub trait DisplaySink {
    fn set_display(&mut self, text: &str);
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn set_display(&mut self, text: &str) {
        (**self).set_display(text)
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn set_display(&mut self, text: &str) {
        (**self).set_display(text)
    }
}

/// Display that remembers the current text and every write since the last drain.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    current: String,
    writes: Vec<String>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Drains the write log, keeping the current text.
    pub fn take_writes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.writes)
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_display(&mut self, text: &str) {
        self.current.clear();
        self.current.push_str(text);
        self.writes.push(text.to_owned());
    }
}
