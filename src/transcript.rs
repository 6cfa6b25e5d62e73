use serde::Serialize;
use std::io::Write;

/// One display write observed during a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// Ticks delivered since the replay started.
    pub tick: u64,
    /// State after the event that caused the write.
    pub state: String,
    pub display: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn displays(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.display.as_str())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_rows() {
        let mut t = Transcript::default();
        t.push(TranscriptEntry {
            tick: 0,
            state: "Idle".into(),
            display: "Insert coin".into(),
        });
        t.push(TranscriptEntry {
            tick: 125,
            state: "ShowResult".into(),
            display: "0.05".into(),
        });

        let mut out = Vec::new();
        t.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["tick,state,display", "0,Idle,Insert coin", "125,ShowResult,0.05"]);
    }

    #[test]
    fn displays_in_order() {
        let mut t = Transcript::default();
        for (i, d) in ["Insert coin", "Press GO!"].iter().enumerate() {
            t.push(TranscriptEntry {
                tick: i as u64,
                state: "Idle".into(),
                display: d.to_string(),
            });
        }
        assert_eq!(t.displays().collect::<Vec<_>>(), vec!["Insert coin", "Press GO!"]);
    }
}
