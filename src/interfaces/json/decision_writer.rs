use crate::domain::decision::Decision;
use crate::error::Result;
use std::io::Write;

/// Writes decisions as JSON lines.
pub struct DecisionWriter<W: Write> {
    sink: W,
}

impl<W: Write> DecisionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_decision(&mut self, decision: &Decision) -> Result<()> {
        serde_json::to_writer(&mut self.sink, decision)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
