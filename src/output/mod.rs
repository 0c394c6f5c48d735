//! Console rendering of a turn's output.

use std::io::Write;

use futures::{Stream, StreamExt};
use tracing::trace;

use crate::error::Result;
use crate::types::{AgentEvent, ResultMessage};

/// Label printed before every assistant text block by default.
pub const DEFAULT_LABEL: &str = "Claude";

/// What a drained stream contained.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrainSummary {
    /// Text blocks written.
    pub text_blocks: usize,
    /// Cost line written, if any.
    pub total_cost_usd: Option<f64>,
    pub result: Option<ResultMessage>,
}

/// Prints assistant text as it arrives and the final cost, if any.
#[derive(Debug, Clone)]
pub struct Drainer {
    label: String,
}

impl Default for Drainer {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl Drainer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Consume `stream` fully, in order, writing to `out`.
    ///
    /// Output for events received before an error stays written; the error
    /// is returned as is.
    pub async fn drain<S, W>(&self, mut stream: S, out: &mut W) -> Result<DrainSummary>
    where
        S: Stream<Item = Result<AgentEvent>> + Unpin,
        W: Write,
    {
        let mut summary = DrainSummary::default();
        while let Some(event) = stream.next().await {
            self.render(&event?, out, &mut summary)?;
        }
        Ok(summary)
    }

    fn render<W: Write>(
        &self,
        event: &AgentEvent,
        out: &mut W,
        summary: &mut DrainSummary,
    ) -> Result<()> {
        match event {
            AgentEvent::Assistant(message) => {
                for text in message.text_blocks() {
                    writeln!(out, "{}: {text}", self.label)?;
                    summary.text_blocks += 1;
                }
                out.flush()?;
            }
            AgentEvent::Result(result) => {
                if let Some(cost) = result.billable_cost() {
                    writeln!(out, "\nCost: {}", format_cost(cost))?;
                    out.flush()?;
                    summary.total_cost_usd = Some(cost);
                }
                summary.result = Some(result.clone());
            }
            AgentEvent::Other(value) => {
                trace!(kind = ?value.get("type"), "ignoring event");
            }
        }
        Ok(())
    }
}

/// `$` followed by the amount rounded to four decimals.
pub fn format_cost(cost: f64) -> String {
    format!("${cost:.4}")
}

/// Print a single-shot result: the text, once.
pub fn write_final_output<W: Write>(out: &mut W, output: &str) -> Result<()> {
    writeln!(out, "{output}")?;
    out.flush()?;
    Ok(())
}
