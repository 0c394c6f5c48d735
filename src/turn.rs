//! One agent turn: resolve configuration, start the turn, render its output.

use std::io::Write;

use tracing::{debug, info};

use crate::config::{Environment, ProcessEnv, SessionConfig};
use crate::error::Result;
use crate::output::{write_final_output, DrainSummary, Drainer};
use crate::responses::{RunOutput, SingleShotRunner};
use crate::runtime::AgentRuntime;

/// Drives exactly one turn per call. Holds no state between calls.
pub struct TurnRunner<'a> {
    env: &'a dyn Environment,
    drainer: Drainer,
}

impl Default for TurnRunner<'static> {
    fn default() -> Self {
        Self::new(&ProcessEnv)
    }
}

impl<'a> TurnRunner<'a> {
    /// Runner that resolves credentials from `env`.
    pub fn new(env: &'a dyn Environment) -> Self {
        Self {
            env,
            drainer: Drainer::default(),
        }
    }

    pub fn with_drainer(mut self, drainer: Drainer) -> Self {
        self.drainer = drainer;
        self
    }

    /// Streaming shape: print events from `runtime` as they arrive.
    ///
    /// Credentials are resolved first; a missing one fails before the
    /// runtime is touched.
    pub async fn stream<W: Write>(
        &self,
        runtime: &dyn AgentRuntime,
        config: &SessionConfig,
        prompt: &str,
        out: &mut W,
    ) -> Result<DrainSummary> {
        let session = config.resolve(self.env)?;
        debug!(runtime = runtime.name(), "starting streamed turn");
        let events = runtime.query(&session, prompt).await?;
        let summary = self.drainer.drain(events, out).await?;
        info!(
            text_blocks = summary.text_blocks,
            cost = ?summary.total_cost_usd,
            "turn finished"
        );
        Ok(summary)
    }

    /// Single-shot shape: await one final output and print it.
    pub async fn single_shot<W: Write>(
        &self,
        runner: &dyn SingleShotRunner,
        prompt: &str,
        out: &mut W,
    ) -> Result<RunOutput> {
        let output = runner.run(prompt).await?;
        write_final_output(out, &output.final_output)?;
        info!(turns = output.turns, "turn finished");
        Ok(output)
    }
}
