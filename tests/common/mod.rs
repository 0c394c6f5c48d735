//! Shared stub collaborators.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use tern::config::Session;
use tern::error::{Result, TernError};
use tern::responses::{RunOutput, SingleShotRunner};
use tern::runtime::{AgentRuntime, EventStream};
use tern::types::{AgentEvent, AssistantMessage, ResultMessage};

/// One scripted step of a stub turn.
#[derive(Clone)]
pub enum Step {
    Event(AgentEvent),
    Fail(String),
}

pub fn text(t: &str) -> Step {
    Step::Event(AgentEvent::Assistant(AssistantMessage::text(t)))
}

pub fn result(cost: f64) -> Step {
    Step::Event(AgentEvent::Result(ResultMessage::with_cost(cost)))
}

/// Runtime that replays a script and records how often it was asked.
pub struct StubRuntime {
    script: Vec<Step>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubRuntime {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for StubRuntime {
    fn name(&self) -> &str {
        "stub"
    }

    async fn query(&self, _session: &Session, prompt: &str) -> Result<EventStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let items: Vec<Result<AgentEvent>> = self
            .script
            .iter()
            .map(|step| match step {
                Step::Event(event) => Ok(event.clone()),
                Step::Fail(message) => Err(TernError::Stream(message.clone())),
            })
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }
}

/// Single-shot runner returning a fixed answer.
pub struct StubRunner {
    answer: String,
    calls: AtomicUsize,
}

impl StubRunner {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SingleShotRunner for StubRunner {
    async fn run(&self, _prompt: &str) -> Result<RunOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RunOutput {
            final_output: self.answer.clone(),
            turns: 1,
            ..Default::default()
        })
    }
}
