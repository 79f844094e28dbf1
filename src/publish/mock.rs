use crate::error::{Result, TaggerError};
use crate::publish::ArtifactPublisher;
use std::sync::Mutex;

/// One recorded publisher call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishCall {
    Build(String),
    Push(String),
    Alias { source: String, alias: String },
}

/// Publisher that records calls instead of running anything
#[derive(Default)]
pub struct RecordingPublisher {
    calls: Mutex<Vec<PublishCall>>,
    fail_push: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: make every `push` call fail
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Tags that were pushed, in order
    pub fn pushed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PublishCall::Push(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PublishCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl ArtifactPublisher for RecordingPublisher {
    fn build(&self, tag: &str) -> Result<()> {
        self.record(PublishCall::Build(tag.to_string()));
        Ok(())
    }

    fn push(&self, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(TaggerError::publish(format!("registry unavailable for {}", tag)));
        }
        self.record(PublishCall::Push(tag.to_string()));
        Ok(())
    }

    fn tag_alias(&self, source_tag: &str, alias: &str) -> Result<()> {
        self.record(PublishCall::Alias {
            source: source_tag.to_string(),
            alias: alias.to_string(),
        });
        Ok(())
    }
}
