//! Mock speech backend
//!
//! A deterministic, synchronously-driven capability for tests and dry
//! runs. Each `start()` replays the next scripted turn's events into the
//! channel immediately, so tests never wait on real recognition.

use super::{SpeechCapability, SpeechEvent, SpeechEvents};
use crate::error::SessionError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};

/// Shared call counters, cloneable out of the capability for assertions
#[derive(Debug, Clone, Default)]
pub struct MockCounters {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    aborts: Arc<AtomicUsize>,
}

impl MockCounters {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn aborts(&self) -> usize {
        self.aborts.load(Ordering::SeqCst)
    }
}

/// Scripted speech capability
pub struct MockCapability {
    turns: VecDeque<Vec<SpeechEvent>>,
    tx: UnboundedSender<SpeechEvent>,
    counters: MockCounters,
    stop_fails: bool,
}

impl MockCapability {
    /// Capability with no scripted turns; every start yields an
    /// immediate empty End
    pub fn new(tx: UnboundedSender<SpeechEvent>) -> Self {
        Self {
            turns: VecDeque::new(),
            tx,
            counters: MockCounters::default(),
            stop_fails: false,
        }
    }

    /// Build a scripted capability together with its event stream and
    /// counters
    pub fn scripted(turns: Vec<Vec<SpeechEvent>>) -> (Self, SpeechEvents, MockCounters) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut capability = Self::new(tx);
        capability.turns = turns.into();
        let counters = capability.counters.clone();
        (capability, rx, counters)
    }

    /// Make subsequent `stop()` calls fail synchronously
    pub fn make_stop_fail(&mut self) {
        self.stop_fails = true;
    }
}

#[async_trait]
impl SpeechCapability for MockCapability {
    async fn start(&mut self) -> Result<(), SessionError> {
        self.counters.starts.fetch_add(1, Ordering::SeqCst);

        match self.turns.pop_front() {
            Some(events) => {
                for event in events {
                    let _ = self.tx.send(event);
                }
            }
            None => {
                let _ = self.tx.send(SpeechEvent::End);
            }
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), SessionError> {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);

        if self.stop_fails {
            return Err(SessionError::Capture("scripted stop failure".to_string()));
        }
        let _ = self.tx.send(SpeechEvent::End);
        Ok(())
    }

    fn abort(&mut self) {
        self.counters.aborts.fetch_add(1, Ordering::SeqCst);
        self.turns.clear();
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_turns_replay_in_order() {
        let (mut capability, mut rx, counters) = MockCapability::scripted(vec![
            vec![
                SpeechEvent::FinalResult("spent $3 on tea".to_string()),
                SpeechEvent::End,
            ],
            vec![SpeechEvent::Error("no-speech".to_string()), SpeechEvent::End],
        ]);

        capability.start().await.unwrap();
        assert_eq!(
            rx.recv().await,
            Some(SpeechEvent::FinalResult("spent $3 on tea".to_string()))
        );
        assert_eq!(rx.recv().await, Some(SpeechEvent::End));

        capability.start().await.unwrap();
        assert_eq!(
            rx.recv().await,
            Some(SpeechEvent::Error("no-speech".to_string()))
        );
        assert_eq!(rx.recv().await, Some(SpeechEvent::End));

        assert_eq!(counters.starts(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_ends_immediately() {
        let (mut capability, mut rx, _) = MockCapability::scripted(vec![]);
        capability.start().await.unwrap();
        assert_eq!(rx.recv().await, Some(SpeechEvent::End));
    }

    #[tokio::test]
    async fn test_failing_stop() {
        let (mut capability, _rx, counters) = MockCapability::scripted(vec![]);
        capability.make_stop_fail();
        assert!(capability.stop().await.is_err());
        assert_eq!(counters.stops(), 1);
    }
}
