//! Outbound message bus.
//!
//! The dispatcher only publishes through [`MessageBus`]; connecting to a
//! real broker is the application's concern.  Two in-process
//! implementations are provided:
//!
//! | Type           | Use                                               |
//! |----------------|---------------------------------------------------|
//! | `RecordingBus` | keeps every published message, for tests and logs |
//! | `ChannelBus`   | forwards `(topic, message)` over an mpsc channel  |

use std::sync::mpsc::Sender;

use crate::{BusError, BusResult, Outbound};

/// Publish side of a topic-addressed bus.
pub trait MessageBus {
    fn publish(&mut self, topic: &str, message: &Outbound) -> BusResult<()>;
}

/// In-memory bus that records everything published to it.
#[derive(Clone, Debug, Default)]
pub struct RecordingBus {
    pub published: Vec<(String, Outbound)>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published on `topic`, oldest first.
    pub fn on_topic<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Outbound> + 'a {
        self.published.iter().filter(move |(t, _)| t == topic).map(|(_, m)| m)
    }

    /// The most recent message on `topic`.
    pub fn last_on(&self, topic: &str) -> Option<&Outbound> {
        self.published.iter().rev().find(|(t, _)| t == topic).map(|(_, m)| m)
    }

    /// Take all recorded messages, leaving the log empty.
    pub fn drain(&mut self) -> Vec<(String, Outbound)> {
        std::mem::take(&mut self.published)
    }
}

impl MessageBus for RecordingBus {
    fn publish(&mut self, topic: &str, message: &Outbound) -> BusResult<()> {
        self.published.push((topic.to_owned(), message.clone()));
        Ok(())
    }
}

/// Bus backed by an mpsc channel.
#[derive(Clone, Debug)]
pub struct ChannelBus {
    tx: Sender<(String, Outbound)>,
}

impl ChannelBus {
    pub fn new(tx: Sender<(String, Outbound)>) -> Self {
        Self { tx }
    }
}

impl MessageBus for ChannelBus {
    fn publish(&mut self, topic: &str, message: &Outbound) -> BusResult<()> {
        self.tx
            .send((topic.to_owned(), message.clone()))
            .map_err(|_| BusError::Disconnected)
    }
}
