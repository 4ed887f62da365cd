use super::io::{Input, Output};
use log::debug;
use std::cell::Cell;

/// A single-slot buffer connecting one producer to one consumer.
///
/// Writing to a full channel and reading from an empty one both fail without side effects; it
/// is up to the caller to try again later.
#[derive(Debug)]
pub struct IoChannel {
    name: String,
    slot: Cell<Option<i64>>,
}

impl IoChannel {
    pub fn new<T: ToString>(name: T) -> Self {
        IoChannel {
            name: name.to_string(),
            slot: Cell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write(&self, value: i64) -> bool {
        if self.slot.get().is_some() {
            debug!("{}: write of {} blocked", self.name, value);
            return false;
        }
        debug!("{}: write {}", self.name, value);
        self.slot.set(Some(value));
        true
    }

    pub fn read(&self) -> Option<i64> {
        let value = self.slot.take();
        match value {
            Some(value) => debug!("{}: read {}", self.name, value),
            None => debug!("{}: read blocked", self.name),
        }
        value
    }

    pub fn reset(&self) {
        self.slot.set(None);
    }

    pub fn is_occupied(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn peek(&self) -> Option<i64> {
        self.slot.get()
    }
}

impl Input for IoChannel {
    fn get(&self) -> Option<i64> {
        self.read()
    }
}

impl Output for IoChannel {
    fn put(&self, value: i64) -> bool {
        self.write(value)
    }
}
