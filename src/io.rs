//! The capabilities a [`Processor`](crate::process::Processor) reads its input from and writes
//! its output to.
//!
//! Both traits take `&self` so that one capability can be shared between a processor and
//! whoever is feeding or draining it; implementations use interior mutability.

use log::warn;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

pub trait Input {
    /// The next input value, or `None` if there isn't one yet.
    fn get(&self) -> Option<i64>;
}

pub trait Output {
    /// Offer a value. Returns `false` if it was refused and must be offered again later.
    fn put(&self, value: i64) -> bool;
}

impl<I: Input + ?Sized> Input for &I {
    fn get(&self) -> Option<i64> {
        (**self).get()
    }
}

impl<O: Output + ?Sized> Output for &O {
    fn put(&self, value: i64) -> bool {
        (**self).put(value)
    }
}

impl<I: Input + ?Sized> Input for Rc<I> {
    fn get(&self) -> Option<i64> {
        (**self).get()
    }
}

impl<O: Output + ?Sized> Output for Rc<O> {
    fn put(&self, value: i64) -> bool {
        (**self).put(value)
    }
}

/// The type of a capability that isn't there. It has no values, so a processor that uses it
/// can only ever hold `None` for that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnected {}

impl Input for Disconnected {
    fn get(&self) -> Option<i64> {
        match *self {}
    }
}

impl Output for Disconnected {
    fn put(&self, _value: i64) -> bool {
        match *self {}
    }
}

/// Supplies the same value every time it's asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant(pub i64);

impl Input for Constant {
    fn get(&self) -> Option<i64> {
        Some(self.0)
    }
}

/// Accepts everything, remembering only the most recent value.
#[derive(Debug, Default)]
pub struct LastValue {
    value: Cell<Option<i64>>,
}

impl LastValue {
    pub fn new() -> Self {
        LastValue::default()
    }

    pub fn get(&self) -> Option<i64> {
        self.value.get()
    }
}

impl Output for LastValue {
    fn put(&self, value: i64) -> bool {
        self.value.set(Some(value));
        true
    }
}

/// An unbounded FIFO. Never refuses a value, blocks readers while empty.
#[derive(Debug, Default)]
pub struct Queue {
    buffer: RefCell<VecDeque<i64>>,
}

impl Queue {
    pub fn new() -> Self {
        Queue::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.buffer.into_inner().into()
    }
}

impl From<Vec<i64>> for Queue {
    fn from(values: Vec<i64>) -> Self {
        Queue {
            buffer: RefCell::new(values.into()),
        }
    }
}

impl Input for Queue {
    fn get(&self) -> Option<i64> {
        self.buffer.borrow_mut().pop_front()
    }
}

impl Output for Queue {
    fn put(&self, value: i64) -> bool {
        self.buffer.borrow_mut().push_back(value);
        true
    }
}

/// Adapts a closure into an [`Input`] or [`Output`].
pub struct FromFn<F>(pub F);

impl<F: Fn() -> Option<i64>> Input for FromFn<F> {
    fn get(&self) -> Option<i64> {
        (self.0)()
    }
}

impl<F: Fn(i64) -> bool> Output for FromFn<F> {
    fn put(&self, value: i64) -> bool {
        (self.0)(value)
    }
}

/// Reads one integer per line, e.g. from a terminal.
///
/// Lines that aren't integers are skipped with a warning. End of input or a read error counts
/// as "no input": the processor blocks rather than fails.
pub struct Prompt<R> {
    reader: RefCell<R>,
}

impl<R: BufRead> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Prompt {
            reader: RefCell::new(reader),
        }
    }
}

impl<R: BufRead> Input for Prompt<R> {
    fn get(&self) -> Option<i64> {
        let mut reader = self.reader.borrow_mut();
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => match line.trim().parse() {
                    Ok(value) => return Some(value),
                    Err(error) => warn!("Ignoring input {:?}: {}", line.trim(), error),
                },
                Err(error) => {
                    warn!("Failed to read input: {}", error);
                    return None;
                }
            }
        }
    }
}

/// Writes one value per line. Refuses the value if the write fails.
pub struct Print<W> {
    writer: RefCell<W>,
}

impl<W: Write> Print<W> {
    pub fn new(writer: W) -> Self {
        Print {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> Output for Print<W> {
    fn put(&self, value: i64) -> bool {
        match writeln!(self.writer.borrow_mut(), "{}", value) {
            Ok(()) => true,
            Err(error) => {
                warn!("Failed to write output {}: {}", value, error);
                false
            }
        }
    }
}
