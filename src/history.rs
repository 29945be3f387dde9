//! Bounded, observable log of completed calculations.
//!
//! The log keeps the most recent [`HISTORY_CAPACITY`] records in insertion
//! order, evicting the oldest first. Every append notifies all live
//! subscribers; a subscriber that went away never affects the append or its
//! peers.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Maximum number of records retained.
pub const HISTORY_CAPACITY: usize = 20;

/// Rendered when the log holds no records.
pub const NO_HISTORY: &str = "no calculation history";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BasicOperator {
    fn symbol(self) -> char {
        match self {
            BasicOperator::Add => '+',
            BasicOperator::Subtract => '-',
            BasicOperator::Multiply => '*',
            BasicOperator::Divide => '/',
        }
    }
}

/// A single completed calculation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CalculationRecord {
    BasicOp {
        op: BasicOperator,
        a: f64,
        b: f64,
        result: f64,
    },
    Power {
        base: f64,
        exponent: f64,
        result: f64,
    },
    SquareRoot {
        value: f64,
        result: f64,
    },
    Evaluated {
        expr: String,
        result: f64,
    },
}

impl fmt::Display for CalculationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationRecord::BasicOp { op, a, b, result } => {
                write!(f, "{a} {} {b} = {result}", op.symbol())
            }
            CalculationRecord::Power {
                base,
                exponent,
                result,
            } => write!(f, "{base}^{exponent} = {result}"),
            CalculationRecord::SquareRoot { value, result } => {
                write!(f, "√{value} = {result}")
            }
            CalculationRecord::Evaluated { expr, result } => {
                write!(f, "expr: {expr} = {result}")
            }
        }
    }
}

/// A live interest in log mutations, returned by [`HistoryLog::subscribe`].
///
/// Notifications arrive in append order. Dropping the handle without
/// [`HistoryLog::unsubscribe`] simply leaves a dead sender behind, which is
/// skipped on the next notify.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: Receiver<CalculationRecord>,
}

impl Subscription {
    /// The next pending notification, if one has been delivered.
    pub fn try_recv(&self) -> Option<CalculationRecord> {
        self.rx.try_recv().ok()
    }

    /// Waits up to `timeout` for a notification. `None` means no update
    /// occurred within the window, not that the log failed.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<CalculationRecord> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[derive(Default)]
struct Inner {
    records: VecDeque<CalculationRecord>,
    subscribers: Vec<(u64, Sender<CalculationRecord>)>,
    next_id: u64,
}

/// Append-only calculation history with FIFO eviction and change
/// notification. Shared freely across threads; every operation takes the one
/// internal lock for a bounded critical section.
#[derive(Default)]
pub struct HistoryLog {
    inner: Mutex<Inner>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, evicting the oldest one at capacity, then notifies
    /// every live subscriber. Never fails.
    pub fn append(&self, record: CalculationRecord) {
        let mut inner = self.inner.lock();

        if inner.records.len() == HISTORY_CAPACITY {
            inner.records.pop_front();
        }
        inner.records.push_back(record.clone());

        tracing::debug!(len = inner.records.len(), %record, "appended calculation");

        // sends are unbounded and never re-enter the log; pruning dead
        // receivers here keeps delivery to the rest unaffected
        inner
            .subscribers
            .retain(|(_, tx)| tx.send(record.clone()).is_ok());
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<CalculationRecord> {
        self.inner.lock().records.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, tx));
        Subscription { id, rx }
    }

    /// Benign if the handle was already removed.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .lock()
            .subscribers
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Caller-facing textual summary, one numbered line per record.
    pub fn render(&self) -> String {
        let inner = self.inner.lock();

        if inner.records.is_empty() {
            return NO_HISTORY.to_string();
        }

        let mut out = String::from("calculation history:");
        for (i, record) in inner.records.iter().enumerate() {
            out.push_str(&format!("\n{}. {record}", i + 1));
        }
        out
    }
}
