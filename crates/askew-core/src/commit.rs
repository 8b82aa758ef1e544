#![forbid(unsafe_code)]

//! Outbound commit channel.
//!
//! A control reports every change of its resolved value through a
//! [`CommitPort`]. The port forwards a full snapshot to the host's
//! [`CommitSink`] and bumps a version counter the host can poll instead of
//! subscribing.
//!
//! [`CommitRecorder`] is a shared, clonable log of committed snapshots. It
//! shares storage the way a reactive cell does (`Rc<RefCell<..>>`), so one
//! handle can be moved into a control while the other stays with the caller.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receives committed snapshots.
pub trait CommitSink<V: ?Sized> {
    /// Called once per resolved-value change with the complete new value.
    fn commit(&mut self, value: &V);
}

impl<V: ?Sized, F: FnMut(&V)> CommitSink<V> for F {
    fn commit(&mut self, value: &V) {
        self(value);
    }
}

/// Version-counting forwarder to an optional sink.
pub struct CommitPort<V> {
    sink: Option<Box<dyn CommitSink<V>>>,
    version: u64,
}

impl<V> Default for CommitPort<V> {
    fn default() -> Self {
        Self {
            sink: None,
            version: 0,
        }
    }
}

impl<V> fmt::Debug for CommitPort<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitPort")
            .field("connected", &self.sink.is_some())
            .field("version", &self.version)
            .finish()
    }
}

impl<V> CommitPort<V> {
    /// Port with no sink attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `sink`, replacing any previous one.
    pub fn connect(&mut self, sink: impl CommitSink<V> + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Whether a sink is attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
    }

    /// Number of commits emitted so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Emit `value` to the sink.
    pub fn emit(&mut self, value: &V) {
        self.version += 1;
        if let Some(sink) = self.sink.as_mut() {
            sink.commit(value);
        }
    }
}

/// Shared log of committed snapshots.
pub struct CommitRecorder<V> {
    log: Rc<RefCell<Vec<V>>>,
}

impl<V> Clone for CommitRecorder<V> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

impl<V> Default for CommitRecorder<V> {
    fn default() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for CommitRecorder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitRecorder")
            .field("log", &self.log.borrow())
            .finish()
    }
}

impl<V: Clone + 'static> CommitRecorder<V> {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that appends into this recorder.
    #[must_use]
    pub fn sink(&self) -> impl FnMut(&V) + 'static {
        let log = Rc::clone(&self.log);
        move |value: &V| log.borrow_mut().push(value.clone())
    }

    /// Copy of every snapshot recorded so far.
    #[must_use]
    pub fn snapshots(&self) -> Vec<V> {
        self.log.borrow().clone()
    }

    /// Most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<V> {
        self.log.borrow().last().cloned()
    }

    /// Number of snapshots recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Forget recorded snapshots.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_counts_versions_without_sink() {
        let mut port: CommitPort<u32> = CommitPort::new();
        assert!(!port.is_connected());
        port.emit(&1);
        port.emit(&2);
        assert_eq!(port.version(), 2);
    }

    #[test]
    fn recorder_shares_storage_across_clones() {
        let recorder = CommitRecorder::new();
        let mut port = CommitPort::new();
        port.connect(recorder.clone().sink());
        port.emit(&"a".to_string());
        port.emit(&"b".to_string());
        assert_eq!(recorder.snapshots(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(recorder.last().as_deref(), Some("b"));
        recorder.clear();
        assert!(recorder.is_empty());
    }
}
