//! Identity tokens that drive state transitions.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// An opaque, identity-comparable event token.
///
/// Events carry no payload. Two events are equal only when they are the
/// same instance: cloning an event keeps its identity, while creating a new
/// event with the same name yields a distinct token.
///
/// # Example
///
/// ```rust
/// use gentle::core::Event;
///
/// let timeout = Event::new("timeout");
/// let same = timeout.clone();
/// let other = Event::new("timeout");
///
/// assert_eq!(timeout, same);
/// assert_ne!(timeout, other);
/// ```
#[derive(Clone)]
pub struct Event {
    id: Uuid,
    name: Arc<str>,
}

impl Event {
    /// Create a new, unique event with a diagnostic name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// The diagnostic name, used only for logging.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.name)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn clone_keeps_identity() {
        let event = Event::new("input activity");
        assert_eq!(event, event.clone());
    }

    #[test]
    fn same_name_is_not_same_event() {
        assert_ne!(Event::new("timeout"), Event::new("timeout"));
    }

    #[test]
    fn events_work_as_map_keys() {
        let a = Event::new("a");
        let b = Event::new("a");

        let mut map = HashMap::new();
        map.insert(a.clone(), 1);
        map.insert(b.clone(), 2);

        assert_eq!(map.len(), 2);
        assert_eq!(map[&a], 1);
        assert_eq!(map[&b], 2);
    }

    #[test]
    fn name_is_diagnostic_only() {
        let event = Event::new("break started");
        assert_eq!(event.name(), "break started");
        assert_eq!(event.to_string(), "break started");
        assert_eq!(format!("{:?}", event), "Event(break started)");
    }
}
