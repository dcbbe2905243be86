//! Bookkeeping for one listing's in-flight fetches.
//!
//! A fetch is tagged with a [`Ticket`] when it starts. Only the ticket of the
//! most recent key may resolve; anything older is dropped on arrival, which is
//! all the cancellation the dashboard needs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

#[derive(Debug)]
pub struct QueryTracker<K, V> {
    key: Option<K>,
    generation: u64,
    in_flight: bool,
    stale: bool,
    data: Option<V>,
}

impl<K, V> Default for QueryTracker<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            in_flight: false,
            stale: false,
            data: None,
        }
    }
}

impl<K: PartialEq + std::fmt::Debug, V> QueryTracker<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching `key`.
    ///
    /// Returns `None` when the fetch would be redundant: the same key is
    /// already in flight, or its data is loaded and not invalidated.
    pub fn begin(&mut self, key: K) -> Option<Ticket> {
        if self.key.as_ref() == Some(&key) {
            if self.in_flight {
                return None;
            }
            if self.data.is_some() && !self.stale {
                return None;
            }
        } else {
            self.data = None;
        }

        tracing::debug!("Fetching {:?}", key);
        self.key = Some(key);
        self.generation += 1;
        self.in_flight = true;
        self.stale = false;

        Some(Ticket {
            generation: self.generation,
        })
    }

    /// Apply a finished fetch. Returns `false` if a newer fetch superseded it.
    pub fn resolve(&mut self, ticket: Ticket, value: V) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Dropping superseded result (generation {} < {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.in_flight = false;
        self.data = Some(value);
        true
    }

    /// Mark the loaded data as outdated, e.g. after a mutation
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Key the tracker would refetch after an invalidation
    pub fn refetch_key(&self) -> Option<&K> {
        match (&self.key, self.stale && !self.in_flight) {
            (Some(key), true) => Some(key),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight && self.data.is_none()
    }

    pub fn data(&self) -> Option<&V> {
        self.data.as_ref()
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }
}
