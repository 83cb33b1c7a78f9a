use std::collections::{
    BTreeSet,
    HashMap,
};

use crate::id::{
    Id,
    IdRange,
};

/// Observable state of a single identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdState {
    /// Free to be leased or allocated.
    Available,

    /// Handed out provisionally, waiting for `use_id` or
    /// `release`.
    Leased,

    /// Neither available nor leased. Stays so until
    /// explicitly inserted.
    Unavailable,
}

/// Handle of one particular lease of an ID.
///
/// An ID can be leased, withdrawn by the external authority,
/// re-inserted and leased again. Tickets of the earlier lease
/// no longer match after that, so operations through them do
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseTicket {
    id: Id,
    generation: u64,
}

impl LeaseTicket {
    pub const fn id(&self) -> Id {
        self.id
    }
}

/// Availability store: partitions identifiers into
/// available, leased and unavailable ones.
///
/// Not synchronized, callers must serialize access
/// themselves (see [`crate::pool::IdPool`]).
///
/// The available set is kept as a lazily consumed tail of the
/// range `[cursor, end]` minus `holes`, plus the `returned` ids
/// which came back into circulation. Memory therefore grows with
/// the number of touched ids, not with the size of the range.
/// Works like [`Vec`]-backed flat pools: returned ids are reused
/// first, then the cursor moves forward.
#[derive(Debug, Clone)]
pub struct IdCache {
    returned: BTreeSet<Id>,
    holes: BTreeSet<Id>,
    /// Leased ids with the generation of their current lease.
    leased: HashMap<Id, u64>,
    generation: u64,

    cursor: u64,
    end: u64,
}

impl IdCache {
    /// Creates store with every id of the `range` available.
    pub fn new(range: IdRange) -> Self {
        Self {
            returned: BTreeSet::new(),
            holes: BTreeSet::new(),
            leased: HashMap::new(),
            generation: 0,

            cursor: range.start().get(),
            end: range.end().get(),
        }
    }

    /// Takes an available id without leasing it. Returns
    /// [`None`] if nothing is available.
    pub fn allocate(&mut self) -> Option<Id> {
        if let Some(id) = self.returned.pop_first() {
            return Some(id);
        }

        while self.cursor <= self.end {
            // Cursor stays within `start..=end`, always a valid id
            let id = Id::new(self.cursor)?;
            self.cursor += 1;

            // Holes behind the cursor are plain unavailable ids
            if !self.holes.remove(&id) {
                return Some(id);
            }
        }

        None
    }

    /// Takes an available id and marks it as leased.
    pub fn lease_available(&mut self) -> Option<Id> {
        self.lease_ticket().map(|ticket| ticket.id)
    }

    /// Same as [`IdCache::lease_available`], but returns the
    /// ticket of this exact lease.
    pub fn lease_ticket(&mut self) -> Option<LeaseTicket> {
        let id = self.allocate()?;
        self.generation += 1;
        self.leased.insert(id, self.generation);

        Some(LeaseTicket {
            id,
            generation: self.generation,
        })
    }

    /// Makes a leased id available again. Returns `false` and
    /// does nothing if `id` is not leased.
    pub fn release(&mut self, id: Id) -> bool {
        if self.leased.remove(&id).is_none() {
            return false;
        }

        self.insert(id);
        true
    }

    /// Releases the id only if the `ticket`'s lease is still
    /// the current one.
    pub fn release_ticket(&mut self, ticket: LeaseTicket) -> bool {
        self.holds(ticket) && self.release(ticket.id)
    }

    /// Makes a leased id unavailable. Returns `false` and does
    /// nothing if `id` is not leased.
    pub fn use_id(&mut self, id: Id) -> bool {
        self.leased.remove(&id).is_some()
    }

    /// Uses the id only if the `ticket`'s lease is still the
    /// current one.
    pub fn use_ticket(&mut self, ticket: LeaseTicket) -> bool {
        self.holds(ticket) && self.use_id(ticket.id)
    }

    /// Makes an unavailable id available. Returns `false` if it
    /// is already available or leased.
    pub fn insert(&mut self, id: Id) -> bool {
        if self.leased.contains_key(&id) {
            return false;
        }

        if self.in_tail(id) {
            self.holes.remove(&id)
        } else {
            self.returned.insert(id)
        }
    }

    /// Makes `id` unavailable whatever its state was. Returns
    /// `true` only if it was available.
    pub fn remove(&mut self, id: Id) -> bool {
        self.leased.remove(&id);

        if self.returned.remove(&id) {
            true
        } else if self.in_tail(id) {
            self.holes.insert(id)
        } else {
            false
        }
    }

    pub fn state(&self, id: Id) -> IdState {
        if self.leased.contains_key(&id) {
            IdState::Leased
        } else if self.is_available(id) {
            IdState::Available
        } else {
            IdState::Unavailable
        }
    }

    pub fn is_available(&self, id: Id) -> bool {
        self.returned.contains(&id)
            || (self.in_tail(id) && !self.holes.contains(&id))
    }

    pub fn is_leased(&self, id: Id) -> bool {
        self.leased.contains_key(&id)
    }

    /// Number of ids that can be handed out right now.
    pub fn available_count(&self) -> u64 {
        let tail = if self.cursor <= self.end {
            self.end - self.cursor + 1
        } else {
            0
        };

        tail - self.holes.len() as u64 + self.returned.len() as u64
    }

    pub fn leased_count(&self) -> usize {
        self.leased.len()
    }

    fn holds(&self, ticket: LeaseTicket) -> bool {
        self.leased.get(&ticket.id) == Some(&ticket.generation)
    }

    fn in_tail(&self, id: Id) -> bool {
        let raw = id.get();
        raw >= self.cursor && raw <= self.end
    }
}
