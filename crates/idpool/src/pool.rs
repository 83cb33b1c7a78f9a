use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{
    cache::{
        IdCache,
        IdState,
        LeaseTicket,
    },
    error::RangeError,
    id::{
        Id,
        IdRange,
    },
    interface::SharedIdPool,
    lease::Lease,
};

#[derive(Debug)]
struct State {
    cache: IdCache,
    members: HashMap<String, Id>,
}

/// Pool of IDs managed concurrently by local usage and
/// external events.
///
/// Local usage is a two stage process: an ID is leased first,
/// then either [`use_id`](Self::use_id)d after the action
/// which needed it succeeded, or [`release`](Self::release)d
/// otherwise. The intermediate leased state prevents an
/// external [`insert`](Self::insert) from resurrecting an ID
/// that is still being set up locally.
///
/// IDs obtained through [`allocate_id`](Self::allocate_id) skip
/// the leased state. They are tracked by name instead and
/// `use_id` has no effect on them.
#[derive(Debug)]
pub struct IdPool {
    range: IdRange,
    state: Mutex<State>,
}

impl IdPool {
    /// Creates pool over `[start, end]`.
    pub fn new(start: Id, end: Id) -> Result<Self, RangeError> {
        IdRange::new(start, end).map(Self::with_range)
    }

    /// Creates pool over `[start, end]` given as raw integers.
    pub fn from_raw(start: u64, end: u64) -> Result<Self, RangeError> {
        IdRange::from_raw(start, end).map(Self::with_range)
    }

    pub fn with_range(range: IdRange) -> Self {
        tracing::debug!("Creating ID pool over {range}");
        Self {
            range,
            state: Mutex::new(State {
                cache: IdCache::new(range),
                members: HashMap::new(),
            }),
        }
    }

    /// Leases an available ID. Returns [`None`] immediately
    /// when the pool is exhausted.
    pub fn lease_available_id(&self) -> Option<Id> {
        let id = self.state.lock().cache.lease_available();
        match id {
            Some(id) => tracing::trace!("Leased ID {id}"),
            None => tracing::debug!("ID pool {} is exhausted", self.range),
        }

        id
    }

    /// Same as [`IdPool::lease_available_id`], but returns the
    /// ticket of this exact lease.
    pub fn lease_ticket(&self) -> Option<LeaseTicket> {
        let ticket = self.state.lock().cache.lease_ticket();
        match ticket {
            Some(ticket) => tracing::trace!("Leased ID {}", ticket.id()),
            None => tracing::debug!("ID pool {} is exhausted", self.range),
        }

        ticket
    }

    /// Same as [`IdPool::lease_available_id`], but wraps the ID
    /// into a guard which releases it unless committed.
    pub fn lease(&self) -> Option<Lease<'_, Self>> {
        Lease::acquire(self)
    }

    /// Allocates an ID and records it under the `name`,
    /// overwriting previous record of that name. No
    /// [`IdPool::use_id`] call is needed afterwards.
    pub fn allocate_id(&self, name: &str) -> Option<Id> {
        let mut state = self.state.lock();
        let Some(id) = state.cache.allocate() else {
            tracing::debug!("ID pool {} is exhausted", self.range);
            return None;
        };

        tracing::trace!("Allocated ID {id} for {name:?}");
        state.members.insert(name.to_owned(), id);
        Some(id)
    }

    /// Returns ID back to the pool.
    ///
    /// IDs allocated by name are looked up by value and
    /// re-inserted. Otherwise only leased IDs are affected.
    /// Returns `true` if the ID became available as a result of
    /// this call.
    pub fn release(&self, id: Id) -> bool {
        let mut state = self.state.lock();
        let State { cache, members } = &mut *state;

        let name = members
            .iter()
            .find_map(|(name, &member)| (member == id).then(|| name.clone()));
        if let Some(name) = name {
            members.remove(&name);
            tracing::trace!("Released ID {id} allocated for {name:?}");
            return cache.insert(id);
        }

        let released = cache.release(id);
        if released {
            tracing::trace!("Released leased ID {id}");
        }

        released
    }

    /// Releases the ID if the `ticket`'s lease is still the
    /// current one. Stale tickets do nothing and return `false`.
    pub fn release_ticket(&self, ticket: LeaseTicket) -> bool {
        self.state.lock().cache.release_ticket(ticket)
    }

    /// Uses the ID if the `ticket`'s lease is still the current
    /// one. Stale tickets do nothing and return `false`.
    pub fn use_ticket(&self, ticket: LeaseTicket) -> bool {
        self.state.lock().cache.use_ticket(ticket)
    }

    /// Makes a leased ID unavailable. Returns `false` if it was
    /// not leased.
    pub fn use_id(&self, id: Id) -> bool {
        self.state.lock().cache.use_id(id)
    }

    /// Makes an unavailable ID available again. Returns `false`
    /// if it is already available or leased.
    pub fn insert(&self, id: Id) -> bool {
        self.state.lock().cache.insert(id)
    }

    /// Makes an ID unavailable. Returns `true` if it was
    /// available before the call.
    pub fn remove(&self, id: Id) -> bool {
        self.state.lock().cache.remove(id)
    }

    pub fn is_valid(&self) -> bool {
        self.range.is_valid()
    }

    pub const fn range(&self) -> IdRange {
        self.range
    }

    pub fn state(&self, id: Id) -> IdState {
        self.state.lock().cache.state(id)
    }

    /// ID recorded under the `name` by [`IdPool::allocate_id`].
    pub fn member(&self, name: &str) -> Option<Id> {
        self.state.lock().members.get(name).copied()
    }

    pub fn members_len(&self) -> usize {
        self.state.lock().members.len()
    }

    pub fn available_count(&self) -> u64 {
        self.state.lock().cache.available_count()
    }

    pub fn leased_count(&self) -> usize {
        self.state.lock().cache.leased_count()
    }
}

impl SharedIdPool for IdPool {
    fn lease_available_id(&self) -> Option<Id> {
        IdPool::lease_available_id(self)
    }

    fn lease_ticket(&self) -> Option<LeaseTicket> {
        IdPool::lease_ticket(self)
    }

    fn allocate_id(&self, name: &str) -> Option<Id> {
        IdPool::allocate_id(self, name)
    }

    fn release_ticket(&self, ticket: LeaseTicket) -> bool {
        IdPool::release_ticket(self, ticket)
    }

    fn use_ticket(&self, ticket: LeaseTicket) -> bool {
        IdPool::use_ticket(self, ticket)
    }

    fn release(&self, id: Id) -> bool {
        IdPool::release(self, id)
    }

    fn use_id(&self, id: Id) -> bool {
        IdPool::use_id(self, id)
    }

    fn insert(&self, id: Id) -> bool {
        IdPool::insert(self, id)
    }

    fn remove(&self, id: Id) -> bool {
        IdPool::remove(self, id)
    }
}
