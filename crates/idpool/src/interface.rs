use std::sync::Arc;

use crate::{
    cache::LeaseTicket,
    id::Id,
};

/// Operation set of a pool which can be shared between
/// threads or tasks.
///
/// Every method is a short, non-blocking critical section.
/// Absence and no-op conditions are reported through return
/// values, never through errors.
pub trait SharedIdPool: Send + Sync {
    /// Lease an available ID.
    ///
    /// Returns [`None`] if the pool is exhausted. The caller
    /// must later either [`use_id`](Self::use_id) or
    /// [`release`](Self::release) it.
    fn lease_available_id(&self) -> Option<Id>;

    /// Lease an available ID and get the ticket of this exact
    /// lease.
    fn lease_ticket(&self) -> Option<LeaseTicket>;

    /// Allocate an ID and commit it immediately under the
    /// `name`.
    fn allocate_id(&self, name: &str) -> Option<Id>;

    /// Return ID back to the pool.
    ///
    /// Acts on whatever lease the ID currently has, including
    /// one taken by another caller after the ID was removed and
    /// re-inserted. Holders of a lease should prefer
    /// [`release_ticket`](Self::release_ticket).
    fn release(&self, id: Id) -> bool;

    /// Return ID back to the pool if the ticket's lease is still
    /// the current one.
    fn release_ticket(&self, ticket: LeaseTicket) -> bool;

    /// Mark leased ID as consumed.
    fn use_id(&self, id: Id) -> bool;

    /// Mark ID as consumed if the ticket's lease is still the
    /// current one.
    fn use_ticket(&self, ticket: LeaseTicket) -> bool;

    /// Re-admit ID reported free by the external authority.
    fn insert(&self, id: Id) -> bool;

    /// Withdraw ID claimed by the external authority.
    fn remove(&self, id: Id) -> bool;
}

impl<P: SharedIdPool + ?Sized> SharedIdPool for Arc<P> {
    fn lease_available_id(&self) -> Option<Id> {
        (**self).lease_available_id()
    }

    fn lease_ticket(&self) -> Option<LeaseTicket> {
        (**self).lease_ticket()
    }

    fn allocate_id(&self, name: &str) -> Option<Id> {
        (**self).allocate_id(name)
    }

    fn release_ticket(&self, ticket: LeaseTicket) -> bool {
        (**self).release_ticket(ticket)
    }

    fn use_ticket(&self, ticket: LeaseTicket) -> bool {
        (**self).use_ticket(ticket)
    }

    fn release(&self, id: Id) -> bool {
        (**self).release(id)
    }

    fn use_id(&self, id: Id) -> bool {
        (**self).use_id(id)
    }

    fn insert(&self, id: Id) -> bool {
        (**self).insert(id)
    }

    fn remove(&self, id: Id) -> bool {
        (**self).remove(id)
    }
}
