use crate::{
    cache::LeaseTicket,
    id::Id,
    interface::SharedIdPool,
};

/// Leased ID which is returned back to the pool on drop unless
/// committed.
///
/// The guard only ever acts on its own lease. If the external
/// authority withdrew the ID meanwhile, committing reports it and
/// dropping does nothing, even when the ID was re-inserted and
/// leased by someone else.
#[must_use = "dropping the lease immediately releases the ID"]
pub struct Lease<'a, P: SharedIdPool + ?Sized> {
    pool: &'a P,
    ticket: LeaseTicket,
    armed: bool,
}

impl<'a, P: SharedIdPool + ?Sized> Lease<'a, P> {
    /// Leases an ID from the `pool`.
    pub fn acquire(pool: &'a P) -> Option<Self> {
        pool.lease_ticket().map(|ticket| Self {
            pool,
            ticket,
            armed: true,
        })
    }

    pub const fn id(&self) -> Id {
        self.ticket.id()
    }

    /// Marks the ID as used, it will not be returned to the
    /// pool.
    ///
    /// Returns [`None`] if the lease was lost in the meantime,
    /// e.g. the ID was removed by the external authority. The
    /// ID must not be used then.
    pub fn commit(mut self) -> Option<Id> {
        self.armed = false;
        self.pool
            .use_ticket(self.ticket)
            .then_some(self.ticket.id())
    }

    /// Returns the ID back to the pool right away. Returns
    /// `false` if the lease was lost in the meantime.
    pub fn release(mut self) -> bool {
        self.armed = false;
        self.pool.release_ticket(self.ticket)
    }
}

impl<P: SharedIdPool + ?Sized> Drop for Lease<'_, P> {
    fn drop(&mut self) {
        if self.armed {
            self.pool.release_ticket(self.ticket);
        }
    }
}
