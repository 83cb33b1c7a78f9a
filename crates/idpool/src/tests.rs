use std::{
    collections::HashSet,
    thread,
};

use rstest::rstest;

use crate::prelude::{
    Id,
    IdCache,
    IdPool,
    IdRange,
    IdState,
    RangeError,
};

fn id(raw: u64) -> Id {
    Id::new(raw).unwrap()
}

fn pool(start: u64, end: u64) -> IdPool {
    IdPool::from_raw(start, end).unwrap()
}

fn cache(start: u64, end: u64) -> IdCache {
    IdCache::new(IdRange::from_raw(start, end).unwrap())
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(42, true)]
#[case(Id::MAX, true)]
#[case(Id::MAX + 1, false)]
#[case(u64::MAX, false)]
fn test_id_validity(#[case] raw: u64, #[case] valid: bool) {
    assert_eq!(crate::id::is_valid(raw), valid);
    assert_eq!(Id::new(raw).is_some(), valid);
}

#[test]
fn test_id_display_and_parse() {
    assert_eq!(id(1234).to_string(), "1234");
    assert_eq!("1234".parse::<Id>().unwrap(), id(1234));
    assert!("0".parse::<Id>().is_err());
    assert!("-1".parse::<Id>().is_err());
}

#[rstest]
#[case(1, 1, RangeError::Empty)]
#[case(5, 2, RangeError::Empty)]
#[case(0, 10, RangeError::InvalidStart)]
#[case(1, Id::MAX + 1, RangeError::InvalidEnd)]
fn test_invalid_range_rejected(
    #[case] start: u64,
    #[case] end: u64,
    #[case] expected: RangeError,
) {
    assert_eq!(IdPool::from_raw(start, end).unwrap_err(), expected);
}

#[test]
fn test_range_bounds() {
    let range = IdRange::from_raw(3, 7).unwrap();
    assert!(range.is_valid());
    assert_eq!(range.len(), 5);
    assert!(range.contains(id(3)));
    assert!(range.contains(id(7)));
    assert!(!range.contains(id(8)));

    let pool = IdPool::with_range(range);
    assert!(pool.is_valid());
    assert_eq!(pool.available_count(), 5);
}

#[test]
fn test_huge_range_is_cheap() {
    let pool = pool(1, Id::MAX);
    assert_eq!(pool.available_count(), Id::MAX);

    let first = pool.lease_available_id().unwrap();
    assert_eq!(first, id(1));
    assert!(!pool.remove(first));
    assert!(pool.remove(id(Id::MAX)));
    assert_eq!(pool.available_count(), Id::MAX - 2);
}

#[test]
fn test_lease_release_round_trip() {
    let pool = pool(1, 10);
    let leased = pool.lease_available_id().unwrap();
    assert_eq!(pool.state(leased), IdState::Leased);

    assert!(pool.release(leased));
    assert_eq!(pool.state(leased), IdState::Available);
    assert_eq!(pool.leased_count(), 0);
}

#[test]
fn test_lease_use_is_permanent() {
    let pool = pool(1, 10);
    let leased = pool.lease_available_id().unwrap();

    assert!(pool.use_id(leased));
    assert_eq!(pool.state(leased), IdState::Unavailable);
    assert!(!pool.release(leased));
    assert!(!pool.use_id(leased));
    assert_eq!(pool.state(leased), IdState::Unavailable);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(17)]
fn test_exhaustion(#[case] k: u64) {
    let pool = pool(1, k);
    let mut seen = HashSet::new();
    for _ in 0..k {
        let leased = pool.lease_available_id().unwrap();
        assert!(seen.insert(leased), "{leased} issued twice");
    }

    assert_eq!(pool.lease_available_id(), None);
    assert_eq!(pool.leased_count() as u64, k);
    assert_eq!(pool.available_count(), 0);
}

#[test]
fn test_released_id_is_reissued() {
    let pool = pool(1, 3);
    let x = pool.lease_available_id().unwrap();
    assert!(pool.lease_available_id().is_some());
    assert!(pool.lease_available_id().is_some());
    assert_eq!(pool.lease_available_id(), None);

    assert!(pool.release(x));
    assert_eq!(pool.lease_available_id(), Some(x));
}

#[test]
fn test_insert_transitions() {
    let pool = pool(1, 5);

    // Available
    assert!(!pool.insert(id(1)));
    assert_eq!(pool.state(id(1)), IdState::Available);

    // Leased
    let leased = pool.lease_available_id().unwrap();
    assert!(!pool.insert(leased));
    assert_eq!(pool.state(leased), IdState::Leased);

    // Unavailable
    assert!(pool.use_id(leased));
    assert!(pool.insert(leased));
    assert_eq!(pool.state(leased), IdState::Available);
}

#[test]
fn test_remove_leased_id() {
    let pool = pool(1, 5);
    let leased = pool.lease_available_id().unwrap();

    assert!(!pool.remove(leased));
    assert_eq!(pool.state(leased), IdState::Unavailable);
    assert!(!pool.release(leased));
    assert!(!pool.use_id(leased));

    for _ in 0..4 {
        assert_ne!(pool.lease_available_id(), Some(leased));
    }
    assert_eq!(pool.lease_available_id(), None);

    assert!(pool.insert(leased));
    assert_eq!(pool.lease_available_id(), Some(leased));
}

#[test]
fn test_remove_untouched_ids_are_skipped() {
    let pool = pool(1, 4);
    assert!(pool.remove(id(2)));
    assert!(!pool.remove(id(2)));
    assert!(pool.remove(id(3)));

    assert_eq!(pool.available_count(), 2);
    assert_eq!(pool.lease_available_id(), Some(id(1)));
    assert_eq!(pool.lease_available_id(), Some(id(4)));
    assert_eq!(pool.lease_available_id(), None);

    assert!(pool.insert(id(3)));
    assert_eq!(pool.lease_available_id(), Some(id(3)));
}

#[test]
fn test_insert_outside_of_range() {
    let pool = pool(10, 11);
    assert!(pool.insert(id(3)));
    assert!(!pool.insert(id(3)));
    assert_eq!(pool.state(id(3)), IdState::Available);

    assert_eq!(pool.lease_available_id(), Some(id(3)));
}

#[test]
fn test_allocate_release_by_name() {
    let pool = pool(1, 5);
    let y = pool.allocate_id("a").unwrap();
    assert_eq!(pool.member("a"), Some(y));
    assert_eq!(pool.state(y), IdState::Unavailable);

    assert!(pool.release(y));
    assert_eq!(pool.member("a"), None);
    assert_eq!(pool.members_len(), 0);
    assert_eq!(pool.state(y), IdState::Available);
}

// Named allocations never enter the leased set, so they can't be
// `use_id`d, and release goes through the registry instead.
#[test]
fn test_named_allocation_bypasses_lease() {
    let pool = pool(1, 5);
    let y = pool.allocate_id("a").unwrap();

    assert!(!pool.use_id(y));
    assert_eq!(pool.member("a"), Some(y));
    assert_eq!(pool.leased_count(), 0);

    assert!(pool.release(y));
    assert!(!pool.release(y));
}

#[test]
fn test_named_release_after_external_insert() {
    let pool = pool(1, 5);
    let y = pool.allocate_id("a").unwrap();

    assert!(pool.insert(y));
    // Registry entry is dropped even though the ID is already back
    assert!(!pool.release(y));
    assert_eq!(pool.member("a"), None);
}

#[test]
fn test_allocate_overwrites_name() {
    let pool = pool(1, 5);
    let first = pool.allocate_id("a").unwrap();
    let second = pool.allocate_id("a").unwrap();

    assert_ne!(first, second);
    assert_eq!(pool.member("a"), Some(second));
    assert_eq!(pool.members_len(), 1);

    // Overwritten allocation is no longer known by name
    assert!(!pool.release(first));
    assert_eq!(pool.state(first), IdState::Unavailable);
}

#[test]
fn test_exhausted_allocate_keeps_registry() {
    let pool = pool(1, 2);
    let a = pool.allocate_id("a").unwrap();
    pool.allocate_id("b").unwrap();

    assert_eq!(pool.allocate_id("a"), None);
    assert_eq!(pool.member("a"), Some(a));
}

#[test]
fn test_lease_guard() {
    let pool = pool(1, 2);
    let dropped = {
        let lease = pool.lease().unwrap();
        assert_eq!(pool.state(lease.id()), IdState::Leased);
        lease.id()
    };
    assert_eq!(pool.state(dropped), IdState::Available);

    let committed = pool.lease().unwrap().commit().unwrap();
    assert_eq!(pool.state(committed), IdState::Unavailable);

    let lease = pool.lease().unwrap();
    let released = lease.id();
    assert!(lease.release());
    assert_eq!(pool.state(released), IdState::Available);
}

#[test]
fn test_lease_guard_after_external_remove() {
    let pool = pool(1, 2);
    let lease = pool.lease().unwrap();
    let leased = lease.id();

    assert!(!pool.remove(leased));
    drop(lease);
    assert_eq!(pool.state(leased), IdState::Unavailable);
}

#[test]
fn test_commit_after_external_remove() {
    let pool = pool(1, 2);
    let lease = pool.lease().unwrap();
    let leased = lease.id();

    assert!(!pool.remove(leased));
    assert_eq!(lease.commit(), None);
    assert_eq!(pool.state(leased), IdState::Unavailable);
}

#[test]
fn test_stale_lease_keeps_new_holder() {
    let pool = pool(1, 2);
    let stale = pool.lease().unwrap();
    let leased = stale.id();

    assert!(!pool.remove(leased));
    assert!(pool.insert(leased));
    let fresh = pool.lease_available_id();
    assert_eq!(fresh, Some(leased));

    drop(stale);
    assert_eq!(pool.state(leased), IdState::Leased);
    assert_ne!(pool.lease_available_id(), Some(leased));
    assert_eq!(pool.lease_available_id(), None);

    assert!(pool.release(leased));
}

#[test]
fn test_stale_lease_cannot_commit_or_release() {
    let pool = pool(1, 2);
    let stale = pool.lease().unwrap();
    let leased = stale.id();

    pool.remove(leased);
    pool.insert(leased);
    let fresh = pool.lease().unwrap();
    assert_eq!(fresh.id(), leased);

    assert!(!stale.release());
    assert_eq!(pool.state(leased), IdState::Leased);
    assert_eq!(fresh.commit(), Some(leased));
    assert_eq!(pool.state(leased), IdState::Unavailable);
}

#[test]
fn test_cache_tickets_are_per_lease() {
    let mut cache = cache(1, 2);
    let first = cache.lease_ticket().unwrap();

    assert!(cache.release_ticket(first));
    assert!(!cache.release_ticket(first));

    let second = cache.lease_ticket().unwrap();
    assert_eq!(second.id(), first.id());
    assert_ne!(second, first);
    assert!(!cache.use_ticket(first));
    assert!(cache.use_ticket(second));
    assert_eq!(cache.state(second.id()), IdState::Unavailable);
}

#[test]
fn test_concurrent_leases_are_distinct() {
    const N: u64 = 64;

    let pool = pool(1, N);
    let ids: Vec<Option<Id>> = thread::scope(|s| {
        let handles: Vec<_> = (0..N)
            .map(|_| s.spawn(|| pool.lease_available_id()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<Id> = ids.iter().map(|id| id.unwrap()).collect();
    assert_eq!(unique.len() as u64, N);
    assert_eq!(pool.lease_available_id(), None);
}

#[test]
fn test_concurrent_churn_never_double_issues() {
    let pool = pool(1, 8);
    let held = parking_lot::Mutex::new(HashSet::new());

    thread::scope(|s| {
        for worker in 0..8_u64 {
            let pool = &pool;
            let held = &held;
            s.spawn(move || {
                for round in 0..500_u64 {
                    let Some(leased) = pool.lease_available_id() else {
                        continue;
                    };
                    assert!(held.lock().insert(leased), "{leased} issued twice");

                    held.lock().remove(&leased);
                    if (worker + round) % 7 == 0 {
                        assert!(pool.use_id(leased));
                        assert!(pool.insert(leased));
                    } else {
                        assert!(pool.release(leased));
                    }
                }
            });
        }
    });

    assert_eq!(pool.leased_count(), 0);
    assert_eq!(pool.available_count(), 8);
}

/// Straightforward two-set model to compare against.
#[derive(Default)]
struct Model {
    available: HashSet<Id>,
    leased: HashSet<Id>,
}

impl Model {
    fn release(&mut self, id: Id) -> bool {
        if !self.leased.remove(&id) {
            return false;
        }
        self.insert(id);
        true
    }

    fn use_id(&mut self, id: Id) -> bool {
        self.leased.remove(&id)
    }

    fn insert(&mut self, id: Id) -> bool {
        !self.leased.contains(&id) && self.available.insert(id)
    }

    fn remove(&mut self, id: Id) -> bool {
        self.leased.remove(&id);
        self.available.remove(&id)
    }
}

#[test]
fn test_cache_matches_two_set_model() {
    const END: u64 = 24;

    let mut cache = cache(3, END);
    let mut model = Model {
        available: (3..=END).map(id).collect(),
        ..Default::default()
    };

    // Small LCG, keeps the sequence reproducible
    let mut seed = 0x2545_f491_u64;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        seed >> 33
    };

    for _ in 0..5_000 {
        let target = id(next() % (END + 4) + 1);
        match next() % 6 {
            0 | 1 => {
                let got = cache.lease_available();
                match got {
                    Some(got) => {
                        assert!(model.available.remove(&got));
                        model.leased.insert(got);
                    }
                    None => assert!(model.available.is_empty()),
                }
            }
            2 => assert_eq!(cache.release(target), model.release(target)),
            3 => assert_eq!(cache.use_id(target), model.use_id(target)),
            4 => assert_eq!(cache.insert(target), model.insert(target)),
            _ => assert_eq!(cache.remove(target), model.remove(target)),
        }

        assert!(model.available.is_disjoint(&model.leased));
        assert_eq!(cache.available_count(), model.available.len() as u64);
        assert_eq!(cache.leased_count(), model.leased.len());
        for raw in 1..=END + 4 {
            let checked = id(raw);
            assert!(!(cache.is_available(checked) && cache.is_leased(checked)));
            assert_eq!(cache.is_available(checked), model.available.contains(&checked));
            assert_eq!(cache.is_leased(checked), model.leased.contains(&checked));
        }
    }
}

#[test]
fn test_allocate_does_not_lease() {
    let mut cache = cache(1, 2);
    let allocated = cache.allocate().unwrap();

    assert_eq!(cache.state(allocated), IdState::Unavailable);
    assert!(!cache.release(allocated));
    assert!(cache.insert(allocated));
}
