use std::{
    fmt,
    num::NonZeroU64,
    str::FromStr,
};

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

use crate::error::{
    IdParseError,
    RangeError,
};

/// Identifier managed by the pool.
///
/// Valid identifiers lie in `1..=Id::MAX`. Zero is reserved
/// for "no identifier" and is never representable by this
/// type: absence is expressed through [`Option<Id>`], which
/// has the same size as `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(NonZeroU64);

impl Id {
    /// Largest valid identifier, positive half of `i64`.
    pub const MAX: u64 = i64::MAX as u64;

    /// Creates identifier from the raw integer. Returns
    /// [`None`] if `raw` is not a valid identifier.
    pub const fn new(raw: u64) -> Option<Self> {
        if !is_valid(raw) {
            return None;
        }

        match NonZeroU64::new(raw) {
            Some(nz) => Some(Self(nz)),
            None => None,
        }
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Validity predicate for raw identifiers: `1 <= raw <= Id::MAX`.
pub const fn is_valid(raw: u64) -> bool {
    raw > 0 && raw <= Id::MAX
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Id {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s.parse().map_err(|_| IdParseError::NotANumber)?;
        Self::new(raw).ok_or(IdParseError::OutOfRange)
    }
}

impl TryFrom<u64> for Id {
    type Error = IdParseError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(IdParseError::OutOfRange)
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        id.get()
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.get())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        Self::new(raw).ok_or_else(|| {
            serde::de::Error::custom(format_args!(
                "identifier {raw} is out of range 1..={}",
                Id::MAX
            ))
        })
    }
}

/// Inclusive range of identifiers managed by a single pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRange {
    start: Id,
    end: Id,
}

impl IdRange {
    /// Creates range `[start, end]`. Fails unless `start < end`.
    pub fn new(start: Id, end: Id) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError::Empty);
        }

        Ok(Self { start, end })
    }

    /// Same as [`IdRange::new`], but validates raw integers
    /// first.
    pub fn from_raw(start: u64, end: u64) -> Result<Self, RangeError> {
        let start = Id::new(start).ok_or(RangeError::InvalidStart)?;
        let end = Id::new(end).ok_or(RangeError::InvalidEnd)?;
        Self::new(start, end)
    }

    pub const fn start(&self) -> Id {
        self.start
    }

    pub const fn end(&self) -> Id {
        self.end
    }

    /// Number of identifiers in the range.
    pub const fn len(&self) -> u64 {
        self.end.get() - self.start.get() + 1
    }

    pub const fn contains(&self, id: Id) -> bool {
        id.get() >= self.start.get() && id.get() <= self.end.get()
    }

    /// Checks the range invariants. Always holds for ranges
    /// built through the constructors.
    pub const fn is_valid(&self) -> bool {
        is_valid(self.start.get())
            && is_valid(self.end.get())
            && self.start.get() < self.end.get()
    }
}

impl<'de> Deserialize<'de> for IdRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            start: Id,
            end: Id,
        }

        let Raw { start, end } = Raw::deserialize(deserializer)?;
        Self::new(start, end).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
