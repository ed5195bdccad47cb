use core::cmp::Ordering;
use std::fmt;

/// Drawing layer of a record.
///
/// Each level maps to one compositor surface. Higher levels appear on top of
/// lower ones; within a level, later insertions draw on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ZLevel(pub u32);

impl ZLevel {
    #[inline]
    pub const fn new(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Ord for ZLevel {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ZLevel {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u32> for ZLevel {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl fmt::Display for ZLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "z{}", self.0)
    }
}
