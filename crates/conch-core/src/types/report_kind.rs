//! Report kinds and the fixed-capacity set used to request several at once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A category of conformance output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// Policy and implementation conformance summary.
    MediaConch,
    /// Metadata listing.
    MediaInfo,
    /// Structural trace of the container.
    MediaTrace,
}

impl ReportKind {
    /// Number of report kinds; the capacity of [`ReportKinds`].
    pub const COUNT: usize = 3;

    /// All kinds in bit order.
    pub const ALL: [ReportKind; Self::COUNT] =
        [ReportKind::MediaConch, ReportKind::MediaInfo, ReportKind::MediaTrace];

    /// Bit position inside a [`ReportKinds`] set. Also the stored tag.
    pub const fn index(self) -> usize {
        match self {
            ReportKind::MediaConch => 0,
            ReportKind::MediaInfo => 1,
            ReportKind::MediaTrace => 2,
        }
    }

    /// Inverse of [`ReportKind::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportKind::MediaConch => "MediaConch",
            ReportKind::MediaInfo => "MediaInfo",
            ReportKind::MediaTrace => "MediaTrace",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bit set of [`ReportKind`]s. Capacity is `ReportKind::COUNT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ReportKinds(u8);

const _: () = assert!(ReportKind::COUNT <= u8::BITS as usize);

impl ReportKinds {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn single(kind: ReportKind) -> Self {
        Self(1 << kind.index())
    }

    pub fn insert(&mut self, kind: ReportKind) {
        self.0 |= 1 << kind.index();
    }

    pub fn remove(&mut self, kind: ReportKind) {
        self.0 &= !(1 << kind.index());
    }

    pub const fn contains(self, kind: ReportKind) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    /// Number of kinds in the set.
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ReportKind> {
        ReportKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<ReportKind> for ReportKinds {
    fn from_iter<I: IntoIterator<Item = ReportKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<ReportKind> for ReportKinds {
    fn from(kind: ReportKind) -> Self {
        Self::single(kind)
    }
}

impl fmt::Debug for ReportKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_counts_distinct_kinds() {
        let mut kinds = ReportKinds::single(ReportKind::MediaConch);
        kinds.insert(ReportKind::MediaConch);
        assert_eq!(kinds.count(), 1);
        kinds.insert(ReportKind::MediaTrace);
        assert_eq!(kinds.count(), 2);
        assert!(kinds.contains(ReportKind::MediaTrace));
        assert!(!kinds.contains(ReportKind::MediaInfo));
        kinds.remove(ReportKind::MediaConch);
        assert_eq!(kinds.iter().collect::<Vec<_>>(), vec![ReportKind::MediaTrace]);
    }

    #[test]
    fn index_roundtrips() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(ReportKind::from_index(ReportKind::COUNT), None);
    }
}
