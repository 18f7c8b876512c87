//! UID sets, as written after `UID FETCH`, `UID STORE`, `UID COPY` and the
//! `UID` search key.

use std::fmt;
use std::ops::RangeInclusive;

use super::Uid;

/// A set of UIDs in IMAP sequence-set syntax (`7`, `1:10`, `500:*`, `1,3:5`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidSet {
    /// One UID.
    Single(Uid),
    /// Inclusive range.
    Range(Uid, Uid),
    /// From a UID up to the highest one in the mailbox (`n:*`).
    RangeFrom(Uid),
    /// Several sets joined with commas.
    Union(Vec<Self>),
}

impl UidSet {
    /// One UID.
    #[must_use]
    pub const fn single(uid: Uid) -> Self {
        Self::Single(uid)
    }

    /// Inclusive range; a range of one UID collapses to [`Single`](Self::Single).
    #[must_use]
    pub fn range(start: Uid, end: Uid) -> Self {
        if start == end {
            Self::Single(start)
        } else {
            Self::Range(start, end)
        }
    }
}

impl From<Uid> for UidSet {
    fn from(uid: Uid) -> Self {
        Self::Single(uid)
    }
}

impl From<RangeInclusive<Uid>> for UidSet {
    fn from(range: RangeInclusive<Uid>) -> Self {
        let (start, end) = range.into_inner();
        Self::range(start, end)
    }
}

impl FromIterator<Uid> for UidSet {
    fn from_iter<I: IntoIterator<Item = Uid>>(iter: I) -> Self {
        let mut sets: Vec<Self> = iter.into_iter().map(Self::Single).collect();
        if sets.len() == 1 {
            sets.remove(0)
        } else {
            Self::Union(sets)
        }
    }
}

impl fmt::Display for UidSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(uid) => write!(f, "{uid}"),
            Self::Range(start, end) => write!(f, "{start}:{end}"),
            Self::RangeFrom(start) => write!(f, "{start}:*"),
            Self::Union(sets) => {
                for (i, set) in sets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{set}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn uid(n: u32) -> Uid {
        Uid::new(n).unwrap()
    }

    #[test]
    fn display_forms() {
        assert_eq!(UidSet::single(uid(7)).to_string(), "7");
        assert_eq!(UidSet::range(uid(1), uid(10)).to_string(), "1:10");
        assert_eq!(UidSet::RangeFrom(uid(500)).to_string(), "500:*");
        assert_eq!(UidSet::from(uid(3)..=uid(5)).to_string(), "3:5");
    }

    #[test]
    fn one_element_range_is_single() {
        assert_eq!(UidSet::range(uid(4), uid(4)), UidSet::Single(uid(4)));
    }

    #[test]
    fn union_from_uids() {
        let set: UidSet = [uid(1), uid(4), uid(9)].into_iter().collect();
        assert_eq!(set.to_string(), "1,4,9");

        let one: UidSet = std::iter::once(uid(2)).collect();
        assert_eq!(one, UidSet::Single(uid(2)));
    }
}
