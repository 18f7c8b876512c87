//! Message flags.

use std::fmt;

/// A flag as carried by `FLAGS` and `STORE`.
///
/// `\Flagged` is what Gmail shows as a star.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Seen`
    Seen,
    /// `\Answered`
    Answered,
    /// `\Flagged`
    Flagged,
    /// `\Deleted`
    Deleted,
    /// `\Draft`
    Draft,
    /// `\Recent`
    Recent,
    /// Any other keyword, kept as sent.
    Keyword(String),
}

const SYSTEM_FLAGS: [(&str, Flag); 6] = [
    ("\\Seen", Flag::Seen),
    ("\\Answered", Flag::Answered),
    ("\\Flagged", Flag::Flagged),
    ("\\Deleted", Flag::Deleted),
    ("\\Draft", Flag::Draft),
    ("\\Recent", Flag::Recent),
];

impl Flag {
    /// Parses a flag; system flags match case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        SYSTEM_FLAGS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map_or_else(|| Self::Keyword(s.to_string()), |(_, flag)| flag.clone())
    }

    /// The wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Keyword(keyword) => keyword,
            system => SYSTEM_FLAGS
                .iter()
                .find(|(_, flag)| flag == system)
                .map_or("", |(name, _)| *name),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags of one message, without duplicates, in the order first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(Vec<Flag>);

impl Flags {
    /// No flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `flags`, dropping repeats.
    #[must_use]
    pub fn from_vec(flags: Vec<Flag>) -> Self {
        flags.into_iter().collect()
    }

    /// Adds a flag. Returns `false` if it was already present.
    pub fn insert(&mut self, flag: Flag) -> bool {
        let added = !self.0.contains(&flag);
        if added {
            self.0.push(flag);
        }
        added
    }

    /// Removes a flag. Returns `false` if it was not present.
    pub fn remove(&mut self, flag: &Flag) -> bool {
        self.0
            .iter()
            .position(|f| f == flag)
            .map(|i| self.0.remove(i))
            .is_some()
    }

    /// Returns true if the flag is present.
    #[must_use]
    pub fn contains(&self, flag: &Flag) -> bool {
        self.0.contains(flag)
    }

    /// `\Seen` is present.
    #[must_use]
    pub fn is_seen(&self) -> bool {
        self.contains(&Flag::Seen)
    }

    /// `\Flagged` is present.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.contains(&Flag::Flagged)
    }

    /// `\Deleted` is present.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.contains(&Flag::Deleted)
    }

    /// `\Draft` is present.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.contains(&Flag::Draft)
    }

    /// Flags in order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.0.iter()
    }

    /// Number of flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Self::new();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

/// `(\Seen \Flagged)`
impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, flag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(flag.as_str())?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_flags_ignore_case() {
        assert_eq!(Flag::parse("\\Seen"), Flag::Seen);
        assert_eq!(Flag::parse("\\FLAGGED"), Flag::Flagged);
        assert_eq!(Flag::parse("\\deleted"), Flag::Deleted);
        assert_eq!(Flag::Draft.as_str(), "\\Draft");
    }

    #[test]
    fn keywords_are_kept_verbatim() {
        let flag = Flag::parse("$Forwarded");
        assert_eq!(flag, Flag::Keyword("$Forwarded".to_string()));
        assert_eq!(flag.to_string(), "$Forwarded");
    }

    #[test]
    fn insert_twice_keeps_one() {
        let mut flags = Flags::new();
        assert!(flags.insert(Flag::Flagged));
        assert!(!flags.insert(Flag::Flagged));
        assert_eq!(flags.len(), 1);
        assert!(flags.is_flagged());
    }

    #[test]
    fn remove_reports_presence() {
        let mut flags = Flags::from_vec(vec![Flag::Seen, Flag::Seen, Flag::Draft]);
        assert_eq!(flags.len(), 2);
        assert!(flags.remove(&Flag::Seen));
        assert!(!flags.remove(&Flag::Seen));
        assert!(!flags.is_seen());
        assert!(flags.is_draft());
    }

    #[test]
    fn display_in_insertion_order() {
        let flags: Flags = [Flag::Draft, Flag::Seen, Flag::Deleted].into_iter().collect();
        assert_eq!(flags.to_string(), "(\\Draft \\Seen \\Deleted)");
        assert!(flags.is_deleted());
    }
}
