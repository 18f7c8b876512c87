//! Gmail labels (`X-GM-LABELS`).

/// Ordered set of Gmail labels attached to a message.
///
/// Labels compare by exact string, so `"Work"` and `"work"` are distinct.
/// System labels keep their backslash form (`\Important`, `\Inbox`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    labels: Vec<String>,
}

impl Labels {
    /// Creates an empty label set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label. Returns `false` if it was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    /// Removes a label. Returns `false` if it was not present.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label);
        self.labels.len() != before
    }

    /// Returns true if the label is present.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Returns an iterator over the labels.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Labels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels = Self::new();
        for label in iter {
            labels.insert(label);
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let labels: Labels = ["Work"].into_iter().collect();
        assert!(labels.contains("Work"));
        assert!(!labels.contains("work"));
    }

    #[test]
    fn insert_and_remove() {
        let mut labels = Labels::new();
        assert!(labels.insert("\\Important"));
        assert!(!labels.insert("\\Important"));
        assert!(labels.insert("receipts"));
        assert_eq!(labels.iter().collect::<Vec<_>>(), ["\\Important", "receipts"]);

        assert!(labels.remove("\\Important"));
        assert!(!labels.remove("\\Important"));
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn collect_drops_duplicates() {
        let labels: Labels = vec!["a".to_string(), "b".to_string(), "a".to_string()]
            .into_iter()
            .collect();
        assert_eq!(labels.len(), 2);
        assert!(!labels.is_empty());
    }
}
