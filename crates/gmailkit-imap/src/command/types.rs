//! Fetch items and store actions.

use crate::types::Flag;

/// The data items of one `UID FETCH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItems(pub Vec<FetchAttribute>);

impl FetchItems {
    /// Everything a message needs: the whole body, fetched with `PEEK` so
    /// `\Seen` is left alone, plus flags and the Gmail thread, id and labels.
    #[must_use]
    pub fn message() -> Self {
        Self(vec![
            FetchAttribute::Body {
                section: None,
                peek: true,
            },
            FetchAttribute::Flags,
            FetchAttribute::GmailThreadId,
            FetchAttribute::GmailMessageId,
            FetchAttribute::GmailLabels,
        ])
    }
}

/// One fetch data item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// `FLAGS`
    Flags,
    /// `UID`
    Uid,
    /// `BODY[section]`, or `BODY.PEEK[section]` when `peek` is set.
    Body {
        /// `None` for the whole message.
        section: Option<String>,
        /// Leave `\Seen` untouched.
        peek: bool,
    },
    /// `X-GM-THRID`
    GmailThreadId,
    /// `X-GM-MSGID`
    GmailMessageId,
    /// `X-GM-LABELS`
    GmailLabels,
}

/// What a `UID STORE` changes.
///
/// Flags go through `FLAGS`, labels through Gmail's `X-GM-LABELS`. Only
/// additions and removals exist; nothing here replaces a whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// `+FLAGS`
    AddFlags(Vec<Flag>),
    /// `-FLAGS`
    RemoveFlags(Vec<Flag>),
    /// `+X-GM-LABELS`
    AddLabels(Vec<String>),
    /// `-X-GM-LABELS`
    RemoveLabels(Vec<String>),
}

impl StoreAction {
    /// `+FLAGS` with a single flag.
    #[must_use]
    pub fn add_flag(flag: Flag) -> Self {
        Self::AddFlags(vec![flag])
    }

    /// `-FLAGS` with a single flag.
    #[must_use]
    pub fn remove_flag(flag: Flag) -> Self {
        Self::RemoveFlags(vec![flag])
    }

    /// `+X-GM-LABELS` with a single label.
    #[must_use]
    pub fn add_label(label: impl Into<String>) -> Self {
        Self::AddLabels(vec![label.into()])
    }

    /// `-X-GM-LABELS` with a single label.
    #[must_use]
    pub fn remove_label(label: impl Into<String>) -> Self {
        Self::RemoveLabels(vec![label.into()])
    }
}
