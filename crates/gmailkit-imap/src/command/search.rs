//! Structured search queries and their compilation to `UID SEARCH` tokens.
//!
//! A [`SearchQuery`] carries one optional field per supported filter.
//! [`SearchQuery::compile`] turns it into the token list sent after
//! `UID SEARCH`, always starting with `ALL` and emitting the remaining
//! clauses in a fixed order regardless of the order the builder was called in.
//!
//! ```
//! use gmailkit_imap::SearchQuery;
//!
//! let tokens = SearchQuery::new().unread().from("a@b.com").label("work").compile();
//! assert_eq!(tokens, ["ALL", "UNSEEN", "FROM", "a@b.com", "X-GM-LABELS", "work"]);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::types::UidSet;

/// IMAP SEARCH date format (`02-Jan-2024`).
const SEARCH_DATE_FORMAT: &str = "%d-%b-%Y";

/// Something that can be narrowed to a calendar date for SEARCH.
///
/// Date-times are truncated to their date in their own time zone.
pub trait SearchDate {
    /// Returns the calendar date.
    fn search_date(&self) -> NaiveDate;
}

impl SearchDate for NaiveDate {
    fn search_date(&self) -> NaiveDate {
        *self
    }
}

impl SearchDate for NaiveDateTime {
    fn search_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> SearchDate for DateTime<Tz> {
    fn search_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Structured SEARCH query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    read: bool,
    unread: bool,
    starred: bool,
    unstarred: bool,
    deleted: bool,
    undeleted: bool,
    draft: bool,
    undraft: bool,
    header: Option<(String, String)>,
    from: Option<String>,
    not_from: Option<String>,
    to: Option<String>,
    cc: Option<String>,
    subject: Option<String>,
    body: Option<String>,
    label: Option<String>,
    raw: Option<String>,
    before: Option<NaiveDate>,
    after: Option<NaiveDate>,
    on: Option<NaiveDate>,
    uid: Option<UidSet>,
}

impl SearchQuery {
    /// Creates an empty query that matches every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only messages with `\Seen`.
    #[must_use]
    pub const fn read(mut self) -> Self {
        self.read = true;
        self
    }

    /// Only messages without `\Seen`.
    #[must_use]
    pub const fn unread(mut self) -> Self {
        self.unread = true;
        self
    }

    /// Only messages with `\Flagged`.
    #[must_use]
    pub const fn starred(mut self) -> Self {
        self.starred = true;
        self
    }

    /// Only messages without `\Flagged`.
    #[must_use]
    pub const fn unstarred(mut self) -> Self {
        self.unstarred = true;
        self
    }

    /// Only messages with `\Deleted`.
    #[must_use]
    pub const fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Only messages without `\Deleted`.
    #[must_use]
    pub const fn undeleted(mut self) -> Self {
        self.undeleted = true;
        self
    }

    /// Only messages with `\Draft`.
    #[must_use]
    pub const fn draft(mut self) -> Self {
        self.draft = true;
        self
    }

    /// Only messages without `\Draft`.
    #[must_use]
    pub const fn undraft(mut self) -> Self {
        self.undraft = true;
        self
    }

    /// Header `name` contains `value`.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header = Some((name.into(), value.into()));
        self
    }

    /// Sender contains `value`.
    #[must_use]
    pub fn from(mut self, value: impl Into<String>) -> Self {
        self.from = Some(value.into());
        self
    }

    /// Alias of [`Self::from`]; both set the same clause.
    #[must_use]
    pub fn sender(self, value: impl Into<String>) -> Self {
        self.from(value)
    }

    /// Sender does not contain `value`.
    #[must_use]
    pub fn not_from(mut self, value: impl Into<String>) -> Self {
        self.not_from = Some(value.into());
        self
    }

    /// `To` contains `value`.
    #[must_use]
    pub fn to(mut self, value: impl Into<String>) -> Self {
        self.to = Some(value.into());
        self
    }

    /// `Cc` contains `value`.
    #[must_use]
    pub fn cc(mut self, value: impl Into<String>) -> Self {
        self.cc = Some(value.into());
        self
    }

    /// Subject contains `value`.
    #[must_use]
    pub fn subject(mut self, value: impl Into<String>) -> Self {
        self.subject = Some(value.into());
        self
    }

    /// Body contains `value`.
    #[must_use]
    pub fn body(mut self, value: impl Into<String>) -> Self {
        self.body = Some(value.into());
        self
    }

    /// Message carries the Gmail label.
    #[must_use]
    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }

    /// Gmail web search syntax (`X-GM-RAW`), e.g. `has:attachment`.
    #[must_use]
    pub fn query(mut self, value: impl Into<String>) -> Self {
        self.raw = Some(value.into());
        self
    }

    /// Internal date earlier than `date`.
    #[must_use]
    pub fn before(mut self, date: impl SearchDate) -> Self {
        self.before = Some(date.search_date());
        self
    }

    /// Internal date on or after `date`.
    #[must_use]
    pub fn after(mut self, date: impl SearchDate) -> Self {
        self.after = Some(date.search_date());
        self
    }

    /// Internal date equal to `date`.
    #[must_use]
    pub fn on(mut self, date: impl SearchDate) -> Self {
        self.on = Some(date.search_date());
        self
    }

    /// Restricts to a UID or UID set.
    #[must_use]
    pub fn uid(mut self, uids: impl Into<UidSet>) -> Self {
        self.uid = Some(uids.into());
        self
    }

    /// Returns true if no filter has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Compiles the query into `UID SEARCH` tokens.
    #[must_use]
    pub fn compile(&self) -> Vec<String> {
        let mut tokens = vec!["ALL".to_string()];

        let switches = [
            (self.read, "SEEN"),
            (self.unread, "UNSEEN"),
            (self.starred, "FLAGGED"),
            (self.unstarred, "UNFLAGGED"),
            (self.deleted, "DELETED"),
            (self.undeleted, "UNDELETED"),
            (self.draft, "DRAFT"),
            (self.undraft, "UNDRAFT"),
        ];
        tokens.extend(
            switches
                .iter()
                .filter(|(on, _)| *on)
                .map(|(_, key)| (*key).to_string()),
        );

        if let Some((name, value)) = &self.header {
            tokens.extend(["HEADER".to_string(), name.clone(), value.clone()]);
        }
        if let Some(value) = &self.from {
            tokens.extend(["FROM".to_string(), value.clone()]);
        }
        if let Some(value) = &self.not_from {
            tokens.extend(["NOT".to_string(), "FROM".to_string(), value.clone()]);
        }

        let texts = [
            ("TO", &self.to),
            ("CC", &self.cc),
            ("SUBJECT", &self.subject),
            ("BODY", &self.body),
            ("X-GM-LABELS", &self.label),
            ("X-GM-RAW", &self.raw),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                tokens.extend([key.to_string(), value.clone()]);
            }
        }

        let dates = [
            ("BEFORE", self.before),
            ("SINCE", self.after),
            ("ON", self.on),
        ];
        for (key, date) in dates {
            if let Some(date) = date {
                tokens.extend([
                    key.to_string(),
                    date.format(SEARCH_DATE_FORMAT).to_string(),
                ]);
            }
        }

        if let Some(uids) = &self.uid {
            tokens.extend(["UID".to_string(), uids.to_string()]);
        }

        tokens
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Uid;
    use chrono::{FixedOffset, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_query_matches_all() {
        assert_eq!(SearchQuery::new().compile(), ["ALL"]);
        assert!(SearchQuery::new().is_empty());
    }

    #[test]
    fn order_is_fixed_regardless_of_builder_order() {
        let a = SearchQuery::new().label("work").from("a@b.com").unread();
        let b = SearchQuery::new().unread().from("a@b.com").label("work");
        assert_eq!(a.compile(), b.compile());
        assert_eq!(
            a.compile(),
            ["ALL", "UNSEEN", "FROM", "a@b.com", "X-GM-LABELS", "work"]
        );
    }

    #[test]
    fn sender_and_from_are_one_clause() {
        let q = SearchQuery::new().sender("x@y.com").from("z@y.com");
        assert_eq!(q.compile(), ["ALL", "FROM", "z@y.com"]);
    }

    #[test]
    fn not_from_is_three_tokens() {
        let q = SearchQuery::new().not_from("spam@x.com");
        assert_eq!(q.compile(), ["ALL", "NOT", "FROM", "spam@x.com"]);
    }

    #[test]
    fn flag_switches() {
        let q = SearchQuery::new()
            .undraft()
            .read()
            .starred()
            .unstarred()
            .deleted()
            .undeleted()
            .draft();
        assert_eq!(
            q.compile(),
            [
                "ALL",
                "SEEN",
                "FLAGGED",
                "UNFLAGGED",
                "DELETED",
                "UNDELETED",
                "DRAFT",
                "UNDRAFT"
            ]
        );
    }

    #[test]
    fn text_clauses() {
        let q = SearchQuery::new()
            .query("has:attachment")
            .body("invoice")
            .subject("Q3 report")
            .cc("boss@corp.com")
            .to("me@corp.com")
            .header("X-Priority", "1");
        assert_eq!(
            q.compile(),
            [
                "ALL",
                "HEADER",
                "X-Priority",
                "1",
                "TO",
                "me@corp.com",
                "CC",
                "boss@corp.com",
                "SUBJECT",
                "Q3 report",
                "BODY",
                "invoice",
                "X-GM-RAW",
                "has:attachment"
            ]
        );
    }

    #[test]
    fn dates_use_imap_format() {
        let q = SearchQuery::new()
            .on(date(2024, 3, 9))
            .after(date(2023, 12, 25))
            .before(date(2024, 1, 2));
        assert_eq!(
            q.compile(),
            [
                "ALL",
                "BEFORE",
                "02-Jan-2024",
                "SINCE",
                "25-Dec-2023",
                "ON",
                "09-Mar-2024"
            ]
        );
    }

    #[test]
    fn date_times_are_truncated() {
        let naive = date(2024, 5, 17).and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert_eq!(
            SearchQuery::new().before(naive).compile(),
            ["ALL", "BEFORE", "17-May-2024"]
        );

        let zoned = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .from_local_datetime(&naive)
            .unwrap();
        assert_eq!(
            SearchQuery::new().before(zoned).compile(),
            ["ALL", "BEFORE", "17-May-2024"]
        );
    }

    #[test]
    fn uid_clause_comes_last() {
        let first = Uid::new(100).unwrap();
        let q = SearchQuery::new().uid(UidSet::RangeFrom(first)).subject("hi");
        assert_eq!(q.compile(), ["ALL", "SUBJECT", "hi", "UID", "100:*"]);

        let single = SearchQuery::new().uid(Uid::new(7).unwrap());
        assert_eq!(single.compile(), ["ALL", "UID", "7"]);
    }

    #[test]
    fn values_are_not_validated() {
        let q = SearchQuery::new().subject("");
        assert_eq!(q.compile(), ["ALL", "SUBJECT", ""]);
    }
}
