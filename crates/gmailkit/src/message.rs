//! Messages and the mutations that keep them in step with the server.
//!
//! A [`Message`] is what the mailbox cache holds: flags and labels as last
//! acknowledged by the server plus, once fetched, the parsed content. A
//! [`MessageHandle`] pairs one cached message with the session so it can be
//! fetched and mutated.
//!
//! Gmail has no real delete. Deleting flags the message `\Deleted` and moves
//! it to the trash; moving copies it to the target and then deletes the
//! original. The two call each other until the trash is reached:
//!
//! ```text
//! delete   = STORE +FLAGS (\Deleted); unless source is trash: move_to(trash)
//! move_to  = UID COPY target;         unless target is trash: delete
//! ```

use std::collections::btree_map::OccupiedEntry;
use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Local};
use gmailkit_imap::{
    FetchItems, Flag, Flags, GmailMessageId, ImapSession, Labels, MailboxName, StoreAction,
    ThreadId, Uid, parse_fetch_metadata,
};
use gmailkit_mime::{Attachment, Headers, ParsedMessage};
use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::{ALL_MAIL, is_trash, target_in};
use crate::session::Session;

/// One message in one mailbox.
///
/// Starts as a stub holding only its UID; [`MessageHandle::fetch`] fills in
/// the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    uid: Uid,
    mailbox: MailboxName,
    pub(crate) flags: Flags,
    pub(crate) labels: Labels,
    thread_id: Option<ThreadId>,
    gmail_id: Option<GmailMessageId>,
    content: Option<ParsedMessage>,
}

impl Message {
    pub(crate) fn stub(uid: Uid, mailbox: MailboxName) -> Self {
        Self {
            uid,
            mailbox,
            flags: Flags::new(),
            labels: Labels::new(),
            thread_id: None,
            gmail_id: None,
            content: None,
        }
    }

    /// UID within the owning mailbox.
    #[must_use]
    pub const fn uid(&self) -> Uid {
        self.uid
    }

    /// The owning mailbox.
    #[must_use]
    pub const fn mailbox(&self) -> &MailboxName {
        &self.mailbox
    }

    /// Flags as last acknowledged by the server.
    #[must_use]
    pub const fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Labels as last acknowledged by the server.
    #[must_use]
    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    /// `X-GM-THRID`, once fetched.
    #[must_use]
    pub const fn thread_id(&self) -> Option<ThreadId> {
        self.thread_id
    }

    /// `X-GM-MSGID`, once fetched.
    #[must_use]
    pub const fn gmail_message_id(&self) -> Option<GmailMessageId> {
        self.gmail_id
    }

    /// Returns true once the content has been fetched.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        self.content.is_some()
    }

    /// The parsed content, once fetched.
    #[must_use]
    pub const fn content(&self) -> Option<&ParsedMessage> {
        self.content.as_ref()
    }

    /// Decoded subject.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.content.as_ref()?.subject.as_deref()
    }

    /// Plain text body.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.content.as_ref()?.body.as_deref()
    }

    /// HTML body.
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        self.content.as_ref()?.html.as_deref()
    }

    /// Top-level headers.
    #[must_use]
    pub fn headers(&self) -> Option<&Headers> {
        self.content.as_ref().map(|c| &c.headers)
    }

    /// `To` header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.content.as_ref()?.to.as_deref()
    }

    /// `From` header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.content.as_ref()?.from.as_deref()
    }

    /// `Cc` header.
    #[must_use]
    pub fn cc(&self) -> Option<&str> {
        self.content.as_ref()?.cc.as_deref()
    }

    /// `Delivered-To` header.
    #[must_use]
    pub fn delivered_to(&self) -> Option<&str> {
        self.content.as_ref()?.delivered_to.as_deref()
    }

    /// `Message-ID` header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.content.as_ref()?.message_id.as_deref()
    }

    /// Attachments, empty until fetched.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        self.content
            .as_ref()
            .map_or(&[], |c| c.attachments.as_slice())
    }

    /// `Date` header in local time.
    #[must_use]
    pub fn sent_at(&self) -> Option<DateTime<Local>> {
        self.content.as_ref()?.sent_at
    }

    /// Alias of [`sent_at`](Self::sent_at).
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Local>> {
        self.sent_at()
    }

    /// Send date as `m/d/yy`.
    #[must_use]
    pub fn sent_at_short(&self) -> Option<String> {
        self.sent_at().map(|d| d.format("%-m/%-d/%y").to_string())
    }

    /// Alias of [`sent_at_short`](Self::sent_at_short).
    #[must_use]
    pub fn date_short(&self) -> Option<String> {
        self.sent_at_short()
    }

    /// `\Seen` is set.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.flags.is_seen()
    }

    /// `\Flagged` is set.
    #[must_use]
    pub fn is_starred(&self) -> bool {
        self.flags.is_flagged()
    }

    /// `\Draft` is set.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.flags.is_draft()
    }

    /// `\Deleted` is set.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.flags.is_deleted()
    }

    /// The label is present, compared by exact string.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// `<Message 1/2/24 from Alice <a@example.com>: "Lunch">`
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_fetched() {
            return write!(f, "<Message UID {} in {}>", self.uid, self.mailbox);
        }
        write!(
            f,
            "<Message {} from {}: \"{}\">",
            self.sent_at_short().as_deref().unwrap_or("?"),
            self.from().unwrap_or(""),
            self.subject().unwrap_or("")
        )
    }
}

enum Step {
    Delete,
    MoveTo(MailboxName),
}

/// A cached message paired with the session, for fetching and mutating.
///
/// Obtained from [`Gmail::message_mut`](crate::Gmail::message_mut). Every
/// operation selects the owning mailbox first if another one is selected,
/// and local state changes only after the server acknowledges.
pub struct MessageHandle<'a, S> {
    session: &'a mut Session<S>,
    entry: OccupiedEntry<'a, Uid, Message>,
    known: Vec<MailboxName>,
    trash: MailboxName,
}

impl<'a, S: ImapSession> MessageHandle<'a, S> {
    /// `known` are the account's mailboxes, used to resolve move targets.
    pub(crate) fn new(
        session: &'a mut Session<S>,
        entry: OccupiedEntry<'a, Uid, Message>,
        known: Vec<MailboxName>,
        trash: MailboxName,
    ) -> Self {
        Self {
            session,
            entry,
            known,
            trash,
        }
    }

    /// The cached message.
    #[must_use]
    pub fn message(&self) -> &Message {
        self.entry.get()
    }

    async fn select_owner(&mut self) -> Result<()> {
        let mailbox = self.entry.get().mailbox.clone();
        self.session.select(&mailbox).await
    }

    /// Fetches body, flags, labels and Gmail ids, replacing what was cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails, the server returns nothing for
    /// this UID, or the response cannot be parsed.
    pub async fn fetch(&mut self) -> Result<&Message> {
        self.select_owner().await?;
        let uid = self.entry.get().uid;
        let responses = self.session.fetch(uid, &FetchItems::message()).await?;

        let raw = responses
            .iter()
            .find(|r| !r.body.is_empty())
            .or_else(|| responses.first())
            .ok_or(Error::MessageNotFound(uid))?;

        let meta = parse_fetch_metadata(&raw.header)?;
        let content = ParsedMessage::parse(&raw.body)?;
        debug!(%uid, attachments = content.attachments.len(), "fetched message");

        let message = self.entry.get_mut();
        message.flags = meta.flags;
        message.labels = meta.labels;
        message.thread_id = meta.thread_id;
        message.gmail_id = meta.message_id;
        message.content = Some(content);
        Ok(message)
    }

    async fn set_flag(&mut self, flag: Flag, on: bool) -> Result<()> {
        self.select_owner().await?;
        let uid = self.entry.get().uid;
        let action = if on {
            StoreAction::add_flag(flag.clone())
        } else {
            StoreAction::remove_flag(flag.clone())
        };
        self.session.store(uid, &action).await?;

        let flags = &mut self.entry.get_mut().flags;
        if on {
            flags.insert(flag);
        } else {
            flags.remove(&flag);
        }
        Ok(())
    }

    /// Sets `\Seen`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn read(&mut self) -> Result<()> {
        self.set_flag(Flag::Seen, true).await
    }

    /// Clears `\Seen`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn unread(&mut self) -> Result<()> {
        self.set_flag(Flag::Seen, false).await
    }

    /// Alias of [`read`](Self::read).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn mark_as_read(&mut self) -> Result<()> {
        self.read().await
    }

    /// Alias of [`unread`](Self::unread).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn mark_as_unread(&mut self) -> Result<()> {
        self.unread().await
    }

    /// Sets `\Flagged`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn star(&mut self) -> Result<()> {
        self.set_flag(Flag::Flagged, true).await
    }

    /// Clears `\Flagged`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn unstar(&mut self) -> Result<()> {
        self.set_flag(Flag::Flagged, false).await
    }

    /// Adds a Gmail label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn add_label(&mut self, label: &str) -> Result<()> {
        self.select_owner().await?;
        let uid = self.entry.get().uid;
        self.session
            .store(uid, &StoreAction::add_label(label))
            .await?;
        self.entry.get_mut().labels.insert(label);
        Ok(())
    }

    /// Removes a Gmail label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the STORE.
    pub async fn remove_label(&mut self, label: &str) -> Result<()> {
        self.select_owner().await?;
        let uid = self.entry.get().uid;
        self.session
            .store(uid, &StoreAction::remove_label(label))
            .await?;
        self.entry.get_mut().labels.remove(label);
        Ok(())
    }

    /// Flags the message `\Deleted` and, unless it already is in the trash,
    /// moves it there.
    ///
    /// The cache entry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] for the first refused STORE or
    /// COPY. Steps already acknowledged stay applied.
    pub async fn delete(&mut self) -> Result<()> {
        self.run(Step::Delete).await
    }

    /// Copies the message to `target` and, unless `target` is the trash,
    /// deletes the original.
    ///
    /// `target` may be given in human or wire form; known mailboxes are
    /// matched the way [`MailboxRegistry::resolve`](crate::MailboxRegistry::resolve)
    /// matches them.
    ///
    /// Consumes the handle and evicts the UID from the source mailbox cache.
    /// Returns the evicted message, which no longer reflects the server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] for the first refused STORE or
    /// COPY. The cache entry is kept in that case.
    pub async fn move_to(mut self, target: &str) -> Result<Message> {
        let target = target_in(self.known.iter(), target);
        self.run(Step::MoveTo(target)).await?;
        Ok(self.entry.remove())
    }

    /// Moves the message to `[Gmail]/All Mail`.
    ///
    /// # Errors
    ///
    /// See [`move_to`](Self::move_to).
    pub async fn archive(self) -> Result<Message> {
        self.move_to(ALL_MAIL).await
    }

    async fn run(&mut self, first: Step) -> Result<()> {
        let mut next = Some(first);
        while let Some(step) = next.take() {
            next = match step {
                Step::Delete => {
                    self.set_flag(Flag::Deleted, true).await?;
                    let source = self.entry.get().mailbox.as_str();
                    (!is_trash(source)).then(|| Step::MoveTo(self.trash.clone()))
                }
                Step::MoveTo(target) => {
                    self.select_owner().await?;
                    let uid = self.entry.get().uid;
                    self.session.copy(uid, &target).await?;
                    (!is_trash(target.wire())).then_some(Step::Delete)
                }
            };
        }
        Ok(())
    }
}

impl<S> Deref for MessageHandle<'_, S> {
    type Target = Message;

    fn deref(&self) -> &Message {
        self.entry.get()
    }
}

impl<S> fmt::Debug for MessageHandle<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageHandle")
            .field("message", self.entry.get())
            .field("trash", &self.trash)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fetched(raw: &[u8]) -> Message {
        let mut message = Message::stub(Uid::new(9).unwrap(), MailboxName::inbox());
        message.content = Some(ParsedMessage::parse(raw).unwrap());
        message
    }

    #[test]
    fn test_stub_is_empty() {
        let message = Message::stub(Uid::new(3).unwrap(), MailboxName::new("[Gmail]/All Mail"));
        assert!(!message.is_fetched());
        assert_eq!(message.subject(), None);
        assert!(message.attachments().is_empty());
        assert_eq!(message.to_string(), "<Message UID 3 in [Gmail]/All Mail>");
    }

    #[test]
    fn test_display_fetched() {
        let message = fetched(
            b"From: Alice <alice@example.com>\r\n\
Subject: Lunch\r\n\
Date: Tue, 02 Jan 2024 12:00:00 +0000\r\n\
\r\n\
hi",
        );
        let short = message.sent_at_short().unwrap();
        assert_eq!(
            message.to_string(),
            format!("<Message {short} from Alice <alice@example.com>: \"Lunch\">")
        );
        assert_eq!(message.date(), message.sent_at());
    }

    #[test]
    fn test_sent_at_short_format() {
        let message = fetched(b"Date: Fri, 15 Mar 2024 12:00:00 +0000\r\n\r\n");
        // noon UTC is the same calendar day in every zone from -11 to +11
        let short = message.sent_at_short().unwrap();
        assert!(short == "3/15/24" || short == "3/16/24" || short == "3/14/24");
        assert_eq!(message.date_short(), Some(short));
    }

    #[test]
    fn test_predicates_are_local() {
        let mut message = Message::stub(Uid::new(1).unwrap(), MailboxName::inbox());
        message.flags.insert(Flag::Seen);
        message.flags.insert(Flag::Draft);
        message.labels.insert("Work");

        assert!(message.is_read());
        assert!(message.is_draft());
        assert!(!message.is_starred());
        assert!(!message.is_deleted());
        assert!(message.has_label("Work"));
        assert!(!message.has_label("work"));
    }
}
