//! The account façade.
//!
//! [`Gmail`] owns the IMAP session, the SMTP session and the mailbox
//! registry. Every operation that touches a mailbox resolves its name,
//! selects it if needed and then routes through the session.

use std::collections::btree_map::Entry;

use gmailkit_imap::{
    ImapSession, MailboxName, SearchQuery, Uid, parse_list_descriptor, sasl,
};
use gmailkit_mime::OutgoingMessage;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::message::{Message, MessageHandle};
use crate::registry::{
    ALL_MAIL, IMPORTANT, Mailbox, MailboxRegistry, SENT_MAIL, SPAM, STARRED,
};
use crate::session::Session;
use crate::smtp::{NoSmtp, SmtpError, SmtpSession};

/// One Gmail account.
///
/// `I` is the IMAP transport and `M` the SMTP transport; both are supplied
/// by the application.
#[derive(Debug)]
pub struct Gmail<I, M = NoSmtp> {
    config: Config,
    session: Session<I>,
    smtp: M,
    registry: MailboxRegistry,
    username: Option<String>,
}

impl<I: ImapSession> Gmail<I, NoSmtp> {
    /// Creates an account that can read but not send.
    #[must_use]
    pub fn imap_only(imap: I) -> Self {
        Self::new(imap, NoSmtp)
    }
}

impl<I: ImapSession, M: SmtpSession> Gmail<I, M> {
    /// Creates an account with the default Gmail configuration.
    #[must_use]
    pub fn new(imap: I, smtp: M) -> Self {
        Self::with_config(Config::default(), imap, smtp)
    }

    /// Creates an account with an explicit configuration.
    #[must_use]
    pub fn with_config(config: Config, imap: I, smtp: M) -> Self {
        Self {
            config,
            session: Session::new(imap),
            smtp,
            registry: MailboxRegistry::new(),
            username: None,
        }
    }

    /// The configuration transports were built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns true after a successful login or authenticate.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Known mailboxes.
    #[must_use]
    pub const fn registry(&self) -> &MailboxRegistry {
        &self.registry
    }

    /// The IMAP session wrapper.
    #[must_use]
    pub const fn session(&self) -> &Session<I> {
        &self.session
    }

    /// The SMTP transport.
    #[must_use]
    pub const fn smtp(&self) -> &M {
        &self.smtp
    }

    /// The account name given at login.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The part of the username after the last `@`.
    #[must_use]
    pub fn mail_domain(&self) -> Option<&str> {
        let username = self.username.as_deref()?;
        Some(username.rsplit('@').next().unwrap_or(username))
    }

    /// Logs in with a password, loads the mailbox list and, unless
    /// `only_fetch` is set, logs in to SMTP with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if either server refuses the
    /// credentials, or an error from loading the mailbox list. If the list
    /// cannot be loaded the account is left logged out.
    pub async fn login(&mut self, username: &str, password: &str, only_fetch: bool) -> Result<()> {
        self.username = Some(username.to_string());
        self.session.login(username, password).await?;
        self.load_mailboxes().await?;

        if !only_fetch {
            self.smtp.login(username, password).await.map_err(|e| {
                Error::Authentication(match e {
                    SmtpError::Authentication(msg) => msg,
                    other => other.to_string(),
                })
            })?;
            debug!(username, "SMTP login accepted");
        }
        Ok(())
    }

    /// Authenticates with an OAuth 2.0 access token and loads the mailbox
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the server refuses the token,
    /// or an error from loading the mailbox list, which leaves the account
    /// logged out.
    pub async fn authenticate(&mut self, username: &str, access_token: &str) -> Result<()> {
        self.username = Some(username.to_string());
        let initial = sasl::xoauth2_response(username, access_token);
        self.session.authenticate(sasl::XOAUTH2, &initial).await?;
        self.load_mailboxes().await
    }

    async fn load_mailboxes(&mut self) -> Result<()> {
        let loaded = self.fetch_mailboxes().await;
        if let Err(e) = &loaded {
            warn!(error = %e, "mailbox list failed, dropping login");
            self.session.abandon();
        }
        loaded
    }

    /// Logs out of IMAP.
    ///
    /// The session is considered logged out even if the server errors.
    ///
    /// # Errors
    ///
    /// Returns the transport error, if any.
    pub async fn logout(&mut self) -> Result<()> {
        self.session.logout().await
    }

    /// Reloads the registry from `LIST "" "*"`.
    ///
    /// Cached messages are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnauthorizedOperation`] before login, an IMAP error
    /// if LIST fails, or [`Error::Encoding`] for a malformed mailbox name.
    pub async fn fetch_mailboxes(&mut self) -> Result<()> {
        self.session.ensure_logged_in()?;
        let descriptors = self.session.list().await?;

        let mut mailboxes = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let listed = parse_list_descriptor(descriptor)?;
            let name = MailboxName::from_wire(listed.wire_name.as_str())
                .map_err(|e| Error::Encoding(e.to_string()))?;
            let mut mailbox = Mailbox::new(name);
            mailbox.selectable = listed.is_selectable();
            mailboxes.push(mailbox);
        }

        self.registry.replace_all(mailboxes);
        info!(count = self.registry.len(), "loaded mailboxes");
        Ok(())
    }

    /// Resolves `name` and selects the mailbox if it is not selected.
    async fn open(&mut self, name: &str) -> Result<(&mut Session<I>, &mut Mailbox)> {
        self.session.ensure_logged_in()?;
        let Self {
            session, registry, ..
        } = self;
        let mailbox = registry
            .resolve_mut(name)
            .ok_or_else(|| Error::MailboxNotFound(name.to_string()))?;
        session.select(&mailbox.name).await?;
        Ok((session, mailbox))
    }

    /// Returns a mailbox, selecting it first.
    ///
    /// `name` may be given in human or wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnauthorizedOperation`] before login,
    /// [`Error::MailboxNotFound`] for an unknown name, or the SELECT error.
    pub async fn mailbox(&mut self, name: &str) -> Result<&Mailbox> {
        let (_, mailbox) = self.open(name).await?;
        Ok(mailbox)
    }

    /// Alias of [`mailbox`](Self::mailbox).
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn label(&mut self, name: &str) -> Result<&Mailbox> {
        self.mailbox(name).await
    }

    /// `INBOX`.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn inbox(&mut self) -> Result<&Mailbox> {
        self.mailbox("INBOX").await
    }

    /// `[Gmail]/Spam`.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn spam(&mut self) -> Result<&Mailbox> {
        self.mailbox(SPAM).await
    }

    /// `[Gmail]/Starred`.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn starred(&mut self) -> Result<&Mailbox> {
        self.mailbox(STARRED).await
    }

    /// `[Gmail]/All Mail`.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn all_mail(&mut self) -> Result<&Mailbox> {
        self.mailbox(ALL_MAIL).await
    }

    /// `[Gmail]/Sent Mail`.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn sent_mail(&mut self) -> Result<&Mailbox> {
        self.mailbox(SENT_MAIL).await
    }

    /// `[Gmail]/Important`.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn important(&mut self) -> Result<&Mailbox> {
        self.mailbox(IMPORTANT).await
    }

    /// `[Gmail]/Trash`, or `[Gmail]/Bin` in accounts that use that name.
    ///
    /// # Errors
    ///
    /// See [`mailbox`](Self::mailbox).
    pub async fn trash(&mut self) -> Result<&Mailbox> {
        let name = self.registry.trash_name();
        self.mailbox(name).await
    }

    /// Creates a mailbox, or returns it if it already exists.
    ///
    /// `name` may be given in human or wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnauthorizedOperation`] before login or the CREATE
    /// error.
    pub async fn create_mailbox(&mut self, name: &str) -> Result<&Mailbox> {
        self.session.ensure_logged_in()?;
        if self.registry.resolve(name).is_none() {
            let mailbox = MailboxName::from_user(name);
            self.session.create(&mailbox).await?;
            info!(mailbox = %mailbox, "created mailbox");
            self.registry.insert(Mailbox::new(mailbox));
        }
        self.registry
            .resolve(name)
            .ok_or_else(|| Error::MailboxNotFound(name.to_string()))
    }

    /// Deletes a mailbox. Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnauthorizedOperation`] before login or the DELETE
    /// error.
    pub async fn delete_mailbox(&mut self, name: &str) -> Result<()> {
        self.session.ensure_logged_in()?;
        let Some(mailbox) = self.registry.resolve(name).map(|m| m.name.clone()) else {
            debug!(name, "no such mailbox, nothing to delete");
            return Ok(());
        };
        self.session.delete(&mailbox).await?;
        self.registry.remove(mailbox.wire());
        info!(mailbox = %mailbox, "deleted mailbox");
        Ok(())
    }

    /// Runs a search in `mailbox` and caches a stub for every UID found.
    ///
    /// Returns the UIDs in server order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchFailed`] if the server refuses the search, or
    /// an error from resolving and selecting the mailbox.
    pub async fn search(&mut self, mailbox: &str, query: &SearchQuery) -> Result<Vec<Uid>> {
        let (session, mailbox) = self.open(mailbox).await?;
        let uids = session.search(&query.compile()).await?;
        mailbox.cache_uids(&uids);
        info!(mailbox = %mailbox.name, found = uids.len(), "search complete");
        Ok(uids)
    }

    /// Alias of [`search`](Self::search).
    ///
    /// # Errors
    ///
    /// See [`search`](Self::search).
    pub async fn find(&mut self, mailbox: &str, query: &SearchQuery) -> Result<Vec<Uid>> {
        self.search(mailbox, query).await
    }

    /// Searches `[Gmail]/All Mail`.
    ///
    /// # Errors
    ///
    /// See [`search`](Self::search).
    pub async fn find_all(&mut self, query: &SearchQuery) -> Result<Vec<Uid>> {
        self.search(ALL_MAIL, query).await
    }

    /// Cached messages of `mailbox`, running an `ALL` search first if
    /// nothing is cached yet.
    ///
    /// # Errors
    ///
    /// See [`search`](Self::search).
    pub async fn messages(&mut self, mailbox: &str) -> Result<Vec<&Message>> {
        let (session, mailbox) = self.open(mailbox).await?;
        if mailbox.is_empty() {
            let uids = session.search(&SearchQuery::new().compile()).await?;
            mailbox.cache_uids(&uids);
        }
        Ok(mailbox.messages().collect())
    }

    /// A cached message, without touching the server.
    #[must_use]
    pub fn message(&self, mailbox: &str, uid: Uid) -> Option<&Message> {
        self.registry.resolve(mailbox)?.get(uid)
    }

    /// A cached message paired with the session, for fetching and mutating.
    ///
    /// The message must have been found by a search first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnauthorizedOperation`] before login,
    /// [`Error::MailboxNotFound`] or [`Error::MessageNotFound`].
    pub fn message_mut(&mut self, mailbox: &str, uid: Uid) -> Result<MessageHandle<'_, I>> {
        self.session.ensure_logged_in()?;
        let known = self.registry.names();
        let trash = self.registry.target(self.registry.trash_name());
        let Self {
            session, registry, ..
        } = self;
        let owner = registry
            .resolve_mut(mailbox)
            .ok_or_else(|| Error::MailboxNotFound(mailbox.to_string()))?;
        match owner.messages.entry(uid) {
            Entry::Occupied(entry) => Ok(MessageHandle::new(session, entry, known, trash)),
            Entry::Vacant(_) => Err(Error::MessageNotFound(uid)),
        }
    }

    /// Copies a message to `to`, selecting `from` first when given.
    ///
    /// Without `from` the copy runs in the currently selected mailbox.
    /// No cache is updated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MutationFailed`] if the server refuses the COPY, or
    /// an error from resolving and selecting `from`.
    pub async fn copy(&mut self, uid: Uid, to: &str, from: Option<&str>) -> Result<()> {
        if let Some(from) = from {
            self.open(from).await?;
        } else {
            self.session.ensure_logged_in()?;
        }
        let target = self.registry.target(to);
        self.session.copy(uid, &target).await
    }

    /// Mailbox names, as sent by the server or decoded.
    #[must_use]
    pub fn labels(&self, require_unicode: bool) -> Vec<String> {
        self.registry.labels(require_unicode)
    }

    /// Sends a message from the logged-in account.
    ///
    /// Recipients are the `To`, `Bcc` and `Cc` addresses in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnauthorizedOperation`] if no username is known,
    /// [`SmtpError::InvalidAddress`] if there are no recipients, or the
    /// transport error.
    pub async fn send(&mut self, message: &OutgoingMessage) -> Result<()> {
        let from = self
            .username
            .as_deref()
            .ok_or(Error::UnauthorizedOperation)?;
        let recipients = message.recipients();
        if recipients.is_empty() {
            return Err(SmtpError::InvalidAddress("No recipients specified".into()).into());
        }

        let bytes = message.to_bytes();
        debug!(from, recipients = recipients.len(), size = bytes.len(), "sending message");
        self.smtp.send_mail(from, &recipients, &bytes).await?;
        info!(from, recipients = recipients.len(), "message sent");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gmailkit_imap::{FetchItems, RawFetch, StoreAction};

    use super::*;

    /// Session that accepts everything and lists nothing.
    struct Idle;

    impl ImapSession for Idle {
        async fn login(&mut self, _: &str, _: &str) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn authenticate(&mut self, _: &str, _: Option<&str>) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn logout(&mut self) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn list(&mut self) -> gmailkit_imap::Result<Vec<String>> {
            Ok(Vec::new())
        }
        async fn select(&mut self, _: &str) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn create(&mut self, _: &str) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn delete(&mut self, _: &str) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn uid_search(&mut self, _: &[String]) -> gmailkit_imap::Result<Vec<Uid>> {
            Ok(Vec::new())
        }
        async fn uid_fetch(&mut self, _: Uid, _: &FetchItems) -> gmailkit_imap::Result<Vec<RawFetch>> {
            Ok(Vec::new())
        }
        async fn uid_store(&mut self, _: Uid, _: &StoreAction) -> gmailkit_imap::Result<()> {
            Ok(())
        }
        async fn uid_copy(&mut self, _: Uid, _: &str) -> gmailkit_imap::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_mail_domain() {
        let mut gmail = Gmail::imap_only(Idle);
        assert_eq!(gmail.mail_domain(), None);

        tokio_test::block_on(gmail.login("someone@example.org", "pw", true)).unwrap();
        assert_eq!(gmail.mail_domain(), Some("example.org"));
        assert_eq!(gmail.username(), Some("someone@example.org"));
    }

    #[test]
    fn test_login_requires_smtp_unless_only_fetch() {
        let mut gmail = Gmail::imap_only(Idle);
        let err = tokio_test::block_on(gmail.login("a@b.c", "pw", false)).unwrap_err();
        assert!(matches!(err, Error::Authentication(msg) if msg.contains("no SMTP session")));
    }

    #[test]
    fn test_default_config() {
        let gmail = Gmail::imap_only(Idle);
        assert_eq!(gmail.config(), &Config::default());
        assert!(!gmail.is_logged_in());
    }
}
