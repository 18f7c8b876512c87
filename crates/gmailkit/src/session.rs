//! Session wrapper: login state, the selected mailbox, and error mapping.

use gmailkit_imap::{
    Command, FetchItems, ImapSession, MailboxName, RawFetch, StoreAction, Uid, UidSet,
};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// An [`ImapSession`] plus the state the core tracks about it.
///
/// Every call is awaited before the next is issued. `select` is skipped when
/// the mailbox is already selected.
#[derive(Debug)]
pub struct Session<S> {
    inner: S,
    selected: Option<MailboxName>,
    logged_in: bool,
}

impl<S: ImapSession> Session<S> {
    /// Wraps a not yet authenticated session.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            selected: None,
            logged_in: false,
        }
    }

    /// Returns true after a successful login or authenticate.
    pub const fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// The currently selected mailbox.
    pub const fn selected(&self) -> Option<&MailboxName> {
        self.selected.as_ref()
    }

    /// The wrapped session.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Fails with [`Error::UnauthorizedOperation`] before login.
    pub const fn ensure_logged_in(&self) -> Result<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(Error::UnauthorizedOperation)
        }
    }

    pub(crate) async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        debug!(username, "LOGIN");
        self.inner.login(username, password).await.map_err(|e| {
            warn!(username, error = %e, "login refused");
            Error::Authentication(e.response_text())
        })?;
        self.logged_in = true;
        info!(username, "logged in");
        Ok(())
    }

    pub(crate) async fn authenticate(
        &mut self,
        mechanism: &str,
        initial_response: &str,
    ) -> Result<()> {
        debug!(mechanism, "AUTHENTICATE");
        self.inner
            .authenticate(mechanism, Some(initial_response))
            .await
            .map_err(|e| {
                warn!(mechanism, error = %e, "authentication refused");
                Error::Authentication(e.response_text())
            })?;
        self.logged_in = true;
        info!(mechanism, "authenticated");
        Ok(())
    }

    pub(crate) async fn logout(&mut self) -> Result<()> {
        debug!("LOGOUT");
        let result = self.inner.logout().await;
        self.logged_in = false;
        self.selected = None;
        info!("logged out");
        result.map_err(Into::into)
    }

    /// Forgets a login whose follow-up failed, without telling the server.
    pub(crate) fn abandon(&mut self) {
        self.logged_in = false;
        self.selected = None;
    }

    pub(crate) async fn list(&mut self) -> Result<Vec<String>> {
        debug!("LIST \"\" \"*\"");
        Ok(self.inner.list().await?)
    }

    /// Selects `mailbox` unless it is already selected.
    pub(crate) async fn select(&mut self, mailbox: &MailboxName) -> Result<()> {
        if self.selected.as_ref() == Some(mailbox) {
            return Ok(());
        }
        debug!(mailbox = %mailbox, "SELECT");
        // a failed SELECT leaves no mailbox selected
        self.selected = None;
        self.inner.select(mailbox.wire()).await?;
        self.selected = Some(mailbox.clone());
        Ok(())
    }

    pub(crate) async fn create(&mut self, mailbox: &MailboxName) -> Result<()> {
        debug!(mailbox = %mailbox, "CREATE");
        Ok(self.inner.create(mailbox.wire()).await?)
    }

    pub(crate) async fn delete(&mut self, mailbox: &MailboxName) -> Result<()> {
        debug!(mailbox = %mailbox, "DELETE");
        self.inner.delete(mailbox.wire()).await?;
        if self.selected.as_ref() == Some(mailbox) {
            self.selected = None;
        }
        Ok(())
    }

    pub(crate) async fn search(&mut self, criteria: &[String]) -> Result<Vec<Uid>> {
        let command = Command::UidSearch {
            criteria: criteria.to_vec(),
        };
        debug!(%command, "issuing command");
        self.inner.uid_search(criteria).await.map_err(|e| {
            warn!(%command, error = %e, "search failed");
            Error::SearchFailed {
                response: e.response_text(),
            }
        })
    }

    pub(crate) async fn fetch(&mut self, uid: Uid, items: &FetchItems) -> Result<Vec<RawFetch>> {
        let command = Command::UidFetch {
            uids: UidSet::single(uid),
            items: items.clone(),
        };
        debug!(%command, "issuing command");
        Ok(self.inner.uid_fetch(uid, items).await?)
    }

    pub(crate) async fn store(&mut self, uid: Uid, action: &StoreAction) -> Result<()> {
        let command = Command::UidStore {
            uids: UidSet::single(uid),
            action: action.clone(),
        };
        debug!(%command, "issuing command");
        let result = self.inner.uid_store(uid, action).await;
        result.map_err(|e| mutation_failed(&command, &e))
    }

    pub(crate) async fn copy(&mut self, uid: Uid, target: &MailboxName) -> Result<()> {
        let command = Command::UidCopy {
            uids: UidSet::single(uid),
            mailbox: target.wire().to_string(),
        };
        debug!(%command, "issuing command");
        let result = self.inner.uid_copy(uid, target.wire()).await;
        result.map_err(|e| mutation_failed(&command, &e))
    }
}

fn mutation_failed(command: &Command, error: &gmailkit_imap::Error) -> Error {
    warn!(%command, error = %error, "server refused mutation");
    Error::MutationFailed {
        operation: command.to_string(),
        response: error.response_text(),
    }
}
