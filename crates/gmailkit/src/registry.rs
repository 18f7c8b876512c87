//! Known mailboxes and their message caches.

use std::collections::BTreeMap;

use gmailkit_imap::{MailboxName, Uid, utf7};

use crate::message::Message;

/// Gmail's trash mailbox.
pub const TRASH: &str = "[Gmail]/Trash";
/// Gmail's trash mailbox in locales that call it "Bin".
pub const BIN: &str = "[Gmail]/Bin";
/// The mailbox holding every message; archiving moves here.
pub const ALL_MAIL: &str = "[Gmail]/All Mail";
/// Gmail's spam mailbox.
pub const SPAM: &str = "[Gmail]/Spam";
/// Gmail's starred mailbox.
pub const STARRED: &str = "[Gmail]/Starred";
/// Gmail's sent mailbox.
pub const SENT_MAIL: &str = "[Gmail]/Sent Mail";
/// Gmail's important mailbox.
pub const IMPORTANT: &str = "[Gmail]/Important";

/// Returns true for the names Gmail uses for trash.
///
/// Deleting from one of these does not move the message again, and moving
/// into one does not delete the original.
#[must_use]
pub fn is_trash(name: &str) -> bool {
    name == TRASH || name == BIN
}

/// Index of `name` among `names`, by wire name first, then by the wire form
/// of `name`.
fn position_in<'a, I>(names: I, name: &str) -> Option<usize>
where
    I: Iterator<Item = &'a MailboxName> + Clone,
{
    names.clone().position(|n| n.wire() == name).or_else(|| {
        let wire = utf7::encode(name);
        names.clone().position(|n| n.wire() == wire)
    })
}

/// Resolves `name` against `names`, reading unknown names with
/// [`MailboxName::from_user`].
pub(crate) fn target_in<'a, I>(mut names: I, name: &str) -> MailboxName
where
    I: Iterator<Item = &'a MailboxName> + Clone,
{
    position_in(names.clone(), name)
        .and_then(|i| names.nth(i))
        .map_or_else(|| MailboxName::from_user(name), Clone::clone)
}

/// A mailbox (or Gmail label) and the messages found in it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub(crate) name: MailboxName,
    pub(crate) messages: BTreeMap<Uid, Message>,
    pub(crate) selectable: bool,
}

impl Mailbox {
    /// Creates an empty mailbox.
    #[must_use]
    pub const fn new(name: MailboxName) -> Self {
        Self {
            name,
            messages: BTreeMap::new(),
            selectable: true,
        }
    }

    /// The mailbox name in both forms.
    #[must_use]
    pub const fn name(&self) -> &MailboxName {
        &self.name
    }

    /// False for `\Noselect` containers such as `[Gmail]`.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// A cached message.
    #[must_use]
    pub fn get(&self, uid: Uid) -> Option<&Message> {
        self.messages.get(&uid)
    }

    /// Returns true if `uid` is cached.
    #[must_use]
    pub fn contains(&self, uid: Uid) -> bool {
        self.messages.contains_key(&uid)
    }

    /// Cached messages in UID order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    /// Number of cached messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Adds stubs for UIDs not yet cached. Existing entries are kept.
    pub(crate) fn cache_uids(&mut self, uids: &[Uid]) {
        for &uid in uids {
            self.messages
                .entry(uid)
                .or_insert_with(|| Message::stub(uid, self.name.clone()));
        }
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Mailbox {}>", self.name.wire())
    }
}

/// The mailboxes of one account, in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxRegistry {
    mailboxes: Vec<Mailbox>,
}

impl MailboxRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a mailbox up by its wire name, then by the wire form of `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Mailbox> {
        self.position(name).map(|i| &self.mailboxes[i])
    }

    /// Mutable form of [`resolve`](Self::resolve).
    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Mailbox> {
        self.position(name).map(|i| &mut self.mailboxes[i])
    }

    /// The name `name` refers to: a known mailbox if it resolves, otherwise
    /// `name` read as either form by [`MailboxName::from_user`].
    #[must_use]
    pub fn target(&self, name: &str) -> MailboxName {
        target_in(self.mailboxes.iter().map(|m| &m.name), name)
    }

    /// Names of every known mailbox, in LIST order.
    #[must_use]
    pub fn names(&self) -> Vec<MailboxName> {
        self.mailboxes.iter().map(|m| m.name.clone()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        position_in(self.mailboxes.iter().map(|m| &m.name), name)
    }

    /// Adds a mailbox, replacing one with the same wire name.
    pub fn insert(&mut self, mailbox: Mailbox) -> &mut Mailbox {
        let index = match self
            .mailboxes
            .iter()
            .position(|m| m.name.wire() == mailbox.name.wire())
        {
            Some(i) => {
                self.mailboxes[i] = mailbox;
                i
            }
            None => {
                self.mailboxes.push(mailbox);
                self.mailboxes.len() - 1
            }
        };
        &mut self.mailboxes[index]
    }

    /// Removes a mailbox by resolved name.
    pub fn remove(&mut self, name: &str) -> Option<Mailbox> {
        self.position(name).map(|i| self.mailboxes.remove(i))
    }

    /// Replaces every mailbox.
    pub fn replace_all(&mut self, mailboxes: impl IntoIterator<Item = Mailbox>) {
        self.mailboxes = mailboxes.into_iter().collect();
    }

    /// All mailboxes.
    pub fn iter(&self) -> impl Iterator<Item = &Mailbox> {
        self.mailboxes.iter()
    }

    /// Number of mailboxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    /// Returns true if no mailbox is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
    }

    /// Mailbox names as sent by the server, or decoded when
    /// `require_unicode` is set.
    #[must_use]
    pub fn labels(&self, require_unicode: bool) -> Vec<String> {
        self.mailboxes
            .iter()
            .map(|m| {
                if require_unicode {
                    m.name.as_str().to_string()
                } else {
                    m.name.wire().to_string()
                }
            })
            .collect()
    }

    /// `[Gmail]/Trash` if the account has it, else `[Gmail]/Bin`.
    #[must_use]
    pub fn trash_name(&self) -> &'static str {
        if self.mailboxes.iter().any(|m| m.name.wire() == TRASH) {
            TRASH
        } else {
            BIN
        }
    }
}
