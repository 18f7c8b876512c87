//! IMAP command builder.
//!
//! Every command the client issues is a [`Command`] value. Session
//! implementations serialize it with [`Command::serialize`]; the untagged
//! [`Display`](std::fmt::Display) form is what error messages quote.

mod search;
mod serialize;
mod types;

use crate::types::UidSet;

pub use search::{SearchDate, SearchQuery};
pub use types::{FetchAttribute, FetchItems, StoreAction};

use serialize::{write_astring, write_fetch_items, write_search_token, write_store_action};

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// AUTHENTICATE command.
    Authenticate {
        /// Authentication mechanism.
        mechanism: String,
        /// Initial response (optional).
        initial_response: Option<String>,
    },
    /// LOGOUT command.
    Logout,
    /// LIST command.
    List {
        /// Reference name.
        reference: String,
        /// Mailbox pattern.
        pattern: String,
    },
    /// SELECT command.
    Select {
        /// Wire name of the mailbox to select.
        mailbox: String,
    },
    /// CREATE command.
    Create {
        /// Wire name of the mailbox to create.
        mailbox: String,
    },
    /// DELETE command.
    Delete {
        /// Wire name of the mailbox to delete.
        mailbox: String,
    },
    /// UID SEARCH command.
    UidSearch {
        /// Search tokens, as produced by [`SearchQuery::compile`].
        criteria: Vec<String>,
    },
    /// UID FETCH command.
    UidFetch {
        /// UIDs to fetch.
        uids: UidSet,
        /// Items to fetch.
        items: FetchItems,
    },
    /// UID STORE command.
    UidStore {
        /// UIDs to modify.
        uids: UidSet,
        /// Store action.
        action: StoreAction,
    },
    /// UID COPY command.
    UidCopy {
        /// UIDs to copy.
        uids: UidSet,
        /// Wire name of the target mailbox.
        mailbox: String,
    },
}

impl Command {
    /// Serializes the command to bytes with the given tag.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(tag.as_bytes());
        buf.push(b' ');
        self.write_body(&mut buf, false);
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns the command name as sent on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "LOGIN",
            Self::Authenticate { .. } => "AUTHENTICATE",
            Self::Logout => "LOGOUT",
            Self::List { .. } => "LIST",
            Self::Select { .. } => "SELECT",
            Self::Create { .. } => "CREATE",
            Self::Delete { .. } => "DELETE",
            Self::UidSearch { .. } => "UID SEARCH",
            Self::UidFetch { .. } => "UID FETCH",
            Self::UidStore { .. } => "UID STORE",
            Self::UidCopy { .. } => "UID COPY",
        }
    }

    fn write_body(&self, buf: &mut Vec<u8>, redact: bool) {
        buf.extend_from_slice(self.name().as_bytes());

        match self {
            Self::Logout => {}

            Self::Login { username, password } => {
                buf.push(b' ');
                write_astring(buf, username);
                buf.push(b' ');
                if redact {
                    buf.extend_from_slice(b"***");
                } else {
                    write_astring(buf, password);
                }
            }

            Self::Authenticate {
                mechanism,
                initial_response,
            } => {
                buf.push(b' ');
                buf.extend_from_slice(mechanism.as_bytes());
                if let Some(resp) = initial_response {
                    buf.push(b' ');
                    if redact {
                        buf.extend_from_slice(b"***");
                    } else {
                        buf.extend_from_slice(resp.as_bytes());
                    }
                }
            }

            Self::List { reference, pattern } => {
                buf.push(b' ');
                write_astring(buf, reference);
                buf.push(b' ');
                write_astring(buf, pattern);
            }

            Self::Select { mailbox } | Self::Create { mailbox } | Self::Delete { mailbox } => {
                buf.push(b' ');
                write_astring(buf, mailbox);
            }

            Self::UidSearch { criteria } => {
                if criteria.iter().any(|token| !token.is_ascii()) {
                    buf.extend_from_slice(b" CHARSET UTF-8");
                }
                for token in criteria {
                    buf.push(b' ');
                    write_search_token(buf, token);
                }
            }

            Self::UidFetch { uids, items } => {
                buf.push(b' ');
                buf.extend_from_slice(uids.to_string().as_bytes());
                buf.push(b' ');
                write_fetch_items(buf, items);
            }

            Self::UidStore { uids, action } => {
                buf.push(b' ');
                buf.extend_from_slice(uids.to_string().as_bytes());
                buf.push(b' ');
                write_store_action(buf, action);
            }

            Self::UidCopy { uids, mailbox } => {
                buf.push(b' ');
                buf.extend_from_slice(uids.to_string().as_bytes());
                buf.push(b' ');
                write_astring(buf, mailbox);
            }
        }
    }
}

/// Untagged form without the line ending. Credentials are masked.
impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut buf = Vec::new();
        self.write_body(&mut buf, true);
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::types::{Flag, Uid};

    use super::*;

    fn uid(n: u32) -> UidSet {
        UidSet::single(Uid::new(n).unwrap())
    }

    #[test]
    fn test_login_command() {
        let cmd = Command::Login {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        assert_eq!(cmd.serialize("A001"), b"A001 LOGIN user pass\r\n");
    }

    #[test]
    fn test_login_quoted() {
        let cmd = Command::Login {
            username: "user@gmail.com".to_string(),
            password: "pass word".to_string(),
        };
        assert_eq!(
            cmd.serialize("A001"),
            b"A001 LOGIN user@gmail.com \"pass word\"\r\n"
        );
    }

    #[test]
    fn test_display_masks_credentials() {
        let login = Command::Login {
            username: "user@gmail.com".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(login.to_string(), "LOGIN user@gmail.com ***");

        let auth = Command::Authenticate {
            mechanism: "XOAUTH2".to_string(),
            initial_response: Some("dXNlcj0=".to_string()),
        };
        assert_eq!(auth.to_string(), "AUTHENTICATE XOAUTH2 ***");
        assert_eq!(
            auth.serialize("A002"),
            b"A002 AUTHENTICATE XOAUTH2 dXNlcj0=\r\n"
        );
    }

    #[test]
    fn test_list_command() {
        let cmd = Command::List {
            reference: String::new(),
            pattern: "*".to_string(),
        };
        assert_eq!(cmd.serialize("A001"), b"A001 LIST \"\" \"*\"\r\n");
    }

    #[test]
    fn test_select_gmail_mailbox() {
        let cmd = Command::Select {
            mailbox: "[Gmail]/All Mail".to_string(),
        };
        assert_eq!(cmd.serialize("A001"), b"A001 SELECT \"[Gmail]/All Mail\"\r\n");
    }

    #[test]
    fn test_uid_search_command() {
        let cmd = Command::UidSearch {
            criteria: vec![
                "ALL".to_string(),
                "UNSEEN".to_string(),
                "X-GM-RAW".to_string(),
                "has:attachment larger:5M".to_string(),
                "UID".to_string(),
                "10:*".to_string(),
            ],
        };
        assert_eq!(
            cmd.serialize("A003"),
            b"A003 UID SEARCH ALL UNSEEN X-GM-RAW \"has:attachment larger:5M\" UID 10:*\r\n"
        );
    }

    #[test]
    fn test_uid_search_non_ascii_declares_charset() {
        let cmd = Command::UidSearch {
            criteria: vec!["ALL".to_string(), "SUBJECT".to_string(), "café".to_string()],
        };
        assert_eq!(cmd.to_string(), "UID SEARCH CHARSET UTF-8 ALL SUBJECT \"café\"");
    }

    #[test]
    fn test_uid_fetch_command() {
        let cmd = Command::UidFetch {
            uids: uid(42),
            items: FetchItems::message(),
        };
        assert_eq!(
            cmd.serialize("A004"),
            b"A004 UID FETCH 42 (BODY.PEEK[] FLAGS X-GM-THRID X-GM-MSGID X-GM-LABELS)\r\n"
        );
    }

    #[test]
    fn test_uid_store_command() {
        let cmd = Command::UidStore {
            uids: uid(42),
            action: StoreAction::add_flag(Flag::Seen),
        };
        assert_eq!(cmd.to_string(), "UID STORE 42 +FLAGS (\\Seen)");
    }

    #[test]
    fn test_uid_copy_command() {
        let cmd = Command::UidCopy {
            uids: uid(42),
            mailbox: "[Gmail]/Trash".to_string(),
        };
        assert_eq!(cmd.serialize("A005"), b"A005 UID COPY 42 \"[Gmail]/Trash\"\r\n");
    }

    #[test]
    fn test_logout_command() {
        assert_eq!(Command::Logout.serialize("A006"), b"A006 LOGOUT\r\n");
    }
}
