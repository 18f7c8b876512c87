//! Account server configuration.
//!
//! The core never opens connections itself. [`Config`] records where the
//! transports should connect so that an application can build its
//! [`ImapSession`](gmailkit_imap::ImapSession) and
//! [`SmtpSession`](crate::SmtpSession) from one serializable value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gmail IMAP host.
pub const GMAIL_IMAP_HOST: &str = "imap.gmail.com";
/// Gmail IMAP port (implicit TLS).
pub const GMAIL_IMAP_PORT: u16 = 993;
/// Gmail SMTP host.
pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";
/// Gmail SMTP submission port (STARTTLS).
pub const GMAIL_SMTP_PORT: u16 = 587;

/// Security/encryption mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Security {
    /// No encryption (not recommended).
    None,
    /// Implicit TLS (connect directly with TLS).
    #[default]
    Tls,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
}

/// One server endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
}

impl ServerConfig {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, security: Security) -> Self {
        Self {
            host: host.into(),
            port,
            security,
        }
    }

    fn validate(&self, which: &str) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config(format!("{which} host is empty")));
        }
        if self.port == 0 {
            return Err(Error::Config(format!("{which} port is 0")));
        }
        Ok(())
    }
}

/// Connection settings for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IMAP endpoint.
    pub imap: ServerConfig,
    /// SMTP endpoint.
    pub smtp: ServerConfig,
    /// Ask transports for protocol-level tracing.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            imap: ServerConfig::new(GMAIL_IMAP_HOST, GMAIL_IMAP_PORT, Security::Tls),
            smtp: ServerConfig::new(GMAIL_SMTP_HOST, GMAIL_SMTP_PORT, Security::StartTls),
            debug: false,
        }
    }
}

impl Config {
    /// Creates a configuration builder starting from the Gmail defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks that both endpoints have a host and a port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.imap.validate("IMAP")?;
        self.smtp.validate("SMTP")
    }

    /// Parses and validates a JSON configuration. Missing fields take the
    /// Gmail defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder with the Gmail defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the IMAP host.
    #[must_use]
    pub fn imap_host(mut self, host: impl Into<String>) -> Self {
        self.config.imap.host = host.into();
        self
    }

    /// Sets the IMAP port.
    #[must_use]
    pub const fn imap_port(mut self, port: u16) -> Self {
        self.config.imap.port = port;
        self
    }

    /// Sets the IMAP security mode.
    #[must_use]
    pub const fn imap_security(mut self, security: Security) -> Self {
        self.config.imap.security = security;
        self
    }

    /// Sets the SMTP host.
    #[must_use]
    pub fn smtp_host(mut self, host: impl Into<String>) -> Self {
        self.config.smtp.host = host.into();
        self
    }

    /// Sets the SMTP port.
    #[must_use]
    pub const fn smtp_port(mut self, port: u16) -> Self {
        self.config.smtp.port = port;
        self
    }

    /// Sets the SMTP security mode.
    #[must_use]
    pub const fn smtp_security(mut self, security: Security) -> Self {
        self.config.smtp.security = security;
        self
    }

    /// Enables protocol-level tracing in transports.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a host is empty or a port is 0.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
