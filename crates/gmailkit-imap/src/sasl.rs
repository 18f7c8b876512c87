//! SASL initial responses.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Mechanism name for [`xoauth2_response`].
pub const XOAUTH2: &str = "XOAUTH2";

/// Generates the XOAUTH2 initial response used by Gmail.
///
/// Format: `user=<user>\x01auth=Bearer <token>\x01\x01`, base64 encoded.
///
/// ```
/// use gmailkit_imap::sasl::xoauth2_response;
///
/// let response = xoauth2_response("someone@gmail.com", "ya29.a0...");
/// // Passed as the initial response of AUTHENTICATE XOAUTH2
/// ```
#[must_use]
pub fn xoauth2_response(user: &str, token: &str) -> String {
    let auth_string = format!("user={user}\x01auth=Bearer {token}\x01\x01");
    STANDARD.encode(auth_string.as_bytes())
}
