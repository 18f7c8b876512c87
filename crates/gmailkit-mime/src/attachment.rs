//! File attachments, incoming and outgoing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::content_type::ContentType;
use crate::error::Result;
use crate::message::Message;

/// A named blob of data attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content_type: ContentType,
    data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from memory.
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }

    /// Reads a file, guessing its content type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let filename = path
            .file_name()
            .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self::new(filename, ContentType::guess_from_path(path), data))
    }

    /// Builds an attachment from a received MIME part.
    ///
    /// Parts without a filename are named `attachment`; bodies that fail to
    /// decode are kept raw.
    #[must_use]
    pub fn from_part(part: &Message) -> Self {
        let data = part.decode_body().unwrap_or_else(|_| part.body.clone());
        let mut content_type = part.effective_content_type();
        content_type.parameters.clear();

        Self::new(
            part.filename().unwrap_or_else(|| "attachment".to_string()),
            content_type,
            data,
        )
    }

    /// The file name.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The MIME type, without parameters.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The decoded content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the content in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Writes the content into `dir` under its file name and returns the
    /// path written.
    ///
    /// Only the final path component of the file name is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let name = Path::new(&self.filename)
            .file_name()
            .map_or_else(|| "attachment".into(), ToOwned::to_owned);
        let path = dir.as_ref().join(name);
        fs::write(&path, &self.data)?;
        Ok(path)
    }
}
