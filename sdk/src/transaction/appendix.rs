//! # Appendices
//!
//! Optional blocks that ride along with any transaction: messages, encrypted
//! notes, key announcements and name operations. Each kind owns one flag bit
//! in the header and a fixed body layout.
//!
//! [`AppendixKind::ALL`] is the single dispatch table. Its order is the
//! order bodies appear on the wire, and each entry's position is its flag
//! bit:
//!
//! ```text
//! bit flag  kind                      body
//! 0   0x01  PublicMessage             u32 (len | text<<31), bytes
//! 1   0x02  EncryptedMessage          u32 (len | text<<31), data, nonce[32]
//! 2   0x04  PublicKeyAnnouncement     public key[32]
//! 3   0x08  EncryptedMessageToSelf    as EncryptedMessage
//! 4   0x10  PrivateNameAnnouncement   name id u64
//! 5   0x20  PrivateNameAssignment     name id u64, signature[64]
//! 6   0x40  PublicNameAnnouncement    u8 len, UTF-8 name
//! 7   0x80  PublicNameAssignment      u8 len, UTF-8 name, signature[64]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::codec::{ByteReader, CodecError};
use crate::config::{MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH, MESSAGE_NONCE_LENGTH};
use crate::crypto::{name_id, EncryptedMessage, ObjectId, PublicKey, Signature};

const TEXT_BIT: u32 = 1 << 31;

// ---------------------------------------------------------------------------
// AppendixKind
// ---------------------------------------------------------------------------

/// Discriminant of an [`Appendix`]. Ordering follows the wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AppendixKind {
    PublicMessage,
    EncryptedMessage,
    PublicKeyAnnouncement,
    EncryptedMessageToSelf,
    PrivateNameAnnouncement,
    PrivateNameAssignment,
    PublicNameAnnouncement,
    PublicNameAssignment,
}

impl AppendixKind {
    /// Every kind, in flag-bit and wire order.
    pub const ALL: [AppendixKind; 8] = [
        Self::PublicMessage,
        Self::EncryptedMessage,
        Self::PublicKeyAnnouncement,
        Self::EncryptedMessageToSelf,
        Self::PrivateNameAnnouncement,
        Self::PrivateNameAssignment,
        Self::PublicNameAnnouncement,
        Self::PublicNameAssignment,
    ];

    /// Union of all flag bits this crate understands.
    pub const KNOWN_FLAGS: u32 = (1 << Self::ALL.len()) - 1;

    pub fn flag(self) -> u32 {
        1 << (self as u32)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PublicMessage => "public message",
            Self::EncryptedMessage => "encrypted message",
            Self::PublicKeyAnnouncement => "public key announcement",
            Self::EncryptedMessageToSelf => "encrypted message to self",
            Self::PrivateNameAnnouncement => "private name announcement",
            Self::PrivateNameAssignment => "private name assignment",
            Self::PublicNameAnnouncement => "public name announcement",
            Self::PublicNameAssignment => "public name assignment",
        }
    }
}

impl fmt::Display for AppendixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Body of a public message: bytes plus a flag saying they are UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(with = "crate::hex_serde::bytes")]
    pub bytes: Vec<u8>,
    pub is_text: bool,
}

impl Message {
    pub fn text(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            is_text: true,
        }
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            is_text: false,
        }
    }

    /// The message as text, if it is flagged as text and is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        if self.is_text {
            std::str::from_utf8(&self.bytes).ok()
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Appendix
// ---------------------------------------------------------------------------

/// An optional data block attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appendix {
    PublicMessage(Message),
    EncryptedMessage(EncryptedMessage),
    PublicKeyAnnouncement(PublicKey),
    EncryptedMessageToSelf(EncryptedMessage),
    PrivateNameAnnouncement(ObjectId),
    PrivateNameAssignment { name: ObjectId, signature: Signature },
    PublicNameAnnouncement(String),
    PublicNameAssignment { name: String, signature: Signature },
}

impl Appendix {
    pub fn kind(&self) -> AppendixKind {
        match self {
            Self::PublicMessage(_) => AppendixKind::PublicMessage,
            Self::EncryptedMessage(_) => AppendixKind::EncryptedMessage,
            Self::PublicKeyAnnouncement(_) => AppendixKind::PublicKeyAnnouncement,
            Self::EncryptedMessageToSelf(_) => AppendixKind::EncryptedMessageToSelf,
            Self::PrivateNameAnnouncement(_) => AppendixKind::PrivateNameAnnouncement,
            Self::PrivateNameAssignment { .. } => AppendixKind::PrivateNameAssignment,
            Self::PublicNameAnnouncement(_) => AppendixKind::PublicNameAnnouncement,
            Self::PublicNameAssignment { .. } => AppendixKind::PublicNameAssignment,
        }
    }

    /// Private announcement of a full name: only its id goes on chain.
    pub fn private_name_announcement(full_name: &str) -> Self {
        Self::PrivateNameAnnouncement(name_id(full_name))
    }

    /// Write the body (without the version byte).
    pub(crate) fn encode_body(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            Self::PublicMessage(message) => {
                put_length_word(out, message.bytes.len(), message.is_text, "public message")?;
                out.extend_from_slice(&message.bytes);
            }
            Self::EncryptedMessage(message) | Self::EncryptedMessageToSelf(message) => {
                put_length_word(out, message.data.len(), message.is_text, "encrypted message")?;
                out.extend_from_slice(&message.data);
                out.extend_from_slice(&message.nonce);
            }
            Self::PublicKeyAnnouncement(key) => out.extend_from_slice(key.as_bytes()),
            Self::PrivateNameAnnouncement(name) => out.extend_from_slice(&name.value().to_le_bytes()),
            Self::PrivateNameAssignment { name, signature } => {
                out.extend_from_slice(&name.value().to_le_bytes());
                out.extend_from_slice(signature.as_bytes());
            }
            Self::PublicNameAnnouncement(name) => put_name(out, name)?,
            Self::PublicNameAssignment { name, signature } => {
                put_name(out, name)?;
                out.extend_from_slice(signature.as_bytes());
            }
        }
        Ok(())
    }

    /// Read the body of a `kind` appendix (version byte already consumed).
    pub(crate) fn decode(kind: AppendixKind, r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let appendix = match kind {
            AppendixKind::PublicMessage => {
                let (len, is_text) = read_length_word(r, "public message length")?;
                Self::PublicMessage(Message {
                    bytes: r.take(len, "public message")?.to_vec(),
                    is_text,
                })
            }
            AppendixKind::EncryptedMessage | AppendixKind::EncryptedMessageToSelf => {
                let (len, is_text) = read_length_word(r, "encrypted message length")?;
                let message = EncryptedMessage {
                    data: r.take(len, "encrypted message")?.to_vec(),
                    nonce: r.array::<MESSAGE_NONCE_LENGTH>("encrypted message nonce")?,
                    is_text,
                };
                if kind == AppendixKind::EncryptedMessage {
                    Self::EncryptedMessage(message)
                } else {
                    Self::EncryptedMessageToSelf(message)
                }
            }
            AppendixKind::PublicKeyAnnouncement => {
                Self::PublicKeyAnnouncement(r.public_key("announced public key")?)
            }
            AppendixKind::PrivateNameAnnouncement => {
                Self::PrivateNameAnnouncement(r.id("private name")?)
            }
            AppendixKind::PrivateNameAssignment => Self::PrivateNameAssignment {
                name: r.id("private name")?,
                signature: r.signature("name assignment signature")?,
            },
            AppendixKind::PublicNameAnnouncement => {
                Self::PublicNameAnnouncement(read_name(r)?)
            }
            AppendixKind::PublicNameAssignment => Self::PublicNameAssignment {
                name: read_name(r)?,
                signature: r.signature("name assignment signature")?,
            },
        };
        Ok(appendix)
    }
}

fn put_length_word(
    out: &mut Vec<u8>,
    len: usize,
    is_text: bool,
    field: &'static str,
) -> Result<(), CodecError> {
    if len > MAX_MESSAGE_LENGTH {
        return Err(CodecError::FieldOutOfRange {
            field,
            value: len as u64,
        });
    }
    let mut word = len as u32;
    if is_text {
        word |= TEXT_BIT;
    }
    out.extend_from_slice(&word.to_le_bytes());
    Ok(())
}

fn read_length_word(r: &mut ByteReader<'_>, field: &'static str) -> Result<(usize, bool), CodecError> {
    let word = r.u32(field)?;
    Ok(((word & !TEXT_BIT) as usize, word & TEXT_BIT != 0))
}

fn put_name(out: &mut Vec<u8>, name: &str) -> Result<(), CodecError> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(CodecError::FieldOutOfRange {
            field: "public name length",
            value: name.len() as u64,
        });
    }
    let len = name.len() as u8;
    out.push(len);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn read_name(r: &mut ByteReader<'_>) -> Result<String, CodecError> {
    let len = usize::from(r.u8("public name length")?);
    let bytes = r.take(len, "public name")?;
    String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8 {
        field: "public name",
    })
}
