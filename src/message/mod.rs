//! Plaintext messages exchanged with the monitor, before encryption and after decryption.

pub(crate) mod poll_message;
pub(crate) mod reading_message;

pub use reading_message::{parse, FrameOutcome, ReadingMessage};
