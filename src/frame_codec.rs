//! AES-128-CBC wrapper for the BM300 Pro frames.
//!
//! The device uses a static key and an all-zero IV, so the same plaintext always
//! encrypts to the same ciphertext. That is a property of the protocol and has
//! to stay that way for the device to understand us.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::error::{Error, Result};

/// Size of one cipher block, which is also the size of every protocol message.
pub const FRAME_LEN: usize = 16;

/// The key baked into the BM300 Pro firmware. Only slightly different from the BM2 key.
pub const KEY: [u8; 16] = [
    108, 101, 97, 103, 101, 110, 100, 255, 254, 48, 49, 48, 48, 48, 48, 64,
];

const IV: [u8; FRAME_LEN] = [0; FRAME_LEN];

pub struct FrameCodec {
    cipher: Aes128,
}

impl FrameCodec {
    pub fn new(key: &[u8; 16]) -> Self {
        Self { cipher: Aes128::new(key.into()) }
    }

    /// Encrypt one or more whole blocks. No padding is applied.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Self::check_len(plaintext)?;

        let mut output = plaintext.to_vec();
        let mut chain = IV;
        for block in output.chunks_mut(FRAME_LEN) {
            xor(block, &chain);
            self.cipher.encrypt_block(block.into());
            chain.copy_from_slice(block);
        }

        Ok(output)
    }

    /// Decrypt one or more whole blocks.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Self::check_len(ciphertext)?;

        let mut output = ciphertext.to_vec();
        let mut chain = IV;
        for block in output.chunks_mut(FRAME_LEN) {
            let mut next_chain = [0u8; FRAME_LEN];
            next_chain.copy_from_slice(block);
            self.cipher.decrypt_block(block.into());
            xor(block, &chain);
            chain = next_chain;
        }

        Ok(output)
    }

    fn check_len(data: &[u8]) -> Result<()> {
        if data.is_empty() || data.len() % FRAME_LEN != 0 {
            return Err(Error::InvalidFrameLength(data.len()));
        }
        Ok(())
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(&KEY)
    }
}

fn xor(block: &mut [u8], other: &[u8; FRAME_LEN]) {
    for (b, o) in block.iter_mut().zip(other) {
        *b ^= o;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL_PLAIN: &str = "d1550700000000000000000000000000";
    const POLL_CIPHER: &str = "586d7b2377c6924dcd750acb29f5bf8d";

    #[test]
    fn test_encrypt_poll_command_golden() {
        let codec = FrameCodec::default();
        let encrypted = codec.encrypt(&hex::decode(POLL_PLAIN).unwrap()).unwrap();
        assert_eq!(hex::encode(encrypted), POLL_CIPHER);
    }

    #[test]
    fn test_decrypt_captured_notification() {
        let codec = FrameCodec::default();
        let decrypted = codec
            .decrypt(&hex::decode("083077bee7ad2142d845d7c6d3227261").unwrap())
            .unwrap();
        assert_eq!(hex::encode(decrypted), "d1550700150057050400000000000000");
    }

    #[test]
    fn test_round_trip() {
        let codec = FrameCodec::default();
        for plaintext in [[0u8; 16], [0xffu8; 16], *b"0123456789abcdef"] {
            let encrypted = codec.encrypt(&plaintext).unwrap();
            assert_ne!(encrypted, plaintext);
            assert_eq!(codec.decrypt(&encrypted).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_encrypt_is_deterministic() {
        let codec = FrameCodec::default();
        let plaintext = hex::decode(POLL_PLAIN).unwrap();
        assert_eq!(codec.encrypt(&plaintext).unwrap(), codec.encrypt(&plaintext).unwrap());
        assert_eq!(
            FrameCodec::default().encrypt(&plaintext).unwrap(),
            codec.encrypt(&plaintext).unwrap()
        );
    }

    #[test]
    fn test_multi_block_chains() {
        let codec = FrameCodec::default();
        let plaintext =
            hex::decode("d155070001005f019c00000000000000d155070001005f019c00000000000000").unwrap();
        let encrypted = codec.encrypt(&plaintext).unwrap();
        assert_eq!(
            hex::encode(&encrypted),
            "751098f21cf9557434cb43a8953ac737fdba27478860f01c4cc4c403de47ea83"
        );
        assert_eq!(codec.decrypt(&encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_invalid_length() {
        let codec = FrameCodec::default();
        assert!(matches!(codec.encrypt(&[]), Err(Error::InvalidFrameLength(0))));
        assert!(matches!(codec.encrypt(&[0u8; 17]), Err(Error::InvalidFrameLength(17))));
        assert!(matches!(codec.decrypt(&[0u8; 15]), Err(Error::InvalidFrameLength(15))));
    }
}
