use crate::format::MAX_CHUNK_LEN;

/// What the decoder does when a chunk's stored CRC disagrees with the one
/// it computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Record the mismatch on the chunk and keep going.
    #[default]
    Report,
    /// Fail the decode at the first corrupted chunk.
    Reject,
}

/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub checksum_policy: ChecksumPolicy,
    /// Largest data length a chunk may declare before the decode fails.
    pub max_chunk_len: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Report,
            max_chunk_len: MAX_CHUNK_LEN,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn with_max_chunk_len(mut self, max: u32) -> Self {
        self.max_chunk_len = max;
        self
    }
}
