//! Datagram payload construction

use std::sync::Arc;

/// Build the immutable payload shared by all send loops.
///
/// Content is irrelevant to the measurement; ASCII letters are cycled so
/// the datagrams never carry control bytes with special meaning to tools
/// on the receiving side (EOF under netcat, for example).
pub fn make_message(size: usize) -> Arc<[u8]> {
    let letters: Vec<u8> = (b'A'..=b'z').collect();

    let mut message = vec![0u8; size];
    for (i, byte) in message.iter_mut().enumerate() {
        *byte = letters[i % letters.len()];
    }

    message.into()
}
