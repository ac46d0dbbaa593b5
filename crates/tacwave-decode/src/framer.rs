/// Every frame on the wire ends with this two-byte sequence. The protocol
/// has no escaping, so a valid payload never contains it.
pub const TERMINATOR: [u8; 2] = [0x0A, 0x01];

/// Accumulates raw serial bytes and yields complete frame bodies
/// (terminator stripped) in arrival order.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    buf: Vec<u8>,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends received bytes and returns every frame body completed by
    /// them. An incomplete tail stays buffered for the next push.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.buf.extend_from_slice(bytes);
        let mut bodies = Vec::new();
        while let Some(pos) = self
            .buf
            .windows(TERMINATOR.len())
            .position(|w| w == TERMINATOR)
        {
            let rest = self.buf.split_off(pos + TERMINATOR.len());
            let mut body = std::mem::replace(&mut self.buf, rest);
            body.truncate(pos);
            bodies.push(body);
        }
        bodies
    }

    /// Bytes buffered but not yet terminated.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_one_frame() {
        let mut splitter = FrameSplitter::new();
        let bodies = splitter.push(&[0x09, 0x17, 0x01, 0x00, 0x0A, 0x01]);
        assert_eq!(bodies, vec![vec![0x09, 0x17, 0x01, 0x00]]);
        assert_eq!(splitter.pending(), 0);
    }

    #[test]
    fn splits_multiple_frames_in_one_push() {
        let mut splitter = FrameSplitter::new();
        let bodies = splitter.push(&[0x01, 0x0A, 0x01, 0x02, 0x03, 0x0A, 0x01]);
        assert_eq!(bodies, vec![vec![0x01], vec![0x02, 0x03]]);
    }

    #[test]
    fn reassembles_frame_split_across_pushes() {
        let mut splitter = FrameSplitter::new();
        assert!(splitter.push(&[0x09, 0x17, 0x01]).is_empty());
        assert_eq!(splitter.pending(), 3);
        // terminator itself arrives in two pieces
        assert!(splitter.push(&[0x0A]).is_empty());
        let bodies = splitter.push(&[0x01]);
        assert_eq!(bodies, vec![vec![0x09, 0x17, 0x01]]);
    }

    #[test]
    fn keeps_partial_tail_after_complete_frame() {
        let mut splitter = FrameSplitter::new();
        let bodies = splitter.push(&[0xAA, 0x0A, 0x01, 0xBB, 0xCC]);
        assert_eq!(bodies, vec![vec![0xAA]]);
        assert_eq!(splitter.pending(), 2);
    }

    #[test]
    fn immediate_terminator_yields_empty_body() {
        let mut splitter = FrameSplitter::new();
        let bodies = splitter.push(&[0x0A, 0x01]);
        assert_eq!(bodies, vec![Vec::<u8>::new()]);
    }
}
