//! Chunked image transfer.

use std::io::{Read, Seek, SeekFrom};

use sbm_port::Channel;

use crate::{
    Result,
    err::Error,
    packet::Packet,
    session::{ACK, Session},
};

/// Largest payload the monitor accepts per download block.
pub const CHUNK_SIZE: usize = 4096;

/// Stream `source` to `addr`, one block header + ack + payload at a time.
///
/// The monitor acks the block *header*; the payload bytes that follow are
/// not individually acknowledged. A rejected header aborts the transfer
/// with the accumulated offset so the failure can be placed.
pub(crate) fn push<C: Channel, R: Read + Seek>(
    session: &mut Session<'_, C>,
    source: &mut R,
    addr: u32,
    mut progress: impl FnMut(u32, u32),
) -> Result<()> {
    let total = source.seek(SeekFrom::End(0))? as u32;
    source.seek(SeekFrom::Start(0))?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut offset = 0u32;
    while offset < total {
        let len = (total - offset).min(CHUNK_SIZE as u32);

        session.send(&Packet::block(addr + offset, len))?;
        session.expect_word(ACK).map_err(|cause| Error::Block {
            addr: addr + offset,
            offset,
            len,
            source: Box::new(cause),
        })?;

        let block = &mut buf[..len as usize];
        source.read_exact(block)?;
        session.send_raw(block)?;

        offset += len;
        progress(offset, total);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        packet::{DOWNLOAD, PACKET_LEN},
        testutil::MockChannel,
    };

    fn header_at(tx: &[u8], pos: usize) -> Packet {
        let raw: [u8; PACKET_LEN] = tx[pos..pos + PACKET_LEN].try_into().unwrap();
        Packet::decode(&raw)
    }

    #[test]
    fn splits_the_source_into_bounded_blocks() {
        let image: Vec<u8> = (0..2 * CHUNK_SIZE + 5).map(|i| i as u8).collect();
        let mut channel = MockChannel::new().respond(&[ACK, ACK, ACK]);
        let mut session = Session::new(&mut channel);

        let mut seen = Vec::new();
        session
            .download(&mut Cursor::new(&image), 0xc000_0000, |offset, total| {
                seen.push((offset, total))
            })
            .unwrap();

        let total = image.len() as u32;
        assert_eq!(seen, vec![(4096, total), (8192, total), (8197, total)]);
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));

        // header + payload per block, payload verbatim
        assert_eq!(channel.tx.len(), 3 * PACKET_LEN + image.len());
        let first = header_at(&channel.tx, 0);
        assert_eq!(first.header, DOWNLOAD);
        assert_eq!(first.address, 0xc000_0000);
        assert_eq!(first.length, 4096);
        assert_eq!(first.end, 0);
        assert_eq!(&channel.tx[PACKET_LEN..PACKET_LEN + 4096], &image[..4096]);

        let last = header_at(&channel.tx, 2 * (PACKET_LEN + 4096));
        assert_eq!(last.address, 0xc000_2000);
        assert_eq!(last.length, 5);
    }

    #[test]
    fn exact_multiples_keep_full_final_blocks() {
        let image = vec![0u8; 2 * CHUNK_SIZE];
        let mut channel = MockChannel::new().respond(&[ACK, ACK]);
        let mut session = Session::new(&mut channel);

        let mut seen = Vec::new();
        session
            .download(&mut Cursor::new(&image), 0x1000, |offset, total| {
                seen.push((offset, total))
            })
            .unwrap();

        assert_eq!(seen, vec![(4096, 8192), (8192, 8192)]);
    }

    #[test]
    fn empty_sources_transfer_nothing() {
        let mut channel = MockChannel::new();
        let mut session = Session::new(&mut channel);

        session
            .download(&mut Cursor::new(&[][..]), 0x1000, |_, _| {
                panic!("no progress expected")
            })
            .unwrap();

        assert_eq!(session.entry(), Some(0x1000));
        assert!(channel.tx.is_empty());
    }

    #[test]
    fn a_rejected_header_aborts_with_the_offset() {
        let image = vec![0u8; CHUNK_SIZE + 100];
        let mut channel = MockChannel::new().respond(&[ACK, 0x1111_1111]);
        let mut session = Session::new(&mut channel);

        match session.download(&mut Cursor::new(&image), 0xc000_0000, |_, _| {}) {
            Err(Error::Block {
                addr,
                offset,
                len,
                source,
            }) => {
                assert_eq!(addr, 0xc000_1000);
                assert_eq!(offset, 4096);
                assert_eq!(len, 100);
                assert!(source.is_mismatch());
            }
            other => panic!("expected block failure, got {other:?}"),
        }

        // the entry is not recorded, and the second payload never went out
        assert_eq!(session.entry(), None);
        assert_eq!(channel.tx.len(), 2 * PACKET_LEN + CHUNK_SIZE);
    }

    #[test]
    fn a_header_timeout_aborts_with_the_offset() {
        let image = vec![0u8; 10];
        let mut channel = MockChannel::new();
        let mut session = Session::new(&mut channel);

        match session.download(&mut Cursor::new(&image), 0x2000, |_, _| {}) {
            Err(Error::Block { offset, source, .. }) => {
                assert_eq!(offset, 0);
                assert!(source.is_timeout());
            }
            other => panic!("expected block failure, got {other:?}"),
        }
    }
}
