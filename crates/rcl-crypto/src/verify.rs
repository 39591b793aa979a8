use rcl_types::ChainHash;

use crate::hasher::CryptoError;

/// A block that participates in a hash chain.
pub trait ChainLink {
    /// 1-based position in the chain.
    fn block_number(&self) -> u64;
    /// Stored hash of the predecessor (genesis sentinel for the first block).
    fn prev_hash(&self) -> &ChainHash;
    /// Stored hash of this block.
    fn curr_hash(&self) -> &ChainHash;
    /// Recompute this block's hash from its stored fields.
    fn recompute_hash(&self) -> Result<ChainHash, CryptoError>;
}

/// A single integrity fault found while walking a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkFault {
    /// 0-based index of the offending block in the walked sequence.
    pub index: usize,
    /// The offending block's stored block number.
    pub block_number: u64,
    pub kind: LinkFaultKind,
    pub detail: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkFaultKind {
    /// Block numbers are not the gapless 1-based sequence.
    NumberGap,
    /// `prev_hash` does not match the predecessor's recomputed hash.
    LinkMismatch,
    /// Recomputing the block's own hash does not reproduce `curr_hash`.
    HashMismatch,
    /// The block's fields could not be re-serialized for recomputation.
    Recompute,
}

/// Hash chain integrity walker.
///
/// Walks a chain in ascending order and checks, for every block, that the
/// block numbers are gapless from 1, that `prev_hash` matches the predecessor,
/// and that the stored hash is reproducible from the stored fields. All
/// faults are collected; the walk never stops at the first.
///
/// The expected predecessor hash carried forward is the *recomputed* one, so
/// a block whose fields were edited in place poisons the link check of its
/// successor as well — retroactive edits surface twice.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify a chain, returning every fault found (empty means intact).
    pub fn verify(links: &[impl ChainLink]) -> Vec<LinkFault> {
        let mut faults = Vec::new();
        let mut expected_prev = ChainHash::GENESIS;

        for (index, link) in links.iter().enumerate() {
            let expected_number = (index + 1) as u64;
            if link.block_number() != expected_number {
                faults.push(LinkFault {
                    index,
                    block_number: link.block_number(),
                    kind: LinkFaultKind::NumberGap,
                    detail: format!(
                        "expected block number {expected_number}, found {}",
                        link.block_number()
                    ),
                });
            }

            if *link.prev_hash() != expected_prev {
                faults.push(LinkFault {
                    index,
                    block_number: link.block_number(),
                    kind: LinkFaultKind::LinkMismatch,
                    detail: format!(
                        "prev_hash {} does not match predecessor {}",
                        link.prev_hash().short_hex(),
                        expected_prev.short_hex()
                    ),
                });
            }

            match link.recompute_hash() {
                Ok(recomputed) => {
                    if recomputed != *link.curr_hash() {
                        faults.push(LinkFault {
                            index,
                            block_number: link.block_number(),
                            kind: LinkFaultKind::HashMismatch,
                            detail: format!(
                                "stored hash {} but fields hash to {}",
                                link.curr_hash().short_hex(),
                                recomputed.short_hex()
                            ),
                        });
                    }
                    expected_prev = recomputed;
                }
                Err(e) => {
                    faults.push(LinkFault {
                        index,
                        block_number: link.block_number(),
                        kind: LinkFaultKind::Recompute,
                        detail: e.to_string(),
                    });
                    expected_prev = *link.curr_hash();
                }
            }
        }

        faults
    }

    /// Convenience check: `true` if the chain has no faults.
    pub fn is_intact(links: &[impl ChainLink]) -> bool {
        Self::verify(links).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::BlockHasher;

    const TEST_HASHER: BlockHasher = BlockHasher::new("rcl-test-v1");

    struct TestLink {
        number: u64,
        prev: ChainHash,
        curr: ChainHash,
        payload: Vec<u8>,
    }

    fn link_hash(prev: &ChainHash, payload: &[u8]) -> ChainHash {
        let mut bytes = prev.as_bytes().to_vec();
        bytes.extend_from_slice(payload);
        TEST_HASHER.hash_bytes(&bytes)
    }

    impl ChainLink for TestLink {
        fn block_number(&self) -> u64 {
            self.number
        }
        fn prev_hash(&self) -> &ChainHash {
            &self.prev
        }
        fn curr_hash(&self) -> &ChainHash {
            &self.curr
        }
        fn recompute_hash(&self) -> Result<ChainHash, CryptoError> {
            Ok(link_hash(&self.prev, &self.payload))
        }
    }

    fn build_chain(count: usize) -> Vec<TestLink> {
        let mut chain: Vec<TestLink> = Vec::new();
        let mut prev = ChainHash::GENESIS;
        for i in 0..count {
            let payload = format!("movement-{i}").into_bytes();
            let curr = link_hash(&prev, &payload);
            chain.push(TestLink {
                number: (i + 1) as u64,
                prev,
                curr,
                payload,
            });
            prev = curr;
        }
        chain
    }

    #[test]
    fn empty_chain_is_intact() {
        let chain: Vec<TestLink> = vec![];
        assert!(ChainVerifier::is_intact(&chain));
    }

    #[test]
    fn valid_chain_has_no_faults() {
        assert!(ChainVerifier::verify(&build_chain(10)).is_empty());
    }

    #[test]
    fn first_block_must_start_from_genesis() {
        let mut chain = build_chain(2);
        chain[0].prev = ChainHash::from_digest([9; 32]);
        let faults = ChainVerifier::verify(&chain);
        assert!(faults
            .iter()
            .any(|f| f.index == 0 && f.kind == LinkFaultKind::LinkMismatch));
    }

    #[test]
    fn tampered_payload_poisons_block_and_successor() {
        let mut chain = build_chain(5);
        chain[2].payload = b"tampered".to_vec();

        let faults = ChainVerifier::verify(&chain);
        assert_eq!(
            faults
                .iter()
                .map(|f| (f.index, f.kind))
                .collect::<Vec<_>>(),
            vec![
                (2, LinkFaultKind::HashMismatch),
                (3, LinkFaultKind::LinkMismatch),
            ]
        );
    }

    #[test]
    fn number_gap_detected() {
        let mut chain = build_chain(3);
        chain[1].number = 7;
        let faults = ChainVerifier::verify(&chain);
        assert!(faults
            .iter()
            .any(|f| f.index == 1 && f.kind == LinkFaultKind::NumberGap));
    }

    #[test]
    fn all_faults_reported_not_just_the_first() {
        let mut chain = build_chain(6);
        chain[1].payload = b"edit one".to_vec();
        chain[4].payload = b"edit two".to_vec();
        let faults = ChainVerifier::verify(&chain);
        let mismatched: Vec<usize> = faults
            .iter()
            .filter(|f| f.kind == LinkFaultKind::HashMismatch)
            .map(|f| f.index)
            .collect();
        assert_eq!(mismatched, vec![1, 4]);
    }
}
