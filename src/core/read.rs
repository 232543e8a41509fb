#[cfg(test)]
use mockall::mock;
use rust_htslib::bam::record::CigarStringView;
use rust_htslib::bam::Record;

/// Alignment record as seen by the counting engine.
#[allow(clippy::len_without_is_empty)]
pub trait AlignedRead {
    fn name(&self) -> &[u8];
    // 0-based leftmost reference position
    fn pos(&self) -> i64;
    fn cigar(&self) -> CigarStringView;
    // Query sequence. Empty if the sequence is not stored (SEQ = *)
    fn seq(&self) -> Vec<u8>;
    fn len(&self) -> usize;
    fn template_len(&self) -> i64;
}

#[cfg(test)]
mock! {
    pub Read {}
    impl AlignedRead for Read {
        fn name(&self) -> &[u8];
        fn pos(&self) -> i64;
        fn cigar(&self) -> CigarStringView;
        fn seq(&self) -> Vec<u8>;
        fn len(&self) -> usize;
        fn template_len(&self) -> i64;
    }
}

impl AlignedRead for Record {
    #[inline]
    fn name(&self) -> &[u8] {
        self.qname()
    }

    #[inline]
    fn pos(&self) -> i64 {
        self.pos()
    }

    #[inline]
    fn cigar(&self) -> CigarStringView {
        self.cigar()
    }

    #[inline]
    fn seq(&self) -> Vec<u8> {
        self.seq().as_bytes()
    }

    #[inline]
    fn len(&self) -> usize {
        self.seq_len()
    }

    #[inline]
    fn template_len(&self) -> i64 {
        self.insert_size()
    }
}
