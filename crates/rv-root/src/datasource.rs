//! Memory-mapped or owned bytes backing a [`RootFile`](crate::RootFile).

use std::ops::Deref;

/// Backing storage for a ROOT file.
///
/// DQM files are opened through `Mmap`; `Owned` backs files built in memory.
pub enum DataSource {
    /// Bytes owned in a `Vec<u8>`.
    Owned(Vec<u8>),
    /// Read-only memory map.
    Mmap(memmap2::Mmap),
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            DataSource::Owned(v) => v,
            DataSource::Mmap(m) => m,
        }
    }
}
