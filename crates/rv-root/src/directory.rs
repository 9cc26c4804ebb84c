//! TDirectory streamers and key-list navigation.

use crate::error::Result;
use crate::key::{Key, KeyInfo};
use crate::rbuffer::RBuffer;

/// TDirectory versions above this use 64-bit seek pointers.
const LARGE_DIR_VERSION: u16 = 1000;

/// Location of a directory's key list, as recorded in its TDirectory streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirHeader {
    /// Absolute position of the key list.
    pub seek_keys: u64,
    /// Size of the key list record.
    pub nbytes_keys: u32,
}

impl DirHeader {
    /// Parse the leading fields of a TDirectory streamer at the cursor.
    pub fn read(r: &mut RBuffer) -> Result<Self> {
        let version = r.read_u16()?;
        let _datime_c = r.read_u32()?;
        let _datime_m = r.read_u32()?;
        let nbytes_keys = r.read_u32()?;
        let _nbytes_name = r.read_u32()?;

        let seek_keys = if version > LARGE_DIR_VERSION {
            let _seek_dir = r.read_u64()?;
            let _seek_parent = r.read_u64()?;
            r.read_u64()?
        } else {
            let _seek_dir = r.read_u32()?;
            let _seek_parent = r.read_u32()?;
            r.read_u32()? as u64
        };

        Ok(Self { seek_keys, nbytes_keys })
    }
}

/// A directory: the ordered list of keys it holds.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    keys: Vec<Key>,
}

impl Directory {
    /// Read the key list pointed to by `header`.
    ///
    /// The list is stored as a TKey header for the list itself, a u32 key
    /// count, then one TKey per entry.
    pub fn read_key_list(file_data: &[u8], header: DirHeader, is_large: bool) -> Result<Self> {
        if header.seek_keys == 0 {
            return Ok(Self::default());
        }

        let mut r = RBuffer::new(file_data);
        r.set_pos(header.seek_keys as usize)?;

        let _list_key = Key::read(&mut r, is_large)?;
        let nkeys = r.read_u32()? as usize;

        let mut keys = Vec::with_capacity(nkeys.min(r.remaining()));
        for _ in 0..nkeys {
            keys.push(Key::read(&mut r, is_large)?);
        }
        Ok(Self { keys })
    }

    /// Read a subdirectory from the payload of its TDirectoryFile key.
    pub fn read_from_payload(payload: &[u8], file_data: &[u8], is_large: bool) -> Result<Self> {
        let header = DirHeader::read(&mut RBuffer::new(payload))?;
        Self::read_key_list(file_data, header, is_large)
    }

    /// All keys, in file order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Public listing of the keys.
    pub fn list(&self) -> Vec<KeyInfo> {
        self.keys.iter().map(KeyInfo::from).collect()
    }

    /// Find a key by name, preferring the highest cycle.
    pub fn find_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }
}
