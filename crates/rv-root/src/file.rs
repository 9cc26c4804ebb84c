//! TFile header parsing and path-based object lookup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::datasource::DataSource;
use crate::decompress::decompress;
use crate::directory::{DirHeader, Directory};
use crate::error::{Result, RootError};
use crate::histogram::Histogram;
use crate::key::{Key, KeyInfo};
use crate::objects;
use crate::rbuffer::RBuffer;

pub(crate) const ROOT_MAGIC: &[u8; 4] = b"root";

/// File format versions at or above this use 64-bit seek pointers.
pub(crate) const LARGE_FILE_VERSION: u32 = 1_000_000;

/// Smallest byte count that can hold a file header.
const MIN_FILE_LEN: usize = 64;

struct FileHeader {
    is_large: bool,
    top_dir: DirHeader,
}

/// A ROOT file opened read-only.
pub struct RootFile {
    data: DataSource,
    header: FileHeader,
    path: PathBuf,
}

impl std::fmt::Debug for RootFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootFile").field("path", &self.path).field("len", &self.data.len()).finish()
    }
}

impl RootFile {
    /// Open a ROOT file through a read-only memory map.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        // SAFETY: the map is read-only; DQM files are not modified while plotted.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        let parsed = Self::from_source(DataSource::Mmap(mmap), path)?;
        tracing::debug!(path = %parsed.path.display(), bytes = parsed.data.len(), "opened ROOT file");
        Ok(parsed)
    }

    /// Parse a ROOT file held in memory.
    pub fn from_bytes(data: Vec<u8>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_source(DataSource::Owned(data), path.into())
    }

    fn from_source(data: DataSource, path: PathBuf) -> Result<Self> {
        if data.len() < MIN_FILE_LEN || &data[..4] != ROOT_MAGIC {
            return Err(RootError::BadMagic);
        }
        let header = parse_header(&data)?;
        Ok(Self { data, header, path })
    }

    /// Path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keys of the top-level directory.
    pub fn list_keys(&self) -> Result<Vec<KeyInfo>> {
        Ok(self.top_directory()?.list())
    }

    /// Resolve a `/`-separated directory path. An empty path is the top directory.
    pub fn get_directory(&self, path: &str) -> Result<Directory> {
        let mut dir = self.top_directory()?;
        for part in split_path(path) {
            let key = dir
                .find_key(part)
                .ok_or_else(|| RootError::KeyNotFound(format!("{part} (in {path})")))?;
            dir = self.read_subdirectory(key, path)?;
        }
        Ok(dir)
    }

    /// Read a histogram by its full `/`-separated path.
    pub fn get_histogram(&self, path: &str) -> Result<Histogram> {
        let (dir_path, name) = match path.trim_end_matches('/').rsplit_once('/') {
            Some((dir, name)) => (dir, name),
            None => ("", path),
        };
        let dir = self.get_directory(dir_path)?;
        self.get_histogram_in(&dir, name).map_err(|e| match e {
            RootError::KeyNotFound(_) => RootError::KeyNotFound(path.to_string()),
            other => other,
        })
    }

    /// Read a histogram by name from an already-resolved directory.
    pub fn get_histogram_in(&self, dir: &Directory, name: &str) -> Result<Histogram> {
        let key = dir.find_key(name).ok_or_else(|| RootError::KeyNotFound(name.to_string()))?;
        let payload = self.read_key_payload(key)?;
        objects::read_histogram(&payload, &key.class_name)
    }

    fn top_directory(&self) -> Result<Directory> {
        Directory::read_key_list(&self.data, self.header.top_dir, self.header.is_large)
    }

    fn read_subdirectory(&self, key: &Key, path: &str) -> Result<Directory> {
        if !key.is_directory() {
            return Err(RootError::Deserialization(format!(
                "'{}' in {path} is a {}, not a directory",
                key.name, key.class_name
            )));
        }
        let payload = self.read_key_payload(key)?;
        Directory::read_from_payload(&payload, &self.data, self.header.is_large)
    }

    fn read_key_payload(&self, key: &Key) -> Result<Vec<u8>> {
        let start = key.seek_key as usize;
        let end = start.saturating_add(key.n_bytes as usize);
        let record = self.data.get(start..end).ok_or(RootError::BufferUnderflow {
            offset: start,
            need: key.n_bytes as usize,
            have: self.data.len().saturating_sub(start),
        })?;
        let body = record.get(key.key_len as usize..).ok_or_else(|| {
            RootError::Deserialization(format!("key '{}' shorter than its header", key.name))
        })?;

        if key.is_compressed() { decompress(body, key.obj_len as usize) } else { Ok(body.to_vec()) }
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Parse the file header and the top TDirectory at `fBEGIN + fNbytesName`.
///
/// ```text
/// "root" | fVersion | fBEGIN | fEND | fSeekFree | fNbytesFree | nfree
///        | fNbytesName | fUnits | fCompress | fSeekInfo | fNbytesInfo | fUUID
/// ```
/// `fEND`, `fSeekFree` and `fSeekInfo` are 64-bit in large files.
fn parse_header(data: &[u8]) -> Result<FileHeader> {
    let mut r = RBuffer::new(data);
    r.skip(4)?;

    let version = r.read_u32()?;
    let is_large = version >= LARGE_FILE_VERSION;
    let begin = r.read_u32()? as usize;
    r.skip(if is_large { 16 } else { 8 })?; // fEND, fSeekFree
    let _nbytes_free = r.read_u32()?;
    let _nfree = r.read_u32()?;
    let nbytes_name = r.read_u32()? as usize;

    let dir_pos = begin + nbytes_name;
    if dir_pos >= data.len() {
        return Err(RootError::Deserialization("top directory lies past end of file".into()));
    }
    r.set_pos(dir_pos)?;
    let top_dir = DirHeader::read(&mut r)?;

    Ok(FileHeader { is_large, top_dir })
}
