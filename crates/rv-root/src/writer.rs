//! Minimal ROOT writer for TH1 objects in nested directories.
//!
//! Produces small-format files (32-bit seeks) laid out the way ROOT lays them
//! out, readable by [`RootFile`](crate::RootFile). Used to build DQM-shaped
//! fixtures; no streamer info, free segments or classes beyond TH1D/TH1F.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::decompress::{BLOCK_HEADER_LEN, block_header};
use crate::error::Result;
use crate::file::ROOT_MAGIC;
use crate::rbuffer::BYTE_COUNT_MASK;

/// Offset of the first record.
const BEGIN: usize = 100;
/// ROOT 6.22 small-file format version.
const FILE_VERSION: u32 = 62206;
const KEY_VERSION: u16 = 4;
const DIR_VERSION: u16 = 5;
/// Fixed fields of a small TKey header, before the three strings.
const KEY_FIXED_LEN: usize = 26;
/// TDirectory streamer: 30 bytes of fields plus a versioned 16-byte UUID.
const DIR_RECORD_LEN: usize = 48;
const DATIME: u32 = 0x7A5B_4000;
/// `kNotDeleted | kIsOnHeap`
const TOBJECT_BITS: u32 = 0x0300_0000;
const NEW_CLASS_TAG: u32 = 0xFFFF_FFFF;
const MAX_BLOCK: usize = 0xFF_FFFF;

/// Storage precision of the contents array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// `TH1D`
    Double,
    /// `TH1F`
    Float,
}

/// A histogram to write.
#[derive(Debug, Clone)]
pub struct WriteHist {
    name: String,
    title: String,
    edges: Vec<f64>,
    contents: Vec<f64>,
    sumw2: Option<Vec<f64>>,
    precision: Precision,
}

impl WriteHist {
    /// A TH1D with the given in-range contents (`edges.len() - 1` bins).
    pub fn new(name: impl Into<String>, edges: Vec<f64>, contents: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            edges,
            contents,
            sumw2: None,
            precision: Precision::Double,
        }
    }

    /// Set the object title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Store per-bin squared weights (written as `fSumw2`).
    pub fn with_sumw2(mut self, sumw2: Vec<f64>) -> Self {
        self.sumw2 = Some(sumw2);
        self
    }

    /// Store contents with the given precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    fn class_name(&self) -> &'static str {
        match self.precision {
            Precision::Double => "TH1D",
            Precision::Float => "TH1F",
        }
    }

    fn n_bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    fn is_uniform(&self) -> bool {
        let n = self.n_bins();
        if n == 0 {
            return true;
        }
        let (lo, hi) = (self.edges[0], self.edges[n]);
        let width = (hi - lo) / n as f64;
        let tol = 1e-12 * (hi.abs().max(lo.abs()).max(1.0));
        self.edges.iter().enumerate().all(|(i, e)| (e - (lo + i as f64 * width)).abs() <= tol)
    }
}

#[derive(Debug, Default)]
struct DirNode {
    name: String,
    hists: Vec<WriteHist>,
    dirs: Vec<DirNode>,
}

impl DirNode {
    fn subdir(&mut self, name: &str) -> &mut DirNode {
        let idx = match self.dirs.iter().position(|d| d.name == name) {
            Some(idx) => idx,
            None => {
                self.dirs.push(DirNode { name: name.to_string(), ..Default::default() });
                self.dirs.len() - 1
            }
        };
        &mut self.dirs[idx]
    }
}

/// Builds a ROOT file in memory.
#[derive(Debug, Default)]
pub struct RootWriter {
    top: DirNode,
    compress: bool,
}

impl RootWriter {
    /// An empty, uncompressed file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compress object payloads with zlib.
    pub fn compressed(mut self, on: bool) -> Self {
        self.compress = on;
        self
    }

    /// Add `hist` under the `/`-separated `dir` (created as needed; `""` is the top).
    pub fn add(&mut self, dir: &str, hist: WriteHist) -> &mut Self {
        let mut node = &mut self.top;
        for part in dir.split('/').filter(|s| !s.is_empty()) {
            node = node.subdir(part);
        }
        node.hists.push(hist);
        self
    }

    /// Serialize the file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; BEGIN];

        // TFile record: key, then TNamed strings, then the top TDirectory.
        let file_name = "relval.root";
        let mut named = WBuffer::default();
        named.string(file_name).string("");
        let named = named.into_inner();
        let obj_len = named.len() + DIR_RECORD_LEN;
        let header = key_header(obj_len, obj_len, BEGIN, 0, "TFile", file_name, "");
        let nbytes_name = header.len() + named.len();
        out.extend_from_slice(&header);
        out.extend_from_slice(&named);
        let dir_pos = out.len();
        out.resize(dir_pos + DIR_RECORD_LEN, 0);

        let keys = self.write_dir(&mut out, &self.top, BEGIN)?;
        let (seek_keys, nbytes_keys) = write_key_list(&mut out, &keys, BEGIN, file_name);
        let top = dir_record(nbytes_keys, nbytes_name, BEGIN, 0, seek_keys);
        out[dir_pos..dir_pos + DIR_RECORD_LEN].copy_from_slice(&top);

        let mut h = WBuffer::default();
        h.bytes(ROOT_MAGIC)
            .u32(FILE_VERSION)
            .u32(BEGIN as u32)
            .u32(out.len() as u32) // fEND
            .u32(0) // fSeekFree
            .u32(0) // fNbytesFree
            .u32(0) // nfree
            .u32(nbytes_name as u32)
            .u8(4) // fUnits
            .u32(if self.compress { 101 } else { 0 })
            .u32(0) // fSeekInfo
            .u32(0) // fNbytesInfo
            .u16(1)
            .bytes(&[0u8; 16]);
        let h = h.into_inner();
        out[..h.len()].copy_from_slice(&h);
        Ok(out)
    }

    /// Serialize and write to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Write the contents of `dir` post-order and return their key headers.
    fn write_dir(&self, out: &mut Vec<u8>, dir: &DirNode, pdir: usize) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::with_capacity(dir.hists.len() + dir.dirs.len());
        for h in &dir.hists {
            let payload = th1_payload(h);
            let stored = if self.compress { zlib_block(&payload)? } else { payload.clone() };
            let header =
                key_header(stored.len(), payload.len(), out.len(), pdir, h.class_name(), &h.name, &h.title);
            out.extend_from_slice(&header);
            out.extend_from_slice(&stored);
            keys.push(header);
        }
        for d in &dir.dirs {
            let children = self.write_dir(out, d, pdir)?;
            let (seek_keys, nbytes_keys) = write_key_list(out, &children, pdir, &d.name);
            let seek = out.len();
            let payload = dir_record(nbytes_keys, 0, seek, pdir, seek_keys);
            let header =
                key_header(payload.len(), payload.len(), seek, pdir, "TDirectoryFile", &d.name, &d.name);
            out.extend_from_slice(&header);
            out.extend_from_slice(&payload);
            keys.push(header);
        }
        Ok(keys)
    }
}

/// A TKey header. `stored_len` is the on-disk payload size, `obj_len` the inflated one.
fn key_header(
    stored_len: usize,
    obj_len: usize,
    seek_key: usize,
    seek_pdir: usize,
    class_name: &str,
    name: &str,
    title: &str,
) -> Vec<u8> {
    let mut strings = WBuffer::default();
    strings.string(class_name).string(name).string(title);
    let strings = strings.into_inner();
    let key_len = KEY_FIXED_LEN + strings.len();

    let mut w = WBuffer::default();
    w.u32((key_len + stored_len) as u32)
        .u16(KEY_VERSION)
        .u32(obj_len as u32)
        .u32(DATIME)
        .u16(key_len as u16)
        .u16(1)
        .u32(seek_key as u32)
        .u32(seek_pdir as u32)
        .bytes(&strings);
    w.into_inner()
}

/// Append a key list record; returns `(seek_keys, nbytes_keys)`.
fn write_key_list(out: &mut Vec<u8>, keys: &[Vec<u8>], pdir: usize, dir_name: &str) -> (usize, usize) {
    let mut body = WBuffer::default();
    body.u32(keys.len() as u32);
    for k in keys {
        body.bytes(k);
    }
    let body = body.into_inner();
    let seek = out.len();
    let header = key_header(body.len(), body.len(), seek, pdir, "TDirectory", dir_name, "");
    let n_bytes = header.len() + body.len();
    out.extend_from_slice(&header);
    out.extend_from_slice(&body);
    (seek, n_bytes)
}

fn dir_record(nbytes_keys: usize, nbytes_name: usize, seek_dir: usize, seek_parent: usize, seek_keys: usize) -> Vec<u8> {
    let mut w = WBuffer::default();
    w.u16(DIR_VERSION)
        .u32(DATIME)
        .u32(DATIME)
        .u32(nbytes_keys as u32)
        .u32(nbytes_name as u32)
        .u32(seek_dir as u32)
        .u32(seek_parent as u32)
        .u32(seek_keys as u32)
        .u16(1)
        .bytes(&[0u8; 16]);
    w.into_inner()
}

fn zlib_block(payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > MAX_BLOCK {
        return Ok(payload.to_vec());
    }
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(payload)?;
    let compressed = enc.finish()?;
    if compressed.len() + BLOCK_HEADER_LEN >= payload.len() {
        // ROOT stores incompressible payloads as-is.
        return Ok(payload.to_vec());
    }
    let mut block = block_header(b"ZL", 8, compressed.len(), payload.len()).to_vec();
    block.extend_from_slice(&compressed);
    Ok(block)
}

fn th1_payload(h: &WriteHist) -> Vec<u8> {
    let n_bins = h.n_bins();
    let n_cells = n_bins + 2;
    let with_flows = |v: &[f64]| {
        let mut cells = vec![0.0; n_cells];
        for (dst, src) in cells[1..=n_bins].iter_mut().zip(v) {
            *dst = *src;
        }
        cells
    };
    let contents = with_flows(&h.contents);
    let sumw2 = h.sumw2.as_deref().map(with_flows).unwrap_or_default();

    let mut w = WBuffer::default();
    w.object(3, |w| {
        w.object(8, |w| {
            w.tnamed(&h.name, &h.title);
            w.object(2, |w| {
                w.i16(602).i16(1).i16(1); // TAttLine
            });
            w.object(2, |w| {
                w.i16(0).i16(1001); // TAttFill
            });
            w.object(2, |w| {
                w.i16(1).i16(1).f32(1.0); // TAttMarker
            });
            w.i32(n_cells as i32);

            let (lo, hi) = (h.edges.first().copied().unwrap_or(0.0), h.edges.last().copied().unwrap_or(1.0));
            let xbins: &[f64] = if h.is_uniform() { &[] } else { &h.edges };
            w.taxis("xaxis", n_bins, lo, hi, xbins);
            w.taxis("yaxis", 1, 0.0, 1.0, &[]);
            w.taxis("zaxis", 1, 0.0, 1.0, &[]);

            let total: f64 = h.contents.iter().sum();
            w.i16(0).i16(1000);
            w.f64(total); // fEntries
            w.f64(total).f64(total).f64(0.0).f64(0.0); // fTsumw .. fTsumwx2
            w.f64(-1111.0).f64(-1111.0); // fMaximum, fMinimum
            w.f64(0.0); // fNormFactor
            w.tarray_f64(&[]); // fContour
            w.tarray_f64(&sumw2);
            w.string(""); // fOption
            w.tagged_object("TList", 5, |w| {
                w.tobject();
                w.string("").i32(0);
            });
            w.i32(0).u8(0); // fBufferSize, fBuffer
            w.i32(0); // fBinStatErrOpt
            w.i32(2); // fStatOverflows
        });

        w.u32(n_cells as u32);
        for c in &contents {
            match h.precision {
                Precision::Double => w.f64(*c),
                Precision::Float => w.f32(*c as f32),
            };
        }
    });
    w.into_inner()
}

/// Big-endian output buffer, the write-side counterpart of `RBuffer`.
#[derive(Default)]
struct WBuffer {
    buf: Vec<u8>,
}

macro_rules! write_be {
    ($name:ident, $ty:ty) => {
        fn $name(&mut self, v: $ty) -> &mut Self {
            self.buf.extend_from_slice(&v.to_be_bytes());
            self
        }
    };
}

impl WBuffer {
    write_be!(u8, u8);
    write_be!(u16, u16);
    write_be!(i16, i16);
    write_be!(u32, u32);
    write_be!(i32, i32);
    write_be!(f32, f32);
    write_be!(f64, f64);

    fn bytes(&mut self, b: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(b);
        self
    }

    fn string(&mut self, s: &str) -> &mut Self {
        if s.len() < 255 {
            self.u8(s.len() as u8);
        } else {
            self.u8(255).u32(s.len() as u32);
        }
        self.bytes(s.as_bytes())
    }

    /// Write `body` behind a version header carrying its byte count.
    fn object(&mut self, version: u16, body: impl FnOnce(&mut Self)) -> &mut Self {
        let start = self.buf.len();
        self.u32(0).u16(version);
        body(self);
        self.patch_count(start);
        self
    }

    /// An object pointer streamed with a new-class tag.
    fn tagged_object(&mut self, class: &str, version: u16, body: impl FnOnce(&mut Self)) -> &mut Self {
        let start = self.buf.len();
        self.u32(0).u32(NEW_CLASS_TAG).bytes(class.as_bytes()).u8(0);
        self.object(version, body);
        self.patch_count(start);
        self
    }

    fn patch_count(&mut self, start: usize) {
        let count = (self.buf.len() - start - 4) as u32 | BYTE_COUNT_MASK;
        self.buf[start..start + 4].copy_from_slice(&count.to_be_bytes());
    }

    fn tobject(&mut self) -> &mut Self {
        self.u16(1).u32(0).u32(TOBJECT_BITS)
    }

    fn tnamed(&mut self, name: &str, title: &str) -> &mut Self {
        self.object(1, |w| {
            w.tobject().string(name).string(title);
        })
    }

    fn tarray_f64(&mut self, v: &[f64]) -> &mut Self {
        self.u32(v.len() as u32);
        for x in v {
            self.f64(*x);
        }
        self
    }

    fn taxis(&mut self, name: &str, n_bins: usize, lo: f64, hi: f64, xbins: &[f64]) -> &mut Self {
        self.object(10, |w| {
            w.tnamed(name, "");
            w.object(4, |w| {
                // TAttAxis: divisions, colors, fonts, offsets, sizes
                w.i32(510).i16(1).i16(1).i16(42);
                w.f32(0.005).f32(0.035).f32(0.03).f32(1.0).f32(0.035);
                w.i16(1).i16(42);
            });
            w.i32(n_bins as i32).f64(lo).f64(hi).tarray_f64(xbins);
            w.i32(0).i32(0).u16(0).u8(0).string(""); // fFirst, fLast, fBits2, fTimeDisplay, fTimeFormat
            w.u32(0).u32(0); // fLabels, fModLabs
        })
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
