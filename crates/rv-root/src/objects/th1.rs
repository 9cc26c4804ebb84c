//! TH1{D,F,I,S,C} streamers.
//!
//! ```text
//! TH1x (version + byte count)
//!   TH1 (version + byte count)
//!     TNamed, TAttLine, TAttFill, TAttMarker
//!     fNcells
//!     fXaxis, fYaxis, fZaxis            (TAxis)
//!     fBarOffset, fBarWidth             (i16)
//!     fEntries .. fTsumwx2              (f64 x5)
//!     fMaximum, fMinimum                (v >= 2)
//!     fNormFactor                       (v >= 3)
//!     fContour, fSumw2                  (TArrayD)
//!     fOption                           (TString)
//!     fFunctions                        (TList)
//!     fBufferSize, fBuffer              (v >= 4)
//!     fBinStatErrOpt                    (v >= 7)
//!     fStatOverflows                    (v >= 8)
//!   TArrayx                             (fN + contents, no header)
//! ```

use crate::error::{Result, RootError};
use crate::histogram::Histogram;
use crate::rbuffer::RBuffer;

/// Element type of the trailing contents array.
#[derive(Debug, Clone, Copy)]
pub(super) enum Contents {
    F64,
    F32,
    I32,
    I16,
    I8,
}

struct Axis {
    n_bins: usize,
    x_min: f64,
    x_max: f64,
    /// Variable edges; empty for uniform binning.
    edges: Vec<f64>,
}

struct Th1Base {
    name: String,
    title: String,
    n_cells: usize,
    axis: Axis,
    entries: f64,
    sumw2: Vec<f64>,
}

pub(super) fn read(payload: &[u8], contents: Contents) -> Result<Histogram> {
    let mut r = RBuffer::new(payload);
    let (version, _end) = r.read_version()?;
    if version < 1 {
        return Err(RootError::Deserialization(format!("TH1 subclass version {version}")));
    }

    let base = read_th1(&mut r)?;

    let n = r.read_u32()? as usize;
    if n != base.n_cells {
        return Err(RootError::Deserialization(format!(
            "contents array has {n} cells, fNcells is {}",
            base.n_cells
        )));
    }
    let raw = match contents {
        Contents::F64 => r.read_array(n, RBuffer::read_f64)?,
        Contents::F32 => r.read_array(n, RBuffer::read_f32)?,
        Contents::I32 => r.read_array(n, RBuffer::read_i32)?,
        Contents::I16 => r.read_array(n, RBuffer::read_i16)?,
        Contents::I8 => r.read_array(n, RBuffer::read_i8)?,
    };

    build(base, &raw)
}

fn read_th1(r: &mut RBuffer) -> Result<Th1Base> {
    let (version, end) = r.read_version()?;

    let (name, title) = r.read_tnamed()?;
    r.skip_object()?; // TAttLine
    r.skip_object()?; // TAttFill
    r.skip_object()?; // TAttMarker

    let n_cells = r.read_i32()?;
    let n_cells = usize::try_from(n_cells)
        .map_err(|_| RootError::Deserialization(format!("negative fNcells {n_cells}")))?;

    let axis = read_axis(r)?;
    r.skip_object()?; // fYaxis
    r.skip_object()?; // fZaxis

    let _bar_offset = r.read_i16()?;
    let _bar_width = r.read_i16()?;
    let entries = r.read_f64()?;
    r.skip(4 * 8)?; // fTsumw, fTsumw2, fTsumwx, fTsumwx2
    if version >= 2 {
        r.skip(2 * 8)?; // fMaximum, fMinimum
    }
    if version >= 3 {
        r.skip(8)?; // fNormFactor
    }

    let _contour = r.read_tarray_f64()?;
    let sumw2 = r.read_tarray_f64()?;
    let _option = r.read_string()?;
    r.skip_object()?; // fFunctions

    match end {
        Some(end) => r.set_pos(end)?,
        None => skip_trailer(r, version)?,
    }

    Ok(Th1Base { name, title, n_cells, axis, entries, sumw2 })
}

/// Walk the fields after fFunctions when no byte count bounds the TH1.
fn skip_trailer(r: &mut RBuffer, version: u16) -> Result<()> {
    if version >= 4 {
        let buffer_size = r.read_i32()?;
        r.skip(1)?; // array marker
        if buffer_size > 0 {
            r.skip(buffer_size as usize * 8)?;
        }
    }
    if version >= 7 {
        let _err_opt = r.read_i32()?;
    }
    if version >= 8 {
        let _stat_overflows = r.read_i32()?;
    }
    Ok(())
}

fn read_axis(r: &mut RBuffer) -> Result<Axis> {
    let (_version, end) = r.read_version()?;
    r.read_tnamed()?;
    r.skip_object()?; // TAttAxis

    let n_bins = r.read_i32()?;
    let n_bins = usize::try_from(n_bins)
        .map_err(|_| RootError::Deserialization(format!("negative fNbins {n_bins}")))?;
    let x_min = r.read_f64()?;
    let x_max = r.read_f64()?;
    let edges = r.read_tarray_f64()?;

    // fFirst, fLast, fBits2, fTimeDisplay, fTimeFormat, fLabels, fModLabs
    if let Some(end) = end {
        r.set_pos(end)?;
    }

    Ok(Axis { n_bins, x_min, x_max, edges })
}

/// Strip under/overflow and materialize the bin edges.
fn build(base: Th1Base, raw: &[f64]) -> Result<Histogram> {
    let n_bins = base.axis.n_bins;
    if raw.len() < n_bins + 2 {
        return Err(RootError::Deserialization(format!(
            "{} cells cannot hold {n_bins} bins plus under/overflow",
            raw.len()
        )));
    }

    let bin_content = raw[1..=n_bins].to_vec();
    let sumw2 = match base.sumw2.len() {
        0 => None,
        len if len == raw.len() => Some(base.sumw2[1..=n_bins].to_vec()),
        len => {
            return Err(RootError::Deserialization(format!(
                "fSumw2 has {len} cells, fNcells is {}",
                raw.len()
            )));
        }
    };

    let bin_edges = if base.axis.edges.len() == n_bins + 1 {
        base.axis.edges
    } else {
        let Axis { x_min, x_max, .. } = base.axis;
        let width = (x_max - x_min) / n_bins as f64;
        (0..=n_bins).map(|i| x_min + i as f64 * width).collect()
    };

    Ok(Histogram {
        name: base.name,
        title: base.title,
        bin_edges,
        bin_content,
        sumw2,
        entries: base.entries,
    })
}
