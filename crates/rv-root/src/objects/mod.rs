//! Streamed-object decoding, dispatched on the key's class name.

mod th1;

use crate::error::{Result, RootError};
use crate::histogram::Histogram;

/// TH1 classes this reader decodes.
pub const HISTOGRAM_CLASSES: &[&str] = &["TH1D", "TH1F", "TH1I", "TH1S", "TH1C"];

/// Decode a histogram from a decompressed payload.
pub fn read_histogram(payload: &[u8], class_name: &str) -> Result<Histogram> {
    match class_name {
        "TH1D" => th1::read(payload, th1::Contents::F64),
        "TH1F" => th1::read(payload, th1::Contents::F32),
        "TH1I" => th1::read(payload, th1::Contents::I32),
        "TH1S" => th1::read(payload, th1::Contents::I16),
        "TH1C" => th1::read(payload, th1::Contents::I8),
        _ => Err(RootError::UnsupportedClass(class_name.to_string())),
    }
}
