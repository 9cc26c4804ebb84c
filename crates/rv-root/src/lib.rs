//! # rv-root
//!
//! Read-only ROOT file access for release-validation plotting.
//!
//! Resolves `/`-separated paths through nested TDirectories and decodes
//! TH1D/F/I/S/C objects. Payloads may be stored raw or compressed with zlib,
//! LZ4, ZSTD or XZ.
//!
//! ```no_run
//! use rv_root::RootFile;
//!
//! let f = RootFile::open("DQM_V0001_R000000001__RelVal.root").unwrap();
//! let h = f
//!     .get_histogram("DQMData/Run 1/HLT/Run summary/Tracking/ValidationWRTtp/globalEfficiencies")
//!     .unwrap();
//! println!("{} bins, {} entries", h.n_bins(), h.entries);
//! ```
//!
//! The `test-fixtures` feature adds [`writer`], a minimal writer used to
//! build DQM-shaped files in tests. It is not part of the reading API.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datasource;
pub mod decompress;
pub mod directory;
pub mod error;
pub mod file;
pub mod histogram;
pub mod key;
pub mod objects;
pub mod rbuffer;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod writer;

pub use directory::Directory;
pub use error::{Result, RootError};
pub use file::RootFile;
pub use histogram::Histogram;
pub use key::KeyInfo;
#[cfg(any(test, feature = "test-fixtures"))]
pub use writer::{Precision, RootWriter, WriteHist};
