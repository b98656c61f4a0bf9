//! # NMEA 0183 Navigation Data
//!
//! This library turns the ASCII sentences of a multi-constellation GNSS receiver
//! into validated, typed and serialized navigation records:
//! `$AATTT,D1,D2,...,Dn*CC\r\n`
//!
//! Each line goes through these stages:
//! - Frame validation: `$` start, `*CC` trailer, XOR checksum, length limit
//! - Reassembly of a sentence split across two lines
//! - Routing on the address token to one of ten sentence parsers
//! - Field validation, where bad values are logged and clamped instead of failing
//! - Serialization into a versioned binary payload
//!
//! ## Usage
//!
//! ```rust
//! use nmea0183_navdata::{NavigationEngine, NmeaSentence, ParseResult};
//!
//! let mut engine = NavigationEngine::new();
//! let record = engine.process_line(
//!     "$GNRMC,052714.00,A,5624.91149,N,06153.42199,E,0.120,,061224,,,A,V*16\r\n",
//! );
//!
//! assert_eq!(record.result(), ParseResult::Ok);
//! match record.decode().unwrap() {
//!     NmeaSentence::RMC(rmc) => {
//!         assert!(rmc.is_valid);
//!         assert!((rmc.latitude - 56.4152).abs() < 1e-4);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! Diagnostics go to a [`LogSink`](diagnostics::LogSink); the default one
//! forwards to the [`log`] crate.

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod format;
mod nmea0183;
pub mod nmea_content;
pub mod parsing;
pub mod reassembler;
pub mod record;
pub mod wire;

pub use engine::{NavigationEngine, NavigationEngineBuilder};
pub use error::{DecodeError, Error, FieldError, FrameError, IResult, ParseFailure};
pub use nmea0183::{
    FrameValidator, LineEndingMode, MAX_LINE_LENGTH, MIN_LINE_LENGTH, RawSentence, checksum,
    validate_frame,
};
pub use nmea_content::{MessageType, NmeaSentence, parse::normalize_angle};
pub use record::{NavigationRecord, ParseResult};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;

#[cfg(test)]
mod tests {
    pub(crate) mod support;

    mod engine;
    mod reassembly;
    mod wire_roundtrip;
}
