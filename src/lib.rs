//! Threshold secret sharing over GF(p) with error-tolerant reconstruction.
//!
//! [`split`] turns a secret into `n` shares of which any `t` recover it via
//! [`interpolate_at`]; [`decode`] recovers the sharing polynomial even when
//! some shares were corrupted (Berlekamp-Welch).

pub mod berlekamp_welch;
pub mod error;
pub mod field;
pub mod interpolate;
pub mod linalg;
pub mod polynomial;
pub mod session;
pub mod sss;

pub use berlekamp_welch::*;
pub use error::*;
pub use field::*;
pub use interpolate::*;
pub use polynomial::*;
pub use session::{SchemeConfig, SharingReport};
pub use sss::*;
