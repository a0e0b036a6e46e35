//! Fingerprinted cache for synthesized binding surfaces.
//!
//! One surface per distinct (installation, API version) fingerprint:
//! generated on first use, published atomically, and reused verbatim ever
//! after. Concurrent generation for the same fingerprint happens once;
//! different fingerprints proceed independently.

pub mod error;
pub mod fingerprint;
pub mod store;

pub use error::CacheError;
pub use fingerprint::Fingerprint;
pub use store::SurfaceCache;
