mod router;
mod signature;

pub use router::router;
pub use signature::HttpSignatureVerifier;
