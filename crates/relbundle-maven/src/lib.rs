//! Maven deployment bundle protocol: coordinate layout, artifact
//! collection, checksum sidecars, signing, packaging, and upload.

pub mod auth;
pub mod bundle;
pub mod checksum;
pub mod collect;
pub mod layout;
pub mod publish;
pub mod signing;
