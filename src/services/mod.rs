//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own filesystem concerns so route handlers can stay
//! focused on multipart decoding and status mapping.

pub mod accounts;
pub mod upload;
