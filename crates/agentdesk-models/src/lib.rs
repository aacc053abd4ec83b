#![deny(missing_docs)]

//! # AgentDesk Models
//!
//! Data types shared by the AgentDesk gateway client, views and mock backend.
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identity`] | Free-text identifiers (`SessionId`, `UserId`, `WorldKey`) |
//! | [`transcript`] | Chat transcript (`Role`, `TranscriptEntry`, `Transcript`, `OutgoingMessage`) |
//! | [`agent`] | Agent chat / complete / health bodies |
//! | [`records`] | User-state and world-state records and their payloads |

pub mod agent;
pub mod error;
pub mod identity;
pub mod records;
pub mod transcript;

// Re-export all public types at crate root for convenience.
pub use agent::*;
pub use error::*;
pub use identity::*;
pub use records::*;
pub use transcript::*;
