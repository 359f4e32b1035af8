//! Core data model and text primitives shared by every tablado crate.
//!
//! Nothing in here touches the file system or the network. The parser,
//! matcher, selector and state store all build on these types.

pub mod diagnostics;
pub mod normalize;
pub mod round;
pub mod similarity;
pub mod types;

pub use diagnostics::{Diagnostics, LogDiagnostics, MemoryDiagnostics};
pub use normalize::normalize;
pub use round::Round;
pub use similarity::similarity;
pub use types::{CandidateVideo, GroupRef, ParsedRecord, TitleStub};
