//! Release decision pipeline stages
//!
//! Each stage consumes the previous stage's output only:
//! baseline -> resolver -> classifier -> version bump -> tag publisher ->
//! changelog -> release publisher. The classifier lives in
//! [crate::analyzer]; the version bump is [crate::domain::Version::bump].

pub mod baseline;
pub mod changelog;
pub mod publisher;
pub mod resolver;
pub mod tag_publisher;

pub use baseline::{read_baseline, Baseline};
pub use changelog::Changelog;
pub use publisher::{release_title, ReleasePublisher};
pub use resolver::{Resolution, Trigger};
pub use tag_publisher::{TagOutcome, TagPublisher};
