mod bond;
mod bond_generator;
mod config;
mod engine;
pub mod error;
mod metadata;
mod progress;
mod replay;
pub mod serialize;
mod sink;
mod snapshot;

pub use bond::{candidate_bonds, Bond, Orientation};
pub use bond_generator::*;
pub use config::*;
pub use engine::*;
pub use metadata::*;
pub use progress::*;
pub use replay::*;
pub use serialize::{OutputFormat, Serializer};
pub use sink::*;
pub use snapshot::*;
