//! Main module for unnest library functionality

pub mod building;
pub mod error;
pub mod extraction;
pub mod flattening;
pub mod formats;
pub mod line;
pub mod loader;
pub mod markers;
pub mod testing;
pub mod tree;

pub use building::build;
pub use error::FlattenError;
pub use extraction::{extract, locate_declarations};
pub use flattening::{flatten, FlatDeclaration};
pub use line::{split_lines, Line};
pub use loader::{flatten_one, LoaderError, SourceLoader};
pub use markers::Markers;
pub use tree::{Node, NodeId, Tree};
