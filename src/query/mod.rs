pub mod search;

pub use search::{SearchMatch, search};
