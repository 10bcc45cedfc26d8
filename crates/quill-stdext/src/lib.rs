//! Data structures and algorithms shared by the Quillcraft crates.

pub mod algorithms;
pub mod collections;
pub mod color;
