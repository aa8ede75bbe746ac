//! Stable-id storage shared by bodies, fixtures, contacts and joints.

mod arena;

pub use arena::{Arena, Index};
