//! Tag container access
//!
//! Reading artist/album and writing front-cover pictures, both through lofty.

pub mod reader;
pub mod writer;

pub use reader::read_tags;
pub use writer::{guess_mime_type, TagWriter, COVER_DESCRIPTION};
