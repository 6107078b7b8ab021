//! Codec selection: element formats, byte orders, and the indexed registry

pub mod format;
pub mod registry;

pub use format::{ByteOrder, Codec, ElementFormat};
pub use registry::CodecRegistry;
