//! Frame decoding, snapshot publication, and frame delivery

pub mod frame_decoder;
pub mod observer;
pub mod stream;

pub use frame_decoder::{FrameDecoder, FrameSink, Snapshot};
pub use observer::ObserverId;
pub use stream::{FrameSender, StreamSubscription, connect};
