//! Configurable binary stream decoder for data-acquisition frames
//!
//! This library sits on a continuous flow of variable-length byte frames
//! pushed from a streaming acquisition channel. Each frame's payload is
//! decoded into typed numeric samples under a runtime-selectable codec
//! (element width, signedness, byte order), the result is published as the
//! current snapshot, and registered observers are notified once per frame.
//!
//! # Architecture
//!
//! - **Codec / CodecRegistry**: validated (format, byte order) pairs with
//!   integer-indexed selection for external control surfaces
//! - **FrameDecoder**: per-frame decode, atomic snapshot publication,
//!   ordered observer notification
//! - **Delivery channel**: crossbeam-channel based frame push path with
//!   explicit end-of-stream teardown
//!
//! # Example
//!
//! ```
//! use daqdec::{ByteOrder, Codec, ElementFormat, FrameDecoder};
//!
//! let decoder = FrameDecoder::new(1024, Codec::new(ElementFormat::UInt16, ByteOrder::Little));
//! decoder.on_frame(&[0x01, 0x00, 0x02, 0x00]);
//! assert_eq!(decoder.snapshot().samples(), &[1, 2]);
//! ```

use thiserror::Error;

pub mod codec;
pub mod decoder;

pub use codec::{ByteOrder, Codec, CodecRegistry, ElementFormat};
pub use decoder::{
    FrameDecoder, FrameSender, FrameSink, ObserverId, Snapshot, StreamSubscription, connect,
};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("frame channel disconnected")]
    Disconnected,

    #[error("failed to spawn delivery thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
