//! Frame decoder: payload bytes in, typed sample snapshot out
//!
//! One decoder instance serves one stream connection. The source pushes
//! payloads through [`FrameSink::accept_frame`] serially, in arrival order;
//! each frame is decoded under the codec active at that moment, published
//! as the new snapshot, and every registered observer is invoked before the
//! next frame is accepted.
//!
//! Concurrency model: the frame path (`on_frame`) may run on the source's
//! delivery thread while a control path changes the codec and a read path
//! polls `snapshot()`. The codec is read exactly once per frame, so a
//! selection change applies fully before or fully after a given frame. The
//! snapshot is an `Arc` swapped under a short lock, so readers always see a
//! complete decode result, never a partial one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::codec::{Codec, CodecRegistry};

use super::observer::{ObserverId, ObserverSet};

/// Result of the most recent decode: samples plus the codec that produced them
#[derive(Debug, Clone)]
pub struct Snapshot {
    samples: Vec<i64>,
    codec: Codec,
}

impl Snapshot {
    fn empty(codec: Codec) -> Self {
        Self {
            samples: Vec::new(),
            codec,
        }
    }

    /// Decoded samples, in payload order
    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    /// The codec this snapshot was decoded under
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Diagnostic codec tag, e.g. `le:i16`. Lets a consumer detect a codec
    /// change between two reads of the same stream.
    pub fn describe(&self) -> String {
        self.codec.to_string()
    }
}

/// Push seam a stream source drives; called serially per frame
pub trait FrameSink: Send + Sync {
    /// Accept one frame's payload
    fn accept_frame(&self, payload: &[u8]);
}

/// Decodes a stream of byte frames into the latest sample snapshot
pub struct FrameDecoder {
    registry: CodecRegistry,
    snapshot: Mutex<Arc<Snapshot>>,
    observers: ObserverSet,
    frames_decoded: AtomicU64,
    /// Expected samples per frame, from the stream configuration
    size_hint: usize,
}

impl FrameDecoder {
    /// Create a decoder for one stream connection.
    ///
    /// `size_hint` is the expected number of samples per frame; larger
    /// frames still decode in full, the hint only feeds diagnostics.
    /// `default_codec` applies until the first selection change.
    pub fn new(size_hint: usize, default_codec: Codec) -> Self {
        debug!(size_hint, codec = %default_codec, "frame decoder created");
        Self {
            registry: CodecRegistry::new(default_codec),
            snapshot: Mutex::new(Arc::new(Snapshot::empty(default_codec))),
            observers: ObserverSet::new(),
            frames_decoded: AtomicU64::new(0),
            size_hint,
        }
    }

    /// Decode one frame and publish the result.
    ///
    /// Reads the active codec once, decodes `floor(len / width)` elements
    /// (trailing partial-element bytes are discarded), swaps in the new
    /// snapshot, then notifies observers in registration order. An empty
    /// payload publishes an empty snapshot and still notifies; a
    /// zero-length update is an observable event, not an error.
    pub fn on_frame(&self, payload: &[u8]) {
        let codec = self.registry.current_codec();
        let samples = codec.decode(payload);

        if samples.len() > self.size_hint {
            debug!(
                samples = samples.len(),
                hint = self.size_hint,
                "frame exceeds configured size hint"
            );
        }
        trace!(
            bytes = payload.len(),
            samples = samples.len(),
            codec = %codec,
            "frame decoded"
        );

        let snapshot = Arc::new(Snapshot { samples, codec });
        *self.snapshot.lock().unwrap() = snapshot;
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);

        // Snapshot is already published: observers pull it via snapshot().
        self.observers.notify_all();
    }

    /// The most recently published decode result.
    ///
    /// The returned snapshot is a stable reference to that decode; a frame
    /// arriving afterwards replaces the decoder's copy but never mutates
    /// this one.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    /// Codec selection shared with the control path
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Replace the codec applied to subsequent frames. The current snapshot
    /// keeps the codec it was decoded under.
    pub fn set_codec(&self, codec: Codec) {
        self.registry.set_codec(codec);
    }

    /// Register a notification callback; returns its removal handle.
    /// Callbacks run on the frame-delivery thread after each publication
    /// and may call [`snapshot`](Self::snapshot).
    pub fn register_observer(&self, callback: impl Fn() + Send + 'static) -> ObserverId {
        self.observers.register(Box::new(callback))
    }

    /// Remove a previously registered observer
    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Total frames decoded since construction
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded.load(Ordering::Relaxed)
    }
}

impl FrameSink for FrameDecoder {
    fn accept_frame(&self, payload: &[u8]) {
        self.on_frame(payload);
    }
}
