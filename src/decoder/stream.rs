//! Frame delivery channel between a stream source and a sink
//!
//! [`connect`] spawns one delivery thread that drains a bounded
//! crossbeam channel and pushes each frame into the sink serially, in
//! arrival order. End-of-stream is an explicit channel message rather than
//! a dropped sender: [`FrameSender`] is `Clone`, so a dropped clone must
//! not tear the stream down.
//!
//! Teardown ordering: [`StreamSubscription::close`] (or drop) signals
//! end-of-stream and joins the delivery thread, so once it returns no
//! further `accept_frame` call can happen and the sink may be destroyed.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, trace, warn};

use crate::{Result, StreamError};

use super::frame_decoder::FrameSink;

/// Channel message wrapper for end-of-stream signaling
#[derive(Clone, Debug)]
enum FrameMessage {
    /// One frame's payload
    Frame(Vec<u8>),
    /// No more frames will be sent
    EndOfStream,
}

/// Sending half of a frame delivery channel
#[derive(Clone)]
pub struct FrameSender {
    tx: Sender<FrameMessage>,
}

impl FrameSender {
    /// Queue one frame for delivery, blocking while the channel is full.
    ///
    /// Fails with [`StreamError::Disconnected`] once the subscription has
    /// been closed and the channel drained.
    pub fn send(&self, payload: Vec<u8>) -> Result<()> {
        self.tx
            .send(FrameMessage::Frame(payload))
            .map_err(|_| StreamError::Disconnected)
    }
}

/// Handle owning the delivery thread of one stream connection
pub struct StreamSubscription {
    tx: Sender<FrameMessage>,
    handle: Option<JoinHandle<u64>>,
}

impl StreamSubscription {
    /// Signal end-of-stream and join the delivery thread.
    ///
    /// Frames already queued are still delivered; frames sent after the
    /// end-of-stream marker are discarded. When this returns, no further
    /// `accept_frame` call will happen.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.tx.send(FrameMessage::EndOfStream);
        match handle.join() {
            Ok(delivered) => debug!(delivered, "delivery thread joined"),
            Err(_) => warn!("delivery thread panicked"),
        }
    }
}

impl Drop for StreamSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Connect a frame sink to a new bounded delivery channel.
///
/// Returns the sending half for the stream source and the subscription
/// handle that owns the delivery thread. `capacity` bounds the number of
/// in-flight frames; a full channel back-pressures the source.
pub fn connect(
    sink: Arc<dyn FrameSink>,
    capacity: usize,
) -> Result<(FrameSender, StreamSubscription)> {
    let (tx, rx) = bounded::<FrameMessage>(capacity);

    let handle = thread::Builder::new()
        .name("frame-delivery".into())
        .spawn(move || delivery_loop(rx, sink))?;

    debug!(capacity, "frame delivery channel connected");
    Ok((
        FrameSender { tx: tx.clone() },
        StreamSubscription {
            tx,
            handle: Some(handle),
        },
    ))
}

fn delivery_loop(rx: Receiver<FrameMessage>, sink: Arc<dyn FrameSink>) -> u64 {
    let mut delivered = 0u64;
    loop {
        match rx.recv() {
            Ok(FrameMessage::Frame(payload)) => {
                trace!(bytes = payload.len(), "frame delivered");
                sink.accept_frame(&payload);
                delivered += 1;
            }
            Ok(FrameMessage::EndOfStream) | Err(_) => {
                debug!(delivered, "frame stream ended");
                return delivered;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ByteOrder, Codec, ElementFormat};
    use crate::decoder::frame_decoder::FrameDecoder;
    use std::sync::Mutex;

    #[test]
    fn test_frames_delivered_in_order() {
        let decoder = Arc::new(FrameDecoder::new(
            16,
            Codec::new(ElementFormat::UInt8, ByteOrder::Little),
        ));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let decoder_cb = Arc::clone(&decoder);
        let seen_cb = Arc::clone(&seen);
        decoder.register_observer(move || {
            seen_cb
                .lock()
                .unwrap()
                .push(decoder_cb.snapshot().samples().to_vec());
        });

        let sink: Arc<dyn FrameSink> = decoder.clone();
        let (sender, subscription) = connect(sink, 8).unwrap();

        for value in 0u8..4 {
            sender.send(vec![value]).unwrap();
        }
        subscription.close();

        assert_eq!(decoder.frames_decoded(), 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![vec![0], vec![1], vec![2], vec![3]]
        );
    }

    #[test]
    fn test_send_after_close_fails() {
        let decoder = Arc::new(FrameDecoder::new(16, Codec::default()));
        let (sender, subscription) = connect(decoder.clone(), 4).unwrap();

        sender.send(vec![0x01, 0x00]).unwrap();
        subscription.close();

        assert!(matches!(
            sender.send(vec![0x02, 0x00]),
            Err(StreamError::Disconnected)
        ));
        assert_eq!(decoder.frames_decoded(), 1);
    }

    #[test]
    fn test_drop_joins_delivery_thread() {
        let decoder = Arc::new(FrameDecoder::new(16, Codec::default()));
        {
            let (sender, _subscription) = connect(decoder.clone(), 4).unwrap();
            sender.send(vec![0x01, 0x00]).unwrap();
            sender.send(vec![0x02, 0x00]).unwrap();
        }
        // Subscription dropped: queued frames were drained before the join
        assert_eq!(decoder.frames_decoded(), 2);
    }

    #[test]
    fn test_codec_switch_mid_stream() {
        let decoder = Arc::new(FrameDecoder::new(
            16,
            Codec::new(ElementFormat::UInt16, ByteOrder::Little),
        ));
        let tags = Arc::new(Mutex::new(Vec::new()));

        let decoder_cb = Arc::clone(&decoder);
        let tags_cb = Arc::clone(&tags);
        decoder.register_observer(move || {
            let snapshot = decoder_cb.snapshot();
            tags_cb
                .lock()
                .unwrap()
                .push((snapshot.samples().to_vec(), snapshot.describe()));
        });

        let (sender, subscription) = connect(decoder.clone(), 1).unwrap();
        let payload = vec![0x01, 0x00, 0x00, 0x00];

        sender.send(payload.clone()).unwrap();
        // Let the first frame decode under u16 before switching
        while decoder.frames_decoded() < 1 {
            std::thread::yield_now();
        }
        decoder.set_codec(Codec::new(ElementFormat::UInt32, ByteOrder::Little));
        sender.send(payload).unwrap();
        subscription.close();

        let tags = tags.lock().unwrap();
        assert_eq!(tags[0], (vec![1, 0], "le:u16".to_string()));
        assert_eq!(tags[1], (vec![1], "le:u32".to_string()));
    }
}
