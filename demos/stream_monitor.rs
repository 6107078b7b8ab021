//! Stream monitor demo
//!
//! Feeds synthetic ramp frames through a delivery channel and prints the
//! decoder's snapshot after each one, switching the codec halfway through
//! to show a mid-stream selection change.
//!
//! Usage:
//!   cargo run --example stream_monitor -- --frames 8 --samples 6

use std::sync::Arc;

use clap::Parser;
use daqdec::{ByteOrder, Codec, ElementFormat, FrameDecoder, FrameSink, connect};

#[derive(Parser, Debug)]
#[command(about = "Decode synthetic frames and print each snapshot")]
struct Args {
    /// Number of frames to push
    #[arg(long, default_value_t = 8)]
    frames: u32,

    /// Samples per frame
    #[arg(long, default_value_t = 6)]
    samples: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let decoder = Arc::new(FrameDecoder::new(
        args.samples as usize,
        Codec::new(ElementFormat::UInt16, ByteOrder::Little),
    ));

    let monitor = Arc::clone(&decoder);
    decoder.register_observer(move || {
        let snapshot = monitor.snapshot();
        println!(
            "frame {:>3} [{}] {:?}",
            monitor.frames_decoded(),
            snapshot.describe(),
            snapshot.samples()
        );
    });

    let sink: Arc<dyn FrameSink> = decoder.clone();
    let (sender, subscription) = connect(sink, 4)?;

    for frame in 0..args.frames {
        if frame == args.frames / 2 {
            decoder.registry().select_byte_order(1); // big-endian
        }
        let mut payload = Vec::with_capacity(args.samples as usize * 2);
        for sample in 0..args.samples {
            payload.extend_from_slice(&(frame as u16 * 100 + sample).to_le_bytes());
        }
        sender.send(payload)?;
    }

    subscription.close();
    println!("decoded {} frames", decoder.frames_decoded());
    Ok(())
}
