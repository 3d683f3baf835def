//! # 01 - Echo Playback
//!
//! Play a short sine burst through the delay line and let the echo tail
//! ring out.
//!
//! **Concepts:** Engine setup, sources, transport
//!
//! ```bash
//! cargo run --example 01_echo_playback
//! ```

use std::time::Duration;

use echoplay::prelude::*;

fn main() -> echoplay::Result<()> {
    let engine = EchoEngine::builder()
        .delay_time_ms(350.0)
        .feedback_gain(0.6)
        .build()?;

    // 250 ms sine burst at 440 Hz, faded so the echoes decay cleanly.
    let sample_rate = engine.sample_rate() as f32;
    let len = (sample_rate * 0.25) as usize;
    let burst: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let fade = 1.0 - i as f32 / len as f32;
            (t * 440.0 * std::f32::consts::TAU).sin() * 0.5 * fade
        })
        .collect();

    engine.set_source(BufferSource::new(vec![burst]));
    engine.play();
    println!("Playing 440 Hz burst with 350 ms echo...");
    std::thread::sleep(Duration::from_secs(4));

    engine.stop();
    Ok(())
}
