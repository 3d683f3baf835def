//! # 02 - Live Parameters
//!
//! Loop a click track and sweep the delay time and feedback while it plays.
//! Parameter changes are lock-free and land on the next block boundary.
//!
//! **Concepts:** Looping sources, live parameter control
//!
//! ```bash
//! cargo run --example 02_live_parameters
//! ```

use std::time::Duration;

use echoplay::prelude::*;

fn main() -> echoplay::Result<()> {
    let engine = EchoEngine::builder()
        .max_delay_seconds(1.0)
        .feedback_gain(0.5)
        .input_write_gain(0.5)
        .build()?;

    // One click every half second.
    let sample_rate = engine.sample_rate() as usize;
    let mut clip = vec![0.0f32; sample_rate / 2];
    clip[0] = 0.8;

    engine.set_source(BufferSource::new(vec![clip]).looping(true));
    engine.play();

    for step in 0..8 {
        let delay_ms = 100.0 + step as f32 * 50.0;
        engine
            .set_delay_time_ms(delay_ms)
            .set_feedback_gain(0.3 + step as f32 * 0.05);
        println!(
            "delay {} ms, feedback {:.2}",
            engine.delay_time_ms(),
            engine.feedback_gain()
        );
        std::thread::sleep(Duration::from_millis(500));
    }

    engine.stop();
    Ok(())
}
