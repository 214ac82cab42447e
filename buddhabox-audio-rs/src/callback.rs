//! Per-sample orchestration: pending update → multiplexer → volume → sink.

use crate::engine::{scale, SampleEngine};
use crate::shared::AudioPort;

/// Destination for one unsigned amplitude per sample period.
///
/// What the level means (PWM duty, DAC code) is up to the implementor.
/// Implementations run in the highest-priority context and must not block.
pub trait AudioSink {
    fn write_level(&mut self, level: u8);
}

impl<S: AudioSink + ?Sized> AudioSink for &mut S {
    fn write_level(&mut self, level: u8) {
        (**self).write_level(level);
    }
}

/// The audio callback: owns the sample engine and the output sink.
///
/// [`AudioCallback::run()`] is meant to be called once per output-sample
/// period from the highest-priority context. It does not block, allocate,
/// recurse or log.
pub struct AudioCallback<'a, S> {
    engine: SampleEngine,
    port: AudioPort<'a>,
    sink: S,
}

impl<'a, S> AudioCallback<'a, S>
where
    S: AudioSink,
{
    pub fn new(engine: SampleEngine, port: AudioPort<'a>, sink: S) -> Self {
        Self { engine, port, sink }
    }

    /// Produce and emit one sample. Returns the level written to the sink.
    ///
    /// 1. If PendingUpdate is set, clear it and reset playback for the new
    ///    mode (tone modes also load their preset increment).
    /// 2. Generate a raw sample for the current mode.
    /// 3. Scale by the live volume.
    /// 4. Write to the sink.
    #[inline]
    pub fn run(&mut self) -> u8 {
        let pending = self.port.take_pending();
        let mode = self.port.mode();
        if pending {
            self.engine.enter_mode(mode);
        }

        let raw = self.engine.next_sample(mode);
        let level = scale(raw, self.port.volume());
        self.sink.write_level(level);
        level
    }

    pub fn engine(&self) -> &SampleEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{frequency_word, EngineConfig, PcmBank, PcmClip, PCM_CLIP_COUNT};
    use crate::mode::AudioMode;
    use crate::shared::SharedState;

    static CLIP: [u8; 2] = [0x7F, 0x00];

    /// Sink that keeps the last level and a count of writes.
    #[derive(Default)]
    struct Probe {
        last: Option<u8>,
        writes: usize,
    }

    impl AudioSink for Probe {
        fn write_level(&mut self, level: u8) {
            self.last = Some(level);
            self.writes += 1;
        }
    }

    fn make_engine() -> SampleEngine {
        let bank = PcmBank::new([PcmClip::new(&CLIP); PCM_CLIP_COUNT]).unwrap();
        SampleEngine::new(&EngineConfig::default(), bank).unwrap()
    }

    #[test]
    fn every_run_writes_exactly_one_level() {
        let mut shared = SharedState::new();
        let (tick, _control, audio) = shared.split();
        tick.publish_volume(255);

        let mut cb = AudioCallback::new(make_engine(), audio, Probe::default());
        for n in 1..=20 {
            let level = cb.run();
            assert_eq!(cb.sink().writes, n);
            assert_eq!(cb.sink().last, Some(level));
        }
    }

    #[test]
    fn loop_output_is_scaled_by_volume() {
        let mut shared = SharedState::new();
        let (tick, _control, audio) = shared.split();
        tick.publish_volume(255);

        let mut cb = AudioCallback::new(make_engine(), audio, Probe::default());
        // 0x7F ^ 0x80 = 0xFF; (255 * 255) >> 8 = 254
        assert_eq!(cb.run(), 254);

        tick.publish_volume(0);
        assert_eq!(cb.run(), 0);
    }

    #[test]
    fn pending_update_resets_position_before_generating() {
        let mut shared = SharedState::new();
        let (tick, control, audio) = shared.split();
        tick.publish_volume(255);

        let mut cb = AudioCallback::new(make_engine(), audio, Probe::default());
        for _ in 0..11 {
            cb.run();
        }
        assert_eq!(cb.engine().player().position(), 11);

        control.publish_mode(AudioMode::Loop1);
        cb.run();
        assert_eq!(cb.engine().player().position(), 1);
    }

    #[test]
    fn tone_entry_at_88k_starts_at_table_zero() {
        let mut shared = SharedState::new();
        let (tick, control, audio) = shared.split();
        tick.publish_volume(255);

        let mut cb = AudioCallback::new(make_engine(), audio, Probe::default());
        control.publish_mode(AudioMode::Tone440);
        let level = cb.run();

        let increment = frequency_word(440, 88_000);
        assert_eq!(increment, ((1u64 << 32) * 440 / 88_000) as u32);
        assert_eq!(cb.engine().tone().increment(), increment);
        // first sample is table[0] = 128, scaled by 255/256
        assert_eq!(cb.engine().table().as_slice()[0], 128);
        assert_eq!(level, scale(128, 255));
        assert_eq!(cb.engine().tone().phase(), increment);
    }

    #[test]
    fn pending_is_consumed_once() {
        let mut shared = SharedState::new();
        let (tick, control, audio) = shared.split();
        tick.publish_volume(255);

        let mut cb = AudioCallback::new(make_engine(), audio, Probe::default());
        control.publish_mode(AudioMode::Tone1k);
        cb.run();
        cb.run();
        let phase = cb.engine().tone().phase();
        assert_eq!(phase, 2 * frequency_word(1000, 88_000));
    }

    #[test]
    fn works_with_borrowed_sink() {
        let mut shared = SharedState::new();
        let (_tick, _control, audio) = shared.split();

        let mut probe = Probe::default();
        {
            let mut cb = AudioCallback::new(make_engine(), audio, &mut probe);
            cb.run();
            cb.run();
        }
        assert_eq!(probe.writes, 2);
        assert_eq!(probe.last, Some(0));
    }
}
