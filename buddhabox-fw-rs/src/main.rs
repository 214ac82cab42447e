//! buddhabox-fw
//!
//! RP2040 firmware for the Buddhabox sound toy. Wires the `buddhabox` audio
//! core to the board in three prioritised contexts:
//!
//! 1. **Audio**: the PWM wrap interrupt (priority P0) runs the
//!    [`AudioCallback`] once per PWM period and writes the level back into
//!    the PWM compare register.
//! 2. **Tick**: a task on an `InterruptExecutor` (SWI_IRQ_1, priority P2)
//!    samples the button and pot every millisecond through [`TickService`].
//! 3. **Foreground**: the thread-mode executor polls [`Foreground`], which
//!    turns debounced presses into mode changes and emits a status line and
//!    LED toggle every 100 ms.
//!
//! The three contexts share state only through the ports split from one
//! [`SharedState`].

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pac;
use embassy_rp::pwm::{self, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use buddhabox::{
    AudioCallback, AudioSink, EngineConfig, Foreground, ForegroundConfig, PcmBank, PcmClip,
    SampleEngine, SharedState, TickConfig, TickService,
};

// ---------------------------------------------------------------------------
// Audio output
// ---------------------------------------------------------------------------

/// GPIO25 is PWM slice 4, channel B.
const AUDIO_SLICE: usize = 4;

/// PWM clock divider. Base rate divided by this and by `PWM_TOP + 1` is the
/// sample rate.
const PWM_DIVIDER: u8 = 8;

/// PWM wrap value. Levels above it saturate at full duty.
const PWM_TOP: u16 = 250;

/// Writes levels straight into the audio slice's channel-B compare register.
struct PwmSink;

impl AudioSink for PwmSink {
    #[inline]
    fn write_level(&mut self, level: u8) {
        pac::PWM
            .ch(AUDIO_SLICE)
            .cc()
            .modify(|w| w.set_b(u16::from(level)));
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

// Staged by build.rs from assets/clip{0..3}.raw (a silent placeholder when
// a file is missing). Signed-centred unsigned bytes.
static CLIP0: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/clip0.raw"));
static CLIP1: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/clip1.raw"));
static CLIP2: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/clip2.raw"));
static CLIP3: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/clip3.raw"));

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Cross-context cells, split once in `main` into the three ports.
static SHARED: StaticCell<SharedState> = StaticCell::new();

/// Audio callback state. Only the PWM interrupt locks it after startup, so
/// the lock is never contended.
static AUDIO: Mutex<CriticalSectionRawMutex, RefCell<Option<AudioCallback<'static, PwmSink>>>> =
    Mutex::new(RefCell::new(None));

/// Executor for the tick context, above thread mode and below audio.
static EXECUTOR_TICK: InterruptExecutor = InterruptExecutor::new();

// ---------------------------------------------------------------------------
// Interrupts
// ---------------------------------------------------------------------------

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_TICK.on_interrupt()
}

/// One output sample per PWM period.
#[interrupt]
fn PWM_IRQ_WRAP() {
    pac::PWM.intr().write(|w| w.set_ch(AUDIO_SLICE, true));

    AUDIO.lock(|cell| {
        if let Some(callback) = cell.borrow_mut().as_mut() {
            callback.run();
        }
    });
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Millisecond sampler for the button and volume pot.
///
/// The button is active-low. If an ADC conversion fails the previous
/// reading is reused so the volume holds steady.
#[embassy_executor::task]
async fn tick_task(
    mut service: TickService<'static>,
    button: Input<'static>,
    mut adc: Adc<'static, adc::Blocking>,
    mut pot: adc::Channel<'static>,
    period: Duration,
) {
    info!("Tick task started");

    let mut ticker = Ticker::every(period);
    let mut last_reading = 0u16;

    loop {
        ticker.next().await;

        let pressed = button.is_low();
        match adc.blocking_read(&mut pot) {
            Ok(reading) => last_reading = reading,
            Err(_) => warn!("Pot read failed; holding volume"),
        }

        service.on_tick(pressed, last_reading);
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let clk_sys = embassy_rp::clocks::clk_sys_freq();
    info!("Buddhabox {} starting", env!("CARGO_PKG_VERSION"));
    info!("System clock: {} Hz", clk_sys);

    // —— Pin assignments ————————————————————————————————————————————————————
    // LED    → GP22  indicator, toggled with each status line
    // BTN    → GP23  active-low, pull-up enabled
    // AMP_EN → GP24  asserted once audio is running
    // AUDIO  → GP25  PWM slice 4 channel B
    // POT    → GP26  ADC0
    // ———————————————————————————————————————————————————————————————————————

    let mut led = Output::new(p.PIN_22, Level::Low);
    let button = Input::new(p.PIN_23, Pull::Up);
    let mut amp_enable = Output::new(p.PIN_24, Level::Low);
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let pot = adc::Channel::new_pin(p.PIN_26, Pull::None);

    // —— Shared state ———————————————————————————————————————————————————————

    let shared = SHARED.init(SharedState::new());
    let (tick_port, control_port, audio_port) = shared.split();

    // —— Audio engine ———————————————————————————————————————————————————————

    // The callback rate is whatever the PWM actually wraps at.
    let sample_rate_hz = clk_sys / (u32::from(PWM_DIVIDER) * (u32::from(PWM_TOP) + 1));
    let engine_config = EngineConfig {
        sample_rate_hz,
        ..EngineConfig::default()
    };
    info!("Sample rate: {} Hz", sample_rate_hz);

    let bank = unwrap!(PcmBank::new([
        PcmClip::new(CLIP0),
        PcmClip::new(CLIP1),
        PcmClip::new(CLIP2),
        PcmClip::new(CLIP3),
    ]));
    let engine = unwrap!(SampleEngine::new(&engine_config, bank));
    AUDIO.lock(|cell| {
        cell.replace(Some(AudioCallback::new(engine, audio_port, PwmSink)));
    });
    info!("Audio engine initialised");

    // —— Tick service ———————————————————————————————————————————————————————

    let tick_config = TickConfig::default();
    let tick_service = unwrap!(TickService::new(&tick_config, tick_port));

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let tick_spawner = EXECUTOR_TICK.start(interrupt::SWI_IRQ_1);
    tick_spawner
        .spawn(tick_task(
            tick_service,
            button,
            adc,
            pot,
            Duration::from_millis(tick_config.period_ms),
        ))
        .unwrap();
    info!("Tick initialised");

    // —— PWM output —————————————————————————————————————————————————————————

    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = PWM_DIVIDER.into();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_b = 0;
    // Held for the life of the program; dropping it would stop the slice.
    let _audio_pwm = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_25, pwm_config);

    pac::PWM.intr().write(|w| w.set_ch(AUDIO_SLICE, true));
    pac::PWM.inte().modify(|w| w.set_ch(AUDIO_SLICE, true));
    interrupt::PWM_IRQ_WRAP.set_priority(Priority::P0);
    // SAFETY: the handler only touches `AUDIO`, which was filled above.
    unsafe { interrupt::PWM_IRQ_WRAP.enable() };
    info!("PWM output initialised");

    amp_enable.set_high();
    info!("Amp enabled");

    // —— Foreground loop ————————————————————————————————————————————————————

    let fg_config = ForegroundConfig::default();
    let mut foreground = unwrap!(Foreground::new(&fg_config, control_port));
    let mut ticker = Ticker::every(Duration::from_millis(tick_config.period_ms));

    info!("Looping...");
    loop {
        let outcome = foreground.poll();

        if let Some(mode) = outcome.mode_changed {
            info!("mode -> {}", mode);
        }

        if let Some(status) = outcome.status {
            info!("vol = {} mode = {}", status.volume, status.mode.raw());
            led.toggle();
        }

        ticker.next().await;
    }
}
