//! WS2812 outputs on the RMT peripheral.
//!
//! Every strip slot owns one RMT channel and one statically allocated pulse
//! buffer. A slot is bound to a GPIO on attach and returned on release, so
//! strips can be added and removed at runtime.

use esp_hal::{
    Blocking,
    gpio::{AnyPin, interconnect::PeripheralOutput},
    peripherals::RMT,
    rmt::{ChannelCreator, PulseCode, Rmt},
    time::Rate,
    xtensa_lx::interrupt,
};
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use log::{debug, warn};
use myrtio_strip_core::{
    HardwareError,
    LedOutput,
    OutputFactory,
    Rgb,
    limits::{MAX_PIXELS, MAX_STRIPS},
};
use smart_leds::SmartLedsWrite;
use static_cell::make_static;

use crate::config;

const RMT_BUFFER_SIZE: usize = buffer_size(MAX_PIXELS);

type RmtBuffer = [PulseCode; RMT_BUFFER_SIZE];

/// One strip's data line.
pub struct EspStripOutput {
    slot: usize,
    adapter: SmartLedsAdapter<'static, RMT_BUFFER_SIZE>,
}

// Safety: an output is owned by exactly one strip inside the controller
// mutex and never touched from an interrupt.
unsafe impl Send for EspStripOutput {}

impl LedOutput for EspStripOutput {
    fn write(&mut self, frame: &[Rgb]) {
        let result = interrupt::free(|| self.adapter.write(frame.iter().copied()));
        if let Err(e) = result {
            warn!("led: slot {} write failed: {:?}", self.slot, e);
        }
    }
}

/// Hands out RMT channels 0..MAX_STRIPS to strips.
pub struct EspStripOutputs {
    buffers: [*mut RmtBuffer; MAX_STRIPS],
    pins: [Option<u8>; MAX_STRIPS],
}

// Safety: the buffers are only reached through `&mut self`, and the factory
// lives inside the controller mutex.
unsafe impl Send for EspStripOutputs {}

impl EspStripOutputs {
    fn new() -> Self {
        let buffers: [*mut RmtBuffer; MAX_STRIPS] = [
            make_static!(smart_led_buffer!(MAX_PIXELS)),
            make_static!(smart_led_buffer!(MAX_PIXELS)),
            make_static!(smart_led_buffer!(MAX_PIXELS)),
            make_static!(smart_led_buffer!(MAX_PIXELS)),
        ];
        Self {
            buffers,
            pins: [None; MAX_STRIPS],
        }
    }

    fn bind(
        &mut self,
        slot: usize,
        pin: AnyPin<'static>,
    ) -> Option<SmartLedsAdapter<'static, RMT_BUFFER_SIZE>> {
        // Safety: a slot's buffer is handed to at most one adapter; the
        // previous adapter was dropped in `release` before the slot was
        // marked free.
        let buffer = unsafe { &mut *self.buffers[slot] };
        // Safety: channels 0..MAX_STRIPS are reserved for strips and each is
        // held by at most one adapter, tracked by `pins`.
        let adapter = unsafe {
            match slot {
                0 => SmartLedsAdapter::new(ChannelCreator::<Blocking, 0>::steal(), pin, buffer),
                1 => SmartLedsAdapter::new(ChannelCreator::<Blocking, 1>::steal(), pin, buffer),
                2 => SmartLedsAdapter::new(ChannelCreator::<Blocking, 2>::steal(), pin, buffer),
                3 => SmartLedsAdapter::new(ChannelCreator::<Blocking, 3>::steal(), pin, buffer),
                _ => return None,
            }
        };
        Some(adapter)
    }
}

impl OutputFactory for EspStripOutputs {
    type Output = EspStripOutput;

    fn attach(&mut self, pin: u8, pixel_count: usize) -> Result<EspStripOutput, HardwareError> {
        if !config::LED_OUTPUT_PINS.contains(&pin) || self.pins.contains(&Some(pin)) {
            return Err(HardwareError::InvalidPin);
        }
        let slot = self
            .pins
            .iter()
            .position(Option::is_none)
            .ok_or(HardwareError::NoFreeChannel)?;

        // Safety: the pin is on the output allowlist and not bound to any
        // other slot.
        let gpio = unsafe { AnyPin::steal(pin) };
        let adapter = self.bind(slot, gpio).ok_or(HardwareError::NoFreeChannel)?;
        self.pins[slot] = Some(pin);
        debug!("led: GPIO{} on channel {} ({} leds)", pin, slot, pixel_count);

        Ok(EspStripOutput { slot, adapter })
    }

    fn release(&mut self, output: EspStripOutput) {
        let slot = output.slot;
        drop(output);
        if let Some(pin) = self.pins.get_mut(slot).and_then(Option::take) {
            debug!("led: GPIO{} released from channel {}", pin, slot);
        }
    }
}

/// The one-pixel status indicator.
pub struct StatusLed {
    adapter: SmartLedsAdapter<'static, { buffer_size(1) }>,
}

impl StatusLed {
    pub fn set(&mut self, color: Rgb) {
        let result = interrupt::free(|| self.adapter.write([color].into_iter()));
        if let Err(e) = result {
            warn!("led: status write failed: {:?}", e);
        }
    }
}

/// Configure the RMT peripheral and split it into strip outputs and the
/// status LED (channel 4).
pub fn init_led_outputs<O>(
    rmt: RMT<'static>,
    status_pin: O,
) -> Result<(EspStripOutputs, StatusLed), HardwareError>
where
    O: PeripheralOutput<'static>,
{
    let rmt = Rmt::new(rmt, Rate::from_mhz(80)).map_err(|_| HardwareError::Driver)?;
    let status = StatusLed {
        adapter: SmartLedsAdapter::new(rmt.channel4, status_pin, make_static!(smart_led_buffer!(1))),
    };
    Ok((EspStripOutputs::new(), status))
}
