//! RadCam - Camera Gimbal Controller Firmware
//!
//! Main firmware binary for Waveshare RP2350-ETH boards. A CH9120 bridge
//! turns TCP connections into UART bytes; the firmware answers minimal
//! HTTP requests and drives four hobby servos (tilt, zoom, focus, yaw)
//! with slew-rate limited motion and zoom-tracking autofocus.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use radcam_core::{Axis, Gimbal};
use radcam_drivers::bridge::Ch9120;
use radcam_drivers::servo::PwmServoBank;
use radcam_hal_rp2350::flash::Rp2350FlashStorage;
use radcam_hal_rp2350::pwm::{servo_config, servo_pair, SERVO_FRAME_HZ};

use crate::config::{load_config, load_targets};
use crate::tasks::{discard_echo, ControlLoop, MAX_ECHO_DISCARD};

mod config;
mod page;
mod tasks;

/// Boot image definition required by the RP2350 bootrom
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Bridge link baud rate (CH9120 factory default)
const BRIDGE_BAUD: u32 = 115_200;

// Static buffers for the bridge UART
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("RadCam firmware starting...");

    let p = embassy_rp::init(Default::default());

    info!("Embassy initialized");

    // Bridge UART: GPIO20 TX, GPIO21 RX
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BRIDGE_BAUD;

    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_20, p.PIN_21, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (mut tx, mut rx) = uart.split();

    info!("UART initialized for CH9120 bridge");

    // CH9120 control lines: GPIO18 CFG, GPIO19 RST
    let cfg_pin = Output::new(p.PIN_18, Level::High);
    let rst_pin = Output::new(p.PIN_19, Level::High);
    let mut bridge = Ch9120::new(cfg_pin, rst_pin);
    match bridge.start_transparent(&mut tx, &mut Delay).await {
        Ok(()) => info!("CH9120 in transparent mode"),
        Err(e) => warn!("CH9120 bring-up failed: {:?}", e),
    }
    // Command acknowledgements must not reach the request framer
    let discarded = discard_echo(&mut rx, MAX_ECHO_DISCARD).await;
    if discarded > 0 {
        debug!("Dropped {} bytes of bridge replies", discarded);
    }

    // Axis configuration from gimbal.toml
    let config = load_config();

    // Stored targets (flash, last 64 KiB)
    let mut storage = Rp2350FlashStorage::new(p.FLASH, p.DMA_CH0);
    let targets = load_targets(&mut storage).await;

    // Servo PWM: slice 1 drives tilt/zoom, slice 2 drives focus/yaw
    let sys_clk_hz = clk_sys_freq();
    let pwm_config = match servo_config(sys_clk_hz) {
        Some(config) => config,
        None => {
            error!(
                "Cannot fit {} Hz servo frame at {} Hz sys clock",
                SERVO_FRAME_HZ, sys_clk_hz
            );
            Default::default()
        }
    };

    let (tilt, zoom) = servo_pair(p.PWM_SLICE1, p.PIN_2, p.PIN_3, &pwm_config);
    let (focus, yaw) = servo_pair(p.PWM_SLICE2, p.PIN_4, p.PIN_5, &pwm_config);

    let mut servos = PwmServoBank::new();
    for (axis, output) in [
        (Axis::Tilt, tilt),
        (Axis::Zoom, zoom),
        (Axis::Focus, focus),
        (Axis::Yaw, yaw),
    ] {
        if let Some(output) = output {
            servos.attach(axis, output);
        }
    }
    for axis in Axis::ALL {
        if !servos.is_attached(axis) {
            warn!("No PWM output for {=str}", axis.name());
        }
    }

    info!("Servo PWM initialized at {} Hz", SERVO_FRAME_HZ);

    let gimbal = Gimbal::new(&config, &targets);
    if let Some(window) = gimbal.router().target_window() {
        info!("Target window: {}-{} us", window.min_us, window.max_us);
    }

    info!("Firmware running");

    ControlLoop {
        gimbal,
        servos,
        tx,
        rx,
        storage,
    }
    .run()
    .await
}
