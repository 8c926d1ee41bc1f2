#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Duration;

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use log::info;

use myrtio_esp_strips::controllers::{StripHttpController, init_controllers};
use myrtio_esp_strips::infrastructure::drivers::{
    EspAccessPoint, init_led_outputs, init_network_stack, open_config_store,
};
use myrtio_esp_strips::infrastructure::tasks::{
    HTTP_WORKERS, access_point_task, dhcp_server_task, http_server_task, network_runner_task,
    tick_task,
};
use myrtio_esp_strips::{mk_static, status_led_gpio};

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Allocate heap memory (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Restore strips from flash; a missing or broken record falls back to
    // the default strip
    let store = open_config_store(peripherals.FLASH);
    let (outputs, status_led) = init_led_outputs(peripherals.RMT, status_led_gpio!(peripherals))
        .expect("led: failed to configure RMT");
    init_controllers(outputs, store).await;

    // Bring up the access point and its DHCP server
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(access_point_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();
    spawner.spawn(dhcp_server_task(stack)).ok();

    // Request/response API and push sessions
    let handler = mk_static!(StripHttpController, StripHttpController);
    for _ in 0..HTTP_WORKERS {
        spawner.spawn(http_server_task(stack, handler)).ok();
    }

    spawner
        .spawn(tick_task(EspAccessPoint::new(stack), status_led))
        .ok();
    info!("app: started");

    loop {
        embassy_time::Timer::after(Duration::from_secs(5)).await;
    }
}
