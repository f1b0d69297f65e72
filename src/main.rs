//! blinkrtos - ESP32-S3 固件入口
//!
//! 基于 Embassy 异步运行时，采用混合调度策略:
//! - 线程模式执行器: LED 循环任务 (唯一会阻塞等待信号的任务)
//! - 中断执行器: 定时信号源与按钮监视器，可抢占 LED 任务
//!
//! 硬件目标: ESP32-S3-N16R8

#![no_std]
#![no_main]

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_hal::{
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    interrupt::{software::SoftwareInterruptControl, Priority},
    timer::timg::TimerGroup,
};
use esp_rtos::embassy::InterruptExecutor;
use static_cell::StaticCell;

use blinkrtos::config;
use blinkrtos::tasks::{run_button_monitor, run_tick_producer};
use blinkrtos::{
    ButtonMonitor, CountingSemaphore, LampBank, LedToggle, PriorityControl, SharedLampBank,
    TaskGate, TaskPriority,
};

// ===== 条件编译日志 =====
#[allow(unused_imports)]
use blinkrtos::util::log::*;

#[cfg(feature = "log-defmt")]
use defmt_rtt as _;

// ===== Panic Handler =====
#[cfg(feature = "dev")]
use esp_backtrace as _;

#[cfg(not(feature = "dev"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

type Lamps = SharedLampBank<Output<'static>>;

// ===== 静态分配 =====
/// 定时器 -> LED 任务的计数信号
static TICK: CountingSemaphore = CountingSemaphore::new(0);

/// LED 任务调度门，由按钮监视器控制
static LED_GATE: TaskGate = TaskGate::new(TaskPriority::NORMAL);

/// 四路输出，LED 任务与按钮监视器共享
static LAMPS: StaticCell<Lamps> = StaticCell::new();

/// 信号源执行器 - 定时器与按钮任务
static SIGNAL_EXECUTOR: StaticCell<InterruptExecutor<2>> = StaticCell::new();

// ===== 任务 =====

#[embassy_executor::task]
async fn led_toggle_task(lamps: &'static Lamps) {
    let mut toggle = LedToggle::new(lamps, &TICK, &LED_GATE);
    toggle.run().await
}

#[embassy_executor::task]
async fn tick_task() {
    run_tick_producer(&TICK, Duration::from_millis(config::TICK_PERIOD_MS)).await
}

#[embassy_executor::task]
async fn button_task(button: Input<'static>, lamps: &'static Lamps) {
    run_button_monitor(button, ButtonMonitor::new(lamps, &LED_GATE)).await
}

const fn signal_priority() -> Priority {
    match config::SIGNAL_EXECUTOR_PRIORITY {
        1 => Priority::Priority1,
        2 => Priority::Priority2,
        _ => Priority::Priority3,
    }
}

// ===== 主入口点 =====
#[esp_rtos::main]
async fn main(spawner: Spawner) {
    // ========================================
    // 1. 硬件初始化
    // ========================================
    let peripherals = esp_hal::init(esp_hal::Config::default());

    log_info!("{} v{} starting on ESP32-S3", blinkrtos::NAME, blinkrtos::VERSION);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // ========================================
    // 2. GPIO: 四路输出全部从低电平开始
    // ========================================
    let lamps = LAMPS.init(SharedLampBank::new(LampBank::new(
        Output::new(peripherals.GPIO9, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO11, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO38, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO41, Level::Low, OutputConfig::default()),
    )));
    let lamps: &'static Lamps = lamps;

    let button = Input::new(
        peripherals.GPIO17,
        InputConfig::default().with_pull(Pull::Down),
    );

    log_info!(
        "Lamps on GPIO{}/{}/{}/{}, button on GPIO{}",
        config::LED_A_GPIO,
        config::LED_B_GPIO,
        config::LED_C_GPIO,
        config::LED_D_GPIO,
        config::BUTTON_GPIO
    );

    // ========================================
    // 3. 信号源执行器 (抢占 LED 任务)
    // ========================================
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    let executor = SIGNAL_EXECUTOR.init(InterruptExecutor::new(sw_ints.software_interrupt2));
    let signal_spawner = executor.start(signal_priority());

    log_info!(
        "Signal executor started (Priority{})",
        config::SIGNAL_EXECUTOR_PRIORITY
    );

    signal_spawner.must_spawn(tick_task());
    signal_spawner.must_spawn(button_task(button, lamps));

    // ========================================
    // 4. LED 任务 (主执行器)
    // ========================================
    spawner.must_spawn(led_toggle_task(lamps));

    log_info!("All tasks spawned, entering main loop");

    // ========================================
    // 5. 主循环 - 心跳
    // ========================================
    let mut uptime_s: u64 = 0;
    loop {
        Timer::after(Duration::from_secs(10)).await;
        uptime_s += 10;

        log_info!(
            "Heartbeat: {}s, LED task priority {}, {} pending ticks",
            uptime_s,
            LED_GATE.priority().raw(),
            TICK.count()
        );
    }
}
