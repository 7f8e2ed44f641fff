//! ESP32 Pump Alarm - Field Wiring
//!
//! The deployed build: a float switch in the sewage pump shaft
//! reporting to the house Thruk server over WiFi.
//!
//! ## Hardware Setup
//! - ESP32 DevKit (WROOM-32), powered from the pump's maintenance socket
//! - Float switch between 3V3 and GPIO 13 with a 10k pull-down to GND;
//!   a tripped switch drives the line high
//!
//! ## Build Instructions
//! ```bash
//! # ESP-IDF toolchain (std on xtensa)
//! cargo install espup && espup install && source ~/export-esp.sh
//!
//! PUMPGUARD_WIFI_SSID=... PUMPGUARD_WIFI_PASS=... PUMPGUARD_THRUK_KEY=... \
//!   cargo build --target xtensa-esp32-espidf --release
//! cargo espflash flash --monitor
//! ```
//!
//! Set `CONFIG_LWIP_SNTP_MAX_SERVERS=3` in `sdkconfig.defaults` so the
//! whole time-server list fits.
//!
//! Not built as part of this workspace; copy it into an ESP-IDF project
//! with the manifest sketched at the bottom of this file.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::Timelike;
use embedded_svc::http::client::Client as HttpClient;
use embedded_svc::http::Method;
use embedded_svc::io::Write;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{Gpio13, Input, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};
use esp_idf_svc::wifi::{ClientConfiguration, Configuration as WifiConfiguration, EspWifi};

use pumpguard_core::constants::{AUTH_KEY_HEADER, NTP_SERVERS, TRUSTED_EPOCH_MIN, TZ_SPEC};
use pumpguard_core::time::SystemTicks;
use pumpguard_core::{
    ClockError, ClockSource, LineLevel, MonitorConfig, Payload, Runner, SendError, SensorLine,
    SyncPolicy, TimeOfDay, Transport, UnixSeconds,
};

const WIFI_SSID: &str = env!("PUMPGUARD_WIFI_SSID");
const WIFI_PASS: &str = env!("PUMPGUARD_WIFI_PASS");
const THRUK_URL: &str = "https://monitor.example.net/thruk/r/cmd";
const THRUK_KEY: &str = env!("PUMPGUARD_THRUK_KEY");

/// Float switch on GPIO 13.
struct FloatSwitch<'d> {
    pin: PinDriver<'d, Gpio13, Input>,
}

impl SensorLine for FloatSwitch<'_> {
    fn level(&mut self) -> LineLevel {
        if self.pin.is_high() {
            LineLevel::High
        } else {
            LineLevel::Low
        }
    }
}

/// Station-mode WiFi with one HTTPS PUT per payload.
struct WifiTransport<'d> {
    wifi: EspWifi<'d>,
    url: &'static str,
    auth_key: &'static str,
}

impl Transport for WifiTransport<'_> {
    fn connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn send(&mut self, payload: &Payload) -> Result<u16, SendError> {
        let conf = HttpConfiguration {
            timeout: Some(Duration::from_secs(10)),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let connection = EspHttpConnection::new(&conf).map_err(|_| SendError::Transport {
            reason: "http connection",
        })?;
        let mut client = HttpClient::wrap(connection);

        let headers = [
            ("Content-Type", "application/json"),
            (AUTH_KEY_HEADER, self.auth_key),
        ];
        let mut request = client
            .request(Method::Put, self.url, &headers)
            .map_err(|_| SendError::Transport {
                reason: "http request",
            })?;
        request
            .write_all(payload.body.as_bytes())
            .map_err(|_| SendError::Transport {
                reason: "http write",
            })?;
        let response = request.submit().map_err(|_| SendError::Transport {
            reason: "http submit",
        })?;
        Ok(response.status())
    }

    fn signal_strength(&self) -> i32 {
        let mut info = esp_idf_svc::sys::wifi_ap_record_t::default();
        let err = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut info) };
        if err == esp_idf_svc::sys::ESP_OK {
            i32::from(info.rssi)
        } else {
            0
        }
    }
}

/// System clock fed by the background SNTP service.
struct SntpClock {
    sntp: EspSntp<'static>,
}

impl ClockSource for SntpClock {
    fn now(&self) -> UnixSeconds {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn time_of_day(&self) -> TimeOfDay {
        // TZ is exported before the runner starts, so localtime applies
        // CET/CEST including the DST switches.
        let local = chrono::Local::now();
        TimeOfDay::new(local.hour() as u8, local.minute() as u8)
    }

    fn trusted(&self) -> bool {
        self.now() >= TRUSTED_EPOCH_MIN
    }

    fn sync(&mut self, policy: &SyncPolicy) -> Result<(), ClockError> {
        let deadline = Instant::now() + policy.timeout;
        loop {
            if self.sntp.get_sync_status() == SyncStatus::Completed || self.trusted() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ClockError::SyncTimeout {
                    waited_ms: policy.timeout.as_millis() as u64,
                });
            }
            std::thread::sleep(policy.poll_delay);
        }
    }
}

fn main() {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    let peripherals = Peripherals::take().unwrap();
    let sysloop = EspSystemEventLoop::take().unwrap();
    let nvs = EspDefaultNvsPartition::take().unwrap();

    let mut pin = PinDriver::input(peripherals.pins.gpio13).unwrap();
    pin.set_pull(Pull::Down).unwrap();

    // Station mode, non-blocking connect: the runner's link budget does
    // the waiting and restarts the device if the AP never shows up.
    let mut wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs)).unwrap();
    wifi.set_configuration(&WifiConfiguration::Client(ClientConfiguration {
        ssid: WIFI_SSID.try_into().unwrap(),
        password: WIFI_PASS.try_into().unwrap(),
        ..Default::default()
    }))
    .unwrap();
    wifi.start().unwrap();
    wifi.connect().unwrap();

    // Local time for the operating window.
    std::env::set_var("TZ", TZ_SPEC);
    unsafe { esp_idf_svc::sys::tzset() };

    let sntp = EspSntp::new(&SntpConf {
        servers: NTP_SERVERS,
        ..Default::default()
    })
    .unwrap();

    let mut runner = Runner::new(
        MonitorConfig::default(),
        SystemTicks::new(),
        SntpClock { sntp },
        WifiTransport {
            wifi,
            url: THRUK_URL,
            auth_key: THRUK_KEY,
        },
        FloatSwitch { pin },
    );

    let fatal = runner.run();
    log::error!("{fatal}; restarting");
    unsafe { esp_idf_svc::sys::esp_restart() };
}

// Example Cargo.toml configuration for the ESP-IDF build:
/*
[dependencies]
pumpguard-core = { version = "0.1", features = ["std"] }
esp-idf-svc = { version = "0.49", features = ["binstart"] }
embedded-svc = "0.28"
chrono = { version = "0.4", default-features = false, features = ["clock"] }
log = "0.4"

[build-dependencies]
embuild = "0.32"

[profile.release]
opt-level = "z"     # Optimize for size
lto = true          # Link-time optimization
codegen-units = 1   # Better optimization
strip = true        # Strip symbols
*/
