//! Build script for latchkey-firmware
//!
//! - Reads and validates latchkey.toml at compile time
//! - Emits the validated tunables as `$OUT_DIR/tunables.rs`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use latchkey_core::{DebounceWidth, SampleInterval, Tunables};
use serde::Deserialize;

const CONFIG_FILE: &str = "latchkey.toml";

/// ATtiny85 factory clock: 8MHz internal RC with the CKDIV8 fuse programmed
const DEFAULT_CPU_HZ: u32 = 1_000_000;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", CONFIG_FILE);

    let config = load_config(Path::new(CONFIG_FILE));
    let (tunables, cpu_hz) = resolve(&config);

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("tunables.rs"), render(&tunables, cpu_hz))
        .expect("failed to write tunables.rs");

    println!(
        "cargo:warning=latchkey.toml validated (worst-case debounce {}ms per wake)",
        tunables.debounce_budget_us() / 1000
    );
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LatchkeyToml {
    relay: RelaySection,
    switch: SwitchSection,
    #[serde(default)]
    greeting: GreetingSection,
    #[serde(default)]
    clock: ClockSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RelaySection {
    settle_ms: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SwitchSection {
    debounce_ms: u16,
    #[serde(default = "default_width")]
    debounce_width: u8,
    #[serde(default = "default_max_reads")]
    debounce_max_reads: u16,
    sample_interval_ms: Option<u16>,
    sample_interval_us: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GreetingSection {
    blinks: u8,
    period_ms: u16,
}

impl Default for GreetingSection {
    fn default() -> Self {
        Self {
            blinks: Tunables::DEFAULT.greeting_blinks,
            period_ms: Tunables::DEFAULT.greeting_period_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClockSection {
    hz: u32,
}

impl Default for ClockSection {
    fn default() -> Self {
        Self { hz: DEFAULT_CPU_HZ }
    }
}

fn default_width() -> u8 {
    Tunables::DEFAULT.debounce_width.bits()
}

fn default_max_reads() -> u16 {
    Tunables::DEFAULT.debounce_max_reads
}

fn load_config(path: &Path) -> LatchkeyToml {
    if !path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: latchkey.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a latchkey.toml configuration file.       ║\n\
            ║  Please create one in the latchkey-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read latchkey.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid latchkey.toml                                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Turn the parsed file into checked tunables, or fail the build
fn resolve(config: &LatchkeyToml) -> (Tunables, u32) {
    let mut errors = Vec::new();

    let debounce_width = match DebounceWidth::from_bits(config.switch.debounce_width) {
        Some(width) => width,
        None => {
            errors.push(format!(
                "[switch] debounce_width must be 8 or 16, got {}",
                config.switch.debounce_width
            ));
            DebounceWidth::default()
        }
    };

    let debounce_interval = match (
        config.switch.sample_interval_ms,
        config.switch.sample_interval_us,
    ) {
        (Some(ms), None) => SampleInterval::Millis(ms),
        (None, Some(us)) => SampleInterval::Micros(us),
        (None, None) => SampleInterval::default(),
        (Some(_), Some(_)) => {
            errors.push(
                "[switch] set only one of sample_interval_ms and sample_interval_us".to_string(),
            );
            SampleInterval::default()
        }
    };

    if config.clock.hz == 0 {
        errors.push("[clock] hz must be non-zero".to_string());
    }

    let tunables = Tunables {
        relay_settle_ms: config.relay.settle_ms,
        switch_debounce_ms: config.switch.debounce_ms,
        debounce_width,
        debounce_max_reads: config.switch.debounce_max_reads,
        debounce_interval,
        greeting_blinks: config.greeting.blinks,
        greeting_period_ms: config.greeting.period_ms,
    };

    if let Err(e) = tunables.validate() {
        errors.push(e.message().to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in latchkey.toml                          ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    (tunables, config.clock.hz)
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(tunables: &Tunables, cpu_hz: u32) -> String {
    let width = match tunables.debounce_width {
        DebounceWidth::Eight => "Eight",
        DebounceWidth::Sixteen => "Sixteen",
    };
    let interval = match tunables.debounce_interval {
        SampleInterval::Millis(ms) => format!("Millis({})", ms),
        SampleInterval::Micros(us) => format!("Micros({})", us),
    };

    format!(
        "// Generated from latchkey.toml by build.rs\n\
         \n\
         /// Tunables compiled into this image\n\
         pub const TUNABLES: latchkey_core::Tunables = latchkey_core::Tunables {{\n\
         \x20   relay_settle_ms: {},\n\
         \x20   switch_debounce_ms: {},\n\
         \x20   debounce_width: latchkey_core::DebounceWidth::{},\n\
         \x20   debounce_max_reads: {},\n\
         \x20   debounce_interval: latchkey_core::SampleInterval::{},\n\
         \x20   greeting_blinks: {},\n\
         \x20   greeting_period_ms: {},\n\
         }};\n\
         \n\
         /// Effective CPU clock for delay calibration (Hz)\n\
         #[allow(dead_code)]\n\
         pub const CPU_HZ: u32 = {};\n",
        tunables.relay_settle_ms,
        tunables.switch_debounce_ms,
        width,
        tunables.debounce_max_reads,
        interval,
        tunables.greeting_blinks,
        tunables.greeting_period_ms,
        cpu_hz,
    )
}
