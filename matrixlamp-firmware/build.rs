//! Build script for matrixlamp-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates lamp.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Plugin ids the firmware knows how to build
///
/// Keep in sync with `matrixlamp_plugins::BUILTIN_ORDER`.
const KNOWN_PLUGINS: [&str; 9] = [
    "draw", "snake", "life", "stars", "lines", "circle", "rain", "breakout", "firework",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("cannot create memory.x");
    f.write_all(memory_x).expect("cannot write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate lamp.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=lamp.toml");

    let config_path = Path::new("lamp.toml");
    if !config_path.exists() {
        fail("lamp.toml not found", &["Create one next to Cargo.toml.".to_string()]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read lamp.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in lamp.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_scheduler(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_plugins(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid lamp.toml", &errors);
    }
    println!("cargo:warning=lamp.toml validated successfully");
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

/// The firmware parser rejects sections it does not know
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !["scheduler", "display", "plugins"].contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn check_range(
    section: &toml::Value,
    name: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match section.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if range.contains(v) => {}
        Some(toml::Value::Integer(_)) => errors.push(format!(
            "[{}] {} must be {}-{}",
            name,
            key,
            range.start(),
            range.end()
        )),
        Some(_) => errors.push(format!("[{}] {} must be an integer", name, key)),
    }
}

fn validate_scheduler(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(scheduler) = config.get("scheduler") else {
        return;
    };
    check_range(scheduler, "scheduler", "frame_interval_ms", 1..=1000, errors);
    check_range(scheduler, "scheduler", "tick_budget_ms", 1..=u32::MAX as i64, errors);
    check_range(scheduler, "scheduler", "debounce_ms", 50..=1000, errors);
    check_range(scheduler, "scheduler", "auto_cycle_s", 0..=u32::MAX as i64, errors);
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };
    if let Some(rotation) = display.get("rotation") {
        if !matches!(rotation.as_integer(), Some(0 | 90 | 180 | 270)) {
            errors.push("[display] rotation must be 0, 90, 180 or 270".to_string());
        }
    }
    if let Some(wiring) = display.get("wiring") {
        if !matches!(wiring.as_str(), Some("row_major" | "serpentine")) {
            errors.push("[display] wiring must be 'row_major' or 'serpentine'".to_string());
        }
    }
    check_range(display, "display", "on_threshold", 1..=255, errors);
}

fn validate_plugins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(order) = config.get("plugins").and_then(|p| p.get("order")) else {
        return;
    };
    let Some(order) = order.as_array() else {
        errors.push("[plugins] order must be an array".to_string());
        return;
    };

    let mut seen: Vec<&str> = Vec::new();
    for (i, id) in order.iter().enumerate() {
        let Some(id) = id.as_str() else {
            errors.push(format!("[plugins] order entry {} must be a string", i));
            continue;
        };
        if !KNOWN_PLUGINS.contains(&id) {
            errors.push(format!("[plugins] unknown plugin '{}'", id));
        }
        if seen.contains(&id) {
            errors.push(format!("[plugins] plugin '{}' listed twice", id));
        }
        seen.push(id);
    }
}
