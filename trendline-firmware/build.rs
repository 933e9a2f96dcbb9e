//! Build script for trendline-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates pipeline.toml and generates the `PIPELINE` constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Panel geometry and graph size, mirrored from trendline-core
const DISPLAY_WIDTH: i64 = 128;
const DISPLAY_PAGES: i64 = 8;
const TREND_COLUMNS: i64 = 64;
const TREND_PAGES: i64 = 2;
const MAX_WINDOW: i64 = 10;

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// One integer setting read from the config file
struct Field {
    section: &'static str,
    key: &'static str,
    default: i64,
    min: i64,
    max: i64,
}

const fn field(section: &'static str, key: &'static str, default: i64, min: i64, max: i64) -> Field {
    Field {
        section,
        key,
        default,
        min,
        max,
    }
}

const FIELDS: &[Field] = &[
    field("sensor", "floor", 16, 0, i16::MAX as i64),
    field("sensor", "ceiling", 127, 1, i16::MAX as i64),
    field("sensor", "period_ms", 10, 1, u32::MAX as i64),
    field("filter", "initial_window", 1, 1, MAX_WINDOW),
    field("graph", "x", 16, 0, DISPLAY_WIDTH - TREND_COLUMNS),
    field("graph", "text_x", 0, 0, DISPLAY_WIDTH - 1),
    field("graph", "average_page", 1, 0, DISPLAY_PAGES - 1),
    field("graph", "window_page", 0, 0, DISPLAY_PAGES - 1),
    field("graph", "image_page", 0, 0, DISPLAY_PAGES - TREND_PAGES),
    field("stats", "period_ms", 3000, 1, u32::MAX as i64),
    field("serial", "baudrate", 19_200, 1_200, 921_600),
];

/// Validate pipeline.toml and write the generated constant to OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=pipeline.toml");

    let config_path = Path::new("pipeline.toml");
    if !config_path.exists() {
        fail(
            "pipeline.toml not found",
            &["The firmware requires a pipeline.toml next to Cargo.toml".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read pipeline.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in pipeline.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    let mut values = Vec::new();

    for f in FIELDS {
        match read_field(&config, f) {
            Ok(v) => values.push(v),
            Err(e) => {
                errors.push(e);
                values.push(f.default);
            }
        }
    }

    let value = |section: &str, key: &str| -> i64 {
        FIELDS
            .iter()
            .zip(&values)
            .find(|(f, _)| f.section == section && f.key == key)
            .map(|(_, v)| *v)
            .unwrap()
    };

    if value("sensor", "floor") >= value("sensor", "ceiling") {
        errors.push("[sensor] floor must be below ceiling".to_string());
    }

    if !errors.is_empty() {
        fail("Invalid pipeline configuration", &errors);
    }

    let generated = format!(
        "/// Pipeline configuration generated from pipeline.toml\n\
         pub const PIPELINE: PipelineConfig = PipelineConfig {{\n\
         \x20   sensor: SensorConfig {{ floor: {}, ceiling: {}, period_ms: {} }},\n\
         \x20   filter: FilterConfig {{ initial_window: {} }},\n\
         \x20   graph: GraphConfig {{ x: {}, text_x: {}, average_page: {}, window_page: {}, image_page: {} }},\n\
         \x20   stats: StatsConfig {{ period_ms: {} }},\n\
         \x20   serial: SerialConfig {{ baudrate: {} }},\n\
         }};\n",
        value("sensor", "floor"),
        value("sensor", "ceiling"),
        value("sensor", "period_ms"),
        value("filter", "initial_window"),
        value("graph", "x"),
        value("graph", "text_x"),
        value("graph", "average_page"),
        value("graph", "window_page"),
        value("graph", "image_page"),
        value("stats", "period_ms"),
        value("serial", "baudrate"),
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("pipeline_config.rs"), generated).unwrap();
}

/// Read one field, falling back to its default when absent
fn read_field(config: &toml::Value, f: &Field) -> Result<i64, String> {
    let section = match config.get(f.section) {
        None => return Ok(f.default),
        Some(toml::Value::Table(t)) => t,
        Some(_) => return Err(format!("[{}] must be a table", f.section)),
    };

    match section.get(f.key) {
        None => Ok(f.default),
        Some(toml::Value::Integer(v)) if (f.min..=f.max).contains(v) => Ok(*v),
        Some(toml::Value::Integer(_)) => Err(format!(
            "[{}] {} must be {}-{}",
            f.section, f.key, f.min, f.max
        )),
        Some(_) => Err(format!("[{}] {} must be an integer", f.section, f.key)),
    }
}

/// Abort the build with a boxed diagnostic
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|e| {
                let e: String = e.chars().take(62).collect();
                format!("║  • {:<62} ║", e)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}
