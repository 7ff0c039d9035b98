//! Build script for detent-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml and embeds it as postcard binary

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use detent_core::config::{parse_machine_config, ConfigError};

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    embed_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate machine.toml and write `$OUT_DIR/machine.bin`
fn embed_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a machine.toml configuration file.        ║\n\
            ║  Please create one in the detent-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config = match parse_machine_config(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid machine.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║  {:<64}║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                describe(&e)
            );
        }
    };

    let blob = match config.to_postcard() {
        Ok(blob) => blob,
        Err(e) => panic!("failed to encode machine.toml: {}", describe(&e)),
    };
    fs::write(out_dir.join("machine.bin"), blob).unwrap();
}

fn describe(e: &ConfigError) -> String {
    match e {
        ConfigError::OutOfRange { field } => format!("'{}' is out of range", field),
        ConfigError::Syntax => "TOML syntax or type error".to_string(),
        ConfigError::Encoding => "postcard encoding failed".to_string(),
    }
}
