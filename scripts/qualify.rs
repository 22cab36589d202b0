#!/usr/bin/env rust-script
//! ```cargo
//! [dependencies]
//! yansi = "0.5"
//! ```
extern crate yansi;
use std::process::{exit, Command};

// the `config` feature is the only one, so default and no-default cover all variants
const STEPS: &[&str] = &[
    "cargo fmt --check",
    "cargo +1.85.0 build --no-default-features",
    "cargo build",
    "cargo clippy --all-targets -- -D warnings",
    "cargo clippy --all-targets --no-default-features -- -D warnings",
    "cargo test",
    "cargo test --no-default-features",
    "cargo test --release --test test_multi_threaded",
    "cargo +nightly bench --bench bench_format",
    "cargo doc --no-deps",
];

fn run(step: &str) -> bool {
    println!("\n> {}", yansi::Paint::yellow(step));
    let mut words = step.split_whitespace();
    let Some(program) = words.next() else {
        return true;
    };
    Command::new(program)
        .args(words)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn main() {
    println!("Qualify secure_layout");
    std::fs::remove_file("Cargo.lock").ok();
    for step in STEPS {
        if !run(step) {
            println!("> {}", yansi::Paint::red(format!("failed: {step}")));
            exit(-1);
        }
    }
    println!("\n> all steps passed");
}
