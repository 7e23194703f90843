// Test intent: verifies the KEMD_THREADS environment override of the worker count.
#![cfg(feature = "std")]

use std::process::Command;

#[test]
fn print_default_threads() {
    println!("{}", kemd::parallel::default_threads());
}

#[test]
/// The variable is honored and capped at the ensemble size.
fn env_sets_default_threads() {
    let exe = std::env::current_exe().unwrap();
    let output = Command::new(&exe)
        .env("KEMD_THREADS", "3")
        .args(["--exact", "print_default_threads", "--nocapture"])
        .output()
        .expect("run default thread test");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let threads: usize = stdout
        .lines()
        .rev()
        .find_map(|l| l.trim().parse().ok())
        .unwrap();
    assert_eq!(threads, 3);
    assert_eq!(kemd::parallel::resolve_workers(0, 1), 1);
}

#[test]
/// Unparsable values fall back to the CPU count.
fn invalid_env_falls_back() {
    let exe = std::env::current_exe().unwrap();
    let output = Command::new(&exe)
        .env("KEMD_THREADS", "lots")
        .args(["--exact", "print_default_threads", "--nocapture"])
        .output()
        .expect("run default thread test");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let threads: usize = stdout
        .lines()
        .rev()
        .find_map(|l| l.trim().parse().ok())
        .unwrap();
    assert!(threads >= 1);
}
