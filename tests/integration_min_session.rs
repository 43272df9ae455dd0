// Drives the compiled binary through a PTY: exercises terminal setup, the
// real event loop and crossterm input handling.
//
// Requires a pseudo terminal (expectrl), so Unix-only and ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn menu_opens_and_quits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("hitcircle");
    let log = tempfile::NamedTempFile::new()?;
    let cmd = format!("{} --log-file {}", bin.display(), log.path().display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // into map select and back out
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\x1b")?;
    std::thread::sleep(Duration::from_millis(100));

    // Esc on the main menu quits
    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn random_map_can_be_started_and_abandoned() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("hitcircle");
    let log = tempfile::NamedTempFile::new()?;
    let cmd = format!(
        "{} --seed 1 -n 3 --log-file {}",
        bin.display(),
        log.path().display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // Play -> first entry (random practice)
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(300));

    p.send("q")?;
    p.expect(Eof)?;

    let log_text = std::fs::read_to_string(log.path())?;
    assert_eq!(log_text.matches("Starting session").count(), 1);
    Ok(())
}
