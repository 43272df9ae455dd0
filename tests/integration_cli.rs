use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn list_maps_without_tty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("duo.osu"),
        "[Metadata]\nTitle:Duo\n\n[HitObjects]\n100,100,500\n200,200,900\n",
    )?;
    fs::write(dir.path().join("readme.md"), "not a map")?;

    let assert = Command::cargo_bin("hitcircle")?
        .args(["--list-maps", "-n", "12", "--maps-dir"])
        .arg(dir.path())
        .write_stdin("")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Random practice (12 circles)");
    assert!(stdout.contains("warm-up [bundled]"));
    assert!(stdout.contains("corners [bundled]"));
    assert!(stdout.contains("duo.osu"));
    assert!(stdout.contains("Duo"));
    assert!(!stdout.contains("readme.md"));
    Ok(())
}

#[test]
fn interactive_mode_needs_a_tty() -> Result<(), Box<dyn std::error::Error>> {
    let assert = Command::cargo_bin("hitcircle")?
        .write_stdin("")
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone())?;
    assert!(stderr.contains("stdin must be a tty"));
    Ok(())
}

#[test]
fn bad_scoring_value_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("hitcircle")?
        .args(["--scoring", "fuzzy", "--list-maps"])
        .write_stdin("")
        .assert()
        .failure();
    Ok(())
}
