//! File logging. The terminal belongs to the TUI, so records go to a file.

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Installs the global logger writing to `path`. `filters` accepts
/// `RUST_LOG` syntax (`debug`, `hitcircle::session=trace`, ...); when absent
/// `RUST_LOG` is consulted, then `default_level`.
pub fn init_logger(
    path: &Path,
    filters: Option<&str>,
    default_level: LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut builder = Builder::new();
    builder.filter_level(default_level);
    if let Ok(env) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env);
    }
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .try_init()?;

    log::info!("Logging to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_timestamped_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("test.log");
        init_logger(&path, Some("info"), LevelFilter::Warn).unwrap();
        log::info!("hello from the test");
        log::logger().flush();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("INFO  [hitcircle::logging::tests] hello from the test"));
        assert!(text.contains("Logging to"));

        // a second global logger is refused
        assert!(init_logger(&path, None, LevelFilter::Info).is_err());
    }
}
