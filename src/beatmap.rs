//! Beatmaps: an ordered list of timed targets plus a little metadata.
//!
//! Text charts carry a `[HitObjects]` section of `x,y,time,...` lines; a
//! bare `circle,x,y,time` format is accepted as a fallback. `.osz` archives
//! are zip files holding one or more `.osu` charts.

use crate::hit_target::{HitTarget, Point, TargetTiming};
use crate::judge::CIRCLE_RADIUS;
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

pub const PLAYFIELD_WIDTH: f64 = 800.0;
pub const PLAYFIELD_HEIGHT: f64 = 600.0;

pub const MAP_EXTENSIONS: [&str; 3] = ["osu", "osz", "txt"];

static BUNDLED_MAPS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/maps");

#[derive(Error, Debug)]
pub enum BeatmapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid beatmap archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("no .osu chart found in archive {0}")]
    NoChartInArchive(PathBuf),
    #[error("beatmap '{0}' has no hit objects")]
    NoTargets(String),
    #[error("unknown bundled map '{0}'")]
    UnknownBundled(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeatmapMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub creator: Option<String>,
    pub audio_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beatmap {
    pub name: String,
    pub metadata: BeatmapMetadata,
    targets: Vec<HitTarget>,
}

impl Beatmap {
    /// Builds a map from `(x, y, time)` triples, sorted by time. Sequence
    /// numbers follow the sorted order.
    pub fn from_triples(
        name: impl Into<String>,
        triples: &[(i32, i32, i64)],
        timing: TargetTiming,
    ) -> Result<Self, BeatmapError> {
        let name = name.into();
        if triples.is_empty() {
            return Err(BeatmapError::NoTargets(name));
        }

        let targets = triples
            .iter()
            .sorted_by_key(|(_, _, t)| *t)
            .enumerate()
            .map(|(i, &(x, y, t))| HitTarget::new(Point::from((x, y)), t, i + 1, timing))
            .collect();

        Ok(Self {
            name,
            metadata: BeatmapMetadata::default(),
            targets,
        })
    }

    pub fn parse(
        name: impl Into<String>,
        text: &str,
        timing: TargetTiming,
    ) -> Result<Self, BeatmapError> {
        let (triples, metadata) = parse_chart(text);
        let mut map = Self::from_triples(name, &triples, timing)?;
        map.metadata = metadata;
        Ok(map)
    }

    pub fn load(path: &Path, timing: TargetTiming) -> Result<Self, BeatmapError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let text = if has_extension(path, "osz") {
            read_archive_chart(path)?
        } else {
            fs::read_to_string(path).map_err(|source| BeatmapError::Io {
                path: path.to_path_buf(),
                source,
            })?
        };

        let map = Self::parse(name, &text, timing)?;
        info!("Loaded '{}' from {} ({} targets)", map.name, path.display(), map.len());
        Ok(map)
    }

    /// Practice map: one target every 800ms starting at 1s, placed anywhere
    /// the whole circle fits in the playfield.
    pub fn random(
        count: usize,
        seed: Option<u64>,
        timing: TargetTiming,
    ) -> Result<Self, BeatmapError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let margin = (CIRCLE_RADIUS + 10.0) as i32;

        let triples = (0..count)
            .map(|i| {
                let x = rng.gen_range(margin..=PLAYFIELD_WIDTH as i32 - margin);
                let y = rng.gen_range(margin..=PLAYFIELD_HEIGHT as i32 - margin);
                (x, y, 1000 + i as i64 * 800)
            })
            .collect::<Vec<_>>();

        Self::from_triples("Random practice", &triples, timing)
    }

    /// Five circles 1.5s apart: centre, right, left, top, bottom.
    pub fn tutorial(timing: TargetTiming) -> Result<Self, BeatmapError> {
        let (w, h) = (PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        let spots = [(0.5, 0.5), (0.75, 0.5), (0.25, 0.5), (0.5, 0.16), (0.5, 0.83)];
        let triples = spots
            .iter()
            .enumerate()
            .map(|(i, &(fx, fy))| {
                let x = (w * fx).round() as i32;
                let y = (h * fy).round() as i32;
                (x, y, 1000 + i as i64 * 1500)
            })
            .collect::<Vec<_>>();

        let mut map = Self::from_triples("tutorial", &triples, timing)?;
        map.metadata.title = Some("Tutorial".to_string());
        Ok(map)
    }

    pub fn bundled(name: &str, timing: TargetTiming) -> Result<Self, BeatmapError> {
        let file = BUNDLED_MAPS
            .files()
            .find(|f| file_stem(f.path()) == name)
            .ok_or_else(|| BeatmapError::UnknownBundled(name.to_string()))?;
        let text = file.contents_utf8().unwrap_or_default();
        Self::parse(name, text, timing)
    }

    pub fn targets(&self) -> &[HitTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Time of the last target.
    pub fn duration_ms(&self) -> i64 {
        self.targets.last().map(|t| t.target_time).unwrap_or(0)
    }

    pub fn display_title(&self) -> String {
        match (&self.metadata.artist, &self.metadata.title) {
            (Some(artist), Some(title)) => format!("{artist} - {title}"),
            (None, Some(title)) => title.clone(),
            _ => self.name.clone(),
        }
    }
}

/// Where a selectable map comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    Random { count: usize, seed: Option<u64> },
    Bundled(String),
    File(PathBuf),
}

impl MapSource {
    pub fn label(&self) -> String {
        match self {
            MapSource::Random { count, .. } => format!("Random practice ({count} circles)"),
            MapSource::Bundled(name) => format!("{name} [bundled]"),
            MapSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    pub fn load(&self, timing: TargetTiming) -> Result<Beatmap, BeatmapError> {
        match self {
            MapSource::Random { count, seed } => Beatmap::random(*count, *seed, timing),
            MapSource::Bundled(name) => Beatmap::bundled(name, timing),
            MapSource::File(path) => Beatmap::load(path, timing),
        }
    }
}

pub fn bundled_names() -> Vec<String> {
    BUNDLED_MAPS
        .files()
        .filter(|f| is_map_file(f.path()))
        .map(|f| file_stem(f.path()))
        .sorted()
        .collect()
}

/// Map files directly inside `dir`, sorted by file name. A missing
/// directory yields an empty list.
pub fn discover(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Maps directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_map_file(p))
        .sorted()
        .collect()
}

/// Everything the map select screen offers, in display order.
pub fn catalog(maps_dir: Option<&Path>, random_count: usize, seed: Option<u64>) -> Vec<MapSource> {
    let mut sources = vec![MapSource::Random {
        count: random_count,
        seed,
    }];
    sources.extend(bundled_names().into_iter().map(MapSource::Bundled));
    if let Some(dir) = maps_dir {
        sources.extend(discover(dir).into_iter().map(MapSource::File));
    }
    sources
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

fn is_map_file(path: &Path) -> bool {
    MAP_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

fn read_archive_chart(path: &Path) -> Result<String, BeatmapError> {
    let bytes = fs::read(path).map_err(|source| BeatmapError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut archive = match ZipArchive::new(Cursor::new(bytes.as_slice())) {
        Ok(archive) => archive,
        Err(e) => {
            warn!("{} is not a zip archive ({}), reading as text", path.display(), e);
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }
    };

    let chart_name = archive
        .file_names()
        .find(|n| n.to_ascii_lowercase().ends_with(".osu"))
        .map(str::to_owned)
        .ok_or_else(|| BeatmapError::NoChartInArchive(path.to_path_buf()))?;

    let mut chart = archive.by_name(&chart_name)?;
    let mut text = String::new();
    chart
        .read_to_string(&mut text)
        .map_err(|source| BeatmapError::Io {
            path: path.join(&chart_name),
            source,
        })?;
    Ok(text)
}

fn parse_numbers(fields: &[&str]) -> Option<(i32, i32, i64)> {
    let x = fields.first()?.trim().parse().ok()?;
    let y = fields.get(1)?.trim().parse().ok()?;
    let t = fields.get(2)?.trim().parse().ok()?;
    Some((x, y, t))
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("//")
}

fn parse_chart(text: &str) -> (Vec<(i32, i32, i64)>, BeatmapMetadata) {
    let mut metadata = BeatmapMetadata::default();
    let mut triples = Vec::new();
    let mut section = "";

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if is_skippable(line) {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = &line[1..line.len() - 1];
            continue;
        }

        match section {
            "HitObjects" => {
                let fields = line.split(',').collect::<Vec<_>>();
                match parse_numbers(&fields) {
                    Some(triple) => triples.push(triple),
                    None => warn!(
                        "Skipping malformed hit object on line {}: {}",
                        line_no + 1,
                        line
                    ),
                }
            }
            "General" | "Metadata" => {
                if let Some((key, value)) = line.split_once(':') {
                    let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                    match key.trim() {
                        "AudioFilename" => metadata.audio_filename = value,
                        "Title" => metadata.title = value,
                        "Artist" => metadata.artist = value,
                        "Creator" => metadata.creator = value,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if triples.is_empty() {
        triples = text
            .lines()
            .map(str::trim)
            .filter(|l| !is_skippable(l))
            .filter_map(|l| {
                let fields = l.split(',').collect::<Vec<_>>();
                match fields.split_first() {
                    Some((&"circle", rest)) => parse_numbers(rest),
                    _ => None,
                }
            })
            .collect();
    }

    (triples, metadata)
}
