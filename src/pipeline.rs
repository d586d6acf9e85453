//! One refresh cycle: scan → parse dates → filter → order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Configuration;
use crate::dates::extract_date;
use crate::error::{DateParseError, Error};
use crate::ordering::{OrderMode, order};
use crate::scan::{ExtensionMatcher, scan};
use crate::state::{ImageEntry, SlideshowState};
use crate::visibility::{elapsed_since_midnight, is_visible};
use crate::zone::Zone;

/// A matched file whose name carries no usable date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsedFile {
    pub relative_path: String,
    pub error: DateParseError,
}

/// Outcome of a successful cycle.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub state: SlideshowState,
    /// Matched files skipped because their name has no valid date.
    pub unparsed: Vec<UnparsedFile>,
    /// Dated files hidden by the cutoff.
    pub hidden: usize,
}

/// Everything a refresh cycle needs, including the process-wide shuffle RNG.
#[derive(Debug)]
pub struct Pipeline {
    root: PathBuf,
    matcher: ExtensionMatcher,
    zone: Zone,
    mode: OrderMode,
    rng: StdRng,
}

impl Pipeline {
    pub fn new(
        root: PathBuf,
        matcher: ExtensionMatcher,
        zone: Zone,
        mode: OrderMode,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            root,
            matcher,
            zone,
            mode,
            rng,
        }
    }

    pub fn from_config(cfg: &Configuration) -> Result<Self, Error> {
        let matcher = ExtensionMatcher::new(cfg.extensions.as_slice())?;
        Ok(Self::new(
            cfg.photo_dir.clone(),
            matcher,
            cfg.timezone,
            OrderMode::from_shuffle_flag(cfg.shuffle),
            cfg.shuffle_seed,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Run a cycle against the zone's current wall clock.
    pub fn run_once(&mut self) -> Result<ScanReport, Error> {
        let now = self.zone.now();
        self.run_at(now)
    }

    /// Run a cycle as if the wall clock read `now`.
    ///
    /// # Errors
    /// Only a failed directory walk is an error; undated files end up in
    /// [`ScanReport::unparsed`].
    pub fn run_at(&mut self, now: DateTime<FixedOffset>) -> Result<ScanReport, Error> {
        let files = scan(&self.root, &self.matcher)?;
        let elapsed = elapsed_since_midnight(&now);

        let mut unparsed = Vec::new();
        let mut hidden = 0;
        let mut visible = Vec::new();
        for file in files {
            match extract_date(&file.base_name, self.zone) {
                Ok(date) if is_visible(&date, &now, elapsed) => visible.push(ImageEntry {
                    relative_path: file.relative_path,
                    base_name: file.base_name,
                    parsed_date: Some(date),
                }),
                Ok(_) => hidden += 1,
                Err(error) => unparsed.push(UnparsedFile {
                    relative_path: file.relative_path,
                    error,
                }),
            }
        }

        let entries = order(visible, self.mode, &mut self.rng);
        Ok(ScanReport {
            state: SlideshowState {
                entries,
                generated_at: now.with_timezone(&Utc),
            },
            unparsed,
            hidden,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::DEFAULT_EXTENSIONS;
    use chrono::{NaiveDate, NaiveTime};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn undated_and_past_files_are_counted_not_shown() {
        let tmp = tempdir().unwrap();
        for name in ["2024-01-01 a.jpg", "2024-01-02 b.png", "zzz.jpg", "2024-01-05 notes.txt"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let zone = Zone::Named(chrono_tz::UTC);
        let mut pipeline = Pipeline::new(
            tmp.path().to_path_buf(),
            ExtensionMatcher::new(&DEFAULT_EXTENSIONS).unwrap(),
            zone,
            OrderMode::Sorted,
            None,
        );
        let now = zone
            .ymd_hms(
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            )
            .unwrap();

        let report = pipeline.run_at(now).unwrap();
        assert_eq!(
            report.state.relative_paths().collect::<Vec<_>>(),
            vec!["2024-01-02 b.png"]
        );
        assert_eq!(report.hidden, 1);
        assert_eq!(report.unparsed.len(), 1);
        assert_eq!(report.unparsed[0].relative_path, "zzz.jpg");
        assert!(report.state.entries.iter().all(|e| e.parsed_date.is_some()));
        assert_eq!(report.state.generated_at, now.with_timezone(&Utc));
    }
}
