//! Directory-level runs.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::VectorError;
use crate::harness::Harness;
use crate::oracle::{Verdict, run_vector};
use crate::vector::load_vectors;

/// Where the vectors live and how much to report.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Root of the test data tree.
    pub data_dir: PathBuf,
    /// Extra steps allowed for a halted CPU to finish its trace.
    pub step_limit: usize,
    /// Reports kept per file.
    pub max_reports: usize,
    /// Only run files whose name contains this.
    pub filter: Option<String>,
}

impl Default for SuiteConfig {
    /// Data from `EMU_TEST_DATA`, falling back to `<workspace>/test-data`.
    fn default() -> Self {
        let data_dir = env::var_os("EMU_TEST_DATA").map_or_else(
            || Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-data"),
            PathBuf::from,
        );
        Self {
            data_dir,
            step_limit: 16,
            max_reports: 5,
            filter: None,
        }
    }
}

/// Tally for one vector file.
#[derive(Debug, Clone, Default)]
pub struct FileSummary {
    pub file: String,
    pub passed: usize,
    pub unimplemented: usize,
    pub defects: usize,
    /// Rendered reports, at most `max_reports`.
    pub reports: Vec<String>,
}

impl FileSummary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.unimplemented + self.defects
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.unimplemented == 0 && self.defects == 0
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_clean() { "PASS" } else { "FAIL" };
        write!(
            f,
            "{}: {status} {}/{} passed, {} unimplemented, {} defects",
            self.file,
            self.passed,
            self.total(),
            self.unimplemented,
            self.defects
        )
    }
}

/// Run every vector in one file.
pub fn run_file<C: Harness>(path: &Path, config: &SuiteConfig) -> Result<FileSummary, VectorError> {
    let vectors = load_vectors::<C::State>(path)?;
    let mut summary = FileSummary {
        file: path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned()),
        ..FileSummary::default()
    };

    for vector in &vectors {
        let verdict = run_vector::<C>(vector, config.step_limit);
        match &verdict {
            Verdict::Pass => summary.passed += 1,
            Verdict::Unimplemented(_) => summary.unimplemented += 1,
            Verdict::Defect(report) => {
                summary.defects += 1;
                log::warn!("{}: defect in {}", summary.file, report.name);
            }
        }
        if let Some(report) = verdict.report()
            && summary.reports.len() < config.max_reports
        {
            summary.reports.push(report.to_string());
        }
    }

    log::info!("{summary}");
    Ok(summary)
}

/// Run every `.json` file under `config.data_dir/subdir`, in parallel.
///
/// Results are sorted by file name. A missing directory yields no results.
pub fn run_suite<C: Harness>(
    config: &SuiteConfig,
    subdir: &str,
) -> Result<Vec<FileSummary>, VectorError> {
    let dir = config.data_dir.join(subdir);
    if !dir.is_dir() {
        log::info!("no test data at {}", dir.display());
        return Ok(Vec::new());
    }

    let io_error = |source| VectorError::Io {
        path: dir.clone(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(&dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let wanted = config
            .filter
            .as_deref()
            .is_none_or(|filter| name.as_deref().is_some_and(|n| n.contains(filter)));
        if path.extension().is_some_and(|ext| ext == "json") && wanted {
            files.push(path);
        }
    }
    files.sort();

    let summaries = files
        .par_iter()
        .map(|path| run_file::<C>(path, config))
        .collect::<Result<Vec<_>, _>>()?;

    let (passed, total) = summaries
        .iter()
        .fold((0, 0), |(p, t), s| (p + s.passed, t + s.total()));
    log::info!(
        "{}: {} files, {passed}/{total} vectors passed",
        dir.display(),
        summaries.len()
    );
    Ok(summaries)
}
