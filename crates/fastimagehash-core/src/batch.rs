use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::MultiHashConfig;
use crate::error::Result;
use crate::logging::log_hash_error;
use crate::processing::{multi_hash_file, MultiHashBundle};

/// Outcome of hashing one file
#[derive(Debug)]
pub struct FileHashResult {
    pub path: PathBuf,
    pub result: Result<MultiHashBundle>,
}

impl FileHashResult {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Multi-hash every file in parallel
///
/// The configuration is validated once up front; after that a failing file is logged and
/// reported in its own entry without affecting the others. Results keep the input order.
pub fn hash_files<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &MultiHashConfig,
) -> Result<Vec<FileHashResult>> {
    config.validate()?;
    let start = Instant::now();

    let results: Vec<FileHashResult> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let result = multi_hash_file(path, config);
            if let Err(e) = &result {
                log_hash_error(path, None, e);
            }
            FileHashResult {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect();

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        warn!("{} of {} files could not be hashed", failed, results.len());
    }
    info!(
        "Hashed {} files in {:.2?}",
        results.len() - failed,
        start.elapsed()
    );

    Ok(results)
}
