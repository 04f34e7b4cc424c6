use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file {}: {}", path.display(), e),
        )
    })?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Is this line a BED header (`track`, `browser` or a `#` comment)?
///
pub fn is_bed_header(line: &str) -> bool {
    line.starts_with("browser") || line.starts_with("track") || line.starts_with('#')
}

///
/// Derive a set label from a file path: the file name with `.gz` and the
/// last remaining extension removed (`peaks.bed.gz` -> `peaks`).
///
pub fn label_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let base = file_name.strip_suffix(".gz").unwrap_or(file_name);
    match Path::new(base).file_stem().and_then(OsStr::to_str) {
        Some(stem) => stem.to_string(),
        None => base.to_string(),
    }
}
