//! Reader for the LIBSVM / SVMlight text format, optionally bzip2 compressed.
//!
//! Each line holds a label followed by `index:value` pairs for the non-zero features:
//!
//! ```text
//! 3 1:0.5 7:1.25 12:-3
//! ```
//!
//! Files loaded together are decoded against a common feature width, and share the decision
//! whether indices count from zero or from one.
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use bzip2::read::MultiBzDecoder;

use super::CsrMatrix;
use crate::error::{BenchError, BenchResult};

/// Rows of one file, before the index base and width of the group are known.
struct RawFile {
    path: PathBuf,
    indptr: Vec<usize>,
    indices: Vec<u64>,
    data: Vec<f32>,
    labels: Vec<f32>,
}

impl RawFile {
    fn min_index(&self) -> Option<u64> {
        self.indices.iter().copied().min()
    }

    fn max_index(&self) -> Option<u64> {
        self.indices.iter().copied().max()
    }
}

/// Open `path` for line reading, decompressing on the fly when it ends in `.bz2`.
pub(crate) fn open_maybe_bz2(path: &Path) -> BenchResult<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |ext| ext == "bz2") {
        Box::new(MultiBzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

/// Load a single LIBSVM file as features and labels.
pub fn load_libsvm_file<P: AsRef<Path>>(path: P) -> BenchResult<(CsrMatrix, Vec<f32>)> {
    let mut files = load_libsvm_files(&[path])?;
    files
        .pop()
        .ok_or_else(|| BenchError::InvalidConfig("no LIBSVM file loaded".into()))
}

/// Load several LIBSVM files that describe the same feature space, typically a train and a
/// test file. Every returned matrix has the width of the widest file.
pub fn load_libsvm_files<P: AsRef<Path>>(paths: &[P]) -> BenchResult<Vec<(CsrMatrix, Vec<f32>)>> {
    let raw = paths
        .iter()
        .map(|p| read_raw(p.as_ref()))
        .collect::<BenchResult<Vec<_>>>()?;

    let zero_based = raw.iter().any(|f| f.min_index() == Some(0));
    let shift = if zero_based { 0 } else { 1 };
    let num_cols = raw
        .iter()
        .filter_map(RawFile::max_index)
        .max()
        .map_or(0, |max| (max + 1 - shift) as usize);
    debug!(
        "LIBSVM group of {} file(s): {} features, {} indices",
        raw.len(),
        num_cols,
        if zero_based { "zero-based" } else { "one-based" }
    );

    raw.into_iter()
        .map(|f| {
            let indices = f
                .indices
                .iter()
                .map(|&i| u32::try_from(i - shift))
                .collect::<Result<Vec<u32>, _>>()
                .map_err(|_| BenchError::Parse {
                    path: f.path.clone(),
                    line: 0,
                    message: "feature index does not fit in 32 bits".into(),
                })?;
            let csr = CsrMatrix::new(f.indptr, indices, f.data, num_cols)?;
            info!("Loaded {} rows from {}", csr.num_rows(), f.path.display());
            Ok((csr, f.labels))
        })
        .collect()
}

fn read_raw(path: &Path) -> BenchResult<RawFile> {
    let mut reader = open_maybe_bz2(path)?;
    let mut raw = RawFile {
        path: path.to_path_buf(),
        indptr: vec![0],
        indices: Vec::new(),
        data: Vec::new(),
        labels: Vec::new(),
    };

    let mut line = String::new();
    let mut lineno = 0;
    loop {
        line.clear();
        let n = reader.read_line(&mut line).map_err(|e| BenchError::io(path, e))?;
        if n == 0 {
            break;
        }
        lineno += 1;
        parse_line(&line, &mut raw).map_err(|message| BenchError::Parse {
            path: path.to_path_buf(),
            line: lineno,
            message,
        })?;
    }
    Ok(raw)
}

fn parse_line(line: &str, raw: &mut RawFile) -> Result<(), String> {
    let content = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let mut tokens = content.split_whitespace();
    let label = match tokens.next() {
        Some(tok) => tok,
        None => return Ok(()),
    };
    let label: f32 = label.parse().map_err(|_| format!("invalid label '{}'", label))?;

    let row_start = raw.indices.len();
    for tok in tokens {
        if tok.starts_with("qid:") {
            continue;
        }
        let (idx, val) = tok
            .split_once(':')
            .ok_or_else(|| format!("expected index:value, found '{}'", tok))?;
        let idx: u64 = idx.parse().map_err(|_| format!("invalid feature index '{}'", idx))?;
        let val: f32 = val.parse().map_err(|_| format!("invalid feature value '{}'", val))?;
        if raw.indices.len() > row_start && raw.indices[raw.indices.len() - 1] >= idx {
            return Err(format!("feature indices must be sorted and unique, found {} again or out of order", idx));
        }
        raw.indices.push(idx);
        raw.data.push(val);
    }
    raw.labels.push(label);
    raw.indptr.push(raw.indices.len());
    Ok(())
}
