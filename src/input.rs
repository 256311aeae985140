//! Reading newline-delimited CIDR lists.

use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ipv4::Ipv4Cidr;

/// One CIDR per line, surrounding whitespace trimmed.
///
/// Blank lines and comments are not special: they fail like any other bad
/// line, and the first failure aborts the read.
pub fn parse_cidr_lines<R: BufRead>(reader: R) -> Result<Vec<Ipv4Cidr>> {
    let mut cidrs = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Io {
            path: "<input>".into(),
            source,
        })?;
        let cidr = Ipv4Cidr::from_str(line.trim()).map_err(|source| Error::Line {
            line: i + 1,
            source,
        })?;
        cidrs.push(cidr);
    }
    Ok(cidrs)
}

pub fn read_cidr_file<P: AsRef<Path>>(path: P) -> Result<Vec<Ipv4Cidr>> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let cidrs = parse_cidr_lines(BufReader::new(file)).map_err(|e| match e {
        Error::Io { source, .. } => io_err(source),
        e => e,
    })?;
    info!("read {} CIDRs from {}", cidrs.len(), path.display());
    Ok(cidrs)
}
