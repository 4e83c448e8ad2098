//Sbbu
//Copyright (C) 2022-2024 A. Dubray
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! This module provides a loader for the whitespace-delimited `.nmr` format:
//! one edge per line, two positive integers `i j` with `i < j`. Empty lines
//! and surrounding whitespace are accepted; anything else is rejected with
//! the offending line number.
//!
//! An example of valid file is given next
//!
//! 1 10
//! 3 15
//! 15 20

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::Error;
use crate::core::instance::Instance;

/// Reads an `.nmr` file and builds the instance from its edge records.
pub fn instance_from_nmr(filepath: &Path) -> Result<Instance, Error> {
    let file = File::open(filepath)
        .map_err(|e| Error::Input(format!("could not open {}: {}", filepath.display(), e)))?;
    let reader = BufReader::new(file);
    let mut records = vec![];
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        let mut tokens = content.split_whitespace();
        let i = parse_atom(tokens.next(), number + 1)?;
        let j = parse_atom(tokens.next(), number + 1)?;
        if let Some(extra) = tokens.next() {
            return Err(Error::Input(format!(
                "[line {}] unexpected token '{}' after the edge",
                number + 1,
                extra
            )));
        }
        if i == 0 || j <= i {
            return Err(Error::Input(format!(
                "[line {}] expected 0 < i < j, got i = {} and j = {}",
                number + 1,
                i,
                j
            )));
        }
        records.push((i, j));
    }
    if records.is_empty() {
        return Err(Error::Input(format!(
            "no edges found in {}",
            filepath.display()
        )));
    }
    Instance::from_records(&records)
}

fn parse_atom(token: Option<&str>, line_number: usize) -> Result<usize, Error> {
    match token {
        Some(token) => token.parse::<usize>().map_err(|_| {
            Error::Input(format!(
                "[line {}] invalid atom index '{}'",
                line_number, token
            ))
        }),
        None => Err(Error::Input(format!(
            "[line {}] expected two atom indices",
            line_number
        ))),
    }
}

#[cfg(test)]
mod test_nmr_parsing {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;

    fn write_nmr(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".nmr").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_edges_and_blank_lines() {
        let file = write_nmr("1 10\n\n3 15\n15 20   \n");
        let instance = instance_from_nmr(file.path()).unwrap();
        assert_eq!(3, instance.number_edges());
        assert_eq!(20, instance.n_nodes());
    }

    #[test]
    fn rejects_missing_file() {
        let result = instance_from_nmr(Path::new("does/not/exist.nmr"));
        assert!(matches!(result, Err(Error::Input(_))));
    }

    #[test]
    fn rejects_empty_file() {
        let file = write_nmr("\n\n");
        assert!(matches!(
            instance_from_nmr(file.path()),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let file = write_nmr("1 ten\n");
        assert!(matches!(
            instance_from_nmr(file.path()),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn rejects_extra_tokens() {
        let file = write_nmr("1 10 2.75\n");
        assert!(matches!(
            instance_from_nmr(file.path()),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn rejects_inverted_edges() {
        let file = write_nmr("10 1\n");
        assert!(matches!(
            instance_from_nmr(file.path()),
            Err(Error::Input(_))
        ));
    }

    #[test]
    fn surfaces_oversized_segments() {
        let file = write_nmr("1 67\n");
        assert!(matches!(
            instance_from_nmr(file.path()),
            Err(Error::Overflow(_))
        ));
    }
}
