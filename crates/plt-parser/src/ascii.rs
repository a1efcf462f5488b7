//! ASCII point-format reader and writer.
//!
//! The supported grammar is the point-format subset commonly produced by
//! solver post-processing tools:
//!
//! ```text
//! TITLE = "run 42"
//! VARIABLES = "X [R]" "Y [R]" "Z [R]" "B_x [nT]"
//! ZONE T="3d field data", I=8, F=POINT
//!  0.000000000E0  0.000000000E0 ...
//! ```
//!
//! `TITLE` is optional. `VARIABLES` lists quoted names and may continue on
//! following lines that start with a quote. Each `ZONE` record carries a
//! quoted name in `T=`, point counts in `I=` (optionally `J=`/`K=`, which
//! multiply), and point-major packing (`F=POINT`); it is followed by one row
//! per sample point with one value per variable.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{PltError, PltResult};

/// Read a dataset from an ASCII point-format file.
pub fn read_ascii(path: impl AsRef<Path>) -> PltResult<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = parse_ascii(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        variables = dataset.num_variables(),
        zones = dataset.num_zones(),
        "dataset parsed"
    );
    Ok(dataset)
}

/// Parse a dataset from any buffered reader.
pub fn parse_ascii<R: BufRead>(reader: R) -> PltResult<Dataset> {
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

    let mut title = String::new();
    let mut variables: Vec<String> = Vec::new();
    let mut zones: Vec<(String, usize, Vec<Vec<f64>>)> = Vec::new();
    let mut pos = 0;

    while pos < lines.len() {
        let line = lines[pos].trim();
        if line.is_empty() || line.starts_with('#') {
            pos += 1;
            continue;
        }

        if let Some(rest) = strip_keyword(line, "TITLE") {
            title = quoted_strings(rest).into_iter().next().unwrap_or_default();
            pos += 1;
        } else if let Some(rest) = strip_keyword(line, "VARIABLES") {
            variables = quoted_strings(rest);
            pos += 1;
            // Quoted continuation lines extend the variable list.
            while pos < lines.len() && lines[pos].trim().starts_with('"') {
                variables.extend(quoted_strings(lines[pos].trim()));
                pos += 1;
            }
            if variables.is_empty() {
                return Err(PltError::invalid_format(
                    "VARIABLES header lists no variable names".to_string(),
                ));
            }
        } else if line.starts_with("ZONE") {
            if variables.is_empty() {
                return Err(PltError::missing_data(
                    "VARIABLES header before first ZONE".to_string(),
                ));
            }
            let (name, num_points) = parse_zone_header(line)?;
            pos += 1;
            let (next, columns) =
                parse_zone_rows(&lines, pos, variables.len(), &name, num_points)?;
            pos = next;
            zones.push((name, num_points, columns));
        } else {
            return Err(PltError::invalid_format(format!("unexpected line: {line}")));
        }
    }

    if variables.is_empty() {
        return Err(PltError::missing_data("VARIABLES header".to_string()));
    }
    // Header-only files are valid datasets with zero zones.
    let mut dataset = Dataset::new(title, variables)?;
    for (name, num_points, columns) in zones {
        dataset.push_zone(name, num_points, columns)?;
    }
    Ok(dataset)
}

/// Write selected variables and zones of a dataset as ASCII point format.
///
/// `variables` and `zones` are dataset positions; every selected zone is
/// written point-major, one row per sample point, in the given variable
/// order.
pub fn write_ascii(
    path: impl AsRef<Path>,
    dataset: &Dataset,
    variables: &[usize],
    zones: &[usize],
) -> PltResult<()> {
    let path = path.as_ref();
    for &vi in variables {
        if vi >= dataset.num_variables() {
            return Err(PltError::missing_data(format!("variable index {vi}")));
        }
    }

    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "TITLE = \"{}\"", dataset.title())?;
    write!(out, "VARIABLES =")?;
    for &vi in variables {
        write!(out, " \"{}\"", dataset.variables()[vi])?;
    }
    writeln!(out)?;

    for &zi in zones {
        let zone = dataset.zone(zi)?;
        writeln!(out, "ZONE T=\"{}\", I={}, F=POINT", zone.name(), zone.num_points())?;
        for p in 0..zone.num_points() {
            for &vi in variables {
                write!(out, " {:>15.9E}", zone.values(vi)[p])?;
            }
            writeln!(out)?;
        }
    }

    out.flush()?;
    debug!(path = %path.display(), zones = zones.len(), "dataset written");
    Ok(())
}

/// Strip `KEYWORD` and the following `=` from the start of a line.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?.trim_start();
    rest.strip_prefix('=').map(str::trim_start)
}

/// Extract every double-quoted string from a line.
fn quoted_strings(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = line;
    while let Some(start) = rest.find('"') {
        let tail = &rest[start + 1..];
        match tail.find('"') {
            Some(end) => {
                out.push(tail[..end].to_string());
                rest = &tail[end + 1..];
            }
            None => break,
        }
    }
    out
}

/// Parse a ZONE header line into its name and total point count.
fn parse_zone_header(line: &str) -> PltResult<(String, usize)> {
    let rest = line.strip_prefix("ZONE").unwrap_or(line);

    // The zone name may contain commas, so cut the quoted T="..." span out
    // before splitting the remaining key=value pairs.
    let mut name = String::new();
    let mut remainder = String::new();
    if let Some(tpos) = rest.find("T=\"") {
        let tail = &rest[tpos + 3..];
        let end = tail.find('"').ok_or_else(|| {
            PltError::invalid_format(format!("unterminated zone name: {line}"))
        })?;
        name = tail[..end].to_string();
        remainder.push_str(&rest[..tpos]);
        remainder.push_str(&tail[end + 1..]);
    } else {
        remainder.push_str(rest);
    }

    let (mut i, mut j, mut k) = (None, 1usize, 1usize);
    for token in remainder.split(|c: char| c == ',' || c.is_whitespace()) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (key, value) = token.split_once('=').ok_or_else(|| {
            PltError::invalid_format(format!("malformed zone attribute '{token}' in: {line}"))
        })?;
        match key {
            "I" => i = Some(parse_count(value, line)?),
            "J" => j = parse_count(value, line)?,
            "K" => k = parse_count(value, line)?,
            "F" | "DATAPACKING" => {
                if value != "POINT" {
                    return Err(PltError::invalid_format(format!(
                        "unsupported zone packing '{value}', only POINT is supported"
                    )));
                }
            }
            _ => {
                return Err(PltError::invalid_format(format!(
                    "unknown zone attribute '{key}' in: {line}"
                )))
            }
        }
    }

    let i = i.ok_or_else(|| {
        PltError::missing_data(format!("zone point count (I=) in: {line}"))
    })?;
    Ok((name, i * j * k))
}

fn parse_count(value: &str, line: &str) -> PltResult<usize> {
    value.parse().map_err(|_| {
        PltError::invalid_format(format!("invalid zone dimension '{value}' in: {line}"))
    })
}

/// Parse `num_points` data rows starting at `pos`; returns the next line
/// index and the per-variable sample columns.
fn parse_zone_rows(
    lines: &[String],
    mut pos: usize,
    num_vars: usize,
    name: &str,
    num_points: usize,
) -> PltResult<(usize, Vec<Vec<f64>>)> {
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(num_points); num_vars];

    let mut rows = 0;
    while rows < num_points {
        let line = match lines.get(pos) {
            Some(line) => line.trim(),
            None => {
                return Err(PltError::missing_data(format!(
                    "zone '{name}': expected {num_points} data rows, found {rows}"
                )))
            }
        };
        pos += 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut count = 0;
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| {
                PltError::invalid_format(format!(
                    "zone '{name}', row {rows}: invalid value '{token}'"
                ))
            })?;
            if count < num_vars {
                columns[count].push(value);
            }
            count += 1;
        }
        if count != num_vars {
            return Err(PltError::invalid_format(format!(
                "zone '{name}', row {rows}: expected {num_vars} values, got {count}"
            )));
        }
        rows += 1;
    }

    Ok((pos, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = r#"
TITLE = "sample"
VARIABLES = "X [R]" "Y [R]" "B_x [nT]"
ZONE T="first, with commas", I=2, F=POINT
 1.0 2.0 3.0
 4.0 5.0 6.0
ZONE T="second", I=1, F=POINT
 7.0 8.0 9.0
"#;

    #[test]
    fn test_parse_sample() {
        let ds = parse_ascii(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(ds.title(), "sample");
        assert_eq!(ds.variables(), &["X [R]", "Y [R]", "B_x [nT]"]);
        assert_eq!(ds.num_zones(), 2);

        let first = ds.zone(0).unwrap();
        assert_eq!(first.name(), "first, with commas");
        assert_eq!(first.num_points(), 2);
        assert_eq!(first.values(0), &[1.0, 4.0]);
        assert_eq!(first.values(2), &[3.0, 6.0]);

        let second = ds.zone(1).unwrap();
        assert_eq!(second.num_points(), 1);
        assert_eq!(second.values(1), &[8.0]);
    }

    #[test]
    fn test_parse_ijk_zone() {
        let text = r#"
VARIABLES = "X"
ZONE T="block", I=2, J=2, K=2, F=POINT
 1
 2
 3
 4
 5
 6
 7
 8
"#;
        let ds = parse_ascii(Cursor::new(text)).unwrap();
        assert_eq!(ds.zone(0).unwrap().num_points(), 8);
    }

    #[test]
    fn test_parse_multiline_variables() {
        let text = "VARIABLES = \"X\" \"Y\"\n\"Z\"\nZONE T=\"z\", I=1, F=POINT\n1 2 3\n";
        let ds = parse_ascii(Cursor::new(text)).unwrap();
        assert_eq!(ds.variables(), &["X", "Y", "Z"]);
    }

    #[test]
    fn test_parse_nan_values() {
        let text = "VARIABLES = \"X\" \"B\"\nZONE T=\"z\", I=1, F=POINT\n1.0 NaN\n";
        let ds = parse_ascii(Cursor::new(text)).unwrap();
        assert!(ds.zone(0).unwrap().values(1)[0].is_nan());
    }

    #[test]
    fn test_truncated_zone_rejected() {
        let text = "VARIABLES = \"X\"\nZONE T=\"z\", I=3, F=POINT\n1.0\n2.0\n";
        assert!(matches!(
            parse_ascii(Cursor::new(text)),
            Err(PltError::MissingData(_))
        ));
    }

    #[test]
    fn test_short_row_rejected() {
        let text = "VARIABLES = \"X\" \"Y\"\nZONE T=\"z\", I=1, F=POINT\n1.0\n";
        assert!(matches!(
            parse_ascii(Cursor::new(text)),
            Err(PltError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_variables_header_rejected() {
        let text = "ZONE T=\"z\", I=1, F=POINT\n1.0\n";
        assert!(matches!(
            parse_ascii(Cursor::new(text)),
            Err(PltError::MissingData(_))
        ));
    }

    #[test]
    fn test_block_packing_rejected() {
        let text = "VARIABLES = \"X\"\nZONE T=\"z\", I=1, F=BLOCK\n1.0\n";
        assert!(matches!(
            parse_ascii(Cursor::new(text)),
            Err(PltError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_write_then_read_selected() {
        let mut ds = parse_ascii(Cursor::new(SAMPLE)).unwrap();
        let zi = ds.add_ordered_zone("derived", 2);
        ds.zone_mut(zi).unwrap().values_mut(0).copy_from_slice(&[-1.5, 2.5e-6]);
        ds.zone_mut(zi).unwrap().values_mut(2).copy_from_slice(&[0.0, -4.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dat");
        write_ascii(&path, &ds, &[0, 2], &[zi]).unwrap();

        let back = read_ascii(&path).unwrap();
        assert_eq!(back.variables(), &["X [R]", "B_x [nT]"]);
        assert_eq!(back.num_zones(), 1);
        let zone = back.zone(0).unwrap();
        assert_eq!(zone.name(), "derived");
        assert!((zone.values(0)[0] + 1.5).abs() < 1e-12);
        assert!((zone.values(0)[1] - 2.5e-6).abs() < 1e-18);
        assert_eq!(zone.values(1), &[0.0, -4.0]);
    }

    #[test]
    fn test_write_bad_variable_index_rejected() {
        let ds = parse_ascii(Cursor::new(SAMPLE)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dat");
        assert!(write_ascii(&path, &ds, &[0, 9], &[0]).is_err());
    }
}
