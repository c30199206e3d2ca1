// Reading rosters from CSV files.

use snafu::ResultExt;

use crate::draw::io_common::sheet_name_for;
use crate::draw::*;

/// Reads a CSV file as a single sheet named after the file.
///
/// Rows may have different lengths. A malformed record fails the sheet, not
/// the run.
pub fn read_csv_sheet(path: &str) -> DrawResult<SheetRows> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let name = sheet_name_for(path);
    Ok(SheetRows {
        name,
        rows: read_records(rdr),
    })
}

fn read_records<R: std::io::Read>(rdr: csv::Reader<R>) -> DrawResult<Vec<Vec<String>>> {
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_records: lineno: {:?} row: {:?}", lineno, line);
        res.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_ragged_rows() {
        let p = std::env::temp_dir().join(format!("Cadets Female-{}.csv", std::process::id()));
        fs::write(&p, "Name,Club\nKim,Tigers\n\"Lee, Jr\"\nPark,Dragons,extra\n").unwrap();
        let sheet = read_csv_sheet(p.to_str().unwrap()).unwrap();
        assert!(sheet.name.starts_with("Cadets Female-"));
        let rows = sheet.rows.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["Name", "Club"]);
        assert_eq!(rows[2], vec!["Lee, Jr"]);
        assert_eq!(rows[3].len(), 3);
        let _ = fs::remove_file(&p);
    }

    #[test]
    fn invalid_utf8_fails_the_sheet() {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&b"Name\nKim\n\xff\xfe\n"[..]);
        match read_records(rdr) {
            Err(DrawError::CsvLineParse { lineno, .. }) => assert_eq!(lineno, 3),
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_sheet("/nonexistent/roster.csv"),
            Err(DrawError::CsvOpen { .. })
        ));
    }
}
