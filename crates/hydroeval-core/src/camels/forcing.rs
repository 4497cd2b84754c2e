use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use hydroeval_macros::Columns;
use tracing::{debug, trace};

use super::{find_file, parse_date, parse_value};
use crate::error::{EvalError, Result};
use crate::series::TimeSeries;

/// Header lines before the table: latitude, elevation, catchment area.
const PREAMBLE_LINES: usize = 3;

/// Date columns leading every row: Year, Mnth, Day, Hr.
const DATE_COLUMNS: [&str; 4] = ["year", "mnth", "day", "hr"];

/// One day of basin-mean meteorological forcing.
#[derive(Debug, Clone, Copy, PartialEq, Columns)]
#[columns(table_name = "ForcingColumns")]
pub struct ForcingRecord {
    /// Day length [s]
    pub dayl: f64,
    /// Precipitation [mm/day]
    pub prcp: f64,
    /// Shortwave radiation [W/m2]
    pub srad: f64,
    /// Snow water equivalent [mm]
    pub swe: f64,
    /// Maximum air temperature [C]
    pub tmax: f64,
    /// Minimum air temperature [C]
    pub tmin: f64,
    /// Vapour pressure [Pa]
    pub vp: f64,
}

/// Forcing columns indexed by date.
#[derive(Debug, Clone, PartialEq)]
pub struct ForcingTable {
    pub dates: Vec<NaiveDateTime>,
    pub columns: ForcingColumns,
}

impl ForcingTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// One forcing column as a dated series, e.g. `"prcp"`.
    pub fn series(&self, name: &str) -> Result<TimeSeries> {
        let column = self.columns.column(name).ok_or_else(|| {
            EvalError::InvalidArgument(format!(
                "unknown forcing column {name:?}, expected one of {:?}",
                ForcingRecord::field_names()
            ))
        })?;
        TimeSeries::new(self.dates.clone(), column.to_vec())
    }
}

/// Load the basin-mean forcing file of `basin` for the forcing product
/// `forcings` (e.g. `"daymet"`, `"maurer"`, `"nldas"`).
///
/// The file is searched below `<data_dir>/basin_mean_forcing/<forcings>/`.
/// Returns the table and the catchment area in square metres.
#[tracing::instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn load_forcings(data_dir: &Path, basin: &str, forcings: &str) -> Result<(ForcingTable, i64)> {
    let forcing_dir = data_dir.join("basin_mean_forcing").join(forcings);
    if !forcing_dir.is_dir() {
        return Err(EvalError::NotFound(format!(
            "forcing directory {} does not exist",
            forcing_dir.display()
        )));
    }

    let prefix = format!("{basin}_");
    let path = find_file(&forcing_dir, &|name: &str| {
        name.starts_with(&prefix) && name.ends_with("_forcing_leap.txt")
    })?
    .ok_or_else(|| EvalError::NotFound(format!("no forcing file for basin {basin}")))?;

    let (table, area) = parse_forcing_file(&path)?;
    debug!(path = %path.display(), rows = table.len(), area, "loaded forcings");
    Ok((table, area))
}

fn parse_forcing_file(path: &Path) -> Result<(ForcingTable, i64)> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));

    let mut area = 0;
    for _ in 0..PREAMBLE_LINES {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| EvalError::parse(path, 0, "file ends inside the header"))?;
        if line_no == PREAMBLE_LINES {
            area = line
                .trim()
                .parse::<i64>()
                .map_err(|_| EvalError::parse(path, line_no, format!("invalid area {:?}", line.trim())))?;
        }
    }

    let (header_no, header) = lines
        .next()
        .ok_or_else(|| EvalError::parse(path, PREAMBLE_LINES + 1, "missing column header"))?;
    let positions = column_positions(path, header_no, header)?;
    let width = header.split_whitespace().count();

    let mut dates = Vec::new();
    let mut columns = ForcingColumns::with_capacity(content.len() / 64);
    let mut values = vec![0.0; positions.len()];

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != width {
            return Err(EvalError::parse(
                path,
                line_no,
                format!("expected {width} columns, found {}", tokens.len()),
            ));
        }
        dates.push(parse_date(path, line_no, tokens[0], tokens[1], tokens[2])?);
        for (value, &pos) in values.iter_mut().zip(&positions) {
            *value = parse_value(path, line_no, tokens[pos])?;
        }
        let record = ForcingRecord::from_values(&values)
            .ok_or_else(|| EvalError::parse(path, line_no, "incomplete record"))?;
        columns.push(&record);
    }

    Ok((ForcingTable { dates, columns }, area))
}

/// Token position of each `ForcingRecord` field in the header.
///
/// Headers carry units, e.g. `prcp(mm/day)`; only the part before the
/// parenthesis is matched, case-insensitively.
fn column_positions(path: &Path, line_no: usize, header: &str) -> Result<Vec<usize>> {
    let names: Vec<String> = header
        .split_whitespace()
        .map(|token| token.split('(').next().unwrap_or(token).to_ascii_lowercase())
        .collect();

    if names.len() < DATE_COLUMNS.len()
        || names.iter().zip(DATE_COLUMNS).any(|(name, expected)| name != expected)
    {
        return Err(EvalError::parse(
            path,
            line_no,
            "header must start with Year Mnth Day Hr",
        ));
    }

    let mut positions = Vec::with_capacity(ForcingRecord::field_names().len());
    for field in ForcingRecord::field_names() {
        let pos = names
            .iter()
            .position(|name| name == field)
            .ok_or_else(|| EvalError::parse(path, line_no, format!("missing column {field:?}")))?;
        positions.push(pos);
    }

    for name in names.iter().skip(DATE_COLUMNS.len()) {
        if !ForcingRecord::field_names().contains(&name.as_str()) {
            trace!(column = %name, "ignoring forcing column");
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
42.3
250
2252
Year Mnth Day Hr\tdayl(s)\tprcp(mm/day)\tsrad(W/m2)\tswe(mm)\ttmax(C)\ttmin(C)\tvp(Pa)
1980 01 01 12\t30585.60\t0.00\t153.00\t0.00\t-6.54\t-16.30\t171.69
1980 01 02 12\t30585.60\t2.50\t145.90\t1.00\t-5.30\t-12.00\t220.00
";

    fn write_basin(root: &Path, forcings: &str, content: &str) {
        let dir = root.join("basin_mean_forcing").join(forcings).join("01");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("01013500_lump_cida_forcing_leap.txt"), content).unwrap();
    }

    #[test]
    fn loads_table_and_area() {
        let root = tempfile::tempdir().unwrap();
        write_basin(root.path(), "daymet", SAMPLE);

        let (table, area) = load_forcings(root.path(), "01013500", "daymet").unwrap();
        assert_eq!(area, 2252);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.dates[1],
            NaiveDate::from_ymd_opt(1980, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(table.columns.prcp, vec![0.0, 2.5]);
        assert_relative_eq!(table.columns.tmin[0], -16.3);
        assert_relative_eq!(table.columns.vp[1], 220.0);
    }

    #[test]
    fn column_order_follows_header() {
        let root = tempfile::tempdir().unwrap();
        let content = "\
0
0
10
YEAR MNTH DAY HR vp(Pa) prcp(mm/day) dayl(s) srad(W/m2) swe(mm) tmax(C) tmin(C) extra
2000 06 15 12 900 7.5 50000 300 0 25 12 1
";
        write_basin(root.path(), "nldas", content);
        let (table, area) = load_forcings(root.path(), "01013500", "nldas").unwrap();
        assert_eq!(area, 10);
        assert_eq!(table.columns.vp, vec![900.0]);
        assert_eq!(table.columns.prcp, vec![7.5]);
        assert_eq!(table.columns.tmin, vec![12.0]);
    }

    #[test]
    fn series_exposes_a_column() {
        let root = tempfile::tempdir().unwrap();
        write_basin(root.path(), "daymet", SAMPLE);
        let (table, _) = load_forcings(root.path(), "01013500", "daymet").unwrap();

        let prcp = table.series("prcp").unwrap();
        assert_eq!(prcp.values(), &[0.0, 2.5]);
        assert!(table.series("rain").is_err());
    }

    #[test]
    fn missing_product_or_basin_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        write_basin(root.path(), "daymet", SAMPLE);
        assert!(matches!(
            load_forcings(root.path(), "01013500", "maurer"),
            Err(EvalError::NotFound(_))
        ));
        assert!(matches!(
            load_forcings(root.path(), "09999999", "daymet"),
            Err(EvalError::NotFound(_))
        ));
    }

    #[test]
    fn malformed_rows_report_line() {
        let root = tempfile::tempdir().unwrap();
        let broken = SAMPLE.replace("2.50", "n/a");
        write_basin(root.path(), "daymet", &broken);
        match load_forcings(root.path(), "01013500", "daymet") {
            Err(EvalError::Parse { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn short_rows_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        let broken = format!("{SAMPLE}1980 01 03 12 1.0\n");
        write_basin(root.path(), "daymet", &broken);
        assert!(matches!(
            load_forcings(root.path(), "01013500", "daymet"),
            Err(EvalError::Parse { line: 7, .. })
        ));
    }

    #[test]
    fn bad_area_is_a_parse_error() {
        let root = tempfile::tempdir().unwrap();
        let broken = SAMPLE.replacen("2252", "big", 1);
        write_basin(root.path(), "daymet", &broken);
        assert!(matches!(
            load_forcings(root.path(), "01013500", "daymet"),
            Err(EvalError::Parse { line: 3, .. })
        ));
    }
}
