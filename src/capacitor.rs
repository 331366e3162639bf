//! Capacitor import from a supplier catalog CSV export.
//!
//! The export must contain the columns `MPN`, `Designation`, `Family` and
//! `Supplier` (any order, extra columns ignored) and must be sorted by
//! `MPN`: duplicates are only removed when they sit on consecutive kept
//! rows.
//!
//! Each kept row's designation is parsed as
//! `<value><unit>F <voltage>V <tolerance>% <package> <dielectric>`, for
//! example `100nF 50V 10% 0402 X7R`. Rows whose designation does not match
//! are dropped without error.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use serde::Serialize;

use crate::error::{GenResult, GenerateError};

/// Part number column.
pub const COL_MPN: &str = "MPN";
/// Free-text descriptor column.
pub const COL_DESIGNATION: &str = "Designation";
/// Product family column.
pub const COL_FAMILY: &str = "Family";
/// Supplier column.
pub const COL_SUPPLIER: &str = "Supplier";

/// Family of generic ceramic capacitors in the supplier database.
pub const DEFAULT_FAMILY: &str = "Passives - Ceramic capacitors";
/// Supplier name used for generic, non-vendor-specific parts.
pub const DEFAULT_SUPPLIER: &str = "_Generic_";

/// Row selection criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacitorFilter {
    /// Required `Family` value.
    pub family: String,
    /// Required `Supplier` value.
    pub supplier: String,
}

impl Default for CapacitorFilter {
    fn default() -> Self {
        Self {
            family: DEFAULT_FAMILY.to_string(),
            supplier: DEFAULT_SUPPLIER.to_string(),
        }
    }
}

impl CapacitorFilter {
    fn matches(&self, family: &str, supplier: &str) -> bool {
        family == self.family && supplier == self.supplier
    }
}

/// A capacitor parsed from a catalog row.
///
/// Serialised field names are the ones templates refer to
/// (`capa.value`, `capa.package`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacitorRecord {
    /// Manufacturer part number.
    pub mpn: String,
    /// Normalised descriptor, e.g. `100nf 50V 10% 0402 X7R`.
    pub value: String,
    /// Capacitance with lower-case unit, e.g. `100nf`.
    pub capacitance: String,
    /// Rated voltage in volts, digits as written.
    pub voltage: String,
    /// Tolerance in percent, digits as written.
    pub tolerance: String,
    /// Package code, e.g. `0402`.
    pub package: String,
    /// Dielectric family, e.g. `X7R`.
    pub dielectric: String,
}

impl CapacitorRecord {
    /// Parses a designation into a record.
    ///
    /// Returns `None` when the text does not look like a capacitor
    /// descriptor.
    #[must_use]
    pub fn from_designation(mpn: &str, designation: &str) -> Option<Self> {
        let caps = descriptor_regex().captures(designation)?;

        let capacitance = format!("{}f", caps[1].to_lowercase());
        let voltage = caps[2].to_string();
        let tolerance = caps[3].to_string();
        let package = caps[4].to_string();
        let dielectric = caps[5].to_string();

        Some(Self {
            mpn: mpn.to_string(),
            value: format!("{capacitance} {voltage}V {tolerance}% {package} {dielectric}"),
            capacitance,
            voltage,
            tolerance,
            package,
            dielectric,
        })
    }
}

fn descriptor_regex() -> &'static Regex {
    static DESCRIPTOR: OnceLock<Regex> = OnceLock::new();
    DESCRIPTOR.get_or_init(|| {
        // Constant pattern, compile failure is a programming error
        Regex::new(r"([0-9.]+.)F (\d+)V (\d+)% (\d+) (\S+)").expect("valid descriptor regex")
    })
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    mpn: usize,
    designation: usize,
    family: usize,
    supplier: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> GenResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| GenerateError::invalid_csv_header(name))
        };

        Ok(Self {
            mpn: find(COL_MPN)?,
            designation: find(COL_DESIGNATION)?,
            family: find(COL_FAMILY)?,
            supplier: find(COL_SUPPLIER)?,
        })
    }
}

/// Reads capacitor records from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, if the header lacks a
/// required column, or if a record is malformed CSV.
pub fn import_capacitor_csv(
    path: impl AsRef<Path>,
    filter: &CapacitorFilter,
) -> GenResult<Vec<CapacitorRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GenerateError::file_read(path, e))?;

    tracing::debug!(path = %path.display(), "Importing capacitor CSV");
    import_capacitors(BufReader::new(file), filter)
}

/// Reads capacitor records from any CSV source.
///
/// The header is validated before any data row is consumed.
///
/// # Errors
///
/// Returns an error if the header lacks a required column or if a record is
/// malformed CSV.
pub fn import_capacitors<R: Read>(
    reader: R,
    filter: &CapacitorFilter,
) -> GenResult<Vec<CapacitorRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(rdr.headers()?)?;

    let mut kept: Vec<(String, String)> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        if !filter.matches(field(columns.family), field(columns.supplier)) {
            continue;
        }

        let mpn = field(columns.mpn);
        // Only adjacent duplicates are caught; input must be sorted by MPN
        if kept.last().is_some_and(|(last, _)| last == mpn) {
            continue;
        }
        kept.push((mpn.to_string(), field(columns.designation).to_string()));
    }

    let mut capacitors = Vec::with_capacity(kept.len());
    for (mpn, designation) in &kept {
        match CapacitorRecord::from_designation(mpn, designation) {
            Some(record) => capacitors.push(record),
            None => tracing::debug!(%mpn, %designation, "Skipping unparsable designation"),
        }
    }

    tracing::info!(
        candidates = kept.len(),
        parsed = capacitors.len(),
        "Capacitor import complete"
    );

    Ok(capacitors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "MPN,Designation,Family,Supplier\n";

    fn import(csv: &str) -> GenResult<Vec<CapacitorRecord>> {
        import_capacitors(csv.as_bytes(), &CapacitorFilter::default())
    }

    #[test]
    fn parse_designation_fields() {
        let rec = CapacitorRecord::from_designation("A", "100nF 50V 10% 0402 X7R").unwrap();
        assert_eq!(rec.mpn, "A");
        assert_eq!(rec.value, "100nf 50V 10% 0402 X7R");
        assert_eq!(rec.capacitance, "100nf");
        assert_eq!(rec.voltage, "50");
        assert_eq!(rec.tolerance, "10");
        assert_eq!(rec.package, "0402");
        assert_eq!(rec.dielectric, "X7R");
    }

    #[test]
    fn parse_designation_with_decimal_value() {
        let rec = CapacitorRecord::from_designation("B", "4.7uF 16V 20% 0805 X5R").unwrap();
        assert_eq!(rec.capacitance, "4.7uf");
        assert_eq!(rec.value, "4.7uf 16V 20% 0805 X5R");
    }

    #[test]
    fn parse_designation_is_a_search() {
        let rec =
            CapacitorRecord::from_designation("C", "CAP CER 1PF 25V 5% 0201 C0G (NP0)").unwrap();
        assert_eq!(rec.capacitance, "1pf");
        assert_eq!(rec.package, "0201");
        assert_eq!(rec.dielectric, "C0G");
    }

    #[test]
    fn parse_designation_keeps_oversized_ratings() {
        let rec =
            CapacitorRecord::from_designation("A", "100nF 50000000000V 10% 0402 X7R").unwrap();
        assert_eq!(rec.voltage, "50000000000");
        assert_eq!(rec.value, "100nf 50000000000V 10% 0402 X7R");
    }

    #[test]
    fn parse_designation_keeps_unicode_digits() {
        let rec = CapacitorRecord::from_designation("A", "100nF \u{665}\u{660}V 10% 0402 X7R")
            .unwrap();
        assert_eq!(rec.voltage, "\u{665}\u{660}");
        assert_eq!(rec.package, "0402");
    }

    #[test]
    fn parse_designation_rejects_other_text() {
        assert!(CapacitorRecord::from_designation("X", "N/A").is_none());
        assert!(CapacitorRecord::from_designation("X", "100nF 50V").is_none());
        assert!(CapacitorRecord::from_designation("X", "").is_none());
    }

    #[test]
    fn adjacent_duplicates_are_dropped() {
        let csv = format!(
            "{HEADER}A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n\
             A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n"
        );
        let caps = import(&csv).unwrap();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].value, "100nf 50V 10% 0402 X7R");
        assert_eq!(caps[0].package, "0402");
    }

    #[test]
    fn non_adjacent_duplicates_survive() {
        let csv = format!(
            "{HEADER}A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n\
             B,1uF 25V 10% 0603 X5R,Passives - Ceramic capacitors,_Generic_\n\
             A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n"
        );
        let caps = import(&csv).unwrap();
        assert_eq!(caps.len(), 3);
    }

    #[test]
    fn filtered_rows_do_not_break_adjacency() {
        // The dedup compares against the last kept row, not the last row read
        let csv = format!(
            "{HEADER}A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n\
             Z,10k 1% 0402,Passives - Resistors,_Generic_\n\
             A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n"
        );
        assert_eq!(import(&csv).unwrap().len(), 1);
    }

    #[test]
    fn rows_outside_family_or_supplier_are_ignored() {
        let csv = format!(
            "{HEADER}A,100nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,Murata\n\
             B,100nF 50V 10% 0402 X7R,Passives - Tantalum capacitors,_Generic_\n\
             C,22pF 50V 5% 0402 C0G,Passives - Ceramic capacitors,_Generic_\n"
        );
        let caps = import(&csv).unwrap();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].mpn, "C");
    }

    #[test]
    fn unparsable_designation_is_skipped() {
        let csv = format!(
            "{HEADER}A,N/A,Passives - Ceramic capacitors,_Generic_\n\
             B,10nF 50V 10% 0402 X7R,Passives - Ceramic capacitors,_Generic_\n"
        );
        let caps = import(&csv).unwrap();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].mpn, "B");
    }

    #[test]
    fn column_order_is_free() {
        let csv = "Supplier,Family,Stock,Designation,MPN\n\
                   _Generic_,Passives - Ceramic capacitors,12,1nF 100V 5% 0603 C0G,P1\n";
        let caps = import(csv).unwrap();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].mpn, "P1");
        assert_eq!(caps[0].package, "0603");
    }

    #[test]
    fn missing_designation_column_is_an_error() {
        let csv = "MPN,Family,Supplier\nA,Passives - Ceramic capacitors,_Generic_\n";
        let err = import(csv).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidCsvHeader { ref column } if column == "Designation"
        ));
    }

    #[test]
    fn missing_column_without_data_rows_is_an_error() {
        assert!(matches!(
            import("MPN,Family,Supplier\n"),
            Err(GenerateError::InvalidCsvHeader { .. })
        ));
        assert!(matches!(
            import(""),
            Err(GenerateError::InvalidCsvHeader { .. })
        ));
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(import(HEADER).unwrap().is_empty());
    }

    #[test]
    fn short_rows_are_ignored() {
        let csv = format!("{HEADER}A,100nF 50V 10% 0402 X7R\n");
        assert!(import(&csv).unwrap().is_empty());
    }

    #[test]
    fn custom_filter() {
        let filter = CapacitorFilter {
            family: "Caps".to_string(),
            supplier: "Acme".to_string(),
        };
        let csv = format!("{HEADER}A,10uF 10V 20% 1206 X5R,Caps,Acme\n");
        let caps = import_capacitors(csv.as_bytes(), &filter).unwrap();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].package, "1206");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = import_capacitor_csv(
            "/nonexistent/capa_list.csv",
            &CapacitorFilter::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::FileRead { .. }));
    }
}
