use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{GeoCoordinate, Line};

/// Number of members in a full forecast ensemble.
pub const ENSEMBLE_MEMBERS: u32 = 50;

/// Per-point record variables of one ensemble member, stored column-wise.
///
/// `date` is the hour offset from the simulation start.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordColumns {
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub line_id: Vec<i64>,
    pub date: Vec<i64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("column {column} has {found} entries, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        found: usize,
    },
}

impl RecordColumns {
    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    pub fn push(&mut self, line_id: i64, date: i64, latitude: f64, longitude: f64) {
        self.line_id.push(line_id);
        self.date.push(date);
        self.latitude.push(latitude);
        self.longitude.push(longitude);
    }

    fn validate(&self) -> Result<(), IngestError> {
        let expected = self.latitude.len();
        let columns = [
            ("longitude", self.longitude.len()),
            ("line_id", self.line_id.len()),
            ("date", self.date.len()),
        ];
        for (column, found) in columns {
            if found != expected {
                return Err(IngestError::ColumnLength {
                    column,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Builds the lines of one member at `time_offset`.
///
/// Records are grouped by line id; point order within a line follows record
/// order and lines come out in ascending id order, named `"{member}|{id}"`.
pub fn assemble_member_lines(
    member: u32,
    columns: &RecordColumns,
    time_offset: i64,
) -> Result<Vec<Line>, IngestError> {
    columns.validate()?;

    let mut grouped: BTreeMap<i64, Vec<GeoCoordinate>> = BTreeMap::new();
    for i in 0..columns.len() {
        if columns.date[i] != time_offset {
            continue;
        }
        grouped
            .entry(columns.line_id[i])
            .or_default()
            .push(GeoCoordinate::new(columns.latitude[i], columns.longitude[i]));
    }

    let lines: Vec<Line> = grouped
        .into_iter()
        .map(|(id, mut coords)| {
            if unwrap_dateline(&mut coords) {
                debug!("shifted line {member}|{id} across the dateline");
            }
            Line::new(format!("{member}|{id}"), coords)
        })
        .collect();

    if lines.is_empty() && !columns.is_empty() {
        warn!("member {member} has no records at time offset {time_offset}");
    }
    Ok(lines)
}

/// Lines of every member at `time_offset`, concatenated in member order.
pub fn assemble_ensemble<'a, I>(members: I, time_offset: i64) -> Result<Vec<Line>, IngestError>
where
    I: IntoIterator<Item = (u32, &'a RecordColumns)>,
{
    let mut lines = Vec::new();
    for (member, columns) in members {
        lines.extend(assemble_member_lines(member, columns, time_offset)?);
    }
    debug!("assembled {} lines at time offset {time_offset}", lines.len());
    Ok(lines)
}

/// Shifts negative longitudes by 360 degrees when the line spans more than
/// 180 degrees of longitude. Returns whether anything was shifted.
pub fn unwrap_dateline(coords: &mut [GeoCoordinate]) -> bool {
    let (min, max) = coords.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c.longitude), hi.max(c.longitude))
    });
    if max - min <= 180.0 {
        return false;
    }
    for c in coords.iter_mut().filter(|c| c.longitude < 0.0) {
        c.longitude += 360.0;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(records: &[(i64, i64, f64, f64)]) -> RecordColumns {
        let mut cols = RecordColumns::default();
        for &(line_id, date, lat, lon) in records {
            cols.push(line_id, date, lat, lon);
        }
        cols
    }

    #[test]
    fn groups_records_by_line_id_at_time() {
        let cols = columns(&[
            (1, 0, 10.0, 10.0),
            (1, 0, 11.0, 11.0),
            (2, 0, 20.0, 20.0),
            (1, 3, 12.0, 12.0),
            (2, 3, 21.0, 21.0),
        ]);
        let lines = assemble_member_lines(7, &cols, 0).expect("lines");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id(), "7|1");
        assert_eq!(lines[0].latitudes().collect::<Vec<_>>(), vec![10.0, 11.0]);
        assert_eq!(lines[1].id(), "7|2");
        assert_eq!(lines[1].len(), 1);
    }

    #[test]
    fn sparse_and_unordered_ids_are_kept() {
        let cols = columns(&[(5, 0, 1.0, 1.0), (2, 0, 2.0, 2.0), (5, 0, 3.0, 3.0)]);
        let lines = assemble_member_lines(0, &cols, 0).expect("lines");
        let ids: Vec<&str> = lines.iter().map(Line::id).collect();
        assert_eq!(ids, vec!["0|2", "0|5"]);
        assert_eq!(lines[1].latitudes().collect::<Vec<_>>(), vec![1.0, 3.0]);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let mut cols = columns(&[(1, 0, 1.0, 1.0)]);
        cols.date.push(0);
        let err = assemble_member_lines(0, &cols, 0).unwrap_err();
        assert_eq!(
            err,
            IngestError::ColumnLength {
                column: "date",
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn dateline_crossing_is_unwrapped() {
        let cols = columns(&[(1, 0, 0.0, 170.0), (1, 0, 0.0, -175.0), (1, 0, 0.0, -170.0)]);
        let lines = assemble_member_lines(0, &cols, 0).expect("lines");
        assert_eq!(
            lines[0].longitudes().collect::<Vec<_>>(),
            vec![170.0, 185.0, 190.0]
        );
    }

    #[test]
    fn narrow_lines_are_untouched() {
        let mut coords = vec![GeoCoordinate::new(0.0, -10.0), GeoCoordinate::new(0.0, 10.0)];
        assert!(!unwrap_dateline(&mut coords));
        assert_eq!(coords[0].longitude, -10.0);
    }

    #[test]
    fn ensemble_concatenates_members_in_order() {
        let a = columns(&[(1, 6, 0.0, 0.0)]);
        let b = columns(&[(1, 6, 1.0, 1.0), (2, 6, 2.0, 2.0)]);
        let lines = assemble_ensemble([(0, &a), (1, &b)], 6).expect("lines");
        let ids: Vec<&str> = lines.iter().map(Line::id).collect();
        assert_eq!(ids, vec!["0|1", "1|1", "1|2"]);
    }
}
