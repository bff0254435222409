//! Representative segment time and position.
//!
//! Depth-averaged velocity applies to a whole dive segment, not to any one
//! sample, so it is tagged with a single representative time and the
//! position nearest that time: the mean of the first and last underwater
//! timestamps.

use crate::app::models::{GliderData, SensorData, SensorRecord};
use crate::app::series;

/// Scalar records tagging a segment's resolved velocity
#[derive(Debug, Clone)]
pub struct SegmentSummary {
    /// Mean underwater time (`time_uv`)
    pub time_uv: SensorRecord,
    /// Latitude nearest the mean time (`lat_uv`)
    pub lat_uv: SensorRecord,
    /// Longitude nearest the mean time (`lon_uv`)
    pub lon_uv: SensorRecord,
}

impl SegmentSummary {
    pub fn time(&self) -> f64 {
        self.time_uv.data.as_scalar().unwrap_or(f64::NAN)
    }

    pub fn latitude(&self) -> f64 {
        self.lat_uv.data.as_scalar().unwrap_or(f64::NAN)
    }

    pub fn longitude(&self) -> f64 {
        self.lon_uv.data.as_scalar().unwrap_or(f64::NAN)
    }
}

/// Compute the representative time and position for a segment.
///
/// Requires a non-empty time base, at least one underwater sample and the
/// derived coordinate records; otherwise yields nothing.
pub fn segment_time_and_position(dba: &GliderData) -> Option<SegmentSummary> {
    if dba.ts.is_empty()
        || dba.underwater_indices.is_empty()
        || !dba.has_sensor("llat_time")
        || !dba.has_sensor("llat_latitude")
        || !dba.has_sensor("llat_longitude")
    {
        return None;
    }

    let first = *dba.underwater_indices.first().expect("non-empty");
    let last = *dba.underwater_indices.last().expect("non-empty");
    let mean_time = (dba.ts[first] + dba.ts[last]) / 2.0;

    let nearest = series::nearest_index(&dba.ts, mean_time)?;
    let lat = dba.data("llat_latitude")?.get(nearest).copied()?;
    let lon = dba.data("llat_longitude")?.get(nearest).copied()?;

    // borrow the llat record attributes, swap the data for the scalars
    let mut time_uv = SensorRecord::derived_from(
        dba.get("llat_time")?,
        "time_uv",
        "llat_time",
        "mean segment time over the underwater interval",
    );
    time_uv.data = SensorData::Scalar(mean_time);

    let mut lat_uv = SensorRecord::derived_from(
        dba.get("llat_latitude")?,
        "lat_uv",
        "llat_latitude",
        "latitude nearest the mean segment time",
    );
    lat_uv.data = SensorData::Scalar(lat);

    let mut lon_uv = SensorRecord::derived_from(
        dba.get("llat_longitude")?,
        "lon_uv",
        "llat_longitude",
        "longitude nearest the mean segment time",
    );
    lon_uv.data = SensorData::Scalar(lon);

    Some(SegmentSummary {
        time_uv,
        lat_uv,
        lon_uv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testutil::container;

    fn summary_ready() -> GliderData {
        let mut dba = container(
            "01470001",
            "dbd",
            &[
                ("m_present_time", vec![0.0, 10.0, 20.0, 30.0, 40.0]),
                ("llat_time", vec![0.0, 10.0, 20.0, 30.0, 40.0]),
                ("llat_latitude", vec![44.0, 44.1, 44.2, 44.3, 44.4]),
                ("llat_longitude", vec![-73.0, -73.1, -73.2, -73.3, -73.4]),
            ],
        );
        dba.underwater_indices = vec![1, 2, 3];
        dba
    }

    #[test]
    fn mean_time_spans_the_underwater_interval() {
        let summary = segment_time_and_position(&summary_ready()).unwrap();
        assert_eq!(summary.time(), 20.0);
        assert_eq!(summary.latitude(), 44.2);
        assert_eq!(summary.longitude(), -73.2);
    }

    #[test]
    fn nearest_sample_supplies_the_position() {
        let mut dba = summary_ready();
        // underwater interval [10, 30] has mean 20, but drop index 2 from
        // the set: position still comes from the full series at index 2
        dba.underwater_indices = vec![1, 3];
        let summary = segment_time_and_position(&dba).unwrap();
        assert_eq!(summary.time(), 20.0);
        assert_eq!(summary.latitude(), 44.2);
    }

    #[test]
    fn outputs_are_scalar_records_with_provenance() {
        let summary = segment_time_and_position(&summary_ready()).unwrap();
        assert!(summary.time_uv.data.as_series().is_none());
        assert_eq!(summary.time_uv.attr("source_sensor"), Some("llat_time"));
        assert_eq!(summary.lat_uv.attr("source_sensor"), Some("llat_latitude"));
        assert_eq!(
            summary.lon_uv.attr("source_sensor"),
            Some("llat_longitude")
        );
    }

    #[test]
    fn missing_preconditions_yield_nothing() {
        // no underwater samples
        let mut dba = summary_ready();
        dba.underwater_indices.clear();
        assert!(segment_time_and_position(&dba).is_none());

        // no derived coordinates
        let mut dba = container(
            "01470001",
            "dbd",
            &[
                ("m_present_time", vec![0.0, 10.0]),
                ("llat_time", vec![0.0, 10.0]),
            ],
        );
        dba.underwater_indices = vec![0];
        assert!(segment_time_and_position(&dba).is_none());
    }
}
