//! Pitch and roll derivation.
//!
//! The vehicle reports attitude in radians at the flight controller's rate;
//! science consumers want degrees with the gaps filled. Adds `pitch` and
//! `roll` records converted from `m_pitch`/`m_roll`.

use crate::app::diagnostics::Reporter;
use crate::app::models::{GliderData, SensorData, SensorRecord};
use crate::app::series;
use crate::config::FillMethod;
use crate::Result;

/// Derive `pitch` and `roll` in degrees, gap-filled per `fill`.
///
/// Either source sensor being absent is reported and skipped; the other is
/// still derived.
pub fn derive_pitch_roll(
    dba: &mut GliderData,
    fill: FillMethod,
    reporter: &mut Reporter,
) -> Result<()> {
    for (raw, name) in [("m_pitch", "pitch"), ("m_roll", "roll")] {
        let Some(source) = dba.get(raw) else {
            reporter.warn_sensor(dba.source_file(), raw, format!("{raw} not found"));
            continue;
        };

        let mut record = SensorRecord::derived_from(
            source,
            name,
            raw,
            format!("{raw} converted to degrees and gap-filled"),
        );
        record.set_attr("units", "degrees");

        let degrees: Vec<f64> = source
            .data
            .as_series()
            .unwrap_or(&[])
            .iter()
            .map(|v| v.to_degrees())
            .collect();
        let filled = match fill {
            FillMethod::FwdFill => series::fwd_fill(&degrees),
            FillMethod::Interp => series::interp_onto(&dba.ts.clone(), &degrees),
            FillMethod::None => degrees,
        };
        record.data = SensorData::Series(filled);
        dba.add(record)?;
    }
    Ok(())
}
