//! Counters accumulated over one discovery run.

use std::collections::BTreeMap;
use std::fmt;

/// What happened during a run, for operators and response analytics.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Raw records extracted, before dedup.
    pub candidates_extracted: u32,
    /// Profiles after dedup and merge, before filtering.
    pub profiles_merged: u32,
    /// Profiles in the final response.
    pub profiles_returned: u32,
    /// Extracted record count per source wire name.
    pub records_by_source: BTreeMap<String, u32>,
    /// Returned profile count per sport.
    pub profiles_by_sport: BTreeMap<String, u32>,
    /// Mean confidence of returned profiles, one decimal.
    pub average_confidence: f64,
    /// Returned profiles at or above the high-quality threshold.
    pub high_quality: u32,
    /// Sources that failed softly.
    pub errors: u32,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Discovery Run Complete ===")?;
        writeln!(f, "Candidates extracted: {}", self.candidates_extracted)?;
        writeln!(f, "Profiles after merge: {}", self.profiles_merged)?;
        writeln!(f, "Profiles returned:    {}", self.profiles_returned)?;
        writeln!(f, "High quality (70+):   {}", self.high_quality)?;
        writeln!(f, "Average confidence:   {:.1}", self.average_confidence)?;
        writeln!(f, "Source errors:        {}", self.errors)?;
        if !self.records_by_source.is_empty() {
            writeln!(f, "Records by source:")?;
            for (source, count) in &self.records_by_source {
                writeln!(f, "  {source}: {count}")?;
            }
        }
        if !self.profiles_by_sport.is_empty() {
            writeln!(f, "Profiles by sport:")?;
            for (sport, count) in &self.profiles_by_sport {
                writeln!(f, "  {sport}: {count}")?;
            }
        }
        Ok(())
    }
}
