use crate::{scenario::TimeSlot, source::PointSource, zone::PollutionZone};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SourceFile {
    pub schema_version: String,
    pub sources: Vec<PointSource>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneFile {
    pub schema_version: String,
    pub zones: Vec<PollutionZone>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    pub schema_version: String,
    pub time_slots: Vec<TimeSlot>,
}
