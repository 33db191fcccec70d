use anyhow::{Context, Result};
use std::{collections::BTreeMap, fs, path::Path};
use tidewatch_core::TidewatchError;
use tidewatch_schemas::{
    file_formats::{ScenarioFile, SourceFile, ZoneFile},
    scenario::TimeSlot,
    source::PointSource,
    zone::PollutionZone,
};

/// All the static data loaded from YAML files for a run.
///
/// Maps are ordered by id so that a seeded run visits sources in the same
/// order every time.
pub struct KnowledgeBase {
    pub sources: BTreeMap<String, PointSource>,
    pub zones: BTreeMap<String, PollutionZone>,
    pub time_slots: BTreeMap<String, TimeSlot>,
}

impl KnowledgeBase {
    /// Loads all data from the specified base directory.
    pub fn load(base_path: &str) -> Result<Self> {
        log::info!("Loading knowledge base from '{}'...", base_path);

        let sources = load_yaml_files_into_map(
            Path::new(base_path).join("sources"),
            |file: SourceFile| file.sources,
            |item: &PointSource| item.source_id.clone(),
        )?;
        let zones = load_yaml_files_into_map(
            Path::new(base_path).join("zones"),
            |file: ZoneFile| file.zones,
            |item: &PollutionZone| item.zone_id.clone(),
        )?;
        let time_slots = load_yaml_files_into_map(
            Path::new(base_path).join("scenarios"),
            |file: ScenarioFile| file.time_slots,
            |item: &TimeSlot| item.slot_id.clone(),
        )?;

        log::info!(
            "Knowledge base loaded: {} sources, {} zones, {} time slots.",
            sources.len(),
            zones.len(),
            time_slots.len()
        );
        Ok(Self {
            sources,
            zones,
            time_slots,
        })
    }

    /// The named slot, or the latest one when no id is given.
    pub fn time_slot(&self, slot_id: Option<&str>) -> Result<Option<&TimeSlot>, TidewatchError> {
        match slot_id {
            Some(id) => self
                .time_slots
                .get(id)
                .map(Some)
                .ok_or_else(|| TidewatchError::TimeSlotNotFound(id.to_string())),
            None => Ok(self.time_slots.values().next_back()),
        }
    }
}

/// Generic helper to load all YAML files in a directory into a map. A missing
/// directory yields an empty map.
fn load_yaml_files_into_map<P, F, E, T, K>(
    dir_path: P,
    extract_vec: E,
    get_key: K,
) -> Result<BTreeMap<String, T>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>, // The file wrapper struct (e.g., SourceFile)
    E: Fn(F) -> Vec<T>,                  // A closure to extract the Vec<T> from the wrapper
    K: Fn(&T) -> String,                 // A closure to get the key for the map from an item T
{
    let mut map = BTreeMap::new();
    if !dir_path.as_ref().exists() {
        log::warn!("Knowledge base directory {:?} does not exist", dir_path.as_ref());
        return Ok(map);
    }
    for entry in fs::read_dir(dir_path.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir_path.as_ref()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let file_wrapper: F = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML from {:?}", path))?;

            for item in extract_vec(file_wrapper) {
                let key = get_key(&item);
                if map.insert(key.clone(), item).is_some() {
                    log::warn!("Duplicate id '{}' in {:?}; keeping the last definition", key, path);
                }
            }
        }
    }
    Ok(map)
}
