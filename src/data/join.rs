use ahash::AHashMap;
use log::warn;

use super::{
    csv::DemographicRecord,
    feature::{FeatureCollection, JoinStatus, RegionId},
};

/// A feature that found no demographic record. Not fatal: it renders as no-data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingJoinWarning {
    /// Position of the feature in the collection.
    pub index: usize,
    pub region_id: Option<RegionId>,
}

/// Summary of a left join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub matched: usize,
    pub missing: Vec<MissingJoinWarning>,
    /// Records that matched no feature.
    pub unused_records: usize,
}

/// Left join of features (left) with demographic records (right) on region id.
///
/// Every feature is kept, in order. Matched features get the record's fields merged
/// into their properties (record values replace same-named properties); unmatched
/// features keep their properties and are marked [`JoinStatus::Missing`].
pub fn join(features: &FeatureCollection, records: &[DemographicRecord]) -> (FeatureCollection, JoinReport) {
    for id in features.duplicate_ids() {
        warn!("[data::join] Region id {id} appears on more than one feature");
    }

    let mut index: AHashMap<&RegionId, &DemographicRecord> = AHashMap::with_capacity(records.len());
    for record in records {
        if index.insert(&record.id, record).is_some() {
            warn!("[data::join] Duplicate demographic record for {}; keeping the last", record.id);
        }
    }

    let mut report = JoinReport::default();
    let mut used = ahash::AHashSet::with_capacity(index.len());

    let joined = features.iter()
        .enumerate()
        .map(|(idx, feature)| {
            match feature.id().and_then(|id| index.get(id).map(|record| (id, *record))) {
                Some((id, record)) => {
                    let mut properties = feature.properties().clone();
                    for (name, value) in &record.fields {
                        properties.insert(name.clone(), value.to_json());
                    }
                    used.insert(id);
                    report.matched += 1;
                    feature.rejoined(properties, JoinStatus::Matched)
                }
                None => {
                    warn!("[data::join] No demographic record for feature {idx} ({})",
                        feature.id().map_or("<no id>", RegionId::as_str));
                    report.missing.push(MissingJoinWarning { index: idx, region_id: feature.id().cloned() });
                    feature.rejoined(feature.properties().clone(), JoinStatus::Missing)
                }
            }
        })
        .collect();

    report.unused_records = index.len() - used.len();

    (FeatureCollection::new(joined), report)
}
