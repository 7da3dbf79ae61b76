use super::config::ConversionConfig;
use crate::core::chem::ChemError;
use crate::core::chem::composition::Composition;
use crate::core::chem::elements::Element;
use crate::core::models::compound::{CompoundRow, CompoundSet};
use crate::core::models::ids::GroupId;
use crate::core::models::record::SystemRecord;
use std::collections::HashMap;
use tracing::{info, instrument};

/// Assigns group ids to elemental systems.
///
/// Pre-supplied ids are used as-is. Every other unordered system `{A, B}` receives
/// the next sequential id in first-seen order, starting after the largest
/// pre-supplied id so the two kinds never collide.
struct GroupAssigner {
    systems: HashMap<(Element, Element), GroupId>,
    next: u32,
}

impl GroupAssigner {
    fn new(records: &[SystemRecord]) -> Self {
        let next = records
            .iter()
            .filter_map(|r| r.group)
            .map(|g| g.0 + 1)
            .max()
            .unwrap_or(0);
        Self {
            systems: HashMap::new(),
            next,
        }
    }

    fn assign(&mut self, record: &SystemRecord) -> GroupId {
        if let Some(group) = record.group {
            return group;
        }
        let key = if record.element_a <= record.element_b {
            (record.element_a, record.element_b)
        } else {
            (record.element_b, record.element_a)
        };
        *self.systems.entry(key).or_insert_with(|| {
            let id = GroupId(self.next);
            self.next += 1;
            id
        })
    }
}

/// Expands every record into the two compounds of its formula pair.
///
/// Records containing a noble gas are removed first when configured to. The
/// returned set keeps both members of a pair adjacent, slot 0 first, and
/// `source_row` points back into the record table.
#[instrument(skip_all, name = "convert_records")]
pub fn convert(
    records: &[SystemRecord],
    config: &ConversionConfig,
) -> Result<CompoundSet, ChemError> {
    let kept: Vec<&SystemRecord> = if config.drop_noble_gases {
        let kept: Vec<_> = records.iter().filter(|r| !r.has_noble_gas()).collect();
        let dropped = records.len() - kept.len();
        if dropped > 0 {
            info!(dropped, "Removed records containing noble gases");
        }
        kept
    } else {
        records.iter().collect()
    };

    let mut groups = GroupAssigner::new(records);
    let pairs = kept
        .into_iter()
        .map(|record| {
            let group = groups.assign(record);
            let member = |slot: usize| -> Result<CompoundRow, ChemError> {
                let formula = config.formula_pairs[slot];
                Ok(CompoundRow {
                    group,
                    slot,
                    source_row: record.row,
                    composition: Composition::from_pair(
                        record.element_a,
                        record.element_b,
                        formula.a,
                        formula.b,
                    )?,
                    label: record.stability.map(|s| s.slot(slot)),
                    extra_features: record.features.clone(),
                })
            };
            Ok([member(0)?, member(1)?])
        })
        .collect::<Result<Vec<_>, ChemError>>()?;

    Ok(CompoundSet::from_pairs(pairs))
}
