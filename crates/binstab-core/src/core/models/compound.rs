use super::ids::GroupId;
use super::record::PAIR_SIZE;
use crate::core::chem::composition::Composition;

/// One member of a compound pair, ready for featurization.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundRow {
    pub group: GroupId,
    /// Position of this compound within its pair (0 or 1).
    pub slot: usize,
    /// Index of the record-table row this compound was derived from.
    pub source_row: usize,
    pub composition: Composition,
    pub label: Option<u8>,
    pub extra_features: Vec<Option<f64>>,
}

/// The converter's output: compound rows where the two members of every pair are
/// stored next to each other, slot 0 first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSet {
    rows: Vec<CompoundRow>,
}

impl CompoundSet {
    /// Builds a set from pairs, keeping the slot order inside each pair.
    pub fn from_pairs(pairs: Vec<[CompoundRow; PAIR_SIZE]>) -> Self {
        Self {
            rows: pairs.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> &[CompoundRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn num_pairs(&self) -> usize {
        self.rows.len() / PAIR_SIZE
    }

    pub fn pairs(&self) -> impl Iterator<Item = &[CompoundRow]> {
        self.rows.chunks_exact(PAIR_SIZE)
    }

    pub fn groups(&self) -> Vec<GroupId> {
        self.rows.iter().map(|row| row.group).collect()
    }

    /// Source rows of each pair, in pair order.
    pub fn source_rows(&self) -> Vec<usize> {
        self.pairs().map(|pair| pair[0].source_row).collect()
    }

    /// All labels, or `None` if any compound is unlabelled.
    pub fn labels(&self) -> Option<Vec<u8>> {
        self.rows.iter().map(|row| row.label).collect()
    }

    pub fn first_unlabelled(&self) -> Option<&CompoundRow> {
        self.rows.iter().find(|row| row.label.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chem::elements::Element;

    fn row(group: u32, slot: usize, label: Option<u8>) -> CompoundRow {
        let na = Element::from_symbol("Na").unwrap();
        let cl = Element::from_symbol("Cl").unwrap();
        CompoundRow {
            group: GroupId(group),
            slot,
            source_row: group as usize,
            composition: Composition::from_pair(na, cl, 1, 1).unwrap(),
            label,
            extra_features: Vec::new(),
        }
    }

    #[test]
    fn from_pairs_keeps_members_adjacent() {
        let set = CompoundSet::from_pairs(vec![
            [row(0, 0, Some(1)), row(0, 1, Some(0))],
            [row(1, 0, Some(0)), row(1, 1, Some(0))],
        ]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.num_pairs(), 2);
        assert_eq!(
            set.groups(),
            vec![GroupId(0), GroupId(0), GroupId(1), GroupId(1)]
        );
        assert_eq!(set.source_rows(), vec![0, 1]);
        let slots: Vec<usize> = set.rows().iter().map(|r| r.slot).collect();
        assert_eq!(slots, vec![0, 1, 0, 1]);
    }

    #[test]
    fn labels_require_every_row_to_be_labelled() {
        let set = CompoundSet::from_pairs(vec![[row(0, 0, Some(1)), row(0, 1, Some(0))]]);
        assert_eq!(set.labels(), Some(vec![1, 0]));

        let set = CompoundSet::from_pairs(vec![[row(0, 0, Some(1)), row(0, 1, None)]]);
        assert_eq!(set.labels(), None);
        assert_eq!(set.first_unlabelled().unwrap().slot, 1);
    }
}
