use super::elements::{Element, previous_noble_gas};
use phf::{Map, phf_map};

/// Subshells in Madelung filling order, as `(n, l)` pairs.
const MADELUNG_ORDER: [(u8, u8); 19] = [
    (1, 0),
    (2, 0),
    (2, 1),
    (3, 0),
    (3, 1),
    (4, 0),
    (3, 2),
    (4, 1),
    (5, 0),
    (4, 2),
    (5, 1),
    (6, 0),
    (4, 3),
    (5, 2),
    (6, 1),
    (7, 0),
    (5, 3),
    (6, 2),
    (7, 1),
];

const SUBSHELL_CAPACITY: [u8; 4] = [2, 6, 10, 14];

// Ground states that deviate from Madelung filling, as [s, p, d, f] counts
// outside the preceding noble-gas core.
static CONFIGURATION_EXCEPTIONS: Map<&'static str, [u8; 4]> = phf_map! {
    "Cr" => [1, 0, 5, 0],
    "Cu" => [1, 0, 10, 0],
    "Nb" => [1, 0, 4, 0],
    "Mo" => [1, 0, 5, 0],
    "Ru" => [1, 0, 7, 0],
    "Rh" => [1, 0, 8, 0],
    "Pd" => [0, 0, 10, 0],
    "Ag" => [1, 0, 10, 0],
    "La" => [2, 0, 1, 0],
    "Ce" => [2, 0, 1, 1],
    "Gd" => [2, 0, 1, 7],
    "Pt" => [1, 0, 9, 14],
    "Au" => [1, 0, 10, 14],
    "Ac" => [2, 0, 1, 0],
    "Th" => [2, 0, 2, 0],
    "Pa" => [2, 0, 1, 2],
    "U" => [2, 0, 1, 3],
    "Np" => [2, 0, 1, 4],
};

/// Electron counts of the valence subshells (those outside the noble-gas core).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValenceShells {
    pub s: u8,
    pub p: u8,
    pub d: u8,
    pub f: u8,
}

impl ValenceShells {
    fn from_counts(counts: [u8; 4]) -> Self {
        Self {
            s: counts[0],
            p: counts[1],
            d: counts[2],
            f: counts[3],
        }
    }

    fn counts(&self) -> [u8; 4] {
        [self.s, self.p, self.d, self.f]
    }

    pub fn total(&self) -> u8 {
        self.counts().iter().sum()
    }

    /// Empty slots in the partially occupied subshells, per `[s, p, d, f]`.
    /// A subshell without electrons counts as zero unfilled.
    pub fn unfilled(&self) -> [u8; 4] {
        let counts = self.counts();
        let mut unfilled = [0u8; 4];
        for l in 0..4 {
            if counts[l] > 0 {
                unfilled[l] = SUBSHELL_CAPACITY[l] - counts[l];
            }
        }
        unfilled
    }

    pub fn total_unfilled(&self) -> u8 {
        self.unfilled().iter().sum()
    }
}

fn fill_by_l(electrons: u8) -> [u8; 4] {
    let mut remaining = electrons;
    let mut by_l = [0u8; 4];
    for &(_, l) in MADELUNG_ORDER.iter() {
        if remaining == 0 {
            break;
        }
        let placed = remaining.min(SUBSHELL_CAPACITY[l as usize]);
        by_l[l as usize] += placed;
        remaining -= placed;
    }
    by_l
}

pub fn valence_shells(element: Element) -> ValenceShells {
    if let Some(counts) = CONFIGURATION_EXCEPTIONS.get(element.symbol()) {
        return ValenceShells::from_counts(*counts);
    }

    let z = element.atomic_number();
    let full = fill_by_l(z);
    let core = fill_by_l(previous_noble_gas(z));

    let mut valence = [0u8; 4];
    for l in 0..4 {
        valence[l] = full[l] - core[l];
    }
    ValenceShells::from_counts(valence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shells(symbol: &str) -> ValenceShells {
        Element::from_symbol(symbol).unwrap().valence_shells()
    }

    #[test]
    fn main_group_elements_fill_s_then_p() {
        assert_eq!(shells("H"), ValenceShells { s: 1, p: 0, d: 0, f: 0 });
        assert_eq!(shells("O"), ValenceShells { s: 2, p: 4, d: 0, f: 0 });
        assert_eq!(shells("Ar"), ValenceShells { s: 2, p: 6, d: 0, f: 0 });
    }

    #[test]
    fn post_transition_elements_include_filled_d_shells() {
        assert_eq!(shells("Ga"), ValenceShells { s: 2, p: 1, d: 10, f: 0 });
        assert_eq!(shells("Pb"), ValenceShells { s: 2, p: 2, d: 10, f: 14 });
    }

    #[test]
    fn transition_metals_follow_madelung_order() {
        assert_eq!(shells("Fe"), ValenceShells { s: 2, p: 0, d: 6, f: 0 });
        assert_eq!(shells("Hf"), ValenceShells { s: 2, p: 0, d: 2, f: 14 });
    }

    #[test]
    fn exceptions_override_madelung_filling() {
        assert_eq!(shells("Cr"), ValenceShells { s: 1, p: 0, d: 5, f: 0 });
        assert_eq!(shells("Cu"), ValenceShells { s: 1, p: 0, d: 10, f: 0 });
        assert_eq!(shells("Pd"), ValenceShells { s: 0, p: 0, d: 10, f: 0 });
    }

    #[test]
    fn unfilled_counts_only_partially_occupied_subshells() {
        let fe = shells("Fe");
        assert_eq!(fe.unfilled(), [0, 0, 4, 0]);
        assert_eq!(fe.total_unfilled(), 4);

        let o = shells("O");
        assert_eq!(o.unfilled(), [0, 2, 0, 0]);

        let na = shells("Na");
        assert_eq!(na.unfilled(), [1, 0, 0, 0]);
        assert_eq!(na.total(), 1);
    }
}
