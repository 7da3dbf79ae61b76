use super::ChemError;
use super::configuration::{ValenceShells, valence_shells};
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;

/// Tabulated properties of a single chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    pub symbol: &'static str,
    /// Standard atomic weight in g/mol.
    pub atomic_mass: f64,
    /// Pauling electronegativity; undefined for the noble gases.
    pub electronegativity: Option<f64>,
    /// Single-bond covalent radius in pm.
    pub covalent_radius: f64,
    /// Melting point in K.
    pub melting_point: f64,
    /// Cohesive energy of the elemental solid in eV/atom.
    pub cohesive_energy: Option<f64>,
}

const fn e(
    symbol: &'static str,
    atomic_mass: f64,
    electronegativity: Option<f64>,
    covalent_radius: f64,
    melting_point: f64,
    cohesive_energy: Option<f64>,
) -> ElementData {
    ElementData {
        symbol,
        atomic_mass,
        electronegativity,
        covalent_radius,
        melting_point,
        cohesive_energy,
    }
}

pub const MAX_ATOMIC_NUMBER: u8 = 94;

// Indexed by atomic number - 1. Cohesive energies follow Kittel's table.
static ELEMENT_DATA: [ElementData; MAX_ATOMIC_NUMBER as usize] = [
    e("H", 1.008, Some(2.20), 31.0, 14.01, None),
    e("He", 4.0026, None, 28.0, 0.95, None),
    e("Li", 6.94, Some(0.98), 128.0, 453.69, Some(1.63)),
    e("Be", 9.0122, Some(1.57), 96.0, 1560.0, Some(3.32)),
    e("B", 10.81, Some(2.04), 84.0, 2349.0, Some(5.81)),
    e("C", 12.011, Some(2.55), 76.0, 3800.0, Some(7.37)),
    e("N", 14.007, Some(3.04), 71.0, 63.15, Some(4.92)),
    e("O", 15.999, Some(3.44), 66.0, 54.36, Some(2.60)),
    e("F", 18.998, Some(3.98), 57.0, 53.53, Some(0.84)),
    e("Ne", 20.180, None, 58.0, 24.56, Some(0.020)),
    e("Na", 22.990, Some(0.93), 166.0, 370.87, Some(1.113)),
    e("Mg", 24.305, Some(1.31), 141.0, 923.0, Some(1.51)),
    e("Al", 26.982, Some(1.61), 121.0, 933.47, Some(3.39)),
    e("Si", 28.085, Some(1.90), 111.0, 1687.0, Some(4.63)),
    e("P", 30.974, Some(2.19), 107.0, 317.3, Some(3.43)),
    e("S", 32.06, Some(2.58), 105.0, 388.36, Some(2.85)),
    e("Cl", 35.45, Some(3.16), 102.0, 171.6, Some(1.40)),
    e("Ar", 39.948, None, 106.0, 83.8, Some(0.080)),
    e("K", 39.098, Some(0.82), 203.0, 336.53, Some(0.934)),
    e("Ca", 40.078, Some(1.00), 176.0, 1115.0, Some(1.84)),
    e("Sc", 44.956, Some(1.36), 170.0, 1814.0, Some(3.90)),
    e("Ti", 47.867, Some(1.54), 160.0, 1941.0, Some(4.85)),
    e("V", 50.942, Some(1.63), 153.0, 2183.0, Some(5.31)),
    e("Cr", 51.996, Some(1.66), 139.0, 2180.0, Some(4.10)),
    e("Mn", 54.938, Some(1.55), 139.0, 1519.0, Some(2.92)),
    e("Fe", 55.845, Some(1.83), 132.0, 1811.0, Some(4.28)),
    e("Co", 58.933, Some(1.88), 126.0, 1768.0, Some(4.39)),
    e("Ni", 58.693, Some(1.91), 124.0, 1728.0, Some(4.44)),
    e("Cu", 63.546, Some(1.90), 132.0, 1357.77, Some(3.49)),
    e("Zn", 65.38, Some(1.65), 122.0, 692.68, Some(1.35)),
    e("Ga", 69.723, Some(1.81), 122.0, 302.91, Some(2.81)),
    e("Ge", 72.630, Some(2.01), 120.0, 1211.4, Some(3.85)),
    e("As", 74.922, Some(2.18), 119.0, 1090.0, Some(2.96)),
    e("Se", 78.971, Some(2.55), 120.0, 494.0, Some(2.46)),
    e("Br", 79.904, Some(2.96), 120.0, 265.8, Some(1.22)),
    e("Kr", 83.798, None, 116.0, 115.79, Some(0.116)),
    e("Rb", 85.468, Some(0.82), 220.0, 312.46, Some(0.852)),
    e("Sr", 87.62, Some(0.95), 195.0, 1050.0, Some(1.72)),
    e("Y", 88.906, Some(1.22), 190.0, 1799.0, Some(4.37)),
    e("Zr", 91.224, Some(1.33), 175.0, 2128.0, Some(6.25)),
    e("Nb", 92.906, Some(1.6), 164.0, 2750.0, Some(7.57)),
    e("Mo", 95.95, Some(2.16), 154.0, 2896.0, Some(6.82)),
    e("Tc", 98.0, Some(1.9), 147.0, 2430.0, Some(6.85)),
    e("Ru", 101.07, Some(2.2), 146.0, 2607.0, Some(6.74)),
    e("Rh", 102.91, Some(2.28), 142.0, 2237.0, Some(5.75)),
    e("Pd", 106.42, Some(2.20), 139.0, 1828.05, Some(3.89)),
    e("Ag", 107.87, Some(1.93), 145.0, 1234.93, Some(2.95)),
    e("Cd", 112.41, Some(1.69), 144.0, 594.22, Some(1.16)),
    e("In", 114.82, Some(1.78), 142.0, 429.75, Some(2.52)),
    e("Sn", 118.71, Some(1.96), 139.0, 505.08, Some(3.14)),
    e("Sb", 121.76, Some(2.05), 139.0, 903.78, Some(2.75)),
    e("Te", 127.60, Some(2.1), 138.0, 722.66, Some(2.19)),
    e("I", 126.90, Some(2.66), 139.0, 386.85, Some(1.11)),
    e("Xe", 131.29, None, 140.0, 161.4, Some(0.16)),
    e("Cs", 132.91, Some(0.79), 244.0, 301.59, Some(0.804)),
    e("Ba", 137.33, Some(0.89), 215.0, 1000.0, Some(1.90)),
    e("La", 138.91, Some(1.10), 207.0, 1193.0, Some(4.47)),
    e("Ce", 140.12, Some(1.12), 204.0, 1068.0, Some(4.32)),
    e("Pr", 140.91, Some(1.13), 203.0, 1208.0, Some(3.70)),
    e("Nd", 144.24, Some(1.14), 201.0, 1297.0, Some(3.40)),
    e("Pm", 145.0, Some(1.13), 199.0, 1315.0, None),
    e("Sm", 150.36, Some(1.17), 198.0, 1345.0, Some(2.14)),
    e("Eu", 151.96, Some(1.2), 198.0, 1099.0, Some(1.86)),
    e("Gd", 157.25, Some(1.2), 196.0, 1585.0, Some(4.14)),
    e("Tb", 158.93, Some(1.1), 194.0, 1629.0, Some(4.05)),
    e("Dy", 162.50, Some(1.22), 192.0, 1680.0, Some(3.04)),
    e("Ho", 164.93, Some(1.23), 192.0, 1734.0, Some(3.14)),
    e("Er", 167.26, Some(1.24), 189.0, 1802.0, Some(3.29)),
    e("Tm", 168.93, Some(1.25), 190.0, 1818.0, Some(2.42)),
    e("Yb", 173.05, Some(1.1), 187.0, 1097.0, Some(1.60)),
    e("Lu", 174.97, Some(1.27), 187.0, 1925.0, Some(4.43)),
    e("Hf", 178.49, Some(1.3), 175.0, 2506.0, Some(6.44)),
    e("Ta", 180.95, Some(1.5), 170.0, 3290.0, Some(8.10)),
    e("W", 183.84, Some(2.36), 162.0, 3695.0, Some(8.90)),
    e("Re", 186.21, Some(1.9), 151.0, 3459.0, Some(8.03)),
    e("Os", 190.23, Some(2.2), 144.0, 3306.0, Some(8.17)),
    e("Ir", 192.22, Some(2.20), 141.0, 2719.0, Some(6.94)),
    e("Pt", 195.08, Some(2.28), 136.0, 2041.4, Some(5.84)),
    e("Au", 196.97, Some(2.54), 136.0, 1337.33, Some(3.81)),
    e("Hg", 200.59, Some(2.00), 132.0, 234.32, Some(0.67)),
    e("Tl", 204.38, Some(1.62), 145.0, 577.0, Some(1.88)),
    e("Pb", 207.2, Some(2.33), 146.0, 600.61, Some(2.03)),
    e("Bi", 208.98, Some(2.02), 148.0, 544.4, Some(2.18)),
    e("Po", 209.0, Some(2.0), 140.0, 527.0, Some(1.50)),
    e("At", 210.0, Some(2.2), 150.0, 575.0, None),
    e("Rn", 222.0, None, 150.0, 202.0, Some(0.202)),
    e("Fr", 223.0, Some(0.7), 260.0, 300.0, None),
    e("Ra", 226.0, Some(0.9), 221.0, 973.0, Some(1.66)),
    e("Ac", 227.0, Some(1.1), 215.0, 1323.0, Some(4.25)),
    e("Th", 232.04, Some(1.3), 206.0, 2115.0, Some(6.20)),
    e("Pa", 231.04, Some(1.5), 200.0, 1841.0, None),
    e("U", 238.03, Some(1.38), 196.0, 1405.3, Some(5.55)),
    e("Np", 237.0, Some(1.36), 190.0, 917.0, Some(4.73)),
    e("Pu", 244.0, Some(1.28), 187.0, 912.5, Some(3.60)),
];

static SYMBOL_TO_NUMBER: Map<&'static str, u8> = phf_map! {
    "H" => 1, "He" => 2, "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8,
    "F" => 9, "Ne" => 10, "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15,
    "S" => 16, "Cl" => 17, "Ar" => 18, "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22,
    "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29,
    "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
    "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41, "Mo" => 42, "Tc" => 43,
    "Ru" => 44, "Rh" => 45, "Pd" => 46, "Ag" => 47, "Cd" => 48, "In" => 49, "Sn" => 50,
    "Sb" => 51, "Te" => 52, "I" => 53, "Xe" => 54, "Cs" => 55, "Ba" => 56, "La" => 57,
    "Ce" => 58, "Pr" => 59, "Nd" => 60, "Pm" => 61, "Sm" => 62, "Eu" => 63, "Gd" => 64,
    "Tb" => 65, "Dy" => 66, "Ho" => 67, "Er" => 68, "Tm" => 69, "Yb" => 70, "Lu" => 71,
    "Hf" => 72, "Ta" => 73, "W" => 74, "Re" => 75, "Os" => 76, "Ir" => 77, "Pt" => 78,
    "Au" => 79, "Hg" => 80, "Tl" => 81, "Pb" => 82, "Bi" => 83, "Po" => 84, "At" => 85,
    "Rn" => 86, "Fr" => 87, "Ra" => 88, "Ac" => 89, "Th" => 90, "Pa" => 91, "U" => 92,
    "Np" => 93, "Pu" => 94,
};

const NOBLE_GAS_NUMBERS: [u8; 6] = [2, 10, 18, 36, 54, 86];

/// A chemical element, identified by its atomic number.
///
/// Ordering follows the atomic number, so collections of elements sort the way
/// the periodic table reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub fn from_atomic_number(z: u8) -> Option<Self> {
        (1..=MAX_ATOMIC_NUMBER).contains(&z).then_some(Self(z))
    }

    /// Looks up an element by its symbol. Surrounding whitespace is ignored but the
    /// symbol itself is case-sensitive (`"Fe"`, not `"FE"`).
    pub fn from_symbol(symbol: &str) -> Result<Self, ChemError> {
        SYMBOL_TO_NUMBER
            .get(symbol.trim())
            .map(|&z| Self(z))
            .ok_or_else(|| ChemError::UnknownElement(symbol.trim().to_string()))
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn data(self) -> &'static ElementData {
        &ELEMENT_DATA[(self.0 - 1) as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.data().symbol
    }

    pub fn is_noble_gas(self) -> bool {
        NOBLE_GAS_NUMBERS.contains(&self.0)
    }

    /// Period of the element in the periodic table (1-based).
    pub fn row(self) -> u8 {
        match self.0 {
            1..=2 => 1,
            3..=10 => 2,
            11..=18 => 3,
            19..=36 => 4,
            37..=54 => 5,
            55..=86 => 6,
            _ => 7,
        }
    }

    /// Group of the element (1-18). Lanthanides and actinides are placed in group 3.
    pub fn column(self) -> u8 {
        let z = self.0;
        let offset = z - previous_noble_gas(z);
        match self.row() {
            1 => {
                if z == 1 {
                    1
                } else {
                    18
                }
            }
            2 | 3 => {
                if offset <= 2 {
                    offset
                } else {
                    offset + 10
                }
            }
            4 | 5 => offset,
            _ => match offset {
                1 | 2 => offset,
                3..=17 => 3,
                _ => offset - 14,
            },
        }
    }

    pub fn valence_shells(self) -> ValenceShells {
        valence_shells(self)
    }
}

/// Atomic number of the closest noble gas below `z`, or 0 for the first period.
pub(crate) fn previous_noble_gas(z: u8) -> u8 {
    NOBLE_GAS_NUMBERS
        .iter()
        .copied()
        .take_while(|&n| n < z)
        .last()
        .unwrap_or(0)
}

impl FromStr for Element {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table_matches_element_data() {
        for z in 1..=MAX_ATOMIC_NUMBER {
            let element = Element::from_atomic_number(z).unwrap();
            assert_eq!(Element::from_symbol(element.symbol()).unwrap(), element);
        }
        assert_eq!(SYMBOL_TO_NUMBER.len(), MAX_ATOMIC_NUMBER as usize);
    }

    #[test]
    fn from_symbol_trims_whitespace_and_is_case_sensitive() {
        assert_eq!(Element::from_symbol(" Fe ").unwrap().atomic_number(), 26);
        assert_eq!(
            Element::from_symbol("FE"),
            Err(ChemError::UnknownElement("FE".to_string()))
        );
        assert!(Element::from_symbol("").is_err());
        assert!(Element::from_symbol("Xx").is_err());
    }

    #[test]
    fn from_atomic_number_rejects_out_of_range_values() {
        assert!(Element::from_atomic_number(0).is_none());
        assert!(Element::from_atomic_number(MAX_ATOMIC_NUMBER + 1).is_none());
    }

    #[test]
    fn noble_gases_are_recognized_and_lack_electronegativity() {
        for symbol in ["He", "Ne", "Ar", "Kr", "Xe", "Rn"] {
            let element = Element::from_symbol(symbol).unwrap();
            assert!(element.is_noble_gas());
            assert!(element.data().electronegativity.is_none());
        }
        assert!(!Element::from_symbol("Fe").unwrap().is_noble_gas());
    }

    #[test]
    fn row_and_column_follow_periodic_table_layout() {
        let cases = [
            ("H", 1, 1),
            ("He", 1, 18),
            ("Li", 2, 1),
            ("C", 2, 14),
            ("Na", 3, 1),
            ("Cl", 3, 17),
            ("Fe", 4, 8),
            ("Br", 4, 17),
            ("Ag", 5, 11),
            ("La", 6, 3),
            ("Gd", 6, 3),
            ("Lu", 6, 3),
            ("Hf", 6, 4),
            ("Au", 6, 11),
            ("Rn", 6, 18),
            ("Fr", 7, 1),
            ("U", 7, 3),
        ];
        for (symbol, row, column) in cases {
            let element = Element::from_symbol(symbol).unwrap();
            assert_eq!(element.row(), row, "row of {symbol}");
            assert_eq!(element.column(), column, "column of {symbol}");
        }
    }

    #[test]
    fn display_prints_symbol() {
        assert_eq!(Element::from_symbol("Mg").unwrap().to_string(), "Mg");
    }
}
