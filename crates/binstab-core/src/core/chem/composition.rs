use super::ChemError;
use super::elements::Element;
use std::fmt;
use std::str::FromStr;

/// A chemical composition: elements with their (possibly fractional) amounts.
///
/// Elements keep the order in which they were first added, which is the order
/// used when printing the formula. Adding an element twice accumulates its amount.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    amounts: Vec<(Element, f64)>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the binary composition `A_x B_y`. When `a == b` the result collapses to
    /// a single element with amount `x + y`.
    pub fn from_pair(a: Element, b: Element, x: u32, y: u32) -> Result<Self, ChemError> {
        let mut composition = Self::new();
        composition.add(a, x as f64)?;
        composition.add(b, y as f64)?;
        Ok(composition)
    }

    pub fn add(&mut self, element: Element, amount: f64) -> Result<(), ChemError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ChemError::InvalidAmount {
                symbol: element.symbol(),
                amount,
            });
        }
        match self.amounts.iter_mut().find(|(el, _)| *el == element) {
            Some((_, existing)) => *existing += amount,
            None => self.amounts.push((element, amount)),
        }
        Ok(())
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.amounts.iter().map(|(el, _)| *el)
    }

    pub fn amount(&self, element: Element) -> f64 {
        self.amounts
            .iter()
            .find(|(el, _)| *el == element)
            .map_or(0.0, |(_, amount)| *amount)
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn num_atoms(&self) -> f64 {
        self.amounts.iter().map(|(_, amount)| amount).sum()
    }

    /// Atomic fractions of each element, in insertion order.
    pub fn fractions(&self) -> Vec<(Element, f64)> {
        let total = self.num_atoms();
        self.amounts
            .iter()
            .map(|&(el, amount)| (el, amount / total))
            .collect()
    }

    pub fn contains_noble_gas(&self) -> bool {
        self.elements().any(Element::is_noble_gas)
    }

    /// Formula with integer amounts divided by their greatest common divisor.
    /// Fractional compositions are printed unchanged.
    pub fn reduced_formula(&self) -> String {
        let all_integral = self
            .amounts
            .iter()
            .all(|(_, amount)| amount.fract() == 0.0 && *amount <= u64::MAX as f64);
        if !all_integral {
            return self.to_string();
        }

        let divisor = self
            .amounts
            .iter()
            .map(|(_, amount)| *amount as u64)
            .fold(0, gcd)
            .max(1);

        let mut reduced = Self::new();
        for &(el, amount) in &self.amounts {
            reduced.amounts.push((el, ((amount as u64) / divisor) as f64));
        }
        reduced.to_string()
    }

    /// Reduced formula with elements ordered by atomic number, so that `OFe` and `FeO`
    /// map to the same key.
    pub fn canonical_formula(&self) -> String {
        let mut sorted = self.clone();
        sorted.amounts.sort_by_key(|(el, _)| *el);
        sorted.reduced_formula()
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn format_amount(amount: f64) -> String {
    if amount == 1.0 {
        String::new()
    } else if amount.fract() == 0.0 {
        format!("{}", amount as u64)
    } else {
        format!("{}", amount)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (el, amount) in &self.amounts {
            write!(f, "{}{}", el.symbol(), format_amount(*amount))?;
        }
        Ok(())
    }
}

impl FromStr for Composition {
    type Err = ChemError;

    /// Parses flat formulas such as `Fe2O3`, `NaCl` or `Al0.5Ni0.5`.
    fn from_str(formula: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ChemError::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = formula.trim();
        if trimmed.is_empty() {
            return Err(invalid("formula is empty"));
        }

        let chars: Vec<char> = trimmed.chars().collect();
        let mut composition = Self::new();
        let mut i = 0;
        while i < chars.len() {
            if !chars[i].is_ascii_uppercase() {
                return Err(invalid(&format!(
                    "unexpected character '{}' at position {}",
                    chars[i], i
                )));
            }
            let mut symbol = chars[i].to_string();
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                symbol.push(chars[i]);
                i += 1;
            }

            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let amount = if start == i {
                1.0
            } else {
                let digits: String = chars[start..i].iter().collect();
                digits
                    .parse::<f64>()
                    .map_err(|_| invalid(&format!("invalid amount '{}'", digits)))?
            };

            let element = Element::from_symbol(&symbol)?;
            composition.add(element, amount)?;
        }
        Ok(composition)
    }
}
