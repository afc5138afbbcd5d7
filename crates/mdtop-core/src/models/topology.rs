use super::ids::AtomId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bond order / type tag, covering the tags coordinate-file readers produce
/// (mol2-style `1`/`2`/`3`/`ar`/`am`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
    Amide,
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "ar" | "aromatic" => Ok(Self::Aromatic),
            "am" | "amide" => Ok(Self::Amide),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
                Self::Amide => "Amide",
            }
        )
    }
}

/// An undirected bond between two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: AtomId,
    pub atom2: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: AtomId, atom2: AtomId, order: BondOrder) -> Self {
        Self {
            atom1,
            atom2,
            order,
        }
    }

    pub fn contains(&self, atom: AtomId) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }

    /// Whether this bond connects the same unordered atom pair as `other`.
    pub fn same_pair(&self, other: &Bond) -> bool {
        (self.atom1 == other.atom1 && self.atom2 == other.atom2)
            || (self.atom1 == other.atom2 && self.atom2 == other.atom1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_order_from_str_parses_mol2_tags() {
        assert_eq!("1".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("2".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("3".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("ar".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert_eq!("am".parse::<BondOrder>().unwrap(), BondOrder::Amide);
        assert_eq!("Single".parse::<BondOrder>().unwrap(), BondOrder::Single);
    }

    #[test]
    fn bond_order_from_str_rejects_unknown_tags() {
        assert!("".parse::<BondOrder>().is_err());
        assert!("du".parse::<BondOrder>().is_err());
        assert!("0".parse::<BondOrder>().is_err());
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
    }

    #[test]
    fn bond_contains_both_endpoints() {
        let a1 = dummy_atom_id(1);
        let a2 = dummy_atom_id(2);
        let bond = Bond::new(a1, a2, BondOrder::Single);
        assert!(bond.contains(a1));
        assert!(bond.contains(a2));
        assert!(!bond.contains(dummy_atom_id(3)));
    }

    #[test]
    fn same_pair_ignores_direction_and_order() {
        let a1 = dummy_atom_id(1);
        let a2 = dummy_atom_id(2);
        let forward = Bond::new(a1, a2, BondOrder::Single);
        let backward = Bond::new(a2, a1, BondOrder::Double);
        assert!(forward.same_pair(&backward));
        assert!(!forward.same_pair(&Bond::new(a1, dummy_atom_id(3), BondOrder::Single)));
    }
}
