use nalgebra::DMatrix;
use std::fmt;
use std::str::FromStr;

/// The atom-type token that matches any concrete type. Only honored in the
/// two terminal positions of dihedral parameter rows.
pub const WILDCARD_ATOM_TYPE: &str = "X";

/// The recognized force-field file sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Defaults,
    AtomTypes,
    PairTypes,
    BondTypes,
    ConstraintTypes,
    AngleTypes,
    DihedralTypes,
    ImplicitGenbornParams,
    CmapTypes,
    NonbondParams,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Defaults => "defaults",
            Section::AtomTypes => "atomtypes",
            Section::PairTypes => "pairtypes",
            Section::BondTypes => "bondtypes",
            Section::ConstraintTypes => "constrainttypes",
            Section::AngleTypes => "angletypes",
            Section::DihedralTypes => "dihedraltypes",
            Section::ImplicitGenbornParams => "implicit_genborn_params",
            Section::CmapTypes => "cmaptypes",
            Section::NonbondParams => "nonbond_params",
        }
    }
}

impl FromStr for Section {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "defaults" => Ok(Section::Defaults),
            "atomtypes" => Ok(Section::AtomTypes),
            "pairtypes" => Ok(Section::PairTypes),
            "bondtypes" => Ok(Section::BondTypes),
            "constrainttypes" => Ok(Section::ConstraintTypes),
            "angletypes" => Ok(Section::AngleTypes),
            "dihedraltypes" => Ok(Section::DihedralTypes),
            "implicit_genborn_params" => Ok(Section::ImplicitGenbornParams),
            "cmaptypes" => Ok(Section::CmapTypes),
            "nonbond_params" => Ok(Section::NonbondParams),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whitespace-token cursor used by the row parsers. Error messages name the
/// missing or malformed field; the loader attaches section, file and line.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            iter: line.split_whitespace(),
        }
    }

    fn next_str(&mut self, what: &'static str) -> Result<&'a str, String> {
        self.iter.next().ok_or_else(|| format!("missing {}", what))
    }

    fn next_f64(&mut self, what: &'static str) -> Result<f64, String> {
        let token = self.next_str(what)?;
        token
            .parse()
            .map_err(|_| format!("invalid {} '{}'", what, token))
    }

    fn next_u32(&mut self, what: &'static str) -> Result<u32, String> {
        let token = self.next_str(what)?;
        token
            .parse()
            .map_err(|_| format!("invalid {} '{}'", what, token))
    }

    fn next_usize(&mut self, what: &'static str) -> Result<usize, String> {
        let token = self.next_str(what)?;
        token
            .parse()
            .map_err(|_| format!("invalid {} '{}'", what, token))
    }
}

/// The `[ defaults ]` section: global combination and scaling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub nonbonded_function: u32,
    pub combination_rule: u32,
    pub generate_pairs: bool,
    pub fudge_lj: f64,
    pub fudge_qq: f64,
}

impl FromStr for Defaults {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            nonbonded_function: t.next_u32("nonbonded function")?,
            combination_rule: t.next_u32("combination rule")?,
            generate_pairs: t.next_str("gen-pairs flag")?.eq_ignore_ascii_case("yes"),
            fudge_lj: t.next_f64("fudgeLJ")?,
            fudge_qq: t.next_f64("fudgeQQ")?,
        })
    }
}

/// One `[ atomtypes ]` row.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomTypeRow {
    pub name: String,
    pub atomic_number: u32,
    pub mass: f64,
    pub charge: f64,
    pub particle_type: String,
    pub sigma: f64,
    pub epsilon: f64,
}

impl FromStr for AtomTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            name: t.next_str("atom type")?.to_string(),
            atomic_number: t.next_u32("atomic number")?,
            mass: t.next_f64("mass")?,
            charge: t.next_f64("charge")?,
            particle_type: t.next_str("particle type")?.to_string(),
            sigma: t.next_f64("sigma")?,
            epsilon: t.next_f64("epsilon")?,
        })
    }
}

/// One `[ pairtypes ]` row.
#[derive(Debug, Clone, PartialEq)]
pub struct PairTypeRow {
    pub type1: String,
    pub type2: String,
    pub function: u32,
    pub sigma: f64,
    pub epsilon: f64,
}

impl FromStr for PairTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            type1: t.next_str("atom type 1")?.to_string(),
            type2: t.next_str("atom type 2")?.to_string(),
            function: t.next_u32("function type")?,
            sigma: t.next_f64("sigma")?,
            epsilon: t.next_f64("epsilon")?,
        })
    }
}

/// One `[ bondtypes ]` row.
#[derive(Debug, Clone, PartialEq)]
pub struct BondTypeRow {
    pub type1: String,
    pub type2: String,
    pub function: u32,
    pub b0: f64,
    pub kb: f64,
}

impl FromStr for BondTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            type1: t.next_str("atom type 1")?.to_string(),
            type2: t.next_str("atom type 2")?.to_string(),
            function: t.next_u32("function type")?,
            b0: t.next_f64("equilibrium length")?,
            kb: t.next_f64("force constant")?,
        })
    }
}

/// One `[ constrainttypes ]` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintTypeRow {
    pub type1: String,
    pub type2: String,
    pub function: u32,
    pub length: f64,
}

impl FromStr for ConstraintTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            type1: t.next_str("atom type 1")?.to_string(),
            type2: t.next_str("atom type 2")?.to_string(),
            function: t.next_u32("function type")?,
            length: t.next_f64("constraint length")?,
        })
    }
}

/// One `[ angletypes ]` row (harmonic plus Urey-Bradley columns).
#[derive(Debug, Clone, PartialEq)]
pub struct AngleTypeRow {
    pub type1: String,
    pub type2: String,
    pub type3: String,
    pub function: u32,
    pub theta0: f64,
    pub k_theta: f64,
    pub ub0: f64,
    pub k_ub: f64,
}

impl FromStr for AngleTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            type1: t.next_str("atom type 1")?.to_string(),
            type2: t.next_str("atom type 2")?.to_string(),
            type3: t.next_str("atom type 3")?.to_string(),
            function: t.next_u32("function type")?,
            theta0: t.next_f64("theta0")?,
            k_theta: t.next_f64("ktheta")?,
            ub0: t.next_f64("ub0")?,
            k_ub: t.next_f64("kub")?,
        })
    }
}

/// One `[ dihedraltypes ]` row. The trailing multiplicity column is optional
/// and defaults to 1. Terminal types may be the wildcard
/// [`WILDCARD_ATOM_TYPE`].
#[derive(Debug, Clone, PartialEq)]
pub struct DihedralTypeRow {
    pub type1: String,
    pub type2: String,
    pub type3: String,
    pub type4: String,
    pub function: u32,
    pub phi0: f64,
    pub k_phi: f64,
    pub multiplicity: u32,
}

impl FromStr for DihedralTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            type1: t.next_str("atom type 1")?.to_string(),
            type2: t.next_str("atom type 2")?.to_string(),
            type3: t.next_str("atom type 3")?.to_string(),
            type4: t.next_str("atom type 4")?.to_string(),
            function: t.next_u32("function type")?,
            phi0: t.next_f64("phi0")?,
            k_phi: t.next_f64("kphi")?,
            multiplicity: match t.iter.next() {
                Some(token) => token
                    .parse()
                    .map_err(|_| format!("invalid multiplicity '{}'", token))?,
                None => 1,
            },
        })
    }
}

/// One `[ implicit_genborn_params ]` row.
#[derive(Debug, Clone, PartialEq)]
pub struct GenBornRow {
    pub atom_type: String,
    pub sar: f64,
    pub st: f64,
    pub pi: f64,
    pub gbr: f64,
    pub hct: f64,
}

impl FromStr for GenBornRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            atom_type: t.next_str("atom type")?.to_string(),
            sar: t.next_f64("sar")?,
            st: t.next_f64("st")?,
            pi: t.next_f64("pi")?,
            gbr: t.next_f64("gbr")?,
            hct: t.next_f64("hct")?,
        })
    }
}

/// One `[ cmaptypes ]` row: a five-type key and an `nx` by `ny` correction
/// grid, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CmapTypeRow {
    pub type1: String,
    pub type2: String,
    pub type3: String,
    pub type4: String,
    pub type5: String,
    pub function: u32,
    pub grid: DMatrix<f64>,
}

impl FromStr for CmapTypeRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        let type1 = t.next_str("atom type 1")?.to_string();
        let type2 = t.next_str("atom type 2")?.to_string();
        let type3 = t.next_str("atom type 3")?.to_string();
        let type4 = t.next_str("atom type 4")?.to_string();
        let type5 = t.next_str("atom type 5")?.to_string();
        let function = t.next_u32("function type")?;
        let nx = t.next_usize("grid rows")?;
        let ny = t.next_usize("grid columns")?;
        let mut values = Vec::with_capacity(nx * ny);
        for token in t.iter.by_ref() {
            let value: f64 = token
                .parse()
                .map_err(|_| format!("invalid grid value '{}'", token))?;
            values.push(value);
        }
        if values.len() != nx * ny {
            return Err(format!(
                "expected {} grid values ({}x{}), found {}",
                nx * ny,
                nx,
                ny,
                values.len()
            ));
        }
        Ok(Self {
            type1,
            type2,
            type3,
            type4,
            type5,
            function,
            grid: DMatrix::from_row_slice(nx, ny, &values),
        })
    }
}

/// One `[ nonbond_params ]` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NonbondParamRow {
    pub type1: String,
    pub type2: String,
    pub function: u32,
    pub sigma: f64,
    pub epsilon: f64,
}

impl FromStr for NonbondParamRow {
    type Err = String;
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut t = Tokens::new(line);
        Ok(Self {
            type1: t.next_str("atom type 1")?.to_string(),
            type2: t.next_str("atom type 2")?.to_string(),
            function: t.next_u32("function type")?,
            sigma: t.next_f64("sigma")?,
            epsilon: t.next_f64("epsilon")?,
        })
    }
}
