use super::params::{
    AngleTypeRow, AtomTypeRow, BondTypeRow, CmapTypeRow, ConstraintTypeRow, Defaults,
    DihedralTypeRow, GenBornRow, NonbondParamRow, PairTypeRow, Section, WILDCARD_ATOM_TYPE,
};
use crate::preprocess::{PreprocessError, PreprocessOptions, Preprocessor, SourceLine, strip_comment};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ForceFieldError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("malformed [ {section} ] record at {}:{line}: {reason}", file.display())]
    Parse {
        section: String,
        file: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Tracks which section the loader is currently inside. Rows in an unknown
/// section (or before any section header) are skipped with a warning rather
/// than failing, so a database with vendor extensions still loads.
enum SectionState {
    BeforeFirstHeader,
    Unknown,
    Known(Section),
}

/// A sectioned force-field parameter database.
///
/// Built by [`ForceField::load`], which threads the input through the
/// conditional preprocessor, so `#include`, `#ifdef` and `#define` behave the
/// same in force-field files as in topologies. Lookup operations are symmetric
/// over the atoms of an undirected interaction; see the individual methods for
/// the exact matching rules.
#[derive(Debug, Clone, Default)]
pub struct ForceField {
    pub defaults: Option<Defaults>,
    pub atom_types: Vec<AtomTypeRow>,
    pub pair_types: Vec<PairTypeRow>,
    pub bond_types: Vec<BondTypeRow>,
    pub constraint_types: Vec<ConstraintTypeRow>,
    pub angle_types: Vec<AngleTypeRow>,
    pub dihedral_types: Vec<DihedralTypeRow>,
    pub genborn_params: Vec<GenBornRow>,
    pub cmap_types: Vec<CmapTypeRow>,
    pub nonbond_params: Vec<NonbondParamRow>,
    warnings: Vec<String>,
}

impl ForceField {
    /// Loads a parameter database from a file, with full preprocessor
    /// handling (conditionals, macros, includes) per `options`.
    pub fn load(
        path: impl AsRef<Path>,
        options: PreprocessOptions,
    ) -> Result<Self, ForceFieldError> {
        let mut preprocessor = Preprocessor::with_options(path, options)?;
        let mut table = ForceField::default();
        let mut state = SectionState::BeforeFirstHeader;

        for result in preprocessor.by_ref() {
            let line = result?;
            table.ingest(&mut state, &line)?;
        }
        for warning in preprocessor.warnings() {
            table.warnings.push(format!(
                "{}:{}: {}",
                warning.file.display(),
                warning.line,
                warning.message
            ));
        }
        Ok(table)
    }

    /// Loads a GROMACS-layout force-field directory, i.e.
    /// `<ffdir>/forcefield.itp` with `<ffdir>` as an include directory.
    pub fn load_gromacs(ffdir: impl AsRef<Path>) -> Result<Self, ForceFieldError> {
        let ffdir = ffdir.as_ref();
        Self::load(
            ffdir.join("forcefield.itp"),
            PreprocessOptions {
                include_dirs: vec![ffdir.to_path_buf()],
                ..Default::default()
            },
        )
    }

    /// Non-fatal diagnostics collected while loading: unknown sections,
    /// out-of-section rows and `#warning` directives.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn ingest(
        &mut self,
        state: &mut SectionState,
        line: &SourceLine,
    ) -> Result<(), ForceFieldError> {
        let code = strip_comment(&line.text).trim();
        if code.is_empty() {
            return Ok(());
        }

        if let Some(header) = code.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let name = header.trim();
            *state = match name.parse::<Section>() {
                Ok(section) => SectionState::Known(section),
                Err(()) => {
                    self.warn(format!(
                        "unknown section [ {} ] at {}:{}",
                        name,
                        line.file.display(),
                        line.line
                    ));
                    SectionState::Unknown
                }
            };
            return Ok(());
        }

        let section = match state {
            SectionState::Known(section) => *section,
            SectionState::Unknown => return Ok(()),
            SectionState::BeforeFirstHeader => {
                self.warn(format!(
                    "parameter row before any section header at {}:{}",
                    line.file.display(),
                    line.line
                ));
                return Ok(());
            }
        };

        let parse_error = |reason: String| ForceFieldError::Parse {
            section: section.name().to_string(),
            file: line.file.clone(),
            line: line.line,
            reason,
        };

        match section {
            Section::Defaults => self.defaults = Some(code.parse().map_err(parse_error)?),
            Section::AtomTypes => self.atom_types.push(code.parse().map_err(parse_error)?),
            Section::PairTypes => self.pair_types.push(code.parse().map_err(parse_error)?),
            Section::BondTypes => self.bond_types.push(code.parse().map_err(parse_error)?),
            Section::ConstraintTypes => {
                self.constraint_types.push(code.parse().map_err(parse_error)?)
            }
            Section::AngleTypes => self.angle_types.push(code.parse().map_err(parse_error)?),
            Section::DihedralTypes => self.dihedral_types.push(code.parse().map_err(parse_error)?),
            Section::ImplicitGenbornParams => {
                self.genborn_params.push(code.parse().map_err(parse_error)?)
            }
            Section::CmapTypes => self.cmap_types.push(code.parse().map_err(parse_error)?),
            Section::NonbondParams => self.nonbond_params.push(code.parse().map_err(parse_error)?),
        }
        Ok(())
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Bond-type rows matching the unordered pair `(type1, type2)`.
    pub fn lookup_bond(&self, type1: &str, type2: &str) -> Vec<&BondTypeRow> {
        self.bond_types
            .iter()
            .filter(|row| {
                (row.type1 == type1 && row.type2 == type2)
                    || (row.type1 == type2 && row.type2 == type1)
            })
            .collect()
    }

    /// Angle-type rows matching `(type1, type2, type3)` forward or exactly
    /// reversed. The central type must match in position.
    pub fn lookup_angle(&self, type1: &str, type2: &str, type3: &str) -> Vec<&AngleTypeRow> {
        self.angle_types
            .iter()
            .filter(|row| {
                (row.type1 == type1 && row.type2 == type2 && row.type3 == type3)
                    || (row.type1 == type3 && row.type2 == type2 && row.type3 == type1)
            })
            .collect()
    }

    /// Dihedral-type rows matching `(type1..type4)` forward or reversed. The
    /// wildcard token matches any type in the two terminal row positions only;
    /// the central pair must match concretely.
    pub fn lookup_dihedral(
        &self,
        type1: &str,
        type2: &str,
        type3: &str,
        type4: &str,
    ) -> Vec<&DihedralTypeRow> {
        let terminal = |row_type: &str, query: &str| row_type == query || row_type == WILDCARD_ATOM_TYPE;
        self.dihedral_types
            .iter()
            .filter(|row| {
                (terminal(&row.type1, type1)
                    && row.type2 == type2
                    && row.type3 == type3
                    && terminal(&row.type4, type4))
                    || (terminal(&row.type1, type4)
                        && row.type2 == type3
                        && row.type3 == type2
                        && terminal(&row.type4, type1))
            })
            .collect()
    }

    /// Pair-type rows matching the unordered pair `(type1, type2)`. No
    /// wildcards.
    pub fn lookup_pair(&self, type1: &str, type2: &str) -> Vec<&PairTypeRow> {
        self.pair_types
            .iter()
            .filter(|row| {
                (row.type1 == type1 && row.type2 == type2)
                    || (row.type1 == type2 && row.type2 == type1)
            })
            .collect()
    }

    /// Nonbonded-parameter rows matching the unordered pair `(type1, type2)`.
    /// No wildcards.
    pub fn lookup_nonbonded(&self, type1: &str, type2: &str) -> Vec<&NonbondParamRow> {
        self.nonbond_params
            .iter()
            .filter(|row| {
                (row.type1 == type1 && row.type2 == type2)
                    || (row.type1 == type2 && row.type2 == type1)
            })
            .collect()
    }
}
