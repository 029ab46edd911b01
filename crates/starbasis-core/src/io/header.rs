use super::error::{FieldIoError, ParseErrorKind};
use super::lines::LineReader;
use crate::core::crystal::{Lattice, UnitCell, normalize_group_name};
use crate::engine::domain::Domain;
use std::io::{BufRead, Write};

const FORMAT_VERSION: (u32, u32) = (1, 0);

/// Keyword header shared by all field file formats.
///
/// ```text
/// format  1  0
/// dim
///           2
/// crystal_system
///           hexagonal
/// N_cell_param
///           1
/// cell_param
///     1.500000000000e0
/// group_name
///           p_6_m_m
/// N_monomer
///           2
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHeader {
    pub version: (u32, u32),
    pub dimension: usize,
    pub lattice: Lattice,
    pub parameters: Vec<f64>,
    pub group_name: String,
    pub n_monomer: usize,
}

impl FieldHeader {
    pub fn for_domain<const D: usize>(
        domain: &Domain<D>,
        n_monomer: usize,
    ) -> Result<Self, FieldIoError> {
        let lattice = domain.lattice().ok_or_else(|| {
            FieldIoError::HeaderMismatch("domain unit cell has no lattice system".to_string())
        })?;
        Ok(Self {
            version: FORMAT_VERSION,
            dimension: D,
            lattice,
            parameters: domain.unit_cell().parameters().to_vec(),
            group_name: domain.group().name().to_string(),
            n_monomer,
        })
    }

    pub(crate) fn read<R: BufRead>(lines: &mut LineReader<'_, R>) -> Result<Self, FieldIoError> {
        let version_tokens = lines.keyword("format")?;
        let version: Vec<u32> = lines.parse_all(&version_tokens)?;
        let version = match version.as_slice() {
            [major, minor] => (*major, *minor),
            _ => {
                return Err(lines.error(ParseErrorKind::FieldCount {
                    expected: 2,
                    found: version.len(),
                }));
            }
        };

        let dimension: usize = lines.labelled("dim")?;
        let lattice_name: String = lines.labelled("crystal_system")?;
        let lattice = Lattice::from_name(&lattice_name, dimension)
            .map_err(|e| lines.error(ParseErrorKind::Invalid(e.to_string())))?;

        let n_parameters: usize = lines.labelled("N_cell_param")?;
        lines.keyword("cell_param")?;
        let mut parameters = Vec::with_capacity(n_parameters);
        while parameters.len() < n_parameters {
            let tokens = lines.tokens("cell_param")?;
            parameters.extend(lines.parse_all::<f64>(&tokens)?);
        }
        if parameters.len() != n_parameters {
            return Err(lines.error(ParseErrorKind::FieldCount {
                expected: n_parameters,
                found: parameters.len(),
            }));
        }

        let group_name: String = lines.labelled("group_name")?;
        let n_monomer: usize = lines.labelled("N_monomer")?;

        Ok(Self {
            version,
            dimension,
            lattice,
            parameters,
            group_name: normalize_group_name(&group_name),
            n_monomer,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), FieldIoError> {
        writeln!(writer, "format  {}  {}", self.version.0, self.version.1)?;
        writeln!(writer, "dim")?;
        writeln!(writer, "{:>11}", self.dimension)?;
        writeln!(writer, "crystal_system")?;
        writeln!(writer, "{:>15}", self.lattice)?;
        writeln!(writer, "N_cell_param")?;
        writeln!(writer, "{:>11}", self.parameters.len())?;
        writeln!(writer, "cell_param")?;
        for parameter in &self.parameters {
            write!(writer, "{parameter:>21.12e}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "group_name")?;
        writeln!(writer, "{:>15}", self.group_name.replace(' ', "_"))?;
        writeln!(writer, "N_monomer")?;
        writeln!(writer, "{:>11}", self.n_monomer)?;
        Ok(())
    }

    pub fn unit_cell<const D: usize>(&self) -> Result<UnitCell<D>, FieldIoError> {
        Ok(UnitCell::new(self.lattice, &self.parameters)?)
    }

    /// Checks dimension and group against the domain.
    ///
    /// The crystal system and cell parameters may differ; readers apply them.
    pub fn check_domain<const D: usize>(&self, domain: &Domain<D>) -> Result<(), FieldIoError> {
        if self.dimension != D {
            return Err(FieldIoError::HeaderMismatch(format!(
                "file is {}-dimensional, domain is {D}-dimensional",
                self.dimension
            )));
        }
        let group = normalize_group_name(domain.group().name());
        if self.group_name != group {
            return Err(FieldIoError::HeaderMismatch(format!(
                "file group '{}' differs from domain group '{group}'",
                self.group_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header() -> FieldHeader {
        FieldHeader {
            version: (1, 0),
            dimension: 3,
            lattice: Lattice::Tetragonal,
            parameters: vec![1.25, 2.5],
            group_name: "P 4/m m m".to_string(),
            n_monomer: 2,
        }
    }

    #[test]
    fn written_header_is_readable() {
        let mut buffer = Vec::new();
        header().write(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.contains("P_4/m_m_m"));

        let mut cursor = Cursor::new(buffer);
        let mut lines = LineReader::new(&mut cursor);
        assert_eq!(FieldHeader::read(&mut lines).unwrap(), header());
    }

    #[test]
    fn unknown_crystal_system_is_a_parse_error() {
        let text = "format 1 0\ndim\n2\ncrystal_system\ncubic\n";
        let mut cursor = Cursor::new(text);
        let mut lines = LineReader::new(&mut cursor);
        let err = FieldHeader::read(&mut lines).unwrap_err();
        assert!(matches!(err, FieldIoError::Parse { line: 5, .. }));
    }
}
