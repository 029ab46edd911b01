use super::error::{FieldIoError, ParseErrorKind};
use super::header::FieldHeader;
use super::lines::LineReader;
use super::traits::FieldFile;
use crate::core::field::DftField;
use crate::engine::domain::Domain;
use num_complex::Complex64;
use std::io::{BufRead, Write};

/// Half-complex DFT field file.
///
/// After the header, a `mesh` block gives the mesh dimensions, followed by one
/// line per DFT slot: the slot rank, then the real and imaginary parts for
/// each monomer.
pub struct KGridFile;

impl<const D: usize> FieldFile<D> for KGridFile {
    type Data = Vec<DftField<D>>;

    fn read_from(
        reader: &mut impl BufRead,
        domain: &mut Domain<D>,
    ) -> Result<(FieldHeader, Self::Data), FieldIoError> {
        let mut lines = LineReader::new(reader);
        let header = FieldHeader::read(&mut lines)?;
        header.check_domain(domain)?;
        let unit_cell = header.unit_cell()?;

        lines.keyword("mesh")?;
        let tokens = lines.tokens("mesh dimensions")?;
        let dimensions: Vec<usize> = lines.parse_all(&tokens)?;
        let mesh = *domain.mesh();
        if dimensions != mesh.dimensions() {
            return Err(FieldIoError::HeaderMismatch(format!(
                "file mesh {dimensions:?} differs from domain mesh {:?}",
                mesh.dimensions()
            )));
        }

        let n_monomer = header.n_monomer;
        let mut fields = vec![DftField::new(&mesh); n_monomer];
        for slot in 0..mesh.dft_size() {
            let tokens = lines.tokens("DFT coefficients")?;
            if tokens.len() != 1 + 2 * n_monomer {
                return Err(lines.error(ParseErrorKind::FieldCount {
                    expected: 1 + 2 * n_monomer,
                    found: tokens.len(),
                }));
            }
            let rank: usize = lines.parse(&tokens[0])?;
            if rank != slot {
                return Err(lines.error(ParseErrorKind::Invalid(format!(
                    "expected slot {slot}, found {rank}"
                ))));
            }
            let values: Vec<f64> = lines.parse_all(&tokens[1..])?;
            for (field, pair) in fields.iter_mut().zip(values.chunks_exact(2)) {
                field[slot] = Complex64::new(pair[0], pair[1]);
            }
        }
        domain.set_unit_cell(unit_cell)?;
        Ok((header, fields))
    }

    fn write_to(
        domain: &Domain<D>,
        data: &Self::Data,
        writer: &mut impl Write,
    ) -> Result<(), FieldIoError> {
        let mesh = domain.mesh();
        if let Some(field) = data.iter().find(|field| field.mesh() != mesh) {
            return Err(FieldIoError::HeaderMismatch(format!(
                "field mesh {:?} differs from domain mesh {:?}",
                field.mesh_dimensions(),
                mesh.dimensions()
            )));
        }
        FieldHeader::for_domain(domain, data.len())?.write(writer)?;
        writeln!(writer, "mesh")?;
        for n in mesh.dimensions() {
            write!(writer, "{n:>9}")?;
        }
        writeln!(writer)?;
        for slot in 0..mesh.dft_size() {
            write!(writer, "{slot:>8}")?;
            for field in data {
                let value = field[slot];
                write!(writer, "  {:>21.12e}{:>21.12e}", value.re, value.im)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crystal::{Lattice, SpaceGroup, UnitCell};
    use crate::core::mesh::Mesh;
    use crate::engine::config::BasisConfig;
    use std::io::Cursor;

    fn domain(mesh: [usize; 3]) -> Domain<3> {
        domain_with_cell(mesh, 1.7)
    }

    fn domain_with_cell(mesh: [usize; 3], a: f64) -> Domain<3> {
        Domain::new(
            Mesh::new(mesh).unwrap(),
            UnitCell::new(Lattice::Cubic, &[a]).unwrap(),
            SpaceGroup::from_name("I_m_-3_m").unwrap(),
            BasisConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn written_file_reads_back() {
        let mut domain = domain([4, 4, 4]);
        let basis = domain.basis();
        let components: Vec<f64> = (0..basis.n_basis()).map(|i| 1.0 / (i + 1) as f64).collect();
        let field = basis.components_to_dft(&components).unwrap();

        let mut buffer = Vec::new();
        KGridFile::write_to(&domain, &vec![field.clone()], &mut buffer).unwrap();
        let (header, read) = KGridFile::read_from(&mut Cursor::new(buffer), &mut domain).unwrap();
        assert_eq!(header.n_monomer, 1);
        for (a, b) in read[0].iter().zip(field.iter()) {
            assert!((a - b).norm() < 1e-11);
        }
    }

    #[test]
    fn mesh_mismatch_is_rejected_without_touching_the_domain() {
        let source = domain_with_cell([4, 4, 4], 2.5);
        let mut buffer = Vec::new();
        KGridFile::write_to(&source, &vec![DftField::new(source.mesh())], &mut buffer).unwrap();

        let mut target = domain_with_cell([8, 8, 8], 1.0);
        let err = KGridFile::read_from(&mut Cursor::new(buffer), &mut target).unwrap_err();
        assert!(matches!(err, FieldIoError::HeaderMismatch(_)));
        assert_eq!(target.unit_cell().parameters(), &[1.0]);
    }
}
