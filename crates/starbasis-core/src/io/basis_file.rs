use super::error::{FieldIoError, ParseErrorKind};
use super::header::FieldHeader;
use super::lines::LineReader;
use super::traits::FieldFile;
use crate::core::IntVec;
use crate::engine::domain::Domain;
use crate::engine::error::BasisError;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Symmetry-adapted field file: one line per basis function, holding the
/// coefficient of each monomer, the characteristic wave and the star size.
///
/// Data is indexed `[monomer][basis_id]`.
pub struct BasisFile;

impl<const D: usize> FieldFile<D> for BasisFile {
    type Data = Vec<Vec<f64>>;

    fn read_from(
        reader: &mut impl BufRead,
        domain: &mut Domain<D>,
    ) -> Result<(FieldHeader, Self::Data), FieldIoError> {
        let mut lines = LineReader::new(reader);
        let header = FieldHeader::read(&mut lines)?;
        header.check_domain(domain)?;
        // Entries are resolved against the basis at the file's cell; the
        // caller's domain only takes that cell once every entry is read.
        let mut staged = domain.clone();
        staged.set_unit_cell(header.unit_cell()?)?;

        let count_tokens = lines.tokens("N_basis")?;
        if !matches!(count_tokens[0].as_str(), "N_basis" | "N_star") || count_tokens.len() != 1 {
            return Err(lines.error(ParseErrorKind::UnexpectedKeyword {
                expected: "N_basis".to_string(),
                found: count_tokens.join(" "),
            }));
        }
        let n_entries: usize = lines.value("N_basis")?;

        let basis = staged.basis();
        let n_monomer = header.n_monomer;
        let mut fields = vec![vec![0.0; basis.n_basis()]; n_monomer];
        let mut skipped = 0;
        for _ in 0..n_entries {
            let tokens = lines.tokens("basis coefficients")?;
            if tokens.len() != n_monomer + D + 1 {
                return Err(lines.error(ParseErrorKind::FieldCount {
                    expected: n_monomer + D + 1,
                    found: tokens.len(),
                }));
            }
            let values: Vec<f64> = lines.parse_all(&tokens[..n_monomer])?;
            let indices: Vec<i32> = lines.parse_all(&tokens[n_monomer..n_monomer + D])?;
            let size: usize = lines.parse(&tokens[n_monomer + D])?;
            let mut wave: IntVec<D> = [0; D];
            wave.copy_from_slice(&indices);

            let star = basis.star(basis.wave_by_indices(&wave)?.star_id)?;
            if star.size != size {
                return Err(lines.error(ParseErrorKind::Invalid(format!(
                    "star of wave {wave:?} has {} waves, file says {size}",
                    star.size
                ))));
            }
            let Some(basis_id) = star.basis_id else {
                warn!(wave = ?wave, "Skipping entry for a cancelled star.");
                skipped += 1;
                continue;
            };
            for (field, value) in fields.iter_mut().zip(values) {
                field[basis_id] = value;
            }
        }
        debug!(
            entries = n_entries,
            skipped,
            line = lines.line_number(),
            "Read symmetry-adapted field."
        );
        *domain = staged;
        Ok((header, fields))
    }

    fn write_to(
        domain: &Domain<D>,
        data: &Self::Data,
        writer: &mut impl Write,
    ) -> Result<(), FieldIoError> {
        let basis = domain.basis();
        for field in data {
            if field.len() != basis.n_basis() {
                return Err(BasisError::LengthMismatch {
                    what: "basis components",
                    expected: basis.n_basis(),
                    found: field.len(),
                }
                .into());
            }
        }
        FieldHeader::for_domain(domain, data.len())?.write(writer)?;
        writeln!(writer, "N_basis")?;
        writeln!(writer, "{:>11}", basis.n_basis())?;
        for star in basis.stars() {
            let Some(basis_id) = star.basis_id else {
                continue;
            };
            for field in data {
                write!(writer, "{:>21.12e}", field[basis_id])?;
            }
            write!(writer, "   ")?;
            for index in star.wave_bz {
                write!(writer, "{index:>5}")?;
            }
            writeln!(writer, "{:>6}", star.size)?;
        }
        Ok(())
    }
}
