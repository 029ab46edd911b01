use super::error::FieldIoError;
use super::header::FieldHeader;
use crate::engine::domain::Domain;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing field file formats.
///
/// Readers take the domain mutably: the cell parameters stored in the file
/// header are applied to it before the field data is interpreted.
pub trait FieldFile<const D: usize> {
    /// In-memory representation of the fields of all monomer species.
    type Data;

    /// Reads a header and fields from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, the header is inconsistent with the
    /// domain, or I/O operations encounter issues.
    fn read_from(
        reader: &mut impl BufRead,
        domain: &mut Domain<D>,
    ) -> Result<(FieldHeader, Self::Data), FieldIoError>;

    /// Writes a header describing `domain`, then the fields.
    fn write_to(
        domain: &Domain<D>,
        data: &Self::Data,
        writer: &mut impl Write,
    ) -> Result<(), FieldIoError>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
        domain: &mut Domain<D>,
    ) -> Result<(FieldHeader, Self::Data), FieldIoError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, domain)
    }

    fn write_to_path<P: AsRef<Path>>(
        domain: &Domain<D>,
        data: &Self::Data,
        path: P,
    ) -> Result<(), FieldIoError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(domain, data, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
