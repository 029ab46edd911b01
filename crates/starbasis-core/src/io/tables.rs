use super::error::FieldIoError;
use crate::engine::basis::Basis;
use std::io::Write;

const AXES: [&str; 3] = ["x", "y", "z"];

/// Writes one CSV row per star.
pub fn write_star_table<const D: usize, W: Write>(
    basis: &Basis<D>,
    writer: W,
) -> Result<(), FieldIoError> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = [
        "star", "size", "begin", "end", "invert", "sign", "cancel", "basis", "sq_norm",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(AXES[..D].iter().map(|axis| format!("k_{axis}")));
    csv.write_record(&header)?;

    for (id, star) in basis.stars().iter().enumerate() {
        let sq_norm = basis.wave(star.characteristic_id())?.sq_norm;
        let mut record = vec![
            id.to_string(),
            star.size.to_string(),
            star.begin_id.to_string(),
            star.end_id.to_string(),
            star.invert_flag.to_string(),
            star.sign_flag.to_string(),
            star.cancel.to_string(),
            star.basis_id.map_or_else(String::new, |b| b.to_string()),
            format!("{sq_norm:.12e}"),
        ];
        record.extend(star.wave_bz.iter().map(i32::to_string));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes one CSV row per wave.
pub fn write_wave_table<const D: usize, W: Write>(
    basis: &Basis<D>,
    writer: W,
) -> Result<(), FieldIoError> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = ["wave", "star", "implicit", "sq_norm", "coeff_re", "coeff_im"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(AXES[..D].iter().map(|axis| format!("dft_{axis}")));
    header.extend(AXES[..D].iter().map(|axis| format!("bz_{axis}")));
    csv.write_record(&header)?;

    for (id, wave) in basis.waves().iter().enumerate() {
        let mut record = vec![
            id.to_string(),
            wave.star_id.to_string(),
            wave.implicit.to_string(),
            format!("{:.12e}", wave.sq_norm),
            format!("{:.12e}", wave.coeff.re),
            format!("{:.12e}", wave.coeff.im),
        ];
        record.extend(wave.indices_dft.iter().map(i32::to_string));
        record.extend(wave.indices_bz.iter().map(i32::to_string));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
