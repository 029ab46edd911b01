use super::error::CrystalError;
use crate::core::IntVec;
use std::fmt;

const TRANSLATION_EPSILON: f64 = 1.0e-8;
const AXES: [char; 3] = ['x', 'y', 'z'];

/// A crystallographic symmetry operation `r -> R r + t`.
///
/// `R` is an integer matrix in the basis of the Bravais vectors and `t` a
/// fractional translation, reduced into `[0, 1)`. The operation acts on a
/// reciprocal wavevector from the right, `G -> G R`, and carries the phase
/// `exp(2πi G·t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceSymmetry<const D: usize> {
    rotation: [[i32; D]; D],
    translation: [f64; D],
}

impl<const D: usize> SpaceSymmetry<D> {
    pub fn new(rotation: [[i32; D]; D], translation: [f64; D]) -> Self {
        Self {
            rotation,
            translation: translation.map(reduce_translation),
        }
    }

    pub fn identity() -> Self {
        let mut rotation = [[0; D]; D];
        for (i, row) in rotation.iter_mut().enumerate() {
            row[i] = 1;
        }
        Self::new(rotation, [0.0; D])
    }

    pub fn inversion() -> Self {
        let mut rotation = [[0; D]; D];
        for (i, row) in rotation.iter_mut().enumerate() {
            row[i] = -1;
        }
        Self::new(rotation, [0.0; D])
    }

    pub fn rotation(&self) -> &[[i32; D]; D] {
        &self.rotation
    }

    pub fn translation(&self) -> &[f64; D] {
        &self.translation
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::identity())
    }

    /// True if the rotational part is `-I`, whatever the translation.
    pub fn is_inversion(&self) -> bool {
        self.rotation == Self::inversion().rotation
    }

    /// Composition `self ∘ other`: applies `other` first.
    pub fn compose(&self, other: &Self) -> Self {
        let mut rotation = [[0; D]; D];
        let mut translation = self.translation;
        for i in 0..D {
            for j in 0..D {
                for k in 0..D {
                    rotation[i][j] += self.rotation[i][k] * other.rotation[k][j];
                }
                translation[i] += f64::from(self.rotation[i][j]) * other.translation[j];
            }
        }
        Self::new(rotation, translation)
    }

    /// Image `G R` of a reciprocal wavevector.
    pub fn apply_to_wave(&self, wave: &IntVec<D>) -> IntVec<D> {
        let mut image = [0; D];
        for (j, value) in image.iter_mut().enumerate() {
            *value = (0..D).map(|i| wave[i] * self.rotation[i][j]).sum();
        }
        image
    }

    /// Phase `G·t` in units of full turns.
    pub fn phase_fraction(&self, wave: &IntVec<D>) -> f64 {
        wave.iter()
            .zip(self.translation.iter())
            .map(|(&g, &t)| f64::from(g) * t)
            .sum()
    }

    /// Equality up to lattice translations.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.rotation == other.rotation
            && self
                .translation
                .iter()
                .zip(other.translation.iter())
                .all(|(a, b)| {
                    let d = (a - b).rem_euclid(1.0);
                    d.min(1.0 - d) < TRANSLATION_EPSILON
                })
    }

    /// Parses a Jones-faithful representation such as `"-x+1/2,y,-z+1/4"`.
    pub fn from_jones(text: &str) -> Result<Self, CrystalError> {
        let invalid = |reason: String| CrystalError::InvalidSymmetry {
            text: text.to_string(),
            reason,
        };
        let components: Vec<&str> = text.split(',').map(str::trim).collect();
        if components.len() != D {
            return Err(invalid(format!(
                "expected {D} component(s), found {}",
                components.len()
            )));
        }
        let mut rotation = [[0; D]; D];
        let mut translation = [0.0; D];
        for (i, component) in components.iter().enumerate() {
            parse_component(component, &mut rotation[i], &mut translation[i]).map_err(invalid)?;
        }
        Ok(Self::new(rotation, translation))
    }
}

fn reduce_translation(value: f64) -> f64 {
    let reduced = value.rem_euclid(1.0);
    if reduced < TRANSLATION_EPSILON || 1.0 - reduced < TRANSLATION_EPSILON {
        0.0
    } else {
        reduced
    }
}

fn parse_component<const D: usize>(
    component: &str,
    row: &mut [i32; D],
    translation: &mut f64,
) -> Result<(), String> {
    let chars: Vec<char> = component.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err("empty component".to_string());
    }
    let mut pos = 0;
    while pos < chars.len() {
        let mut sign = 1;
        match chars[pos] {
            '+' => pos += 1,
            '-' => {
                sign = -1;
                pos += 1;
            }
            _ => {}
        }
        let Some(&c) = chars.get(pos) else {
            return Err("dangling sign".to_string());
        };
        if let Some(axis) = AXES[..D].iter().position(|&a| a == c.to_ascii_lowercase()) {
            row[axis] += sign;
            pos += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || matches!(chars[pos], '.' | '/')) {
                pos += 1;
            }
            let literal: String = chars[start..pos].iter().collect();
            *translation += f64::from(sign) * parse_fraction(&literal)?;
        } else {
            return Err(format!("unexpected character '{c}'"));
        }
    }
    Ok(())
}

fn parse_fraction(literal: &str) -> Result<f64, String> {
    let parse = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| format!("invalid number '{literal}'"))
    };
    match literal.split_once('/') {
        Some((numerator, denominator)) => {
            let denominator = parse(denominator)?;
            if denominator == 0.0 {
                return Err(format!("zero denominator in '{literal}'"));
            }
            Ok(parse(numerator)? / denominator)
        }
        None => parse(literal),
    }
}

fn format_fraction(value: f64) -> String {
    for denominator in [1_u32, 2, 3, 4, 6, 8, 12, 24] {
        let scaled = value * f64::from(denominator);
        if (scaled - scaled.round()).abs() < 1.0e-6 {
            let numerator = scaled.round() as i64;
            return if denominator == 1 {
                numerator.to_string()
            } else {
                format!("{numerator}/{denominator}")
            };
        }
    }
    format!("{value}")
}

impl<const D: usize> fmt::Display for SpaceSymmetry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: Vec<String> = (0..D)
            .map(|i| {
                let mut out = String::new();
                for (j, &coefficient) in self.rotation[i].iter().enumerate() {
                    let axis = AXES[j];
                    match coefficient {
                        0 => {}
                        1 => out.push_str(&format!("+{axis}")),
                        -1 => out.push_str(&format!("-{axis}")),
                        n => out.push_str(&format!("{n:+}{axis}")),
                    }
                }
                if self.translation[i] != 0.0 {
                    out.push('+');
                    out.push_str(&format_fraction(self.translation[i]));
                }
                let trimmed = out.strip_prefix('+').unwrap_or(&out);
                if trimmed.is_empty() {
                    "0".to_string()
                } else {
                    trimmed.to_string()
                }
            })
            .collect();
        f.write_str(&components.join(","))
    }
}
