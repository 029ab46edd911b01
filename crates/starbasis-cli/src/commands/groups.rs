use crate::error::Result;
use starbasis::core::crystal::{CrystalError, SpaceGroup, group_names};
use starbasis::engine::error::BasisError;

pub fn run(dimension: u8) -> Result<()> {
    for (name, order) in list_groups(dimension as usize)? {
        println!("{name:<16}{order:>6}");
    }
    Ok(())
}

fn list_groups(dimension: usize) -> Result<Vec<(&'static str, usize)>> {
    group_names(dimension)
        .into_iter()
        .map(|name| {
            let order = match dimension {
                1 => SpaceGroup::<1>::from_name(name).map(|g| g.order()),
                2 => SpaceGroup::<2>::from_name(name).map(|g| g.order()),
                _ => SpaceGroup::<3>::from_name(name).map(|g| g.order()),
            };
            order
                .map(|order| (name, order))
                .map_err(|e: CrystalError| BasisError::from(e).into())
        })
        .collect()
}
