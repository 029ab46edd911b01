use phf::{Map, phf_map};

// Generators in Jones notation, separated by ';'. The identity is implied.

static GROUPS_1D: Map<&'static str, &'static str> = phf_map! {
    "1" => "",
    "-1" => "-x",
};

static GROUPS_2D: Map<&'static str, &'static str> = phf_map! {
    "p 1" => "",
    "p 2" => "-x,-y",
    "p m" => "-x,y",
    "p g" => "-x,y+1/2",
    "c m" => "-x,y;x+1/2,y+1/2",
    "p 2 m m" => "-x,-y;-x,y",
    "p 2 m g" => "-x,-y;-x+1/2,y",
    "p 2 g g" => "-x,-y;-x+1/2,y+1/2",
    "c 2 m m" => "-x,-y;-x,y;x+1/2,y+1/2",
    "p 4" => "-y,x",
    "p 4 m m" => "-y,x;-x,y",
    "p 4 g m" => "-y,x;-x+1/2,y+1/2",
    "p 3" => "-y,x-y",
    "p 3 m 1" => "-y,x-y;-y,-x",
    "p 3 1 m" => "-y,x-y;y,x",
    "p 6" => "-y,x-y;-x,-y",
    "p 6 m m" => "-y,x-y;-x,-y;-y,-x",
};

static GROUPS_3D: Map<&'static str, &'static str> = phf_map! {
    "P 1" => "",
    "P -1" => "-x,-y,-z",
    "P 1 2 1" => "-x,y,-z",
    "P 1 21 1" => "-x,y+1/2,-z",
    "P 1 21/c 1" => "-x,y+1/2,-z+1/2;-x,-y,-z",
    "P 21 21 21" => "-x+1/2,-y,z+1/2;-x,y+1/2,-z+1/2",
    "P m m m" => "-x,-y,z;-x,y,-z;-x,-y,-z",
    "P 4/m m m" => "-x,-y,z;-y,x,z;-x,y,-z;-x,-y,-z",
    "P 6/m m m" => "-y,x-y,z;-x,-y,z;y,x,-z;-x,-y,-z",
    "P m -3 m" => "-x,-y,z;-x,y,-z;z,x,y;y,x,-z;-x,-y,-z",
    "I m -3 m" => "-x,-y,z;-x,y,-z;z,x,y;y,x,-z;-x,-y,-z;x+1/2,y+1/2,z+1/2",
    "F m -3 m" => "-x,-y,z;-x,y,-z;z,x,y;y,x,-z;-x,-y,-z;x,y+1/2,z+1/2;x+1/2,y,z+1/2",
    "I a -3 d" => "-x+1/2,-y,z+1/2;-x,y+1/2,-z+1/2;z,x,y;y+3/4,x+1/4,-z+1/4;-x,-y,-z;x+1/2,y+1/2,z+1/2",
};

fn table(dimension: usize) -> Option<&'static Map<&'static str, &'static str>> {
    match dimension {
        1 => Some(&GROUPS_1D),
        2 => Some(&GROUPS_2D),
        3 => Some(&GROUPS_3D),
        _ => None,
    }
}

/// Canonical form of a group name: underscores become spaces and runs of
/// whitespace collapse to one space.
pub fn normalize_group_name(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn generators(dimension: usize, normalized: &str) -> Option<&'static str> {
    table(dimension)?.get(normalized).copied()
}

/// Names of all built-in groups of a dimension, sorted.
pub fn group_names(dimension: usize) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = table(dimension)
        .map(|map| map.keys().copied().collect())
        .unwrap_or_default();
    names.sort_unstable();
    names
}
