//! Star class and luminosity description tables.

/// Spectral class groupings, broad-to-specific as the game reports them.
const STAR_CLASSES: &[(&str, &[&str])] = &[
    (
        "Main sequence",
        &["O", "B", "A", "F", "G", "K", "M", "L", "T", "Y"],
    ),
    ("Proto star", &["TTS", "AeBe"]),
    ("Wolf-Rayet", &["W", "WN", "WNC", "WC", "WO"]),
    ("Carbon star", &["CS", "C", "CN", "CJ", "CH", "CHd"]),
    (
        "White dwarf",
        &[
            "D", "DA", "DAB", "DAO", "DAZ", "DAV", "DB", "DBZ", "DBV", "DO", "DOV", "DQ", "DC",
            "DCV", "DX",
        ],
    ),
    ("Neutron", &["N"]),
    ("Black hole", &["H"]),
    ("Exotic", &["X"]),
];

/// Yerkes luminosity class groupings.
const LUMINOSITY_CLASSES: &[(&str, &[&str])] = &[
    ("Super-supergiants", &["0", "0Ia", "Ia0"]),
    ("Supergiants", &["Ia", "Iab", "Ib"]),
    ("Bright giants", &["IIa", "IIab", "IIb"]),
    ("Giants", &["IIIa", "IIIab", "IIIb"]),
    ("Subgiants", &["IVa", "IVab", "IVb"]),
    ("Main sequence stars", &["Va", "Vab", "Vb"]),
    ("Subdwarfs", &["VI"]),
    ("White dwarf", &["VIII"]),
];

fn lookup(table: &'static [(&str, &[&str])], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, members)| members.contains(&key))
        .map(|(description, _)| *description)
}

/// Human description of a spectral class, e.g. `G` → `Main sequence`.
#[must_use]
pub fn star_class_description(star_class: &str) -> Option<&'static str> {
    lookup(STAR_CLASSES, star_class)
}

/// Human description of a luminosity class, e.g. `Va` → `Main sequence stars`.
#[must_use]
pub fn luminosity_description(luminosity: &str) -> Option<&'static str> {
    lookup(LUMINOSITY_CLASSES, luminosity)
}
