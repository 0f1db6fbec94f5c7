//! Typed body records and the scan classifier.
//!
//! A `Scan` journal event is a heterogeneous, partially-populated record.
//! [`classify`] turns it into exactly one [`Body`] variant using
//! discriminating fields; the ordering is load-bearing (a moon is a planet
//! orbiting a planet, so the parent check must precede the mass check).

use std::collections::HashMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Metres per kilometre, for journal distance fields.
const KM: f64 = 1000.0;
/// Surface gravity conversion from the journal's m/s² to g.
const GRAVITY_G: f64 = 10.0;
/// Solar radius in km, for star rendering.
pub const SOLAR_RADIUS_KM: f64 = 695_508.0;

/// One step of a body's parent chain, nearest parent first.
///
/// The journal writes these as one-entry maps (`{"Planet": 3}`); the key is
/// the parent's type and the value its body id. A `"Null"` kind marks a
/// barycentre, i.e. membership in a binary pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub kind: String,
    pub body_id: i64,
}

impl<'de> Deserialize<'de> for Parent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, i64>::deserialize(deserializer)?;
        let (kind, body_id) = map
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("empty parent entry"))?;
        Ok(Self { kind, body_id })
    }
}

/// A planetary or stellar ring, radii in metres as the journal writes them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ring {
    pub name: String,
    pub ring_class: String,
    #[serde(rename = "MassMT", default)]
    pub mass_mt: Option<f64>,
    pub inner_rad: f64,
    pub outer_rad: f64,
}

/// One component of an atmosphere, percent by volume.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AtmosphereComponent {
    pub name: String,
    pub percent: f64,
}

/// One prospectable surface material, percent by occurrence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurfaceMaterial {
    pub name: String,
    pub percent: f64,
}

/// Raw `Scan` event payload, deserialized with journal field names.
///
/// Everything the game may omit is optional or defaulted; only the body
/// name and id are required to make the record keyable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScanEvent {
    pub body_name: String,
    #[serde(rename = "BodyID")]
    pub body_id: i64,
    #[serde(default)]
    pub star_system: Option<String>,
    #[serde(default)]
    pub scan_type: Option<String>,
    #[serde(default)]
    pub parents: Vec<Parent>,

    // Star fields.
    #[serde(default)]
    pub star_type: Option<String>,
    #[serde(default)]
    pub subclass: Option<i64>,
    #[serde(default)]
    pub stellar_mass: Option<f64>,
    #[serde(default)]
    pub absolute_magnitude: Option<f64>,
    #[serde(rename = "Age_MY", default)]
    pub age_my: Option<i64>,
    #[serde(default)]
    pub luminosity: Option<String>,

    // Planet fields.
    #[serde(default)]
    pub planet_class: Option<String>,
    #[serde(rename = "MassEM", default)]
    pub mass_em: Option<f64>,
    #[serde(default)]
    pub surface_gravity: Option<f64>,
    #[serde(default)]
    pub surface_pressure: Option<f64>,
    #[serde(default)]
    pub tidal_lock: bool,
    #[serde(default)]
    pub terraform_state: Option<String>,
    #[serde(default)]
    pub atmosphere: Option<String>,
    #[serde(default)]
    pub atmosphere_composition: Vec<AtmosphereComponent>,
    #[serde(default)]
    pub volcanism: Option<String>,
    #[serde(default)]
    pub landable: bool,
    #[serde(default)]
    pub materials: Vec<SurfaceMaterial>,
    #[serde(default)]
    pub composition: HashMap<String, f64>,

    // Orbital and shared physical fields.
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub surface_temperature: Option<f64>,
    #[serde(default)]
    pub rotation_period: Option<f64>,
    #[serde(default)]
    pub orbital_period: Option<f64>,
    #[serde(default)]
    pub axial_tilt: Option<f64>,
    #[serde(default)]
    pub semi_major_axis: Option<f64>,
    #[serde(default)]
    pub eccentricity: Option<f64>,
    #[serde(default)]
    pub orbital_inclination: Option<f64>,
    #[serde(default)]
    pub rings: Vec<Ring>,
    #[serde(default)]
    pub reserve_level: Option<String>,

    #[serde(default)]
    pub was_discovered: Option<bool>,
    #[serde(default)]
    pub was_mapped: Option<bool>,
}

impl ScanEvent {
    /// Deserialize from a decoded journal record's JSON object.
    ///
    /// # Errors
    ///
    /// Returns the serde error if required fields (body name/id) are
    /// missing or types mismatch; callers treat that as unclassifiable.
    pub fn from_entry(entry: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(entry.clone()))
    }

    /// Nearest parent in the chain, if any.
    #[must_use]
    pub fn nearest_parent(&self) -> Option<&Parent> {
        self.parents.first()
    }
}

/// Which variant a scan classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    BeltCluster,
    Ring,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Star => "Star",
            Self::Planet => "Planet",
            Self::Moon => "Moon",
            Self::BeltCluster => "Belt Cluster",
            Self::Ring => "Ring",
        };
        f.write_str(label)
    }
}

/// Star scan payload, distances in km.
#[derive(Debug, Clone)]
pub struct StarScan {
    pub body_id: i64,
    pub body_name: String,
    pub star_system: Option<String>,
    pub parents: Vec<Parent>,
    pub star_type: Option<String>,
    pub subclass: Option<i64>,
    pub stellar_mass: Option<f64>,
    pub radius_km: Option<f64>,
    pub absolute_magnitude: Option<f64>,
    pub age_my: Option<i64>,
    pub surface_temperature: Option<f64>,
    pub luminosity: Option<String>,
    pub orbital_period: Option<f64>,
    pub rings: Vec<Ring>,
    pub was_discovered: Option<bool>,
    pub was_mapped: Option<bool>,
}

impl StarScan {
    fn from_scan(scan: &ScanEvent) -> Self {
        Self {
            body_id: scan.body_id,
            body_name: scan.body_name.clone(),
            star_system: scan.star_system.clone(),
            parents: scan.parents.clone(),
            star_type: scan.star_type.clone(),
            subclass: scan.subclass,
            stellar_mass: scan.stellar_mass,
            radius_km: scan.radius.map(|r| r / KM),
            absolute_magnitude: scan.absolute_magnitude,
            age_my: scan.age_my,
            surface_temperature: scan.surface_temperature,
            luminosity: scan.luminosity.clone(),
            orbital_period: scan.orbital_period,
            rings: scan.rings.clone(),
            was_discovered: scan.was_discovered,
            was_mapped: scan.was_mapped,
        }
    }

    /// Radius in solar radii, for display.
    #[must_use]
    pub fn solar_radius(&self) -> Option<f64> {
        self.radius_km.map(|r| r / SOLAR_RADIUS_KM)
    }

    fn refine(mut self, old: &Self) -> Self {
        self.star_system = self.star_system.or_else(|| old.star_system.clone());
        self.star_type = self.star_type.or_else(|| old.star_type.clone());
        self.subclass = self.subclass.or(old.subclass);
        self.stellar_mass = self.stellar_mass.or(old.stellar_mass);
        self.radius_km = self.radius_km.or(old.radius_km);
        self.absolute_magnitude = self.absolute_magnitude.or(old.absolute_magnitude);
        self.age_my = self.age_my.or(old.age_my);
        self.surface_temperature = self.surface_temperature.or(old.surface_temperature);
        self.luminosity = self.luminosity.or_else(|| old.luminosity.clone());
        self.orbital_period = self.orbital_period.or(old.orbital_period);
        if self.parents.is_empty() {
            self.parents = old.parents.clone();
        }
        if self.rings.is_empty() {
            self.rings = old.rings.clone();
        }
        self.was_discovered = self.was_discovered.or(old.was_discovered);
        self.was_mapped = self.was_mapped.or(old.was_mapped);
        self
    }
}

/// Planet (or moon) scan payload, distances in km, gravity in g.
#[derive(Debug, Clone)]
pub struct PlanetScan {
    pub body_id: i64,
    pub body_name: String,
    pub star_system: Option<String>,
    pub parents: Vec<Parent>,
    pub planet_class: Option<String>,
    pub mass_em: Option<f64>,
    pub radius_km: Option<f64>,
    pub surface_gravity: Option<f64>,
    pub rotation_period: Option<f64>,
    pub orbital_period: Option<f64>,
    pub axial_tilt: Option<f64>,
    pub semi_major_axis_km: Option<f64>,
    pub eccentricity: Option<f64>,
    pub orbital_inclination: Option<f64>,
    pub tidal_lock: bool,
    pub terraform_state: Option<String>,
    pub atmosphere: Option<String>,
    pub atmosphere_composition: Vec<AtmosphereComponent>,
    pub volcanism: Option<String>,
    pub surface_temperature: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub landable: bool,
    pub materials: Vec<SurfaceMaterial>,
    pub composition: HashMap<String, f64>,
    pub rings: Vec<Ring>,
    pub was_discovered: Option<bool>,
    pub was_mapped: Option<bool>,
}

impl PlanetScan {
    fn from_scan(scan: &ScanEvent) -> Self {
        Self {
            body_id: scan.body_id,
            body_name: scan.body_name.clone(),
            star_system: scan.star_system.clone(),
            parents: scan.parents.clone(),
            planet_class: scan.planet_class.clone(),
            mass_em: scan.mass_em,
            radius_km: scan.radius.map(|r| r / KM),
            surface_gravity: scan.surface_gravity.map(|g| g / GRAVITY_G),
            rotation_period: scan.rotation_period,
            orbital_period: scan.orbital_period,
            axial_tilt: scan.axial_tilt,
            semi_major_axis_km: scan.semi_major_axis.map(|a| a / KM),
            eccentricity: scan.eccentricity,
            orbital_inclination: scan.orbital_inclination,
            tidal_lock: scan.tidal_lock,
            terraform_state: scan
                .terraform_state
                .clone()
                .filter(|state| !state.is_empty()),
            atmosphere: scan.atmosphere.clone().filter(|a| !a.is_empty()),
            atmosphere_composition: scan.atmosphere_composition.clone(),
            volcanism: scan.volcanism.clone().filter(|v| !v.is_empty()),
            surface_temperature: scan.surface_temperature,
            surface_pressure: scan.surface_pressure,
            landable: scan.landable,
            materials: scan.materials.clone(),
            composition: scan.composition.clone(),
            rings: scan.rings.clone(),
            was_discovered: scan.was_discovered,
            was_mapped: scan.was_mapped,
        }
    }

    /// Radius in Earth radii, for display.
    #[must_use]
    pub fn earth_radius(&self) -> Option<f64> {
        self.radius_km.map(|r| r / 6371.0)
    }

    fn refine(mut self, old: &Self) -> Self {
        self.star_system = self.star_system.or_else(|| old.star_system.clone());
        self.planet_class = self.planet_class.or_else(|| old.planet_class.clone());
        self.mass_em = self.mass_em.or(old.mass_em);
        self.radius_km = self.radius_km.or(old.radius_km);
        self.surface_gravity = self.surface_gravity.or(old.surface_gravity);
        self.rotation_period = self.rotation_period.or(old.rotation_period);
        self.orbital_period = self.orbital_period.or(old.orbital_period);
        self.axial_tilt = self.axial_tilt.or(old.axial_tilt);
        self.semi_major_axis_km = self.semi_major_axis_km.or(old.semi_major_axis_km);
        self.eccentricity = self.eccentricity.or(old.eccentricity);
        self.orbital_inclination = self.orbital_inclination.or(old.orbital_inclination);
        self.terraform_state = self.terraform_state.or_else(|| old.terraform_state.clone());
        self.atmosphere = self.atmosphere.or_else(|| old.atmosphere.clone());
        if self.atmosphere_composition.is_empty() {
            self.atmosphere_composition = old.atmosphere_composition.clone();
        }
        self.volcanism = self.volcanism.or_else(|| old.volcanism.clone());
        self.surface_temperature = self.surface_temperature.or(old.surface_temperature);
        self.surface_pressure = self.surface_pressure.or(old.surface_pressure);
        if self.materials.is_empty() {
            self.materials = old.materials.clone();
        }
        if self.composition.is_empty() {
            self.composition = old.composition.clone();
        }
        if self.parents.is_empty() {
            self.parents = old.parents.clone();
        }
        if self.rings.is_empty() {
            self.rings = old.rings.clone();
        }
        self.was_discovered = self.was_discovered.or(old.was_discovered);
        self.was_mapped = self.was_mapped.or(old.was_mapped);
        self
    }
}

/// Belt cluster / ring scan payload: name and provenance only.
#[derive(Debug, Clone)]
pub struct BeltScan {
    pub body_id: i64,
    pub body_name: String,
    pub star_system: Option<String>,
    pub parents: Vec<Parent>,
    pub was_discovered: Option<bool>,
    pub was_mapped: Option<bool>,
}

impl BeltScan {
    fn from_scan(scan: &ScanEvent) -> Self {
        Self {
            body_id: scan.body_id,
            body_name: scan.body_name.clone(),
            star_system: scan.star_system.clone(),
            parents: scan.parents.clone(),
            was_discovered: scan.was_discovered,
            was_mapped: scan.was_mapped,
        }
    }

    fn refine(mut self, old: &Self) -> Self {
        self.star_system = self.star_system.or_else(|| old.star_system.clone());
        if self.parents.is_empty() {
            self.parents = old.parents.clone();
        }
        self.was_discovered = self.was_discovered.or(old.was_discovered);
        self.was_mapped = self.was_mapped.or(old.was_mapped);
        self
    }
}

/// A classified body. Moons carry the planet payload plus the variant tag;
/// rings share the belt-cluster payload.
#[derive(Debug, Clone)]
pub enum Body {
    Star(StarScan),
    Planet(PlanetScan),
    Moon(PlanetScan),
    BeltCluster(BeltScan),
    Ring(BeltScan),
}

impl Body {
    #[must_use]
    pub fn kind(&self) -> BodyKind {
        match self {
            Self::Star(_) => BodyKind::Star,
            Self::Planet(_) => BodyKind::Planet,
            Self::Moon(_) => BodyKind::Moon,
            Self::BeltCluster(_) => BodyKind::BeltCluster,
            Self::Ring(_) => BodyKind::Ring,
        }
    }

    #[must_use]
    pub fn body_id(&self) -> i64 {
        match self {
            Self::Star(s) => s.body_id,
            Self::Planet(p) | Self::Moon(p) => p.body_id,
            Self::BeltCluster(b) | Self::Ring(b) => b.body_id,
        }
    }

    #[must_use]
    pub fn body_name(&self) -> &str {
        match self {
            Self::Star(s) => &s.body_name,
            Self::Planet(p) | Self::Moon(p) => &p.body_name,
            Self::BeltCluster(b) | Self::Ring(b) => &b.body_name,
        }
    }

    #[must_use]
    pub fn star_system(&self) -> Option<&str> {
        match self {
            Self::Star(s) => s.star_system.as_deref(),
            Self::Planet(p) | Self::Moon(p) => p.star_system.as_deref(),
            Self::BeltCluster(b) | Self::Ring(b) => b.star_system.as_deref(),
        }
    }

    #[must_use]
    pub fn parents(&self) -> &[Parent] {
        match self {
            Self::Star(s) => &s.parents,
            Self::Planet(p) | Self::Moon(p) => &p.parents,
            Self::BeltCluster(b) | Self::Ring(b) => &b.parents,
        }
    }

    #[must_use]
    pub fn radius_km(&self) -> Option<f64> {
        match self {
            Self::Star(s) => s.radius_km,
            Self::Planet(p) | Self::Moon(p) => p.radius_km,
            Self::BeltCluster(_) | Self::Ring(_) => None,
        }
    }

    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        match self {
            Self::Star(s) => &s.rings,
            Self::Planet(p) | Self::Moon(p) => &p.rings,
            Self::BeltCluster(_) | Self::Ring(_) => &[],
        }
    }

    #[must_use]
    pub fn orbital_inclination(&self) -> Option<f64> {
        match self {
            Self::Planet(p) | Self::Moon(p) => p.orbital_inclination,
            Self::Star(_) | Self::BeltCluster(_) | Self::Ring(_) => None,
        }
    }

    /// Planet payload, for Planet and Moon variants.
    #[must_use]
    pub fn as_planet(&self) -> Option<&PlanetScan> {
        match self {
            Self::Planet(p) | Self::Moon(p) => Some(p),
            Self::Star(_) | Self::BeltCluster(_) | Self::Ring(_) => None,
        }
    }

    /// Merge a re-scan of the same body into this record: fields the new
    /// scan omits keep their previously known values, so entries refine and
    /// never regress.
    fn refine(self, old: &Self) -> Self {
        match (self, old) {
            (Self::Star(new), Self::Star(old)) => Self::Star(new.refine(old)),
            (Self::Planet(new), Self::Planet(old) | Self::Moon(old)) => {
                Self::Planet(new.refine(old))
            }
            (Self::Moon(new), Self::Planet(old) | Self::Moon(old)) => Self::Moon(new.refine(old)),
            (Self::BeltCluster(new), Self::BeltCluster(old) | Self::Ring(old)) => {
                Self::BeltCluster(new.refine(old))
            }
            (Self::Ring(new), Self::BeltCluster(old) | Self::Ring(old)) => {
                Self::Ring(new.refine(old))
            }
            // Variant changed between scans; trust the newer classification.
            (new, _) => new,
        }
    }
}

/// Classify a scan into exactly one body variant.
///
/// First match wins: star type, belt-cluster name, ring name, planet
/// parent (moon), Earth-mass field (planet). `None` means unclassifiable:
/// no interest evaluation is possible, but it is not an error.
#[must_use]
pub fn classify(scan: &ScanEvent) -> Option<Body> {
    if scan.star_type.is_some() {
        return Some(Body::Star(StarScan::from_scan(scan)));
    }
    if scan.body_name.contains("Belt Cluster") {
        return Some(Body::BeltCluster(BeltScan::from_scan(scan)));
    }
    if scan.body_name.contains("Ring") {
        return Some(Body::Ring(BeltScan::from_scan(scan)));
    }
    if scan.nearest_parent().is_some_and(|p| p.kind == "Planet") {
        return Some(Body::Moon(PlanetScan::from_scan(scan)));
    }
    if scan.mass_em.is_some() {
        return Some(Body::Planet(PlanetScan::from_scan(scan)));
    }
    None
}

/// All classified bodies of the session, keyed by (star system, body id).
///
/// Entries are never removed while the monitor runs; re-scans refine them
/// in place.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<(String, i64), Body>,
}

impl BodyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refine a classified body; returns a reference to the
    /// stored record.
    pub fn upsert(&mut self, star_system: &str, body: Body) -> &Body {
        use std::collections::hash_map::Entry;

        let key = (star_system.to_string(), body.body_id());
        match self.bodies.entry(key) {
            Entry::Occupied(mut occupied) => {
                let merged = body.refine(occupied.get());
                *occupied.get_mut() = merged;
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(body),
        }
    }

    #[must_use]
    pub fn get(&self, star_system: &str, body_id: i64) -> Option<&Body> {
        self.bodies.get(&(star_system.to_string(), body_id))
    }

    /// All bodies recorded for one star system.
    pub fn system_bodies<'a>(
        &'a self,
        star_system: &'a str,
    ) -> impl Iterator<Item = &'a Body> + 'a {
        self.bodies
            .iter()
            .filter(move |((system, _), _)| system == star_system)
            .map(|(_, body)| body)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
