//! Body classification and interest scoring for `Scan` events.

mod body;
mod interest;

pub use body::{
    classify, AtmosphereComponent, BeltScan, Body, BodyKind, BodyRegistry, Parent, PlanetScan,
    Ring, ScanEvent, StarScan, SurfaceMaterial, SOLAR_RADIUS_KM,
};
pub use interest::evaluate;
