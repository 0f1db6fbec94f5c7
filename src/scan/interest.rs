//! Interest heuristics over classified bodies.
//!
//! Each rule is independent, needs only the body and the per-system body
//! table, and contributes at most one label per classification. A body
//! missing an attribute a rule needs simply fails that rule.

use super::body::{Body, BodyKind, BodyRegistry};

/// Rotation/orbital period threshold for the "fast" rules, in seconds.
const FAST_PERIOD_SECS: f64 = 28_800.0;

/// Evaluate all interest rules for a classified body.
///
/// Only Planet and Moon variants produce labels; everything else returns an
/// empty list. `star_system` is the resolved system the body was scanned
/// in, used for parent and sibling lookups in the registry.
#[must_use]
pub fn evaluate(body: &Body, star_system: &str, registry: &BodyRegistry) -> Vec<String> {
    let Some(planet) = body.as_planet() else {
        return Vec::new();
    };

    let mut labels = Vec::new();
    let radius = planet.radius_km;

    if planet.landable && planet.surface_gravity.is_some_and(|g| g > 2.0) {
        labels.push("Landable with high gravity".to_string());
    }

    if planet.landable && radius.is_some_and(|r| r > 18_000.0) {
        labels.push("Landable large planet".to_string());
    }

    if planet.landable && !planet.rings.is_empty() {
        labels.push("Ringed landable body".to_string());
    }

    if planet.landable {
        if let Some(state) = &planet.terraform_state {
            labels.push(format!("Landable and {state}"));
        }
    }

    if radius.is_some_and(|r| r < 300.0) {
        labels.push("Small body".to_string());
    }

    // A "Null" nearest parent is a barycentre: the body is one half of a
    // binary pair.
    if let (Some(parent), Some(radius), Some(sma)) =
        (planet.parents.first(), radius, planet.semi_major_axis_km)
    {
        if parent.kind == "Null" && sma > 0.0 && radius / sma > 0.4 {
            let barycentre = parent.body_id;
            // TODO: the partner lookup below does not gate the label;
            // decide whether a scanned partner should be required before
            // this fires, and fold the partner's name into the label if so.
            let partner = registry.system_bodies(star_system).find(|other| {
                other.body_id() != planet.body_id
                    && other
                        .parents()
                        .first()
                        .is_some_and(|p| p.kind == "Null" && p.body_id == barycentre)
            });
            tracing::debug!(
                body = %planet.body_name,
                partner = ?partner.map(Body::body_name),
                "Binary partner lookup"
            );
            labels.push("Close binary relative to body size.".to_string());
        }
    }

    if !planet.tidal_lock
        && planet
            .rotation_period
            .is_some_and(|p| p != 0.0 && p.abs() < FAST_PERIOD_SECS)
    {
        labels.push("Non-locked body with fast rotation".to_string());
    }

    if planet
        .orbital_period
        .is_some_and(|p| p != 0.0 && p.abs() < FAST_PERIOD_SECS)
    {
        labels.push("Fast orbit".to_string());
    }

    if planet.eccentricity.is_some_and(|e| e > 0.9) {
        labels.push("Highly eccentric orbit".to_string());
    }

    if let Some(parent) = planet
        .parents
        .first()
        .filter(|p| p.kind == "Planet" || p.kind == "Star")
    {
        if let Some(parent_body) = registry.get(star_system, parent.body_id) {
            if let (Some(parent_radius), Some(sma)) =
                (parent_body.radius_km(), planet.semi_major_axis_km)
            {
                if parent_radius * 3.0 > sma {
                    labels.push("Close orbit relative to parent body size".to_string());
                }
            }

            if let (Some(radius), Some(sma)) = (radius, planet.semi_major_axis_km) {
                let mut ring_proximity = false;
                let mut inclination_mismatch = false;
                for ring in parent_body.rings() {
                    let separation = (sma - ring.outer_rad / 1000.0)
                        .abs()
                        .min((ring.inner_rad / 1000.0 - sma).abs());
                    if separation < radius * 20.0 {
                        ring_proximity = true;
                    }
                    if parent_body.kind() == BodyKind::Planet && separation < radius * 400.0 {
                        if let (Some(parent_incl), Some(body_incl)) =
                            (parent_body.orbital_inclination(), planet.orbital_inclination)
                        {
                            if (parent_incl - body_incl).abs() > 10.0 {
                                inclination_mismatch = true;
                            }
                        }
                    }
                }
                if ring_proximity {
                    labels.push("Close ring proximity".to_string());
                }
                if inclination_mismatch {
                    labels
                        .push("Close ring proximity with different orbital inclination".to_string());
                }
            }
        }
    }

    if !planet.landable && planet.atmosphere_composition.is_empty() {
        labels.push("Not landable without atmosphere".to_string());
    }

    labels
}
