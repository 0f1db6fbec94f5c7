//! Colored terminal rendering of tracked journal events.
//!
//! The [`Printer`] consumes records pulled from the monitor, filters them
//! to the tracked-event list, and prints a timestamp header plus a
//! per-kind detail block. `Scan` events additionally drive the classifier
//! and interest engine; `Screenshot` events drive the rename collaborator.

mod stars;

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;

use crate::journal::{JournalEvent, JournalState};
use crate::scan::{self, Body, BodyRegistry, PlanetScan, ScanEvent, StarScan};
use crate::screenshot::rename_screenshot;

pub use stars::{luminosity_description, star_class_description};

/// Events worth a terminal line; everything else is tracked in state only.
const TRACKED: &[&str] = &[
    "LoadGame",
    "Location",
    "ApproachBody",
    "LeaveBody",
    "Touchdown",
    "Liftoff",
    "FSDJump",
    "SupercruiseEntry",
    "SupercruiseExit",
    "DiscoveryScan",
    "FSSDiscoveryScan",
    "FSSAllBodiesFound",
    "FuelScoop",
    "Shutdown",
    "LaunchSRV",
    "DockSRV",
    "MaterialCollected",
    "MaterialDiscarded",
    "Docked",
    "Undocked",
    "StartJump",
    "SRVDestroyed",
    "Scan",
    "Screenshot",
    "DockFighter",
    "LaunchFighter",
    "VehicleSwitch",
    "ShipyardSwap",
    "ShipyardNew",
];

/// Fuel gauge warning threshold, percent.
const FUEL_WARNING: f64 = 50.0;
/// Fuel gauge critical threshold, percent.
const FUEL_CRITICAL: f64 = 30.0;

/// Renders tracked events and owns the per-session body table.
pub struct Printer {
    registry: BodyRegistry,
    screenshots_dir: Option<PathBuf>,
}

impl Printer {
    #[must_use]
    pub fn new(screenshots_dir: Option<PathBuf>) -> Self {
        Self {
            registry: BodyRegistry::new(),
            screenshots_dir,
        }
    }

    /// Bodies classified so far.
    #[must_use]
    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Print one pulled event, if tracked.
    pub fn handle(&mut self, event: &JournalEvent, state: &JournalState) {
        let tag = event.kind.tag();
        if !TRACKED.contains(&tag) {
            return;
        }

        let timestamp = event
            .timestamp()
            .map(format_timestamp)
            .unwrap_or_default();
        println!("{}: {}", timestamp.green(), tag.green().bold());

        if let Some(detail) = self.detail(event, state) {
            println!("{detail}");
        }
    }

    /// Detail block for one event; `None` when the header says it all.
    fn detail(&mut self, event: &JournalEvent, state: &JournalState) -> Option<String> {
        match event.kind.tag() {
            "LoadGame" => Some(load_game(event)),
            "Location" => Some(location(event)),
            "FSSDiscoveryScan" => Some(fss_discovery(event)),
            "FSSAllBodiesFound" => Some(fss_all_bodies(event)),
            "DiscoveryScan" => Some(discovery_scan(event)),
            "ApproachBody" | "LeaveBody" => Some(approach_body(event)),
            "Touchdown" | "Liftoff" => touchdown(event),
            "FSDJump" => Some(fsd_jump(event)),
            "StartJump" => start_jump(event),
            "SupercruiseEntry" => Some(supercruise_entry(event)),
            "SupercruiseExit" => Some(supercruise_exit(event)),
            "FuelScoop" => Some(fuel_scoop(event, state)),
            "MaterialCollected" => Some(material(event, "Collected")),
            "MaterialDiscarded" => Some(material(event, "Discarded")),
            "Docked" => Some(docked(event)),
            "ShipyardNew" | "ShipyardSwap" => Some(shipyard(event)),
            "Scan" => self.scan(event, state),
            "Screenshot" => Some(self.screenshot(event)),
            _ => None,
        }
    }

    /// Classify, register, score, and render a body scan.
    fn scan(&mut self, event: &JournalEvent, state: &JournalState) -> Option<String> {
        let scan = match ScanEvent::from_entry(&event.entry) {
            Ok(scan) => scan,
            Err(e) => {
                tracing::warn!(error = %e, "Unusable scan record");
                return None;
            }
        };

        let mut out = String::new();
        let scan_type = scan.scan_type.clone().unwrap_or_default();
        let _ = writeln!(out, "\t{} {}", "Scan type:".bold(), scan_type);

        let Some(body) = scan::classify(&scan) else {
            return Some(out.trim_end().to_string());
        };

        // The scan's own system wins; fall back to wherever the monitor
        // last placed us.
        let star_system = scan
            .star_system
            .clone()
            .or_else(|| state.star_system.clone())
            .unwrap_or_default();

        let body = self.registry.upsert(&star_system, body).clone();

        if matches!(scan_type.as_str(), "AutoScan" | "Detailed") {
            match &body {
                Body::Star(star) => render_star(&mut out, star),
                Body::Planet(planet) | Body::Moon(planet) => {
                    render_planet(&mut out, planet, body.kind().to_string().as_str());
                }
                Body::BeltCluster(belt) | Body::Ring(belt) => {
                    let _ = writeln!(out, "\t{} {}", "Name:".bold(), belt.body_name);
                    if belt.was_discovered == Some(true) {
                        let _ = writeln!(out, "\t(Discovered)");
                    }
                }
            }
        }

        render_rings(&mut out, &scan);

        let interests = scan::evaluate(&body, &star_system, &self.registry);
        if !interests.is_empty() {
            let _ = writeln!(out, "\t{}", "Interests:".bold());
            for interest in interests {
                let _ = writeln!(out, "\t{}", interest.cyan());
            }
        }

        Some(out.trim_end().to_string())
    }

    /// Rename the reported screenshot and render the outcome.
    fn screenshot(&self, event: &JournalEvent) -> String {
        let filename = event.str_field("Filename").unwrap_or_default();
        let body = event.str_field("Body").unwrap_or_default();
        let timestamp = event.timestamp().map(format_timestamp).unwrap_or_default();
        let latitude = event.f64_field("Latitude");
        let longitude = event.f64_field("Longitude");

        let renamed = self.screenshots_dir.as_deref().and_then(|dir| {
            rename_screenshot(dir, filename, body, &timestamp, latitude, longitude)
        });
        let shown = renamed.unwrap_or_else(|| format!("Unable to rename file: {filename}"));

        let mut out = String::new();
        let _ = writeln!(out, "\t{} {}", "Filename:".bold(), shown);
        let _ = writeln!(
            out,
            "\t{} {}x{}",
            "Resolution:".bold(),
            event.i64_field("Width").unwrap_or(0),
            event.i64_field("Height").unwrap_or(0)
        );
        let _ = write!(
            out,
            "\t{} {} {} {}",
            "Star system:".bold(),
            event.str_field("System").unwrap_or("-"),
            "Body:".bold(),
            body
        );
        if let (Some(lat), Some(long)) = (latitude, longitude) {
            let _ = write!(out, "\n\t{} {lat}, {long}", "Coordinates:".bold());
            if let Some(altitude) = event.f64_field("Altitude") {
                let _ = write!(out, "\n\t{} {altitude}", "Altitude:".bold());
            }
            if let Some(heading) = event.i64_field("Heading") {
                let _ = write!(out, "\n\t{} {heading}", "Heading:".bold());
            }
        }
        out
    }
}

/// `2024-03-01T10:15:30Z` → `2024-03-01 10:15:30`; unparseable stamps pass
/// through as written.
fn format_timestamp(timestamp: &str) -> String {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%SZ")
        .map_or_else(|_| timestamp.to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Seconds → `[Nd ]H:MM:SS`, sign dropped (retrograde periods).
fn format_period(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.abs() as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if days > 0 {
        format!("{days}d {hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{hours}:{minutes:02}:{secs:02}")
    }
}

/// Percent gauge with warning/critical coloring; zero capacity is 0%.
fn fuel_gauge(level: f64, capacity: f64) -> String {
    let percent = if capacity > 0.0 {
        (level / capacity) * 100.0
    } else {
        0.0
    };
    let text = format!("{percent:.2}%");
    let colored = if percent < FUEL_CRITICAL {
        text.red().to_string()
    } else if percent < FUEL_WARNING {
        text.yellow().to_string()
    } else {
        text
    };
    format!("{} {colored}", "Fuel:".bold())
}

fn load_game(event: &JournalEvent) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\t{} {}",
        "CMDR:".bold(),
        event.str_field("Commander").unwrap_or("-")
    );
    let _ = write!(
        out,
        "\t{} {} \"{}\" {} ",
        "Ship:".bold(),
        event.str_field("Ship_Localised").unwrap_or("-"),
        event.str_field("ShipName").unwrap_or("-"),
        event.str_field("ShipIdent").unwrap_or("-")
    );
    let _ = write!(
        out,
        "{}",
        fuel_gauge(
            event.f64_field("FuelLevel").unwrap_or(0.0),
            event.f64_field("FuelCapacity").unwrap_or(0.0)
        )
    );
    out
}

fn location(event: &JournalEvent) -> String {
    let body_type = match event.str_field("BodyType") {
        Some("Null") | None => "In space",
        Some(other) => other,
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\t{} {} {} {} {} {}",
        "System:".bold(),
        event.str_field("StarSystem").unwrap_or("-"),
        "Sec.:".bold(),
        event.str_field("SystemSecurity_Localised").unwrap_or("-"),
        "Population:".bold(),
        event.i64_field("Population").unwrap_or(0)
    );
    let _ = write!(
        out,
        "\t{} {}",
        format!("{body_type}:").bold(),
        event.str_field("Body").unwrap_or("-")
    );
    if event.entry.get("Docked").and_then(serde_json::Value::as_bool) == Some(true) {
        let _ = write!(
            out,
            "\n\t{} {}",
            format!(
                "Docked at {}:",
                event.str_field("StationType").unwrap_or("-")
            )
            .bold(),
            event.str_field("StationName").unwrap_or("-")
        );
    }
    if let (Some(lat), Some(long)) = (event.f64_field("Latitude"), event.f64_field("Longitude")) {
        let _ = write!(out, "\n\t{} {lat}, {long}", "Landed in coordinates:".bold());
    }
    out
}

fn fss_discovery(event: &JournalEvent) -> String {
    let progress = event.f64_field("Progress").unwrap_or(0.0) * 100.0;
    format!(
        "\t{} {progress:.0}%\n\t{} {} {} {}",
        "Progress:".bold(),
        "Bodies:".bold(),
        event.i64_field("BodyCount").unwrap_or(0),
        "Non bodies:".bold(),
        event.i64_field("NonBodyCount").unwrap_or(0)
    )
}

fn fss_all_bodies(event: &JournalEvent) -> String {
    format!(
        "\t{} {} {} {}",
        "System:".bold(),
        event.str_field("SystemName").unwrap_or("-"),
        "Bodies:".bold(),
        event.i64_field("Count").unwrap_or(-1)
    )
}

fn discovery_scan(event: &JournalEvent) -> String {
    format!(
        "\t{} {}",
        "New bodies discovered:".bold(),
        event.i64_field("Bodies").unwrap_or(-1)
    )
}

fn approach_body(event: &JournalEvent) -> String {
    format!(
        "\t{} {} {} {}",
        "Planet:".bold(),
        event.str_field("Body").unwrap_or("-"),
        "System:".bold(),
        event.str_field("StarSystem").unwrap_or("-")
    )
}

fn touchdown(event: &JournalEvent) -> Option<String> {
    if event.entry.get("PlayerControlled").and_then(serde_json::Value::as_bool) == Some(false) {
        return Some("\tAutopilot".to_string());
    }
    let (lat, long) = (event.f64_field("Latitude")?, event.f64_field("Longitude")?);
    Some(format!(
        "\t{} {lat:.4} {} {long:.4}",
        "Lat.:".bold(),
        "Long.:".bold()
    ))
}

fn fsd_jump(event: &JournalEvent) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\t{} {} {} {} {} {}",
        "System:".bold(),
        event.str_field("StarSystem").unwrap_or("-"),
        "Sec.:".bold(),
        event.str_field("SystemSecurity_Localised").unwrap_or("-"),
        "Population:".bold(),
        event.i64_field("Population").unwrap_or(0)
    );
    let _ = write!(
        out,
        "\t{} {:.1} ly",
        "Jump distance:".bold(),
        event.f64_field("JumpDist").unwrap_or(-1.0)
    );

    // FuelCapacity is appended by the reducer before the record reaches us.
    let capacity = event.f64_field("FuelCapacity").unwrap_or(0.0);
    if capacity > 0.0 {
        let used = (event.f64_field("FuelUsed").unwrap_or(0.0) / capacity) * 100.0;
        let _ = write!(
            out,
            "\n\t{} {used:.1}% {}",
            "Fuel used:".bold(),
            fuel_gauge(event.f64_field("FuelLevel").unwrap_or(0.0), capacity)
        );
    } else {
        let _ = write!(out, "\n\t{} N/A", "Fuel:".bold());
    }
    out
}

fn start_jump(event: &JournalEvent) -> Option<String> {
    if event.str_field("JumpType") != Some("Hyperspace") {
        return None;
    }
    let class = event.str_field("StarClass").unwrap_or("-");
    let description = star_class_description(class).unwrap_or("unknown");
    Some(format!(
        "\t{} {} {} {class} ({description})",
        "Jump to system:".bold(),
        event.str_field("StarSystem").unwrap_or("-"),
        "Class:".bold()
    ))
}

fn supercruise_entry(event: &JournalEvent) -> String {
    format!(
        "\t{} {}",
        "System:".bold(),
        event.str_field("StarSystem").unwrap_or("-")
    )
}

fn supercruise_exit(event: &JournalEvent) -> String {
    let body_type = match event.str_field("BodyType") {
        Some("Null") | None => "In space",
        Some(other) => other,
    };
    format!(
        "\t{} {}",
        format!("{body_type}:").bold(),
        event.str_field("Body").unwrap_or("-")
    )
}

fn fuel_scoop(event: &JournalEvent, state: &JournalState) -> String {
    format!(
        "\t{}",
        fuel_gauge(
            event.f64_field("Total").unwrap_or(0.0),
            state.fuel_capacity.unwrap_or(0.0)
        )
    )
}

fn material(event: &JournalEvent, operation: &str) -> String {
    format!(
        "\t{} {}\n\t{} {} {} {}",
        format!("{}:", event.str_field("Category").unwrap_or("-")).bold(),
        event.material_name().unwrap_or("-"),
        format!("{operation}:").bold(),
        event.i64_field("Count").unwrap_or(-1),
        "Total:".bold(),
        event.i64_field("Total").unwrap_or(-1)
    )
}

fn docked(event: &JournalEvent) -> String {
    let faction = event.entry.get("StationFaction");
    let faction_name = faction
        .and_then(|f| f.get("Name"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("-");
    let faction_state = faction
        .and_then(|f| f.get("FactionState"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or("None");
    format!(
        "\t{} {}\n\t{} {faction_name} {} {faction_state}",
        format!(
            "Docked at {}:",
            event.str_field("StationType").unwrap_or("-")
        )
        .bold(),
        event.str_field("StationName").unwrap_or("-"),
        "Faction:".bold(),
        "State:".bold()
    )
}

fn shipyard(event: &JournalEvent) -> String {
    format!(
        "\t{} {}",
        "Ship:".bold(),
        event.str_field("ShipType_Localised").unwrap_or("-")
    )
}

fn render_star(out: &mut String, star: &StarScan) {
    let star_type = star.star_type.as_deref().unwrap_or("-");
    let description = star_class_description(star_type).unwrap_or("unknown");
    let luminosity = star.luminosity.as_deref().unwrap_or("-");
    let luminosity_desc = luminosity_description(luminosity).unwrap_or("unknown");

    let _ = writeln!(
        out,
        "\t{} {} {} {star_type} ({description}) {} {}",
        "Star:".bold(),
        star.body_name,
        "Class:".bold(),
        "Subclass:".bold(),
        star.subclass.unwrap_or(-1)
    );
    let _ = writeln!(
        out,
        "\t{} {luminosity} ({luminosity_desc})",
        "Luminosity:".bold()
    );
    let _ = writeln!(
        out,
        "\t{} {:.5} {} {:.5}",
        "Solar mass:".bold(),
        star.stellar_mass.unwrap_or(-1.0),
        "Solar radius:".bold(),
        star.solar_radius().unwrap_or(-1.0)
    );
    let _ = writeln!(
        out,
        "\t{} {:.2} K {} {} million years",
        "Surface temp.:".bold(),
        star.surface_temperature.unwrap_or(-1.0),
        "Age:".bold(),
        star.age_my.unwrap_or(-1)
    );
    if let Some(period) = star.orbital_period {
        let _ = writeln!(out, "\t{} {}", "Orbital period:".bold(), format_period(period));
    }
}

fn render_planet(out: &mut String, planet: &PlanetScan, kind: &str) {
    let _ = writeln!(
        out,
        "\t{} {} {} {}",
        format!("{kind}:").bold(),
        planet.body_name,
        "Landable:".bold(),
        planet.landable
    );
    let _ = writeln!(
        out,
        "\t{} {}",
        "Class:".bold(),
        planet.planet_class.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "\t{} {:.2}G {} {:.4} {} {:.2} km ({:.2} of Earth)",
        "Gravity:".bold(),
        planet.surface_gravity.unwrap_or(-1.0),
        "EMass:".bold(),
        planet.mass_em.unwrap_or(-1.0),
        "Radius:".bold(),
        planet.radius_km.unwrap_or(-1.0),
        planet.earth_radius().unwrap_or(-1.0)
    );
    if let (Some(rotation), Some(tilt)) = (planet.rotation_period, planet.axial_tilt) {
        let _ = writeln!(
            out,
            "\t{} {} {} {:.2} deg. {} {}",
            "Rotation period:".bold(),
            format_period(rotation),
            "Axial tilt:".bold(),
            tilt.to_degrees(),
            "Tidal lock:".bold(),
            planet.tidal_lock
        );
    }
    if let Some(period) = planet.orbital_period {
        let _ = writeln!(out, "\t{} {}", "Orbital period:".bold(), format_period(period));
    }
    match (&planet.atmosphere, planet.atmosphere_composition.is_empty()) {
        (None, true) => {
            let _ = writeln!(out, "\tNo atmosphere");
        }
        (atmosphere, _) => {
            let mut line = format!(
                "\t{} {}",
                "Atmosphere:".bold(),
                atmosphere.as_deref().unwrap_or("-")
            );
            if !planet.atmosphere_composition.is_empty() {
                let parts: Vec<String> = planet
                    .atmosphere_composition
                    .iter()
                    .filter(|component| component.percent > 0.0)
                    .map(|component| format!("{} - {:.1}%", component.name, component.percent))
                    .collect();
                let _ = write!(line, " ({})", parts.join(", "));
            }
            let _ = writeln!(out, "{line}");
        }
    }
    match &planet.volcanism {
        Some(volcanism) => {
            let _ = writeln!(out, "\t{} {volcanism}", "Volcanism:".bold());
        }
        None => {
            let _ = writeln!(out, "\tNo volcanism");
        }
    }
    if let (Some(temperature), Some(pressure)) =
        (planet.surface_temperature, planet.surface_pressure)
    {
        let _ = writeln!(
            out,
            "\t{} {temperature:.0}K ({:.1}C) {} {:.2} atmospheres",
            "Temperature:".bold(),
            temperature - 273.15,
            "Pressure:".bold(),
            pressure / 101_325.0
        );
    }
    if let Some(state) = &planet.terraform_state {
        let _ = writeln!(out, "\t{} {state}", "Terraform state:".bold());
    }
    if planet.was_discovered == Some(true) {
        if planet.was_mapped == Some(true) {
            let _ = writeln!(out, "\tDiscovered and mapped");
        } else {
            let _ = writeln!(out, "\tDiscovered");
        }
    }
    if !planet.materials.is_empty() {
        let parts: Vec<String> = planet
            .materials
            .iter()
            .map(|m| format!("{} - {:.2}%", capitalize(&m.name), m.percent))
            .collect();
        let _ = writeln!(out, "\t{} {}", "Materials:".bold(), parts.join(", "));
    }
}

fn render_rings(out: &mut String, scan: &ScanEvent) {
    if scan.rings.is_empty() {
        return;
    }
    let reserve = scan.reserve_level.as_deref().unwrap_or("-");
    let _ = writeln!(out, "\t{}", format!("Rings ({reserve}):").bold());
    for ring in &scan.rings {
        let name = ring
            .name
            .strip_prefix(scan.body_name.as_str())
            .unwrap_or(&ring.name)
            .trim();
        let class = ring.ring_class.rsplit('_').next().unwrap_or(&ring.ring_class);
        let _ = writeln!(out, "\t\t{name} - {class}");
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
