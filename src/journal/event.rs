//! Journal line decoder.
//!
//! Each journal line is a self-describing JSON object whose `event` field
//! names the record type. Decoding keeps the full object around so that
//! consumers see every field the game wrote, while the resolved
//! [`EventKind`] drives reducer dispatch.

use serde_json::{Map, Value};

use super::error::DecodeError;

/// Event discriminators the state reducer dispatches on.
///
/// Tags outside this set are carried as [`EventKind::Other`]; they pass
/// through the reducer untouched but are still forwarded downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Commander,
    NewCommander,
    LoadGame,
    Location,
    Loadout,
    Docked,
    Undocked,
    FsdJump,
    Materials,
    MaterialCollected,
    MaterialDiscarded,
    ApproachBody,
    LeaveBody,
    Touchdown,
    Liftoff,
    SupercruiseEntry,
    SupercruiseExit,
    FuelScoop,
    RefuelAll,
    RefuelPartial,
    SetUserShipName,
    ShipyardNew,
    ShipyardSwap,
    Scan,
    Screenshot,
    Other(String),
}

impl EventKind {
    /// Resolve a journal `event` tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Commander" => Self::Commander,
            "NewCommander" => Self::NewCommander,
            "LoadGame" => Self::LoadGame,
            "Location" => Self::Location,
            "Loadout" => Self::Loadout,
            "Docked" => Self::Docked,
            "Undocked" => Self::Undocked,
            "FSDJump" => Self::FsdJump,
            "Materials" => Self::Materials,
            "MaterialCollected" => Self::MaterialCollected,
            "MaterialDiscarded" => Self::MaterialDiscarded,
            "ApproachBody" => Self::ApproachBody,
            "LeaveBody" => Self::LeaveBody,
            "Touchdown" => Self::Touchdown,
            "Liftoff" => Self::Liftoff,
            "SupercruiseEntry" => Self::SupercruiseEntry,
            "SupercruiseExit" => Self::SupercruiseExit,
            "FuelScoop" => Self::FuelScoop,
            "RefuelAll" => Self::RefuelAll,
            "RefuelPartial" => Self::RefuelPartial,
            "SetUserShipName" => Self::SetUserShipName,
            "ShipyardNew" => Self::ShipyardNew,
            "ShipyardSwap" => Self::ShipyardSwap,
            "Scan" => Self::Scan,
            "Screenshot" => Self::Screenshot,
            other => Self::Other(other.to_string()),
        }
    }

    /// The journal tag for this kind.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Commander => "Commander",
            Self::NewCommander => "NewCommander",
            Self::LoadGame => "LoadGame",
            Self::Location => "Location",
            Self::Loadout => "Loadout",
            Self::Docked => "Docked",
            Self::Undocked => "Undocked",
            Self::FsdJump => "FSDJump",
            Self::Materials => "Materials",
            Self::MaterialCollected => "MaterialCollected",
            Self::MaterialDiscarded => "MaterialDiscarded",
            Self::ApproachBody => "ApproachBody",
            Self::LeaveBody => "LeaveBody",
            Self::Touchdown => "Touchdown",
            Self::Liftoff => "Liftoff",
            Self::SupercruiseEntry => "SupercruiseEntry",
            Self::SupercruiseExit => "SupercruiseExit",
            Self::FuelScoop => "FuelScoop",
            Self::RefuelAll => "RefuelAll",
            Self::RefuelPartial => "RefuelPartial",
            Self::SetUserShipName => "SetUserShipName",
            Self::ShipyardNew => "ShipyardNew",
            Self::ShipyardSwap => "ShipyardSwap",
            Self::Scan => "Scan",
            Self::Screenshot => "Screenshot",
            Self::Other(tag) => tag,
        }
    }
}

/// One decoded journal record: the resolved kind plus the full JSON object.
#[derive(Debug, Clone)]
pub struct JournalEvent {
    pub kind: EventKind,
    pub entry: Map<String, Value>,
}

impl JournalEvent {
    /// Decode a single journal line.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the line is not a JSON object or lacks a
    /// string `event` field. Callers skip such lines and keep tailing.
    pub fn from_line(line: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(line)?;
        let Value::Object(entry) = value else {
            return Err(DecodeError::NotAnObject);
        };
        let kind = entry
            .get("event")
            .and_then(Value::as_str)
            .map(EventKind::from_tag)
            .ok_or(DecodeError::MissingEvent)?;
        Ok(Self { kind, entry })
    }

    /// String field lookup on the raw record.
    #[must_use]
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.entry.get(key).and_then(Value::as_str)
    }

    /// Float field lookup on the raw record.
    #[must_use]
    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.entry.get(key).and_then(Value::as_f64)
    }

    /// Integer field lookup on the raw record.
    #[must_use]
    pub fn i64_field(&self, key: &str) -> Option<i64> {
        self.entry.get(key).and_then(Value::as_i64)
    }

    /// Timestamp of the record, as written by the game.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field("timestamp")
    }

    /// Material name, preferring the localised form.
    ///
    /// The journal writes both `Name` and, for some languages, a
    /// `Name_Localised` variant; the localised one wins when present.
    #[must_use]
    pub fn material_name(&self) -> Option<&str> {
        self.str_field("Name_Localised").or_else(|| self.str_field("Name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_line() {
        let event =
            JournalEvent::from_line(r#"{"timestamp":"2024-03-01T10:00:00Z","event":"Commander","Name":"Jameson"}"#)
                .unwrap();
        assert_eq!(event.kind, EventKind::Commander);
        assert_eq!(event.str_field("Name"), Some("Jameson"));
        assert_eq!(event.timestamp(), Some("2024-03-01T10:00:00Z"));
    }

    #[test]
    fn test_decode_malformed_line() {
        let err = JournalEvent::from_line("{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_decode_non_object() {
        let err = JournalEvent::from_line("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject));
    }

    #[test]
    fn test_decode_missing_event_field() {
        let err = JournalEvent::from_line(r#"{"timestamp":"2024-03-01T10:00:00Z"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingEvent));
    }

    #[test]
    fn test_decode_non_string_event_field() {
        let err = JournalEvent::from_line(r#"{"event":42}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingEvent));
    }

    #[test]
    fn test_unknown_tag_maps_to_other() {
        let event = JournalEvent::from_line(r#"{"event":"Music","MusicTrack":"Exploration"}"#).unwrap();
        assert_eq!(event.kind, EventKind::Other("Music".to_string()));
        assert_eq!(event.kind.tag(), "Music");
    }

    #[test]
    fn test_kind_round_trip() {
        for tag in ["FSDJump", "MaterialCollected", "Scan", "SupercruiseEntry"] {
            assert_eq!(EventKind::from_tag(tag).tag(), tag);
        }
    }

    #[test]
    fn test_material_name_prefers_localised() {
        let event = JournalEvent::from_line(
            r#"{"event":"MaterialCollected","Name":"iron","Name_Localised":"Iron"}"#,
        )
        .unwrap();
        assert_eq!(event.material_name(), Some("Iron"));

        let event = JournalEvent::from_line(r#"{"event":"MaterialCollected","Name":"iron"}"#).unwrap();
        assert_eq!(event.material_name(), Some("iron"));
    }
}
