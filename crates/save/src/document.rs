use super::*;
use rbb_competition::CompetitionRecord;
use rbb_gameplay::Match;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

/// Current document version.
pub const VERSION: u64 = 1;
/// Key holding the version inside every document.
const VERSION_KEY: &str = "version";

/// A record stored as one versioned JSON document.
pub trait Document: Serialize + DeserializeOwned {
    /// Upgrade `fields` in place from `version` to `version + 1`.
    fn upgrade(_version: u64, _fields: &mut Map<String, Value>) {}
}

impl Document for Match {}

impl Document for CompetitionRecord {
    fn upgrade(version: u64, fields: &mut Map<String, Value>) {
        if version == 0 {
            // v0 headers named the config after the tournament and had
            // no exhibition matches
            if let Some(config) = fields.remove("tournament_config") {
                fields.insert(String::from("config"), config);
            }
            fields
                .entry("exhibition")
                .or_insert_with(|| serde_json::json!({ "match_ids": [], "starting_baskets": {} }));
            fields.entry("active").or_insert(Value::Null);
        }
    }
}

/// Pretty-printed JSON with the current version stamped in.
pub fn encode<D: Document>(document: &D) -> Result<Vec<u8>, SaveError> {
    let Value::Object(mut fields) = serde_json::to_value(document)? else {
        return Err(SaveError::Corrupt(String::from("document is not an object")));
    };
    fields.insert(String::from(VERSION_KEY), Value::from(VERSION));
    Ok(serde_json::to_vec_pretty(&Value::Object(fields))?)
}

/// Parse a document, upgrading it step by step from its stored version.
/// A document without a version is version 0.
pub fn decode<D: Document>(bytes: &[u8]) -> Result<D, SaveError> {
    let Value::Object(mut fields) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(SaveError::Corrupt(String::from("document is not an object")));
    };
    let found = match fields.remove(VERSION_KEY) {
        None => 0,
        Some(value) => value
            .as_u64()
            .ok_or_else(|| SaveError::Corrupt(format!("bad version {}", value)))?,
    };
    if found > VERSION {
        return Err(SaveError::Version {
            found,
            supported: VERSION,
        });
    }
    for version in found..VERSION {
        log::info!("[save] upgrading document from version {}", version);
        D::upgrade(version, &mut fields);
    }
    Ok(serde_json::from_value(Value::Object(fields))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rbb_competition::Competition;
    use rbb_core::ID;
    use rbb_gameplay::Basket;

    #[test]
    fn match_document_is_a_fixed_point() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let game = Match::new(
            3,
            [ID::default(), ID::default()],
            [Basket::Blue, Basket::Magenta],
            true,
            rng,
        );
        let bytes = encode(&game).unwrap();
        let json = serde_json::from_slice::<Value>(&bytes).unwrap();
        assert_eq!(json["version"], VERSION);
        let back = decode::<Match>(&bytes).unwrap();
        assert_eq!(encode(&back).unwrap(), bytes);
    }
    #[test]
    fn newer_documents_are_rejected() {
        let bytes = br#"{ "version": 7, "name": "cup" }"#;
        assert!(matches!(
            decode::<CompetitionRecord>(bytes),
            Err(SaveError::Version {
                found: 7,
                supported: VERSION
            })
        ));
    }
    #[test]
    fn unversioned_header_is_upgraded() {
        let ref mut competition = Competition::seeded("cup", 2);
        competition.add_contestant("Io").unwrap();
        let record = competition.record();
        let Value::Object(mut fields) = serde_json::to_value(&record).unwrap() else {
            panic!("record is an object");
        };
        fields.remove("exhibition");
        fields.remove("active");
        let config = fields.remove("config").unwrap();
        fields.insert(String::from("tournament_config"), config);
        let bytes = serde_json::to_vec(&fields).unwrap();
        assert_eq!(decode::<CompetitionRecord>(&bytes).unwrap(), record);
    }
    #[test]
    fn non_objects_are_corrupt() {
        assert!(matches!(
            decode::<Match>(b"[1, 2]"),
            Err(SaveError::Corrupt(_))
        ));
        assert!(matches!(decode::<Match>(b"{"), Err(SaveError::Json(_))));
    }
}
