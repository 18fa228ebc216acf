use serde::Serialize;

/// The single domain entity: a clan's numeric id paired with its short tag.
/// Built fresh per request and discarded after serialization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClanRecord {
    pub clan_id: u64,
    pub clan_tag: String,
}

impl ClanRecord {
    pub fn new<T>(clan_id: u64, clan_tag: T) -> Self
    where
        T: Into<String>,
    {
        ClanRecord {
            clan_id,
            clan_tag: clan_tag.into(),
        }
    }
}
