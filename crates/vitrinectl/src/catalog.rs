use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::sync::Arc;
use strum::{Display as StrumDisplay, EnumString};

/// Shared, immutable collection backing one surface.
pub type Collection = Arc<[Item]>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Title(String);

crate::impl_string_newtype!(Title);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct MediaUrl(String);

crate::impl_string_newtype!(MediaUrl);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTier {
    #[strum(to_string = "popular", serialize = "most-popular")]
    Popular,
    #[strum(serialize = "common")]
    Common,
    #[strum(serialize = "premium")]
    Premium,
}

impl ServiceTier {
    pub fn from_flags(most_popular: bool, common: bool) -> Self {
        match (most_popular, common) {
            (true, _) => Self::Popular,
            (false, true) => Self::Common,
            (false, false) => Self::Premium,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    #[strum(to_string = "reel", serialize = "portrait")]
    Reel,
    #[default]
    #[strum(serialize = "landscape")]
    Landscape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaRef {
    Image(MediaUrl),
    Video {
        url: MediaUrl,
        duration_secs: Option<f64>,
    },
}

impl MediaRef {
    pub fn url(&self) -> &MediaUrl {
        match self {
            Self::Image(url) | Self::Video { url, .. } => url,
        }
    }

    pub fn is_playable(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Service {
        tier: ServiceTier,
        pricing: Option<String>,
    },
    Testimonial {
        position: Option<String>,
        service: Option<String>,
        text: String,
    },
    Video {
        format: VideoFormat,
        category: Option<String>,
        client: Option<String>,
    },
}

impl ItemKind {
    /// Short tag the presentation layer shows next to the title.
    pub fn badge(&self) -> String {
        match self {
            Self::Service { tier, .. } => tier.to_string(),
            Self::Testimonial { service, .. } => service.clone().unwrap_or_default(),
            Self::Video { format, .. } => format.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: Title,
    pub media: Option<MediaRef>,
    pub kind: ItemKind,
}

impl Item {
    pub fn video_source(&self) -> Option<&MediaRef> {
        self.media.as_ref().filter(|m| m.is_playable())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceRecord {
    pub id: ItemId,
    pub title: Title,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pricing: Option<String>,
    #[serde(default)]
    pub tier: Option<ServiceTier>,
    #[serde(default)]
    pub most_popular: bool,
    #[serde(default)]
    pub common: bool,
    #[serde(default)]
    pub image: Option<MediaUrl>,
}

impl From<ServiceRecord> for Item {
    fn from(record: ServiceRecord) -> Self {
        let tier = record
            .tier
            .unwrap_or_else(|| ServiceTier::from_flags(record.most_popular, record.common));
        Self {
            id: record.id,
            title: record.title,
            media: record.image.map(MediaRef::Image),
            kind: ItemKind::Service {
                tier,
                pricing: record.pricing,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestimonialRecord {
    pub id: ItemId,
    pub author: Title,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    pub text: String,
    #[serde(default)]
    pub image: Option<MediaUrl>,
}

impl From<TestimonialRecord> for Item {
    fn from(record: TestimonialRecord) -> Self {
        Self {
            id: record.id,
            title: record.author,
            media: record.image.map(MediaRef::Image),
            kind: ItemKind::Testimonial {
                position: record.position,
                service: record.service,
                text: record.text,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoRecord {
    pub id: ItemId,
    pub title: Title,
    pub video_url: MediaUrl,
    #[serde(default)]
    pub format: VideoFormat,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

impl From<VideoRecord> for Item {
    fn from(record: VideoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            media: Some(MediaRef::Video {
                url: record.video_url,
                duration_secs: record.duration_secs,
            }),
            kind: ItemKind::Video {
                format: record.format,
                category: record.category,
                client: record.client,
            },
        }
    }
}

/// Converts raw records into a shared collection, preserving order.
pub fn collect<R: Into<Item>>(records: impl IntoIterator<Item = R>) -> Collection {
    records.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_deserialization() {
        let cases = vec![
            ("\"popular\"", ServiceTier::Popular),
            ("\"Most-Popular\"", ServiceTier::Popular),
            ("\"COMMON\"", ServiceTier::Common),
            ("\"premium\"", ServiceTier::Premium),
        ];

        for (json, expected) in cases {
            let deserialized: ServiceTier = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_tier_from_legacy_flags() {
        assert_eq!(ServiceTier::from_flags(true, true), ServiceTier::Popular);
        assert_eq!(ServiceTier::from_flags(false, true), ServiceTier::Common);
        assert_eq!(ServiceTier::from_flags(false, false), ServiceTier::Premium);
    }

    #[test]
    fn test_service_record_into_item() {
        let record: ServiceRecord = serde_json::from_str(
            r#"{ "id": 3, "title": "Mobile Development", "common": true }"#,
        )
        .unwrap();
        let item = Item::from(record);
        assert_eq!(item.id, ItemId::new(3));
        assert_eq!(item.kind.badge(), "common");
        assert!(item.video_source().is_none());
    }

    #[test]
    fn test_video_record_is_playable() {
        let record: VideoRecord = serde_json::from_str(
            r#"{ "id": 7, "title": "Launch", "video_url": "/v/launch.mp4", "format": "reel" }"#,
        )
        .unwrap();
        let item = Item::from(record);
        assert!(item.video_source().is_some());
        assert_eq!(item.kind.badge(), "reel");
    }

    #[test]
    fn test_collect_preserves_order() {
        let records = vec![
            TestimonialRecord {
                id: ItemId::new(2),
                author: Title::from("Sami"),
                position: None,
                service: None,
                text: "Great".into(),
                image: None,
            },
            TestimonialRecord {
                id: ItemId::new(1),
                author: Title::from("Lina"),
                position: None,
                service: Some("Branding".into()),
                text: "Fast".into(),
                image: None,
            },
        ];
        let collection = collect(records);
        let ids: Vec<_> = collection.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId::new(2), ItemId::new(1)]);
    }
}
