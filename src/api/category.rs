use enum_utils::TryFromRepr;
use serde::{Deserialize, Serialize};

/// Kind of repair. The discriminant is the id the upstream expects when a
/// ticket is created.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    TryFromRepr,
)]
#[repr(u8)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    WaterAndElectricity = 1,
    NetworkIssues = 2,
    FurnitureRepair = 3,
    ApplianceIssues = 4,
    PublicFacilities = 5,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub value: String,
    pub label: String,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::WaterAndElectricity,
        Self::NetworkIssues,
        Self::FurnitureRepair,
        Self::ApplianceIssues,
        Self::PublicFacilities,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::WaterAndElectricity => "waterAndElectricity",
            Self::NetworkIssues => "networkIssues",
            Self::FurnitureRepair => "furnitureRepair",
            Self::ApplianceIssues => "applianceIssues",
            Self::PublicFacilities => "publicFacilities",
        }
    }

    /// Name the upstream uses in `categoryName`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaterAndElectricity => "水电维修",
            Self::NetworkIssues => "网络故障",
            Self::FurnitureRepair => "家具维修",
            Self::ApplianceIssues => "电器故障",
            Self::PublicFacilities => "公共设施",
        }
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Accepts the key, the display name or the numeric id.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u8>() {
            return Self::try_from(id).ok();
        }
        Self::ALL.into_iter().find(|c| c.key() == s || c.label() == s)
    }
}

/// Display info for whatever category text a ticket carries.
pub fn category_info(category: &str) -> CategoryInfo {
    match Category::parse(category) {
        Some(c) => CategoryInfo {
            value: c.key().to_owned(),
            label: c.label().to_owned(),
        },
        None => CategoryInfo {
            value: category.to_owned(),
            label: category.to_owned(),
        },
    }
}
