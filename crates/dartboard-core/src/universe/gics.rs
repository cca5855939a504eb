//! GICS (Global Industry Classification Standard) sectors.
//!
//! Constituent lists label every company with one of the eleven Level 1
//! sectors. The simulation ignores them, but the CLI can restrict the
//! sampling universe to a single sector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GICS Level 1 sectors (11 sectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GicsSector {
    /// Energy
    Energy,

    /// Materials
    Materials,

    /// Industrials
    Industrials,

    /// Consumer Discretionary
    ConsumerDiscretionary,

    /// Consumer Staples
    ConsumerStaples,

    /// Health Care
    HealthCare,

    /// Financials
    Financials,

    /// Information Technology
    InformationTechnology,

    /// Communication Services
    CommunicationServices,

    /// Utilities
    Utilities,

    /// Real Estate
    RealEstate,
}

impl GicsSector {
    /// Returns all GICS sectors in code order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Energy,
            Self::Materials,
            Self::Industrials,
            Self::ConsumerDiscretionary,
            Self::ConsumerStaples,
            Self::HealthCare,
            Self::Financials,
            Self::InformationTechnology,
            Self::CommunicationServices,
            Self::Utilities,
            Self::RealEstate,
        ]
    }

    /// Returns the sector code (2-digit).
    pub const fn code(&self) -> u8 {
        match self {
            Self::Energy => 10,
            Self::Materials => 15,
            Self::Industrials => 20,
            Self::ConsumerDiscretionary => 25,
            Self::ConsumerStaples => 30,
            Self::HealthCare => 35,
            Self::Financials => 40,
            Self::InformationTechnology => 45,
            Self::CommunicationServices => 50,
            Self::Utilities => 55,
            Self::RealEstate => 60,
        }
    }

    /// Returns the full sector name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Materials => "Materials",
            Self::Industrials => "Industrials",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::HealthCare => "Health Care",
            Self::Financials => "Financials",
            Self::InformationTechnology => "Information Technology",
            Self::CommunicationServices => "Communication Services",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
        }
    }

    /// Parse a sector from its full name or a common short alias.
    ///
    /// Matching ignores case, whitespace and hyphens, so both the labels used
    /// in published constituent tables and CLI shorthand ("tech", "staples")
    /// are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        let sector = match normalized.as_str() {
            "informationtechnology" | "it" | "tech" => Self::InformationTechnology,
            "healthcare" | "health" => Self::HealthCare,
            "financials" | "finance" => Self::Financials,
            "consumerdiscretionary" | "discretionary" => Self::ConsumerDiscretionary,
            "communicationservices" | "communication" | "comms" => Self::CommunicationServices,
            "industrials" | "industrial" => Self::Industrials,
            "consumerstaples" | "staples" => Self::ConsumerStaples,
            "energy" => Self::Energy,
            "utilities" | "utility" => Self::Utilities,
            "realestate" | "estate" => Self::RealEstate,
            "materials" => Self::Materials,
            _ => return None,
        };

        Some(sector)
    }
}

impl fmt::Display for GicsSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
