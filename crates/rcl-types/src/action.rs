use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Closed set of custody actions a block can record.
///
/// Inbound actions bring stock into custody, outbound actions release it.
/// `Transfer`, `Expired`, and `Damaged` are neither: they move or retire
/// stock without changing the inbound/outbound totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustodyAction {
    InboundDonation,
    InboundPurchase,
    WarehouseOut,
    Distribution,
    Transfer,
    Expired,
    Damaged,
}

impl CustodyAction {
    /// All actions, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::InboundDonation,
        Self::InboundPurchase,
        Self::WarehouseOut,
        Self::Distribution,
        Self::Transfer,
        Self::Expired,
        Self::Damaged,
    ];

    /// Wire name (kebab-case), identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InboundDonation => "inbound-donation",
            Self::InboundPurchase => "inbound-purchase",
            Self::WarehouseOut => "warehouse-out",
            Self::Distribution => "distribution",
            Self::Transfer => "transfer",
            Self::Expired => "expired",
            Self::Damaged => "damaged",
        }
    }

    /// Human-readable label for audit timelines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InboundDonation => "Donation received",
            Self::InboundPurchase => "Purchase received",
            Self::WarehouseOut => "Released from warehouse",
            Self::Distribution => "Distributed to recipients",
            Self::Transfer => "Transferred",
            Self::Expired => "Marked expired",
            Self::Damaged => "Marked damaged",
        }
    }

    /// Actions that bring stock into custody.
    pub fn is_inbound(&self) -> bool {
        matches!(self, Self::InboundDonation | Self::InboundPurchase)
    }

    /// Actions that release stock from custody.
    pub fn is_outbound(&self) -> bool {
        matches!(self, Self::Distribution | Self::WarehouseOut)
    }
}

impl fmt::Display for CustodyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CustodyAction {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| TypeError::UnknownAction(s.to_string()))
    }
}
