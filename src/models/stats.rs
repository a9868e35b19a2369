//! Aggregate counters shown on the cellar dashboard.

use crate::models::bottle::Bottle;
use serde::Serialize;

/// Summary of one user's collection.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellarStats {
    pub wine_in_cellar: i64,
    pub wine_pending: i64,
    pub wine_consumed: i64,
    pub wine_purchased: i64,
    pub ready_to_drink: i64,
    pub total_value: f64,
}

/// Where a bottle sits, derived from its free-form status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Holding {
    Pending,
    InCellar,
    Ready,
    Consumed,
    Other,
}

impl Holding {
    fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Holding::Other;
        };
        let normalized = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "pending" => Holding::Pending,
            "in-cellar" => Holding::InCellar,
            "ready" | "ready-to-drink" => Holding::Ready,
            "consumed" => Holding::Consumed,
            _ => Holding::Other,
        }
    }

    /// Still owned by the user, so it counts towards the estimated value.
    fn is_owned(self) -> bool {
        matches!(self, Holding::Pending | Holding::InCellar | Holding::Ready)
    }
}

impl CellarStats {
    /// Fold a user's bottles into dashboard counters.
    ///
    /// A record without `count` stands for a single bottle. Value uses `price`
    /// and falls back to `costPerBottle`.
    pub fn from_bottles(bottles: &[Bottle]) -> Self {
        let mut stats = CellarStats::default();
        let mut value = 0.0;

        for bottle in bottles {
            let quantity = bottle.count.unwrap_or(1);
            let holding = Holding::from_label(bottle.status.as_deref());

            // Rows written before the count bound existed may still be huge.
            stats.wine_purchased = stats.wine_purchased.saturating_add(quantity);
            match holding {
                Holding::Pending => stats.wine_pending = stats.wine_pending.saturating_add(quantity),
                Holding::InCellar => {
                    stats.wine_in_cellar = stats.wine_in_cellar.saturating_add(quantity)
                }
                Holding::Ready => {
                    stats.wine_in_cellar = stats.wine_in_cellar.saturating_add(quantity);
                    stats.ready_to_drink = stats.ready_to_drink.saturating_add(quantity);
                }
                Holding::Consumed => {
                    stats.wine_consumed = stats.wine_consumed.saturating_add(quantity)
                }
                Holding::Other => {}
            }

            if holding.is_owned() {
                let unit = bottle.price.or(bottle.cost_per_bottle).unwrap_or(0.0);
                value += unit * quantity as f64;
            }
        }

        stats.total_value = (value * 100.0).round() / 100.0;
        stats
    }
}
