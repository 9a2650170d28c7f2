//! Order status state machine.
//!
//! Orders progress through a strictly ordered sequence for the tracking
//! progress bar, with a separate terminal `cancelled` state reachable from
//! any non-terminal state. Transitions are staff-driven; there is no
//! automatic time-based advancement.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known order status.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown order status: {0}")]
pub struct OrderStatusError(pub String);

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Processing,
    Confirmed,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
}

/// The forward progression, in order. `Cancelled` is outside the sequence.
const PROGRESSION: [OrderStatus; 5] = [
    OrderStatus::Processing,
    OrderStatus::Confirmed,
    OrderStatus::Shipped,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
];

impl OrderStatus {
    /// All statuses a staff member can select.
    pub const ALL: [Self; 6] = [
        Self::Processing,
        Self::Confirmed,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The stored value (also used in URLs and JSON).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// The human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Cancelled orders accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether staff may move an order from `self` to `next`.
    ///
    /// Staff set the status directly, so any target is allowed except
    /// leaving the terminal `cancelled` state.
    #[must_use]
    pub const fn can_become(self, next: Self) -> bool {
        !self.is_terminal() || matches!(next, Self::Cancelled)
    }

    /// Position in the forward progression, if this status is part of it.
    fn progression_index(self) -> Option<usize> {
        PROGRESSION.iter().position(|s| *s == self)
    }

    /// Tracking steps for the order progress bar.
    ///
    /// Every step up to and including the current status is completed and
    /// the current one is active. A cancelled order deactivates all steps.
    #[must_use]
    pub fn tracking_steps(self) -> Vec<TrackingStep> {
        let current = self.progression_index();

        PROGRESSION
            .iter()
            .enumerate()
            .map(|(i, status)| TrackingStep {
                key: status.as_str(),
                label: if *status == Self::Processing {
                    "Order Placed"
                } else {
                    status.label()
                },
                completed: current.is_some_and(|c| i <= c),
                active: current == Some(i),
            })
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(OrderStatusError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature): stored as TEXT keys.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// One row of the order tracking progress bar.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingStep {
    /// Status key this step represents.
    pub key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// The order has reached or passed this step.
    pub completed: bool,
    /// This is the order's current step.
    pub active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_progression_marks_prior_steps_completed() {
        let steps = OrderStatus::Shipped.tracking_steps();
        assert_eq!(steps.len(), 5);

        let completed: Vec<bool> = steps.iter().map(|s| s.completed).collect();
        assert_eq!(completed, [true, true, true, false, false]);

        let active: Vec<bool> = steps.iter().map(|s| s.active).collect();
        assert_eq!(active, [false, false, true, false, false]);
    }

    #[test]
    fn test_delivered_completes_every_step() {
        let steps = OrderStatus::Delivered.tracking_steps();
        assert!(steps.iter().all(|s| s.completed));
        assert!(steps.last().unwrap().active);
    }

    #[test]
    fn test_cancelled_deactivates_all_steps() {
        let steps = OrderStatus::Cancelled.tracking_steps();
        assert!(steps.iter().all(|s| !s.completed && !s.active));
    }

    #[test]
    fn test_first_step_is_order_placed() {
        let steps = OrderStatus::Processing.tracking_steps();
        assert_eq!(steps[0].label, "Order Placed");
        assert!(steps[0].completed && steps[0].active);
    }

    #[test]
    fn test_cancel_allowed_from_any_nonterminal() {
        for status in OrderStatus::ALL {
            if status == OrderStatus::Cancelled {
                continue;
            }
            assert!(status.can_become(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(!OrderStatus::Cancelled.can_become(OrderStatus::Processing));
        assert!(OrderStatus::Cancelled.can_become(OrderStatus::Cancelled));
    }
}
