//! Order and payment status state machines.
//!
//! Transition validity is a membership check against the allowed-next-state
//! set for the current state. Invalid transitions are rejected and reported
//! to the caller, never silently applied.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle of an order.
///
/// ```text
/// new -> paid -> shipped
/// new -> canceled
/// paid -> canceled
/// ```
///
/// `shipped` and `canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    Paid,
    Shipped,
    Canceled,
}

impl OrderStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 4] = [Self::New, Self::Paid, Self::Shipped, Self::Canceled];

    /// The set of states this status may transition to.
    #[must_use]
    pub const fn allowed_next(self) -> &'static [Self] {
        match self {
            Self::New => &[Self::Paid, Self::Canceled],
            Self::Paid => &[Self::Shipped, Self::Canceled],
            Self::Shipped | Self::Canceled => &[],
        }
    }

    /// Whether the status admits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Whether `next` is a permitted successor of this status.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Validate a transition, returning the new status on success.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] when `next` is not in the
    /// allowed-next-state set for the current status.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Stable string form used in the database and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "canceled" => Ok(Self::Canceled),
            other => Err(CoreError::invalid_argument(format!(
                "invalid order status: {other}"
            ))),
        }
    }
}

/// Status of the payment record attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    /// Stable string form used in the database and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::invalid_argument(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let status = OrderStatus::New;
        let status = status.transition(OrderStatus::Paid).unwrap();
        let status = status.transition(OrderStatus::Shipped).unwrap();
        assert!(status.is_terminal());
    }

    #[test]
    fn test_cancel_from_new_and_paid() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Canceled));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Canceled));
    }

    #[test]
    fn test_shipped_to_paid_rejected() {
        let err = OrderStatus::Shipped
            .transition(OrderStatus::Paid)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: OrderStatus::Shipped,
                to: OrderStatus::Paid,
            }
        );
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for next in OrderStatus::ALL {
            assert!(OrderStatus::Shipped.transition(next).is_err());
            assert!(OrderStatus::Canceled.transition(next).is_err());
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(OrderStatus::New.transition(OrderStatus::New).is_err());
    }

    #[test]
    fn test_round_trip_strings() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_string() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
