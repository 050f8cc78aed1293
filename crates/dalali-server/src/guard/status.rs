use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::GuardError;
use crate::auth::Actor;
use crate::models::BookingStatus;

/// A requested change of booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingAction {
    /// pending -> confirmed, by the property's seller
    Confirm,
    /// pending -> cancelled, by the property's seller
    Reject,
    /// pending or confirmed -> cancelled, by the requester
    Cancel,
    /// confirmed -> completed, by the property's seller
    Complete,
}

impl BookingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Reject => "reject",
            BookingAction::Cancel => "cancel",
            BookingAction::Complete => "complete",
        }
    }

    /// Status reached by applying this action to a booking in `from`.
    pub fn apply(self, from: BookingStatus) -> Result<BookingStatus, GuardError> {
        use BookingStatus::*;

        let to = match (self, from) {
            (BookingAction::Confirm, Pending) => Confirmed,
            (BookingAction::Reject, Pending) => Cancelled,
            (BookingAction::Cancel, Pending | Confirmed) => Cancelled,
            (BookingAction::Complete, Confirmed) => Completed,
            _ => {
                return Err(GuardError::InvalidTransition {
                    from,
                    action: self.as_str(),
                })
            },
        };
        Ok(to)
    }

    /// Checks that `actor` may perform this action on a booking made by
    /// `requester_id` for a property listed by `seller_id`. Admins may do anything.
    pub fn authorize(self, actor: &Actor, requester_id: Uuid, seller_id: Uuid) -> Result<(), GuardError> {
        if actor.is_admin() {
            return Ok(());
        }

        let allowed = match self {
            BookingAction::Cancel => actor.user_id == requester_id,
            BookingAction::Confirm | BookingAction::Reject | BookingAction::Complete => {
                actor.user_id == seller_id
            },
        };

        if allowed {
            Ok(())
        } else {
            Err(GuardError::Permission(format!(
                "You are not allowed to {} this booking",
                self.as_str()
            )))
        }
    }
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    const ALL_STATUSES: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    #[test]
    fn test_allowed_transitions() {
        use BookingStatus::*;
        assert_eq!(BookingAction::Confirm.apply(Pending).unwrap(), Confirmed);
        assert_eq!(BookingAction::Reject.apply(Pending).unwrap(), Cancelled);
        assert_eq!(BookingAction::Cancel.apply(Pending).unwrap(), Cancelled);
        assert_eq!(BookingAction::Cancel.apply(Confirmed).unwrap(), Cancelled);
        assert_eq!(BookingAction::Complete.apply(Confirmed).unwrap(), Completed);
    }

    #[test]
    fn test_terminal_states_reject_every_action() {
        let actions = [
            BookingAction::Confirm,
            BookingAction::Reject,
            BookingAction::Cancel,
            BookingAction::Complete,
        ];
        for status in ALL_STATUSES.iter().filter(|s| s.is_terminal()) {
            for action in actions {
                assert!(
                    matches!(action.apply(*status), Err(GuardError::InvalidTransition { .. })),
                    "{} should not apply to {}",
                    action,
                    status
                );
            }
        }
    }

    #[test]
    fn test_cancelling_completed_booking_fails() {
        let err = BookingAction::Cancel.apply(BookingStatus::Completed).unwrap_err();
        assert_eq!(err.to_string(), "cannot cancel a booking that is completed");
    }

    #[test]
    fn test_cannot_complete_pending_or_confirm_twice() {
        assert!(BookingAction::Complete.apply(BookingStatus::Pending).is_err());
        assert!(BookingAction::Confirm.apply(BookingStatus::Confirmed).is_err());
    }

    #[test]
    fn test_authorization() {
        let requester = Uuid::new_v4();
        let seller = Uuid::new_v4();
        let as_requester = Actor::new(requester, Role::Customer);
        let as_seller = Actor::new(seller, Role::Seller);
        let as_admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let stranger = Actor::new(Uuid::new_v4(), Role::Seller);

        assert!(BookingAction::Cancel.authorize(&as_requester, requester, seller).is_ok());
        assert!(BookingAction::Confirm.authorize(&as_requester, requester, seller).is_err());
        assert!(BookingAction::Confirm.authorize(&as_seller, requester, seller).is_ok());
        assert!(BookingAction::Cancel.authorize(&as_seller, requester, seller).is_err());
        assert!(BookingAction::Complete.authorize(&as_admin, requester, seller).is_ok());
        assert!(matches!(
            BookingAction::Reject.authorize(&stranger, requester, seller),
            Err(GuardError::Permission(_))
        ));
    }
}
