//! One-time warning gates backed by session flags.

use rideready_types::Snapshot;

use crate::session::{Flag, Session};
use crate::storage::StorageError;

/// What to do with an outbound manufacturer link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// First link of the session: hold it behind the warning modal.
    Intercept(String),
    /// Warning already accepted this session.
    Open(String),
}

pub fn outbound_link(session: &Session, url: &str) -> LinkDecision {
    let url = url.trim().to_string();
    if session.flag(Flag::MsrpWarned) {
        LinkDecision::Open(url)
    } else {
        LinkDecision::Intercept(url)
    }
}

/// Accepting the outbound warning bypasses it for the rest of the session.
pub fn accept_outbound_warning(session: &mut Session) -> Result<(), StorageError> {
    session.set_flag(Flag::MsrpWarned)
}

/// Decide whether `snapshot` should raise the ABS warning, marking it shown.
///
/// Fires at most once per session, and only for an explicit `abs: false`.
pub fn abs_warning(session: &mut Session, snapshot: &Snapshot) -> Result<bool, StorageError> {
    if session.flag(Flag::AbsWarned) || !snapshot.has_non_abs_item() {
        return Ok(false);
    }
    session.set_flag(Flag::AbsWarned)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{LinkDecision, abs_warning, accept_outbound_warning, outbound_link};
    use crate::session::Session;
    use crate::storage::MemoryStorage;
    use chrono::Utc;
    use rideready_types::{Profile, RecommendationItem, Snapshot, SnapshotId};

    fn session() -> Session {
        Session::new(Box::new(MemoryStorage::new()), 10)
    }

    fn snapshot(abs: Option<bool>) -> Snapshot {
        Snapshot::new(
            SnapshotId::new("s"),
            Utc::now(),
            Profile::default(),
            vec![RecommendationItem {
                id: Some("bike".to_string()),
                abs,
                ..Default::default()
            }],
        )
    }

    #[test]
    fn abs_warning_fires_once() {
        let mut session = session();
        assert!(abs_warning(&mut session, &snapshot(Some(false))).unwrap());
        assert!(!abs_warning(&mut session, &snapshot(Some(false))).unwrap());
    }

    #[test]
    fn unknown_abs_does_not_warn() {
        let mut session = session();
        assert!(!abs_warning(&mut session, &snapshot(None)).unwrap());
        assert!(!abs_warning(&mut session, &snapshot(Some(true))).unwrap());
        assert!(abs_warning(&mut session, &snapshot(Some(false))).unwrap());
    }

    #[test]
    fn first_link_is_intercepted_until_accepted() {
        let mut session = session();
        let url = "https://www.honda.com/rebel";
        assert_eq!(
            outbound_link(&session, url),
            LinkDecision::Intercept(url.to_string())
        );
        assert_eq!(
            outbound_link(&session, url),
            LinkDecision::Intercept(url.to_string())
        );
        accept_outbound_warning(&mut session).unwrap();
        assert_eq!(outbound_link(&session, url), LinkDecision::Open(url.to_string()));
    }
}
