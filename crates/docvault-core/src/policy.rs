//! Ownership-based authorization policy for document operations.
//!
//! Every handler that touches a document calls [`authorize`] explicitly
//! before reading or writing; there is no ambient middleware hook. Denial is
//! `Error::Forbidden`, not a not-found — existence of another user's
//! document is not hidden, access is simply refused.

use crate::{Error, Result, document::Document, user::Principal};

/// The actions the policy is polymorphic over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentAction {
  ViewAny,
  View,
  Create,
  Update,
  Delete,
  Restore,
  ForceDelete,
}

/// `true` iff `principal` may perform `action` on `document`.
///
/// `Create` and `ViewAny` need no target document — holding a `Principal` at
/// all means the caller is authenticated, which is the whole requirement.
/// Every other action reduces to a single rule: the acting principal must be
/// the document's owner.
pub fn can_access(
  principal: &Principal,
  action: DocumentAction,
  document: Option<&Document>,
) -> bool {
  match action {
    DocumentAction::ViewAny | DocumentAction::Create => true,
    DocumentAction::View
    | DocumentAction::Update
    | DocumentAction::Delete
    | DocumentAction::Restore
    | DocumentAction::ForceDelete => {
      document.is_some_and(|d| d.owner_id == principal.id)
    }
  }
}

/// [`can_access`] with denial mapped to [`Error::Forbidden`].
pub fn authorize(
  principal: &Principal,
  action: DocumentAction,
  document: Option<&Document>,
) -> Result<()> {
  if can_access(principal, action, document) {
    Ok(())
  } else {
    Err(Error::Forbidden)
  }
}
