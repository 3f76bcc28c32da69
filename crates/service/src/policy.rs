//! Access policy: a caller may act on a resource they own, and admins may act on anything.

use tracing::warn;

use crate::auth::domain::Principal;
use crate::errors::ServiceError;

pub fn can_access(principal: &Principal, owner_id: i32) -> bool {
    principal.is_admin() || principal.id == owner_id
}

/// `Forbidden` unless `principal` owns the resource or is an admin.
pub fn authorize(principal: &Principal, owner_id: i32) -> Result<(), ServiceError> {
    if can_access(principal, owner_id) {
        return Ok(());
    }
    warn!(principal_id = principal.id, owner_id, "access denied");
    Err(ServiceError::Forbidden("you don't have permission to access this resource".into()))
}

/// Only admins may change anyone's role, including their own.
pub fn authorize_role_change(principal: &Principal) -> Result<(), ServiceError> {
    if principal.is_admin() {
        return Ok(());
    }
    warn!(principal_id = principal.id, "role change denied");
    Err(ServiceError::Forbidden("only admins can change user roles".into()))
}
