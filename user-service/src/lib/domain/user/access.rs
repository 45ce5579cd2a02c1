//! Role-based access decisions.
//!
//! Every protected operation lists the roles allowed to perform it in
//! [`Operation::requirement`]. Membership is flat: `ADMIN` gains nothing it
//! is not explicitly granted.

use crate::user::errors::UserError;
use crate::user::models::Role;
use crate::user::models::UserId;

/// Authenticated principal making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

/// Operations exposed by the user service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    Login,
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
    UpdateRole,
    UploadProfileImage,
}

/// What an actor needs to perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// No restriction; anonymous callers included.
    Public,
    /// Any signed-in actor. The operation targets the actor's own record.
    Authenticated,
    /// Actor role must be one of these.
    Roles(&'static [Role]),
    /// Actor must own the target, or hold one of these roles.
    OwnerOrRoles(&'static [Role]),
}

impl Operation {
    pub fn requirement(self) -> Requirement {
        match self {
            Operation::CreateUser
            | Operation::Login
            | Operation::ListUsers
            | Operation::GetUser => Requirement::Public,
            Operation::UpdateUser | Operation::DeleteUser => {
                Requirement::OwnerOrRoles(&[Role::Admin])
            }
            Operation::UpdateRole => Requirement::Roles(&[Role::Admin]),
            Operation::UploadProfileImage => Requirement::Authenticated,
        }
    }
}

/// Allow iff `actor` is in `required`, or nothing is required.
pub fn decide(required: &[Role], actor: Role) -> bool {
    required.is_empty() || required.contains(&actor)
}

/// Allow iff the actor is the owner of the resource.
pub fn decide_self(actor: &UserId, owner: &UserId) -> bool {
    actor == owner
}

/// Evaluate the requirement of `operation` for `actor` acting on `owner`.
///
/// `None` is an anonymous caller; only `Public` operations admit it.
pub fn is_allowed(operation: Operation, actor: Option<&Actor>, owner: Option<&UserId>) -> bool {
    let Some(actor) = actor else {
        return operation.requirement() == Requirement::Public;
    };
    let is_owner = owner.is_some_and(|owner| decide_self(&actor.id, owner));
    match operation.requirement() {
        Requirement::Public | Requirement::Authenticated => true,
        Requirement::Roles(roles) => decide(roles, actor.role),
        Requirement::OwnerOrRoles(roles) => is_owner || roles.contains(&actor.role),
    }
}

/// Like [`is_allowed`]. Anonymous denial is `Unauthenticated`, any other is `Forbidden`.
pub fn authorize(
    operation: Operation,
    actor: Option<&Actor>,
    owner: Option<&UserId>,
) -> Result<(), UserError> {
    if is_allowed(operation, actor, owner) {
        return Ok(());
    }

    match actor {
        None => {
            tracing::warn!(operation = ?operation, "Anonymous access denied");
            Err(UserError::Unauthenticated)
        }
        Some(actor) => {
            tracing::warn!(
                actor_id = %actor.id,
                actor_role = %actor.role,
                operation = ?operation,
                "Access denied"
            );
            Err(UserError::Forbidden(format!(
                "role {} may not perform {:?}",
                actor.role, operation
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: UserId::new(),
            role,
        }
    }

    #[test]
    fn test_decide_is_flat_membership() {
        assert!(decide(&[Role::Admin], Role::Admin));
        assert!(!decide(&[Role::Admin], Role::Mod));
        assert!(!decide(&[Role::Admin], Role::User));
        assert!(!decide(&[Role::User], Role::Admin));
        assert!(decide(&[Role::Mod, Role::User], Role::User));
    }

    #[test]
    fn test_decide_with_no_required_roles_allows_everyone() {
        assert!(decide(&[], Role::User));
        assert!(decide(&[], Role::Admin));
    }

    #[test]
    fn test_decide_self() {
        let id = UserId::new();
        assert!(decide_self(&id, &id));
        assert!(!decide_self(&id, &UserId::new()));
    }

    #[test]
    fn test_update_role_requires_admin() {
        let target = UserId::new();

        assert!(is_allowed(Operation::UpdateRole, Some(&actor(Role::Admin)), Some(&target)));
        assert!(!is_allowed(Operation::UpdateRole, Some(&actor(Role::Mod)), Some(&target)));
        assert!(!is_allowed(Operation::UpdateRole, Some(&actor(Role::User)), Some(&target)));
    }

    #[test]
    fn test_owner_cannot_change_own_role() {
        let me = actor(Role::User);
        assert!(!is_allowed(Operation::UpdateRole, Some(&me), Some(&me.id)));
    }

    #[test]
    fn test_update_user_owner_or_admin() {
        let me = actor(Role::User);
        let other = UserId::new();

        assert!(is_allowed(Operation::UpdateUser, Some(&me), Some(&me.id)));
        assert!(!is_allowed(Operation::UpdateUser, Some(&me), Some(&other)));
        assert!(!is_allowed(Operation::DeleteUser, Some(&actor(Role::Mod)), Some(&other)));
        assert!(is_allowed(Operation::DeleteUser, Some(&actor(Role::Admin)), Some(&other)));
    }

    #[test]
    fn test_upload_needs_a_signed_in_actor() {
        for role in [Role::Admin, Role::Mod, Role::User] {
            assert!(is_allowed(Operation::UploadProfileImage, Some(&actor(role)), None));
        }
        assert!(!is_allowed(Operation::UploadProfileImage, None, None));
    }

    #[test]
    fn test_public_operations_admit_anonymous_callers() {
        for operation in [
            Operation::CreateUser,
            Operation::Login,
            Operation::ListUsers,
            Operation::GetUser,
        ] {
            assert!(is_allowed(operation, None, None));
            assert!(is_allowed(operation, Some(&actor(Role::User)), None));
            assert!(authorize(operation, None, None).is_ok());
        }
    }

    #[test]
    fn test_protected_operations_reject_anonymous_callers() {
        let target = UserId::new();
        for operation in [
            Operation::UpdateUser,
            Operation::DeleteUser,
            Operation::UpdateRole,
            Operation::UploadProfileImage,
        ] {
            assert!(!is_allowed(operation, None, Some(&target)));
            assert!(matches!(
                authorize(operation, None, Some(&target)),
                Err(UserError::Unauthenticated)
            ));
        }
    }

    #[test]
    fn test_authorize_returns_forbidden() {
        let result = authorize(Operation::UpdateRole, Some(&actor(Role::User)), None);
        assert!(matches!(result, Err(UserError::Forbidden(_))));
    }
}
