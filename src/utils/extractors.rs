use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::UserRole,
    utils::jwt::Claims,
};

pub fn extract_user_id(claims: &Claims) -> Result<Uuid> {
    claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AppError::Unauthorized("Unauthorized".to_string()))
}

/// Gate a handler on a single role; the message is surfaced to the caller.
pub fn require_role(claims: &Claims, role: UserRole, message: &str) -> Result<()> {
    if claims.role != role {
        return Err(AppError::Forbidden(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            role,
            exp: 0,
        }
    }

    #[test]
    fn user_id_parses_from_subject() {
        let c = claims(UserRole::Customer);
        assert_eq!(extract_user_id(&c).unwrap().to_string(), c.sub);
    }

    #[test]
    fn malformed_subject_is_unauthorized() {
        let c = Claims {
            sub: "42".to_string(),
            role: UserRole::Customer,
            exp: 0,
        };
        assert!(matches!(
            extract_user_id(&c),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let c = claims(UserRole::Customer);
        assert!(require_role(&c, UserRole::Customer, "nope").is_ok());
        assert!(matches!(
            require_role(&c, UserRole::ShopOwner, "nope"),
            Err(AppError::Forbidden(_))
        ));
    }
}
