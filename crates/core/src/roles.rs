//! Well-known role name constants.
//!
//! These are the values stored in `users.role`.

pub const ROLE_FIRM_OWNER: &str = "firm_owner";
pub const ROLE_FIRM_STAFF: &str = "firm_staff";
pub const ROLE_CLIENT: &str = "client";

/// Whether a role may author templates and drive the render/send side of
/// the document lifecycle. Recording a signature deliberately does not go
/// through this check -- the signer may be an external recipient.
pub fn is_firm_author(role: &str) -> bool {
    role == ROLE_FIRM_OWNER || role == ROLE_FIRM_STAFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_staff_are_authors() {
        assert!(is_firm_author(ROLE_FIRM_OWNER));
        assert!(is_firm_author(ROLE_FIRM_STAFF));
    }

    #[test]
    fn client_is_not_an_author() {
        assert!(!is_firm_author(ROLE_CLIENT));
        assert!(!is_firm_author("admin"));
        assert!(!is_firm_author(""));
    }
}
