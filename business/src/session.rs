//! The signed-in account and the partner it is acting for.

use crate::portal::Partner;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
    user_name: String,
    partners: Vec<Partner>,
    selected: usize,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, user_name: impl Into<String>, partners: Vec<Partner>) -> Self {
        Self {
            token: Some(token.into()),
            user_name: user_name.into(),
            partners,
            selected: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn current_partner(&self) -> Option<&Partner> {
        self.partners.get(self.selected)
    }

    /// Switches partner; an out-of-range index leaves the selection alone.
    pub fn change_partner(&mut self, index: usize) -> bool {
        if index >= self.partners.len() {
            log::warn!("Ignoring partner index {index}, only {} available", self.partners.len());
            return false;
        }
        self.selected = index;
        true
    }

    pub fn sign_out(&mut self) {
        log::info!("Signing out {}", self.user_name);
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner(id: &str) -> Partner {
        Partner {
            id: id.to_owned(),
            name: format!("Partner {id}"),
            custom_message: None,
        }
    }

    fn session() -> AuthSession {
        AuthSession::new("jwt", "ops", vec![partner("p1"), partner("p2")])
    }

    #[test]
    fn first_partner_is_selected_initially() {
        let session = session();
        assert!(session.is_authenticated());
        assert_eq!(session.current_partner().map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn change_partner_ignores_out_of_range() {
        let mut session = session();

        assert!(session.change_partner(1));
        assert_eq!(session.selected_index(), 1);

        assert!(!session.change_partner(5));
        assert_eq!(session.current_partner().map(|p| p.id.as_str()), Some("p2"));
    }

    #[test]
    fn sign_out_clears_everything() {
        let mut session = session();
        session.sign_out();

        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.current_partner().is_none());
    }
}
