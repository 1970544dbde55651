//! Phone-number lookup for the assign-assessment form.

use crate::portal::PartnerUser;

/// Country code the backend stores phone numbers with.
pub const COUNTRY_PREFIX: &str = "91";

pub const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookupStatus {
    #[default]
    Idle,
    Searching,
    Existing(PartnerUser),
    NotFound,
}

/// A search the caller should run; hand `generation` back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub generation: u64,
    pub phone: String,
}

#[derive(Debug, Clone, Default)]
pub struct PhoneLookup {
    input: String,
    generation: u64,
    status: LookupStatus,
}

impl PhoneLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> &LookupStatus {
        &self.status
    }

    pub fn is_complete(&self) -> bool {
        self.input.len() == PHONE_DIGITS && self.input.bytes().all(|b| b.is_ascii_digit())
    }

    /// Phone number with the country prefix, as stored by the backend.
    pub fn full_phone(&self) -> String {
        format!("{COUNTRY_PREFIX}{}", self.input)
    }

    pub fn existing_user(&self) -> Option<&PartnerUser> {
        match &self.status {
            LookupStatus::Existing(user) => Some(user),
            _ => None,
        }
    }

    /// Records an edit. Any change drops the previous result; a complete
    /// number starts a new search.
    pub fn set_input(&mut self, input: &str) -> Option<LookupRequest> {
        let input = input.trim();
        if input == self.input {
            return None;
        }
        self.input = input.to_owned();
        self.generation += 1;

        if !self.is_complete() {
            self.status = LookupStatus::Idle;
            return None;
        }
        self.status = LookupStatus::Searching;
        Some(LookupRequest {
            generation: self.generation,
            phone: self.full_phone(),
        })
    }

    /// Applies a search result. Results for an older input are dropped.
    pub fn resolve<E: std::fmt::Display>(
        &mut self,
        generation: u64,
        result: Result<Option<PartnerUser>, E>,
    ) -> bool {
        if generation != self.generation {
            log::debug!("Dropping stale lookup result {generation}, now at {}", self.generation);
            return false;
        }
        self.status = match result {
            Ok(Some(user)) if !user.name.trim().is_empty() => LookupStatus::Existing(user),
            Ok(_) => LookupStatus::NotFound,
            Err(err) => {
                log::info!("User lookup failed, treating as new user: {err}");
                LookupStatus::NotFound
            }
        };
        true
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.generation += 1;
        self.status = LookupStatus::Idle;
    }
}
