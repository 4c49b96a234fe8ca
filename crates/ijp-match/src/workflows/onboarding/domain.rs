use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Volunteer roles a profile can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Attorney,
    LegalFellow,
    Interpreter,
}

impl Role {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Attorney => "ATTORNEY",
            Self::LegalFellow => "LEGAL_FELLOW",
            Self::Interpreter => "INTERPRETER",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Attorney => "Attorney",
            Self::LegalFellow => "Legal Fellow",
            Self::Interpreter => "Interpreter",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "ATTORNEY" => Some(Self::Attorney),
            "LEGAL_FELLOW" => Some(Self::LegalFellow),
            "INTERPRETER" => Some(Self::Interpreter),
            _ => None,
        }
    }
}

pub type RoleSet = BTreeSet<Role>;

/// Role combinations offered on the roles step, encoded as comma-joined codes.
pub const ROLE_OPTIONS: [&str; 5] = [
    "ATTORNEY",
    "INTERPRETER",
    "LEGAL_FELLOW",
    "ATTORNEY,INTERPRETER",
    "LEGAL_FELLOW,INTERPRETER",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised role option '{0}'")]
pub struct RoleOptionError(pub String);

/// Decode a roles-step option such as `"ATTORNEY,INTERPRETER"`.
pub fn parse_role_option(option: &str) -> Result<RoleSet, RoleOptionError> {
    let roles: Option<RoleSet> = option
        .split(',')
        .map(|code| Role::from_code(code.trim()))
        .collect();

    match roles {
        Some(roles) if !roles.is_empty() => Ok(roles),
        _ => Err(RoleOptionError(option.to_string())),
    }
}

/// Encode a role set back into its roles-step option.
pub fn role_option(roles: &RoleSet) -> String {
    roles
        .iter()
        .map(|role| role.code())
        .collect::<Vec<_>>()
        .join(",")
}

/// Identifier of the authenticated volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Names of the draft fields that can be unset individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    FirstName,
    LastName,
    HoursPerMonth,
    Country,
    State,
    City,
    StartDate,
    AvailabilityDescription,
    PhoneNumber,
    HasBarNumber,
    BarNumber,
    StateBarred,
    EoirRegistered,
    LegalCredentialComment,
    ExpectedBarDate,
}

/// Fields cleared when the attorney role is dropped.
pub const ATTORNEY_FIELDS: [ProfileField; 3] = [
    ProfileField::BarNumber,
    ProfileField::EoirRegistered,
    ProfileField::StateBarred,
];

/// Fields cleared when the legal fellow role is dropped.
pub const LEGAL_FELLOW_FIELDS: [ProfileField; 2] =
    [ProfileField::ExpectedBarDate, ProfileField::EoirRegistered];

/// Profile answers collected so far. Every field is optional until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub hours_per_month: Option<u32>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub availability_description: Option<String>,
    pub phone_number: Option<String>,
    pub has_bar_number: Option<bool>,
    pub bar_number: Option<String>,
    pub state_barred: Option<String>,
    pub eoir_registered: Option<bool>,
    pub legal_credential_comment: Option<String>,
    pub expected_bar_date: Option<NaiveDate>,
}

impl ProfileDraft {
    /// Overlay every field that `update` sets. Fields it leaves `None` are kept.
    pub fn merge(&mut self, update: ProfileDraft) {
        fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        overlay(&mut self.first_name, update.first_name);
        overlay(&mut self.last_name, update.last_name);
        overlay(&mut self.hours_per_month, update.hours_per_month);
        overlay(&mut self.country, update.country);
        overlay(&mut self.state, update.state);
        overlay(&mut self.city, update.city);
        overlay(&mut self.start_date, update.start_date);
        overlay(
            &mut self.availability_description,
            update.availability_description,
        );
        overlay(&mut self.phone_number, update.phone_number);
        overlay(&mut self.has_bar_number, update.has_bar_number);
        overlay(&mut self.bar_number, update.bar_number);
        overlay(&mut self.state_barred, update.state_barred);
        overlay(&mut self.eoir_registered, update.eoir_registered);
        overlay(
            &mut self.legal_credential_comment,
            update.legal_credential_comment,
        );
        overlay(&mut self.expected_bar_date, update.expected_bar_date);
    }

    pub fn unset(&mut self, field: ProfileField) {
        match field {
            ProfileField::FirstName => self.first_name = None,
            ProfileField::LastName => self.last_name = None,
            ProfileField::HoursPerMonth => self.hours_per_month = None,
            ProfileField::Country => self.country = None,
            ProfileField::State => self.state = None,
            ProfileField::City => self.city = None,
            ProfileField::StartDate => self.start_date = None,
            ProfileField::AvailabilityDescription => self.availability_description = None,
            ProfileField::PhoneNumber => self.phone_number = None,
            ProfileField::HasBarNumber => self.has_bar_number = None,
            ProfileField::BarNumber => self.bar_number = None,
            ProfileField::StateBarred => self.state_barred = None,
            ProfileField::EoirRegistered => self.eoir_registered = None,
            ProfileField::LegalCredentialComment => self.legal_credential_comment = None,
            ProfileField::ExpectedBarDate => self.expected_bar_date = None,
        }
    }

    pub fn unset_all<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = ProfileField>,
    {
        for field in fields {
            self.unset(field);
        }
    }

    pub fn is_set(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::FirstName => self.first_name.is_some(),
            ProfileField::LastName => self.last_name.is_some(),
            ProfileField::HoursPerMonth => self.hours_per_month.is_some(),
            ProfileField::Country => self.country.is_some(),
            ProfileField::State => self.state.is_some(),
            ProfileField::City => self.city.is_some(),
            ProfileField::StartDate => self.start_date.is_some(),
            ProfileField::AvailabilityDescription => self.availability_description.is_some(),
            ProfileField::PhoneNumber => self.phone_number.is_some(),
            ProfileField::HasBarNumber => self.has_bar_number.is_some(),
            ProfileField::BarNumber => self.bar_number.is_some(),
            ProfileField::StateBarred => self.state_barred.is_some(),
            ProfileField::EoirRegistered => self.eoir_registered.is_some(),
            ProfileField::LegalCredentialComment => self.legal_credential_comment.is_some(),
            ProfileField::ExpectedBarDate => self.expected_bar_date.is_some(),
        }
    }
}

/// A partial profile update as received from clients: fields to set, fields
/// to clear, and optional replacement language lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    #[serde(flatten)]
    pub set: ProfileDraft,
    pub unset: Vec<ProfileField>,
    pub can_read: Option<Vec<String>>,
    pub can_speak: Option<Vec<String>>,
}

/// Profile row written on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileToUpload {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub hours_per_month: u32,
    pub country: String,
    pub state: String,
    pub city: String,
    pub start_date: NaiveDate,
    pub availability_description: Option<String>,
    pub phone_number: String,
    pub has_bar_number: Option<bool>,
    pub bar_number: Option<String>,
    pub state_barred: Option<String>,
    pub eoir_registered: Option<bool>,
    pub legal_credential_comment: Option<String>,
    pub expected_bar_date: Option<NaiveDate>,
}

/// One language capability row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLanguage {
    pub user_id: UserId,
    pub language_name: String,
    pub can_read: bool,
    pub can_speak: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRole {
    pub user_id: UserId,
    pub role: Role,
}

/// Everything written by a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSubmission {
    pub profile: ProfileToUpload,
    pub languages: Vec<ProfileLanguage>,
    pub roles: Vec<ProfileRole>,
}
