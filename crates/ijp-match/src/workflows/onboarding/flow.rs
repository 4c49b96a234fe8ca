use serde::{Deserialize, Serialize};

use super::domain::{Role, RoleSet};

/// A single onboarding page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowStep {
    pub name: &'static str,
    pub url: &'static str,
}

const fn step(name: &'static str, url: &'static str) -> FlowStep {
    FlowStep { name, url }
}

const ROLES: FlowStep = step("Roles", "roles");
const BASIC_INFO: FlowStep = step("Basic Info", "basic-information");
const AVAILABILITY: FlowStep = step("Availability", "availability");
const LEGAL_CREDENTIALS: FlowStep = step("Legal Credentials", "legal-credentials");
const LEGAL_FELLOW_CREDENTIALS: FlowStep = step("Legal Credentials", "legal-fellow-credentials");
const REVIEW: FlowStep = step("Review & Submit", "review");

pub const ATTORNEY_FLOW: [FlowStep; 5] = [
    ROLES,
    BASIC_INFO,
    AVAILABILITY,
    LEGAL_CREDENTIALS,
    REVIEW,
];

pub const LEGAL_FELLOW_FLOW: [FlowStep; 5] = [
    ROLES,
    BASIC_INFO,
    AVAILABILITY,
    LEGAL_FELLOW_CREDENTIALS,
    REVIEW,
];

pub const INTERPRETER_FLOW: [FlowStep; 4] = [ROLES, BASIC_INFO, AVAILABILITY, REVIEW];

/// Highest step index kept when a credentials branch is abandoned.
pub const CREDENTIALS_INDEX: usize = 3;

/// The three step sequences a volunteer can be routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Attorney,
    LegalFellow,
    Interpreter,
}

impl Flow {
    /// Attorney wins over legal fellow; anything else is interpreter-only.
    pub fn for_roles(roles: &RoleSet) -> Self {
        if roles.contains(&Role::Attorney) {
            Self::Attorney
        } else if roles.contains(&Role::LegalFellow) {
            Self::LegalFellow
        } else {
            Self::Interpreter
        }
    }

    pub const fn steps(self) -> &'static [FlowStep] {
        match self {
            Self::Attorney => &ATTORNEY_FLOW,
            Self::LegalFellow => &LEGAL_FELLOW_FLOW,
            Self::Interpreter => &INTERPRETER_FLOW,
        }
    }

    pub fn step(self, index: usize) -> Option<&'static FlowStep> {
        self.steps().get(index)
    }

    pub fn last_index(self) -> usize {
        self.steps().len() - 1
    }

    pub fn position(self, url: &str) -> Option<usize> {
        self.steps().iter().position(|step| step.url == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attorney_takes_precedence() {
        let roles = RoleSet::from([Role::LegalFellow, Role::Attorney]);
        assert_eq!(Flow::for_roles(&roles), Flow::Attorney);

        let roles = RoleSet::from([Role::LegalFellow, Role::Interpreter]);
        assert_eq!(Flow::for_roles(&roles), Flow::LegalFellow);

        let roles = RoleSet::from([Role::Interpreter]);
        assert_eq!(Flow::for_roles(&roles), Flow::Interpreter);
    }

    #[test]
    fn flows_share_prologue_and_epilogue() {
        for flow in [Flow::Attorney, Flow::LegalFellow, Flow::Interpreter] {
            let urls: Vec<&str> = flow.steps().iter().map(|s| s.url).collect();
            assert_eq!(&urls[..3], ["roles", "basic-information", "availability"]);
            assert_eq!(urls.last(), Some(&"review"));
        }
        assert_eq!(
            Flow::LegalFellow.step(CREDENTIALS_INDEX).map(|s| s.url),
            Some("legal-fellow-credentials")
        );
        assert_eq!(Flow::Interpreter.last_index(), 3);
    }
}
