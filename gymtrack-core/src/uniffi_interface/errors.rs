use thiserror::Error as ThisError;
use uniffi::Error;

/// Flat error surface for the mobile shell. The shell routes `Unauthorized`
/// and `NotAuthenticated` to the login screen and shows the rest as text.
#[derive(Debug, ThisError, Error)]
#[non_exhaustive]
pub enum GymtrackError {
    #[error("session expired, please sign in again")]
    Unauthorized,
    #[error("not signed in")]
    NotAuthenticated,
    #[error("{message}")]
    Forbidden { message: String },
    #[error("{message}")]
    Validation { message: String },
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("{message}")]
    PartialFailure { message: String },
    #[error("cancelled")]
    Cancelled,
    #[error("error: {0}")]
    Common(String),
}

impl From<crate::Error> for GymtrackError {
    fn from(e: crate::Error) -> Self {
        use crate::Error;
        match e {
            Error::Unauthorized => GymtrackError::Unauthorized,
            Error::NotAuthenticated => GymtrackError::NotAuthenticated,
            Error::Forbidden { .. } => GymtrackError::Forbidden {
                message: e.to_string(),
            },
            Error::Validation(errors) => GymtrackError::Validation {
                message: errors.to_string(),
            },
            Error::Http { status, message } => GymtrackError::Http { status, message },
            Error::PartialFailure { .. } => GymtrackError::PartialFailure {
                message: e.to_string(),
            },
            Error::Cancelled => GymtrackError::Cancelled,
            other => GymtrackError::Common(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for GymtrackError {
    fn from(e: anyhow::Error) -> Self {
        GymtrackError::Common(e.to_string())
    }
}

impl From<String> for GymtrackError {
    fn from(s: String) -> Self {
        GymtrackError::Common(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::validation::ValidationErrors;

    #[test]
    fn keeps_the_categories_the_shell_routes_on() {
        assert!(matches!(
            GymtrackError::from(crate::Error::Unauthorized),
            GymtrackError::Unauthorized
        ));

        let mut errors = ValidationErrors::new();
        errors.add("email", "is required");
        match GymtrackError::from(crate::Error::Validation(errors)) {
            GymtrackError::Validation { message } => assert!(message.contains("email")),
            other => panic!("unexpected {:?}", other),
        }

        let forbidden = crate::Error::Forbidden {
            required: Role::Gym,
            actual: Role::Premium,
        };
        assert!(matches!(
            GymtrackError::from(forbidden),
            GymtrackError::Forbidden { .. }
        ));
    }
}
