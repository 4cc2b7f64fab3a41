//! Availability checks and unique code generation for the shared namespace.

use serde_json::json;

use crate::domain::codespace::{Codespace, Namespace};
use crate::error::AppError;
use crate::utils::code_generator::{generate_candidate, is_reserved};

/// Attempts at finding a free generated code before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Checks codes against every namespace that draws from the shared pool.
///
/// The pre-check only produces a friendly error early. The `reserved_codes`
/// primary key is what actually enforces uniqueness when two creators race.
#[derive(Clone)]
pub struct AliasService {
    codespace: Codespace,
}

impl AliasService {
    pub fn new(codespace: Codespace) -> Self {
        Self { codespace }
    }

    /// True only if `code` is absent from all three namespaces.
    pub async fn validate_availability(&self, code: &str) -> Result<bool, AppError> {
        let taken = self.codespace.first_match(&Namespace::ALL, code).await?;
        Ok(taken.is_none())
    }

    /// Fails with the "already taken" conflict if `code` is in use anywhere.
    pub async fn ensure_available(&self, code: &str) -> Result<(), AppError> {
        if self.validate_availability(code).await? {
            Ok(())
        } else {
            Err(AppError::taken(code))
        }
    }

    /// Generates a code that is currently free in every namespace and is not
    /// a reserved route word.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] after [`MAX_GENERATION_ATTEMPTS`]
    /// consecutive collisions.
    pub async fn generate_unique_code(&self) -> Result<String, AppError> {
        self.generate_with(generate_candidate).await
    }

    async fn generate_with(
        &self,
        mut next_candidate: impl FnMut() -> String,
    ) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = next_candidate();

            if is_reserved(&code) {
                tracing::debug!(code, "Generated code is a reserved word, retrying");
                continue;
            }

            if self.validate_availability(&code).await? {
                return Ok(code);
            }

            tracing::debug!(code, "Generated code collided, retrying");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}
