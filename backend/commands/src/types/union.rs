use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use parley_core::ParleyError;

use super::{ValueContext, ValueType};
use crate::value::{ArgValue, Validation};

/// Separator between component ids in a union's registry id.
pub const UNION_SEPARATOR: char = '|';

/// Several value types tried in declared order.
///
/// A value is valid if any component accepts it; it is parsed by the first
/// component, in declared order, that accepts it.
pub struct UnionType {
    id: String,
    types: Vec<Arc<dyn ValueType>>,
}

impl UnionType {
    pub fn new(types: Vec<Arc<dyn ValueType>>) -> Self {
        let id = types
            .iter()
            .map(|t| t.id())
            .collect::<Vec<_>>()
            .join(&UNION_SEPARATOR.to_string());
        Self { id, types }
    }

    pub fn components(&self) -> &[Arc<dyn ValueType>] {
        &self.types
    }

    /// Validate with every component that does not consider `raw` empty,
    /// concurrently. Skipped components yield `None`.
    async fn validate_each(
        &self,
        raw: &str,
        ctx: &ValueContext<'_>,
    ) -> Result<Vec<Option<Validation>>> {
        let checks = self.types.iter().map(|t| async move {
            if t.is_empty(raw, ctx) {
                Ok(None)
            } else {
                t.validate(raw, ctx).await.map(Some)
            }
        });
        join_all(checks).await.into_iter().collect()
    }
}

#[async_trait]
impl ValueType for UnionType {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_empty(&self, raw: &str, ctx: &ValueContext<'_>) -> bool {
        self.types.iter().all(|t| t.is_empty(raw, ctx))
    }

    async fn validate(&self, raw: &str, ctx: &ValueContext<'_>) -> Result<Validation> {
        let outcomes: Vec<Validation> =
            self.validate_each(raw, ctx).await?.into_iter().flatten().collect();
        if outcomes.iter().any(Validation::is_valid) {
            return Ok(Validation::valid());
        }
        let reasons: Vec<&str> = outcomes.iter().filter_map(Validation::reason).collect();
        if reasons.is_empty() {
            Ok(Validation::invalid())
        } else {
            Ok(Validation::reject(reasons.join("\n")))
        }
    }

    async fn parse(
        &self,
        raw: &str,
        ctx: &ValueContext<'_>,
        _resolved: Option<ArgValue>,
    ) -> Result<ArgValue> {
        let outcomes = self.validate_each(raw, ctx).await?;
        for (ty, outcome) in self.types.iter().zip(outcomes) {
            if let Some(Validation::Valid(resolved)) = outcome {
                return ty.parse(raw, ctx, resolved).await;
            }
        }
        Err(ParleyError::ContractViolation(format!(
            "no type in union \"{}\" accepts \"{raw}\"; parse was called without a successful validate",
            self.id
        ))
        .into())
    }
}
