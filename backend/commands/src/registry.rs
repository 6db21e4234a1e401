/// Value type registry: id → type lookup, with union types built and cached
/// on first request.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::ArgumentConfigError;
use crate::types::{
    BooleanType, DurationType, EntityDirectory, EntityType, FloatType, IntegerType, StringType,
    UNION_SEPARATOR, UnionType, ValueType,
};
use crate::value::EntityKind;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Builds a type once the registry it will live in is available.
pub type TypeFactory = Box<dyn FnOnce(&TypeRegistry) -> Arc<dyn ValueType> + Send>;

/// How a type is handed to [`TypeRegistry::register`].
pub enum TypeRegistration {
    /// A ready-made instance.
    Instance(Arc<dyn ValueType>),
    /// A constructor that may look up other registered types.
    Factory(TypeFactory),
}

impl TypeRegistration {
    pub fn instance(ty: impl ValueType + 'static) -> Self {
        TypeRegistration::Instance(Arc::new(ty))
    }

    pub fn factory(
        f: impl FnOnce(&TypeRegistry) -> Arc<dyn ValueType> + Send + 'static,
    ) -> Self {
        TypeRegistration::Factory(Box::new(f))
    }
}

fn check_id(id: &str) -> Result<(), ArgumentConfigError> {
    let ok = !id.is_empty() && id.to_lowercase() == id && !id.contains(UNION_SEPARATOR);
    if ok { Ok(()) } else { Err(ArgumentConfigError::InvalidTypeId(id.to_string())) }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<dyn ValueType>>>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { types: RwLock::new(HashMap::new()) }
    }

    /// A registry holding the built-in scalar types.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register `boolean`, `integer`, `float`, `string`, and `duration`.
    /// Already-registered ids are left alone.
    pub fn register_defaults(&self) {
        let defaults: [Arc<dyn ValueType>; 5] = [
            Arc::new(BooleanType),
            Arc::new(IntegerType),
            Arc::new(FloatType),
            Arc::new(StringType),
            Arc::new(DurationType),
        ];
        for ty in defaults {
            if !self.has(ty.id()) {
                let _ = self.register(TypeRegistration::Instance(ty));
            }
        }
    }

    /// Register `user`, `channel`, and `role`, all backed by `directory`.
    pub fn register_entity_types(
        &self,
        directory: Arc<dyn EntityDirectory>,
    ) -> Result<(), ArgumentConfigError> {
        for kind in [EntityKind::User, EntityKind::Channel, EntityKind::Role] {
            let ty = EntityType::new(kind, directory.clone());
            self.register(TypeRegistration::instance(ty))?;
        }
        Ok(())
    }

    pub fn register(&self, registration: TypeRegistration) -> Result<(), ArgumentConfigError> {
        let ty = match registration {
            TypeRegistration::Instance(ty) => ty,
            TypeRegistration::Factory(build) => build(self),
        };
        let id = ty.id().to_string();
        check_id(&id)?;

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if types.contains_key(&id) {
            return Err(ArgumentConfigError::DuplicateType(id));
        }
        debug!(type_id = %id, "Registered value type");
        types.insert(id, ty);
        Ok(())
    }

    /// Look up a type. `a|b` ids resolve to a cached [`UnionType`] over the
    /// registered components; `None` if any component is unknown.
    pub fn get(&self, id: &str) -> Option<Arc<dyn ValueType>> {
        if let Some(ty) = self.read(id) {
            return Some(ty);
        }
        if !id.contains(UNION_SEPARATOR) {
            return None;
        }

        let components = id
            .split(UNION_SEPARATOR)
            .map(|part| self.read(part.trim()))
            .collect::<Option<Vec<_>>>()?;
        let union: Arc<dyn ValueType> = Arc::new(UnionType::new(components));

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let cached = types.entry(id.to_string()).or_insert_with(|| {
            debug!(type_id = %id, "Built union type");
            union
        });
        Some(cached.clone())
    }

    pub fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ids of every registered type, including cached unions, sorted.
    pub fn ids(&self) -> Vec<String> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = types.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn read(&self, id: &str) -> Option<Arc<dyn ValueType>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
