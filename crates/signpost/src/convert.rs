//! String-to-value conversion registry.
//!
//! Every argument slot of a registered command names a target type; at
//! dispatch time the raw token for that slot is run through the converter
//! registered for the type. The registry is keyed by [`TypeId`] and stores
//! type-erased converters producing `Box<dyn Any>`, so commands with
//! arbitrary heterogeneous signatures share one table.
//!
//! Primitive conversions are seeded at construction; everything else must be
//! registered by the caller before a command using the type is added.
//! Registering a converter for a type that already has one replaces it.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A converted argument value, erased to its registered type.
pub(crate) type BoxedValue = Box<dyn Any>;

type ConvertFn = Box<dyn Fn(&str) -> Result<BoxedValue, anyhow::Error>>;

/// Why a conversion attempt produced no value.
///
/// The two cases are deliberately distinct: a missing converter is a setup
/// mistake (a command references a type nobody registered), while a failed
/// conversion is ordinary bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConvertError {
    /// No converter is registered for the slot's type.
    NoConverter,
    /// The converter rejected the token.
    Failed,
}

/// Registry of string-to-value converters, keyed by target type.
pub(crate) struct ConversionRegistry {
    converters: HashMap<TypeId, ConvertFn>,
}

impl ConversionRegistry {
    /// Creates a registry seeded with the primitive conversions: the integer
    /// types `i32`/`i64`/`u32`/`u64`, the float types `f32`/`f64`, `bool`,
    /// and `String`.
    pub(crate) fn new() -> Self {
        let mut registry = Self {
            converters: HashMap::new(),
        };
        registry.register(|token: &str| token.parse::<i32>());
        registry.register(|token: &str| token.parse::<i64>());
        registry.register(|token: &str| token.parse::<u32>());
        registry.register(|token: &str| token.parse::<u64>());
        registry.register(|token: &str| token.parse::<f32>());
        registry.register(|token: &str| token.parse::<f64>());
        registry.register(|token: &str| token.parse::<bool>());
        registry.register(|token: &str| Ok::<_, std::convert::Infallible>(token.to_string()));
        registry
    }

    /// Registers a converter for `T`, replacing any existing one.
    pub(crate) fn register<T, E>(&mut self, convert: impl Fn(&str) -> Result<T, E> + 'static)
    where
        T: 'static,
        E: Into<anyhow::Error>,
    {
        let erased: ConvertFn = Box::new(move |token| {
            convert(token)
                .map(|value| Box::new(value) as BoxedValue)
                .map_err(Into::into)
        });
        self.converters.insert(TypeId::of::<T>(), erased);
    }

    /// Returns true if a converter is registered for the type.
    pub(crate) fn contains(&self, type_id: TypeId) -> bool {
        self.converters.contains_key(&type_id)
    }

    /// Converts a token for the given type.
    pub(crate) fn convert(&self, type_id: TypeId, token: &str) -> Result<BoxedValue, ConvertError> {
        let converter = self
            .converters
            .get(&type_id)
            .ok_or(ConvertError::NoConverter)?;
        converter(token).map_err(|_| ConvertError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_as<T: 'static>(registry: &ConversionRegistry, token: &str) -> T {
        let value = registry.convert(TypeId::of::<T>(), token).unwrap();
        *value.downcast::<T>().unwrap()
    }

    #[test]
    fn test_builtin_conversions() {
        let registry = ConversionRegistry::new();

        assert_eq!(convert_as::<i32>(&registry, "-42"), -42);
        assert_eq!(convert_as::<u64>(&registry, "42"), 42);
        assert_eq!(convert_as::<f64>(&registry, "12.5"), 12.5);
        assert!(convert_as::<bool>(&registry, "true"));
        assert_eq!(convert_as::<String>(&registry, "hello"), "hello");
    }

    #[test]
    fn test_failed_conversion() {
        let registry = ConversionRegistry::new();
        let result = registry.convert(TypeId::of::<i32>(), "twelve");
        assert_eq!(result.unwrap_err(), ConvertError::Failed);
    }

    #[test]
    fn test_missing_converter() {
        struct Unregistered;

        let registry = ConversionRegistry::new();
        let result = registry.convert(TypeId::of::<Unregistered>(), "anything");
        assert_eq!(result.unwrap_err(), ConvertError::NoConverter);
    }

    #[test]
    fn test_register_custom_type() {
        struct Celsius(f64);

        let mut registry = ConversionRegistry::new();
        registry.register(|token: &str| token.parse::<f64>().map(Celsius));

        let value = convert_as::<Celsius>(&registry, "21.5");
        assert_eq!(value.0, 21.5);
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = ConversionRegistry::new();
        registry.register(|token: &str| token.parse::<i32>().map(|v| v * 2));

        assert_eq!(convert_as::<i32>(&registry, "21"), 42);
    }
}
