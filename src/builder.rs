use crate::snapshot::Snapshot;
use crate::value::FlagValue;
use crate::Registry;

#[derive(Debug, Clone)]
struct Declaration {
    name: String,
    default_value: FlagValue,
    description: String,
}

#[derive(Default, Debug, Clone)]
pub struct Builder {
    declarations: Vec<Declaration>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            declarations: vec![],
        }
    }

    /// Declare a flag to be defined when the registry is built.
    ///
    /// Declarations are applied in order with [`Registry::define`], so the
    /// first declaration of a name wins:
    ///
    /// ```rust
    /// use flag_registry::Builder;
    ///
    /// let registry = Builder::new()
    ///   .add_flag("dark_mode", true, "Enable dark mode UI")
    ///   .add_flag("dark_mode", false, "")
    ///   .build();
    ///
    /// assert!(registry.is_enabled("dark_mode"));
    /// ```
    pub fn add_flag(
        mut self,
        name: impl Into<String>,
        default_value: impl Into<FlagValue>,
        description: impl Into<String>,
    ) -> Self {
        self.declarations.push(Declaration {
            name: name.into(),
            default_value: default_value.into(),
            description: description.into(),
        });
        self
    }

    /// Declare every flag in a snapshot, with its value as the default.
    pub fn set_flags(mut self, flags: Option<Snapshot>) -> Self {
        let Some(flags) = flags else {
            return self;
        };

        self.declarations
            .extend(flags.into_iter().map(|(name, entry)| Declaration {
                name,
                default_value: entry.value,
                description: entry.description,
            }));
        self
    }

    #[tracing::instrument(skip(self), fields(declarations = self.declarations.len()))]
    pub fn build(self) -> Registry {
        let registry = Registry::new();
        self.build_into(&registry);
        registry
    }

    /// Define the declared flags in an existing registry.
    ///
    /// Names that are already defined there keep their current value.
    #[tracing::instrument(skip_all, fields(declarations = self.declarations.len()))]
    pub fn build_into(self, registry: &Registry) {
        for declaration in self.declarations {
            registry.define(
                declaration.name,
                declaration.default_value,
                declaration.description,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_declared_flags() {
        let registry = Builder::new()
            .add_flag("dark_mode", true, "Enable dark mode UI")
            .add_flag("max_connections", 100, "Maximum number of connections")
            .add_flag("timeout_seconds", 30.5, "")
            .add_flag("api_endpoint", "https://api.example.com", "API endpoint URL")
            .build();

        assert_eq!(registry.len(), 4);
        assert!(registry.is_enabled("dark_mode"));
        assert_eq!(registry.get_value::<i64>("max_connections"), Some(100));
        assert_eq!(registry.get_value::<f64>("timeout_seconds"), Some(30.5));
        assert_eq!(
            registry.get("api_endpoint").unwrap().description(),
            "API endpoint URL"
        );
    }

    #[test]
    fn first_declaration_wins() {
        let registry = Registry::builder()
            .add_flag("retries", 3, "first")
            .add_flag("retries", "many", "second")
            .build();

        let flag = registry.get("retries").unwrap();
        assert_eq!(flag.get::<i64>(), Some(3));
        assert_eq!(flag.description(), "first");
    }

    #[test]
    fn build_into_keeps_existing_values() {
        let registry = Registry::new();
        registry.define("retries", 5, "");

        Builder::new()
            .add_flag("retries", 3, "")
            .add_flag("verbose", false, "")
            .build_into(&registry);

        assert_eq!(registry.get_value::<i64>("retries"), Some(5));
        assert!(registry.exists("verbose"));
    }

    #[test]
    fn seeds_from_a_snapshot() {
        let original = Builder::new()
            .add_flag("dark_mode", true, "Enable dark mode UI")
            .add_flag("max_connections", 100, "")
            .build();
        original.update("max_connections", 200);

        let copy = Builder::new()
            .set_flags(Some(original.snapshot()))
            .set_flags(None)
            .build();

        assert_eq!(copy.snapshot(), original.snapshot());
        assert_eq!(copy.get_value::<i64>("max_connections"), Some(200));
    }
}
