//! The three mapping tables of a remapping host.

use std::{
    collections::{BTreeMap, HashMap},
    sync::OnceLock,
};

/// Type, field and method mappings from plugin-facing names to the names present in the
/// running host.
///
/// All names are slash-delimited internal names. Keys follow the fork's jar mapping layout:
///
/// | Table   | Key                              | Value               |
/// |---------|----------------------------------|---------------------|
/// | types   | `owner`                          | mapped type name    |
/// | fields  | `owner/field`                    | mapped field name   |
/// | methods | `owner/method (descriptor)`      | mapped method name  |
///
/// The tables are ordered so that scans are deterministic. A table is built once, through
/// the `with_*` methods or [`crate::remap::parse_srg`], and is read-only afterwards.
#[derive(Debug, Default)]
pub struct RemapTable {
    types: BTreeMap<String, String>,
    fields: BTreeMap<String, String>,
    methods: BTreeMap<String, String>,
    /// Mapped type name to its first unmapped key, built on first reverse lookup
    reverse_types: OnceLock<HashMap<String, String>>,
}

impl RemapTable {
    /// Creates a table from prepared maps.
    #[must_use]
    pub fn new(
        types: BTreeMap<String, String>,
        fields: BTreeMap<String, String>,
        methods: BTreeMap<String, String>,
    ) -> Self {
        RemapTable {
            types,
            fields,
            methods,
            reverse_types: OnceLock::new(),
        }
    }

    /// Adds a type mapping.
    #[must_use]
    pub fn with_type(mut self, unmapped: &str, mapped: &str) -> Self {
        self.types.insert(unmapped.to_string(), mapped.to_string());
        self.reverse_types = OnceLock::new();
        self
    }

    /// Adds a field mapping for `owner/field`.
    #[must_use]
    pub fn with_field(mut self, owner: &str, field: &str, mapped: &str) -> Self {
        self.fields
            .insert(format!("{}/{}", owner, field), mapped.to_string());
        self
    }

    /// Adds a method mapping for `owner/method descriptor`.
    #[must_use]
    pub fn with_method(mut self, owner: &str, method: &str, descriptor: &str, mapped: &str) -> Self {
        self.methods.insert(
            format!("{}/{} {}", owner, method, descriptor),
            mapped.to_string(),
        );
        self
    }

    /// Returns the mapped name of a type.
    #[must_use]
    pub fn map_type(&self, unmapped: &str) -> Option<&str> {
        self.types.get(unmapped).map(String::as_str)
    }

    /// Returns the unmapped key whose value is `mapped`.
    ///
    /// When several keys map to the same name, the first key in table order wins.
    #[must_use]
    pub fn unmap_type(&self, mapped: &str) -> Option<&str> {
        let reverse = self.reverse_types.get_or_init(|| {
            let mut reverse = HashMap::with_capacity(self.types.len());
            for (unmapped, mapped) in &self.types {
                reverse
                    .entry(mapped.clone())
                    .or_insert_with(|| unmapped.clone());
            }
            reverse
        });
        reverse.get(mapped).map(String::as_str)
    }

    /// Returns the mapped name of field `field` on unmapped type `owner`.
    #[must_use]
    pub fn map_field(&self, owner: &str, field: &str) -> Option<&str> {
        self.fields
            .get(&format!("{}/{}", owner, field))
            .map(String::as_str)
    }

    /// Iterate over all method entries whose key starts with `prefix`.
    ///
    /// Yields `(key, mapped name)` pairs in key order.
    pub fn methods_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.methods
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, mapped)| (key.as_str(), mapped.as_str()))
    }

    /// Returns the type table.
    #[must_use]
    pub fn types(&self) -> &BTreeMap<String, String> {
        &self.types
    }

    /// Returns the field table.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Returns the method table.
    #[must_use]
    pub fn methods(&self) -> &BTreeMap<String, String> {
        &self.methods
    }

    /// Total number of entries across all three tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.fields.len() + self.methods.len()
    }

    /// Returns `true` if all three tables are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
