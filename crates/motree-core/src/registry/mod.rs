//! Class metadata registry
//!
//! The registry is the read-only schema the tree is validated against: for
//! each class, its permitted attributes, its naming attributes (in positional
//! binding order), its parsed Rn template and its legal child classes.
//! It is built once, shared through `Arc`, and passed explicitly to every
//! operation that creates nodes.

pub mod loader;
pub mod template;

use std::collections::{BTreeSet, HashMap};

use crate::errors::{MoError, Result};
pub use template::{RnTemplate, RnToken};

/// Schema entry for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMeta {
    name: String,
    permitted: BTreeSet<String>,
    naming: Vec<String>,
    template: RnTemplate,
    children: Vec<String>,
}

impl ClassMeta {
    /// Create a class entry from its Rn template
    ///
    /// Naming attributes default to the template's placeholders in template
    /// order; override with [`ClassMeta::with_naming`] when the declared
    /// binding order differs.
    ///
    /// # Errors
    ///
    /// `InvalidTemplate` if `rn_format` cannot be parsed.
    pub fn new(name: impl Into<String>, rn_format: &str) -> Result<Self> {
        let template = RnTemplate::parse(rn_format)?;
        let naming: Vec<String> = template.placeholders().map(str::to_string).collect();
        Ok(Self {
            name: name.into(),
            permitted: naming.iter().cloned().collect(),
            naming,
            template,
            children: Vec::new(),
        })
    }

    /// Set the naming attributes in positional binding order
    pub fn with_naming<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.naming = names.into_iter().map(Into::into).collect();
        self.permitted.extend(self.naming.iter().cloned());
        self
    }

    /// Add permitted (non-naming) attributes
    pub fn with_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append legal child classes, in candidate order for Dn resolution
    pub fn with_children<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rn_template(&self) -> &RnTemplate {
        &self.template
    }

    /// Naming attributes in declared order
    pub fn naming_attributes(&self) -> &[String] {
        &self.naming
    }

    pub fn permitted_attributes(&self) -> &BTreeSet<String> {
        &self.permitted
    }

    /// Legal child classes in declared order
    pub fn legal_children(&self) -> &[String] {
        &self.children
    }

    pub fn is_naming(&self, attribute: &str) -> bool {
        self.naming.iter().any(|n| n == attribute)
    }

    pub fn permits(&self, attribute: &str) -> bool {
        self.permitted.contains(attribute)
    }

    pub fn has_child(&self, class_name: &str) -> bool {
        self.children.iter().any(|c| c == class_name)
    }

    /// Fail with `UnknownAttribute` unless `attribute` is permitted
    pub(crate) fn check_attribute(&self, attribute: &str) -> Result<()> {
        if self.permits(attribute) {
            Ok(())
        } else {
            Err(MoError::UnknownAttribute {
                class_name: self.name.clone(),
                attribute: attribute.to_string(),
            })
        }
    }
}

/// Immutable class registry
///
/// The root class is always stored first.
#[derive(Debug, Clone)]
pub struct Registry {
    classes: Vec<ClassMeta>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Start building a registry rooted at `root_class`
    pub fn builder(root_class: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder {
            root_class: root_class.into(),
            classes: Vec::new(),
        }
    }

    /// Look up the schema entry of a class
    ///
    /// # Errors
    ///
    /// `UnknownClass` if the registry has no such class.
    pub fn lookup_class(&self, class_name: &str) -> Result<&ClassMeta> {
        self.index
            .get(class_name)
            .map(|&i| &self.classes[i])
            .ok_or_else(|| MoError::UnknownClass {
                class_name: class_name.to_string(),
            })
    }

    /// Schema entry of the tree root
    pub fn root_class(&self) -> &ClassMeta {
        &self.classes[0]
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.index.contains_key(class_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(ClassMeta::name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Builder that validates cross-class consistency on `build`
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    root_class: String,
    classes: Vec<ClassMeta>,
}

impl RegistryBuilder {
    pub fn class(mut self, meta: ClassMeta) -> Self {
        self.classes.push(meta);
        self
    }

    /// Validate and freeze the registry
    ///
    /// # Errors
    ///
    /// `InvalidRegistry` when a class is declared twice, the root class is
    /// missing or has naming attributes, naming attributes and template
    /// placeholders disagree, or a legal child refers to an unknown class.
    pub fn build(self) -> Result<Registry> {
        let invalid = |reason: String| MoError::InvalidRegistry { reason };

        let mut classes = self.classes;
        let root_pos = classes
            .iter()
            .position(|c| c.name == self.root_class)
            .ok_or_else(|| invalid(format!("root class {} is not declared", self.root_class)))?;
        classes.swap(0, root_pos);

        let mut index = HashMap::with_capacity(classes.len());
        for (i, meta) in classes.iter().enumerate() {
            if index.insert(meta.name.clone(), i).is_some() {
                return Err(invalid(format!("class {} declared twice", meta.name)));
            }
        }

        if !classes[0].naming.is_empty() || !classes[0].template.is_fixed() {
            return Err(invalid(format!(
                "root class {} must not have naming attributes",
                self.root_class
            )));
        }

        for meta in &classes {
            let declared: BTreeSet<&str> = meta.naming.iter().map(String::as_str).collect();
            let placeholders: BTreeSet<&str> = meta.template.placeholders().collect();
            if declared.len() != meta.naming.len() || declared != placeholders {
                return Err(invalid(format!(
                    "naming attributes of {} do not match template '{}'",
                    meta.name, meta.template
                )));
            }
            if let Some(unknown) = meta.children.iter().find(|c| !index.contains_key(*c)) {
                return Err(invalid(format!(
                    "{} lists unknown child class {}",
                    meta.name, unknown
                )));
            }
        }

        tracing::debug!(classes = classes.len(), root = %self.root_class, "registry built");
        Ok(Registry { classes, index })
    }
}
