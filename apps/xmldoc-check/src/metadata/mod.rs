//! Descriptive metadata records for a compiled library's public surface.
//!
//! The walker never touches a live library; it works from these plain records,
//! supplied by any `MetadataProvider`. `snapshot` provides one backed by a JSON
//! document written next to the library.

pub mod snapshot;

use crate::error::PartialMetadataLoad;
use serde::{Deserialize, Serialize};

/// Capability interface over a loaded library.
pub trait MetadataProvider {
    /// Display name of the library (e.g. `Acme, Version=1.0.0.0, ...`).
    fn assembly_name(&self) -> &str;

    /// All types defined by the library, visible or not.
    ///
    /// When some types cannot be resolved the provider returns
    /// `PartialMetadataLoad` holding whatever subset it did resolve.
    fn types(&self) -> Result<Vec<TypeInfo>, PartialMetadataLoad>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Effective accessibility of a type or member.
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Structured reference to a parameter, field, or return type.
pub enum TypeRef {
    /// A named type, possibly a constructed generic.
    Named {
        #[serde(default)]
        namespace: Option<String>,
        /// CLR simple name including any arity suffix (`List`1`).
        name: String,
        /// Enclosing types, outermost first.
        #[serde(default)]
        declaring: Vec<String>,
        #[serde(default)]
        args: Vec<TypeRef>,
    },
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    ByRef {
        element: Box<TypeRef>,
    },
    /// A type parameter of the declaring generic type.
    GenericParameter {
        position: u32,
        #[serde(default)]
        name: Option<String>,
    },
    /// The upstream loader could not resolve this type.
    Unresolved {
        #[serde(default)]
        hint: Option<String>,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeRef {
    pub fn named(namespace: &str, name: &str) -> Self {
        TypeRef::Named {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
            declaring: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn generic(namespace: &str, name: &str, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
            declaring: Vec::new(),
            args,
        }
    }

    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::generic("System", "Nullable`1", vec![inner])
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// Returns the underlying type when this is `System.Nullable<T>`.
    pub fn nullable_underlying(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Named {
                namespace,
                name,
                declaring,
                args,
            } if namespace.as_deref() == Some("System")
                && name == "Nullable`1"
                && declaring.is_empty()
                && args.len() == 1 =>
            {
                args.first()
            }
            _ => None,
        }
    }

    /// Short human-readable spelling used in display names (`List<Int32>`).
    pub fn short_name(&self) -> String {
        match self {
            TypeRef::Named { name, args, .. } => {
                let base = strip_arity(name);
                if args.is_empty() {
                    base.to_string()
                } else {
                    let inner: Vec<String> = args.iter().map(TypeRef::short_name).collect();
                    format!("{}<{}>", base, inner.join(", "))
                }
            }
            TypeRef::Array { element, rank } => {
                format!("{}[{}]", element.short_name(), ",".repeat(rank.saturating_sub(1) as usize))
            }
            TypeRef::ByRef { element } => format!("{}&", element.short_name()),
            TypeRef::GenericParameter { position, name } => {
                name.clone().unwrap_or_else(|| format!("T{}", position))
            }
            TypeRef::Unresolved { hint } => hint.clone().unwrap_or_else(|| "?".to_string()),
        }
    }
}

/// Remove a trailing generic arity suffix (a backtick followed by digits).
pub fn strip_arity(name: &str) -> &str {
    match name.rfind('`') {
        Some(pos)
            if pos + 1 < name.len() && name[pos + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &name[..pos]
        }
        _ => name,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single parameter of a method, constructor, or indexer.
pub struct ParameterInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A constructor or method.
pub struct MethodInfo {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    /// Declared on a base type and only inherited here.
    #[serde(default)]
    pub inherited: bool,
    /// Operators, property/indexer accessors, event accessors.
    #[serde(default)]
    pub special_name: bool,
    #[serde(default)]
    pub generic_arity: u32,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
}

impl MethodInfo {
    pub fn is_generic(&self) -> bool {
        self.generic_arity > 0
    }

    fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.ty.short_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `Run(Int32, String)`; constructors render as `.ctor(...)`.
    pub fn display_name(&self) -> String {
        format!("{}({})", self.name, self.parameter_list())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub inherited: bool,
    #[serde(default)]
    pub field_type: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Getter or setter of a property.
pub struct AccessorInfo {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(default)]
    pub inherited: bool,
    #[serde(default)]
    pub property_type: Option<TypeRef>,
    #[serde(default)]
    pub getter: Option<AccessorInfo>,
    #[serde(default)]
    pub setter: Option<AccessorInfo>,
}

impl PropertyInfo {
    /// A property counts as public when any accessor is.
    pub fn is_public(&self) -> bool {
        [self.getter.as_ref(), self.setter.as_ref()]
            .into_iter()
            .flatten()
            .any(|a| a.visibility.is_public())
    }

    /// Parameters of the getter; non-empty only for indexers.
    pub fn index_parameters(&self) -> &[ParameterInfo] {
        self.getter
            .as_ref()
            .map(|g| g.parameters.as_slice())
            .unwrap_or(&[])
    }

    /// `Count`, or `Item[Int32]` for indexers.
    pub fn display_name(&self) -> String {
        let params = self.index_parameters();
        if params.is_empty() {
            self.name.clone()
        } else {
            let inner: Vec<String> = params.iter().map(|p| p.ty.short_name()).collect();
            format!("{}[{}]", self.name, inner.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A type defined by the library together with its declared members.
pub struct TypeInfo {
    #[serde(default)]
    pub namespace: Option<String>,
    /// CLR simple name including any arity suffix.
    pub name: String,
    /// Enclosing types, outermost first.
    #[serde(default)]
    pub declaring: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Full name of the base type, if any.
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub constructors: Vec<MethodInfo>,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
}

/// Synthetic backing field emitted for every enum.
pub const ENUM_VALUE_FIELD: &str = "value__";

impl TypeInfo {
    pub fn new(namespace: &str, name: &str) -> Self {
        TypeInfo {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
            declaring: Vec::new(),
            visibility: Visibility::Public,
            base_type: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn namespace_name(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }

    /// Name within the namespace: enclosing chain plus own name, dot-joined.
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = self.declaring.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join(".")
    }

    /// Namespace-qualified display name (`Acme.Outer.Inner`).
    pub fn qualified_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.display_name()),
            _ => self.display_name(),
        }
    }

    pub fn is_delegate(&self) -> bool {
        matches!(
            self.base_type.as_deref(),
            Some("System.Delegate") | Some("System.MulticastDelegate")
        )
    }

    pub fn public_constructors(&self) -> impl Iterator<Item = &MethodInfo> {
        self.constructors
            .iter()
            .filter(|c| c.visibility.is_public() && !c.inherited)
    }

    /// Declared public methods, minus special-name and generic methods.
    pub fn public_methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter().filter(|m| {
            m.visibility.is_public() && !m.inherited && !m.special_name && !m.is_generic()
        })
    }

    pub fn public_fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|f| {
            f.visibility.is_public() && !f.inherited && f.name != ENUM_VALUE_FIELD
        })
    }

    pub fn public_properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties
            .iter()
            .filter(|p| p.is_public() && !p.inherited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_arity_only_trailing_digits() {
        assert_eq!(strip_arity("List`1"), "List");
        assert_eq!(strip_arity("Dictionary`2"), "Dictionary");
        assert_eq!(strip_arity("Plain"), "Plain");
        assert_eq!(strip_arity("Odd`x"), "Odd`x");
        assert_eq!(strip_arity("Trailing`"), "Trailing`");
    }

    #[test]
    fn test_member_filters_follow_declared_public_rules() {
        let mut t = TypeInfo::new("Acme", "Color");
        t.fields.push(FieldInfo {
            name: "value__".into(),
            visibility: Visibility::Public,
            is_static: false,
            inherited: false,
            field_type: None,
        });
        t.fields.push(FieldInfo {
            name: "Red".into(),
            visibility: Visibility::Public,
            is_static: true,
            inherited: false,
            field_type: None,
        });
        t.methods.push(MethodInfo {
            name: "op_Equality".into(),
            visibility: Visibility::Public,
            is_static: true,
            inherited: false,
            special_name: true,
            generic_arity: 0,
            parameters: vec![],
            return_type: None,
        });
        t.methods.push(MethodInfo {
            name: "Map".into(),
            visibility: Visibility::Public,
            is_static: false,
            inherited: false,
            special_name: false,
            generic_arity: 1,
            parameters: vec![],
            return_type: None,
        });
        t.methods.push(MethodInfo {
            name: "ToString".into(),
            visibility: Visibility::Public,
            is_static: false,
            inherited: true,
            special_name: false,
            generic_arity: 0,
            parameters: vec![],
            return_type: None,
        });
        let fields: Vec<_> = t.public_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["Red"]);
        assert_eq!(t.public_methods().count(), 0);
    }

    #[test]
    fn test_display_names() {
        let mut t = TypeInfo::new("Acme", "Inner");
        t.declaring = vec!["Outer".into()];
        assert_eq!(t.qualified_name(), "Acme.Outer.Inner");

        let m = MethodInfo {
            name: "Load".into(),
            visibility: Visibility::Public,
            is_static: false,
            inherited: false,
            special_name: false,
            generic_arity: 0,
            parameters: vec![
                ParameterInfo {
                    name: "ids".into(),
                    ty: TypeRef::array(TypeRef::named("System", "Int32")),
                },
                ParameterInfo {
                    name: "limit".into(),
                    ty: TypeRef::nullable(TypeRef::named("System", "Int32")),
                },
            ],
            return_type: None,
        };
        assert_eq!(m.display_name(), "Load(Int32[], Nullable<Int32>)");
    }

    #[test]
    fn test_delegate_detection_uses_base_type() {
        let mut t = TypeInfo::new("Acme", "Handler");
        assert!(!t.is_delegate());
        t.base_type = Some("System.MulticastDelegate".into());
        assert!(t.is_delegate());
    }
}
