//! Canonical documentation-comment identifiers.
//!
//! Builds the member id strings (`T:`, `N:`, `M:`, `F:`, `P:`) under which
//! compilers index documentation comments. Parameter types are spelled by a
//! small closed set of rules:
//!
//! - primitive aliases (`Int32`, `int`, `bool`, ...) qualify to `System.*`;
//! - `System.Nullable<T>` spells `System.Nullable{T}`;
//! - constructed generics spell `Ns.Name{A,B}` with the arity suffix removed;
//! - arrays keep ordinary brackets (`[]`, `[,]`), by-ref appends `@`;
//! - type parameters of the owner spell as `` `N ``;
//! - enclosing types join with `.` instead of `+`.
//!
//! Type-definition names keep their arity suffix (`T:Acme.Cache`1`).

use crate::error::SynthesisError;
use crate::metadata::{
    strip_arity, FieldInfo, MethodInfo, ParameterInfo, PropertyInfo, TypeInfo, TypeRef,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Kind of program element covered by the check.
pub enum ElementKind {
    Namespace,
    Type,
    Constructor,
    Method,
    Field,
    Property,
}

impl ElementKind {
    /// Id prefix: first letter of the kind name, constructors being methods.
    pub fn prefix(self) -> char {
        match self {
            ElementKind::Namespace => 'N',
            ElementKind::Type => 'T',
            ElementKind::Constructor | ElementKind::Method => 'M',
            ElementKind::Field => 'F',
            ElementKind::Property => 'P',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Namespace => "NAMESPACE",
            ElementKind::Type => "TYPE",
            ElementKind::Constructor => "CONSTRUCTOR",
            ElementKind::Method => "METHOD",
            ElementKind::Field => "FIELD",
            ElementKind::Property => "PROPERTY",
        }
    }
}

/// Key relative to an owner type: prefix plus member fragment.
///
/// An empty `name` addresses the owner type itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberKey {
    pub prefix: char,
    pub name: String,
}

impl MemberKey {
    /// Full id against the owner's documentation name.
    pub fn qualify(&self, owner: &str) -> String {
        if self.name.is_empty() {
            format!("{}:{}", self.prefix, owner)
        } else {
            format!("{}:{}.{}", self.prefix, owner, self.name)
        }
    }
}

/// CLR primitive names and C# keywords that resolve into `System`.
const PRIMITIVE_ALIASES: &[(&str, &str)] = &[
    ("Boolean", "Boolean"),
    ("bool", "Boolean"),
    ("Byte", "Byte"),
    ("byte", "Byte"),
    ("SByte", "SByte"),
    ("sbyte", "SByte"),
    ("Char", "Char"),
    ("char", "Char"),
    ("Int16", "Int16"),
    ("short", "Int16"),
    ("UInt16", "UInt16"),
    ("ushort", "UInt16"),
    ("Int32", "Int32"),
    ("int", "Int32"),
    ("UInt32", "UInt32"),
    ("uint", "UInt32"),
    ("Int64", "Int64"),
    ("long", "Int64"),
    ("UInt64", "UInt64"),
    ("ulong", "UInt64"),
    ("Single", "Single"),
    ("float", "Single"),
    ("Double", "Double"),
    ("double", "Double"),
    ("Decimal", "Decimal"),
    ("decimal", "Decimal"),
    ("String", "String"),
    ("string", "String"),
    ("Object", "Object"),
    ("object", "Object"),
    ("IntPtr", "IntPtr"),
    ("nint", "IntPtr"),
    ("UIntPtr", "UIntPtr"),
    ("nuint", "UIntPtr"),
];

fn primitive_alias(name: &str) -> Option<&'static str> {
    PRIMITIVE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, clr)| *clr)
}

/// Documentation name of a type definition: `Ns.Outer.Inner`1`.
pub fn owner_name(t: &TypeInfo) -> String {
    t.qualified_name()
}

pub fn namespace_key(namespace: &str) -> String {
    format!("N:{}", namespace)
}

pub fn type_key() -> MemberKey {
    MemberKey {
        prefix: ElementKind::Type.prefix(),
        name: String::new(),
    }
}

pub fn field_key(field: &FieldInfo) -> MemberKey {
    MemberKey {
        prefix: ElementKind::Field.prefix(),
        name: field.name.clone(),
    }
}

/// Plain properties key by name; indexers carry their getter's parameters.
pub fn property_key(property: &PropertyInfo) -> Result<MemberKey, SynthesisError> {
    let params = property.index_parameters();
    let name = if params.is_empty() {
        property.name.clone()
    } else {
        format!("{}({})", property.name, spell_parameters(params, &property.name)?)
    };
    Ok(MemberKey {
        prefix: ElementKind::Property.prefix(),
        name,
    })
}

pub fn method_key(method: &MethodInfo) -> Result<MemberKey, SynthesisError> {
    let name = if method.parameters.is_empty() {
        method.name.clone()
    } else {
        format!(
            "{}({})",
            method.name,
            spell_parameters(&method.parameters, &method.name)?
        )
    };
    Ok(MemberKey {
        prefix: ElementKind::Method.prefix(),
        name,
    })
}

/// `M:Ns.Type.#ctor(System.Int32,System.String)`, or `M:Ns.Type.#ctor`
/// when the constructor takes no parameters.
pub fn constructor_key(owner: &TypeInfo, ctor: &MethodInfo) -> Result<String, SynthesisError> {
    let owner = owner_name(owner);
    if ctor.parameters.is_empty() {
        return Ok(format!("M:{}.#ctor", owner));
    }
    let element = format!("{}.{}", owner, ctor.display_name());
    Ok(format!(
        "M:{}.#ctor({})",
        owner,
        spell_parameters(&ctor.parameters, &element)?
    ))
}

fn spell_parameters(params: &[ParameterInfo], element: &str) -> Result<String, SynthesisError> {
    let spelled = params
        .iter()
        .map(|p| spell_type(&p.ty))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SynthesisError::MetadataUnavailable {
            element: element.to_string(),
        })?;
    Ok(spelled.join(","))
}

/// Spell a parameter type for use inside an id; `None` when any part of the
/// type is unresolved.
pub fn spell_type(ty: &TypeRef) -> Option<String> {
    if let Some(inner) = ty.nullable_underlying() {
        return Some(format!("System.Nullable{{{}}}", spell_type(inner)?));
    }
    match ty {
        TypeRef::Named {
            namespace,
            name,
            declaring,
            args,
        } => {
            let mut out = qualified_path(namespace.as_deref(), declaring, name);
            if !args.is_empty() {
                let inner = args.iter().map(spell_type).collect::<Option<Vec<_>>>()?;
                out.push('{');
                out.push_str(&inner.join(","));
                out.push('}');
            }
            Some(out)
        }
        TypeRef::Array { element, rank } => {
            let commas = ",".repeat(rank.saturating_sub(1) as usize);
            Some(format!("{}[{}]", spell_type(element)?, commas))
        }
        TypeRef::ByRef { element } => Some(format!("{}@", spell_type(element)?)),
        TypeRef::GenericParameter { position, .. } => Some(format!("`{}", position)),
        TypeRef::Unresolved { .. } => None,
    }
}

fn qualified_path(namespace: Option<&str>, declaring: &[String], name: &str) -> String {
    let namespace = match namespace {
        Some(ns) if !ns.is_empty() => Some(ns.to_string()),
        _ if declaring.is_empty() => primitive_alias(name).map(|_| "System".to_string()),
        _ => None,
    };
    let name = if namespace.as_deref() == Some("System") {
        primitive_alias(name).unwrap_or(name)
    } else {
        name
    };
    let mut parts: Vec<&str> = Vec::with_capacity(declaring.len() + 2);
    if let Some(ns) = namespace.as_deref() {
        parts.push(ns);
    }
    parts.extend(declaring.iter().map(|d| strip_arity(d)));
    parts.push(strip_arity(name));
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{AccessorInfo, Visibility};

    fn param(ty: TypeRef) -> ParameterInfo {
        ParameterInfo {
            name: "p".into(),
            ty,
        }
    }

    fn ctor(params: Vec<TypeRef>) -> MethodInfo {
        MethodInfo {
            name: ".ctor".into(),
            visibility: Visibility::Public,
            is_static: false,
            inherited: false,
            special_name: true,
            generic_arity: 0,
            parameters: params.into_iter().map(param).collect(),
            return_type: None,
        }
    }

    fn int32() -> TypeRef {
        TypeRef::named("System", "Int32")
    }

    fn widget() -> TypeInfo {
        TypeInfo::new("Acme", "Widget")
    }

    #[test]
    fn test_type_and_namespace_keys() {
        assert_eq!(type_key().qualify("Acme.Widget"), "T:Acme.Widget");
        assert_eq!(namespace_key("Acme"), "N:Acme");
        let mut cache = TypeInfo::new("Acme", "Cache`1");
        cache.declaring = vec!["Outer".into()];
        assert_eq!(type_key().qualify(&owner_name(&cache)), "T:Acme.Outer.Cache`1");
    }

    #[test]
    fn test_field_and_plain_property_keys() {
        let f = FieldInfo {
            name: "MaxSize".into(),
            visibility: Visibility::Public,
            is_static: true,
            inherited: false,
            field_type: Some(int32()),
        };
        assert_eq!(field_key(&f).qualify("Acme.Widget"), "F:Acme.Widget.MaxSize");

        let p = PropertyInfo {
            name: "Size".into(),
            inherited: false,
            property_type: Some(int32()),
            getter: Some(AccessorInfo {
                visibility: Visibility::Public,
                parameters: vec![],
            }),
            setter: None,
        };
        assert_eq!(
            property_key(&p).unwrap().qualify("Acme.Widget"),
            "P:Acme.Widget.Size"
        );
    }

    #[test]
    fn test_indexer_key_carries_parameters() {
        let p = PropertyInfo {
            name: "Item".into(),
            inherited: false,
            property_type: None,
            getter: Some(AccessorInfo {
                visibility: Visibility::Public,
                parameters: vec![param(int32()), param(TypeRef::named("System", "String"))],
            }),
            setter: None,
        };
        assert_eq!(
            property_key(&p).unwrap().qualify("Acme.Grid"),
            "P:Acme.Grid.Item(System.Int32,System.String)"
        );
    }

    #[test]
    fn test_method_keys_with_and_without_parameters() {
        let mut m = ctor(vec![]);
        m.name = "Reset".into();
        m.special_name = false;
        assert_eq!(method_key(&m).unwrap().qualify("Acme.Widget"), "M:Acme.Widget.Reset");
        m.parameters = vec![param(int32()), param(TypeRef::array(int32()))];
        assert_eq!(
            method_key(&m).unwrap().qualify("Acme.Widget"),
            "M:Acme.Widget.Reset(System.Int32,System.Int32[])"
        );
    }

    #[test]
    fn test_zero_arg_constructor_omits_parens() {
        assert_eq!(
            constructor_key(&widget(), &ctor(vec![])).unwrap(),
            "M:Acme.Widget.#ctor"
        );
    }

    #[test]
    fn test_constructor_parameters_are_unspaced_full_names() {
        let key = constructor_key(
            &widget(),
            &ctor(vec![int32(), TypeRef::named("System", "String")]),
        )
        .unwrap();
        assert_eq!(key, "M:Acme.Widget.#ctor(System.Int32,System.String)");
    }

    #[test]
    fn test_nullable_spelling() {
        let key = constructor_key(&widget(), &ctor(vec![TypeRef::nullable(int32())])).unwrap();
        assert_eq!(key, "M:Acme.Widget.#ctor(System.Nullable{System.Int32})");
    }

    #[test]
    fn test_array_spelling_uses_brackets() {
        let key = constructor_key(&widget(), &ctor(vec![TypeRef::array(int32())])).unwrap();
        assert_eq!(key, "M:Acme.Widget.#ctor(System.Int32[])");
        let grid = TypeRef::Array {
            element: Box::new(int32()),
            rank: 2,
        };
        assert_eq!(spell_type(&grid).unwrap(), "System.Int32[,]");
    }

    #[test]
    fn test_single_argument_generic_spelling() {
        let list = TypeRef::generic("System.Collections.Generic", "List`1", vec![int32()]);
        let key = constructor_key(&widget(), &ctor(vec![list])).unwrap();
        assert_eq!(
            key,
            "M:Acme.Widget.#ctor(System.Collections.Generic.List{System.Int32})"
        );
    }

    #[test]
    fn test_multi_argument_and_nested_generic_spelling() {
        let inner = TypeRef::generic(
            "System.Collections.Generic",
            "List`1",
            vec![TypeRef::named("System", "String")],
        );
        let map = TypeRef::generic(
            "System.Collections.Generic",
            "Dictionary`2",
            vec![int32(), inner],
        );
        assert_eq!(
            spell_type(&map).unwrap(),
            "System.Collections.Generic.Dictionary{System.Int32,System.Collections.Generic.List{System.String}}"
        );
    }

    #[test]
    fn test_nested_type_separator_and_arity_stripped() {
        let nested = TypeRef::Named {
            namespace: Some("Acme".into()),
            name: "Options".into(),
            declaring: vec!["Builder`1".into()],
            args: vec![],
        };
        assert_eq!(spell_type(&nested).unwrap(), "Acme.Builder.Options");
    }

    #[test]
    fn test_primitive_aliases_qualify_into_system() {
        for (alias, expected) in [
            ("bool", "System.Boolean"),
            ("Int32", "System.Int32"),
            ("long", "System.Int64"),
            ("string", "System.String"),
            ("double", "System.Double"),
        ] {
            let ty = TypeRef::Named {
                namespace: None,
                name: alias.into(),
                declaring: vec![],
                args: vec![],
            };
            assert_eq!(spell_type(&ty).unwrap(), expected, "alias {}", alias);
        }
        // Already-qualified primitives are not doubled.
        assert_eq!(spell_type(&int32()).unwrap(), "System.Int32");
    }

    #[test]
    fn test_by_ref_and_generic_parameter_spelling() {
        let by_ref = TypeRef::ByRef {
            element: Box::new(int32()),
        };
        assert_eq!(spell_type(&by_ref).unwrap(), "System.Int32@");
        let t0 = TypeRef::GenericParameter {
            position: 0,
            name: Some("T".into()),
        };
        assert_eq!(spell_type(&TypeRef::array(t0)).unwrap(), "`0[]");
    }

    #[test]
    fn test_unresolved_parameter_fails_synthesis() {
        let err = constructor_key(
            &widget(),
            &ctor(vec![int32(), TypeRef::Unresolved { hint: None }]),
        )
        .unwrap_err();
        assert!(matches!(err, SynthesisError::MetadataUnavailable { .. }));
        let nested = TypeRef::nullable(TypeRef::Unresolved { hint: None });
        assert!(spell_type(&nested).is_none());
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let c = ctor(vec![TypeRef::nullable(int32()), TypeRef::array(int32())]);
        let first = constructor_key(&widget(), &c).unwrap();
        let _ = constructor_key(&TypeInfo::new("Other", "Thing"), &ctor(vec![int32()]));
        assert_eq!(constructor_key(&widget(), &c).unwrap(), first);
    }
}
