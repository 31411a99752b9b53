//! Field access by name.

use serde_json::Value;

/// Read a record's field by name.
///
/// This is how typed containers find a record's key without knowing its
/// concrete type. Implement it for Rust records with [`field_access!`]:
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sheetsync_engine::{FieldAccess, field_access};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Weapon {
///     id: String,
///     damage: i64,
/// }
///
/// field_access!(Weapon { id, damage });
///
/// let sword = Weapon { id: "sword".into(), damage: 12 };
/// assert_eq!(sword.field("damage"), Some(serde_json::json!(12)));
/// assert_eq!(sword.field("weight"), None);
/// ```
///
/// [`field_access!`]: crate::field_access
pub trait FieldAccess {
    /// Value of the named field, `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}

/// Serialized records. Dotted names walk nested objects (`stats.hp`).
impl FieldAccess for Value {
    fn field(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.get(name) {
            return Some(value.clone());
        }

        let mut current = self;
        for segment in name.split('.') {
            current = current.get(segment)?;
        }
        Some(current.clone())
    }
}

/// Implement [`FieldAccess`] for a struct by listing its fields.
///
/// Field names are matched as written in the struct. Each field must
/// implement `Serialize`.
#[macro_export]
macro_rules! field_access {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::FieldAccess for $ty {
            fn field(&self, name: &str) -> ::std::option::Option<$crate::__private::serde_json::Value> {
                match name {
                    $(stringify!($field) => $crate::__private::serde_json::to_value(&self.$field).ok(),)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

/// Key text of a field value.
///
/// Strings are used as-is, numbers and booleans in their JSON form. Null,
/// empty strings, arrays and objects have no key text.
pub(crate) fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
