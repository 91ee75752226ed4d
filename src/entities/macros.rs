//! Macros for reducing boilerplate when defining entities

/// Implement [`Entity`](crate::core::entity::Entity) for a struct whose
/// identifier lives in an `Option<RecordId>` field
///
/// # Example
/// ```rust,ignore
/// impl_entity!(Measurement, "measurement", "measurements", id);
/// impl_entity!(User, "user", "users", user_id);
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $singular:expr, $plural:expr, $id_field:ident) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> Option<&$crate::core::entity::RecordId> {
                self.$id_field.as_ref()
            }

            fn set_id(&mut self, id: $crate::core::entity::RecordId) {
                self.$id_field = Some(id);
            }
        }
    };
}
