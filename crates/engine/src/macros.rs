//! Closed string enumerations.
//!
//! Every enum field of a record (gender, treatment, expense type, appointment
//! status) is stored and transmitted as its display label. `labeled_enum!`
//! generates the enum together with `ALL`, `as_str()`, `Display` and a
//! `TryFrom<&str>` that accepts the label in any case or spacing
//! (`"Dental Checkup"`, `"dental_checkup"`, `"DENTAL-CHECKUP"`).

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical label, used both in storage and on the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $crate::EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let wanted = $crate::macros::fold_label(value);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| $crate::macros::fold_label(candidate.as_str()) == wanted)
                    .ok_or_else(|| {
                        $crate::EngineError::Validation(format!(
                            "'{}' is not a valid {}",
                            value.trim(),
                            $field
                        ))
                    })
            }
        }
    };
}

pub(crate) use labeled_enum;

/// Lowercase alphanumeric projection used to compare labels.
pub(crate) fn fold_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
