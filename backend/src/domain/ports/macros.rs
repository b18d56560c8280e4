//! `define_port_error!` generates a thiserror enum for a port plus one
//! snake_case constructor per variant. String-typed fields accept anything
//! `Into<String>`, so adapters can pass `&str` or formatted messages.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum LedgerPortError {
            Unreachable => "ledger unreachable",
            Query { message: String } => "ledger query failed: {message}",
            Stale { expected: String, attempts: u32 } =>
                "ledger stale: expected {expected} after {attempts} attempts",
        }
    }

    #[rstest]
    #[case(LedgerPortError::unreachable(), "ledger unreachable")]
    #[case(LedgerPortError::query("timeout"), "ledger query failed: timeout")]
    #[case(
        LedgerPortError::stale(String::from("pending"), 3_u32),
        "ledger stale: expected pending after 3 attempts"
    )]
    fn constructors_render_messages(#[case] err: LedgerPortError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    fn variants_compare_by_field_values() {
        assert_eq!(
            LedgerPortError::query("a"),
            LedgerPortError::Query {
                message: "a".to_owned()
            }
        );
        assert_ne!(LedgerPortError::query("a"), LedgerPortError::query("b"));
    }
}
