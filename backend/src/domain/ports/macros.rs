//! Helper for declaring driven-port error enums.
//!
//! Every store error in this crate carries a human readable message per
//! variant. The macro derives `thiserror::Error` and a snake-case constructor
//! accepting anything `Into<String>`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident as $ctor:ident => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    /// Adapter-supplied description.
                    message: String,
                },
            )*
        }

        impl $name {
            $(
                #[doc = concat!("Build a [`", stringify!($name), "::", stringify!($variant), "`].")]
                pub fn $ctor(message: impl Into<String>) -> Self {
                    Self::$variant {
                        message: message.into(),
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Connection as connection => "sample connection failed: {message}",
            Query as query => "sample query failed: {message}",
        }
    }

    #[test]
    fn constructors_accept_str() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "sample connection failed: refused");
    }

    #[test]
    fn variants_stay_distinct() {
        assert_ne!(SamplePortError::query("x"), SamplePortError::connection("x"));
    }
}
