//! Shared utilities and small common values for the quill crates.
//!
//! ```rust
//! use qcommon::{GenerationOptions, non_blank};
//!
//! let options = GenerationOptions::default().with_temperature(0.3).enable_streaming();
//! assert!(options.stream);
//! assert_eq!(non_blank(Some("  ")), None);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use qcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod model {
    //! Shared generation settings used by request types.
    //!
    //! ```rust
    //! use qcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_output_tokens(128)
    //!     .enable_streaming();
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_output_tokens, 128);
    //! assert!(options.stream);
    //! ```

    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_output_tokens: u32,
        pub stream: bool,
    }

    impl Default for GenerationOptions {
        fn default() -> Self {
            Self {
                temperature: None,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
                stream: false,
            }
        }
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
            self.max_output_tokens = max_output_tokens;
            self
        }

        pub fn with_streaming(mut self, stream: bool) -> Self {
            self.stream = stream;
            self
        }

        pub fn enable_streaming(self) -> Self {
            self.with_streaming(true)
        }
    }
}

pub mod text {
    //! Case-insensitive matching helpers shared by error tables.
    //!
    //! ```rust
    //! use qcommon::contains_any_ignore_case;
    //!
    //! assert!(contains_any_ignore_case("Rate_Limit hit", &["rate_limit"]));
    //! assert!(!contains_any_ignore_case("fine", &["rate_limit", "quota"]));
    //! ```

    /// Returns the trimmed-nonempty view of `value`, or `None` for blank input.
    pub fn non_blank(value: Option<&str>) -> Option<&str> {
        value.filter(|text| !text.trim().is_empty())
    }

    /// `needles` must already be lowercase.
    pub fn contains_any_ignore_case(haystack: &str, needles: &[&str]) -> bool {
        let haystack = haystack.to_lowercase();
        needles.iter().any(|needle| haystack.contains(needle))
    }
}

pub use future::BoxFuture;
pub use model::{DEFAULT_MAX_OUTPUT_TOKENS, GenerationOptions};
pub use text::{contains_any_ignore_case, non_blank};
