//! Terminal coloring
//!
//! Quillcraft uses the [Colored crate](https://docs.rs/colored/latest/colored/)
//! to color diagnostics printed to the terminal.
//! The dependency is optional and sits behind the `color` Cargo feature.
//!
//! Downstream code always calls the methods of the [`Colorize`] trait.
//! With the feature enabled the calls forward to the Colored crate;
//! with the feature disabled they return the input unchanged:
//!
//! ```
//! use quill_stdext::color::Colorize;
//! println!["{}", "warning".bold().bright_yellow()];
//! ```

#[cfg(feature = "color")]
pub type ColoredString = colored::ColoredString;

#[cfg(not(feature = "color"))]
pub type ColoredString = String;

macro_rules! colorize_impl {
    ( $( $method_name: ident, )+ ) => {
        /// Trait that provides coloring methods on strings.
        ///
        /// See the module documentation for information.
        pub trait Colorize {
            $(
                fn $method_name(self) -> ColoredString;
            )+
        }

        #[cfg(feature = "color")]
        impl Colorize for ColoredString {
            $(
                fn $method_name(self) -> ColoredString {
                    colored::Colorize::$method_name(self)
                }
            )+
        }

        #[cfg(feature = "color")]
        impl Colorize for &str {
            $(
                fn $method_name(self) -> ColoredString {
                    colored::Colorize::$method_name(self)
                }
            )+
        }

        #[cfg(not(feature = "color"))]
        impl Colorize for ColoredString {
            $(
                fn $method_name(self) -> ColoredString {
                    self
                }
            )+
        }

        #[cfg(not(feature = "color"))]
        impl Colorize for &str {
            $(
                fn $method_name(self) -> ColoredString {
                    self.to_string()
                }
            )+
        }
    };
}

colorize_impl!(bold, bright_blue, bright_red, bright_yellow, dimmed,);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorized_text_keeps_content() {
        let s = "[font|face:".bold().bright_yellow();
        assert!(format!["{s}"].contains("[font|face:"));
    }
}
