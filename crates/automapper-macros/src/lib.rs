//! Automapper Proc Macros
//!
//! This crate provides `#[derive(Mappable)]`, which generates the static field
//! table the mapping engine works from.
//!
//! # Example
//!
//! ```ignore
//! use automapper::Mappable;
//!
//! #[derive(Mappable, Default, Clone)]
//! pub struct PersonDto {
//!     #[automapper(map_to = "name")]
//!     pub full_name: String,
//!     pub score: f64,
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_mappable;

/// Derive `Mappable` for a struct with named fields.
///
/// Generates implementations of `Reflect`, `Mappable`, `IntoValue` and
/// `FromValue`. The type hash is derived from the struct's module path, so two
/// structs with the same name in different modules are distinct types.
///
/// Every mapped field type must implement `Clone`, `Reflect`, `IntoValue` and
/// `FromValue`. Unless `no_default` is given the struct must implement
/// `Default`.
///
/// # Attributes
///
/// - `#[automapper(name = "...")]` - Override the display name
/// - `#[automapper(no_default)]` - Register no constructor; the type can be a
///   mapping source but not a target
///
/// # Field Attributes
///
/// - `#[automapper(get)]` / `#[automapper(set)]` - Restrict access (default: both)
/// - `#[automapper(name = "...")]` - Override the mapping name
/// - `#[automapper(skip)]` - Leave the field out of the table
/// - `#[automapper(ignore)]` - Never use the field as a mapping source
/// - `#[automapper(map_to = "...")]` - Seed a name override: on a source field
///   it maps this field to the named target field; on a target field it maps
///   the named source field to this one
/// - `#[automapper(converter = path)]` - Seed a converter from a function
///   `fn(I) -> O`
///
/// # Example
///
/// ```ignore
/// fn format_date(date: NaiveDate) -> String {
///     date.format("%d/%m/%Y").to_string()
/// }
///
/// #[derive(Mappable, Default, Clone)]
/// #[automapper(name = "Person")]
/// pub struct PersonDto {
///     #[automapper(map_to = "name")]
///     pub full_name: String,
///
///     #[automapper(map_to = "birth_date_text", converter = format_date)]
///     pub birth_date: NaiveDate,
///
///     #[automapper(ignore)]
///     pub password_hash: String,
/// }
/// ```
#[proc_macro_derive(Mappable, attributes(automapper))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    derive_mappable::derive_mappable_impl(input)
}
