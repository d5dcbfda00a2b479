//! Attribute parsing utilities for the automapper derive.

use syn::{Attribute, LitStr, Path};

/// Parsed `#[automapper(...)]` attributes on a type.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Override display name (default: Rust struct name)
    pub name: Option<String>,
    /// Do not register a zero-argument constructor
    pub no_default: bool,
}

/// Parsed `#[automapper(...)]` attributes on a field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Field is readable
    pub get: bool,
    /// Field is writable
    pub set: bool,
    /// Override mapping name
    pub name: Option<String>,
    /// Leave the field out of the table entirely
    pub skip: bool,
    /// Never use the field as a mapping source
    pub ignore: bool,
    /// Rename declared on the field
    pub map_to: Option<String>,
    /// Converter function applied when the field is a source
    pub converter: Option<Path>,
}

impl FieldAttrs {
    /// Read/write unless `get` or `set` narrowed it.
    pub fn access(&self) -> (bool, bool) {
        if !self.get && !self.set {
            (true, true)
        } else {
            (self.get, self.set)
        }
    }
}

fn ident_string(path: &Path) -> String {
    path.get_ident().map(|i| i.to_string()).unwrap_or_default()
}

impl TypeAttrs {
    /// Parse attributes from a list of `#[automapper(...)]` attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("automapper") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else if meta.path.is_ident("no_default") {
                    result.no_default = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown automapper attribute: {}",
                        ident_string(&meta.path)
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

impl FieldAttrs {
    /// Parse attributes from a list of `#[automapper(...)]` attributes.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("automapper") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("get") {
                    result.get = true;
                } else if meta.path.is_ident("set") {
                    result.set = true;
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("ignore") {
                    result.ignore = true;
                } else if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else if meta.path.is_ident("map_to") {
                    let value: LitStr = meta.value()?.parse()?;
                    if value.value().is_empty() {
                        return Err(syn::Error::new(value.span(), "map_to cannot be empty"));
                    }
                    result.map_to = Some(value.value());
                } else if meta.path.is_ident("converter") {
                    let value: Path = meta.value()?.parse()?;
                    result.converter = Some(value);
                } else {
                    return Err(meta.error(format!(
                        "unknown automapper field attribute: {}",
                        ident_string(&meta.path)
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn type_attrs_default() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[derive(Clone)])];
        let parsed = TypeAttrs::from_attrs(&attrs).unwrap();
        assert!(parsed.name.is_none());
        assert!(!parsed.no_default);
    }

    #[test]
    fn type_attrs_name_and_no_default() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[automapper(name = "Person")]),
            parse_quote!(#[automapper(no_default)]),
        ];
        let parsed = TypeAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Person"));
        assert!(parsed.no_default);
    }

    #[test]
    fn type_attrs_unknown_is_error() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[automapper(pod)])];
        let err = TypeAttrs::from_attrs(&attrs).unwrap_err();
        assert!(err.to_string().contains("unknown automapper attribute: pod"));
    }

    #[test]
    fn field_attrs_default_is_read_write() {
        let parsed = FieldAttrs::from_attrs(&[]).unwrap();
        assert_eq!(parsed.access(), (true, true));
        assert!(!parsed.skip);
        assert!(!parsed.ignore);
    }

    #[test]
    fn field_attrs_get_only() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[automapper(get)])];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.access(), (true, false));
    }

    #[test]
    fn field_attrs_mapping() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[automapper(map_to = "name", converter = formats::title_case, ignore)]
        )];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.map_to.as_deref(), Some("name"));
        assert!(parsed.ignore);
        let converter = parsed.converter.expect("converter path");
        assert_eq!(converter.segments.len(), 2);
        assert_eq!(converter.segments[1].ident, "title_case");
    }

    #[test]
    fn field_attrs_rename_and_skip() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[automapper(name = "fullName", skip)])];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("fullName"));
        assert!(parsed.skip);
    }

    #[test]
    fn field_attrs_empty_map_to_is_error() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[automapper(map_to = "")])];
        assert!(FieldAttrs::from_attrs(&attrs).is_err());
    }

    #[test]
    fn field_attrs_unknown_is_error() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[automapper(readonly)])];
        let err = FieldAttrs::from_attrs(&attrs).unwrap_err();
        assert!(err.to_string().contains("unknown automapper field attribute: readonly"));
    }

    #[test]
    fn other_attributes_are_ignored() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(rename = "x")])];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert!(parsed.name.is_none());
    }
}
