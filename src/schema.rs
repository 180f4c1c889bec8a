//! Reads the `enum` item handed to `#[tagged_union]` into an ordered list of
//! (tag, payload) entries, rejecting everything that cannot be a closed tagged union.

use std::collections::HashMap;

use quote::quote;
use syn::{
    ext::IdentExt, Attribute, Error, Fields, FieldsNamed, FieldsUnnamed, Ident, ItemEnum, Meta, MetaList, Path,
    Result, Type, TypePath, Variant, Visibility,
};

use crate::common::{combine_errors, is_attribute};

/// Associated consts of the tag enum; a tag with one of these names would shadow them.
const RESERVED_TAGS: [&str; 2] = ["ALL", "COUNT"];

pub struct Schema {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub ident: Ident,
    pub entries: Vec<VariantEntry>,
}

pub struct VariantEntry {
    /// Attributes left on the enum variant.
    pub attrs: Vec<Attribute>,
    pub tag: Ident,
    pub payload: Payload,
}

pub enum Payload {
    /// `Tag` or `Tag(Type)`: the payload is a type that already exists.
    Existing(Type),
    /// `Tag { .. }`: a struct is generated from the fields.
    Generated {
        /// Doc comments and the content of every `#[attribute(...)]`.
        attrs: Vec<Attribute>,
        fields: FieldsNamed,
    },
}

impl Schema {
    pub fn from_enum(item_enum: ItemEnum) -> Result<Self> {
        let ItemEnum {
            attrs,
            vis,
            ident,
            generics,
            variants,
            ..
        } = item_enum;

        let mut errors = Vec::new();
        if !generics.params.is_empty() || generics.where_clause.is_some() {
            errors.push(Error::new_spanned(
                &generics,
                "`tagged_union` does not support generic parameters",
            ));
        }
        if variants.is_empty() {
            errors.push(Error::new_spanned(
                &ident,
                "a tagged union needs at least one variant",
            ));
        }

        let mut seen: HashMap<String, Ident> = HashMap::new();
        let mut entries = Vec::with_capacity(variants.len());
        for variant in variants {
            let key = variant.ident.unraw().to_string();
            if let Some(first) = seen.get(&key) {
                let mut err = Error::new_spanned(
                    &variant.ident,
                    format!("tag `{key}` is declared more than once"),
                );
                err.combine(Error::new_spanned(first, "first declared here"));
                errors.push(err);
                continue;
            }
            seen.insert(key, variant.ident.clone());
            match entry(variant) {
                Ok(entry) => entries.push(entry),
                Err(err) => errors.push(err),
            }
        }
        combine_errors(errors)?;

        Ok(Schema {
            attrs,
            vis,
            ident,
            entries,
        })
    }
}

fn entry(variant: Variant) -> Result<VariantEntry> {
    let Variant {
        attrs,
        ident: tag,
        fields,
        discriminant,
    } = variant;

    let name = tag.unraw().to_string();
    if RESERVED_TAGS.contains(&name.as_str()) {
        Err(Error::new_spanned(
            &tag,
            format!("tag `{name}` clashes with the associated const `{name}` of the tag enum"),
        ))?
    }
    if let Some(cfg) = attrs.iter().find(|attr| is_attribute(attr, "cfg")) {
        Err(Error::new_spanned(
            cfg,
            "`#[cfg]` is not supported on tags, the tag set is fixed when the union is declared",
        ))?
    }

    if let Some((eq_token, expr)) = discriminant {
        Err(Error::new_spanned(
            quote!(#eq_token #expr),
            "explicit discriminants are not supported, tags are numbered in declared order",
        ))?
    }

    let (struct_attrs, attrs): (Vec<_>, Vec<_>) = attrs
        .into_iter()
        .partition(|attr| is_attribute(attr, "attribute"));

    let payload = match fields {
        Fields::Named(fields) => {
            let mut generated = struct_attrs
                .into_iter()
                .map(unwrap_attribute)
                .collect::<Result<Vec<_>>>()?;
            generated.extend(
                attrs
                    .iter()
                    .filter(|attr| is_attribute(attr, "doc"))
                    .cloned(),
            );
            Payload::Generated {
                attrs: generated,
                fields,
            }
        }
        fields => {
            if let Some(attr) = struct_attrs.first() {
                Err(Error::new_spanned(
                    attr,
                    "`#[attribute(...)]` only applies to variants with named fields",
                ))?
            }
            match fields {
                Fields::Unnamed(FieldsUnnamed {
                    unnamed,
                    paren_token,
                }) => {
                    if unnamed.len() != 1 {
                        Err(Error::new(
                            paren_token.span.join(),
                            "tuple-like variant must have exactly 1 field",
                        ))?
                    }
                    let field = unnamed.into_iter().next().map(|field| field.ty);
                    Payload::Existing(field.ok_or_else(|| {
                        Error::new(paren_token.span.join(), "missing payload type")
                    })?)
                }
                _ => Payload::Existing(Type::Path(TypePath {
                    qself: None,
                    path: Path::from(tag.clone()),
                })),
            }
        }
    };

    Ok(VariantEntry {
        attrs,
        tag,
        payload,
    })
}

/// `#[attribute(derive(Default))]` -> `#[derive(Default)]`
fn unwrap_attribute(attr: Attribute) -> Result<Attribute> {
    if let Meta::List(MetaList { tokens, .. }) = &attr.meta {
        let meta = syn::parse2::<Meta>(tokens.clone())?;
        Ok(Attribute { meta, ..attr })
    } else {
        Err(Error::new_spanned(
            &attr.meta,
            "must be in the form of `#[attribute(...)]`",
        ))
    }
}
