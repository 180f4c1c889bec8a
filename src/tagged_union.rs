use std::collections::HashMap;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::{
    parse::Parser, punctuated::Punctuated, token, Attribute, Error, Fields, FieldsNamed, Generics,
    ItemEnum, ItemStruct, Meta, MetaList, Path, Result, Token, Type, TypePath, Visibility,
};

use tap::prelude::*;

use crate::accessors::{self, Accessor};
use crate::common::{
    fill_empty_or_else, flag_value, generate_conversion_impl, generate_variant_of_impl, ident,
    ident_value, Args, WrappedVariant,
};
use crate::schema::{Payload, Schema};
use crate::tag;

pub fn doit(args: TokenStream, item_enum: ItemEnum) -> Result<TokenStream> {
    let value = Args::parse_terminated.parse2(args)?;
    let params = Params::try_from(value)?;
    let Config {
        map_ident,
        tag_ident,
        implement_conversions,
        generate_aliases,
        derive_exclude,
    } = Config::new(params, &item_enum);

    let schema = Schema::from_enum(item_enum)?;
    let Schema {
        attrs,
        vis,
        ident,
        entries,
    } = &schema;

    let global_derive = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .map(|attr| -> Result<Attribute> {
            Ok(Attribute {
                meta: if let Meta::List(list) = &attr.meta {
                    let a = Punctuated::<Path, Token![,]>::parse_terminated
                        .parse2(list.tokens.clone())?
                        .into_iter()
                        .filter(|path| !derive_exclude.contains(path));
                    Meta::List(MetaList {
                        tokens: quote! { #(#a),* },
                        ..list.clone()
                    })
                } else {
                    attr.meta.clone()
                },
                ..attr.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let generate_struct = |tag: &Ident, attrs: &[Attribute], fields: &FieldsNamed| ItemStruct {
        attrs: attrs
            .to_vec()
            .tap_mut(|attrs| attrs.extend_from_slice(&global_derive)),
        vis: vis.clone(),
        struct_token: token::Struct { span: tag.span() },
        ident: map_ident(tag),
        generics: Generics::default(),
        fields: Fields::Named(FieldsNamed {
            named: fields
                .named
                .iter()
                .cloned()
                .map(|field| match field.vis {
                    Visibility::Inherited => syn::Field {
                        vis: vis.clone(),
                        ..field
                    },
                    _ => field,
                })
                .collect(),
            ..fields.clone()
        }),
        semi_token: None,
    };

    let mut generated_structs = Vec::new();
    let wrapped_variants: Vec<WrappedVariant> = entries
        .iter()
        .map(|entry| {
            let ty = match &entry.payload {
                Payload::Existing(ty) => ty.clone(),
                Payload::Generated { attrs, fields } => {
                    let item = generate_struct(&entry.tag, attrs, fields);
                    let ty = Type::Path(TypePath {
                        qself: None,
                        path: Path::from(item.ident.clone()),
                    });
                    generated_structs.push(item);
                    ty
                }
            };
            WrappedVariant {
                attrs: entry.attrs.clone(),
                id: entry.tag.clone(),
                ty,
            }
        })
        .collect();

    let tag_def = tag::generate(&schema, &tag_ident);

    let aliases = if generate_aliases {
        wrapped_variants
            .iter()
            .filter_map(|WrappedVariant { id, ty, .. }| {
                let alias = format_ident!("{}{}", ident, id, span = id.span());
                if generated_structs.iter().any(|item| item.ident == alias) {
                    return None;
                }
                if alias == tag_ident {
                    return Some(Err(Error::new_spanned(
                        id,
                        format!(
                            "payload alias `{alias}` clashes with the tag enum; \
                             rename the tag enum with `tag(..)` or pass `no_alias`"
                        ),
                    )));
                }
                let doc = format!("Payload of [`{ident}::{id}`].");
                Some(Ok(quote! {
                    #[doc = #doc]
                    #vis type #alias = #ty;
                }))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    let accessors = accessors::generate(
        ident,
        &tag_ident,
        &wrapped_variants
            .iter()
            .map(|WrappedVariant { id, ty, .. }| Accessor { tag: id, ty })
            .collect::<Vec<_>>(),
    )?;

    // the same payload type under two tags would make the conversion impls overlap
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for WrappedVariant { ty, .. } in &wrapped_variants {
        *occurrences
            .entry(ty.to_token_stream().to_string())
            .or_default() += 1;
    }
    let conversion_impls = wrapped_variants
        .iter()
        .filter(|WrappedVariant { ty, .. }| {
            implement_conversions && occurrences[&ty.to_token_stream().to_string()] == 1
        })
        .map(|WrappedVariant { id, ty, .. }| {
            let conversion = generate_conversion_impl(ident, id, ty);
            let variant_of = generate_variant_of_impl(ident, &tag_ident, id, ty);
            quote! {
                #conversion
                #variant_of
            }
        });

    Ok(quote! {
        #(#attrs)*
        #vis enum #ident {
            #(#wrapped_variants),*
        }
        #(#generated_structs)*
        #tag_def
        #(#aliases)*
        #accessors
        #(#conversion_impls)*
    })
}

struct Config {
    map_ident: Box<dyn Fn(&Ident) -> Ident>,
    tag_ident: Ident,
    implement_conversions: bool,
    generate_aliases: bool,
    derive_exclude: Vec<Path>,
}
impl Config {
    fn new(
        Params {
            tag,
            prefix,
            suffix,
            no_impl,
            no_alias,
            derive_exclude,
        }: Params,
        item_enum: &ItemEnum,
    ) -> Self {
        let prefix = prefix.map(|id| id.to_string()).unwrap_or_default();
        let suffix = suffix.map(|id| id.to_string()).unwrap_or_default();
        Self {
            map_ident: Box::new(move |vid| {
                format_ident!("{}{}{}", prefix, vid, suffix, span = vid.span())
            }),
            tag_ident: tag.unwrap_or_else(|| {
                format_ident!("{}Tag", item_enum.ident, span = item_enum.ident.span())
            }),
            implement_conversions: !no_impl.unwrap_or_default(),
            generate_aliases: !no_alias.unwrap_or_default(),
            derive_exclude,
        }
    }
}

#[derive(Default)]
struct Params {
    /// Name of the generated tag enum, `{Union}Tag` when absent.
    tag: Option<Ident>,
    /// Affixes for the structs generated from named-field variants.
    prefix: Option<Ident>,
    suffix: Option<Ident>,
    no_impl: Option<bool>,
    no_alias: Option<bool>,
    derive_exclude: Vec<Path>,
}

impl TryFrom<Args> for Params {
    type Error = Error;
    fn try_from(args: Args) -> std::result::Result<Self, Self::Error> {
        let mut params = Params::default();
        for arg in args {
            let ident = ident(&arg)?.clone();
            let duplicate = || Error::new_spanned(&ident, format!("duplicate parameter `{ident}`"));
            match ident.to_string().as_str() {
                "tag" => {
                    fill_empty_or_else(&mut params.tag, ident_value(arg)?, |_, _| duplicate())?
                }
                "prefix" => {
                    fill_empty_or_else(&mut params.prefix, ident_value(arg)?, |_, _| duplicate())?
                }
                "suffix" => {
                    fill_empty_or_else(&mut params.suffix, ident_value(arg)?, |_, _| duplicate())?
                }
                "no_impl" => {
                    fill_empty_or_else(&mut params.no_impl, flag_value(arg)?, |_, _| duplicate())?
                }
                "no_alias" => {
                    fill_empty_or_else(&mut params.no_alias, flag_value(arg)?, |_, _| duplicate())?
                }
                "derive_exclude" => {
                    if let Meta::List(MetaList { tokens, .. }) = arg {
                        let a = Punctuated::<Path, Token![,]>::parse_terminated.parse2(tokens)?;
                        params.derive_exclude.extend(a)
                    } else {
                        Err(Error::new_spanned(
                            arg,
                            r#"valid form is `derive_exclude(Path0, Path1, ...)`"#,
                        ))?
                    }
                }
                _ => Err(Error::new_spanned(
                    &ident,
                    "tagged_union: unrecognized parameter",
                ))?,
            }
        }
        Ok(params)
    }
}
