//! `check`/`cast` style methods generated on the union, one family per tag.

use std::collections::HashMap;

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{ext::IdentExt, Error, Result, Type};

use crate::common::{combine_errors, snake_ident};

pub struct Accessor<'a> {
    pub tag: &'a Ident,
    pub ty: &'a Type,
}

struct Names {
    is: Ident,
    as_ref: Ident,
    as_mut: Ident,
    expect_ref: Ident,
    expect_mut: Ident,
    into: Ident,
}

impl Names {
    fn new(tag: &Ident) -> Self {
        Names {
            is: snake_ident("is_", tag, ""),
            as_ref: snake_ident("as_", tag, ""),
            as_mut: snake_ident("as_", tag, "_mut"),
            expect_ref: snake_ident("expect_", tag, ""),
            expect_mut: snake_ident("expect_", tag, "_mut"),
            into: snake_ident("into_", tag, ""),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Ident> {
        [
            &self.is,
            &self.as_ref,
            &self.as_mut,
            &self.expect_ref,
            &self.expect_mut,
            &self.into,
        ]
        .into_iter()
    }
}

/// Two tags must not produce the same method, e.g. `Line` and `LINE`, or `Line` and `LineMut`.
fn check_collisions<'a>(accessors: &[Accessor<'a>], names: &[Names]) -> Result<()> {
    let mut taken: HashMap<String, &'a Ident> = HashMap::new();
    let mut errors = Vec::new();
    for (Accessor { tag, .. }, names) in accessors.iter().zip(names) {
        for name in names.iter() {
            match taken.get(&name.to_string()) {
                Some(first) => errors.push(Error::new_spanned(
                    tag,
                    format!(
                        "method `{name}` generated for tag `{tag}` is already generated for tag `{first}`"
                    ),
                )),
                None => {
                    taken.insert(name.to_string(), *tag);
                }
            }
        }
    }
    combine_errors(errors)
}

pub fn generate(ident: &Ident, tag_ident: &Ident, accessors: &[Accessor]) -> Result<TokenStream> {
    let names: Vec<Names> = accessors.iter().map(|a| Names::new(a.tag)).collect();
    check_collisions(accessors, &names)?;

    let union_name = ident.unraw().to_string();
    let tags: Vec<&Ident> = accessors.iter().map(|a| a.tag).collect();

    let methods = accessors.iter().zip(&names).map(|(Accessor { tag, ty }, names)| {
        let Names {
            is,
            as_ref,
            as_mut,
            expect_ref,
            expect_mut,
            into,
        } = names;
        let tag_name = tag.unraw().to_string();
        let as_doc =
            format!("The payload if the active tag is [`{tag_ident}::{tag}`], `None` otherwise.");
        let expect_doc =
            format!("The payload under [`{tag_ident}::{tag}`].\n\n# Panics\n\nIf another tag is active.");
        quote! {
            pub fn #is(&self) -> bool {
                ::core::matches!(self, #ident::#tag(_))
            }

            #[doc = #as_doc]
            pub fn #as_ref(&self) -> ::core::option::Option<&#ty> {
                match self {
                    #ident::#tag(payload) => ::core::option::Option::Some(payload),
                    #[allow(unreachable_patterns)]
                    _ => ::core::option::Option::None,
                }
            }

            pub fn #as_mut(&mut self) -> ::core::option::Option<&mut #ty> {
                match self {
                    #ident::#tag(payload) => ::core::option::Option::Some(payload),
                    #[allow(unreachable_patterns)]
                    _ => ::core::option::Option::None,
                }
            }

            #[doc = #expect_doc]
            #[track_caller]
            pub fn #expect_ref(&self) -> &#ty {
                match self {
                    #ident::#tag(payload) => payload,
                    #[allow(unreachable_patterns)]
                    other => ::tagged_union::__private::cast_failed(#union_name, #tag_name, other.tag().name()),
                }
            }

            #[track_caller]
            pub fn #expect_mut(&mut self) -> &mut #ty {
                match self {
                    #ident::#tag(payload) => payload,
                    #[allow(unreachable_patterns)]
                    other => ::tagged_union::__private::cast_failed(#union_name, #tag_name, other.tag().name()),
                }
            }

            /// Takes the payload out, or gives the union back untouched.
            pub fn #into(self) -> ::core::result::Result<#ty, Self> {
                match self {
                    #ident::#tag(payload) => ::core::result::Result::Ok(payload),
                    #[allow(unreachable_patterns)]
                    other => ::core::result::Result::Err(other),
                }
            }
        }
    });

    Ok(quote! {
        impl #ident {
            /// The tag of the active variant.
            pub fn tag(&self) -> #tag_ident {
                match self {
                    #(#ident::#tags(_) => #tag_ident::#tags),*
                }
            }

            /// `true` iff `tag` is the active tag.
            pub fn check(&self, tag: #tag_ident) -> bool {
                self.tag() == tag
            }

            #(#methods)*
        }

        impl ::tagged_union::Tagged for #ident {
            type Tag = #tag_ident;

            const NAME: &'static str = #union_name;

            fn tag(&self) -> #tag_ident {
                #ident::tag(self)
            }
        }
    })
}
