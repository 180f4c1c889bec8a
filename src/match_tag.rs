//! `match_tag!(Union, scrutinee { Tag(handle) => .., _ => .. })`
//!
//! Expands to a plain `match` over `Union::Tag(..)` patterns, so the tag is read once, one
//! arm runs, the handle is a borrow scoped to its arm and a missing tag is a non-exhaustive
//! match.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{
    braced,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    Arm, Attribute, Error, Expr, Ident, Pat, PatIdent, PatTupleStruct, Path, Result, Token,
};

use crate::common::combine_errors;

pub fn doit(input: MatchTag) -> Result<TokenStream> {
    let MatchTag {
        union,
        scrutinee,
        arms,
    } = input;

    let mut errors = Vec::new();
    let mut handlers = Vec::with_capacity(arms.len());
    let mut default: Option<Handler> = None;
    let mut seen: HashMap<String, Ident> = HashMap::new();

    for arm in arms {
        let handler = match Handler::try_from(arm) {
            Ok(handler) => handler,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        match &handler.head {
            Head::Default(underscore) => {
                if default.is_some() {
                    errors.push(Error::new_spanned(underscore, "more than one default arm"));
                } else {
                    default = Some(handler);
                }
            }
            Head::Tag { tag, .. } => {
                let key = tag.unraw().to_string();
                if let Some(first) = seen.get(&key) {
                    let mut err = Error::new_spanned(
                        tag,
                        format!("tag `{key}` is handled more than once"),
                    );
                    err.combine(Error::new_spanned(first, "first handled here"));
                    errors.push(err);
                } else {
                    seen.insert(key, tag.clone());
                    handlers.push(handler);
                }
            }
        }
    }
    combine_errors(errors)?;

    let arms = handlers
        .into_iter()
        .chain(default)
        .map(|Handler { attrs, head, body }| {
            let pat = match head {
                Head::Tag {
                    tag,
                    handle: Some(handle),
                } => quote!(#union::#tag(#handle)),
                Head::Tag { tag, handle: None } => quote!(#union::#tag(_)),
                Head::Default(underscore) => underscore.into_token_stream(),
            };
            quote! {
                #(#attrs)*
                #pat => #body,
            }
        });

    Ok(quote! {
        match #scrutinee {
            #(#arms)*
        }
    })
}

pub struct MatchTag {
    union: Path,
    scrutinee: Expr,
    arms: Vec<Arm>,
}

impl Parse for MatchTag {
    fn parse(input: ParseStream) -> Result<Self> {
        let union = input.call(Path::parse_mod_style)?;
        input.parse::<Token![,]>()?;
        let scrutinee = Expr::parse_without_eager_brace(input)?;
        let content;
        braced!(content in input);
        let mut arms = Vec::new();
        while !content.is_empty() {
            arms.push(content.parse()?);
        }
        Ok(MatchTag {
            union,
            scrutinee,
            arms,
        })
    }
}

enum Head {
    /// `Tag(handle)` or `Tag`
    Tag { tag: Ident, handle: Option<Pat> },
    /// `_`
    Default(Token![_]),
}

struct Handler {
    attrs: Vec<Attribute>,
    head: Head,
    body: Box<Expr>,
}

const ARM_FORMS: &str = "expected `Tag(handle) => ..`, `Tag => ..` or `_ => ..`";

impl TryFrom<Arm> for Handler {
    type Error = Error;
    fn try_from(arm: Arm) -> std::result::Result<Self, Self::Error> {
        let Arm {
            attrs,
            pat,
            guard,
            body,
            ..
        } = arm;
        if let Some((if_token, cond)) = guard {
            Err(Error::new_spanned(
                quote!(#if_token #cond),
                "match guards are not supported, dispatch is on the tag alone",
            ))?
        }
        let head = match pat {
            Pat::Wild(wild) => Head::Default(wild.underscore_token),
            Pat::Ident(PatIdent {
                ident,
                by_ref: None,
                mutability: None,
                subpat: None,
                ..
            }) => Head::Tag {
                tag: ident,
                handle: None,
            },
            Pat::TupleStruct(PatTupleStruct {
                qself: None,
                path,
                paren_token,
                elems,
                ..
            }) => {
                let tag = path
                    .get_ident()
                    .cloned()
                    .ok_or_else(|| Error::new_spanned(&path, "expected a bare tag name"))?;
                if elems.len() != 1 {
                    Err(Error::new(
                        paren_token.span.join(),
                        "expected exactly one handle for the payload",
                    ))?
                }
                Head::Tag {
                    tag,
                    handle: elems.into_iter().next(),
                }
            }
            Pat::Path(path) => Err(Error::new_spanned(path, "expected a bare tag name"))?,
            Pat::Or(or) => Err(Error::new_spanned(
                or,
                "`|` is not supported, handle each tag in its own arm",
            ))?,
            pat => Err(Error::new_spanned(pat, ARM_FORMS))?,
        };
        Ok(Handler { attrs, head, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expand(tokens: TokenStream) -> Result<TokenStream> {
        doit(syn::parse2(tokens)?)
    }

    fn error(tokens: TokenStream) -> String {
        expand(tokens).err().unwrap().to_string()
    }

    #[test]
    fn expands_to_native_match() {
        let out = expand(quote! {
            Shape, &mut shape {
                Line(line) => line.direction = 0.0,
                Number => {}
                Triangle(t) => { sum(t) }
            }
        })
        .unwrap();
        let expected = quote! {
            match &mut shape {
                Shape::Line(line) => line.direction = 0.0,
                Shape::Number(_) => {},
                Shape::Triangle(t) => { sum(t) },
            }
        };
        assert_eq!(out.to_string(), expected.to_string());
    }

    #[test]
    fn default_goes_last() {
        let out = expand(quote! {
            shapes::Shape, value {
                _ => 0,
                Number(n) => *n as i32,
            }
        })
        .unwrap();
        let expected = quote! {
            match value {
                shapes::Shape::Number(n) => *n as i32,
                _ => 0,
            }
        };
        assert_eq!(out.to_string(), expected.to_string());
    }

    #[test]
    fn struct_literal_is_not_the_scrutinee() {
        // the brace belongs to the arms, not to `value`
        assert!(expand(quote!(Shape, value { _ => () })).is_ok());
    }

    #[test]
    fn duplicate_tag() {
        let err = expand(quote! {
            Shape, &shape {
                Line(a) => {}
                Number(_) => {}
                Line(b) => {}
            }
        })
        .err()
        .unwrap();
        let messages: Vec<_> = err.into_iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            ["tag `Line` is handled more than once", "first handled here"]
        );
    }

    #[test]
    fn duplicate_tag_with_and_without_handle() {
        assert_eq!(
            error(quote!(Shape, &shape { Line => {} Line(l) => {} })),
            "tag `Line` is handled more than once"
        );
    }

    #[test]
    fn raw_tag_name_is_the_same_tag() {
        assert_eq!(
            error(quote!(Shape, &shape { Line(_) => {} r#Line(_) => {} })),
            "tag `Line` is handled more than once"
        );
    }

    #[test]
    fn rejected_arms() {
        for (tokens, message) in [
            (
                quote!(Shape, s { _ => {} _ => {} }),
                "more than one default arm",
            ),
            (
                quote!(Shape, s { Line(l) if l.length > 0.0 => {} }),
                "match guards are not supported, dispatch is on the tag alone",
            ),
            (
                quote!(Shape, s { Line(_) | Square(_) => {} }),
                "`|` is not supported, handle each tag in its own arm",
            ),
            (
                quote!(Shape, s { Shape::Line(l) => {} }),
                "expected a bare tag name",
            ),
            (
                quote!(Shape, s { Shape::Line => {} }),
                "expected a bare tag name",
            ),
            (
                quote!(Shape, s { Line(a, b) => {} }),
                "expected exactly one handle for the payload",
            ),
            (quote!(Shape, s { 1 => {} }), ARM_FORMS),
            (quote!(Shape, s { ref line => {} }), ARM_FORMS),
        ] {
            assert_eq!(error(tokens), message);
        }
    }

    #[test]
    fn malformed_input() {
        assert!(expand(quote!(Shape s { _ => {} })).is_err());
        assert!(expand(quote!(Shape<T>, s { _ => {} })).is_err());
        assert!(expand(quote!(Shape, s)).is_err());
    }

    #[test]
    fn empty_match_is_left_to_the_compiler() {
        let out = expand(quote!(Shape, s {})).unwrap();
        assert_eq!(out.to_string(), quote!(match s {}).to_string());
    }
}
