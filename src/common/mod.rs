use proc_macro2::{Delimiter, Group, TokenStream};
use quote::{format_ident, quote, ToTokens, TokenStreamExt};
use syn::{
    punctuated::Punctuated, Attribute, Error, Expr, ExprLit, Ident, Lit, LitBool, Meta, MetaList,
    MetaNameValue, Result, Token, Type,
};

pub type Args = Punctuated<Meta, Token![,]>;

pub fn ident(arg: &Meta) -> Result<&Ident> {
    let path = arg.path();
    path.get_ident()
        .ok_or_else(|| Error::new_spanned(path, "must be a bare identifier"))
}

/// Accepts `name`, `name = true` and `name = false`.
pub fn flag_value(arg: Meta) -> Result<bool> {
    match arg {
        Meta::Path(_) => Ok(true),
        Meta::NameValue(MetaNameValue {
            value:
                Expr::Lit(ExprLit {
                    lit: Lit::Bool(LitBool { value, .. }),
                    ..
                }),
            ..
        }) => Ok(value),
        _ => Err(Error::new_spanned(
            &arg,
            format!(
                "valid forms are `{0}`, `{0} = true` or `{0} = false`",
                arg.path().to_token_stream()
            ),
        )),
    }
}

/// Accepts `name(Ident)` and `name = "Ident"`.
pub fn ident_value(arg: Meta) -> Result<Ident> {
    let error = |tokens: &dyn ToTokens| {
        Error::new_spanned(
            tokens,
            format!(
                r#"valid forms are `{0}(Ident)` or `{0} = "Ident"`"#,
                arg.path().to_token_stream()
            ),
        )
    };
    match &arg {
        Meta::List(MetaList { tokens, .. }) => syn::parse2(tokens.clone()).map_err(|mut err| {
            err.combine(error(tokens));
            err
        }),
        Meta::NameValue(MetaNameValue {
            value: Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }),
            ..
        }) => s.parse::<Ident>().map_err(|_| error(s)),
        _ => Err(error(&arg)),
    }
}

/// Stores `new` into an empty slot, or reports the clash through `err`.
pub fn fill_empty_or_else<T>(
    opt: &mut Option<T>,
    new: T,
    err: impl FnOnce(&T, T) -> Error,
) -> Result<()> {
    match opt {
        Some(old) => Err(err(old, new)),
        None => {
            opt.replace(new);
            Ok(())
        }
    }
}

/// Folds a list of errors into one, so every problem is reported in a single pass.
pub fn combine_errors(errors: impl IntoIterator<Item = Error>) -> Result<()> {
    errors.into_iter().fold(Ok(()), |acc, err| match acc {
        Ok(()) => Err(err),
        Err(mut all) => {
            all.combine(err);
            Err(all)
        }
    })
}

/// `LineSegment` -> `line_segment`, `HTTPServer` -> `http_server`, `LINE` -> `line`.
pub fn snake_case(ident: &Ident) -> String {
    let s = ident.to_string();
    let s = s.strip_prefix("r#").unwrap_or(&s);
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn snake_ident(prefix: &str, tag: &Ident, suffix: &str) -> Ident {
    format_ident!("{}{}{}", prefix, snake_case(tag), suffix, span = tag.span())
}

pub fn is_attribute(attr: &Attribute, name: &str) -> bool {
    attr.path().is_ident(name)
}

/// A variant that carries its payload as a single unnamed field: `Tag(Type)`.
pub struct WrappedVariant {
    pub attrs: Vec<Attribute>,
    pub id: Ident,
    pub ty: Type,
}

impl ToTokens for WrappedVariant {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        for attr in &self.attrs {
            attr.to_tokens(tokens);
        }
        self.id.to_tokens(tokens);
        tokens.append(Group::new(
            Delimiter::Parenthesis,
            self.ty.to_token_stream(),
        ));
    }
}

pub fn generate_conversion_impl(ident: &Ident, id: &Ident, ty: &Type) -> TokenStream {
    quote! {
        impl ::core::convert::From<#ty> for #ident {
            fn from(value: #ty) -> Self {
                #ident::#id(value)
            }
        }

        impl ::core::convert::TryFrom<#ident> for #ty {
            type Error = #ident;
            fn try_from(value: #ident) -> ::core::result::Result<Self, Self::Error> {
                match value {
                    #ident::#id(value) => ::core::result::Result::Ok(value),
                    #[allow(unreachable_patterns)]
                    value => ::core::result::Result::Err(value),
                }
            }
        }
    }
}

pub fn generate_variant_of_impl(
    ident: &Ident,
    tag_ident: &Ident,
    id: &Ident,
    ty: &Type,
) -> TokenStream {
    let as_ref = snake_ident("as_", id, "");
    let as_mut = snake_ident("as_", id, "_mut");
    quote! {
        impl ::tagged_union::VariantOf<#ident> for #ty {
            const TAG: #tag_ident = #tag_ident::#id;

            fn cast(value: &#ident) -> ::core::option::Option<&Self> {
                value.#as_ref()
            }

            fn cast_mut(value: &mut #ident) -> ::core::option::Option<&mut Self> {
                value.#as_mut()
            }
        }
    }
}
