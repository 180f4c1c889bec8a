use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Result};

mod common;

mod accessors;
mod match_tag;
mod schema;
mod tag;
mod tagged_union;

#[inline]
fn result_of(doit: Result<impl Into<TokenStream>>) -> TokenStream {
    match doit {
        Ok(token_stream) => token_stream.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Turns an enum into a tagged union: every variant carries exactly one payload, and the
/// tag of the active variant can be inspected, checked and matched on.
///
/// Variants, in declared order, are the tags:
/// - `Tag`: the payload is the type named `Tag`;
/// - `Tag(Type)`: the payload is `Type`;
/// - `Tag { fields }`: a struct (named `Tag` by default) is generated from the fields and
///   becomes the payload. It gets the enum's `#[derive(...)]`s, plus whatever is written as
///   `#[attribute(...)]` on the variant.
///
/// Generated next to an enum `Shape` with a tag `Line`:
/// - `ShapeTag`, a fieldless enum of the tags with `ALL`, `COUNT`, `index()` and `name()`;
/// - a payload alias per tag, `type ShapeLine = Line;`;
/// - `tag()`, `check(tag)` and, per tag, `is_line()`, `as_line()`, `as_line_mut()`,
///   `expect_line()`, `expect_line_mut()` and `into_line()` on `Shape`;
/// - `tagged_union::Tagged` for `Shape` and `tagged_union::TagSet` for `ShapeTag`;
/// - [`From`], [`TryFrom`] and `tagged_union::VariantOf` for every payload type that is used
///   by a single tag.
///
/// Valid arguments, e.g. `#[tagged_union(tag(Kind), suffix = "Data", no_impl)]`:
/// - `tag`: name of the tag enum;
/// - `prefix`, `suffix`: prepended/appended to the name of every generated payload struct;
/// - `no_impl`: no [`From`], [`TryFrom`] or `VariantOf`;
/// - `no_alias`: no payload type aliases;
/// - `derive_exclude(Path, ...)`: derives that are not copied onto generated payload structs.
#[proc_macro_attribute]
pub fn tagged_union(args: TokenStream, input: TokenStream) -> TokenStream {
    result_of(tagged_union::doit(
        args.into(),
        parse_macro_input!(input),
    ))
}

/// Dispatches on the active tag of a union declared with [`macro@tagged_union`].
///
/// ```ignore
/// match_tag!(Shape, &mut shape {
///     Line(line) => line.direction = 0.0,
///     Triangle(t) => println!("{} {} {}", t.a, t.b, t.c),
///     _ => {}
/// })
/// ```
///
/// `Tag(handle)` binds the payload for the duration of the arm: `&Payload` when matching a
/// `&Union`, `&mut Payload` for a `&mut Union`, the payload itself for a `Union`. `Tag`
/// handles a tag without binding its payload, and `_` handles every tag not listed.
///
/// Every tag must be handled, either by name or by `_`. Handling a tag twice is an error.
#[proc_macro]
pub fn match_tag(input: TokenStream) -> TokenStream {
    match match_tag::doit(parse_macro_input!(input)) {
        Ok(token_stream) => token_stream.into(),
        // expression position: several `compile_error!`s need a block around them
        Err(err) => {
            let errors = err.into_compile_error();
            quote!({ #errors }).into()
        }
    }
}
