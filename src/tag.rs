use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::ext::IdentExt;

use crate::schema::Schema;

/// The fieldless tag enum of a union, numbered in declared order.
pub fn generate(schema: &Schema, tag_ident: &Ident) -> TokenStream {
    let Schema {
        vis,
        ident,
        entries,
        ..
    } = schema;

    let tags: Vec<&Ident> = entries.iter().map(|entry| &entry.tag).collect();
    let names = tags.iter().map(|tag| tag.unraw().to_string());
    let count = tags.len();
    let doc = format!("Tags of [`{ident}`], in declared order.");

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #vis enum #tag_ident {
            #(#tags),*
        }

        impl #tag_ident {
            pub const COUNT: usize = #count;

            /// Every tag, in declared order. `ALL[tag.index()] == tag`.
            pub const ALL: [Self; #count] = [#(Self::#tags),*];

            pub const fn index(self) -> usize {
                self as usize
            }

            pub const fn name(self) -> &'static str {
                match self {
                    #(Self::#tags => #names),*
                }
            }
        }

        impl ::core::fmt::Display for #tag_ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl ::core::convert::From<&#ident> for #tag_ident {
            fn from(value: &#ident) -> Self {
                value.tag()
            }
        }

        impl ::tagged_union::TagSet for #tag_ident {
            const ALL: &'static [Self] = &[#(#tag_ident::#tags),*];

            fn name(self) -> &'static str {
                self.name()
            }

            fn index(self) -> usize {
                self.index()
            }
        }
    }
}
