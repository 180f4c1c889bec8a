#![allow(unused)]
use tagged_union::tagged_union;

#[tagged_union]
pub enum Filter {
    ALL(()),
    SOME(Vec<u8>),
}

fn main() {}
