#![allow(unused)]
use tagged_union::tagged_union;

#[tagged_union]
enum Wrapper<T> {
    Value(T),
}

fn main() {}
