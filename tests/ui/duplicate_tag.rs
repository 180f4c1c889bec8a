#![allow(unused)]
use tagged_union::tagged_union;

#[tagged_union]
enum Shape {
    Line(f32),
    Number(f32),
    Line(u8),
}

fn main() {}
