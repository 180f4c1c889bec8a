#![allow(unused)]
use tagged_union::{match_tag, tagged_union};

#[tagged_union]
pub enum Shape {
    Number(f32),
    Text(String),
}

fn describe(shape: &Shape) -> &'static str {
    match_tag!(Shape, shape {
        Number(_) => "number",
    })
}

fn main() {
    describe(&Shape::Number(1.0));
}
