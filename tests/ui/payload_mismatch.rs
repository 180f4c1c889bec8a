#![allow(unused)]
use tagged_union::tagged_union;

#[tagged_union]
pub enum Shape {
    Number(f32),
    Text(String),
}

fn main() {
    let shape = Shape::Number(String::new());
}
