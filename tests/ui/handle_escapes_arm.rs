#![allow(unused)]
use tagged_union::{match_tag, tagged_union};

#[tagged_union]
pub enum Shape {
    Number(f32),
    Text(String),
}

fn main() {
    let mut shape = Shape::Text("a".to_owned());
    let mut escaped = None;
    match_tag!(Shape, &shape {
        Text(text) => escaped = Some(text),
        _ => {}
    });
    shape = Shape::Number(1.0);
    drop(escaped);
}
