#![allow(dead_code)]

use di_abstractions::Injectable;

#[derive(Injectable)]
struct Counter {
    count: u32,
}

fn main() {}
