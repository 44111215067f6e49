#![allow(dead_code)]

use di_abstractions::Injectable;

#[derive(Injectable)]
#[injectable(lazy)]
struct Session;

fn main() {}
