use di_abstractions::{Inject, Injectable};
use std::sync::Arc;

trait Mailer: Send + Sync {}

#[derive(Injectable)]
#[injectable(unmarked, no_constructor)]
struct Newsletter {
    #[inject]
    mailer: Inject<dyn Mailer>,
    subscribers: Vec<String>,
}

#[derive(Injectable)]
#[injectable(unmarked)]
struct Helper {
    name: std::sync::Arc<String>,
}

fn main() {
    assert!(!Newsletter::marked());
    assert!(Newsletter::constructor().is_none());
    assert_eq!(Newsletter::properties()[0].name(), "mailer");
    assert!(!Helper::marked());
    assert!(Helper::constructor().is_some());
    let _ = Arc::new(0_u8);
}
