use di_abstractions::{ComponentResolver, ContainerBuilder, Inject, Injectable};
use di_impl::DiContainerBuilder;
use std::sync::Arc;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

#[derive(Injectable)]
#[injectable(provides(dyn Clock))]
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        42
    }
}

#[derive(Injectable)]
struct Scheduler {
    clock: Arc<dyn Clock>,
    #[value]
    interval: u32,
    #[inject]
    backup: Inject<dyn Clock>,
    #[skip]
    runs: Vec<u64>,
}

fn main() {
    let container = DiContainerBuilder::new()
        .add_injectable::<SystemClock>()
        .add_injectable::<Scheduler>()
        .build()
        .unwrap();

    let scheduler = container.resolve::<Scheduler>().unwrap();
    assert_eq!(scheduler.clock.now(), 42);
    assert_eq!(scheduler.interval, 0);
    assert!(scheduler.backup.is_wired());
    assert!(scheduler.runs.is_empty());
    assert_eq!(Scheduler::properties().len(), 1);
}
